pub(crate) mod attendance;
pub(crate) mod attendance_codes;
pub(crate) mod auth;
pub(crate) mod errors;
pub(crate) mod guards;
pub(crate) mod handlers;
pub(crate) mod preregister;
pub(crate) mod router;
pub(crate) mod seats;
pub(crate) mod students;
pub(crate) mod validation;
