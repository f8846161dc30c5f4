pub(crate) mod admins;
pub(crate) mod attendance_codes;
pub(crate) mod preregistrations;
pub(crate) mod students;
