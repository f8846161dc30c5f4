pub(crate) mod check_in;
pub(crate) mod session_window;
