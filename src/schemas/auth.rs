use serde::{Deserialize, Serialize};

use crate::db::types::StudentStatus;
use crate::schemas::student::StudentResponse;

#[derive(Debug, Deserialize)]
pub(crate) struct AdminLogin {
    pub(crate) username: String,
    pub(crate) password: String,
}

/// Credentials arrive as strings; an unparseable seat number is just another
/// invalid credential.
#[derive(Debug, Deserialize)]
pub(crate) struct StudentLogin {
    #[serde(alias = "seatNumber")]
    pub(crate) seat_number: String,
    #[serde(alias = "attendanceCode")]
    pub(crate) attendance_code: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AdminTokenResponse {
    pub(crate) access_token: String,
    pub(crate) token_type: String,
    pub(crate) username: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StudentTokenResponse {
    pub(crate) access_token: String,
    pub(crate) token_type: String,
    pub(crate) student: StudentResponse,
}

/// Tagged echo of the current session, one variant per role.
#[derive(Debug, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub(crate) enum MeResponse {
    #[serde(rename_all = "camelCase")]
    Admin { id: String, username: String },
    #[serde(rename_all = "camelCase")]
    Student { id: String, seat_number: i32, name: Option<String>, status: StudentStatus },
}
