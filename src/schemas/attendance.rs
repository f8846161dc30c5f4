use serde::{Deserialize, Serialize};

use crate::db::models::AttendanceCode;

#[derive(Debug, Deserialize)]
pub(crate) struct AttendanceCodesUpdate {
    #[serde(default)]
    #[serde(alias = "morningCode")]
    pub(crate) morning_code: Option<String>,
    #[serde(default)]
    #[serde(alias = "afternoonCode")]
    pub(crate) afternoon_code: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AttendanceCodesResponse {
    pub(crate) morning_code: Option<String>,
    pub(crate) afternoon_code: Option<String>,
}

impl AttendanceCodesResponse {
    pub(crate) fn from_db(codes: Option<AttendanceCode>) -> Self {
        match codes {
            Some(codes) => {
                Self { morning_code: codes.morning_code, afternoon_code: codes.afternoon_code }
            }
            None => Self { morning_code: None, afternoon_code: None },
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct VerifyAttendanceRequest {
    pub(crate) code: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AttendanceStatusResponse {
    pub(crate) is_verified_today: bool,
    pub(crate) current_session: &'static str,
    pub(crate) is_session_valid: bool,
    pub(crate) verified_date: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct VerifyAttendanceResponse {
    pub(crate) success: bool,
    pub(crate) message: String,
}
