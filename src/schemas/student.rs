use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;
use crate::db::models::Student;
use crate::db::types::StudentStatus;

#[derive(Debug, Deserialize)]
pub(crate) struct SignupRequest {
    pub(crate) email: String,
    #[serde(alias = "seatNumber")]
    pub(crate) seat_number: i32,
    pub(crate) password: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusUpdateRequest {
    #[serde(alias = "studentId")]
    pub(crate) student_id: String,
    pub(crate) status: StudentStatus,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StudentsDeleteQuery {
    #[serde(default)]
    pub(crate) id: Option<String>,
    #[serde(default)]
    pub(crate) all: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CheckSeatQuery {
    #[serde(alias = "seatNumber")]
    pub(crate) seat_number: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CheckSeatResponse {
    pub(crate) available: bool,
    pub(crate) taken: bool,
    pub(crate) pre_registered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StudentResponse {
    pub(crate) id: String,
    pub(crate) name: Option<String>,
    pub(crate) email: Option<String>,
    pub(crate) seat_number: i32,
    pub(crate) status: StudentStatus,
    pub(crate) last_active: String,
    pub(crate) attendance_verified: Option<String>,
    pub(crate) created_at: String,
}

impl StudentResponse {
    pub(crate) fn from_db(student: Student) -> Self {
        Self {
            id: student.id,
            name: student.name,
            email: student.email,
            seat_number: student.seat_number,
            status: student.status,
            last_active: format_primitive(student.last_active),
            attendance_verified: student.attendance_verified.map(format_primitive),
            created_at: format_primitive(student.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SignupResponse {
    pub(crate) message: String,
    pub(crate) student: StudentResponse,
}
