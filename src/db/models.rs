use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::PrimitiveDateTime;

use crate::db::types::StudentStatus;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Admin {
    pub(crate) id: String,
    pub(crate) username: String,
    pub(crate) hashed_password: String,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

/// A student occupies exactly one seat. Rows created by code login carry no
/// email or password hash until signup claims them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Student {
    pub(crate) id: String,
    pub(crate) name: Option<String>,
    pub(crate) email: Option<String>,
    pub(crate) hashed_password: Option<String>,
    pub(crate) seat_number: i32,
    pub(crate) status: StudentStatus,
    pub(crate) last_active: PrimitiveDateTime,
    pub(crate) attendance_verified: Option<PrimitiveDateTime>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct PreRegisteredStudent {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) seat_number: i32,
    pub(crate) created_at: PrimitiveDateTime,
}

/// Singleton row keyed by a well-known id; both codes are nullable.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct AttendanceCode {
    pub(crate) id: String,
    pub(crate) morning_code: Option<String>,
    pub(crate) afternoon_code: Option<String>,
    pub(crate) updated_at: PrimitiveDateTime,
}
