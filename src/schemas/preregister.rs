use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;
use crate::db::models::PreRegisteredStudent;

#[derive(Debug, Deserialize)]
pub(crate) struct PreregisterCreate {
    pub(crate) name: String,
    #[serde(alias = "seatNumber")]
    pub(crate) seat_number: i32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BulkReplaceRequest {
    pub(crate) students: Vec<PreregisterCreate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PreregisterDeleteQuery {
    #[serde(alias = "seatNumber")]
    pub(crate) seat_number: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PreRegisteredResponse {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) seat_number: i32,
    pub(crate) created_at: String,
}

impl PreRegisteredResponse {
    pub(crate) fn from_db(row: PreRegisteredStudent) -> Self {
        Self {
            id: row.id,
            name: row.name,
            seat_number: row.seat_number,
            created_at: format_primitive(row.created_at),
        }
    }
}
