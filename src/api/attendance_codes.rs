use axum::{extract::State, routing::get, Json, Router};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentAdmin;
use crate::api::validation::validate_attendance_code;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::attendance::{AttendanceCodesResponse, AttendanceCodesUpdate};

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/", get(get_codes).put(put_codes))
}

async fn get_codes(
    _admin: CurrentAdmin,
    State(state): State<AppState>,
) -> Result<Json<AttendanceCodesResponse>, ApiError> {
    let codes = repositories::attendance_codes::get(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load attendance codes"))?;

    Ok(Json(AttendanceCodesResponse::from_db(codes)))
}

async fn put_codes(
    _admin: CurrentAdmin,
    State(state): State<AppState>,
    Json(payload): Json<AttendanceCodesUpdate>,
) -> Result<Json<AttendanceCodesResponse>, ApiError> {
    let morning = normalize_code(payload.morning_code.as_deref())?;
    let afternoon = normalize_code(payload.afternoon_code.as_deref())?;

    let codes =
        repositories::attendance_codes::upsert(state.db(), morning, afternoon, primitive_now_utc())
            .await
            .map_err(|e| ApiError::internal(e, "Failed to store attendance codes"))?;

    Ok(Json(AttendanceCodesResponse::from_db(Some(codes))))
}

/// An omitted or empty field clears the stored code.
fn normalize_code(code: Option<&str>) -> Result<Option<&str>, ApiError> {
    match code.map(str::trim) {
        None | Some("") => Ok(None),
        Some(code) => {
            validate_attendance_code(code)?;
            Ok(Some(code))
        }
    }
}
