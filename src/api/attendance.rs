use axum::{extract::State, routing::get, Json, Router};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentStudent;
use crate::api::validation::validate_attendance_code;
use crate::core::state::AppState;
use crate::core::time::{format_date, to_primitive_utc};
use crate::repositories;
use crate::schemas::attendance::{
    AttendanceStatusResponse, VerifyAttendanceRequest, VerifyAttendanceResponse,
};
use crate::services::{check_in, session_window};

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/attendance", get(status).post(verify))
}

/// Whether the logged-in student has checked in during the current local day,
/// and whether a check-in window is currently open.
async fn status(
    CurrentStudent(student): CurrentStudent,
    State(state): State<AppState>,
) -> Json<AttendanceStatusResponse> {
    let rules = state.settings().attendance();
    let now = state.clock().now_utc();
    let window = session_window::classify(now, rules);
    let today = session_window::local_date(now, rules);

    // The stamp is stored in UTC; both the comparison and the reported date
    // use the classroom-local calendar day.
    let verified_date = student
        .attendance_verified
        .map(|stamp| session_window::local_date(stamp.assume_utc(), rules));
    let is_verified_today = verified_date.map(|date| date == today).unwrap_or(false);

    Json(AttendanceStatusResponse {
        is_verified_today,
        current_session: window.label(),
        is_session_valid: window.is_open(),
        verified_date: verified_date.map(format_date),
    })
}

async fn verify(
    CurrentStudent(student): CurrentStudent,
    State(state): State<AppState>,
    Json(payload): Json<VerifyAttendanceRequest>,
) -> Result<Json<VerifyAttendanceResponse>, ApiError> {
    let code = payload.code.trim();
    validate_attendance_code(code)?;

    let rules = state.settings().attendance();
    let now = state.clock().now_utc();

    let stored = repositories::attendance_codes::get(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load attendance codes"))?
        .ok_or_else(|| ApiError::BadRequest("No attendance code has been set".to_string()))?;

    check_in::verify_code(session_window::classify(now, rules), &stored, code).map_err(
        |err| match err {
            check_in::CheckInError::WindowClosed => {
                ApiError::BadRequest("Attendance is closed for today".to_string())
            }
            _ => ApiError::BadRequest("Attendance code does not match".to_string()),
        },
    )?;

    let updated = repositories::students::set_attendance_verified(
        state.db(),
        &student.id,
        to_primitive_utc(now),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to record attendance"))?;

    if updated == 0 {
        return Err(ApiError::NotFound("Student not found".to_string()));
    }

    Ok(Json(VerifyAttendanceResponse {
        success: true,
        message: "Attendance verified".to_string(),
    }))
}
