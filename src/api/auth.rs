use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::Session;
use crate::core::security::{self, SessionRole};
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::auth::{
    AdminLogin, AdminTokenResponse, MeResponse, StudentLogin, StudentTokenResponse,
};
use crate::schemas::student::StudentResponse;
use crate::services::check_in;

/// Max attempts per window for credential endpoints.
const AUTH_RATE_LIMIT: u64 = 10;
/// Rate limit window in seconds.
const AUTH_RATE_WINDOW_SECONDS: u64 = 60;

const INVALID_ADMIN_CREDENTIALS: &str = "Incorrect username or password";
const INVALID_STUDENT_CREDENTIALS: &str = "Invalid seat number or attendance code";

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/login", post(admin_login))
        .route("/student/login", post(student_login))
        .route("/me", get(me))
}

async fn admin_login(
    State(state): State<AppState>,
    Json(payload): Json<AdminLogin>,
) -> Result<Json<AdminTokenResponse>, ApiError> {
    let rate_key = format!("rl:admin-login:{}", payload.username);
    let allowed = state
        .redis()
        .rate_limit(&rate_key, AUTH_RATE_LIMIT, AUTH_RATE_WINDOW_SECONDS)
        .await
        .unwrap_or(true);
    if !allowed {
        return Err(ApiError::TooManyRequests("Too many login attempts, try again later"));
    }

    // Unknown username and wrong password fall through to the same response.
    let admin = repositories::admins::find_by_username(state.db(), &payload.username)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load admin"))?
        .ok_or(ApiError::Unauthorized(INVALID_ADMIN_CREDENTIALS))?;

    let verified = security::verify_password(&payload.password, &admin.hashed_password)
        .map_err(|_| ApiError::Unauthorized(INVALID_ADMIN_CREDENTIALS))?;

    if !verified {
        return Err(ApiError::Unauthorized(INVALID_ADMIN_CREDENTIALS));
    }

    let token =
        security::create_access_token(&admin.id, SessionRole::Admin, None, state.settings(), None)
            .map_err(|e| ApiError::internal(e, "Failed to create access token"))?;

    Ok(Json(AdminTokenResponse {
        access_token: token,
        token_type: "bearer".to_string(),
        username: admin.username,
    }))
}

async fn student_login(
    State(state): State<AppState>,
    Json(payload): Json<StudentLogin>,
) -> Result<Json<StudentTokenResponse>, ApiError> {
    let rate_key = format!("rl:student-login:{}", payload.seat_number);
    let allowed = state
        .redis()
        .rate_limit(&rate_key, AUTH_RATE_LIMIT, AUTH_RATE_WINDOW_SECONDS)
        .await
        .unwrap_or(true);
    if !allowed {
        return Err(ApiError::TooManyRequests("Too many login attempts, try again later"));
    }

    let seat_number: i32 = payload
        .seat_number
        .trim()
        .parse()
        .map_err(|_| ApiError::Unauthorized(INVALID_STUDENT_CREDENTIALS))?;
    if seat_number < 1 {
        return Err(ApiError::Unauthorized(INVALID_STUDENT_CREDENTIALS));
    }

    let student = check_in::code_login(
        state.db(),
        state.settings().attendance(),
        state.clock().now_utc(),
        seat_number,
        payload.attendance_code.trim(),
    )
    .await
    .map_err(|err| match err {
        check_in::CheckInError::Db(e) => ApiError::internal(e, "Failed to check in student"),
        // Bad code, unset codes and the dead window all look the same.
        _ => ApiError::Unauthorized(INVALID_STUDENT_CREDENTIALS),
    })?;

    let token = security::create_access_token(
        &student.id,
        SessionRole::Student,
        Some(student.seat_number),
        state.settings(),
        None,
    )
    .map_err(|e| ApiError::internal(e, "Failed to create access token"))?;

    Ok(Json(StudentTokenResponse {
        access_token: token,
        token_type: "bearer".to_string(),
        student: StudentResponse::from_db(student),
    }))
}

async fn me(session: Session) -> Json<MeResponse> {
    let response = match session {
        Session::Admin(admin) => MeResponse::Admin { id: admin.id, username: admin.username },
        Session::Student(student) => MeResponse::Student {
            id: student.id,
            seat_number: student.seat_number,
            name: student.name,
            status: student.status,
        },
    };

    Json(response)
}
