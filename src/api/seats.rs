use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::validation::{validate_email, validate_password_len, validate_seat_number};
use crate::core::security;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::repositories::students::CreateStudent;
use crate::schemas::student::{
    CheckSeatQuery, CheckSeatResponse, SignupRequest, SignupResponse, StudentResponse,
};

/// Signup attempts allowed per window, keyed by email.
const SIGNUP_RATE_LIMIT: u64 = 10;
const SIGNUP_RATE_WINDOW_SECONDS: u64 = 60;

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/check-seat", get(check_seat)).route("/signup", post(signup))
}

/// Unauthenticated probe used by the signup form. A seat held by a bare
/// code-login row is still claimable, so it reports as available.
async fn check_seat(
    State(state): State<AppState>,
    Query(query): Query<CheckSeatQuery>,
) -> Result<Json<CheckSeatResponse>, ApiError> {
    validate_seat_number(query.seat_number)?;

    let occupant = repositories::students::find_by_seat(state.db(), query.seat_number)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to check seat"))?;

    if occupant.as_ref().map_or(false, |student| student.hashed_password.is_some()) {
        return Ok(Json(CheckSeatResponse {
            available: false,
            taken: true,
            pre_registered: false,
            name: None,
        }));
    }

    let preregistered = repositories::preregistrations::find_by_seat(state.db(), query.seat_number)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to check pre-registration"))?;

    Ok(Json(CheckSeatResponse {
        available: true,
        taken: false,
        pre_registered: preregistered.is_some(),
        name: preregistered.map(|row| row.name),
    }))
}

async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<Json<SignupResponse>, ApiError> {
    validate_seat_number(payload.seat_number)?;
    validate_email(&payload.email)?;
    validate_password_len(&payload.password)?;

    let email = payload.email.trim().to_lowercase();

    let allowed = state
        .redis()
        .rate_limit(&format!("rl:signup:{email}"), SIGNUP_RATE_LIMIT, SIGNUP_RATE_WINDOW_SECONDS)
        .await
        .unwrap_or(true);
    if !allowed {
        return Err(ApiError::TooManyRequests("Too many signup attempts, try again later"));
    }

    if repositories::students::exists_by_email(state.db(), &email)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to check email"))?
        .is_some()
    {
        return Err(email_conflict());
    }

    let hashed_password = security::hash_password(&payload.password)
        .map_err(|e| ApiError::internal(e, "Failed to hash password"))?;
    let now = primitive_now_utc();

    let mut tx = state
        .db()
        .begin()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to start signup transaction"))?;

    let occupant = repositories::students::find_by_seat(&mut *tx, payload.seat_number)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to check seat"))?;

    let roster_entry =
        repositories::preregistrations::find_by_seat(&mut *tx, payload.seat_number)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to check pre-registration"))?;
    let roster_name = roster_entry.as_ref().map(|row| row.name.as_str());

    let student = match occupant {
        Some(existing) if existing.hashed_password.is_some() => {
            return Err(seat_conflict());
        }
        // A bare code-login row gets credentials attached instead of a
        // duplicate seat insert.
        Some(existing) => {
            repositories::students::claim_seat(
                &mut *tx,
                &existing.id,
                &email,
                &hashed_password,
                roster_name,
                now,
            )
            .await
            .map_err(map_signup_constraint)?
        }
        None => {
            let id = Uuid::new_v4().to_string();
            repositories::students::create(
                &mut *tx,
                CreateStudent {
                    id: &id,
                    name: roster_name,
                    email: &email,
                    hashed_password: &hashed_password,
                    seat_number: payload.seat_number,
                    now,
                },
            )
            .await
            .map_err(map_signup_constraint)?
        }
    };

    // The roster entry is consumed once its seat has an owner.
    if roster_entry.is_some() {
        repositories::preregistrations::delete_by_seat(&mut *tx, payload.seat_number)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to consume pre-registration"))?;
    }

    tx.commit().await.map_err(map_signup_constraint)?;

    Ok(Json(SignupResponse {
        message: "Signup successful".to_string(),
        student: StudentResponse::from_db(student),
    }))
}

fn email_conflict() -> ApiError {
    ApiError::Conflict { message: "Email is already registered", code: "EMAIL_EXISTS" }
}

fn seat_conflict() -> ApiError {
    ApiError::Conflict { message: "Seat is already taken", code: "SEAT_TAKEN" }
}

/// Concurrent signups race on the unique constraints; the loser gets the same
/// conflict response as the sequential path.
fn map_signup_constraint(err: sqlx::Error) -> ApiError {
    if let sqlx::Error::Database(db_err) = &err {
        match db_err.constraint() {
            Some("students_email_key") => return email_conflict(),
            Some("students_seat_number_key") => return seat_conflict(),
            _ => {}
        }
    }
    ApiError::internal(err, "Failed to register student")
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    use crate::test_support;

    #[tokio::test]
    async fn signup_registers_a_free_seat() {
        let ctx = test_support::setup_test_context().await;

        let response = ctx
            .app
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/student/signup",
                None,
                Some(json!({
                    "email": "new@example.com",
                    "seatNumber": 11,
                    "password": "long-enough"
                })),
            ))
            .await
            .expect("signup");

        let status = response.status();
        let body = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::OK, "response: {body}");
        assert_eq!(body["student"]["seatNumber"], 11);
        assert_eq!(body["student"]["email"], "new@example.com");
        assert_eq!(body["student"]["status"], "online");
    }

    #[tokio::test]
    async fn signup_consumes_roster_entry_and_takes_its_name() {
        let ctx = test_support::setup_test_context().await;
        test_support::insert_preregistration(ctx.state.db(), "Park", 6).await;

        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/student/signup",
                None,
                Some(json!({
                    "email": "park@example.com",
                    "seatNumber": 6,
                    "password": "long-enough"
                })),
            ))
            .await
            .expect("signup");

        let body = test_support::read_json(response).await;
        assert_eq!(body["student"]["name"], "Park");

        // Probe shows the seat as taken and the roster entry gone.
        let response = ctx
            .app
            .oneshot(test_support::json_request(
                Method::GET,
                "/api/v1/student/check-seat?seatNumber=6",
                None,
                None,
            ))
            .await
            .expect("check");
        let body = test_support::read_json(response).await;
        assert_eq!(body["available"], false);
        assert_eq!(body["taken"], true);
    }

    #[tokio::test]
    async fn signup_claims_bare_code_login_row() {
        let ctx = test_support::setup_test_context().await;
        let bare_id = test_support::insert_student(ctx.state.db(), 8, None).await;

        let response = ctx
            .app
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/student/signup",
                None,
                Some(json!({
                    "email": "claim@example.com",
                    "seatNumber": 8,
                    "password": "long-enough"
                })),
            ))
            .await
            .expect("signup");

        let status = response.status();
        let body = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::OK, "response: {body}");
        // The existing row is claimed, not duplicated.
        assert_eq!(body["student"]["id"], bare_id);
        assert_eq!(body["student"]["email"], "claim@example.com");
    }

    #[tokio::test]
    async fn signup_conflicts_carry_machine_codes() {
        let ctx = test_support::setup_test_context().await;
        test_support::insert_student(ctx.state.db(), 2, Some("dup@example.com")).await;

        let email_taken = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/student/signup",
                None,
                Some(json!({
                    "email": "dup@example.com",
                    "seatNumber": 3,
                    "password": "long-enough"
                })),
            ))
            .await
            .expect("signup");
        let email_status = email_taken.status();
        let email_body = test_support::read_json(email_taken).await;
        assert_eq!(email_status, StatusCode::BAD_REQUEST);
        assert_eq!(email_body["code"], "EMAIL_EXISTS");

        let seat_taken = ctx
            .app
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/student/signup",
                None,
                Some(json!({
                    "email": "other@example.com",
                    "seatNumber": 2,
                    "password": "long-enough"
                })),
            ))
            .await
            .expect("signup");
        let seat_status = seat_taken.status();
        let seat_body = test_support::read_json(seat_taken).await;
        assert_eq!(seat_status, StatusCode::BAD_REQUEST);
        assert_eq!(seat_body["code"], "SEAT_TAKEN");
    }

    #[tokio::test]
    async fn check_seat_reports_roster_name_for_free_seat() {
        let ctx = test_support::setup_test_context().await;
        test_support::insert_preregistration(ctx.state.db(), "Choi", 4).await;

        let response = ctx
            .app
            .oneshot(test_support::json_request(
                Method::GET,
                "/api/v1/student/check-seat?seatNumber=4",
                None,
                None,
            ))
            .await
            .expect("check");

        let body = test_support::read_json(response).await;
        assert_eq!(body["available"], true);
        assert_eq!(body["preRegistered"], true);
        assert_eq!(body["name"], "Choi");
    }

    #[tokio::test]
    async fn check_seat_on_plain_free_seat_reports_not_preregistered() {
        let ctx = test_support::setup_test_context().await;

        let response = ctx
            .app
            .oneshot(test_support::json_request(
                Method::GET,
                "/api/v1/student/check-seat?seatNumber=17",
                None,
                None,
            ))
            .await
            .expect("check");

        let body = test_support::read_json(response).await;
        assert_eq!(body["available"], true);
        assert_eq!(body["taken"], false);
        // Explicit false, not an omitted field.
        assert_eq!(body["preRegistered"], false);
    }

    #[tokio::test]
    async fn short_password_is_rejected() {
        let ctx = test_support::setup_test_context().await;

        let response = ctx
            .app
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/student/signup",
                None,
                Some(json!({
                    "email": "short@example.com",
                    "seatNumber": 12,
                    "password": "short"
                })),
            ))
            .await
            .expect("signup");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
