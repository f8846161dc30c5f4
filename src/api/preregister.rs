use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentAdmin;
use crate::api::validation::validate_seat_number;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::preregister::{
    BulkReplaceRequest, PreRegisteredResponse, PreregisterCreate, PreregisterDeleteQuery,
};

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/", get(list).post(create).put(bulk_replace).delete(delete_by_seat))
}

async fn list(
    _admin: CurrentAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<PreRegisteredResponse>>, ApiError> {
    let rows = repositories::preregistrations::list_ordered(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list pre-registrations"))?;

    Ok(Json(rows.into_iter().map(PreRegisteredResponse::from_db).collect()))
}

async fn create(
    _admin: CurrentAdmin,
    State(state): State<AppState>,
    Json(payload): Json<PreregisterCreate>,
) -> Result<Json<PreRegisteredResponse>, ApiError> {
    let name = validate_entry(&payload)?;

    // A seat already held by a credentialed student cannot be pre-assigned.
    let occupant = repositories::students::find_by_seat(state.db(), payload.seat_number)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to check seat occupancy"))?;
    if occupant.map_or(false, |student| student.hashed_password.is_some()) {
        return Err(ApiError::Conflict {
            message: "Seat is already taken by a registered student",
            code: "SEAT_TAKEN",
        });
    }

    let row = repositories::preregistrations::upsert(
        state.db(),
        name,
        payload.seat_number,
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to store pre-registration"))?;

    Ok(Json(PreRegisteredResponse::from_db(row)))
}

async fn bulk_replace(
    _admin: CurrentAdmin,
    State(state): State<AppState>,
    Json(payload): Json<BulkReplaceRequest>,
) -> Result<Json<Vec<PreRegisteredResponse>>, ApiError> {
    let mut entries = Vec::with_capacity(payload.students.len());
    for entry in &payload.students {
        let name = validate_entry(entry)?;
        entries.push((name.to_string(), entry.seat_number));
    }

    let rows =
        repositories::preregistrations::replace_all(state.db(), &entries, primitive_now_utc())
            .await
            .map_err(|e| ApiError::internal(e, "Failed to replace pre-registrations"))?;

    Ok(Json(rows.into_iter().map(PreRegisteredResponse::from_db).collect()))
}

async fn delete_by_seat(
    _admin: CurrentAdmin,
    State(state): State<AppState>,
    Query(query): Query<PreregisterDeleteQuery>,
) -> Result<Json<Value>, ApiError> {
    validate_seat_number(query.seat_number)?;

    // Deleting a seat that was never pre-registered is not an error.
    let deleted = repositories::preregistrations::delete_by_seat(state.db(), query.seat_number)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete pre-registration"))?;

    Ok(Json(json!({ "message": "Pre-registration removed", "deleted": deleted })))
}

fn validate_entry(entry: &PreregisterCreate) -> Result<&str, ApiError> {
    validate_seat_number(entry.seat_number)?;
    let name = entry.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("Name must not be empty".to_string()));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    use crate::test_support;

    #[tokio::test]
    async fn create_and_list_roster() {
        let ctx = test_support::setup_test_context().await;
        let token = test_support::admin_token(&ctx).await;

        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/admin/preregister",
                Some(&token),
                Some(json!({"name": "Kim", "seatNumber": 3})),
            ))
            .await
            .expect("post");
        let status = response.status();
        let body = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::OK, "response: {body}");
        assert_eq!(body["name"], "Kim");
        assert_eq!(body["seatNumber"], 3);

        let response = ctx
            .app
            .oneshot(test_support::json_request(
                Method::GET,
                "/api/v1/admin/preregister",
                Some(&token),
                None,
            ))
            .await
            .expect("get");
        let body = test_support::read_json(response).await;
        assert_eq!(body.as_array().map(Vec::len), Some(1));
        assert_eq!(body[0]["name"], "Kim");
    }

    #[tokio::test]
    async fn bulk_replace_skips_duplicate_seats() {
        let ctx = test_support::setup_test_context().await;
        let token = test_support::admin_token(&ctx).await;

        ctx.app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/admin/preregister",
                Some(&token),
                Some(json!({"name": "Old", "seatNumber": 1})),
            ))
            .await
            .expect("seed");

        let response = ctx
            .app
            .oneshot(test_support::json_request(
                Method::PUT,
                "/api/v1/admin/preregister",
                Some(&token),
                Some(json!({"students": [
                    {"name": "Ana", "seatNumber": 2},
                    {"name": "Bo", "seatNumber": 3},
                    {"name": "Bo again", "seatNumber": 3}
                ]})),
            ))
            .await
            .expect("put");

        let status = response.status();
        let body = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::OK, "response: {body}");
        // Old roster gone, first occurrence of a repeated seat wins.
        assert_eq!(body.as_array().map(Vec::len), Some(2));
        assert_eq!(body[0]["seatNumber"], 2);
        assert_eq!(body[1]["seatNumber"], 3);
        assert_eq!(body[1]["name"], "Bo");
    }

    #[tokio::test]
    async fn delete_unknown_seat_is_a_noop() {
        let ctx = test_support::setup_test_context().await;
        let token = test_support::admin_token(&ctx).await;

        let response = ctx
            .app
            .oneshot(test_support::json_request(
                Method::DELETE,
                "/api/v1/admin/preregister?seatNumber=99",
                Some(&token),
                None,
            ))
            .await
            .expect("delete");

        let status = response.status();
        let body = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::OK, "response: {body}");
        assert_eq!(body["deleted"], 0);
    }

    #[tokio::test]
    async fn seat_held_by_registered_student_is_rejected() {
        let ctx = test_support::setup_test_context().await;
        let token = test_support::admin_token(&ctx).await;
        test_support::insert_student(ctx.state.db(), 5, Some("taken@example.com")).await;

        let response = ctx
            .app
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/admin/preregister",
                Some(&token),
                Some(json!({"name": "Late", "seatNumber": 5})),
            ))
            .await
            .expect("post");

        let status = response.status();
        let body = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "response: {body}");
        assert_eq!(body["code"], "SEAT_TAKEN");
    }
}
