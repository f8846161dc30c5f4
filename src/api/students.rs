use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentAdmin;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::student::{StatusUpdateRequest, StudentResponse, StudentsDeleteQuery};

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/", get(list).put(update_status).delete(delete))
}

async fn list(
    _admin: CurrentAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<StudentResponse>>, ApiError> {
    let students = repositories::students::list_ordered(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list students"))?;

    Ok(Json(students.into_iter().map(StudentResponse::from_db).collect()))
}

async fn update_status(
    _admin: CurrentAdmin,
    State(state): State<AppState>,
    Json(payload): Json<StatusUpdateRequest>,
) -> Result<Json<Value>, ApiError> {
    let updated = repositories::students::update_status(
        state.db(),
        &payload.student_id,
        payload.status,
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update student status"))?;

    if updated == 0 {
        return Err(ApiError::NotFound("Student not found".to_string()));
    }

    Ok(Json(json!({ "message": "Status updated" })))
}

async fn delete(
    _admin: CurrentAdmin,
    State(state): State<AppState>,
    Query(query): Query<StudentsDeleteQuery>,
) -> Result<Json<Value>, ApiError> {
    if query.all.unwrap_or(false) {
        let deleted = repositories::students::delete_all(state.db())
            .await
            .map_err(|e| ApiError::internal(e, "Failed to reset students"))?;
        return Ok(Json(json!({ "message": "All students removed", "deleted": deleted })));
    }

    let id = query
        .id
        .as_deref()
        .ok_or_else(|| ApiError::BadRequest("Either id or all=true is required".to_string()))?;

    // Removing an id that is already gone still reports success.
    let deleted = repositories::students::delete_by_id(state.db(), id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete student"))?;

    Ok(Json(json!({ "message": "Student removed", "deleted": deleted })))
}
