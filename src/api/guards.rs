use async_trait::async_trait;
use axum::extract::{FromRequestParts, State};
use axum::http::{header, request::Parts};

use crate::api::errors::ApiError;
use crate::core::security::{self, SessionRole};
use crate::core::state::AppState;
use crate::db::models::{Admin, Student};
use crate::repositories;

/// One variant per credential flow; handlers match exhaustively instead of
/// comparing role strings.
pub(crate) enum Session {
    Admin(Admin),
    Student(Student),
}

pub(crate) struct CurrentAdmin(pub(crate) Admin);
pub(crate) struct CurrentStudent(pub(crate) Student);

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let State(app_state) = State::<AppState>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to access application state"))?;

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthorized("Invalid authentication credentials"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized("Invalid authentication credentials"))?;

        let claims = security::verify_token(token, app_state.settings())
            .map_err(|_| ApiError::Unauthorized("Invalid authentication credentials"))?;

        match claims.role {
            SessionRole::Admin => {
                let admin = repositories::admins::find_by_id(app_state.db(), &claims.sub)
                    .await
                    .map_err(|e| ApiError::internal(e, "Failed to load admin"))?
                    .ok_or(ApiError::Unauthorized("Invalid authentication credentials"))?;
                Ok(Session::Admin(admin))
            }
            SessionRole::Student => {
                let student = repositories::students::find_by_id(app_state.db(), &claims.sub)
                    .await
                    .map_err(|e| ApiError::internal(e, "Failed to load student"))?
                    .ok_or(ApiError::Unauthorized("Invalid authentication credentials"))?;
                Ok(Session::Student(student))
            }
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match Session::from_request_parts(parts, state).await? {
            Session::Admin(admin) => Ok(CurrentAdmin(admin)),
            Session::Student(_) => Err(ApiError::Unauthorized("Unauthorized")),
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentStudent {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match Session::from_request_parts(parts, state).await? {
            Session::Student(student) => Ok(CurrentStudent(student)),
            Session::Admin(_) => Err(ApiError::Unauthorized("Unauthorized")),
        }
    }
}
