use crate::errors::AuthError;
use crate::middleware::Principal;
use crate::models::UserResponse;
use crate::routes::AppState;
use crate::services::user_service;
use axum::{extract::State, Json};
use std::sync::Arc;

/// Current user
///
/// GET /users/me
pub async fn authenticated_user(principal: Principal) -> Json<UserResponse> {
    tracing::debug!(target: "auth.handlers.user", user_id = principal.user().id, "Fetching current user");
    Json(UserResponse::from(principal.user()))
}

/// All users
///
/// GET /users/
pub async fn all_users(
    State(state): State<Arc<AppState>>,
    _principal: Principal,
) -> Result<Json<Vec<UserResponse>>, AuthError> {
    let users = user_service::all_users(state.users.as_ref()).await?;
    Ok(Json(users.iter().map(UserResponse::from).collect()))
}
