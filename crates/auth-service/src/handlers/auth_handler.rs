use crate::errors::AuthError;
use crate::models::{LoginResponse, LoginUserRequest, RegisterUserRequest, UserResponse};
use crate::routes::AppState;
use crate::services::{auth_service, token_service};
use axum::{extract::State, Json};
use std::sync::Arc;

/// Handle signup
///
/// POST /auth/signup
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterUserRequest>,
) -> Result<Json<UserResponse>, AuthError> {
    let user =
        auth_service::signup(state.users.as_ref(), state.config.bcrypt_cost, payload).await?;

    Ok(Json(UserResponse::from(user)))
}

/// Handle login
///
/// POST /auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginUserRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    let user =
        auth_service::authenticate(state.users.as_ref(), &state.dummy_password_hash, &payload)
            .await?;
    let response =
        token_service::issue_login_token(&state.codec, &user, state.config.jwt_expiration())?;

    Ok(Json(response))
}
