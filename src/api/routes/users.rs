//! User registration, lookup and login

use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, Path};
use crate::domain::user::UserRef;

#[derive(Debug, Clone, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub result: String,
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct UsernameResponse {
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct ResultResponse {
    pub result: &'static str,
}

/// POST /user/
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<CredentialsRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let user = state
        .user_service
        .register(&request.username, &request.password)
        .await?;

    Ok(Json(RegisterResponse {
        result: format!("added user with id={}", user.id()),
        id: user.id().value(),
    }))
}

/// GET /user/{user}/
pub async fn get_user(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Result<Json<UsernameResponse>, ApiError> {
    debug!(user = %user, "Getting user");

    let user = match UserRef::parse(&user) {
        UserRef::ById(id) => state.user_service.get(id).await?,
        by_name @ UserRef::ByName(_) => state.user_service.resolve(&by_name).await?,
    };

    Ok(Json(UsernameResponse {
        username: user.username().to_string(),
    }))
}

/// POST /login/
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<CredentialsRequest>,
) -> Result<Json<ResultResponse>, ApiError> {
    state
        .user_service
        .authenticate(&request.username, &request.password)
        .await?;

    Ok(Json(ResultResponse { result: "ok" }))
}
