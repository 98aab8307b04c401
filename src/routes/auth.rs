use axum::{Json, Router, extract::State, http::StatusCode, routing::post};

use crate::{
    dto::auth::{AuthRequest, AuthResponse},
    error::AppResult,
    extract::AppJson,
    services::auth_service::{login_user, register_user},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(auth_action))
}

#[utoipa::path(
    post,
    path = "/api/auth",
    request_body = AuthRequest,
    responses(
        (status = 201, description = "User registered", body = AuthResponse),
        (status = 200, description = "Login success", body = AuthResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials"),
        (status = 409, description = "Phone already registered"),
    ),
    tag = "Auth"
)]
pub async fn auth_action(
    State(state): State<AppState>,
    AppJson(payload): AppJson<AuthRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    match payload {
        AuthRequest::Register(req) => {
            let resp = register_user(&state, req).await?;
            Ok((StatusCode::CREATED, Json(resp)))
        }
        AuthRequest::Login(req) => {
            let resp = login_user(&state, req).await?;
            Ok((StatusCode::OK, Json(resp)))
        }
    }
}
