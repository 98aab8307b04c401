use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::upload::UploadSignature,
    error::AppResult,
    middleware::auth::AuthUser,
    services::upload_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(upload_signature))
}

#[utoipa::path(
    get,
    path = "/api/upload-signature",
    responses(
        (status = 200, description = "Signed payload for direct image upload", body = UploadSignature),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn upload_signature(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<UploadSignature>> {
    let signature = upload_service::create_upload_signature(&state, &user).await?;
    Ok(Json(signature))
}
