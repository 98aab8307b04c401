use chrono::Utc;
use sha2::{Digest, Sha256};

use crate::{
    config::CloudinaryConfig,
    dto::upload::UploadSignature,
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    state::AppState,
};

/// Signed payload for direct browser-to-image-host uploads. The host only
/// accepts uploads whose params match a signature produced with the API
/// secret, so handing this out is admin-gated.
pub async fn create_upload_signature(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<UploadSignature> {
    ensure_admin(state, user).await?;

    let cloudinary = state.config.cloudinary.as_ref().ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!("Cloudinary credentials are not configured"))
    })?;

    let timestamp = Utc::now().timestamp();
    let signature = sign_upload_params(cloudinary, timestamp);

    Ok(UploadSignature {
        signature,
        timestamp,
        api_key: cloudinary.api_key.clone(),
    })
}

/// SHA-256 hex digest over the alphabetically ordered upload params followed
/// by the API secret, the scheme the image host verifies on upload.
fn sign_upload_params(config: &CloudinaryConfig, timestamp: i64) -> String {
    let to_sign = format!(
        "folder={}&timestamp={}{}",
        config.folder, timestamp, config.api_secret
    );
    let digest = Sha256::digest(to_sign.as_bytes());
    format!("{digest:x}")
}
