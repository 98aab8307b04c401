use serde::Serialize;
use utoipa::ToSchema;

/// Time-boxed signed payload the admin frontend uses for direct
/// browser-to-image-host uploads.
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadSignature {
    pub signature: String,
    pub timestamp: i64,
    pub api_key: String,
}
