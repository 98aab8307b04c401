use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CategoryPayload {
    pub name: String,
    pub display_order: Option<i32>,
}
