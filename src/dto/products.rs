use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Create and update share this payload. PUT replaces the whole product, so
/// sending `old_price` or `category_id` as null (or omitting them) clears
/// the stored value; a merge would make a discount impossible to remove.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ProductPayload {
    pub name: String,
    pub description: String,
    #[schema(value_type = f64)]
    pub price: Decimal,
    #[schema(value_type = Option<f64>)]
    pub old_price: Option<Decimal>,
    pub image: String,
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub promo: bool,
}
