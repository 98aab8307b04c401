use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct PlaceOrderRequest {
    pub items: Vec<OrderItemInput>,
    #[schema(value_type = f64)]
    pub total: Decimal,
    pub address: String,
}

/// One cart line as submitted by the client. Name and price are denormalized
/// into order_items at purchase time so later product edits cannot rewrite
/// order history.
#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderItemInput {
    pub id: Uuid,
    pub name: String,
    #[schema(value_type = f64)]
    pub price: Decimal,
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltyInfo {
    pub new_stamp_count: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reward_message: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlaceOrderResponse {
    pub loyalty: LoyaltyInfo,
}

/// Result handed back by the transaction manager; the route only exposes the
/// loyalty block, the order id is used by audit logging and tests.
#[derive(Debug)]
pub struct OrderReceipt {
    pub order_id: Uuid,
    pub loyalty: LoyaltyInfo,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminOrder {
    pub id: Uuid,
    #[schema(value_type = f64)]
    pub total: Decimal,
    pub address: String,
    pub reward_applied: bool,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub user_name: Option<String>,
    pub user_phone: Option<String>,
    pub items: Vec<AdminOrderItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminOrderItem {
    pub name: String,
    pub quantity: i32,
    #[schema(value_type = f64)]
    pub price: Decimal,
}
