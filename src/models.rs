use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_admin: bool,
    pub loyalty_stamps: i32,
    pub created_at: DateTime<Utc>,
}

/// The profile shape returned by the API; never carries the password hash.
#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub is_admin: bool,
    pub loyalty_stamps: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub display_order: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[schema(value_type = f64)]
    pub price: Decimal,
    #[schema(value_type = Option<f64>)]
    pub old_price: Option<Decimal>,
    pub image: String,
    pub category_id: Option<Uuid>,
    pub promo: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    #[schema(value_type = f64)]
    pub total: Decimal,
    pub address: String,
    pub reward_applied: bool,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Lifecycle of an order as shown to customers and the admin panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum OrderStatus {
    #[serde(rename = "Recebido")]
    Recebido,
    #[serde(rename = "Em preparação")]
    EmPreparacao,
    #[serde(rename = "A caminho")]
    ACaminho,
    #[serde(rename = "Entregue")]
    Entregue,
    #[serde(rename = "Cancelado")]
    Cancelado,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Recebido => "Recebido",
            OrderStatus::EmPreparacao => "Em preparação",
            OrderStatus::ACaminho => "A caminho",
            OrderStatus::Entregue => "Entregue",
            OrderStatus::Cancelado => "Cancelado",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Recebido" => Some(OrderStatus::Recebido),
            "Em preparação" => Some(OrderStatus::EmPreparacao),
            "A caminho" => Some(OrderStatus::ACaminho),
            "Entregue" => Some(OrderStatus::Entregue),
            "Cancelado" => Some(OrderStatus::Cancelado),
            _ => None,
        }
    }
}
