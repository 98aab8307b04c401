use chrono::Utc;
use sea_orm::prelude::{DateTimeWithTimeZone, Decimal};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, FromQueryResult, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::orders::{AdminOrder, AdminOrderItem, UpdateOrderStatusRequest},
    entity::{
        order_items::{Column as OrderItemCol, Entity as OrderItems},
        orders::{self, ActiveModel as OrderActive, Column as OrderCol, Entity as Orders},
        users::Column as UserCol,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Order, OrderStatus},
    state::AppState,
};

#[derive(Debug, FromQueryResult)]
struct OrderCustomerRow {
    id: Uuid,
    total: Decimal,
    address: String,
    reward_applied: bool,
    status: String,
    created_at: DateTimeWithTimeZone,
    user_name: Option<String>,
    user_phone: Option<String>,
}

/// Admin panel listing: every order, newest first, with the customer's
/// name/phone joined in and the line items nested in cart order.
pub async fn list_all_orders(state: &AppState, user: &AuthUser) -> AppResult<Vec<AdminOrder>> {
    ensure_admin(state, user).await?;

    let rows = Orders::find()
        .select_only()
        .column(OrderCol::Id)
        .column(OrderCol::Total)
        .column(OrderCol::Address)
        .column(OrderCol::RewardApplied)
        .column(OrderCol::Status)
        .column(OrderCol::CreatedAt)
        .column_as(UserCol::Name, "user_name")
        .column_as(UserCol::Phone, "user_phone")
        .join(JoinType::LeftJoin, orders::Relation::Users.def())
        .order_by_desc(OrderCol::CreatedAt)
        .into_model::<OrderCustomerRow>()
        .all(&state.orm)
        .await?;

    let mut orders = Vec::with_capacity(rows.len());
    for row in rows {
        let items = OrderItems::find()
            .filter(OrderItemCol::OrderId.eq(row.id))
            .order_by_asc(OrderItemCol::LineNo)
            .all(&state.orm)
            .await?
            .into_iter()
            .map(|item| AdminOrderItem {
                name: item.name,
                quantity: item.quantity,
                price: item.price,
            })
            .collect();

        orders.push(AdminOrder {
            id: row.id,
            total: row.total,
            address: row.address,
            reward_applied: row.reward_applied,
            status: row.status,
            created_at: row.created_at.with_timezone(&Utc),
            user_name: row.user_name,
            user_phone: row.user_phone,
            items,
        });
    }

    Ok(orders)
}

/// Status is the only mutable field of an order after creation.
pub async fn update_order_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<Order> {
    ensure_admin(state, user).await?;

    let status = OrderStatus::parse(&payload.status)
        .ok_or_else(|| AppError::Validation("Status de pedido inválido.".into()))?;

    let existing = Orders::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(o) => o,
        None => return Err(AppError::NotFound("Pedido não encontrado.".into())),
    };

    let mut active: OrderActive = existing.into();
    active.status = Set(status.as_str().to_string());
    let order = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        "order_status_update",
        "orders",
        serde_json::json!({ "order_id": order.id, "status": order.status }),
    )
    .await;

    Ok(Order {
        id: order.id,
        user_id: order.user_id,
        total: order.total,
        address: order.address,
        reward_applied: order.reward_applied,
        status: order.status,
        created_at: order.created_at.with_timezone(&Utc),
    })
}
