use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{ActiveModelTrait, EntityTrait, QuerySelect, Set, TransactionTrait};
use uuid::Uuid;

use crate::{
    audit,
    dto::orders::{LoyaltyInfo, OrderReceipt, PlaceOrderRequest},
    entity::{
        order_items::ActiveModel as OrderItemActive,
        orders::ActiveModel as OrderActive,
        users::{ActiveModel as UserActive, Entity as Users},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::OrderStatus,
    state::AppState,
    validate,
};

/// A full stamp card (this many stamps) grants the reward and resets the card.
const REWARD_THRESHOLD: i32 = 10;

const REWARD_MESSAGE: &str = "Parabéns! Você ganhou um X-Burguer de graça neste pedido!";

/// The one multi-row, must-be-atomic operation in the system: increments the
/// caller's loyalty card, applies the reward reset when the card fills up and
/// records the order with its line items. Everything happens in a single
/// transaction; any failure rolls the whole scope back, including the stamp
/// update.
pub async fn place_order(
    state: &AppState,
    user: &AuthUser,
    payload: PlaceOrderRequest,
) -> AppResult<OrderReceipt> {
    // Fail fast: nothing below runs, and nothing is written, on bad input.
    validate::validate_order(&payload)?;

    let PlaceOrderRequest {
        items,
        total,
        address,
    } = payload;

    let txn = state.orm.begin().await?;

    // Locking the row serializes concurrent orders from the same user, so two
    // simultaneous checkouts cannot both read the same stamp count.
    let user_row = Users::find_by_id(user.user_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let user_row = match user_row {
        Some(u) => u,
        None => return Err(AppError::NotFound("Utilizador não encontrado.".into())),
    };

    let mut new_stamps = user_row.loyalty_stamps + 1;
    let mut reward_message = None;
    let reward_applied = new_stamps >= REWARD_THRESHOLD;
    if reward_applied {
        reward_message = Some(REWARD_MESSAGE.to_string());
        new_stamps = 0;
    }

    let mut active: UserActive = user_row.into();
    active.loyalty_stamps = Set(new_stamps);
    active.update(&txn).await?;

    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        total: Set(total),
        address: Set(address.trim().to_string()),
        reward_applied: Set(reward_applied),
        status: Set(OrderStatus::Recebido.as_str().to_string()),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    // line_no preserves the caller's cart order for deterministic read-back.
    for (line_no, item) in items.iter().enumerate() {
        OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            product_id: Set(item.id),
            name: Set(item.name.clone()),
            quantity: Set(item.quantity),
            price: Set(item.price),
            line_no: Set(line_no as i32),
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        "order_place",
        "orders",
        serde_json::json!({
            "order_id": order.id,
            "reward_applied": reward_applied,
        }),
    )
    .await;

    Ok(OrderReceipt {
        order_id: order.id,
        loyalty: LoyaltyInfo {
            new_stamp_count: new_stamps,
            reward_message,
        },
    })
}
