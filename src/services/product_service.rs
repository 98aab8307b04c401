use std::collections::BTreeMap;

use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    audit,
    dto::products::ProductPayload,
    entity::{
        Categories,
        products::{ActiveModel, Column, Entity as Products, Model as ProductModel},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Product,
    state::AppState,
    validate,
};

/// Bucket name for active products whose category was deleted.
const UNCATEGORIZED: &str = "Sem categoria";

/// Public menu: active products only, grouped by category name. Buckets keep
/// the categories' display order, uncategorized products come last.
pub async fn list_products_grouped(state: &AppState) -> AppResult<serde_json::Value> {
    let rows = Products::find()
        .filter(Column::IsActive.eq(true))
        .order_by_desc(Column::CreatedAt)
        .find_also_related(Categories)
        .all(&state.orm)
        .await?;

    let mut buckets: BTreeMap<(i32, String), Vec<Product>> = BTreeMap::new();
    for (product, category) in rows {
        let key = match &category {
            Some(c) => (c.display_order, c.name.clone()),
            None => (i32::MAX, UNCATEGORIZED.to_string()),
        };
        buckets
            .entry(key)
            .or_default()
            .push(product_from_entity(product));
    }

    let mut grouped = serde_json::Map::new();
    for ((_, name), products) in buckets {
        let value = serde_json::to_value(products)
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;
        grouped.insert(name, value);
    }

    Ok(serde_json::Value::Object(grouped))
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: ProductPayload,
) -> AppResult<Product> {
    ensure_admin(state, user).await?;
    validate::validate_product(&payload)?;

    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        description: Set(payload.description),
        price: Set(payload.price),
        old_price: Set(payload.old_price),
        image: Set(payload.image),
        category_id: Set(payload.category_id),
        promo: Set(payload.promo),
        is_active: Set(true),
        created_at: NotSet,
    };
    let product = active.insert(&state.orm).await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        "product_create",
        "products",
        serde_json::json!({ "product_id": product.id }),
    )
    .await;

    Ok(product_from_entity(product))
}

/// Full replace: every column comes from the payload, so a null or omitted
/// `old_price`/`category_id` clears the stored value.
pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: ProductPayload,
) -> AppResult<Product> {
    ensure_admin(state, user).await?;
    validate::validate_product(&payload)?;

    let existing = Products::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(p) => p,
        None => return Err(AppError::NotFound("Produto não encontrado.".into())),
    };

    let mut active: ActiveModel = existing.into();
    active.name = Set(payload.name);
    active.description = Set(payload.description);
    active.price = Set(payload.price);
    active.old_price = Set(payload.old_price);
    active.image = Set(payload.image);
    active.category_id = Set(payload.category_id);
    active.promo = Set(payload.promo);

    let product = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        "product_update",
        "products",
        serde_json::json!({ "product_id": product.id }),
    )
    .await;

    Ok(product_from_entity(product))
}

/// Soft delete: the product disappears from the public menu but stays
/// referenced by historical order items.
pub async fn delete_product(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<()> {
    ensure_admin(state, user).await?;

    let existing = Products::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(p) => p,
        None => return Err(AppError::NotFound("Produto não encontrado.".into())),
    };

    let mut active: ActiveModel = existing.into();
    active.is_active = Set(false);
    active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        "product_delete",
        "products",
        serde_json::json!({ "product_id": id }),
    )
    .await;

    Ok(())
}

fn product_from_entity(model: ProductModel) -> Product {
    Product {
        id: model.id,
        name: model.name,
        description: model.description,
        price: model.price,
        old_price: model.old_price,
        image: model.image,
        category_id: model.category_id,
        promo: model.promo,
        is_active: model.is_active,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
