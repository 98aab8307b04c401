use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    audit,
    dto::categories::CategoryPayload,
    entity::categories::{ActiveModel, Column, Entity as Categories, Model as CategoryModel},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Category,
    state::AppState,
    validate,
};

pub async fn list_categories(state: &AppState) -> AppResult<Vec<Category>> {
    let categories = Categories::find()
        .order_by_asc(Column::DisplayOrder)
        .order_by_asc(Column::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(category_from_entity)
        .collect();

    Ok(categories)
}

pub async fn create_category(
    state: &AppState,
    user: &AuthUser,
    payload: CategoryPayload,
) -> AppResult<Category> {
    ensure_admin(state, user).await?;
    validate::validate_category(&payload)?;

    let category = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        display_order: Set(payload.display_order.unwrap_or(0)),
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        "category_create",
        "categories",
        serde_json::json!({ "category_id": category.id }),
    )
    .await;

    Ok(category_from_entity(category))
}

pub async fn update_category(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: CategoryPayload,
) -> AppResult<Category> {
    ensure_admin(state, user).await?;
    validate::validate_category(&payload)?;

    let existing = Categories::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(c) => c,
        None => return Err(AppError::NotFound("Categoria não encontrada.".into())),
    };

    let mut active: ActiveModel = existing.into();
    active.name = Set(payload.name);
    if let Some(display_order) = payload.display_order {
        active.display_order = Set(display_order);
    }
    let category = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        "category_update",
        "categories",
        serde_json::json!({ "category_id": category.id }),
    )
    .await;

    Ok(category_from_entity(category))
}

/// Deleting a category never cascades into products: the FK is declared
/// ON DELETE SET NULL, so dependent products just lose their reference.
pub async fn delete_category(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<()> {
    ensure_admin(state, user).await?;

    let result = Categories::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Categoria não encontrada.".into()));
    }

    audit::record(
        &state.pool,
        Some(user.user_id),
        "category_delete",
        "categories",
        serde_json::json!({ "category_id": id }),
    )
    .await;

    Ok(())
}

fn category_from_entity(model: CategoryModel) -> Category {
    Category {
        id: model.id,
        name: model.name,
        display_order: model.display_order,
    }
}
