use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, put},
};
use uuid::Uuid;

use crate::{
    dto::orders::{AdminOrder, UpdateOrderStatusRequest},
    error::AppResult,
    extract::AppJson,
    middleware::auth::AuthUser,
    models::Order,
    services::admin_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_all_orders))
        .route("/{id}", put(update_order_status))
}

#[utoipa::path(
    get,
    path = "/api/admin-orders",
    responses(
        (status = 200, description = "All orders with customer data and items, newest first", body = [AdminOrder]),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_all_orders(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<AdminOrder>>> {
    let orders = admin_service::list_all_orders(&state, &user).await?;
    Ok(Json(orders))
}

#[utoipa::path(
    put,
    path = "/api/admin-orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Order status updated", body = Order),
        (status = 400, description = "Invalid status"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateOrderStatusRequest>,
) -> AppResult<Json<Order>> {
    let order = admin_service::update_order_status(&state, &user, id, payload).await?;
    Ok(Json(order))
}
