use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{AuthRequest, AuthResponse, LoginRequest, RegisterRequest},
        categories::CategoryPayload,
        orders::{
            AdminOrder, AdminOrderItem, LoyaltyInfo, OrderItemInput, PlaceOrderRequest,
            PlaceOrderResponse, UpdateOrderStatusRequest,
        },
        products::ProductPayload,
        upload::UploadSignature,
    },
    models::{Category, Order, OrderStatus, Product, PublicUser, User},
    routes::{admin_orders, auth, categories, health, orders, products, upload, user},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::auth_action,
        user::get_profile,
        products::list_products,
        products::create_product,
        products::update_product,
        products::delete_product,
        categories::list_categories,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
        orders::place_order,
        admin_orders::list_all_orders,
        admin_orders::update_order_status,
        upload::upload_signature,
    ),
    components(
        schemas(
            User,
            PublicUser,
            Category,
            Product,
            Order,
            OrderStatus,
            AuthRequest,
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            CategoryPayload,
            ProductPayload,
            PlaceOrderRequest,
            OrderItemInput,
            LoyaltyInfo,
            PlaceOrderResponse,
            AdminOrder,
            AdminOrderItem,
            UpdateOrderStatusRequest,
            UploadSignature,
            health::HealthData,
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration and login"),
        (name = "User", description = "Own profile"),
        (name = "Products", description = "Public menu and product management"),
        (name = "Categories", description = "Category management"),
        (name = "Orders", description = "Checkout and loyalty stamps"),
        (name = "Admin", description = "Admin-only endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
