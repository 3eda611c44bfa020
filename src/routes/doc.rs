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
    domain::{
        cart::CartLine,
        pricing::{PricingKind, Size, SizePrices},
        status::OrderStatus,
    },
    dto::{
        auth::{LoginRequest, LoginResponse},
        cart::{AddToCartRequest, CartCount, CartView, UpdateCartItemRequest},
        categories::{CategoryList, CreateCategoryRequest, UpdateCategoryRequest},
        orders::{OrderList, OrderWithItems},
        products::{CategoryWithProducts, ProductList, ProductPayload},
        reports::{CashReport, DailyCash, DashboardCounts},
        session::{BindTableRequest, CreateSessionRequest, SessionResponse},
    },
    models::{Category, Order, OrderItem, Product},
    response::{ApiResponse, Meta},
    routes::{admin, auth, cart, categories, health, menu, orders, params, products, session},
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
        session::create_session,
        session::current_session,
        session::bind_table,
        menu::list_categories,
        menu::show_category,
        cart::view_cart,
        cart::add_item,
        cart::update_item,
        cart::remove_item,
        cart::clear_cart,
        orders::submit_order,
        orders::get_order,
        auth::login,
        categories::list_categories,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
        categories::list_products,
        categories::create_product,
        products::get_product,
        products::update_product,
        products::delete_product,
        admin::list_orders,
        admin::active_orders,
        admin::completed_orders,
        admin::update_order_status,
        admin::cash_report,
        admin::dashboard,
        admin::upload_media
    ),
    components(
        schemas(
            Category,
            Product,
            Order,
            OrderItem,
            PricingKind,
            Size,
            SizePrices,
            OrderStatus,
            CartLine,
            CartView,
            CartCount,
            AddToCartRequest,
            UpdateCartItemRequest,
            CreateSessionRequest,
            BindTableRequest,
            SessionResponse,
            LoginRequest,
            LoginResponse,
            CreateCategoryRequest,
            UpdateCategoryRequest,
            CategoryList,
            ProductPayload,
            ProductList,
            CategoryWithProducts,
            OrderList,
            OrderWithItems,
            CashReport,
            DailyCash,
            DashboardCounts,
            admin::UpdateOrderStatusRequest,
            admin::MediaUploadResponse,
            params::Pagination,
            params::OrderListQuery,
            Meta,
            ApiResponse<Category>,
            ApiResponse<Product>,
            ApiResponse<CartView>,
            ApiResponse<OrderList>,
            ApiResponse<OrderWithItems>,
            ApiResponse<CashReport>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Session", description = "Table binding and visitor sessions"),
        (name = "Menu", description = "Public menu browsing"),
        (name = "Cart", description = "Session cart endpoints"),
        (name = "Orders", description = "Order submission and polling"),
        (name = "Admin", description = "Catalog management, order tracking and reports"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
