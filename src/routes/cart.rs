use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, post},
};
use uuid::Uuid;

use crate::{
    dto::cart::{AddToCartRequest, CartCount, CartView, RemoveCartItemQuery, UpdateCartItemRequest},
    error::AppResult,
    response::ApiResponse,
    services::cart_service,
    session::SessionToken,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(view_cart).delete(clear_cart))
        .route("/items", post(add_item).patch(update_item))
        .route("/items/{product_id}", delete(remove_item))
}

#[utoipa::path(
    get,
    path = "/api/cart",
    responses(
        (status = 200, description = "Current cart", body = ApiResponse<CartView>),
        (status = 404, description = "Unknown session"),
    ),
    tag = "Cart"
)]
pub async fn view_cart(
    State(state): State<AppState>,
    token: SessionToken,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::view_cart(&state, token)?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/cart/items",
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Item added; returns the badge count", body = ApiResponse<CartCount>),
        (status = 404, description = "Product not found"),
        (status = 422, description = "Size not offered or price not set"),
    ),
    tag = "Cart"
)]
pub async fn add_item(
    State(state): State<AppState>,
    token: SessionToken,
    Json(payload): Json<AddToCartRequest>,
) -> AppResult<Json<ApiResponse<CartCount>>> {
    let resp = cart_service::add_item(&state, token, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/cart/items",
    request_body = UpdateCartItemRequest,
    responses(
        (status = 200, description = "Quantity updated (no-op when the line is absent)", body = ApiResponse<CartView>),
    ),
    tag = "Cart"
)]
pub async fn update_item(
    State(state): State<AppState>,
    token: SessionToken,
    Json(payload): Json<UpdateCartItemRequest>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::update_item(&state, token, payload)?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/cart/items/{product_id}",
    params(
        ("product_id" = Uuid, Path, description = "Product ID"),
        ("size" = Option<String>, Query, description = "Size selector of the line, when present")
    ),
    responses(
        (status = 200, description = "Line removed (no-op when absent)", body = ApiResponse<CartView>),
    ),
    tag = "Cart"
)]
pub async fn remove_item(
    State(state): State<AppState>,
    token: SessionToken,
    Path(product_id): Path<Uuid>,
    Query(query): Query<RemoveCartItemQuery>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::remove_item(&state, token, product_id, query.size)?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/cart",
    responses(
        (status = 200, description = "Cart cleared", body = ApiResponse<serde_json::Value>),
    ),
    tag = "Cart"
)]
pub async fn clear_cart(
    State(state): State<AppState>,
    token: SessionToken,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = cart_service::clear_cart(&state, token)?;
    Ok(Json(resp))
}
