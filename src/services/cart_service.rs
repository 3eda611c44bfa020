use sea_orm::EntityTrait;
use uuid::Uuid;

use crate::{
    domain::pricing::{self, PricingKind, Size},
    dto::cart::{AddToCartRequest, CartCount, CartView, UpdateCartItemRequest},
    entity::{categories::Entity as Categories, products::Entity as Products},
    error::{AppError, AppResult},
    response::{ApiResponse, Meta},
    session::SessionToken,
    state::AppState,
};

pub fn view_cart(state: &AppState, token: SessionToken) -> AppResult<ApiResponse<CartView>> {
    let cart = state.sessions.cart(token.0)?;
    Ok(ApiResponse::success("OK", CartView::from(&cart), None))
}

/// Resolve the price first; the cart is only touched once the line is known
/// to be sellable.
pub async fn add_item(
    state: &AppState,
    token: SessionToken,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartCount>> {
    if payload.quantity == 0 {
        return Err(AppError::Validation(
            "quantity must be greater than 0".to_string(),
        ));
    }

    let product = Products::find_by_id(payload.product_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let category = Categories::find_by_id(product.category_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let kind: PricingKind = category.pricing_kind.parse()?;

    let unit_price = pricing::resolve(
        kind,
        product.price,
        product.size_prices.as_ref(),
        payload.size,
    )?;

    let item_count = state.sessions.with_cart(token.0, |cart| {
        cart.add(
            product.id,
            product.name.clone(),
            payload.size,
            payload.quantity,
            unit_price,
        )
    })?;

    Ok(ApiResponse::success(
        "Added to cart",
        CartCount { item_count },
        None,
    ))
}

/// Quantity 0 or less removes the line; an unknown line is a silent no-op.
pub fn update_item(
    state: &AppState,
    token: SessionToken,
    payload: UpdateCartItemRequest,
) -> AppResult<ApiResponse<CartView>> {
    let cart = state.sessions.with_cart(token.0, |cart| {
        cart.update_quantity(payload.product_id, payload.size, payload.quantity);
        cart.clone()
    })?;

    Ok(ApiResponse::success(
        "Cart updated",
        CartView::from(&cart),
        None,
    ))
}

pub fn remove_item(
    state: &AppState,
    token: SessionToken,
    product_id: Uuid,
    size: Option<Size>,
) -> AppResult<ApiResponse<CartView>> {
    let cart = state.sessions.with_cart(token.0, |cart| {
        cart.remove(product_id, size);
        cart.clone()
    })?;

    Ok(ApiResponse::success(
        "Removed from cart",
        CartView::from(&cart),
        None,
    ))
}

pub fn clear_cart(
    state: &AppState,
    token: SessionToken,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state.sessions.with_cart(token.0, |cart| cart.clear())?;
    Ok(ApiResponse::success(
        "Cart cleared",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
