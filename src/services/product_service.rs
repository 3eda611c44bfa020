use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    domain::pricing::PricingKind,
    dto::products::{ProductList, ProductPayload},
    entity::{
        categories::Entity as Categories,
        products::{self, Column as ProductCol, Entity as Products},
    },
    error::{AppError, AppResult},
    middleware::auth::AdminUser,
    models::Product,
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Complementos that carry an ingredients description; everything else in a
/// weight-priced category stores none (from the house menu).
const DISHES_WITH_INGREDIENTS: [&str; 6] = [
    "spaghetti",
    "al horno",
    "spaghetti a la boloñesa",
    "papa al horno",
    "alitas bbq",
    "mango habanero",
];

fn dish_keeps_ingredients(name: &str) -> bool {
    let name = name.to_lowercase();
    DISHES_WITH_INGREDIENTS
        .iter()
        .any(|dish| name.contains(dish))
}

fn validate_flat_price(price: Option<Decimal>) -> AppResult<Option<Decimal>> {
    if let Some(p) = price {
        if p < Decimal::ZERO {
            return Err(AppError::Validation(
                "price must not be negative".to_string(),
            ));
        }
    }
    Ok(price)
}

/// Write the kind-dependent attribute set onto the active model. Attributes
/// the kind does not use are cleared, which also removes stale values such
/// as a flat price left over on a size-priced product.
fn apply_attributes(
    active: &mut products::ActiveModel,
    kind: PricingKind,
    payload: ProductPayload,
) -> AppResult<()> {
    let ProductPayload {
        name,
        image: _,
        ingredients,
        price,
        size_prices,
        volume_ml,
        weight_grams,
    } = payload;

    if name.trim().is_empty() {
        return Err(AppError::Validation("name is required".to_string()));
    }

    let (price, size_prices, volume_ml, weight_grams, ingredients) = match kind {
        PricingKind::BySize => {
            let prices = size_prices.unwrap_or_default();
            prices.validate()?;
            (None, Some(prices), None, None, ingredients)
        }
        PricingKind::FlatWithVolume => (validate_flat_price(price)?, None, volume_ml, None, None),
        PricingKind::FlatWithWeight => {
            let ingredients = if dish_keeps_ingredients(&name) {
                ingredients
            } else {
                None
            };
            (
                validate_flat_price(price)?,
                None,
                None,
                weight_grams,
                ingredients,
            )
        }
        PricingKind::Flat => (validate_flat_price(price)?, None, None, None, None),
    };

    active.name = Set(name);
    active.price = Set(price);
    active.size_prices = Set(size_prices);
    active.volume_ml = Set(volume_ml);
    active.weight_grams = Set(weight_grams);
    active.ingredients = Set(ingredients);
    Ok(())
}

/// Products of one category, sorted by name for the manage view.
pub async fn list_products(
    state: &AppState,
    category_id: Uuid,
) -> AppResult<ApiResponse<ProductList>> {
    Categories::find_by_id(category_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let items = Products::find()
        .filter(ProductCol::CategoryId.eq(category_id))
        .order_by_asc(ProductCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_from_entity)
        .collect();

    Ok(ApiResponse::success("Products", ProductList { items }, None))
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Product>> {
    let product = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success(
        "Product",
        product_from_entity(product),
        None,
    ))
}

pub async fn create_product(
    state: &AppState,
    admin: &AdminUser,
    category_id: Uuid,
    payload: ProductPayload,
) -> AppResult<ApiResponse<Product>> {
    let category = Categories::find_by_id(category_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let kind: PricingKind = category.pricing_kind.parse()?;

    let image = payload.image.clone();
    let mut active = products::ActiveModel {
        id: Set(Uuid::new_v4()),
        category_id: Set(category.id),
        name: Set(String::new()),
        image: Set(image),
        ingredients: Set(None),
        price: Set(None),
        size_prices: Set(None),
        volume_ml: Set(None),
        weight_grams: Set(None),
        created_at: NotSet,
    };
    apply_attributes(&mut active, kind, payload)?;

    let product = active.insert(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(&admin.username),
        "product_create",
        Some("products"),
        Some(serde_json::json!({ "product_id": product.id, "category_id": category_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Product created",
        product_from_entity(product),
        Some(Meta::empty()),
    ))
}

pub async fn update_product(
    state: &AppState,
    admin: &AdminUser,
    id: Uuid,
    payload: ProductPayload,
) -> AppResult<ApiResponse<Product>> {
    let existing = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let category = Categories::find_by_id(existing.category_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let kind: PricingKind = category.pricing_kind.parse()?;

    // A missing image in the payload keeps the stored one.
    let image = payload.image.clone().or_else(|| existing.image.clone());
    let mut active: products::ActiveModel = existing.into();
    apply_attributes(&mut active, kind, payload)?;
    active.image = Set(image);

    let product = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(&admin.username),
        "product_update",
        Some("products"),
        Some(serde_json::json!({ "product_id": product.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Product updated",
        product_from_entity(product),
        Some(Meta::empty()),
    ))
}

pub async fn delete_product(
    state: &AppState,
    admin: &AdminUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = Products::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(&admin.username),
        "product_delete",
        Some("products"),
        Some(serde_json::json!({ "product_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Product deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

fn product_from_entity(model: products::Model) -> Product {
    Product {
        id: model.id,
        category_id: model.category_id,
        name: model.name,
        image: model.image,
        ingredients: model.ingredients,
        price: model.price,
        size_prices: model.size_prices,
        volume_ml: model.volume_ml,
        weight_grams: model.weight_grams,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ingredient_allow_list_matches_case_insensitively() {
        assert!(dish_keeps_ingredients("Alitas BBQ (orden grande)"));
        assert!(dish_keeps_ingredients("Papa al Horno"));
        assert!(!dish_keeps_ingredients("Orden de pan"));
    }

    #[test]
    fn negative_flat_price_is_rejected() {
        assert!(validate_flat_price(Some(Decimal::new(-1, 0))).is_err());
        assert!(validate_flat_price(Some(Decimal::ZERO)).is_ok());
        assert!(validate_flat_price(None).is_ok());
    }
}
