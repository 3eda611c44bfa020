use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::{
        categories::{CategoryList, CreateCategoryRequest, UpdateCategoryRequest},
        products::CategoryWithProducts,
    },
    entity::{
        categories::{self, Column as CategoryCol, Entity as Categories},
        products::{Column as ProductCol, Entity as Products},
    },
    error::{AppError, AppResult},
    middleware::auth::AdminUser,
    models::{Category, Product},
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Menu index: categories in display order, ties broken by creation time.
pub async fn list_categories(state: &AppState) -> AppResult<ApiResponse<CategoryList>> {
    let items = Categories::find()
        .order_by_asc(CategoryCol::DisplayOrder)
        .order_by_asc(CategoryCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(category_from_entity)
        .collect::<AppResult<Vec<_>>>()?;

    Ok(ApiResponse::success(
        "Categories",
        CategoryList { items },
        None,
    ))
}

/// Category page: the category plus its products sorted by name.
pub async fn get_category_with_products(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<CategoryWithProducts>> {
    let category = Categories::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let products = Products::find()
        .filter(ProductCol::CategoryId.eq(id))
        .order_by_asc(ProductCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_from_entity)
        .collect();

    let data = CategoryWithProducts {
        category: category_from_entity(category)?,
        products,
    };
    Ok(ApiResponse::success("Category", data, None))
}

pub async fn create_category(
    state: &AppState,
    admin: &AdminUser,
    payload: CreateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("name is required".to_string()));
    }

    let active = categories::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        description: Set(payload.description),
        display_order: Set(payload.display_order),
        image: Set(payload.image),
        pricing_kind: Set(payload.pricing_kind.as_str().to_string()),
        created_at: NotSet,
    };
    let category = active.insert(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(&admin.username),
        "category_create",
        Some("categories"),
        Some(serde_json::json!({ "category_id": category.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Category created",
        category_from_entity(category)?,
        Some(Meta::empty()),
    ))
}

/// The pricing kind is fixed at creation and cannot be edited.
pub async fn update_category(
    state: &AppState,
    admin: &AdminUser,
    id: Uuid,
    payload: UpdateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    let existing = Categories::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: categories::ActiveModel = existing.into();
    if let Some(name) = payload.name {
        if name.trim().is_empty() {
            return Err(AppError::Validation("name is required".to_string()));
        }
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(display_order) = payload.display_order {
        active.display_order = Set(display_order);
    }
    if let Some(image) = payload.image {
        active.image = Set(Some(image));
    }

    let category = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(&admin.username),
        "category_update",
        Some("categories"),
        Some(serde_json::json!({ "category_id": category.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Category updated",
        category_from_entity(category)?,
        Some(Meta::empty()),
    ))
}

/// Deletion requires the category to own no products; this keeps orphaned
/// products out of the catalog.
pub async fn delete_category(
    state: &AppState,
    admin: &AdminUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let product_count = Products::find()
        .filter(ProductCol::CategoryId.eq(id))
        .count(&state.orm)
        .await?;
    if product_count > 0 {
        return Err(AppError::Validation(format!(
            "category still has {product_count} products"
        )));
    }

    let result = Categories::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(&admin.username),
        "category_delete",
        Some("categories"),
        Some(serde_json::json!({ "category_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Category deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

fn category_from_entity(model: categories::Model) -> AppResult<Category> {
    Ok(Category {
        id: model.id,
        name: model.name,
        description: model.description,
        display_order: model.display_order,
        image: model.image,
        pricing_kind: model.pricing_kind.parse()?,
        created_at: model.created_at.with_timezone(&Utc),
    })
}

fn product_from_entity(model: crate::entity::products::Model) -> Product {
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
