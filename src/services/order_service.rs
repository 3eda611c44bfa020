use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    domain::{pricing::Size, status::OrderStatus},
    dto::orders::OrderWithItems,
    entity::{
        categories::Entity as Categories,
        order_items::{self, Column as OrderItemCol, Entity as OrderItems},
        orders::{self, Entity as Orders},
        products::Entity as Products,
    },
    error::{AppError, AppResult},
    middleware::auth::AdminUser,
    models::{Order, OrderItem},
    response::{ApiResponse, Meta},
    session::SessionToken,
    state::AppState,
};

/// Turn the session cart into an immutable order document.
///
/// Display names are re-read inside the transaction so the snapshot shows
/// what the menu says right now; unit prices stay as resolved when the line
/// was added. A line whose product was deleted in the meantime is dropped
/// rather than failing the whole order.
pub async fn submit(state: &AppState, token: SessionToken) -> AppResult<ApiResponse<OrderWithItems>> {
    let table_number = state
        .sessions
        .table(token.0)?
        .ok_or(AppError::NoTable)?;

    let cart = state.sessions.cart(token.0)?;
    if cart.is_empty() {
        return Err(AppError::EmptyCart);
    }

    let txn = state.orm.begin().await?;
    let now = Utc::now();
    let order_id = Uuid::new_v4();

    let mut total = Decimal::ZERO;
    let mut line_actives = Vec::new();
    for line in cart.lines() {
        let Some(product) = Products::find_by_id(line.product_id).one(&txn).await? else {
            tracing::warn!(product_id = %line.product_id, "product no longer exists, dropping cart line");
            continue;
        };
        let category_name = Categories::find_by_id(product.category_id)
            .one(&txn)
            .await?
            .map(|c| c.name)
            .unwrap_or_default();

        total += line.subtotal;
        line_actives.push(order_items::ActiveModel {
            id: Set(Uuid::new_v4()),
            order_id: Set(order_id),
            product_id: Set(line.product_id),
            product_name: Set(product.name),
            category_name: Set(category_name),
            size: Set(line.size.map(|s| s.as_str().to_string())),
            quantity: Set(line.quantity as i32),
            unit_price: Set(line.unit_price),
            subtotal: Set(line.subtotal),
        });
    }

    if line_actives.is_empty() {
        return Err(AppError::EmptyCart);
    }

    let order = orders::ActiveModel {
        id: Set(order_id),
        table_number: Set(table_number),
        total: Set(total),
        status: Set(OrderStatus::Pendiente.as_str().to_string()),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&txn)
    .await?;

    let mut items = Vec::with_capacity(line_actives.len());
    for active in line_actives {
        items.push(order_item_from_entity(active.insert(&txn).await?)?);
    }

    txn.commit().await?;

    state.sessions.with_cart(token.0, |cart| cart.clear())?;

    tracing::info!(order_id = %order.id, table = table_number, total = %order.total, "order submitted");

    Ok(ApiResponse::success(
        "Order submitted",
        OrderWithItems {
            order: order_from_entity(order)?,
            items,
        },
        Some(Meta::empty()),
    ))
}

/// Patron-facing order view, polled while waiting for the kitchen.
pub async fn get_order(state: &AppState, id: Uuid) -> AppResult<ApiResponse<OrderWithItems>> {
    let order = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_item_from_entity)
        .collect::<AppResult<Vec<_>>>()?;

    Ok(ApiResponse::success(
        "OK",
        OrderWithItems {
            order: order_from_entity(order)?,
            items,
        },
        Some(Meta::empty()),
    ))
}

/// Any of the four statuses may be set at any time; only unknown values are
/// rejected, and on rejection the row is untouched.
pub async fn update_status(
    state: &AppState,
    admin: &AdminUser,
    id: Uuid,
    status: &str,
) -> AppResult<ApiResponse<Order>> {
    let new_status: OrderStatus = status.parse()?;

    let existing = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: orders::ActiveModel = existing.into();
    active.status = Set(new_status.as_str().to_string());
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(&admin.username),
        "order_status_update",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id, "status": order.status })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Order updated",
        order_from_entity(order)?,
        Some(Meta::empty()),
    ))
}

pub(crate) fn order_from_entity(model: orders::Model) -> AppResult<Order> {
    Ok(Order {
        id: model.id,
        table_number: model.table_number,
        total: model.total,
        status: model.status.parse()?,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}

pub(crate) fn order_item_from_entity(model: order_items::Model) -> AppResult<OrderItem> {
    Ok(OrderItem {
        id: model.id,
        product_id: model.product_id,
        product_name: model.product_name,
        category_name: model.category_name,
        size: model
            .size
            .as_deref()
            .map(|s| s.parse::<Size>())
            .transpose()?,
        quantity: model.quantity,
        unit_price: model.unit_price,
        subtotal: model.subtotal,
    })
}
