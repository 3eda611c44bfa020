use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};

use crate::{
    domain::status::OrderStatus,
    dto::{
        orders::OrderList,
        reports::{CashReport, CashReportQuery, DailyCash, DashboardCounts},
    },
    entity::orders::{Column as OrderCol, Entity as Orders},
    error::{AppError, AppResult},
    response::{ApiResponse, Meta},
    routes::params::OrderListQuery,
    services::order_service::order_from_entity,
    state::AppState,
};

/// Kitchen board: orders still being worked, newest first.
pub async fn list_active_orders(state: &AppState) -> AppResult<ApiResponse<OrderList>> {
    let statuses: Vec<&str> = OrderStatus::ACTIVE.iter().map(|s| s.as_str()).collect();
    let items = Orders::find()
        .filter(OrderCol::Status.is_in(statuses))
        .order_by_desc(OrderCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect::<AppResult<Vec<_>>>()?;

    Ok(ApiResponse::success("Active orders", OrderList { items }, None))
}

/// Orders completed within the last 24 hours, newest first.
pub async fn list_recent_completed(state: &AppState) -> AppResult<ApiResponse<OrderList>> {
    let cutoff: DateTime<Utc> = Utc::now() - Duration::hours(24);
    let items = Orders::find()
        .filter(OrderCol::Status.eq(OrderStatus::Completado.as_str()))
        .filter(OrderCol::CreatedAt.gte(cutoff))
        .order_by_desc(OrderCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect::<AppResult<Vec<_>>>()?;

    Ok(ApiResponse::success(
        "Recently completed",
        OrderList { items },
        None,
    ))
}

/// Paginated order history with an optional status filter.
pub async fn list_orders(
    state: &AppState,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination.normalize();

    let mut condition = Condition::all();
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        let status: OrderStatus = status.parse()?;
        condition = condition.add(OrderCol::Status.eq(status.as_str()));
    }

    let finder = Orders::find()
        .filter(condition)
        .order_by_desc(OrderCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect::<AppResult<Vec<_>>>()?;

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Orders", OrderList { items }, Some(meta)))
}

/// Cash totals per local calendar day over an inclusive date range.
pub async fn cash_report(
    state: &AppState,
    query: CashReportQuery,
) -> AppResult<ApiResponse<CashReport>> {
    let from = query.from;
    let to = query.to.unwrap_or(from);
    if to < from {
        return Err(AppError::Validation(
            "'to' must not be before 'from'".to_string(),
        ));
    }
    let completed_only = query.completed_only.unwrap_or(false);

    let mut days = Vec::new();
    let mut count = 0_i64;
    let mut total = Decimal::ZERO;

    let mut day = from;
    loop {
        let (start, end) = local_day_bounds(day)?;
        let (day_count, day_total) = aggregate_orders(state, start, end, completed_only).await?;
        days.push(DailyCash {
            date: day,
            count: day_count,
            total: day_total,
            average: average(day_total, day_count),
        });
        count += day_count;
        total += day_total;

        if day == to {
            break;
        }
        day = day
            .succ_opt()
            .ok_or_else(|| AppError::Validation("date out of range".to_string()))?;
    }

    let report = CashReport {
        from,
        to,
        completed_only,
        count,
        total,
        average: average(total, count),
        days,
    };
    Ok(ApiResponse::success("Cash report", report, None))
}

/// Entity counts for the admin landing page.
pub async fn dashboard(state: &AppState) -> AppResult<ApiResponse<DashboardCounts>> {
    let (categories,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM categories")
        .fetch_one(&state.pool)
        .await?;
    let (products,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
        .fetch_one(&state.pool)
        .await?;
    let (active_orders,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM orders WHERE status IN ('pendiente', 'en_preparacion')",
    )
    .fetch_one(&state.pool)
    .await?;

    let today = Local::now().date_naive();
    let (start, end) = local_day_bounds(today)?;
    let (completed_today,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM orders WHERE created_at >= $1 AND created_at < $2 AND status = $3",
    )
    .bind(start)
    .bind(end)
    .bind(OrderStatus::Completado.as_str())
    .fetch_one(&state.pool)
    .await?;

    let data = DashboardCounts {
        categories,
        products,
        active_orders,
        completed_today,
    };
    Ok(ApiResponse::success("Dashboard", data, None))
}

async fn aggregate_orders(
    state: &AppState,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    completed_only: bool,
) -> AppResult<(i64, Decimal)> {
    let row: (i64, Option<Decimal>) = if completed_only {
        sqlx::query_as(
            "SELECT COUNT(*), SUM(total) FROM orders \
             WHERE created_at >= $1 AND created_at < $2 AND status = $3",
        )
        .bind(start)
        .bind(end)
        .bind(OrderStatus::Completado.as_str())
        .fetch_one(&state.pool)
        .await?
    } else {
        sqlx::query_as(
            "SELECT COUNT(*), SUM(total) FROM orders \
             WHERE created_at >= $1 AND created_at < $2",
        )
        .bind(start)
        .bind(end)
        .fetch_one(&state.pool)
        .await?
    };

    Ok((row.0, row.1.unwrap_or(Decimal::ZERO)))
}

fn average(total: Decimal, count: i64) -> Decimal {
    if count > 0 {
        (total / Decimal::from(count)).round_dp(2)
    } else {
        Decimal::ZERO
    }
}

/// [start, end) of one calendar day in the deployment's local time zone,
/// expressed in UTC for the timestamp comparison.
fn local_day_bounds(date: NaiveDate) -> AppResult<(DateTime<Utc>, DateTime<Utc>)> {
    let next = date
        .succ_opt()
        .ok_or_else(|| AppError::Validation("date out of range".to_string()))?;
    Ok((local_midnight(date)?, local_midnight(next)?))
}

fn local_midnight(date: NaiveDate) -> AppResult<DateTime<Utc>> {
    let naive = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| AppError::Validation("invalid date".to_string()))?;
    let local = naive
        .and_local_timezone(Local)
        .earliest()
        .ok_or_else(|| AppError::Validation("invalid local time".to_string()))?;
    Ok(local.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_of_zero_orders_is_zero() {
        assert_eq!(average(Decimal::ZERO, 0), Decimal::ZERO);
    }

    #[test]
    fn average_rounds_to_cents() {
        assert_eq!(average(Decimal::new(100, 0), 3), Decimal::new(3333, 2));
    }

    #[test]
    fn day_bounds_span_exactly_one_day() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();
        let (start, end) = local_day_bounds(date).unwrap();
        assert_eq!(end - start, Duration::hours(24));
    }
}
