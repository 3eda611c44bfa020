use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CashReportQuery {
    /// First local calendar day of the range.
    pub from: NaiveDate,
    /// Last day, inclusive. Defaults to `from`.
    pub to: Option<NaiveDate>,
    /// Restrict the aggregation to completed orders.
    pub completed_only: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DailyCash {
    pub date: NaiveDate,
    pub count: i64,
    #[schema(value_type = String)]
    pub total: Decimal,
    #[schema(value_type = String)]
    pub average: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CashReport {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub completed_only: bool,
    pub count: i64,
    #[schema(value_type = String)]
    pub total: Decimal,
    #[schema(value_type = String)]
    pub average: Decimal,
    pub days: Vec<DailyCash>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardCounts {
    pub categories: i64,
    pub products: i64,
    pub active_orders: i64,
    pub completed_today: i64,
}
