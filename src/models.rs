use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    pricing::{PricingKind, Size, SizePrices},
    status::OrderStatus,
};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub display_order: i32,
    pub image: Option<String>,
    pub pricing_kind: PricingKind,
    pub created_at: DateTime<Utc>,
}

/// A product carries only the attributes its category's pricing kind allows;
/// everything else stays `None`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub image: Option<String>,
    pub ingredients: Option<String>,
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,
    pub size_prices: Option<SizePrices>,
    pub volume_ml: Option<i32>,
    pub weight_grams: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub table_number: i32,
    #[schema(value_type = String)]
    pub total: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Immutable line snapshotted from the cart at submission time.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub category_name: String,
    pub size: Option<Size>,
    pub quantity: i32,
    #[schema(value_type = String)]
    pub unit_price: Decimal,
    #[schema(value_type = String)]
    pub subtotal: Decimal,
}
