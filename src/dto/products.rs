use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    domain::pricing::SizePrices,
    models::{Category, Product},
};

/// Full field set for create and edit. Which fields are honored depends on
/// the owning category's pricing kind; the rest are discarded.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ProductPayload {
    pub name: String,
    pub image: Option<String>,
    pub ingredients: Option<String>,
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,
    pub size_prices: Option<SizePrices>,
    pub volume_ml: Option<i32>,
    pub weight_grams: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductList {
    pub items: Vec<Product>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryWithProducts {
    pub category: Category,
    pub products: Vec<Product>,
}
