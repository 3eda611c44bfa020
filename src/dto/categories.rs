use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{domain::pricing::PricingKind, models::Category};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub display_order: i32,
    pub image: Option<String>,
    pub pricing_kind: PricingKind,
}

/// `pricing_kind` is deliberately absent: the kind is fixed at creation.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub display_order: Option<i32>,
    pub image: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryList {
    pub items: Vec<Category>,
}
