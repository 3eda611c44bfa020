use sea_orm::entity::prelude::*;

use crate::domain::pricing::SizePrices;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub image: Option<String>,
    pub ingredients: Option<String>,
    pub price: Option<Decimal>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub size_prices: Option<SizePrices>,
    pub volume_ml: Option<i32>,
    pub weight_grams: Option<i32>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id"
    )]
    Categories,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
