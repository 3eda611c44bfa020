use qrmenu_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    domain::pricing::{PricingKind, SizePrices},
    entity::{
        categories::{self, Entity as Categories},
        products::{self, Entity as Products},
    },
};
use rust_decimal::Decimal;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    let pizzas = ensure_category(
        &orm,
        "PIZZAS",
        "Pizzas al horno de piedra",
        1,
        PricingKind::BySize,
    )
    .await?;
    let bebidas = ensure_category(
        &orm,
        "BEBIDAS",
        "Refrescos y aguas frescas",
        2,
        PricingKind::FlatWithVolume,
    )
    .await?;
    let complementos = ensure_category(
        &orm,
        "COMPLEMENTOS",
        "Alitas, pastas y más",
        3,
        PricingKind::FlatWithWeight,
    )
    .await?;

    ensure_pizza(
        &orm,
        pizzas,
        "Hawaiana",
        "Jamón, piña y queso mozzarella",
        [60, 90, 120, 150, 180],
    )
    .await?;
    ensure_pizza(
        &orm,
        pizzas,
        "Pepperoni",
        "Pepperoni y queso mozzarella",
        [60, 90, 120, 150, 180],
    )
    .await?;
    ensure_drink(&orm, bebidas, "Refresco de cola", 20, 600).await?;
    ensure_drink(&orm, bebidas, "Agua de horchata", 25, 1000).await?;
    ensure_side(
        &orm,
        complementos,
        "Alitas BBQ",
        95,
        450,
        Some("Alitas bañadas en salsa BBQ"),
    )
    .await?;
    ensure_side(
        &orm,
        complementos,
        "Papa al Horno",
        45,
        300,
        Some("Papa con mantequilla, crema y queso"),
    )
    .await?;

    println!("Seed completed");
    Ok(())
}

async fn ensure_category(
    orm: &DatabaseConnection,
    name: &str,
    description: &str,
    display_order: i32,
    kind: PricingKind,
) -> anyhow::Result<Uuid> {
    if let Some(existing) = Categories::find()
        .filter(categories::Column::Name.eq(name))
        .one(orm)
        .await?
    {
        return Ok(existing.id);
    }

    let category = categories::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        description: Set(Some(description.to_string())),
        display_order: Set(display_order),
        image: Set(None),
        pricing_kind: Set(kind.as_str().to_string()),
        created_at: NotSet,
    }
    .insert(orm)
    .await?;

    println!("Created category {name}");
    Ok(category.id)
}

async fn product_exists(
    orm: &DatabaseConnection,
    category_id: Uuid,
    name: &str,
) -> anyhow::Result<bool> {
    Ok(Products::find()
        .filter(products::Column::CategoryId.eq(category_id))
        .filter(products::Column::Name.eq(name))
        .one(orm)
        .await?
        .is_some())
}

async fn ensure_pizza(
    orm: &DatabaseConnection,
    category_id: Uuid,
    name: &str,
    ingredients: &str,
    prices: [i64; 5],
) -> anyhow::Result<()> {
    if product_exists(orm, category_id, name).await? {
        return Ok(());
    }

    products::ActiveModel {
        id: Set(Uuid::new_v4()),
        category_id: Set(category_id),
        name: Set(name.to_string()),
        image: Set(None),
        ingredients: Set(Some(ingredients.to_string())),
        price: Set(None),
        size_prices: Set(Some(SizePrices {
            individual: Some(Decimal::new(prices[0], 0)),
            chica: Some(Decimal::new(prices[1], 0)),
            mediana: Some(Decimal::new(prices[2], 0)),
            grande: Some(Decimal::new(prices[3], 0)),
            h4: Some(Decimal::new(prices[4], 0)),
        })),
        volume_ml: Set(None),
        weight_grams: Set(None),
        created_at: NotSet,
    }
    .insert(orm)
    .await?;

    println!("Created pizza {name}");
    Ok(())
}

async fn ensure_drink(
    orm: &DatabaseConnection,
    category_id: Uuid,
    name: &str,
    price: i64,
    volume_ml: i32,
) -> anyhow::Result<()> {
    if product_exists(orm, category_id, name).await? {
        return Ok(());
    }

    products::ActiveModel {
        id: Set(Uuid::new_v4()),
        category_id: Set(category_id),
        name: Set(name.to_string()),
        image: Set(None),
        ingredients: Set(None),
        price: Set(Some(Decimal::new(price, 0))),
        size_prices: Set(None),
        volume_ml: Set(Some(volume_ml)),
        weight_grams: Set(None),
        created_at: NotSet,
    }
    .insert(orm)
    .await?;

    println!("Created drink {name}");
    Ok(())
}

async fn ensure_side(
    orm: &DatabaseConnection,
    category_id: Uuid,
    name: &str,
    price: i64,
    weight_grams: i32,
    ingredients: Option<&str>,
) -> anyhow::Result<()> {
    if product_exists(orm, category_id, name).await? {
        return Ok(());
    }

    products::ActiveModel {
        id: Set(Uuid::new_v4()),
        category_id: Set(category_id),
        name: Set(name.to_string()),
        image: Set(None),
        ingredients: Set(ingredients.map(str::to_string)),
        price: Set(Some(Decimal::new(price, 0))),
        size_prices: Set(None),
        volume_ml: Set(None),
        weight_grams: Set(Some(weight_grams)),
        created_at: NotSet,
    }
    .insert(orm)
    .await?;

    println!("Created side {name}");
    Ok(())
}
