use chrono::{Local, NaiveDate};
use qrmenu_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
    domain::pricing::{PricingKind, Size, SizePrices},
    domain::status::OrderStatus,
    dto::cart::{AddToCartRequest, UpdateCartItemRequest},
    dto::products::ProductPayload,
    dto::reports::CashReportQuery,
    entity::{categories, products},
    error::AppError,
    middleware::auth::AdminUser,
    services::{cart_service, order_service, product_service, report_service},
    session::SessionToken,
    session::SessionStore,
    state::AppState,
};
use rust_decimal::Decimal;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set, Statement};
use uuid::Uuid;

// Integration flow: patron binds a table, fills the cart, submits; admin
// moves the order through its statuses and reads the daily cash report.
// Runs as one sequential test because it truncates shared tables.
#[tokio::test]
async fn cart_checkout_and_reporting_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;
    let admin = AdminUser {
        username: "admin".to_string(),
    };

    // Seed the catalog: a size-priced category and a flat-priced one.
    let pizzas = create_category(&state, "PIZZAS", PricingKind::BySize, 1).await?;
    let bebidas = create_category(&state, "BEBIDAS", PricingKind::FlatWithVolume, 2).await?;

    let pizza = products::ActiveModel {
        id: Set(Uuid::new_v4()),
        category_id: Set(pizzas),
        name: Set("Hawaiana".to_string()),
        image: Set(None),
        ingredients: Set(Some("Jamón y piña".to_string())),
        price: Set(None),
        size_prices: Set(Some(SizePrices {
            individual: Some(Decimal::new(60, 0)),
            chica: Some(Decimal::new(90, 0)),
            mediana: Some(Decimal::new(120, 0)),
            grande: Some(Decimal::new(150, 0)),
            h4: None,
        })),
        volume_ml: Set(None),
        weight_grams: Set(None),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    let soda = products::ActiveModel {
        id: Set(Uuid::new_v4()),
        category_id: Set(bebidas),
        name: Set("Refresco de cola".to_string()),
        image: Set(None),
        ingredients: Set(None),
        price: Set(Some(Decimal::new(20, 0))),
        size_prices: Set(None),
        volume_ml: Set(Some(600)),
        weight_grams: Set(None),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    // Submitting before anything is in the cart writes no order document.
    let token = SessionToken(state.sessions.create(Some(5))?);
    let err = order_service::submit(&state, token).await.unwrap_err();
    assert!(matches!(err, AppError::EmptyCart));
    assert_eq!(order_count(&state).await?, 0);

    // Two sodas, then one medium pizza. Size is ignored for flat pricing.
    let resp = cart_service::add_item(
        &state,
        token,
        AddToCartRequest {
            product_id: soda.id,
            quantity: 2,
            size: Some(Size::Grande),
        },
    )
    .await?;
    assert_eq!(resp.data.unwrap().item_count, 2);

    let resp = cart_service::add_item(
        &state,
        token,
        AddToCartRequest {
            product_id: pizza.id,
            quantity: 1,
            size: Some(Size::Mediana),
        },
    )
    .await?;
    assert_eq!(resp.data.unwrap().item_count, 3);

    // A pizza without a size must not touch the cart.
    let err = cart_service::add_item(
        &state,
        token,
        AddToCartRequest {
            product_id: pizza.id,
            quantity: 1,
            size: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Pricing(_)));
    let view = cart_service::view_cart(&state, token)?.data.unwrap();
    assert_eq!(view.item_count, 3);
    assert_eq!(view.total, Decimal::new(160, 0));

    // A session with items but no bound table cannot check out.
    let no_table = SessionToken(state.sessions.create(None)?);
    cart_service::add_item(
        &state,
        no_table,
        AddToCartRequest {
            product_id: soda.id,
            quantity: 1,
            size: None,
        },
    )
    .await?;
    let err = order_service::submit(&state, no_table).await.unwrap_err();
    assert!(matches!(err, AppError::NoTable));

    // Dropping the quantity to zero removes that line again.
    cart_service::update_item(
        &state,
        no_table,
        UpdateCartItemRequest {
            product_id: soda.id,
            size: None,
            quantity: 0,
        },
    )?;
    assert!(
        cart_service::view_cart(&state, no_table)?
            .data
            .unwrap()
            .items
            .is_empty()
    );

    // Submit: 2 x 20 + 1 x 120 = 160.00, status pendiente, cart cleared.
    let submitted = order_service::submit(&state, token).await?.data.unwrap();
    assert_eq!(submitted.order.total, Decimal::new(160, 0));
    assert_eq!(submitted.order.status, OrderStatus::Pendiente);
    assert_eq!(submitted.order.table_number, 5);
    assert_eq!(submitted.items.len(), 2);
    assert_eq!(order_count(&state).await?, 1);
    assert_eq!(
        cart_service::view_cart(&state, token)?.data.unwrap().item_count,
        0
    );

    // Later product edits must not rewrite the snapshot.
    product_service::update_product(
        &state,
        &admin,
        soda.id,
        ProductPayload {
            name: "Refresco grande".to_string(),
            image: None,
            ingredients: None,
            price: Some(Decimal::new(35, 0)),
            size_prices: None,
            volume_ml: Some(1000),
            weight_grams: None,
        },
    )
    .await?;
    let fetched = order_service::get_order(&state, submitted.order.id)
        .await?
        .data
        .unwrap();
    let soda_line = fetched
        .items
        .iter()
        .find(|i| i.product_id == soda.id)
        .expect("soda line");
    assert_eq!(soda_line.product_name, "Refresco de cola");
    assert_eq!(soda_line.unit_price, Decimal::new(20, 0));
    assert_eq!(fetched.order.total, Decimal::new(160, 0));

    // Round-trip for a small pizza: the snapshotted unit price is exactly
    // the chica entry of the size table.
    let second = SessionToken(state.sessions.create(Some(2))?);
    cart_service::add_item(
        &state,
        second,
        AddToCartRequest {
            product_id: pizza.id,
            quantity: 1,
            size: Some(Size::Chica),
        },
    )
    .await?;
    let chica_order = order_service::submit(&state, second).await?.data.unwrap();
    assert_eq!(chica_order.items[0].unit_price, Decimal::new(90, 0));
    assert_eq!(chica_order.items[0].size, Some(Size::Chica));
    assert_eq!(chica_order.order.total, Decimal::new(90, 0));

    // Unknown status is rejected and the row stays untouched.
    let err = order_service::update_status(&state, &admin, submitted.order.id, "cancelado")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidStatus(_)));
    let unchanged = order_service::get_order(&state, submitted.order.id)
        .await?
        .data
        .unwrap();
    assert_eq!(unchanged.order.status, OrderStatus::Pendiente);

    // Valid transition; active board shows the order until it completes.
    order_service::update_status(&state, &admin, submitted.order.id, "en_preparacion").await?;
    let active = report_service::list_active_orders(&state).await?.data.unwrap();
    assert!(active.items.iter().any(|o| o.id == submitted.order.id));

    order_service::update_status(&state, &admin, submitted.order.id, "completado").await?;
    let completed = report_service::list_recent_completed(&state)
        .await?
        .data
        .unwrap();
    assert!(completed.items.iter().any(|o| o.id == submitted.order.id));

    // Today's cash report includes the order; completed-only agrees.
    let today = Local::now().date_naive();
    let report = report_service::cash_report(
        &state,
        CashReportQuery {
            from: today,
            to: None,
            completed_only: Some(true),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(report.count, 1);
    assert_eq!(report.total, Decimal::new(160, 0));
    assert_eq!(report.average, Decimal::new(160, 0));

    // A day with no orders aggregates to all zeroes.
    let empty = report_service::cash_report(
        &state,
        CashReportQuery {
            from: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            to: None,
            completed_only: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(empty.count, 0);
    assert_eq!(empty.total, Decimal::ZERO);
    assert_eq!(empty.average, Decimal::ZERO);

    Ok(())
}

async fn order_count(state: &AppState) -> anyhow::Result<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders")
        .fetch_one(&state.pool)
        .await?;
    Ok(count)
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE order_items, orders, products, categories, audit_logs RESTART IDENTITY CASCADE",
    ))
    .await?;

    Ok(AppState {
        pool,
        orm,
        sessions: SessionStore::new(),
        config: test_config(database_url),
    })
}

fn test_config(database_url: &str) -> AppConfig {
    AppConfig {
        database_url: database_url.to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        admin_user: "admin".to_string(),
        admin_pass: "adminpass123".to_string(),
        upload_dir: "static/uploads".to_string(),
        table_count: 13,
        max_upload_bytes: 1024 * 1024,
    }
}

async fn create_category(
    state: &AppState,
    name: &str,
    kind: PricingKind,
    display_order: i32,
) -> anyhow::Result<Uuid> {
    let category = categories::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        description: Set(None),
        display_order: Set(display_order),
        image: Set(None),
        pricing_kind: Set(kind.as_str().to_string()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(category.id)
}
