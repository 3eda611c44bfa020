use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    routing::{get, patch, post},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::{
        orders::OrderList,
        reports::{CashReport, CashReportQuery, DashboardCounts},
    },
    error::{AppError, AppResult},
    media,
    middleware::auth::AdminUser,
    models::Order,
    response::{ApiResponse, Meta},
    routes::{auth, categories, params::OrderListQuery, products},
    services::{order_service, report_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .nest("/categories", categories::router())
        .nest("/products", products::router())
        .route("/orders", get(list_orders))
        .route("/orders/active", get(active_orders))
        .route("/orders/completed", get(completed_orders))
        .route("/orders/{id}/status", patch(update_order_status))
        .route("/reports/cash", get(cash_report))
        .route("/dashboard", get(dashboard))
        .route("/media", post(upload_media))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MediaUploadResponse {
    pub path: String,
}

#[utoipa::path(
    get,
    path = "/api/admin/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "Filter by status")
    ),
    responses(
        (status = 200, description = "Order history", body = ApiResponse<OrderList>),
        (status = 400, description = "Unknown status filter"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = report_service::list_orders(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders/active",
    responses(
        (status = 200, description = "Pending and in-preparation orders, newest first", body = ApiResponse<OrderList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn active_orders(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = report_service::list_active_orders(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders/completed",
    responses(
        (status = 200, description = "Orders completed in the last 24 hours, newest first", body = ApiResponse<OrderList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn completed_orders(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = report_service::list_recent_completed(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/orders/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<Order>),
        (status = 400, description = "Unknown status value"),
        (status = 404, description = "Order not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::update_status(&state, &admin, id, &payload.status).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/reports/cash",
    params(
        ("from" = String, Query, description = "First day, YYYY-MM-DD, local time"),
        ("to" = Option<String>, Query, description = "Last day inclusive, defaults to 'from'"),
        ("completed_only" = Option<bool>, Query, description = "Only count completed orders")
    ),
    responses(
        (status = 200, description = "Count, sum and average per day and overall", body = ApiResponse<CashReport>),
        (status = 400, description = "Invalid date range"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn cash_report(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<CashReportQuery>,
) -> AppResult<Json<ApiResponse<CashReport>>> {
    let resp = report_service::cash_report(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/dashboard",
    responses(
        (status = 200, description = "Entity counts for the admin landing page", body = ApiResponse<DashboardCounts>),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn dashboard(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> AppResult<Json<ApiResponse<DashboardCounts>>> {
    let resp = report_service::dashboard(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/media",
    responses(
        (status = 200, description = "Stored file path, collision-renamed when needed", body = ApiResponse<MediaUploadResponse>),
        (status = 400, description = "Missing image field or unsupported file type"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn upload_media(
    State(state): State<AppState>,
    admin: AdminUser,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<MediaUploadResponse>>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.to_string()))?
    {
        if field.name() != Some("image") {
            continue;
        }
        let file_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation("missing file name".to_string()))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let path = media::store_upload(
            std::path::Path::new(&state.config.upload_dir),
            &file_name,
            &bytes,
        )
        .await?;

        if let Err(err) = log_audit(
            &state.pool,
            Some(&admin.username),
            "media_upload",
            Some("uploads"),
            Some(serde_json::json!({ "path": path })),
        )
        .await
        {
            tracing::warn!(error = %err, "audit log failed");
        }

        return Ok(Json(ApiResponse::success(
            "File stored",
            MediaUploadResponse { path },
            Some(Meta::empty()),
        )));
    }

    Err(AppError::Validation(
        "multipart field 'image' is required".to_string(),
    ))
}
