use axum::{
    Json, Router,
    extract::State,
    routing::{post, put},
};

use crate::{
    config::AppConfig,
    dto::session::{BindTableRequest, CreateSessionRequest, SessionResponse},
    error::{AppError, AppResult},
    response::ApiResponse,
    session::SessionToken,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_session).get(current_session))
        .route("/table", put(bind_table))
}

fn validate_table(config: &AppConfig, table: i32) -> AppResult<()> {
    if !(1..=config.table_count).contains(&table) {
        return Err(AppError::Validation(format!(
            "table number must be between 1 and {}",
            config.table_count
        )));
    }
    Ok(())
}

#[utoipa::path(
    post,
    path = "/api/session",
    request_body = CreateSessionRequest,
    responses(
        (status = 200, description = "Session created", body = ApiResponse<SessionResponse>),
        (status = 400, description = "Table number out of range"),
    ),
    tag = "Session"
)]
pub async fn create_session(
    State(state): State<AppState>,
    Json(payload): Json<CreateSessionRequest>,
) -> AppResult<Json<ApiResponse<SessionResponse>>> {
    if let Some(table) = payload.table {
        validate_table(&state.config, table)?;
    }
    let token = state.sessions.create(payload.table)?;
    let data = SessionResponse {
        token,
        table: payload.table,
        item_count: 0,
    };
    Ok(Json(ApiResponse::success("Session created", data, None)))
}

#[utoipa::path(
    get,
    path = "/api/session",
    responses(
        (status = 200, description = "Current session", body = ApiResponse<SessionResponse>),
        (status = 404, description = "Unknown session"),
    ),
    tag = "Session"
)]
pub async fn current_session(
    State(state): State<AppState>,
    token: SessionToken,
) -> AppResult<Json<ApiResponse<SessionResponse>>> {
    let table = state.sessions.table(token.0)?;
    let item_count = state.sessions.cart(token.0)?.item_count();
    let data = SessionResponse {
        token: token.0,
        table,
        item_count,
    };
    Ok(Json(ApiResponse::success("OK", data, None)))
}

#[utoipa::path(
    put,
    path = "/api/session/table",
    request_body = BindTableRequest,
    responses(
        (status = 200, description = "Table bound", body = ApiResponse<SessionResponse>),
        (status = 400, description = "Table number out of range"),
        (status = 404, description = "Unknown session"),
    ),
    tag = "Session"
)]
pub async fn bind_table(
    State(state): State<AppState>,
    token: SessionToken,
    Json(payload): Json<BindTableRequest>,
) -> AppResult<Json<ApiResponse<SessionResponse>>> {
    // Reject out-of-range tables before any session mutation.
    validate_table(&state.config, payload.table)?;
    state.sessions.bind_table(token.0, payload.table)?;
    let item_count = state.sessions.cart(token.0)?.item_count();
    let data = SessionResponse {
        token: token.0,
        table: Some(payload.table),
        item_count,
    };
    Ok(Json(ApiResponse::success("Table bound", data, None)))
}
