use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSessionRequest {
    /// Table from the scanned QR code; may be bound later instead.
    pub table: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BindTableRequest {
    pub table: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub token: Uuid,
    pub table: Option<i32>,
    pub item_count: u32,
}
