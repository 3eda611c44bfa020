use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::error::AppError;

/// Order progression as shown to kitchen staff. The admin may set any of
/// the four values directly; only unknown values are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pendiente,
    EnPreparacion,
    Listo,
    Completado,
}

impl OrderStatus {
    /// Statuses shown on the kitchen's active-orders board.
    pub const ACTIVE: [OrderStatus; 2] = [OrderStatus::Pendiente, OrderStatus::EnPreparacion];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pendiente => "pendiente",
            OrderStatus::EnPreparacion => "en_preparacion",
            OrderStatus::Listo => "listo",
            OrderStatus::Completado => "completado",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pendiente" => Ok(OrderStatus::Pendiente),
            "en_preparacion" => Ok(OrderStatus::EnPreparacion),
            "listo" => Ok(OrderStatus::Listo),
            "completado" => Ok(OrderStatus::Completado),
            other => Err(AppError::InvalidStatus(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_four_statuses_parse() {
        for status in [
            OrderStatus::Pendiente,
            OrderStatus::EnPreparacion,
            OrderStatus::Listo,
            OrderStatus::Completado,
        ] {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        let err = "cancelado".parse::<OrderStatus>().unwrap_err();
        assert!(matches!(err, AppError::InvalidStatus(s) if s == "cancelado"));
    }
}
