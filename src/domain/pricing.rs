use rust_decimal::Decimal;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::error::AppError;

/// How a category prices its products. Chosen once at category creation;
/// product attribute validation dispatches on this tag, never on the
/// category's display name, so renaming a category cannot change which
/// attributes its products accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PricingKind {
    Flat,
    BySize,
    FlatWithVolume,
    FlatWithWeight,
}

impl PricingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PricingKind::Flat => "flat",
            PricingKind::BySize => "by_size",
            PricingKind::FlatWithVolume => "flat_with_volume",
            PricingKind::FlatWithWeight => "flat_with_weight",
        }
    }
}

impl fmt::Display for PricingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PricingKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flat" => Ok(PricingKind::Flat),
            "by_size" => Ok(PricingKind::BySize),
            "flat_with_volume" => Ok(PricingKind::FlatWithVolume),
            "flat_with_weight" => Ok(PricingKind::FlatWithWeight),
            other => Err(AppError::Validation(format!(
                "unknown pricing kind: {other}"
            ))),
        }
    }
}

/// Pizza size selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Size {
    Individual,
    Chica,
    Mediana,
    Grande,
    H4,
}

impl Size {
    pub fn as_str(&self) -> &'static str {
        match self {
            Size::Individual => "individual",
            Size::Chica => "chica",
            Size::Mediana => "mediana",
            Size::Grande => "grande",
            Size::H4 => "h4",
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Size {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "individual" => Ok(Size::Individual),
            "chica" => Ok(Size::Chica),
            "mediana" => Ok(Size::Mediana),
            "grande" => Ok(Size::Grande),
            "h4" => Ok(Size::H4),
            other => Err(AppError::Validation(format!("unknown size: {other}"))),
        }
    }
}

/// Size-keyed price table for `by_size` products. Stored as a JSONB column.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult, ToSchema,
)]
pub struct SizePrices {
    #[schema(value_type = Option<String>)]
    pub individual: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub chica: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub mediana: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub grande: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub h4: Option<Decimal>,
}

impl SizePrices {
    pub fn get(&self, size: Size) -> Option<Decimal> {
        match size {
            Size::Individual => self.individual,
            Size::Chica => self.chica,
            Size::Mediana => self.mediana,
            Size::Grande => self.grande,
            Size::H4 => self.h4,
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let entries = [self.individual, self.chica, self.mediana, self.grande, self.h4];
        if entries.iter().flatten().any(|p| *p < Decimal::ZERO) {
            return Err(AppError::Validation(
                "size prices must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Resolve the unit price for a product under its category's pricing kind.
///
/// An unset or zero price means the item is not sellable; the distinction
/// between "missing" and "0" is intentionally collapsed.
pub fn resolve(
    kind: PricingKind,
    price: Option<Decimal>,
    size_prices: Option<&SizePrices>,
    size: Option<Size>,
) -> Result<Decimal, AppError> {
    match kind {
        PricingKind::BySize => {
            let size = size.ok_or_else(|| AppError::Pricing("size not offered".to_string()))?;
            size_prices
                .and_then(|prices| prices.get(size))
                .filter(|p| *p > Decimal::ZERO)
                .ok_or_else(|| AppError::Pricing("size not offered".to_string()))
        }
        PricingKind::Flat | PricingKind::FlatWithVolume | PricingKind::FlatWithWeight => price
            .filter(|p| *p > Decimal::ZERO)
            .ok_or_else(|| AppError::Pricing("price not set".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pizza_prices() -> SizePrices {
        SizePrices {
            individual: Some(Decimal::new(60, 0)),
            chica: Some(Decimal::new(90, 0)),
            mediana: Some(Decimal::new(120, 0)),
            grande: Some(Decimal::new(150, 0)),
            h4: None,
        }
    }

    #[test]
    fn by_size_uses_the_selected_size() {
        let prices = pizza_prices();
        let resolved =
            resolve(PricingKind::BySize, None, Some(&prices), Some(Size::Grande)).unwrap();
        assert_eq!(resolved, Decimal::new(150, 0));
    }

    #[test]
    fn by_size_without_size_is_unavailable() {
        let prices = pizza_prices();
        let err = resolve(PricingKind::BySize, None, Some(&prices), None).unwrap_err();
        assert!(matches!(err, AppError::Pricing(msg) if msg == "size not offered"));
    }

    #[test]
    fn by_size_with_unpriced_size_is_unavailable() {
        let prices = pizza_prices();
        let err =
            resolve(PricingKind::BySize, None, Some(&prices), Some(Size::H4)).unwrap_err();
        assert!(matches!(err, AppError::Pricing(_)));
    }

    #[test]
    fn flat_ignores_the_size_argument() {
        let resolved = resolve(
            PricingKind::FlatWithVolume,
            Some(Decimal::new(20, 0)),
            None,
            Some(Size::Mediana),
        )
        .unwrap();
        assert_eq!(resolved, Decimal::new(20, 0));
    }

    #[test]
    fn zero_flat_price_is_treated_as_unset() {
        let err = resolve(PricingKind::Flat, Some(Decimal::ZERO), None, None).unwrap_err();
        assert!(matches!(err, AppError::Pricing(msg) if msg == "price not set"));
    }

    #[test]
    fn missing_flat_price_is_unavailable() {
        let err = resolve(PricingKind::Flat, None, None, None).unwrap_err();
        assert!(matches!(err, AppError::Pricing(_)));
    }

    #[test]
    fn negative_size_price_fails_validation() {
        let prices = SizePrices {
            chica: Some(Decimal::new(-5, 0)),
            ..Default::default()
        };
        assert!(prices.validate().is_err());
    }

    #[test]
    fn pricing_kind_round_trips_through_strings() {
        for kind in [
            PricingKind::Flat,
            PricingKind::BySize,
            PricingKind::FlatWithVolume,
            PricingKind::FlatWithWeight,
        ] {
            assert_eq!(kind.as_str().parse::<PricingKind>().unwrap(), kind);
        }
        assert!("PIZZAS".parse::<PricingKind>().is_err());
    }
}
