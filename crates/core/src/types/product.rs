//! Catalog product record.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::{Category, Price, ProductId};

/// Customer rating on a 0.0 - 5.0 scale, kept to one decimal place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rating(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Rating {
    /// Highest possible rating.
    pub const MAX: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

    /// Create a rating, rounding half away from zero to one decimal and
    /// clamping into `0.0..=5.0`.
    #[must_use]
    pub fn new(value: Decimal) -> Self {
        let rounded = value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
        Self(rounded.clamp(Decimal::ZERO, Self::MAX))
    }

    /// The underlying value.
    #[must_use]
    pub const fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

/// A product in the catalog.
///
/// Immutable once created; cart lines, wishlist entries, and order items hold
/// copies of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: Category,
    pub description: String,
    pub price: Price,
    pub rating: Rating,
}
