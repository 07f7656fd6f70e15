//! Budget guard.
//!
//! Compares the running cart total against the shopper's limit. Three jobs:
//!
//! - [`BudgetGuard::observe`] raises a one-shot [`BudgetAlert`] when the total
//!   crosses above the limit. The latch re-arms only after the total drops back
//!   to or below the limit.
//! - [`BudgetGuard::check_add`] rejects an add that would push the total over
//!   the limit, before anything is mutated.
//! - [`BudgetGuard::ensure_within`] blocks checkout while the limit is exceeded.

use core::fmt;

use bazaar_core::{BudgetPeriod, Price, Product};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::ShopError;

const DEFAULT_LIMIT_RUPEES: u32 = 30_000;

/// Period and limit the shopper configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetPolicy {
    pub period: BudgetPeriod,
    pub limit: Price,
}

impl Default for BudgetPolicy {
    fn default() -> Self {
        Self {
            period: BudgetPeriod::Monthly,
            limit: Price::from_rupees(DEFAULT_LIMIT_RUPEES),
        }
    }
}

impl BudgetPolicy {
    /// Whether `total` is above the limit.
    #[must_use]
    pub fn is_exceeded(&self, total: Price) -> bool {
        total > self.limit
    }
}

/// Alert latch state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Latch {
    /// Total is within the limit; the next crossing alerts.
    #[default]
    Armed,
    /// An alert was raised for the current crossing.
    Tripped,
}

/// Raised once per budget crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetAlert {
    pub total: Price,
    pub limit: Price,
}

impl fmt::Display for BudgetAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Budget exceeded. Cart total is {} while your limit is {}.",
            self.total, self.limit
        )
    }
}

/// Budget policy plus the one-shot alert latch.
#[derive(Debug, Clone, Default)]
pub struct BudgetGuard {
    policy: BudgetPolicy,
    latch: Latch,
    last_total: Price,
}

impl BudgetGuard {
    #[must_use]
    pub fn new(policy: BudgetPolicy) -> Self {
        Self {
            policy,
            latch: Latch::Armed,
            last_total: Price::ZERO,
        }
    }

    /// A guard that never blocks anything.
    #[must_use]
    pub fn unlimited() -> Self {
        Self::new(BudgetPolicy {
            period: BudgetPeriod::Monthly,
            limit: Price::new(Decimal::MAX).unwrap_or_default(),
        })
    }

    #[must_use]
    pub const fn policy(&self) -> BudgetPolicy {
        self.policy
    }

    #[must_use]
    pub const fn limit(&self) -> Price {
        self.policy.limit
    }

    #[must_use]
    pub const fn period(&self) -> BudgetPeriod {
        self.policy.period
    }

    #[must_use]
    pub const fn latch(&self) -> Latch {
        self.latch
    }

    /// Change the limit and re-evaluate the latch against the last seen total.
    ///
    /// Lowering the limit below the current total counts as a crossing.
    pub fn set_limit(&mut self, limit: Price) -> Option<BudgetAlert> {
        self.policy.limit = limit;
        self.observe(self.last_total)
    }

    /// Change the period. The limit is kept, so the latch cannot change.
    pub const fn set_period(&mut self, period: BudgetPeriod) {
        self.policy.period = period;
    }

    /// Feed the current cart total through the latch.
    ///
    /// Returns an alert only on an at-or-below to above transition.
    pub fn observe(&mut self, total: Price) -> Option<BudgetAlert> {
        self.last_total = total;
        let exceeded = self.policy.is_exceeded(total);
        match (self.latch, exceeded) {
            (Latch::Armed, true) => {
                self.latch = Latch::Tripped;
                tracing::debug!(%total, limit = %self.policy.limit, "Budget crossed");
                Some(BudgetAlert {
                    total,
                    limit: self.policy.limit,
                })
            }
            (Latch::Tripped, false) => {
                self.latch = Latch::Armed;
                None
            }
            _ => None,
        }
    }

    /// Whether `total` is above the limit.
    #[must_use]
    pub fn is_exceeded(&self, total: Price) -> bool {
        self.policy.is_exceeded(total)
    }

    /// Reject adding one unit of `product` when that would exceed the limit.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::WouldExceedBudget` naming the item and the limit.
    pub fn check_add(&self, total: Price, product: &Product) -> Result<(), ShopError> {
        if self.policy.is_exceeded(total + product.price) {
            return Err(ShopError::WouldExceedBudget {
                item: product.name.clone(),
                limit: self.policy.limit,
            });
        }
        Ok(())
    }

    /// Checkout gate.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::BudgetExceeded` while `total` is above the limit.
    pub fn ensure_within(&self, total: Price) -> Result<(), ShopError> {
        if self.policy.is_exceeded(total) {
            return Err(ShopError::BudgetExceeded {
                total,
                limit: self.policy.limit,
            });
        }
        Ok(())
    }

    /// Share of the limit in use, rounded and capped at 100.
    #[must_use]
    pub fn used_percent(&self, total: Price) -> u8 {
        let limit = self.policy.limit.amount().max(Decimal::ONE);
        let percent = (total.amount() / limit * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .min(Decimal::ONE_HUNDRED);
        percent.to_u8().unwrap_or(100)
    }

    /// One-line tracker text, e.g. `Cart: Rs 900 / Limit: Rs 1,000`.
    #[must_use]
    pub fn summary(&self, total: Price) -> String {
        format!("Cart: {total} / Limit: {}", self.policy.limit)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bazaar_core::{Category, ProductId, Rating};

    use super::*;

    fn guard(limit: u32) -> BudgetGuard {
        BudgetGuard::new(BudgetPolicy {
            period: BudgetPeriod::Monthly,
            limit: Price::from_rupees(limit),
        })
    }

    fn product(name: &str, price: u32) -> Product {
        Product {
            id: ProductId::new(1),
            name: name.to_string(),
            category: Category::Books,
            description: String::new(),
            price: Price::from_rupees(price),
            rating: Rating::default(),
        }
    }

    #[test]
    fn test_alert_fires_once_per_crossing() {
        let mut guard = guard(1000);

        assert_eq!(guard.observe(Price::from_rupees(900)), None);
        let alert = guard.observe(Price::from_rupees(1100)).unwrap();
        assert_eq!(alert.total, Price::from_rupees(1100));
        assert_eq!(guard.latch(), Latch::Tripped);

        // still exceeded
        assert_eq!(guard.observe(Price::from_rupees(1150)), None);

        // back under re-arms
        assert_eq!(guard.observe(Price::from_rupees(800)), None);
        assert_eq!(guard.latch(), Latch::Armed);

        assert!(guard.observe(Price::from_rupees(1100)).is_some());
    }

    #[test]
    fn test_total_equal_to_limit_is_not_exceeded() {
        let mut guard = guard(1000);
        assert_eq!(guard.observe(Price::from_rupees(1000)), None);
        assert!(guard.ensure_within(Price::from_rupees(1000)).is_ok());
    }

    #[test]
    fn test_lowering_limit_is_a_crossing() {
        let mut guard = guard(1000);
        guard.observe(Price::from_rupees(900));

        let alert = guard.set_limit(Price::from_rupees(500)).unwrap();
        assert_eq!(alert.limit, Price::from_rupees(500));
        assert_eq!(
            alert.to_string(),
            "Budget exceeded. Cart total is Rs 900 while your limit is Rs 500."
        );

        assert_eq!(guard.set_limit(Price::from_rupees(400)), None);
        assert_eq!(guard.set_limit(Price::from_rupees(2000)), None);
        assert_eq!(guard.latch(), Latch::Armed);
    }

    #[test]
    fn test_check_add_names_item_and_limit() {
        let guard = guard(1000);
        let book = product("Books Product 4", 200);

        assert!(guard.check_add(Price::from_rupees(800), &book).is_ok());

        let err = guard.check_add(Price::from_rupees(900), &book).unwrap_err();
        assert!(matches!(err, ShopError::WouldExceedBudget { .. }));
        assert_eq!(
            err.to_string(),
            "Cannot add Books Product 4. This would exceed your budget limit of Rs 1,000."
        );
    }

    #[test]
    fn test_ensure_within_blocks_checkout() {
        let guard = guard(1000);
        let err = guard.ensure_within(Price::from_rupees(1100)).unwrap_err();
        assert!(matches!(err, ShopError::BudgetExceeded { .. }));
    }

    #[test]
    fn test_used_percent() {
        let guard = guard(1000);
        assert_eq!(guard.used_percent(Price::ZERO), 0);
        assert_eq!(guard.used_percent(Price::from_rupees(455)), 46);
        assert_eq!(guard.used_percent(Price::from_rupees(5000)), 100);

        let zero = self::guard(0);
        assert_eq!(zero.used_percent(Price::from_rupees(1)), 100);
    }

    #[test]
    fn test_unlimited_never_blocks() {
        let guard = BudgetGuard::unlimited();
        assert!(guard.ensure_within(Price::from_rupees(u32::MAX)).is_ok());
        assert!(
            guard
                .check_add(Price::from_rupees(u32::MAX), &product("x", u32::MAX))
                .is_ok()
        );
    }

    #[test]
    fn test_period_change_keeps_limit() {
        let mut guard = guard(1000);
        guard.set_period(BudgetPeriod::Yearly);
        assert_eq!(guard.period(), BudgetPeriod::Yearly);
        assert_eq!(guard.limit(), Price::from_rupees(1000));
        assert_eq!(guard.summary(Price::from_rupees(900)), "Cart: Rs 900 / Limit: Rs 1,000");
    }
}
