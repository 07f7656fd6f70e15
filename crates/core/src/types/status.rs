//! Status and choice enums for orders, payments, budgets, and the UI.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Delivery stage of an order.
///
/// Stages are strictly ordered; an order only ever moves one stage forward.
/// Serialized with the customer-facing labels (`"Order Confirmed"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    #[default]
    #[serde(rename = "Order Confirmed")]
    Confirmed,
    #[serde(rename = "Packed")]
    Packed,
    #[serde(rename = "Shipped")]
    Shipped,
    #[serde(rename = "Out for Delivery")]
    OutForDelivery,
    #[serde(rename = "Delivered")]
    Delivered,
}

impl OrderStatus {
    /// Every stage, in delivery order.
    pub const SEQUENCE: [Self; 5] = [
        Self::Confirmed,
        Self::Packed,
        Self::Shipped,
        Self::OutForDelivery,
        Self::Delivered,
    ];

    /// Customer-facing label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Confirmed => "Order Confirmed",
            Self::Packed => "Packed",
            Self::Shipped => "Shipped",
            Self::OutForDelivery => "Out for Delivery",
            Self::Delivered => "Delivered",
        }
    }

    /// The following stage, or `None` once delivered.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Confirmed => Some(Self::Packed),
            Self::Packed => Some(Self::Shipped),
            Self::Shipped => Some(Self::OutForDelivery),
            Self::OutForDelivery => Some(Self::Delivered),
            Self::Delivered => None,
        }
    }

    /// The full delivery roadmap, e.g. `Order Confirmed -> Packed -> ...`.
    #[must_use]
    pub fn roadmap() -> String {
        Self::SEQUENCE
            .iter()
            .map(|status| status.label())
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::SEQUENCE
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| format!("invalid order status: {trimmed}"))
    }
}

/// Payment method chosen at checkout. Demo only; nothing is charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentMethod {
    #[default]
    #[serde(rename = "UPI")]
    Upi,
    #[serde(rename = "Card")]
    Card,
    #[serde(rename = "Net Banking")]
    NetBanking,
    #[serde(rename = "Cash on Delivery")]
    CashOnDelivery,
}

impl PaymentMethod {
    /// Every supported method, in display order.
    pub const ALL: [Self; 4] = [Self::Upi, Self::Card, Self::NetBanking, Self::CashOnDelivery];

    /// Customer-facing label, also the wire value.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Upi => "UPI",
            Self::Card => "Card",
            Self::NetBanking => "Net Banking",
            Self::CashOnDelivery => "Cash on Delivery",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match compact.as_str() {
            "upi" => Ok(Self::Upi),
            "card" => Ok(Self::Card),
            "netbanking" => Ok(Self::NetBanking),
            "cashondelivery" | "cod" => Ok(Self::CashOnDelivery),
            _ => Err(format!("invalid payment method: {}", s.trim())),
        }
    }
}

/// Period a budget limit applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BudgetPeriod {
    #[default]
    Monthly,
    Yearly,
}

impl fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Monthly => write!(f, "monthly"),
            Self::Yearly => write!(f, "yearly"),
        }
    }
}

impl FromStr for BudgetPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" | "month" => Ok(Self::Monthly),
            "yearly" | "year" => Ok(Self::Yearly),
            other => Err(format!("invalid budget period: {other}")),
        }
    }
}

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Info,
    Warning,
    Error,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Author of a chat transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Bot,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_moves_forward_only() {
        let mut status = OrderStatus::Confirmed;
        let mut seen = vec![status];
        while let Some(next) = status.next() {
            assert!(next > status);
            status = next;
            seen.push(status);
        }
        assert_eq!(seen, OrderStatus::SEQUENCE);
        assert_eq!(OrderStatus::Delivered.next(), None);
    }

    #[test]
    fn test_order_status_roadmap() {
        assert_eq!(
            OrderStatus::roadmap(),
            "Order Confirmed -> Packed -> Shipped -> Out for Delivery -> Delivered"
        );
    }

    #[test]
    fn test_order_status_serde_uses_labels() {
        let json = serde_json::to_string(&OrderStatus::OutForDelivery).unwrap();
        assert_eq!(json, "\"Out for Delivery\"");
        let parsed: OrderStatus = serde_json::from_str("\"Order Confirmed\"").unwrap();
        assert_eq!(parsed, OrderStatus::Confirmed);
    }

    #[test]
    fn test_order_status_parse_label() {
        assert_eq!(
            "out for delivery".parse::<OrderStatus>().unwrap(),
            OrderStatus::OutForDelivery
        );
        assert!("NOT_FOUND".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_payment_method_parse() {
        assert_eq!("upi".parse::<PaymentMethod>().unwrap(), PaymentMethod::Upi);
        assert_eq!(
            "Net Banking".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::NetBanking
        );
        assert_eq!(
            "cash-on-delivery".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::CashOnDelivery
        );
        assert!("bitcoin".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_payment_method_wire_value() {
        let json = serde_json::to_string(&PaymentMethod::CashOnDelivery).unwrap();
        assert_eq!(json, "\"Cash on Delivery\"");
    }

    #[test]
    fn test_budget_period_roundtrip() {
        assert_eq!("Yearly".parse::<BudgetPeriod>().unwrap(), BudgetPeriod::Yearly);
        assert_eq!(BudgetPeriod::Monthly.to_string(), "monthly");
        assert!("weekly".parse::<BudgetPeriod>().is_err());
    }
}
