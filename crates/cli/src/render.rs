//! Plain-text views of shop state.

use std::fmt::Write as _;

use bazaar_core::{NotificationKind, Product};
use bazaar_storefront::budget::BudgetGuard;
use bazaar_storefront::cart::{Cart, Wishlist};
use bazaar_storefront::notify::Notification;
use bazaar_storefront::orders::Order;

pub fn products(products: &[Product], summary: &str) -> String {
    if products.is_empty() {
        return "No products match your search.".to_string();
    }
    let mut out = String::new();
    for product in products {
        let _ = writeln!(
            out,
            "  #{:<4} {:<24} {:<12} {:>10}  rating {}",
            product.id.to_string(),
            product.name,
            product.category.to_string(),
            product.price.to_string(),
            product.rating
        );
    }
    out.push_str(summary);
    out
}

pub fn cart(cart: &Cart, budget: &BudgetGuard) -> String {
    let mut out = String::new();
    if cart.is_empty() {
        out.push_str("Your cart is empty.\n");
    }
    for line in cart.lines() {
        let _ = writeln!(
            out,
            "  #{:<4} {:<24} x{:<3} {:>10}",
            line.product.id.to_string(),
            line.product.name,
            line.qty,
            line.subtotal().to_string()
        );
    }
    let _ = write!(
        out,
        "{} item(s), total {}\n{}",
        cart.item_count(),
        cart.total(),
        budget.summary(cart.total())
    );
    out
}

pub fn wishlist(wishlist: &Wishlist) -> String {
    if wishlist.is_empty() {
        return "Your wishlist is empty.".to_string();
    }
    wishlist
        .items()
        .iter()
        .map(|product| {
            format!(
                "  #{:<4} {:<24} {:>10}",
                product.id.to_string(),
                product.name,
                product.price.to_string()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn budget(budget: &BudgetGuard, cart: &Cart) -> String {
    let total = cart.total();
    let mut out = format!(
        "{} budget: {} ({}% used)\n{}",
        capitalize(&budget.period().to_string()),
        budget.limit(),
        budget.used_percent(total),
        budget.summary(total)
    );
    if budget.is_exceeded(total) {
        out.push_str("\nBudget exceeded: checkout is blocked until the cart fits.");
    }
    out
}

pub fn orders(orders: &[Order]) -> String {
    if orders.is_empty() {
        return "No orders yet.".to_string();
    }
    orders
        .iter()
        .map(|order| {
            format!(
                "  {}  {:<16} {:>10}  {:<16} {} item(s)  {}",
                order.id,
                order.status.to_string(),
                order.total.to_string(),
                order.payment_method.to_string(),
                order.item_count(),
                order.created_at.format("%Y-%m-%d %H:%M")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn notification(notification: &Notification) -> String {
    let tag = match notification.kind {
        NotificationKind::Success => "ok",
        NotificationKind::Info => "info",
        NotificationKind::Warning => "warn",
        NotificationKind::Error => "error",
    };
    format!("[{tag}] {}", notification.message)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bazaar_core::Price;
    use bazaar_storefront::budget::BudgetPolicy;
    use bazaar_storefront::catalog::Catalog;

    use super::*;

    #[test]
    fn test_products_lists_summary() {
        let catalog = Catalog::generate(2);
        let text = products(catalog.products(), "2 shown / 2 total");
        assert!(text.contains("Electronics Product 1"));
        assert!(text.contains("Rs 474"));
        assert!(text.ends_with("2 shown / 2 total"));
        assert_eq!(products(&[], ""), "No products match your search.");
    }

    #[test]
    fn test_cart_and_budget() {
        let catalog = Catalog::generate(2);
        let mut basket = Cart::new();
        basket.add_quantity(&catalog.products()[0], 3);
        let guard = BudgetGuard::new(BudgetPolicy {
            limit: Price::from_rupees(1000),
            ..BudgetPolicy::default()
        });

        let text = cart(&basket, &guard);
        assert!(text.contains("x3"));
        assert!(text.contains("3 item(s), total Rs 1,422"));
        assert!(text.ends_with("Cart: Rs 1,422 / Limit: Rs 1,000"));

        let text = budget(&guard, &basket);
        assert!(text.starts_with("Monthly budget: Rs 1,000 (100% used)"));
        assert!(text.ends_with("checkout is blocked until the cart fits."));
    }

    #[test]
    fn test_empty_views() {
        assert_eq!(wishlist(&Wishlist::new()), "Your wishlist is empty.");
        assert_eq!(orders(&[]), "No orders yet.");
        assert!(cart(&Cart::new(), &BudgetGuard::unlimited()).starts_with("Your cart is empty."));
    }
}
