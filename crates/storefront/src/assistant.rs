//! Keyword assistant for the chat widget.
//!
//! Replies come from an ordered rule list. A question matching one of the FAQ
//! entries gets its canned answer; otherwise the first rule whose keyword
//! appears in the lower-cased input wins. The assistant reads a snapshot of
//! the shop and never writes anything back.

use bazaar_core::{Category, ChatRole, OrderId, Price, Product};
use serde::{Deserialize, Serialize};

use crate::budget::BudgetPolicy;

/// First message of every transcript.
pub const WELCOME: &str =
    "Namaste! I support only this e-commerce app and can recommend products from catalog.";

const SCOPE_REPLY: &str = "I can only help with this e-commerce app: products, prices, budget, cart, wishlist, payments, orders, and delivery tracking.";
const DEFAULT_REPLY: &str =
    "I can help with product recommendations, payment, budget and order tracking.";
const PAYMENT_REPLY: &str = "Available payment modes: UPI, Card, Net Banking, Cash on Delivery.";

const PICK_COUNT: usize = 3;
const RECOMMEND_CEILING_RUPEES: u32 = 1_500;

const FAQ: [(&str, &str); 3] = [
    (
        "How can I find budget-friendly products?",
        "Use category filter and search terms like budget, low price, and affordable.",
    ),
    (
        "How do I track my order?",
        "Open Delivery Tracking and enter your order ID.",
    ),
    (
        "Can I pay with UPI?",
        "Yes, UPI, Card, Net Banking and Cash on Delivery are available.",
    ),
];

const ECOMMERCE_KEYWORDS: [&str; 25] = [
    "product", "products", "buy", "shopping", "shop", "price", "budget", "cart", "wishlist",
    "order", "delivery", "shipping", "payment", "upi", "card", "checkout", "discount",
    "electronics", "fashion", "home", "beauty", "books", "sports", "recommend", "track",
];

/// What the assistant may look at when answering.
#[derive(Debug, Clone, Copy)]
pub struct ShopSnapshot<'a> {
    /// Products to recommend from, in catalog order.
    pub products: &'a [Product],
    pub budget: BudgetPolicy,
    pub cart_total: Price,
    pub latest_order: Option<&'a OrderId>,
}

/// The shopper's side of a snapshot. Backends supply the products.
#[derive(Debug, Clone, Copy)]
pub struct ChatContext<'a> {
    pub budget: BudgetPolicy,
    pub cart_total: Price,
    pub latest_order: Option<&'a OrderId>,
}

impl<'a> ChatContext<'a> {
    #[must_use]
    pub const fn with_products(self, products: &'a [Product]) -> ShopSnapshot<'a> {
        ShopSnapshot {
            products,
            budget: self.budget,
            cart_total: self.cart_total,
            latest_order: self.latest_order,
        }
    }
}

/// Answer `input`, or `None` for blank input.
#[must_use]
pub fn reply(input: &str, snapshot: &ShopSnapshot<'_>) -> Option<String> {
    let text = input.trim().to_lowercase();
    if text.is_empty() {
        return None;
    }

    if let Some(answer) = faq_answer(&text) {
        return Some(answer.to_string());
    }

    if text.contains("recommend") {
        return Some(recommend(snapshot.products));
    }

    if let Some(category) = Category::ALL
        .into_iter()
        .find(|category| text.contains(&category.as_str().to_lowercase()))
    {
        return Some(category_picks(snapshot.products, category));
    }

    if text.contains("budget") {
        return Some(format!(
            "Your {} budget is {}. Current cart total is {}.",
            snapshot.budget.period, snapshot.budget.limit, snapshot.cart_total
        ));
    }

    if ["payment", "upi", "pay"].iter().any(|word| text.contains(word)) {
        return Some(PAYMENT_REPLY.to_string());
    }

    if text.contains("delivery") || text.contains("track") {
        return Some(snapshot.latest_order.map_or_else(
            || "Go to Delivery Tracking and enter your latest order ID.".to_string(),
            |id| format!("Go to Delivery Tracking and enter your latest order ID ({id})."),
        ));
    }

    if !is_ecommerce_question(&text) {
        return Some(SCOPE_REPLY.to_string());
    }

    Some(DEFAULT_REPLY.to_string())
}

fn recommend(products: &[Product]) -> String {
    let ceiling = Price::from_rupees(RECOMMEND_CEILING_RUPEES);
    let picks: Vec<&Product> = products
        .iter()
        .filter(|product| product.price < ceiling)
        .take(PICK_COUNT)
        .collect();

    if picks.is_empty() {
        return format!("No products under {ceiling} in the current listing.");
    }
    format!("Top picks under {ceiling}: {}", describe(&picks))
}

fn category_picks(products: &[Product], category: Category) -> String {
    let picks: Vec<&Product> = products
        .iter()
        .filter(|product| product.category == category)
        .take(PICK_COUNT)
        .collect();

    if picks.is_empty() {
        return format!("No {category} products in the current listing.");
    }
    format!("Popular in {category}: {}", describe(&picks))
}

fn describe(products: &[&Product]) -> String {
    products
        .iter()
        .map(|product| format!("{} ({})", product.name, product.price))
        .collect::<Vec<_>>()
        .join(", ")
}

fn faq_answer(text: &str) -> Option<&'static str> {
    let asked = normalize_question(text);
    FAQ.iter()
        .find(|(question, _)| normalize_question(question) == asked)
        .map(|(_, answer)| *answer)
}

fn normalize_question(text: &str) -> String {
    text.trim()
        .trim_end_matches(['?', '.', '!'])
        .trim()
        .to_lowercase()
}

fn is_ecommerce_question(text: &str) -> bool {
    ECOMMERCE_KEYWORDS.iter().any(|keyword| text.contains(keyword))
}

/// One chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEntry {
    pub role: ChatRole,
    pub text: String,
}

/// Chat history, starting with the welcome message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    entries: Vec<ChatEntry>,
}

impl Default for Transcript {
    fn default() -> Self {
        Self {
            entries: vec![ChatEntry {
                role: ChatRole::Bot,
                text: WELCOME.to_string(),
            }],
        }
    }
}

impl Transcript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a user message and the answer it got.
    pub fn record(&mut self, question: &str, answer: &str) {
        self.push(ChatRole::User, question.trim());
        self.push(ChatRole::Bot, answer);
    }

    pub fn push(&mut self, role: ChatRole, text: &str) {
        self.entries.push(ChatEntry {
            role,
            text: text.to_string(),
        });
    }

    #[must_use]
    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    #[must_use]
    pub fn last(&self) -> Option<&ChatEntry> {
        self.entries.last()
    }
}
