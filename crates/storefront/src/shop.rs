//! Shop controller.
//!
//! [`Shop`] is the single owner of all client-side state: login, product
//! listing, cart and wishlist mirrors, budget guard, orders, delivery panel,
//! chat transcript, voice input, notifications, and the error banner. Every
//! mutation is a method on it and runs to completion before the next one.
//!
//! Failed actions never panic or leave partial state behind. Each error is
//! turned into a notification (validation and budget problems warn, an empty
//! cart or unknown order informs, transport failures are errors that also set
//! the banner) and returned to the caller.

use bazaar_core::{
    BudgetPeriod, CategoryFilter, NotificationKind, OrderStatus, PaymentMethod, Price, Product,
    ProductId,
};
use tokio::time::Instant;

use crate::assistant::{ChatContext, Transcript};
use crate::backend::ShopBackend;
use crate::budget::{BudgetGuard, BudgetPolicy};
use crate::cart::{Cart, Wishlist};
use crate::error::ShopError;
use crate::filter::ProductQuery;
use crate::login::{LoginForm, Profile};
use crate::notify::{Banner, Notification, Notifications};
use crate::orders::{Order, Tracking};
use crate::search::{SearchGate, SearchTicket};
use crate::voice::{SpeechInput, UNSUPPORTED_MESSAGE, VoiceCommand};

/// Most products shown in one listing.
pub const MAX_VISIBLE_PRODUCTS: usize = 120;

/// Assistant reply when the backend could not answer.
pub const CHAT_UNAVAILABLE: &str = "Chat service is unavailable right now. Please try again.";

/// Which screen is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Login,
    Shop,
}

pub struct Shop<B> {
    backend: B,
    mode: Mode,
    profile: Option<Profile>,

    query: ProductQuery,
    products: Vec<Product>,
    search_gate: SearchGate,

    cart: Cart,
    wishlist: Wishlist,
    orders: Vec<Order>,
    budget: BudgetGuard,
    payment_method: PaymentMethod,
    tracking_input: String,
    delivery_status: Option<String>,

    transcript: Transcript,
    chat_input: String,
    voice: Option<Box<dyn SpeechInput>>,
    voice_message: Option<String>,

    notifications: Notifications,
    banner: Banner,
}

impl<B: ShopBackend> Shop<B> {
    /// Create a shop on the login screen with no voice capability.
    #[must_use]
    pub fn new(backend: B, budget: BudgetPolicy) -> Self {
        Self {
            backend,
            mode: Mode::Login,
            profile: None,
            query: ProductQuery::default(),
            products: Vec::new(),
            search_gate: SearchGate::new(),
            cart: Cart::new(),
            wishlist: Wishlist::new(),
            orders: Vec::new(),
            budget: BudgetGuard::new(budget),
            payment_method: PaymentMethod::default(),
            tracking_input: String::new(),
            delivery_status: None,
            transcript: Transcript::new(),
            chat_input: String::new(),
            voice: None,
            voice_message: None,
            notifications: Notifications::new(),
            banner: Banner::default(),
        }
    }

    /// Inject a speech-to-text capability.
    #[must_use]
    pub fn with_voice(mut self, voice: Box<dyn SpeechInput>) -> Self {
        self.voice = Some(voice);
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    pub const fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub const fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    #[must_use]
    pub const fn query(&self) -> &ProductQuery {
        &self.query
    }

    /// Every product in the current listing.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// The part of the listing that is displayed.
    #[must_use]
    pub fn visible_products(&self) -> &[Product] {
        self.products
            .get(..MAX_VISIBLE_PRODUCTS)
            .unwrap_or(self.products.as_slice())
    }

    /// e.g. `120 shown / 520 total`.
    #[must_use]
    pub fn listing_summary(&self) -> String {
        format!(
            "{} shown / {} total",
            self.visible_products().len(),
            self.products.len()
        )
    }

    /// Whether a product refresh is outstanding.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.search_gate.is_loading()
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub fn cart_total(&self) -> Price {
        self.cart.total()
    }

    #[must_use]
    pub const fn wishlist(&self) -> &Wishlist {
        &self.wishlist
    }

    /// Orders, newest first.
    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    #[must_use]
    pub const fn budget(&self) -> &BudgetGuard {
        &self.budget
    }

    #[must_use]
    pub fn budget_exceeded(&self) -> bool {
        self.budget.is_exceeded(self.cart.total())
    }

    #[must_use]
    pub const fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    /// Order id prefilled in the delivery panel.
    #[must_use]
    pub fn tracking_input(&self) -> &str {
        &self.tracking_input
    }

    #[must_use]
    pub fn delivery_status(&self) -> Option<&str> {
        self.delivery_status.as_deref()
    }

    #[must_use]
    pub const fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    #[must_use]
    pub fn chat_input(&self) -> &str {
        &self.chat_input
    }

    #[must_use]
    pub fn voice_message(&self) -> Option<&str> {
        self.voice_message.as_deref()
    }

    #[must_use]
    pub const fn has_voice(&self) -> bool {
        self.voice.is_some()
    }

    #[must_use]
    pub const fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    /// Live notifications at `now`, dropping expired ones.
    pub fn active_notifications(&mut self, now: Instant) -> &[Notification] {
        self.notifications.active(now)
    }

    /// Remove and return every queued notification.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain()
    }

    #[must_use]
    pub fn banner(&self) -> Option<&str> {
        self.banner.message()
    }

    pub fn dismiss_banner(&mut self) {
        self.banner.dismiss();
    }

    // =========================================================================
    // Login
    // =========================================================================

    /// Validate the login form and enter the shop.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::Validation` with the first failing field's message.
    pub fn login(&mut self, form: &LoginForm) -> Result<(), ShopError> {
        let profile = form
            .validate()
            .map_err(|e| ShopError::Validation(e.to_string()));
        let profile = self.check(profile)?;

        tracing::info!(name = %profile.name, "Shopper logged in");
        self.profile = Some(profile);
        self.mode = Mode::Shop;
        self.notify(NotificationKind::Success, form.mode.success_message());
        Ok(())
    }

    /// Return to the login screen. Cart, wishlist, and orders are kept.
    pub fn logout(&mut self) {
        self.mode = Mode::Login;
        self.profile = None;
    }

    /// Load cart, wishlist, and orders from the backend.
    ///
    /// Nothing is replaced unless all three loads succeed.
    ///
    /// # Errors
    ///
    /// Returns the first backend error.
    pub async fn sync(&mut self) -> Result<(), ShopError> {
        let loaded = async {
            let cart = self.backend.cart().await?;
            let wishlist = self.backend.wishlist().await?;
            let orders = self.backend.orders().await?;
            Ok::<_, ShopError>((cart, wishlist, orders))
        }
        .await;
        let (cart, wishlist, orders) = self.check(loaded)?;

        self.cart = Cart::from_lines(cart);
        self.wishlist = Wishlist::from_items(wishlist);
        self.orders = orders;
        self.observe_budget();
        Ok(())
    }

    // =========================================================================
    // Product listing
    // =========================================================================

    /// Change the search term. The caller decides when to refresh (normally
    /// after the debounce window).
    pub fn set_search(&mut self, term: impl Into<String>) -> &ProductQuery {
        self.query.search = term.into();
        &self.query
    }

    /// Change the category filter.
    pub const fn set_category(&mut self, category: CategoryFilter) -> &ProductQuery {
        self.query.category = category;
        &self.query
    }

    /// Start a listing refresh for the current query.
    pub fn begin_search(&mut self) -> (SearchTicket, ProductQuery) {
        (self.search_gate.begin(), self.query.clone())
    }

    /// Apply a finished refresh unless a newer one was started since.
    ///
    /// Returns whether the result was applied. A failed current refresh keeps
    /// the previous listing.
    pub fn finish_search(
        &mut self,
        ticket: SearchTicket,
        result: Result<Vec<Product>, ShopError>,
    ) -> bool {
        if !self.search_gate.accept(ticket) {
            return false;
        }
        match result {
            Ok(products) => {
                self.products = products;
                self.banner.dismiss();
                true
            }
            Err(e) => {
                self.report(&e);
                false
            }
        }
    }

    /// Refresh the listing for the current query.
    pub async fn refresh_products(&mut self) -> bool {
        let (ticket, query) = self.begin_search();
        let result = self.backend.list_products(&query).await;
        self.finish_search(ticket, result)
    }

    // =========================================================================
    // Cart and wishlist
    // =========================================================================

    /// Add one unit of a listed product to the cart.
    ///
    /// The budget is checked before anything is sent to the backend.
    ///
    /// # Errors
    ///
    /// - `ShopError::NotFound` if the product is not on screen
    /// - `ShopError::WouldExceedBudget` if adding it would exceed the limit
    /// - any backend error
    pub async fn add_to_cart(&mut self, product_id: ProductId) -> Result<(), ShopError> {
        let product = self.find_product(product_id);
        let product = self.check(product)?;
        let allowed = self.budget.check_add(self.cart.total(), &product);
        self.check(allowed)?;

        let added = self.backend.add_cart_item(product_id, 1).await;
        self.check(added)?;
        self.reload_cart().await?;

        self.banner.dismiss();
        self.notify(
            NotificationKind::Success,
            format!("{} added to cart.", product.name),
        );
        Ok(())
    }

    /// Remove a cart line.
    ///
    /// # Errors
    ///
    /// Returns any backend error.
    pub async fn remove_from_cart(&mut self, product_id: ProductId) -> Result<(), ShopError> {
        let removed = self.backend.remove_cart_item(product_id).await;
        self.check(removed)?;
        self.reload_cart().await?;

        self.banner.dismiss();
        self.notify(NotificationKind::Info, "Item removed from cart.");
        Ok(())
    }

    /// Save a listed product to the wishlist.
    ///
    /// # Errors
    ///
    /// - `ShopError::NotFound` if the product is not on screen
    /// - any backend error
    pub async fn add_to_wishlist(&mut self, product_id: ProductId) -> Result<(), ShopError> {
        let product = self.find_product(product_id);
        let product = self.check(product)?;

        let added = self.backend.add_wishlist_item(product_id).await;
        self.check(added)?;
        self.reload_wishlist().await?;

        self.banner.dismiss();
        self.notify(
            NotificationKind::Success,
            format!("{} added to wishlist.", product.name),
        );
        Ok(())
    }

    /// Remove a wishlist entry.
    ///
    /// # Errors
    ///
    /// Returns any backend error.
    pub async fn remove_from_wishlist(&mut self, product_id: ProductId) -> Result<(), ShopError> {
        let removed = self.backend.remove_wishlist_item(product_id).await;
        self.check(removed)?;
        self.reload_wishlist().await?;

        self.banner.dismiss();
        self.notify(NotificationKind::Info, "Item removed from wishlist.");
        Ok(())
    }

    // =========================================================================
    // Budget
    // =========================================================================

    /// Change the budget limit. Lowering it below the cart total alerts once.
    pub fn set_budget_limit(&mut self, limit: Price) {
        if let Some(alert) = self.budget.set_limit(limit) {
            self.notify(NotificationKind::Warning, alert.to_string());
        }
    }

    pub const fn set_budget_period(&mut self, period: BudgetPeriod) {
        self.budget.set_period(period);
    }

    /// Share of the budget in use, 0 to 100.
    #[must_use]
    pub fn budget_used_percent(&self) -> u8 {
        self.budget.used_percent(self.cart.total())
    }

    // =========================================================================
    // Orders
    // =========================================================================

    pub const fn set_payment_method(&mut self, method: PaymentMethod) {
        self.payment_method = method;
    }

    /// Place an order for the whole cart with the selected payment method.
    ///
    /// # Errors
    ///
    /// - `ShopError::EmptyCart` if the cart is empty
    /// - `ShopError::BudgetExceeded` while the cart is over the limit
    /// - any backend error
    pub async fn place_order(&mut self) -> Result<Order, ShopError> {
        if self.cart.is_empty() {
            return self.check(Err(ShopError::EmptyCart));
        }
        let within = self.budget.ensure_within(self.cart.total());
        self.check(within)?;

        let placed = self
            .backend
            .place_order(self.payment_method, Some(self.budget.limit()))
            .await;
        let order = self.check(placed)?;

        self.orders.insert(0, order.clone());
        self.cart.clear();
        self.observe_budget();
        self.tracking_input = order.id.to_string();
        self.delivery_status = Some(OrderStatus::roadmap());
        self.banner.dismiss();
        self.notify(
            NotificationKind::Success,
            format!("Order {} placed successfully.", order.id),
        );
        Ok(order)
    }

    /// Look up delivery status and show it in the delivery panel.
    ///
    /// An unknown id is not an error: it produces a "not found" message.
    ///
    /// # Errors
    ///
    /// - `ShopError::Validation` for a blank id
    /// - any backend error
    pub async fn track(&mut self, order_id: &str) -> Result<Tracking, ShopError> {
        self.tracking_input = order_id.trim().to_string();
        if self.tracking_input.is_empty() {
            return self.check(Err(ShopError::Validation(
                "Enter an order ID to track delivery.".to_string(),
            )));
        }

        let tracked = self.backend.track(order_id).await;
        let tracking = self.check(tracked)?;

        let message = tracking.message();
        self.delivery_status = Some(message.clone());
        self.banner.dismiss();
        self.notify(NotificationKind::Info, message);
        Ok(tracking)
    }

    /// Move an order one delivery stage forward and refresh the order list.
    ///
    /// # Errors
    ///
    /// - `ShopError::NotFound` for an unknown order
    /// - `ShopError::Validation` for a delivered one
    /// - any backend error
    pub async fn advance_order(&mut self, order_id: &str) -> Result<Order, ShopError> {
        let advanced = self.backend.advance_order(order_id).await;
        let order = self.check(advanced)?;

        if let Some(existing) = self.orders.iter_mut().find(|o| o.id == order.id) {
            existing.clone_from(&order);
        }
        self.delivery_status = Some(Tracking::Found {
            order_id: order.id.clone(),
            status: order.status,
        }
        .message());
        self.notify(
            NotificationKind::Info,
            format!("Order {} is now {}.", order.id, order.status),
        );
        Ok(order)
    }

    // =========================================================================
    // Assistant and voice
    // =========================================================================

    /// Ask the assistant. Blank input is ignored.
    ///
    /// When the backend cannot answer, the transcript gets
    /// [`CHAT_UNAVAILABLE`] and the failure is reported like any other.
    pub async fn chat(&mut self, input: &str) -> Option<String> {
        let message = input.trim();
        if message.is_empty() {
            return None;
        }

        let context = ChatContext {
            budget: self.budget.policy(),
            cart_total: self.cart.total(),
            latest_order: self.orders.first().map(|order| &order.id),
        };
        let answered = self.backend.chat(message, context).await;
        let reply = match answered {
            Ok(reply) => reply,
            Err(e) => {
                self.report(&e);
                CHAT_UNAVAILABLE.to_string()
            }
        };

        self.transcript.record(message, &reply);
        self.chat_input.clear();
        Some(reply)
    }

    /// Capture one utterance and act on it.
    ///
    /// Without a speech capability this only shows an advisory.
    pub fn listen(&mut self) -> Option<VoiceCommand> {
        let Some(voice) = self.voice.as_mut() else {
            self.voice_message = Some(UNSUPPORTED_MESSAGE.to_string());
            self.notify(NotificationKind::Info, UNSUPPORTED_MESSAGE);
            return None;
        };

        let transcript = match voice.listen() {
            Ok(transcript) => transcript,
            Err(e) => {
                self.notify(NotificationKind::Warning, e.to_string());
                return None;
            }
        };

        let command = VoiceCommand::interpret(&transcript);
        self.voice_message = Some(command.transcript.clone());
        self.chat_input.clone_from(&command.transcript);
        self.notify(
            NotificationKind::Info,
            format!("Voice captured: {}", command.transcript),
        );

        if let Some(term) = &command.search {
            self.query.search.clone_from(term);
        }
        if command.open_shop && self.profile.is_some() {
            self.mode = Mode::Shop;
        }
        Some(command)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn find_product(&self, product_id: ProductId) -> Result<Product, ShopError> {
        self.products
            .iter()
            .chain(self.wishlist.items())
            .chain(self.cart.lines().iter().map(|line| &line.product))
            .find(|product| product.id == product_id)
            .cloned()
            .ok_or_else(|| ShopError::NotFound(format!("Product {product_id}")))
    }

    async fn reload_cart(&mut self) -> Result<(), ShopError> {
        let lines = self.backend.cart().await;
        let lines = self.check(lines)?;
        self.cart = Cart::from_lines(lines);
        self.observe_budget();
        Ok(())
    }

    async fn reload_wishlist(&mut self) -> Result<(), ShopError> {
        let items = self.backend.wishlist().await;
        let items = self.check(items)?;
        self.wishlist = Wishlist::from_items(items);
        Ok(())
    }

    fn observe_budget(&mut self) {
        if let Some(alert) = self.budget.observe(self.cart.total()) {
            self.notify(NotificationKind::Warning, alert.to_string());
        }
    }

    /// Report an error to the shopper, passing the result through.
    fn check<T>(&mut self, result: Result<T, ShopError>) -> Result<T, ShopError> {
        if let Err(e) = &result {
            self.report(e);
        }
        result
    }

    fn report(&mut self, error: &ShopError) {
        let kind = error.notification_kind();
        if kind == NotificationKind::Error {
            tracing::warn!(error = %error, "Shop action failed");
            self.banner.set(error.to_string());
        }
        self.notify(kind, error.to_string());
    }

    fn notify(&mut self, kind: NotificationKind, message: impl Into<String>) {
        self.notifications.push(kind, message);
    }
}
