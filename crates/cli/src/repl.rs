//! Interactive shop loop.
//!
//! Reads commands from stdin while a [`Debouncer`] coalesces search edits;
//! whichever arrives first is handled to completion before the next.

use std::io::{self, Write};
use std::sync::mpsc::Sender;
use std::time::Duration;

use bazaar_storefront::backend::ShopBackend;
use bazaar_storefront::login::LoginForm;
use bazaar_storefront::search::Debouncer;
use bazaar_storefront::shop::{Mode, Shop};
use secrecy::ExposeSecret;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::commands::{self, Command, HELP};
use crate::render;

const LOGIN_HINT: &str = "Log in first: login <email> <password> <name> (or register ...)";

/// What the loop should do after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Repl<B> {
    shop: Shop<B>,
    debouncer: Debouncer<String>,
    speech: Option<Sender<String>>,
}

impl<B: ShopBackend> Repl<B> {
    /// Wrap a shop. Settled search terms arrive on the returned receiver and
    /// should be fed back through [`Repl::apply_search`].
    #[must_use]
    pub fn new(
        shop: Shop<B>,
        debounce: Duration,
        speech: Option<Sender<String>>,
    ) -> (Self, UnboundedReceiver<String>) {
        let (debouncer, settled) = Debouncer::spawn(debounce);
        (
            Self {
                shop,
                debouncer,
                speech,
            },
            settled,
        )
    }

    #[must_use]
    pub const fn shop(&self) -> &Shop<B> {
        &self.shop
    }

    /// Opening text: the assistant's welcome and how to log in.
    #[must_use]
    pub fn welcome(&self) -> String {
        let greeting = self
            .shop
            .transcript()
            .last()
            .map(|entry| format!("bot: {}\n", entry.text))
            .unwrap_or_default();
        format!("{greeting}{LOGIN_HINT}\nType `help` for all commands.")
    }

    /// Handle one input line and return what to show.
    pub async fn handle_line(&mut self, line: &str) -> (Flow, String) {
        let command = match commands::parse(line) {
            Ok(Some(command)) => command,
            Ok(None) => return (Flow::Continue, String::new()),
            Err(e) => return (Flow::Continue, e.to_string()),
        };
        if matches!(command, Command::Quit) {
            return (Flow::Quit, "Goodbye.".to_string());
        }
        if self.shop.mode() == Mode::Login && !command.allowed_logged_out() {
            return (Flow::Continue, LOGIN_HINT.to_string());
        }

        tracing::debug!(?command, "Handling command");
        let mut output = self.execute(command).await;
        self.drain_feedback(&mut output);
        (Flow::Continue, output)
    }

    /// Refresh the listing for a settled search term.
    pub async fn apply_search(&mut self, term: String) -> String {
        self.shop.set_search(term);
        let mut output = if self.shop.refresh_products().await {
            self.listing()
        } else {
            String::new()
        };
        self.drain_feedback(&mut output);
        output
    }

    /// Run one command and return its direct output.
    ///
    /// `Shop` turns every failed action into a notification (and a banner for
    /// transport errors), so failures show up through `drain_feedback` and
    /// the `Result`s dropped below carry nothing more.
    async fn execute(&mut self, command: Command) -> String {
        match command {
            Command::Help => HELP.to_string(),
            Command::Quit => String::new(),
            Command::Login {
                mode,
                email,
                password,
                name,
            } => {
                let form = LoginForm::new(mode, name, email, password.expose_secret());
                if self.shop.login(&form).is_err() {
                    return String::new();
                }
                let _ = self.shop.sync().await;
                self.shop.refresh_products().await;
                let name = self
                    .shop
                    .profile()
                    .map(|profile| profile.name.clone())
                    .unwrap_or_default();
                format!("Welcome, {name}!\n{}", self.listing())
            }
            Command::Logout => {
                self.shop.logout();
                "Logged out.".to_string()
            }
            Command::Products => self.listing(),
            Command::Search(term) => {
                self.shop.set_search(term.clone());
                self.debouncer.push(term);
                String::new()
            }
            Command::Category(category) => {
                self.shop.set_category(category);
                if self.shop.refresh_products().await {
                    self.listing()
                } else {
                    String::new()
                }
            }
            Command::Add(id) => {
                let _ = self.shop.add_to_cart(id).await;
                String::new()
            }
            Command::Remove(id) => {
                let _ = self.shop.remove_from_cart(id).await;
                String::new()
            }
            Command::Wish(id) => {
                let _ = self.shop.add_to_wishlist(id).await;
                String::new()
            }
            Command::Unwish(id) => {
                let _ = self.shop.remove_from_wishlist(id).await;
                String::new()
            }
            Command::Cart => render::cart(self.shop.cart(), self.shop.budget()),
            Command::Wishlist => render::wishlist(self.shop.wishlist()),
            Command::Budget => render::budget(self.shop.budget(), self.shop.cart()),
            Command::Limit(limit) => {
                self.shop.set_budget_limit(limit);
                render::budget(self.shop.budget(), self.shop.cart())
            }
            Command::Period(period) => {
                self.shop.set_budget_period(period);
                format!("Budget period set to {period}.")
            }
            Command::Pay(method) => {
                self.shop.set_payment_method(method);
                format!("Payment method: {method}.")
            }
            Command::Checkout => match self.shop.place_order().await {
                Ok(_) => self.shop.delivery_status().unwrap_or_default().to_string(),
                Err(_) => String::new(),
            },
            Command::Orders => render::orders(self.shop.orders()),
            Command::Track(order_id) => {
                let _ = self.shop.track(&order_id).await;
                String::new()
            }
            Command::Advance(order_id) => {
                let _ = self.shop.advance_order(&order_id).await;
                String::new()
            }
            Command::Chat(message) => self
                .shop
                .chat(&message)
                .await
                .map(|reply| format!("bot: {reply}"))
                .unwrap_or_default(),
            Command::Voice(utterance) => self.voice(utterance).await,
            Command::Dismiss => {
                self.shop.dismiss_banner();
                String::new()
            }
        }
    }

    async fn voice(&mut self, utterance: String) -> String {
        if let Some(speech) = &self.speech {
            let _ = speech.send(utterance);
        }
        let Some(command) = self.shop.listen() else {
            return String::new();
        };

        if command.search.is_some() && self.shop.mode() == Mode::Shop {
            if self.shop.refresh_products().await {
                return self.listing();
            }
        } else if command.open_shop && self.shop.mode() == Mode::Shop {
            return render::cart(self.shop.cart(), self.shop.budget());
        }
        String::new()
    }

    fn listing(&self) -> String {
        render::products(self.shop.visible_products(), &self.shop.listing_summary())
    }

    /// Append pending notifications and the banner, if any.
    fn drain_feedback(&mut self, output: &mut String) {
        for notification in self.shop.take_notifications() {
            if !output.is_empty() {
                output.push('\n');
            }
            output.push_str(&render::notification(&notification));
        }
        if let Some(banner) = self.shop.banner() {
            if !output.is_empty() {
                output.push('\n');
            }
            output.push_str("! ");
            output.push_str(banner);
            output.push_str(" (type `dismiss` to hide)");
        }
    }
}

/// Run the loop until `quit` or end of input.
///
/// # Errors
///
/// Returns an I/O error if stdin or stdout fails.
pub async fn run<B: ShopBackend>(
    mut repl: Repl<B>,
    mut settled: UnboundedReceiver<String>,
) -> io::Result<()> {
    let mut console = Console::new();
    console.show(&repl.welcome())?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        console.prompt()?;
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let (flow, output) = repl.handle_line(&line).await;
                console.show(&output)?;
                if flow == Flow::Quit {
                    break;
                }
            }
            Some(term) = settled.recv() => {
                let output = repl.apply_search(term).await;
                console.show(&output)?;
            }
        }
    }
    Ok(())
}

struct Console {
    out: io::Stdout,
}

impl Console {
    fn new() -> Self {
        Self { out: io::stdout() }
    }

    fn show(&mut self, text: &str) -> io::Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        let mut out = self.out.lock();
        writeln!(out, "\r{text}")
    }

    fn prompt(&mut self) -> io::Result<()> {
        let mut out = self.out.lock();
        write!(out, "> ")?;
        out.flush()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use bazaar_storefront::backend::LocalBackend;
    use bazaar_storefront::budget::BudgetPolicy;
    use bazaar_storefront::catalog::Catalog;

    use super::*;
    use crate::speech::TypedSpeech;

    fn repl(voice: bool) -> (Repl<LocalBackend>, UnboundedReceiver<String>) {
        let backend = LocalBackend::new(Arc::new(Catalog::generate(30)));
        let mut shop = Shop::new(backend, BudgetPolicy::default());
        let mut sender = None;
        if voice {
            let (speech, tx) = TypedSpeech::channel();
            shop = shop.with_voice(Box::new(speech));
            sender = Some(tx);
        }
        Repl::new(shop, Duration::from_millis(300), sender)
    }

    async fn logged_in(voice: bool) -> (Repl<LocalBackend>, UnboundedReceiver<String>) {
        let (mut repl, settled) = repl(voice);
        let (_, output) = repl.handle_line("login asha@example.in secret1 Asha").await;
        assert!(output.starts_with("Welcome, Asha!"));
        assert!(output.contains("30 shown / 30 total"));
        assert!(output.ends_with("[ok] Login successful."));
        (repl, settled)
    }

    #[tokio::test]
    async fn test_commands_need_login() {
        let (mut repl, _settled) = repl(false);
        assert!(repl.welcome().starts_with("bot: Namaste!"));

        let (flow, output) = repl.handle_line("cart").await;
        assert_eq!(flow, Flow::Continue);
        assert_eq!(output, LOGIN_HINT);

        let (_, output) = repl.handle_line("login asha@example.in 123 Asha").await;
        assert_eq!(output, "[warn] Password must be at least 6 characters.");

        let (flow, _) = repl.handle_line("quit").await;
        assert_eq!(flow, Flow::Quit);
    }

    #[tokio::test]
    async fn test_cart_budget_and_checkout() {
        let (mut repl, _settled) = logged_in(false).await;

        let (_, output) = repl.handle_line("add 1").await;
        assert_eq!(output, "[ok] Electronics Product 1 added to cart.");

        let (_, output) = repl.handle_line("limit 400").await;
        assert!(output.contains("(100% used)"));
        assert!(output.ends_with(
            "[warn] Budget exceeded. Cart total is Rs 474 while your limit is Rs 400."
        ));

        let (_, output) = repl.handle_line("checkout").await;
        assert_eq!(
            output,
            "[warn] Order blocked because cart total Rs 474 exceeds your budget limit of Rs 400."
        );

        repl.handle_line("limit 30000").await;
        repl.handle_line("pay cod").await;
        let (_, output) = repl.handle_line("checkout").await;
        assert!(output.starts_with("Order Confirmed -> Packed"));
        assert!(output.contains("placed successfully."));

        let (_, output) = repl.handle_line("orders").await;
        assert!(output.contains("Cash on Delivery"));
        assert!(repl.shop().cart().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_is_debounced() {
        let (mut repl, mut settled) = logged_in(false).await;

        for term in ["b", "bo", "books product 5"] {
            let (_, output) = repl.handle_line(&format!("search {term}")).await;
            assert!(output.is_empty());
        }

        let term = settled.recv().await.unwrap();
        assert_eq!(term, "books product 5");
        let output = repl.apply_search(term).await;
        assert!(output.contains("Books Product 5"));
        assert!(output.ends_with("1 shown / 1 total"));
    }

    #[tokio::test]
    async fn test_chat_and_voice() {
        let (mut repl, _settled) = logged_in(false).await;
        let (_, output) = repl.handle_line("chat can i pay with upi?").await;
        assert_eq!(
            output,
            "bot: Yes, UPI, Card, Net Banking and Cash on Delivery are available."
        );

        let (_, output) = repl.handle_line("category books").await;
        assert!(output.contains("Books Product 5"));
        assert!(!output.contains("Electronics"));
        let (_, output) = repl.handle_line("chat please recommend something").await;
        assert!(output.starts_with("bot: Top picks under Rs 1,500: Electronics Product 1"));

        let (_, output) = repl.handle_line("voice search books").await;
        assert_eq!(output, "[info] Voice API is not supported on this device.");

        let (mut repl, _settled) = logged_in(true).await;
        let (_, output) = repl.handle_line("voice search sports").await;
        assert!(output.contains("Sports Product 6"));
        assert!(output.ends_with("[info] Voice captured: search sports"));
    }

    #[tokio::test]
    async fn test_parse_errors_are_shown() {
        let (mut repl, _settled) = logged_in(false).await;
        let (_, output) = repl.handle_line("add lots").await;
        assert_eq!(output, "Not a product id: lots");
    }
}
