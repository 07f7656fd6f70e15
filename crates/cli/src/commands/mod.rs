//! REPL command parsing.
//!
//! One input line is one command: a keyword followed by its arguments.
//! Keywords are case-insensitive; free-text arguments (search terms, chat
//! messages, voice utterances) keep the rest of the line as typed.

use std::str::FromStr;

use bazaar_core::{BudgetPeriod, CategoryFilter, PaymentMethod, Price, ProductId};
use bazaar_storefront::login::AuthMode;
use rust_decimal::Decimal;
use secrecy::SecretString;
use thiserror::Error;

pub const HELP: &str = "\
Account
  login <email> <password> <name>      sign in
  register <email> <password> <name>   create an account and sign in
  logout                               back to the login screen
Browsing
  products                             show the current listing
  search [text]                        search names and descriptions
  category <name|all>                  Electronics, Fashion, Home, Beauty, Books, Sports
Cart and wishlist
  add <id> | remove <id>               cart lines
  wish <id> | unwish <id>              wishlist entries
  cart | wishlist                      show them
Budget
  budget                               usage against the limit
  limit <rupees> | period <monthly|yearly>
Orders
  pay <UPI|Card|Net Banking|Cash on Delivery>
  checkout | orders
  track <order id> | advance <order id>
Assistant
  chat <message> | voice <utterance>
Other
  dismiss | help | quit";

/// A parsed REPL command.
#[derive(Debug)]
pub enum Command {
    Help,
    Quit,
    Login {
        mode: AuthMode,
        email: String,
        password: SecretString,
        name: String,
    },
    Logout,
    Products,
    Search(String),
    Category(CategoryFilter),
    Add(ProductId),
    Remove(ProductId),
    Wish(ProductId),
    Unwish(ProductId),
    Cart,
    Wishlist,
    Budget,
    Limit(Price),
    Period(BudgetPeriod),
    Pay(PaymentMethod),
    Checkout,
    Orders,
    Track(String),
    Advance(String),
    Chat(String),
    Voice(String),
    Dismiss,
}

impl Command {
    /// Whether the command is available before logging in.
    #[must_use]
    pub const fn allowed_logged_out(&self) -> bool {
        matches!(
            self,
            Self::Help | Self::Quit | Self::Login { .. } | Self::Chat(_) | Self::Voice(_)
        )
    }
}

/// Errors that can occur while parsing a command line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown command: {0}. Type `help` for the list.")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("{0}")]
    Invalid(String),
}

/// Parse one input line. Blank lines parse to `None`.
///
/// # Errors
///
/// Returns `ParseError` for unknown keywords and malformed arguments.
pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (keyword, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(keyword, rest)| (keyword, rest.trim()));

    let command = match keyword.to_ascii_lowercase().as_str() {
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "login" => login(AuthMode::Registered, rest)?,
        "register" => login(AuthMode::NewUser, rest)?,
        "logout" => Command::Logout,
        "products" | "ls" => Command::Products,
        "search" => Command::Search(rest.to_string()),
        "category" => Command::Category(parse_arg(rest, "category <name|all>")?),
        "add" => Command::Add(product_id(rest, "add <id>")?),
        "remove" | "rm" => Command::Remove(product_id(rest, "remove <id>")?),
        "wish" => Command::Wish(product_id(rest, "wish <id>")?),
        "unwish" => Command::Unwish(product_id(rest, "unwish <id>")?),
        "cart" => Command::Cart,
        "wishlist" => Command::Wishlist,
        "budget" => Command::Budget,
        "limit" => Command::Limit(limit(rest)?),
        "period" => Command::Period(parse_arg(rest, "period <monthly|yearly>")?),
        "pay" => Command::Pay(parse_arg(rest, "pay <method>")?),
        "checkout" => Command::Checkout,
        "orders" => Command::Orders,
        "track" => Command::Track(rest.to_string()),
        "advance" => Command::Advance(required(rest, "advance <order id>")?.to_string()),
        "chat" | "ask" => Command::Chat(required(rest, "chat <message>")?.to_string()),
        "voice" => Command::Voice(rest.to_string()),
        "dismiss" => Command::Dismiss,
        other => return Err(ParseError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn login(mode: AuthMode, rest: &str) -> Result<Command, ParseError> {
    const USAGE: &str = "login <email> <password> <name>";
    let mut parts = rest.splitn(3, char::is_whitespace);
    let email = parts.next().filter(|s| !s.is_empty());
    let password = parts.next().filter(|s| !s.is_empty());
    let (Some(email), Some(password)) = (email, password) else {
        return Err(ParseError::Usage(USAGE));
    };

    // The name may be blank here; the login form reports it.
    Ok(Command::Login {
        mode,
        email: email.to_string(),
        password: SecretString::from(password.to_string()),
        name: parts.next().unwrap_or_default().trim().to_string(),
    })
}

fn required<'a>(rest: &'a str, usage: &'static str) -> Result<&'a str, ParseError> {
    if rest.is_empty() {
        Err(ParseError::Usage(usage))
    } else {
        Ok(rest)
    }
}

fn parse_arg<T>(rest: &str, usage: &'static str) -> Result<T, ParseError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    required(rest, usage)?
        .parse()
        .map_err(|e: T::Err| ParseError::Invalid(e.to_string()))
}

fn product_id(rest: &str, usage: &'static str) -> Result<ProductId, ParseError> {
    let raw = required(rest, usage)?.trim_start_matches('#');
    raw.parse()
        .map_err(|_| ParseError::Invalid(format!("Not a product id: {raw}")))
}

fn limit(rest: &str) -> Result<Price, ParseError> {
    let raw = required(rest, "limit <rupees>")?;
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    let amount = Decimal::from_str(cleaned.trim_start_matches("Rs").trim())
        .map_err(|_| ParseError::Invalid(format!("Not an amount: {raw}")))?;
    Price::new(amount).map_err(|e| ParseError::Invalid(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bazaar_core::Category;
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn test_blank_line() {
        assert!(parse("   ").unwrap().is_none());
    }

    #[test]
    fn test_login_keeps_multi_word_name() {
        let command = parse("login asha@example.in secret1 Asha Rao").unwrap().unwrap();
        let Command::Login {
            mode,
            email,
            password,
            name,
        } = command
        else {
            panic!("expected login");
        };
        assert_eq!(mode, AuthMode::Registered);
        assert_eq!(email, "asha@example.in");
        assert_eq!(password.expose_secret(), "secret1");
        assert_eq!(name, "Asha Rao");

        assert_eq!(
            parse("register a@b.in").unwrap_err(),
            ParseError::Usage("login <email> <password> <name>")
        );
    }

    #[test]
    fn test_free_text_arguments() {
        assert!(matches!(
            parse("SEARCH Running Shoes").unwrap(),
            Some(Command::Search(term)) if term == "Running Shoes"
        ));
        assert!(matches!(parse("search").unwrap(), Some(Command::Search(term)) if term.is_empty()));
        assert!(matches!(
            parse("voice search red shoes").unwrap(),
            Some(Command::Voice(text)) if text == "search red shoes"
        ));
        assert_eq!(
            parse("chat").unwrap_err(),
            ParseError::Usage("chat <message>")
        );
    }

    #[test]
    fn test_typed_arguments() {
        assert!(matches!(
            parse("category books").unwrap(),
            Some(Command::Category(CategoryFilter::Only(Category::Books)))
        ));
        assert!(matches!(
            parse("category ALL").unwrap(),
            Some(Command::Category(CategoryFilter::All))
        ));
        assert!(matches!(
            parse("add #12").unwrap(),
            Some(Command::Add(id)) if id == ProductId::new(12)
        ));
        assert!(matches!(
            parse("pay net banking").unwrap(),
            Some(Command::Pay(PaymentMethod::NetBanking))
        ));
        assert!(matches!(
            parse("limit Rs 1,500").unwrap(),
            Some(Command::Limit(price)) if price == Price::from_rupees(1500)
        ));
        assert!(matches!(
            parse("period yearly").unwrap(),
            Some(Command::Period(BudgetPeriod::Yearly))
        ));
    }

    #[test]
    fn test_invalid_arguments() {
        assert_eq!(
            parse("add twelve").unwrap_err(),
            ParseError::Invalid("Not a product id: twelve".to_string())
        );
        assert!(matches!(parse("category toys"), Err(ParseError::Invalid(_))));
        assert!(matches!(parse("limit -5"), Err(ParseError::Invalid(_))));
        assert_eq!(
            parse("dance").unwrap_err(),
            ParseError::Unknown("dance".to_string())
        );
    }

    #[test]
    fn test_login_gate() {
        assert!(parse("help").unwrap().unwrap().allowed_logged_out());
        assert!(!parse("cart").unwrap().unwrap().allowed_logged_out());
    }
}
