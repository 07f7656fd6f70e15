//! Bazaar Storefront library.
//!
//! Everything a shopper session needs, usable from the API server binary,
//! the terminal client, and tests:
//!
//! - [`shop::Shop`] - the shop controller (login, listing, cart, wishlist,
//!   budget, checkout, tracking, chat, voice, notifications)
//! - [`backend`] - the in-memory and REST backends behind the controller
//! - [`routes`] - the axum JSON API served by `bazaar-storefront`
//!
//! Domain pieces (`cart`, `budget`, `orders`, `filter`, `assistant`, ...) are
//! plain synchronous types; only the backends, the debouncer, and the server
//! touch the async runtime.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod assistant;
pub mod backend;
pub mod budget;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod filter;
pub mod identity;
pub mod login;
pub mod middleware;
pub mod notify;
pub mod orders;
pub mod routes;
pub mod search;
pub mod session;
pub mod shop;
pub mod state;
pub mod voice;

pub use backend::{LocalBackend, RemoteBackend, ShopBackend};
pub use catalog::Catalog;
pub use config::{ClientConfig, StorefrontConfig};
pub use error::{AppError, ShopError, TransportError};
pub use shop::{Mode, Shop};
pub use state::AppState;
