//! Core types for Bazaar.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod email;
pub mod id;
pub mod price;
pub mod product;
pub mod status;

pub use category::{Category, CategoryFilter, ParseCategoryError};
pub use email::{Email, EmailError};
pub use id::*;
pub use price::{Price, PriceError};
pub use product::{Product, Rating};
pub use status::*;
