//! Core types for the Clove storefront client.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod catalog;
pub mod email;
pub mod id;
pub mod price;
pub mod session;

pub use cart::CartEntry;
pub use catalog::{Category, Product};
pub use email::{Email, EmailError};
pub use id::*;
pub use price::PriceRange;
pub use session::{Role, RoleError, Session, UserSummary};
