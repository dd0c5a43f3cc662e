//! Clove Storefront Client library.
//!
//! A headless client for the Clove commerce REST API. It owns the pieces of
//! state a storefront UI needs between page loads - authentication session,
//! cart contents, last search - and reconciles them with catalog data fetched
//! from the API.
//!
//! # Architecture
//!
//! - [`store`] - Persistent client state: three independent slices (session,
//!   cart, search), the first two mirrored to local JSON storage and
//!   rehydrated once at open
//! - [`api`] - Typed `reqwest` client for the collaborator endpoints, with
//!   in-process caching of read-heavy catalog fetches
//! - [`catalog`] - Product listing state machine: paginated browsing,
//!   category/price filtering, stale-response fencing
//! - [`cart`] - Cart operations coupled to the store with
//!   mutate-then-persist ordering
//! - [`checkout`] - Payment gateway token and payment submission
//!
//! The session token doubles as the process-wide default Authorization value
//! for outbound requests; it is owned by a single-writer cell that only
//! session writes may update.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod search;
pub mod state;
pub mod store;

pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use state::Storefront;
