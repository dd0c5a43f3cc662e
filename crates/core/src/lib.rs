//! Clove Core - Shared types library.
//!
//! This crate provides the domain types used across the Clove storefront
//! client:
//! - `storefront-client` - Headless client for the commerce REST API
//! - `integration-tests` - End-to-end tests against a fixture API
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Catalog, cart, and session types as they appear on the wire
//!   and in persisted state

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
