//! GoMarket Core - Shared types library.
//!
//! This crate provides common types used across all GoMarket components:
//! - `cart` - Cart state container and summary view-model
//! - `cli` - Command-line tool for inspecting and mutating a local cart
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no
//! runtime dependencies. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe product ids, prices, and
//!   currency codes

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
