//! commerce-query core - shared types library.
//!
//! This crate provides common types used across all commerce-query components:
//! - `client` - REST clients for the Shopper APIs
//! - `hooks` - query cache, mutation hooks and cache-update matrices
//! - `cli` - command-line driver
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no caches, no HTTP clients.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, and hook statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
