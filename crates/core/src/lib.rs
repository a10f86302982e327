//! ProxiesSeller Core - Shared types library.
//!
//! This crate provides common types used across the ProxiesSeller components:
//! - `site` - Public marketing site, checkout flow, and customer dashboard
//! - `integration-tests` - In-process router tests
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. All real
//! business data (users, packages, billing) lives in the external backend;
//! these types give the site a validated vocabulary for talking about it.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, categories, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
