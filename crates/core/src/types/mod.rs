//! Core types for ProxiesSeller.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod email;
pub mod id;
pub mod plan;
pub mod status;

pub use category::{CategoryParseError, ProxyCategory};
pub use email::{Email, EmailError};
pub use id::*;
pub use plan::{PackageRow, PriceUnit, Rotation, UiPlan};
pub use status::SubscriptionStatus;
