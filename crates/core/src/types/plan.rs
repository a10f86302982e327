//! Plan types: the backend's package records and the UI-facing plan shape.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{PlanId, ProxyCategory};

/// A package row as returned by the backend's `GET /packages`.
///
/// Only the fields the site actually reads are modeled; the backend sends
/// more (status, created_at, ...) and unknown fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageRow {
    #[serde(deserialize_with = "plan_id_from_string_or_number")]
    pub id: PlanId,
    pub name: String,
    pub category: String,
    pub price_cents: i64,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// The PHP backend serializes ids as strings or numbers depending on the
/// driver configuration; accept both.
fn plan_id_from_string_or_number<'de, D>(deserializer: D) -> Result<PlanId, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(i64),
    }

    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => PlanId::new(s),
        StringOrNumber::Number(n) => PlanId::new(n.to_string()),
    })
}

/// Billing unit for a plan price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceUnit {
    #[serde(rename = "/mo")]
    PerMonth,
    #[serde(rename = "/GB")]
    PerGigabyte,
}

impl PriceUnit {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PerMonth => "/mo",
            Self::PerGigabyte => "/GB",
        }
    }
}

/// IP assignment behavior advertised for a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    Rotating,
    Static,
}

impl Rotation {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rotating => "rotating",
            Self::Static => "static",
        }
    }
}

/// The display-ready plan shape consumed by templates and `/api/plans`.
///
/// Derived from [`PackageRow`] by the site's plan mapping; carries no
/// invariants beyond what the mapping guarantees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiPlan {
    pub id: PlanId,
    pub name: String,
    #[serde(rename = "type")]
    pub category: ProxyCategory,
    /// Dollars, two decimal places.
    pub price: Decimal,
    #[serde(rename = "priceUnit")]
    pub price_unit: PriceUnit,
    pub rotation: Rotation,
    pub protocol: String,
    pub country: String,
    pub features: Vec<String>,
    #[serde(default)]
    pub popular: bool,
}
