//! Proxy package categories.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a string does not name a known category.
#[derive(thiserror::Error, Debug, Clone)]
#[error("unknown proxy category: {0}")]
pub struct CategoryParseError(pub String);

/// Category of a proxy package as reported by the backend.
///
/// The backend's `category` column is free text, so unknown values are
/// preserved rather than rejected: they still render on the pricing page,
/// they just don't get a dedicated landing page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProxyCategory {
    Residential,
    Mobile,
    Datacenter,
    Fast,
    #[serde(untagged)]
    Other(String),
}

impl ProxyCategory {
    /// All categories with a dedicated landing page, in display order.
    pub const KNOWN: [Self; 4] = [Self::Residential, Self::Mobile, Self::Datacenter, Self::Fast];

    /// Parse a category from backend text, case-insensitively.
    ///
    /// Never fails: unrecognized values become [`ProxyCategory::Other`].
    #[must_use]
    pub fn from_backend(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "residential" => Self::Residential,
            "mobile" => Self::Mobile,
            "datacenter" => Self::Datacenter,
            "fast" => Self::Fast,
            other => Self::Other(other.to_owned()),
        }
    }

    /// The lowercase wire/query-string name of the category.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Residential => "residential",
            Self::Mobile => "mobile",
            Self::Datacenter => "datacenter",
            Self::Fast => "fast",
            Self::Other(s) => s,
        }
    }

    /// Human-facing label ("Residential", "Datacenter", ...).
    #[must_use]
    pub fn label(&self) -> String {
        let s = self.as_str();
        let mut chars = s.chars();
        chars.next().map_or_else(String::new, |first| {
            first.to_uppercase().collect::<String>() + chars.as_str()
        })
    }

    /// Datacenter packages hand out static IPs; everything else rotates.
    #[must_use]
    pub const fn is_static(&self) -> bool {
        matches!(self, Self::Datacenter)
    }

    /// Case-insensitive match against a user-supplied filter string.
    #[must_use]
    pub fn matches(&self, filter: &str) -> bool {
        self.as_str().eq_ignore_ascii_case(filter.trim())
    }
}

impl fmt::Display for ProxyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ProxyCategory {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // from_backend never fails; FromStr exists for parse() call sites
        Ok(Self::from_backend(s))
    }
}
