//! Status enums for dashboard entities.

use serde::{Deserialize, Serialize};

/// Subscription lifecycle status shown on the dashboard.
///
/// The dashboard renders mocked billing data, but the status vocabulary
/// matches what the backend reports for real subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    #[default]
    Active,
    Expired,
}

impl SubscriptionStatus {
    /// Human-facing label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Expired => "Expired",
        }
    }

    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}
