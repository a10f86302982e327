//! Session-related types.

use serde::{Deserialize, Serialize};

use proxies_seller_core::{Email, UserId};

/// The identity carried by a verified `ps_session` cookie.
///
/// There is no server-side session record; this is everything the site
/// knows about a logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Backend user id.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
}
