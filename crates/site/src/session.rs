//! Signed session cookies.
//!
//! Sessions are a single HMAC-signed cookie, not a server-side store. The
//! token format is `"<user id>:<email>:<signature>"` where the signature is
//! HMAC-SHA256 over `"<user id>:<email>"` keyed with `SESSION_SECRET`,
//! hex-encoded.
//!
//! Properties:
//! - Forging a token without the secret is infeasible.
//! - There is no revocation list: a leaked valid cookie stays valid until it
//!   expires. Acceptable for this dashboard shell; the backend re-checks
//!   credentials for anything that matters.
//!
//! A second, readable `ps_email` cookie carries the email for display only
//! and is never trusted.

use axum_extra::extract::cookie::{Cookie, SameSite};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use time::Duration;

use crate::models::SessionUser;
use proxies_seller_core::{Email, UserId};

type HmacSha256 = Hmac<Sha256>;

/// Name of the signed session cookie.
pub const SESSION_COOKIE: &str = "ps_session";

/// Name of the display-only email cookie (not HttpOnly, never trusted).
pub const EMAIL_COOKIE: &str = "ps_email";

/// Session lifetime: 30 days.
const SESSION_MAX_AGE: Duration = Duration::days(30);

/// Compute the hex-encoded HMAC-SHA256 signature for a payload.
fn sign(payload: &str, secret: &SecretString) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.expose_secret().as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(payload.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Build a signed session token for a user.
#[must_use]
pub fn issue_token(user: &SessionUser, secret: &SecretString) -> String {
    let payload = format!("{}:{}", user.id, user.email);
    let signature = sign(&payload, secret);
    format!("{payload}:{signature}")
}

/// Verify a session token and reconstruct the user.
///
/// Returns `None` for missing segments, an invalid email, or a signature
/// that does not verify. Verification is constant-time via [`Mac::verify_slice`].
#[must_use]
pub fn verify_token(token: &str, secret: &SecretString) -> Option<SessionUser> {
    let mut segments = token.splitn(3, ':');
    let id = segments.next()?;
    let email = segments.next()?;
    let signature = segments.next()?;

    if id.is_empty() {
        return None;
    }

    let payload = format!("{id}:{email}");
    let mut mac = HmacSha256::new_from_slice(secret.expose_secret().as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(payload.as_bytes());
    let expected = hex::decode(signature).ok()?;
    mac.verify_slice(&expected).ok()?;

    let email = Email::parse(email).ok()?;
    Some(SessionUser {
        id: UserId::new(id),
        email,
    })
}

/// Build the signed session cookie.
#[must_use]
pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(SESSION_MAX_AGE)
        .build()
}

/// Build the display-only email cookie. Readable by page scripts.
#[must_use]
pub fn email_cookie(email: &Email, secure: bool) -> Cookie<'static> {
    Cookie::build((EMAIL_COOKIE, email.as_str().to_owned()))
        .path("/")
        .http_only(false)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(SESSION_MAX_AGE)
        .build()
}

/// Build a removal cookie: empty value, max-age zero.
#[must_use]
pub fn removal_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build((name, ""))
        .path("/")
        .same_site(SameSite::Lax)
        .max_age(Duration::ZERO)
        .build()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn secret() -> SecretString {
        SecretString::from("kJ8#mP2$vQ9@xR4!nT7&wY1*zB5^cF3%")
    }

    fn user() -> SessionUser {
        SessionUser {
            id: UserId::new("42"),
            email: Email::parse("user@example.com").unwrap(),
        }
    }

    #[test]
    fn test_roundtrip() {
        let token = issue_token(&user(), &secret());
        let verified = verify_token(&token, &secret()).unwrap();
        assert_eq!(verified.id.as_str(), "42");
        assert_eq!(verified.email.as_str(), "user@example.com");
    }

    #[test]
    fn test_token_shape() {
        let token = issue_token(&user(), &secret());
        let parts: Vec<&str> = token.split(':').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "42");
        assert_eq!(parts[1], "user@example.com");
        // hex-encoded SHA-256 output
        assert_eq!(parts[2].len(), 64);
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let token = issue_token(&user(), &secret());
        // Flip a character in the signature segment
        let mut tampered = token.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == '0' { '1' } else { '0' });
        assert!(verify_token(&tampered, &secret()).is_none());
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let token = issue_token(&user(), &secret());
        let tampered = token.replacen("42", "43", 1);
        assert!(verify_token(&tampered, &secret()).is_none());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = issue_token(&user(), &secret());
        let other = SecretString::from("qW3%eR6^tY9&uI2*oP5$aS8#dF1@gH4!");
        assert!(verify_token(&token, &other).is_none());
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        assert!(verify_token("", &secret()).is_none());
        assert!(verify_token("justone", &secret()).is_none());
        assert!(verify_token("two:parts", &secret()).is_none());
        assert!(verify_token(":user@example.com:deadbeef", &secret()).is_none());
        assert!(verify_token("42:user@example.com:not-hex!", &secret()).is_none());
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("token".to_owned(), true);
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(SESSION_MAX_AGE));
    }

    #[test]
    fn test_removal_cookie_expires_immediately() {
        let cookie = removal_cookie(SESSION_COOKIE);
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
    }
}
