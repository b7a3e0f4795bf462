//! Replay and phishing checks on a parsed sign-in message.
//!
//! All checks are pure comparisons over values the caller already holds.

use chrono::{DateTime, Utc};
use url::Url;

use crate::config::origin_host;
use crate::error::AuthFailure;
use crate::siws::SignInMessage;

/// The message must name this service's own host as its domain.
///
/// Scheme and path of `expected_origin` are ignored; `host[:port]` is
/// compared exactly.
pub fn check_domain(message: &SignInMessage, expected_origin: &Url) -> Result<(), AuthFailure> {
    let expected = origin_host(expected_origin).unwrap_or_default();
    if message.domain != expected {
        return Err(AuthFailure::DomainMismatch {
            expected,
            found: message.domain.clone(),
        });
    }
    Ok(())
}

/// The message nonce must equal the anti-forgery token of the current request.
///
/// A request with no token at all can never match.
pub fn check_nonce(message: &SignInMessage, expected_token: Option<&str>) -> Result<(), AuthFailure> {
    match expected_token {
        Some(token) if token == message.nonce => Ok(()),
        _ => Err(AuthFailure::NonceMismatch),
    }
}

/// The message must be inside its optional `notBefore`/`expirationTime` window.
pub fn check_validity_window(message: &SignInMessage, now: DateTime<Utc>) -> Result<(), AuthFailure> {
    if let Some(expiration) = &message.expiration_time {
        if now >= expiration.at() {
            return Err(AuthFailure::Expired);
        }
    }
    if let Some(not_before) = &message.not_before {
        if now < not_before.at() {
            return Err(AuthFailure::NotYetValid);
        }
    }
    Ok(())
}
