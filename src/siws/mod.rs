//! Sign-In With Solana messages.
//!
//! A client proves control of a wallet by signing a human-readable statement
//! that binds the serving domain and a server-issued nonce. The JSON form of
//! that statement travels alongside a base58 signature as [`Credentials`];
//! [`SignInMessage::parse`] turns it into a strict structure and
//! [`SignInMessage::to_canonical_text`] reproduces the exact text the wallet signed.

pub mod codec;
pub mod verify;
pub mod wire;

#[cfg(feature = "native-auth")]
pub mod native;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::shared::WalletAddress;

pub use verify::{verify_signature, Ed25519Verifier, SignatureVerifier};

/// Header type tag for SIP-99 sign-in messages.
pub const SIWS_HEADER_TYPE: &str = "sip99";

/// Chain ID rendered when the payload omits one.
pub const DEFAULT_CHAIN_ID: &str = "1";

// ============================================================================
// Message types
// ============================================================================

/// A parsed sign-in message.
///
/// Every required field is non-empty. Optional fields that were empty on the
/// wire are `None`, which matches how they are omitted from the signed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInMessage {
    pub domain: String,
    pub address: WalletAddress,
    pub statement: Option<String>,
    pub uri: String,
    pub version: String,
    pub chain_id: String,
    pub nonce: String,
    pub issued_at: SiwsTime,
    pub expiration_time: Option<SiwsTime>,
    pub not_before: Option<SiwsTime>,
    pub request_id: Option<String>,
    pub resources: Option<Vec<String>>,
}

/// A timestamp carried in a sign-in message.
///
/// The raw string is kept verbatim because it is part of the signed bytes;
/// `at` is its parsed value for validity-window checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiwsTime {
    raw: String,
    at: DateTime<Utc>,
}

impl SiwsTime {
    pub fn parse(field: &'static str, raw: String) -> Result<Self, ParseError> {
        match DateTime::parse_from_rfc3339(&raw) {
            Ok(at) => Ok(Self {
                at: at.with_timezone(&Utc),
                raw,
            }),
            Err(_) => Err(ParseError::InvalidTimestamp { field, value: raw }),
        }
    }

    /// Render a timestamp the way browser wallets do (`2026-10-19T09:00:00.000Z`).
    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        Self {
            raw: at.to_rfc3339_opts(SecondsFormat::Millis, true),
            at,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn at(&self) -> DateTime<Utc> {
        self.at
    }
}

impl std::fmt::Display for SiwsTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

// ============================================================================
// Credential exchange types
// ============================================================================

/// What the client submits to the credentials sign-in endpoint.
///
/// Missing fields deserialize as empty strings so that absence and emptiness
/// are rejected the same way.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub signature: String,
}

impl Credentials {
    pub fn new(message: impl Into<String>, signature: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            signature: signature.into(),
        }
    }

    /// Both the message and the signature are present.
    pub fn is_complete(&self) -> bool {
        !self.message.is_empty() && !self.signature.is_empty()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("message_len", &self.message.len())
            .field("signature_len", &self.signature.len())
            .finish()
    }
}

/// A wallet whose control has been cryptographically proven.
///
/// Carries no claims beyond the address; roles are resolved separately.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuthenticatedSubject {
    pub address: WalletAddress,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_siws_time_keeps_raw_text() {
        let t = SiwsTime::parse("issuedAt", "2026-10-19T09:00:00.000Z".into()).unwrap();
        assert_eq!(t.as_str(), "2026-10-19T09:00:00.000Z");
        assert_eq!(t.at().timestamp(), 1_792_400_400);
    }

    #[test]
    fn test_siws_time_rejects_garbage() {
        let err = SiwsTime::parse("issuedAt", "yesterday".into()).unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidTimestamp {
                field: "issuedAt",
                value: "yesterday".into()
            }
        );
    }

    #[test]
    fn test_from_datetime_uses_millis_and_z() {
        let at = DateTime::<Utc>::from_timestamp(1_792_400_400, 0).unwrap();
        assert_eq!(
            SiwsTime::from_datetime(at).as_str(),
            "2026-10-19T09:00:00.000Z"
        );
    }

    #[test]
    fn test_credentials_missing_fields_are_empty() {
        let creds: Credentials = serde_json::from_str(r#"{"message":"m"}"#).unwrap();
        assert_eq!(creds.signature, "");
        assert!(!creds.is_complete());
        assert!(Credentials::new("m", "s").is_complete());
    }

    #[test]
    fn test_credentials_debug_hides_contents() {
        let rendered = format!("{:?}", Credentials::new("secret-message", "sig"));
        assert!(!rendered.contains("secret-message"));
    }
}
