//! Unified error types.
//!
//! Every [`AuthFailure`] is terminal for the sign-in attempt it came from.
//! The specific kind is meant for operator logs only; the framework-facing
//! entry points collapse all of them to a single "denied" outcome.

use thiserror::Error;

/// Top-level crate error.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Authorization failed: {0}")]
    Failure(#[from] AuthFailure),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Sign-in message decoding errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Malformed sign-in message: {0}")]
    Malformed(String),

    #[error("Missing required field `{0}`")]
    MissingField(&'static str),

    #[error("Invalid timestamp in `{field}`: {value}")]
    InvalidTimestamp { field: &'static str, value: String },
}

impl From<serde_json::Error> for ParseError {
    fn from(e: serde_json::Error) -> Self {
        ParseError::Malformed(e.to_string())
    }
}

/// Reasons a sign-in attempt or session establishment was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthFailure {
    #[error("Credentials are missing a message or signature")]
    MissingCredential,

    #[error("Server base URL is not configured")]
    MisconfiguredServer,

    #[error("Malformed message: {0}")]
    MalformedMessage(#[from] ParseError),

    #[error("Domain mismatch: expected {expected}, found {found}")]
    DomainMismatch { expected: String, found: String },

    #[error("Nonce does not match the anti-forgery token")]
    NonceMismatch,

    #[error("Message has expired")]
    Expired,

    #[error("Message is not yet valid")]
    NotYetValid,

    #[error("Signature verification failed")]
    InvalidSignature,

    #[error("Wallet is not an administrator")]
    NotAuthorized,

    #[error("Session token has no subject")]
    MissingSubject,
}

impl AuthFailure {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::MissingCredential => FailureKind::MissingCredential,
            Self::MisconfiguredServer => FailureKind::MisconfiguredServer,
            Self::MalformedMessage(_) => FailureKind::MalformedMessage,
            Self::DomainMismatch { .. } => FailureKind::DomainMismatch,
            Self::NonceMismatch => FailureKind::NonceMismatch,
            Self::Expired => FailureKind::Expired,
            Self::NotYetValid => FailureKind::NotYetValid,
            Self::InvalidSignature => FailureKind::InvalidSignature,
            Self::NotAuthorized => FailureKind::NotAuthorized,
            Self::MissingSubject => FailureKind::MissingSubject,
        }
    }

    /// Whether the failure points at a deployment defect rather than the client.
    pub fn is_operational(&self) -> bool {
        matches!(self, Self::MisconfiguredServer)
    }
}

/// Field-less discriminant of [`AuthFailure`], used as a structured log field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    MissingCredential,
    MisconfiguredServer,
    MalformedMessage,
    DomainMismatch,
    NonceMismatch,
    Expired,
    NotYetValid,
    InvalidSignature,
    NotAuthorized,
    MissingSubject,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingCredential => "missing_credential",
            Self::MisconfiguredServer => "misconfigured_server",
            Self::MalformedMessage => "malformed_message",
            Self::DomainMismatch => "domain_mismatch",
            Self::NonceMismatch => "nonce_mismatch",
            Self::Expired => "expired",
            Self::NotYetValid => "not_yet_valid",
            Self::InvalidSignature => "invalid_signature",
            Self::NotAuthorized => "not_authorized",
            Self::MissingSubject => "missing_subject",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Configuration errors raised at process start.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Environment variable {0} is not set")]
    MissingVar(&'static str),

    #[error("Invalid URL in {var}: {reason}")]
    InvalidUrl { var: &'static str, reason: String },

    #[error("Administrator allow-list is empty")]
    EmptyAllowList,
}
