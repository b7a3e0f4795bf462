//! # visa-admin-auth
//!
//! Wallet-signature sign-in for the business visa review dashboard.
//!
//! Administrators authenticate by signing a Sign-In With Solana message rather
//! than with a password. A successful signature proves control of a wallet;
//! membership in a fixed allow-list then decides whether that wallet gets an
//! administrator session.
//!
//! ## Architecture
//!
//! The crate is organized in layers:
//!
//! 1. **Core**: shared newtypes, error types, configuration
//! 2. **Sign-in messages**: JSON codec, canonical signed text, ed25519 verification
//! 3. **Guards**: domain binding, anti-forgery nonce, validity window
//! 4. **Orchestration**: `Authorizer` runs the checks in order and yields a proven wallet
//! 5. **Sessions**: `SessionResolver` maps a proven wallet to the admin role
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use visa_admin_auth::prelude::*;
//!
//! let config = AuthConfig::from_env()?;
//! let authorizer = Authorizer::from_config(&config, CookieCsrfTokenProvider::from_config(&config)?);
//! let sessions = SessionResolver::new(config.admin_wallets.clone());
//!
//! let ctx = RequestContext::from_cookie_header(cookie_header);
//! let session = match authorizer.authorize_credentials(&credentials, &ctx).await {
//!     Some(subject) => sessions.session_or_deny(Some(subject.address.as_str())),
//!     None => None,
//! };
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes.
pub mod shared;

/// Unified error types.
pub mod error;

/// Process configuration and environment variable names.
pub mod config;

// ── Layer 2: Sign-in messages ────────────────────────────────────────────────

/// Sign-In With Solana message codec and signature verification.
pub mod siws;

// ── Layer 3: Guards ──────────────────────────────────────────────────────────

/// Anti-forgery token access.
pub mod csrf;

/// Domain, nonce and validity-window checks.
pub mod guard;

// ── Layer 4: Orchestration ───────────────────────────────────────────────────

/// The sign-in decision.
pub mod authorize;

// ── Layer 5: Sessions ────────────────────────────────────────────────────────

/// Admin allow-list and session role resolution.
pub mod session;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    pub use crate::shared::WalletAddress;

    // Errors
    pub use crate::error::{AuthError, AuthFailure, ConfigError, FailureKind, ParseError};

    // Configuration
    pub use crate::config::{origin_host, AuthConfig, AuthConfigBuilder};

    // Sign-in messages
    pub use crate::siws::{
        AuthenticatedSubject, Credentials, Ed25519Verifier, SignInMessage, SignatureVerifier,
        SiwsTime,
    };
    #[cfg(feature = "native-auth")]
    pub use crate::siws::native::{sign_in_with_keypair, SignInRequest};

    // Guards
    pub use crate::csrf::{CookieCsrfTokenProvider, CsrfTokenProvider, RequestContext, StaticCsrfToken};

    // Orchestration + sessions
    pub use crate::authorize::Authorizer;
    pub use crate::session::{AdminAllowList, Role, Session, SessionResolver};
}
