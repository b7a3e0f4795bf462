//! Authorization orchestrator: turns submitted credentials into a proven wallet.
//!
//! Checks run in a fixed order and the first failure ends the attempt:
//!
//! 1. message and signature present
//! 2. server base URL configured
//! 3. message parses
//! 4. domain matches this service's host
//! 5. nonce matches the request's anti-forgery token
//! 6. message is inside its validity window
//! 7. signature verifies for the claimed address
//!
//! Nothing is cached between attempts; two attempts never share state.

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};
use url::Url;

use crate::config::AuthConfig;
use crate::csrf::{CsrfTokenProvider, RequestContext};
use crate::error::AuthFailure;
use crate::guard::{check_domain, check_nonce, check_validity_window};
use crate::siws::{AuthenticatedSubject, Credentials, Ed25519Verifier, SignInMessage, SignatureVerifier};

/// Decides whether a sign-in attempt proves control of a wallet.
pub struct Authorizer<P, V = Ed25519Verifier> {
    base_url: Option<Url>,
    csrf: P,
    verifier: V,
}

impl<P: CsrfTokenProvider> Authorizer<P, Ed25519Verifier> {
    pub fn new(base_url: Option<Url>, csrf: P) -> Self {
        Self {
            base_url,
            csrf,
            verifier: Ed25519Verifier,
        }
    }

    pub fn from_config(config: &AuthConfig, csrf: P) -> Self {
        Self::new(config.base_url.clone(), csrf)
    }
}

impl<P: CsrfTokenProvider, V: SignatureVerifier> Authorizer<P, V> {
    /// Swap the signature verifier.
    pub fn with_verifier<W: SignatureVerifier>(self, verifier: W) -> Authorizer<P, W> {
        Authorizer {
            base_url: self.base_url,
            csrf: self.csrf,
            verifier,
        }
    }

    /// Run every check against the current wall-clock time.
    pub async fn authorize(
        &self,
        credentials: &Credentials,
        ctx: &RequestContext,
    ) -> Result<AuthenticatedSubject, AuthFailure> {
        self.authorize_at(credentials, ctx, Utc::now()).await
    }

    /// Run every check, treating `now` as the current time.
    pub async fn authorize_at(
        &self,
        credentials: &Credentials,
        ctx: &RequestContext,
        now: DateTime<Utc>,
    ) -> Result<AuthenticatedSubject, AuthFailure> {
        if !credentials.is_complete() {
            return Err(AuthFailure::MissingCredential);
        }

        let base_url = self.base_url.as_ref().ok_or(AuthFailure::MisconfiguredServer)?;

        let message = SignInMessage::parse(&credentials.message)?;

        check_domain(&message, base_url)?;

        let expected_nonce = self.csrf.csrf_token(ctx).await;
        check_nonce(&message, expected_nonce.as_deref())?;

        check_validity_window(&message, now)?;

        // The signature covers the canonical text, not the submitted JSON.
        if !message.verify_with(&self.verifier, &credentials.signature) {
            return Err(AuthFailure::InvalidSignature);
        }

        Ok(AuthenticatedSubject {
            address: message.address,
        })
    }

    /// Framework-facing entry point.
    ///
    /// Every failure becomes `None`; the specific kind only reaches the logs.
    pub async fn authorize_credentials(
        &self,
        credentials: &Credentials,
        ctx: &RequestContext,
    ) -> Option<AuthenticatedSubject> {
        match self.authorize(credentials, ctx).await {
            Ok(subject) => {
                info!(wallet = %subject.address, "wallet sign-in authorized");
                Some(subject)
            }
            Err(failure) if failure.is_operational() => {
                error!(kind = %failure.kind(), alert = true, error = %failure, "sign-in rejected: server misconfigured");
                None
            }
            Err(failure) => {
                warn!(kind = %failure.kind(), error = %failure, "sign-in rejected");
                None
            }
        }
    }
}

impl<P, V> std::fmt::Debug for Authorizer<P, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authorizer")
            .field("base_url", &self.base_url.as_ref().map(Url::as_str))
            .finish_non_exhaustive()
    }
}
