//! Anti-forgery token access.
//!
//! The session framework issues one token per browser context and hands it to
//! the client, which embeds it as the sign-in message nonce. This module only
//! reads the expected value back; issuance and rotation belong to the framework.
//!
//! The framework keeps the token in a double-submit cookie of the form
//! `{token}|{sha256_hex(token ++ secret)}`. [`CookieCsrfTokenProvider`] accepts
//! the token only if the hash half verifies under the session secret.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::config::{AuthConfig, ENV_SESSION_SECRET};
use crate::error::ConfigError;

/// Cookie carrying the anti-forgery token on plain-HTTP deployments.
pub const CSRF_COOKIE: &str = "next-auth.csrf-token";

/// Cookie carrying the anti-forgery token on HTTPS deployments.
pub const SECURE_CSRF_COOKIE: &str = "__Host-next-auth.csrf-token";

// ─── RequestContext ──────────────────────────────────────────────────────────

/// The parts of an in-flight sign-in request the token accessor needs.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    cookies: HashMap<String, String>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `Cookie:` request header. Values are percent-decoded.
    ///
    /// When a name repeats, the first occurrence wins.
    pub fn from_cookie_header(header: &str) -> Self {
        let mut cookies = HashMap::new();
        for pair in header.split(';') {
            let Some((name, value)) = pair.trim().split_once('=') else {
                continue;
            };
            let value = value.trim().trim_matches('"');
            let value = urlencoding::decode(value)
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| value.to_string());
            cookies.entry(name.trim().to_string()).or_insert(value);
        }
        Self { cookies }
    }

    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }
}

// ─── Providers ───────────────────────────────────────────────────────────────

/// Returns the anti-forgery token expected for a request, if it has one.
#[async_trait]
pub trait CsrfTokenProvider: Send + Sync {
    async fn csrf_token(&self, ctx: &RequestContext) -> Option<String>;
}

#[async_trait]
impl<T: CsrfTokenProvider + ?Sized> CsrfTokenProvider for Arc<T> {
    async fn csrf_token(&self, ctx: &RequestContext) -> Option<String> {
        (**self).csrf_token(ctx).await
    }
}

/// Reads and verifies the session framework's double-submit cookie.
#[derive(Clone)]
pub struct CookieCsrfTokenProvider {
    secret: String,
    cookie_name: &'static str,
}

impl CookieCsrfTokenProvider {
    pub fn new(secret: impl Into<String>, secure_cookies: bool) -> Self {
        Self {
            secret: secret.into(),
            cookie_name: if secure_cookies {
                SECURE_CSRF_COOKIE
            } else {
                CSRF_COOKIE
            },
        }
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self, ConfigError> {
        let secret = config
            .session_secret
            .as_deref()
            .ok_or(ConfigError::MissingVar(ENV_SESSION_SECRET))?;
        Ok(Self::new(secret, config.uses_secure_cookies()))
    }

    pub fn cookie_name(&self) -> &'static str {
        self.cookie_name
    }

    /// Cookie value the framework would set for `token`.
    pub fn cookie_value(&self, token: &str) -> String {
        format!("{}|{}", token, self.token_hash(token))
    }

    fn token_hash(&self, token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hasher.update(self.secret.as_bytes());
        hex::encode(hasher.finalize())
    }
}

impl std::fmt::Debug for CookieCsrfTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CookieCsrfTokenProvider")
            .field("cookie_name", &self.cookie_name)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CsrfTokenProvider for CookieCsrfTokenProvider {
    async fn csrf_token(&self, ctx: &RequestContext) -> Option<String> {
        let value = ctx.cookie(self.cookie_name)?;
        let (token, hash) = value.split_once('|')?;
        if token.is_empty() || hash != self.token_hash(token) {
            debug!(cookie = self.cookie_name, "anti-forgery cookie failed verification");
            return None;
        }
        Some(token.to_string())
    }
}

/// Fixed token, for tooling and tests.
#[derive(Debug, Clone)]
pub struct StaticCsrfToken(pub Option<String>);

impl StaticCsrfToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Some(token.into()))
    }

    pub fn none() -> Self {
        Self(None)
    }
}

#[async_trait]
impl CsrfTokenProvider for StaticCsrfToken {
    async fn csrf_token(&self, _ctx: &RequestContext) -> Option<String> {
        self.0.clone()
    }
}
