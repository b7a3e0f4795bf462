//! Process configuration: external URL, session secret, administrator wallets.
//!
//! Loaded once at start-up, then shared read-only.

use std::sync::Arc;

use url::Url;

use crate::error::ConfigError;
use crate::session::AdminAllowList;

/// Externally visible URL of the dashboard.
pub const ENV_BASE_URL: &str = "NEXTAUTH_URL";

/// Secret the session framework signs its cookies and tokens with.
pub const ENV_SESSION_SECRET: &str = "NEXTAUTH_SECRET";

/// Comma-separated administrator wallet addresses.
pub const ENV_ADMIN_WALLETS: &str = "ADMIN_WALLETS";

#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// `None` is a deployment defect, surfaced per sign-in attempt.
    pub base_url: Option<Url>,
    pub session_secret: Option<String>,
    pub admin_wallets: Arc<AdminAllowList>,
}

impl AuthConfig {
    pub fn builder() -> AuthConfigBuilder {
        AuthConfigBuilder::default()
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let admin_wallets =
            lookup(ENV_ADMIN_WALLETS).ok_or(ConfigError::MissingVar(ENV_ADMIN_WALLETS))?;

        let mut builder = AuthConfigBuilder::default().admin_wallets(&admin_wallets);
        if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.is_empty()) {
            builder = builder.base_url(&url);
        }
        if let Some(secret) = lookup(ENV_SESSION_SECRET).filter(|v| !v.is_empty()) {
            builder = builder.session_secret(&secret);
        }
        builder.build()
    }

    /// Whether cookies for this deployment use the `__Host-`/`__Secure-` prefixes.
    pub fn uses_secure_cookies(&self) -> bool {
        self.base_url
            .as_ref()
            .map(|u| u.scheme() == "https")
            .unwrap_or(false)
    }
}

/// `host[:port]` of a URL, with the scheme's default port omitted.
///
/// This is what a browser reports as `location.host`, and what wallets put in
/// the `domain` field of a sign-in message.
pub fn origin_host(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

#[derive(Default)]
pub struct AuthConfigBuilder {
    base_url: Option<String>,
    session_secret: Option<String>,
    admin_wallets: Option<String>,
}

impl AuthConfigBuilder {
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = Some(url.to_string());
        self
    }

    pub fn session_secret(mut self, secret: &str) -> Self {
        self.session_secret = Some(secret.to_string());
        self
    }

    /// Comma-separated wallet list, in the same form as `ADMIN_WALLETS`.
    pub fn admin_wallets(mut self, wallets: &str) -> Self {
        self.admin_wallets = Some(wallets.to_string());
        self
    }

    pub fn build(self) -> Result<AuthConfig, ConfigError> {
        let base_url = self
            .base_url
            .map(|raw| {
                let url = Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl {
                    var: ENV_BASE_URL,
                    reason: e.to_string(),
                })?;
                if url.host_str().is_none() {
                    return Err(ConfigError::InvalidUrl {
                        var: ENV_BASE_URL,
                        reason: "URL has no host".to_string(),
                    });
                }
                Ok(url)
            })
            .transpose()?;

        let admin_wallets = AdminAllowList::parse(self.admin_wallets.as_deref().unwrap_or(""));
        if admin_wallets.is_empty() {
            return Err(ConfigError::EmptyAllowList);
        }

        Ok(AuthConfig {
            base_url,
            session_secret: self.session_secret,
            admin_wallets: Arc::new(admin_wallets),
        })
    }
}
