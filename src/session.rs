//! Session role resolution against the administrator allow-list.
//!
//! There is exactly one grantable role. A wallet is either an administrator or
//! gets no session at all.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::AuthFailure;
use crate::shared::WalletAddress;
use crate::siws::AuthenticatedSubject;

// ─── AdminAllowList ──────────────────────────────────────────────────────────

/// Wallets allowed to hold an administrator session.
///
/// Built once at start-up and never mutated. Membership is exact and
/// case-sensitive on the address string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminAllowList(BTreeSet<WalletAddress>);

impl AdminAllowList {
    /// Parse a comma-separated list. Entries are trimmed and empty entries dropped.
    pub fn parse(raw: &str) -> Self {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(WalletAddress::from)
            .collect()
    }

    pub fn contains(&self, address: &str) -> bool {
        self.0.contains(&WalletAddress::from(address))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WalletAddress> {
        self.0.iter()
    }
}

impl FromIterator<WalletAddress> for AdminAllowList {
    fn from_iter<I: IntoIterator<Item = WalletAddress>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ─── Session ─────────────────────────────────────────────────────────────────

/// Role attached to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The user object handed to the session framework.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub wallet_address: WalletAddress,
    pub role: Role,
}

// ─── SessionResolver ─────────────────────────────────────────────────────────

/// Gates session establishment on allow-list membership.
#[derive(Debug, Clone)]
pub struct SessionResolver {
    allow_list: Arc<AdminAllowList>,
}

impl SessionResolver {
    pub fn new(allow_list: Arc<AdminAllowList>) -> Self {
        Self { allow_list }
    }

    pub fn allow_list(&self) -> &AdminAllowList {
        &self.allow_list
    }

    /// Map a proven wallet to a session, or refuse.
    ///
    /// Only call this with a subject produced by signature verification.
    pub fn resolve_role(&self, subject: &AuthenticatedSubject) -> Result<Session, AuthFailure> {
        if !self.allow_list.contains(subject.address.as_str()) {
            return Err(AuthFailure::NotAuthorized);
        }
        Ok(Session {
            wallet_address: subject.address.clone(),
            role: Role::Admin,
        })
    }

    /// Resolve a session from the subject claim the session framework stored
    /// after a successful sign-in.
    pub fn session_for_subject(&self, sub: Option<&str>) -> Result<Session, AuthFailure> {
        let address = sub
            .filter(|s| !s.is_empty())
            .ok_or(AuthFailure::MissingSubject)?;
        self.resolve_role(&AuthenticatedSubject {
            address: WalletAddress::from(address),
        })
    }

    /// Framework-facing variant of [`Self::session_for_subject`]: the reason
    /// for a refusal is logged and never returned.
    pub fn session_or_deny(&self, sub: Option<&str>) -> Option<Session> {
        match self.session_for_subject(sub) {
            Ok(session) => {
                info!(wallet = %session.wallet_address, role = %session.role, "session established");
                Some(session)
            }
            Err(failure) => {
                warn!(kind = %failure.kind(), wallet = sub.unwrap_or(""), "session refused");
                None
            }
        }
    }
}
