//! Native signing: build and sign a sign-in message with a local keypair.
//!
//! Only available with the `native-auth` feature.

use chrono::{DateTime, Duration, Utc};
use solana_keypair::Keypair;
use solana_signer::Signer;

use crate::error::AuthError;
use crate::shared::WalletAddress;
use crate::siws::{Credentials, SignInMessage, SiwsTime, DEFAULT_CHAIN_ID};

/// Parameters for a sign-in message, as a browser wallet would fill them.
#[derive(Debug, Clone)]
pub struct SignInRequest {
    /// Host (and non-default port) of the service being signed in to.
    pub domain: String,
    /// Full origin URL of the service.
    pub uri: String,
    /// Anti-forgery token obtained from the service.
    pub nonce: String,
    pub statement: Option<String>,
    pub chain_id: String,
    pub issued_at: DateTime<Utc>,
    /// How long the message stays valid after `issued_at`.
    pub ttl: Option<Duration>,
}

impl SignInRequest {
    pub fn new(domain: impl Into<String>, uri: impl Into<String>, nonce: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            uri: uri.into(),
            nonce: nonce.into(),
            statement: None,
            chain_id: DEFAULT_CHAIN_ID.to_string(),
            issued_at: Utc::now(),
            ttl: None,
        }
    }

    pub fn statement(mut self, statement: impl Into<String>) -> Self {
        self.statement = Some(statement.into());
        self
    }

    pub fn chain_id(mut self, chain_id: impl Into<String>) -> Self {
        self.chain_id = chain_id.into();
        self
    }

    pub fn issued_at(mut self, at: DateTime<Utc>) -> Self {
        self.issued_at = at;
        self
    }

    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }
}

/// Sign a sign-in message with a local keypair.
///
/// Returns [`Credentials`] that can be submitted as-is to the credentials
/// endpoint.
pub fn sign_in_with_keypair(
    keypair: &Keypair,
    request: SignInRequest,
) -> Result<Credentials, AuthError> {
    let message = SignInMessage {
        domain: request.domain,
        address: WalletAddress::from(keypair.pubkey()),
        statement: request.statement.filter(|s| !s.is_empty()),
        uri: request.uri,
        version: "1".to_string(),
        chain_id: request.chain_id,
        nonce: request.nonce,
        issued_at: SiwsTime::from_datetime(request.issued_at),
        expiration_time: request
            .ttl
            .map(|ttl| SiwsTime::from_datetime(request.issued_at + ttl)),
        not_before: None,
        request_id: None,
        resources: None,
    };

    let signature = keypair.sign_message(&message.signing_bytes());

    Ok(Credentials {
        message: message.to_json()?,
        signature: signature.to_string(),
    })
}
