//! Sign-in message codec: JSON → [`SignInMessage`] → canonical signed text.

use std::str::FromStr;

use crate::error::ParseError;
use crate::shared::WalletAddress;
use crate::siws::wire::{SiwsHeaderWire, SiwsMessageWire, SiwsPayloadWire};
use crate::siws::{SignInMessage, SiwsTime, DEFAULT_CHAIN_ID, SIWS_HEADER_TYPE};

impl SignInMessage {
    /// Parse the JSON form of a sign-in message.
    ///
    /// Pure transformation: no I/O, no cryptography.
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let wire: SiwsMessageWire = serde_json::from_str(raw)?;
        Self::try_from(wire)
    }

    /// The exact text a wallet signs for this message.
    ///
    /// ```text
    /// {domain} wants you to sign in with your Solana account:
    /// {address}
    ///
    /// {statement}
    ///
    /// URI: {uri}
    /// Version: {version}
    /// Chain ID: {chain_id}
    /// Nonce: {nonce}
    /// Issued At: {issued_at}
    /// ```
    ///
    /// followed by `Expiration Time`, `Not Before`, `Request ID` and a
    /// `Resources:` list when present. The statement block is omitted when
    /// there is no statement.
    pub fn to_canonical_text(&self) -> String {
        let mut prefix = format!(
            "{} wants you to sign in with your Solana account:\n{}",
            self.domain, self.address
        );
        if let Some(statement) = &self.statement {
            prefix.push_str("\n\n");
            prefix.push_str(statement);
        }

        let mut suffix = vec![
            format!("URI: {}", self.uri),
            format!("Version: {}", self.version),
            format!("Chain ID: {}", self.chain_id),
            format!("Nonce: {}", self.nonce),
            format!("Issued At: {}", self.issued_at),
        ];
        if let Some(expiration_time) = &self.expiration_time {
            suffix.push(format!("Expiration Time: {}", expiration_time));
        }
        if let Some(not_before) = &self.not_before {
            suffix.push(format!("Not Before: {}", not_before));
        }
        if let Some(request_id) = &self.request_id {
            suffix.push(format!("Request ID: {}", request_id));
        }
        if let Some(resources) = &self.resources {
            let mut block = String::from("Resources:");
            for resource in resources {
                block.push_str("\n- ");
                block.push_str(resource);
            }
            suffix.push(block);
        }

        format!("{}\n\n{}", prefix, suffix.join("\n"))
    }

    /// UTF-8 bytes of [`Self::to_canonical_text`].
    pub fn signing_bytes(&self) -> Vec<u8> {
        self.to_canonical_text().into_bytes()
    }

    /// Serialize back to the JSON form wallets submit.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&SiwsMessageWire::from(self))
    }
}

impl FromStr for SignInMessage {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ─── Conversions ─────────────────────────────────────────────────────────────

fn required(value: Option<String>, field: &'static str) -> Result<String, ParseError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(ParseError::MissingField(field))
}

fn optional(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn optional_time(value: Option<String>, field: &'static str) -> Result<Option<SiwsTime>, ParseError> {
    optional(value)
        .map(|raw| SiwsTime::parse(field, raw))
        .transpose()
}

impl TryFrom<SiwsMessageWire> for SignInMessage {
    type Error = ParseError;

    fn try_from(wire: SiwsMessageWire) -> Result<Self, Self::Error> {
        if let Some(header) = &wire.header {
            if header.t != SIWS_HEADER_TYPE {
                return Err(ParseError::Malformed(format!(
                    "unsupported header type `{}`",
                    header.t
                )));
            }
        }

        let p = wire.payload;
        Ok(SignInMessage {
            domain: required(p.domain, "domain")?,
            address: WalletAddress::new(required(p.address, "address")?),
            statement: optional(p.statement),
            uri: required(p.uri, "uri")?,
            version: required(p.version, "version")?,
            // An explicit empty chain ID is signed as an empty line, so keep it.
            chain_id: p.chain_id.unwrap_or_else(|| DEFAULT_CHAIN_ID.to_string()),
            nonce: required(p.nonce, "nonce")?,
            issued_at: SiwsTime::parse("issuedAt", required(p.issued_at, "issuedAt")?)?,
            expiration_time: optional_time(p.expiration_time, "expirationTime")?,
            not_before: optional_time(p.not_before, "notBefore")?,
            request_id: optional(p.request_id),
            resources: p.resources,
        })
    }
}

impl From<&SignInMessage> for SiwsMessageWire {
    fn from(m: &SignInMessage) -> Self {
        SiwsMessageWire {
            header: Some(SiwsHeaderWire {
                t: SIWS_HEADER_TYPE.to_string(),
            }),
            payload: SiwsPayloadWire {
                domain: Some(m.domain.clone()),
                address: Some(m.address.to_string()),
                statement: m.statement.clone(),
                uri: Some(m.uri.clone()),
                version: Some(m.version.clone()),
                chain_id: Some(m.chain_id.clone()),
                nonce: Some(m.nonce.clone()),
                issued_at: Some(m.issued_at.as_str().to_string()),
                expiration_time: m.expiration_time.as_ref().map(|t| t.as_str().to_string()),
                not_before: m.not_before.as_ref().map(|t| t.as_str().to_string()),
                request_id: m.request_id.clone(),
                resources: m.resources.clone(),
            },
            signature: None,
        }
    }
}
