//! Wire types for the JSON form of a sign-in message.
//!
//! Every payload field is optional at this level; required-field checks
//! happen in the codec.

use serde::{Deserialize, Serialize};

use crate::shared::serde_util;

/// Top-level SIWS object as serialized by browser wallet adapters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiwsMessageWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<SiwsHeaderWire>,
    pub payload: SiwsPayloadWire,
    /// Some adapters embed the signature here as well. It is ignored; the
    /// signature that counts is the one submitted next to the message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiwsHeaderWire {
    pub t: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiwsPayloadWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(
        default,
        with = "serde_util::chain_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub chain_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_before: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<String>>,
}
