//! Custom serde helpers for wallet-adapter wire formats.

/// Chain identifiers arrive as a JSON number from most wallet adapters and as a
/// string from a few. The value is kept as text because it is rendered verbatim
/// into the signed message.
pub mod chain_id {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(u64),
        Str(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
            Raw::Num(n) => n.to_string(),
            Raw::Str(s) => s,
        }))
    }

    pub fn serialize<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            // Only canonical decimals go out as numbers; "007" must stay "007".
            Some(s) => match s.parse::<u64>() {
                Ok(n) if n.to_string() == *s => serializer.serialize_u64(n),
                _ => serializer.serialize_str(s),
            },
            None => serializer.serialize_none(),
        }
    }
}
