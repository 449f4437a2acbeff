use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An SMS broadcast as delivered by the OS: ordered PDUs plus a format tag.
/// Either field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingBroadcast {
    #[serde(
        default,
        deserialize_with = "deserialize_pdus",
        serialize_with = "serialize_pdus",
        skip_serializing_if = "Option::is_none"
    )]
    pub pdus: Option<Vec<Vec<u8>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl IncomingBroadcast {
    pub fn new(pdus: Vec<Vec<u8>>, format: impl Into<String>) -> Self {
        Self {
            pdus: Some(pdus),
            format: Some(format.into()),
        }
    }

    /// Parse one JSON broadcast, PDUs given as base64 strings.
    pub fn from_json(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line)
    }
}

fn deserialize_pdus<'de, D>(deserializer: D) -> Result<Option<Vec<Vec<u8>>>, D::Error>
where
    D: Deserializer<'de>,
{
    let encoded: Option<Vec<String>> = Option::deserialize(deserializer)?;
    encoded
        .map(|pdus| {
            pdus.iter()
                .map(|pdu| STANDARD.decode(pdu).map_err(serde::de::Error::custom))
                .collect()
        })
        .transpose()
}

fn serialize_pdus<S>(pdus: &Option<Vec<Vec<u8>>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let encoded: Option<Vec<String>> = pdus
        .as_ref()
        .map(|pdus| pdus.iter().map(|pdu| STANDARD.encode(pdu)).collect());
    encoded.serialize(serializer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_payload() {
        let payload = IncomingBroadcast::from_json(r#"{"pdus":["AQID","BAU="],"format":"3gpp"}"#)
            .unwrap();
        assert_eq!(payload.pdus, Some(vec![vec![1, 2, 3], vec![4, 5]]));
        assert_eq!(payload.format.as_deref(), Some("3gpp"));
    }

    #[test]
    fn test_parse_missing_fields() {
        let payload = IncomingBroadcast::from_json("{}").unwrap();
        assert_eq!(payload, IncomingBroadcast::default());
    }

    #[test]
    fn test_parse_null_pdus() {
        let payload = IncomingBroadcast::from_json(r#"{"pdus":null}"#).unwrap();
        assert_eq!(payload.pdus, None);
    }

    #[test]
    fn test_reject_bad_base64() {
        assert!(IncomingBroadcast::from_json(r#"{"pdus":["not base64!"]}"#).is_err());
    }

    #[test]
    fn test_serializes_as_base64() {
        let payload = IncomingBroadcast::new(vec![vec![1, 2, 3]], "3gpp");
        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(json, r#"{"pdus":["AQID"],"format":"3gpp"}"#);
    }
}
