use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolId {
    Hashstack,
    NostraAlpha,
    NostraMainnet,
    ZkLend,
    Vesu,
}

impl ProtocolId {
    pub const ALL: [ProtocolId; 5] = [
        ProtocolId::Hashstack,
        ProtocolId::NostraAlpha,
        ProtocolId::NostraMainnet,
        ProtocolId::ZkLend,
        ProtocolId::Vesu,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProtocolId::Hashstack => "Hashstack",
            ProtocolId::NostraAlpha => "Nostra_alpha",
            ProtocolId::NostraMainnet => "Nostra_mainnet",
            ProtocolId::ZkLend => "zkLend",
            ProtocolId::Vesu => "Vesu",
        }
    }

    /// Protocols the notification checker watches.
    pub fn is_currently_available(&self) -> bool {
        !matches!(self, ProtocolId::Hashstack)
    }

    pub fn currently_available() -> Vec<ProtocolId> {
        Self::ALL
            .into_iter()
            .filter(|p| p.is_currently_available())
            .collect()
    }

    pub fn supported() -> String {
        Self::ALL
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<&str>>()
            .join(", ")
    }
}

impl fmt::Display for ProtocolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProtocolId {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == value)
            .ok_or_else(|| Error::UnknownProtocol {
                name: value.to_owned(),
                supported: Self::supported(),
            })
    }
}

impl From<ProtocolId> for String {
    fn from(value: ProtocolId) -> Self {
        value.as_str().to_owned()
    }
}

impl Serialize for ProtocolId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ProtocolId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        ProtocolId::from_str(&value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_protocols() {
        for protocol in ProtocolId::ALL {
            let parsed = ProtocolId::from_str(protocol.as_str());
            assert_eq!(parsed.ok(), Some(protocol));
        }
        assert_eq!(ProtocolId::from_str("zkLend").ok(), Some(ProtocolId::ZkLend));
    }

    #[test]
    fn test_unknown_protocol_message() {
        let error = ProtocolId::from_str("zklend").err().map(|e| e.to_string());
        assert_eq!(
            error.as_deref(),
            Some(
                "Protocol zklend is not supported, expected one of: Hashstack, Nostra_alpha, Nostra_mainnet, zkLend, Vesu"
            )
        );
    }

    #[test]
    fn test_currently_available() {
        let available = ProtocolId::currently_available();
        assert_eq!(available.len(), 4);
        assert!(!available.contains(&ProtocolId::Hashstack));
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&ProtocolId::NostraMainnet).unwrap();
        assert_eq!(json, "\"Nostra_mainnet\"");
        let parsed: ProtocolId = serde_json::from_str("\"Vesu\"").unwrap();
        assert_eq!(parsed, ProtocolId::Vesu);
        assert!(serde_json::from_str::<ProtocolId>("\"Aave\"").is_err());
    }
}
