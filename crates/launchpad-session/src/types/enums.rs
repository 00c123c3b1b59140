/*
[INPUT]:  Chain identities supported by the platform
[OUTPUT]: Typed Rust enums with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When a chain identity is added
*/

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Chain identity owning an independent auth session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    /// Smart-contract platform identity
    Ic,
    /// Bitcoin settlement layer identity
    Btc,
}

impl Chain {
    pub const ALL: [Chain; 2] = [Chain::Ic, Chain::Btc];

    pub fn as_str(self) -> &'static str {
        match self {
            Chain::Ic => "ic",
            Chain::Btc => "btc",
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Chain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ic" | "icp" => Ok(Chain::Ic),
            "btc" | "bitcoin" => Ok(Chain::Btc),
            other => Err(format!("unknown chain: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_parse_aliases() {
        assert_eq!("IC".parse::<Chain>().unwrap(), Chain::Ic);
        assert_eq!("bitcoin".parse::<Chain>().unwrap(), Chain::Btc);
        assert!("eth".parse::<Chain>().is_err());
    }

    #[test]
    fn test_chain_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Chain::Btc).unwrap(), "\"btc\"");
        let chain: Chain = serde_json::from_str("\"ic\"").unwrap();
        assert_eq!(chain, Chain::Ic);
    }
}
