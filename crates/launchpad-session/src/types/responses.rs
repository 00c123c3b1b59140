/*
[INPUT]:  Auth and profile service payloads
[OUTPUT]: Typed Rust response structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::models::Profile;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessTokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
}

/// Result of a remote token verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenCheck {
    Valid,
    Invalid,
}

impl TokenCheck {
    pub fn is_valid(self) -> bool {
        self == TokenCheck::Valid
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardTotal {
    #[serde(default, deserialize_with = "deserialize_decimal_or_zero")]
    pub total: Decimal,
}

/// Reward stats payload: `{level1Count, level2Count, reward:{total}, avatar, name}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardStats {
    #[serde(default)]
    pub level1_count: u64,
    #[serde(default)]
    pub level2_count: u64,
    #[serde(default)]
    pub reward: Option<RewardTotal>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl From<RewardStats> for Profile {
    fn from(stats: RewardStats) -> Self {
        Profile {
            name: stats.name,
            avatar: stats.avatar,
            level1_count: stats.level1_count,
            level2_count: stats.level2_count,
            reward_total: stats.reward.map(|r| r.total).unwrap_or(Decimal::ZERO),
        }
    }
}

/// Strip the optional `{"data": ...}` wrapper some deployments add.
///
/// Returns `None` when the payload carries no data at all.
pub fn unwrap_data(value: serde_json::Value) -> Option<serde_json::Value> {
    let inner = match value {
        serde_json::Value::Object(mut map) if map.contains_key("data") => map.remove("data")?,
        other => other,
    };
    match &inner {
        serde_json::Value::Null => None,
        serde_json::Value::Object(map) if map.is_empty() => None,
        _ => Some(inner),
    }
}

fn deserialize_decimal_or_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    use std::str::FromStr;

    let value = serde_json::Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(Decimal::ZERO);
    }

    if let Some(raw) = value.as_str() {
        if raw.trim().is_empty() {
            return Ok(Decimal::ZERO);
        }
        return Decimal::from_str(raw.trim()).map_err(serde::de::Error::custom);
    }

    if value.is_number() {
        return Decimal::from_str(&value.to_string()).map_err(serde::de::Error::custom);
    }

    Err(serde::de::Error::custom("invalid decimal value"))
}
