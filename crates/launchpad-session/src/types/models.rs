/*
[INPUT]:  Auth results and profile payloads
[OUTPUT]: Session record and its derived status
[POS]:    Data layer - per-chain session state
[UPDATE]: When session fields or lifecycle invariants change
*/

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Off-chain user record keyed by principal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub level1_count: u64,
    #[serde(default)]
    pub level2_count: u64,
    #[serde(with = "rust_decimal::serde::str")]
    pub reward_total: Decimal,
}

/// Lifecycle position of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    Anonymous,
    Connecting,
    Authenticated,
}

/// Session state for a single chain identity.
///
/// Only `SessionManager` mutates a live session; everything else works on
/// clones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub principal: Option<String>,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub profile: Option<Profile>,
    #[serde(default)]
    pub connected: bool,
    #[serde(default, skip_serializing)]
    pub connecting: bool,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            principal: None,
            token: String::new(),
            profile: None,
            connected: false,
            connecting: false,
            updated_at: Utc::now(),
        }
    }
}

impl Session {
    pub fn status(&self) -> SessionStatus {
        if self.connecting {
            SessionStatus::Connecting
        } else if self.connected && self.has_token() {
            SessionStatus::Authenticated
        } else {
            SessionStatus::Anonymous
        }
    }

    pub fn has_token(&self) -> bool {
        !self.token.is_empty()
    }

    pub fn is_authenticated(&self) -> bool {
        self.status() == SessionStatus::Authenticated
    }

    /// Record a token obtained from login or refresh.
    pub(crate) fn authenticate(&mut self, principal: &str, token: String) {
        self.principal = Some(principal.to_string());
        self.replace_token(token);
    }

    pub(crate) fn replace_token(&mut self, token: String) {
        self.token = token;
        self.connected = true;
        self.connecting = false;
        self.touch();
    }

    /// Drop the credential together with everything derived from it.
    pub(crate) fn clear_auth(&mut self) {
        self.token.clear();
        self.profile = None;
        self.connected = false;
        self.connecting = false;
        self.touch();
    }

    pub(crate) fn set_connecting(&mut self, connecting: bool) {
        self.connecting = connecting;
        self.touch();
    }

    /// Returns false when there is no token to attach the profile to.
    pub(crate) fn set_profile(&mut self, profile: Option<Profile>) -> bool {
        if profile.is_some() && !self.has_token() {
            return false;
        }
        self.profile = profile;
        self.touch();
        true
    }

    /// Repair a record loaded from storage so the invariants hold.
    pub(crate) fn normalized(mut self) -> Self {
        self.connecting = false;
        if !self.has_token() {
            self.connected = false;
            self.profile = None;
        }
        self
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn profile() -> Profile {
        Profile {
            name: Some("alice".to_string()),
            avatar: None,
            level1_count: 2,
            level2_count: 1,
            reward_total: Decimal::new(125, 2),
        }
    }

    #[test]
    fn test_new_session_is_anonymous() {
        let session = Session::default();
        assert_eq!(session.status(), SessionStatus::Anonymous);
        assert!(session.token.is_empty());
        assert!(session.profile.is_none());
    }

    #[test]
    fn test_authenticate_then_clear() {
        let mut session = Session::default();
        session.authenticate("abc-123", "tok1".to_string());
        assert_eq!(session.status(), SessionStatus::Authenticated);
        assert!(session.set_profile(Some(profile())));

        session.clear_auth();
        assert_eq!(session.status(), SessionStatus::Anonymous);
        assert_eq!(session.token, "");
        assert!(session.profile.is_none());
        assert!(!session.connected);
        assert_eq!(session.principal.as_deref(), Some("abc-123"));
    }

    #[test]
    fn test_profile_requires_token() {
        let mut session = Session::default();
        assert!(!session.set_profile(Some(profile())));
        assert!(session.profile.is_none());
    }

    #[test]
    fn test_connecting_takes_precedence() {
        let mut session = Session::default();
        session.set_connecting(true);
        assert_eq!(session.status(), SessionStatus::Connecting);
        session.authenticate("abc-123", "tok1".to_string());
        assert_eq!(session.status(), SessionStatus::Authenticated);
    }

    #[test]
    fn test_normalized_drops_inconsistent_flags() {
        let raw = json!({
            "principal": "abc-123",
            "token": "",
            "connected": true,
            "profile": {"reward_total": "3", "level1_count": 1, "level2_count": 0},
        });
        let session: Session = serde_json::from_value(raw).unwrap();
        let session = session.normalized();
        assert!(!session.connected);
        assert!(session.profile.is_none());
        assert_eq!(session.status(), SessionStatus::Anonymous);
    }

    #[test]
    fn test_connecting_is_not_persisted() {
        let mut session = Session::default();
        session.set_connecting(true);
        let value = serde_json::to_value(&session).unwrap();
        assert!(value.get("connecting").is_none());
    }
}
