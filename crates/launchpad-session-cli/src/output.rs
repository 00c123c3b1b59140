/*
[INPUT]:  Session snapshots
[OUTPUT]: JSON views safe to print (no bearer tokens)
[POS]:    Presentation layer - CLI stdout
[UPDATE]: When printed fields change
*/

use launchpad_session::{Chain, Profile, Session, SessionStatus};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub chain: Chain,
    pub status: SessionStatus,
    pub principal: Option<String>,
    pub has_token: bool,
    pub profile: Option<Profile>,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub via: Option<String>,
}

impl SessionView {
    pub fn new(chain: Chain, session: &Session) -> Self {
        Self {
            chain,
            status: session.status(),
            principal: session.principal.clone(),
            has_token: session.has_token(),
            profile: session.profile.clone(),
            updated_at: session.updated_at.to_rfc3339(),
            via: None,
        }
    }

    pub fn with_via(mut self, via: impl Into<String>) -> Self {
        self.via = Some(via.into());
        self
    }
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
