/*
[INPUT]:  Bearer token
[OUTPUT]: Profile (referral counts, rewards, avatar, name)
[POS]:    HTTP layer - user data endpoints (require bearer auth)
[UPDATE]: When adding user endpoints or changing the stats payload
*/

use reqwest::Method;

use crate::http::{LaunchpadClient, Result};
use crate::types::{Profile, RewardStats, unwrap_data};

impl LaunchpadClient {
    /// Fetch the caller's profile; `None` when the service has no data
    ///
    /// GET /users/reward-stats (bearer)
    pub async fn reward_stats(&self, token: &str) -> Result<Option<Profile>> {
        let builder = self.bearer_request(Method::GET, "/users/reward-stats", token)?;
        let value = self.send_value(builder).await?;
        match unwrap_data(value) {
            Some(data) => {
                let stats: RewardStats = serde_json::from_value(data)?;
                Ok(Some(stats.into()))
            }
            None => Ok(None),
        }
    }
}
