/*
[INPUT]:  Principal and on-chain nonce
[OUTPUT]: Typed request bodies for the auth service
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When request payloads change
*/

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub principal: String,
    pub random: String,
}
