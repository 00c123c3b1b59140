/*
[INPUT]:  Principal, nonce and bearer tokens
[OUTPUT]: Access tokens and verification results
[POS]:    HTTP layer - authentication endpoints
[UPDATE]: When auth endpoints or payloads change
*/

use reqwest::Method;

use crate::http::{LaunchpadClient, Result, SessionError};
use crate::types::{AccessTokenResponse, LoginRequest, TokenCheck};

impl LaunchpadClient {
    /// Exchange principal + one-time nonce for a bearer token
    ///
    /// POST /auth/login {principal, random}
    pub async fn login(&self, principal: &str, random: &str) -> Result<String> {
        let body = LoginRequest {
            principal: principal.to_string(),
            random: random.to_string(),
        };
        let builder = self.auth_request(Method::POST, "/auth/login")?.json(&body);
        let response: AccessTokenResponse = self.send_json(builder).await?;
        access_token(response, "login")
    }

    /// Trade the current token for a fresh one
    ///
    /// POST /auth/refresh (bearer)
    pub async fn refresh(&self, token: &str) -> Result<String> {
        let builder = self.bearer_request(Method::POST, "/auth/refresh", token)?;
        let response: AccessTokenResponse = self.send_json(builder).await?;
        access_token(response, "refresh")
    }

    /// Ask the service whether a token is still accepted
    ///
    /// GET /auth/verify?token={token}
    ///
    /// Non-success statuses mean `Invalid`; only transport failures are errors.
    pub async fn verify_token(&self, token: &str) -> Result<TokenCheck> {
        let builder = self
            .auth_request(Method::GET, "/auth/verify")?
            .query(&[("token", token)]);
        let response = builder.send().await?;
        if response.status().is_success() {
            Ok(TokenCheck::Valid)
        } else {
            Ok(TokenCheck::Invalid)
        }
    }
}

fn access_token(response: AccessTokenResponse, operation: &str) -> Result<String> {
    match response.access_token {
        Some(token) if !token.trim().is_empty() => Ok(token),
        _ => Err(SessionError::Authentication {
            message: format!("{operation} response carried no access_token"),
        }),
    }
}
