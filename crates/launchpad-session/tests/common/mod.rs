/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for launchpad-session tests

use std::path::PathBuf;
use std::sync::Arc;

use launchpad_session::{
    Chain, LaunchpadClient, NonceSource, Session, SessionManager, SessionStore,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Manager for the `ic` identity pointed at the mock server
pub fn manager_for(
    server: &MockServer,
    nonce_source: Arc<dyn NonceSource>,
    store: Arc<dyn SessionStore>,
) -> SessionManager {
    let client = LaunchpadClient::new(&server.uri()).expect("mock server uri is a valid base url");
    SessionManager::new(Chain::Ic, client, nonce_source, store)
}

/// A persisted, connected session as a previous run would have left it
pub fn stored_session(principal: &str, token: &str) -> Session {
    Session {
        principal: Some(principal.to_string()),
        token: token.to_string(),
        connected: true,
        ..Session::default()
    }
}

#[allow(dead_code)]
pub async fn mount_verify(server: &MockServer, status: u16, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/auth/verify"))
        .respond_with(ResponseTemplate::new(status))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[allow(dead_code)]
pub async fn mount_refresh(server: &MockServer, template: ResponseTemplate, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(template)
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[allow(dead_code)]
pub async fn mount_reward_stats(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/users/reward-stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "level1Count": 2,
            "level2Count": 1,
            "reward": {"total": "1.5"},
            "avatar": "https://cdn.example/avatar.png",
            "name": "alice",
        })))
        .mount(server)
        .await;
}

#[allow(dead_code)]
pub fn access_token(token: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({ "access_token": token }))
}

#[allow(dead_code)]
pub fn temp_dir() -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("launchpad-session-test-{}", uuid::Uuid::new_v4()));
    path
}
