use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tokio_test::assert_ok;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn binary() -> &'static str {
    env!("CARGO_BIN_EXE_launchpad-session")
}

fn temp_dir() -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("launchpad-cli-test-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&path).unwrap();
    path
}

fn write_config(dir: &Path, base_url: &str) -> PathBuf {
    let config_path = dir.join("session.yaml");
    let yaml = format!(
        "chains:\n  ic:\n    base_url: {base_url}\nstore_dir: {}\n",
        dir.join("store").display()
    );
    std::fs::write(&config_path, yaml).unwrap();
    config_path
}

async fn run(args: Vec<String>) -> Output {
    let output = tokio::task::spawn_blocking(move || {
        Command::new(binary())
            .args(&args)
            .env("RUST_LOG", "error")
            .output()
    })
    .await;
    assert_ok!(assert_ok!(output))
}

fn stdout_json(output: &Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "Process exited with non-zero status: {}\nStdout: {}\nStderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn cli_mode_with_config_and_dry_run_works() {
    let config_path = format!("{}/demos/session.yaml", env!("CARGO_MANIFEST_DIR"));

    let output = Command::new(binary())
        .arg("--config")
        .arg(config_path)
        .arg("--dry-run")
        .arg("--log-level")
        .arg("error")
        .output()
        .expect("Failed to start launchpad-session binary");

    assert!(
        output.status.success(),
        "Process exited with non-zero status: {}\nStderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn cli_rejects_invalid_config() {
    let dir = temp_dir();
    let config_path = dir.join("bad.yaml");
    std::fs::write(&config_path, "chains: {}\n").unwrap();

    let output = Command::new(binary())
        .arg("--config")
        .arg(&config_path)
        .arg("--dry-run")
        .output()
        .expect("Failed to start launchpad-session binary");

    assert!(!output.status.success());
    std::fs::remove_dir_all(dir).unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn cli_connect_status_disconnect() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(serde_json::json!({
            "principal": "abc-123",
            "random": "nonce-cli",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "tok-cli",
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/reward-stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "alice",
            "level1Count": 1,
            "reward": {"total": "2"},
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = temp_dir();
    let config = write_config(&dir, &server.uri());
    let config = config.display().to_string();

    let connect = run(vec![
        "--config".into(),
        config.clone(),
        "connect".into(),
        "--chain".into(),
        "ic".into(),
        "--principal".into(),
        "abc-123".into(),
        "--nonce".into(),
        "nonce-cli".into(),
    ])
    .await;
    let view = stdout_json(&connect);
    assert_eq!(view["status"], "Authenticated");
    assert_eq!(view["via"], "LoggedIn");
    assert_eq!(view["profile"]["name"], "alice");
    assert!(!String::from_utf8_lossy(&connect.stdout).contains("tok-cli"));

    let status = run(vec!["--config".into(), config.clone(), "status".into()]).await;
    let views = stdout_json(&status);
    assert_eq!(views[0]["chain"], "ic");
    assert_eq!(views[0]["status"], "Authenticated");
    assert_eq!(views[0]["principal"], "abc-123");

    let disconnect = run(vec!["--config".into(), config.clone(), "disconnect".into()]).await;
    let views = stdout_json(&disconnect);
    assert_eq!(views[0]["status"], "Anonymous");
    assert_eq!(views[0]["has_token"], false);
    assert_eq!(views[0]["principal"], "abc-123");

    let forget = run(vec![
        "--config".into(),
        config.clone(),
        "disconnect".into(),
        "--forget".into(),
    ])
    .await;
    let views = stdout_json(&forget);
    assert_eq!(views[0]["status"], "Anonymous");
    assert!(views[0]["principal"].is_null());
    assert!(!dir.join("store").join("ic_session.json").exists());

    std::fs::remove_dir_all(dir).unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn cli_connect_without_nonce_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = temp_dir();
    let config = write_config(&dir, &server.uri()).display().to_string();

    let output = run(vec![
        "--config".into(),
        config,
        "connect".into(),
        "--chain".into(),
        "ic".into(),
        "--principal".into(),
        "abc-123".into(),
    ])
    .await;

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Nonce unavailable"));

    std::fs::remove_dir_all(dir).unwrap();
}
