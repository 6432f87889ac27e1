use std::io::Write;
use std::net::TcpListener;
use std::time::{Duration, Instant};

use reqwest::Client;
use tempfile::NamedTempFile;
use tokio::time::{sleep, timeout};

const ANGRY_MONKEY_DIGEST: &str =
    "ZEHhWB65gUlzdVwtDQArEyx+KVLzp/aTaRaPlBzYRIFj6vjFdqEb0Q5B8zVKCZ0vKbZPZklJz0Fd7su2A+gf7Q==";

/// Find an available port
fn get_available_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

/// Create a minimal valid config
fn minimal_config(port: u16, delay_ms: u64) -> String {
    format!(
        r#"
[server]
host = "127.0.0.1"
port = {}

[jobs]
delay_ms = {}
"#,
        port, delay_ms
    )
}

fn write_config(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

/// Spawn the server and return a handle
async fn spawn_server(config_path: &std::path::Path) -> tokio::process::Child {
    tokio::process::Command::new(env!("CARGO_BIN_EXE_hasherd"))
        .env("HASHER_CONFIG", config_path)
        .env("RUST_LOG", "error") // Quiet logs during tests
        .kill_on_drop(true)
        .spawn()
        .expect("Failed to spawn server")
}

/// Wait for server to be ready
async fn wait_for_server(port: u16, max_attempts: u32) -> bool {
    let client = Client::new();
    for _ in 0..max_attempts {
        if client
            .get(format!("http://127.0.0.1:{}/health", port))
            .send()
            .await
            .is_ok()
        {
            return true;
        }
        sleep(Duration::from_millis(50)).await;
    }
    false
}

#[tokio::test]
async fn test_health_endpoint() {
    let port = get_available_port();
    let config = write_config(&minimal_config(port, 100));

    let mut server = spawn_server(config.path()).await;
    assert!(
        wait_for_server(port, 40).await,
        "Server did not start in time"
    );

    let response = Client::new()
        .get(format!("http://127.0.0.1:{}/health", port))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let json: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(json["status"], "ok");
    assert_eq!(json["state"], "running");

    // Cleanup
    server.kill().await.ok();
}

#[tokio::test]
async fn test_hash_round_trip_over_http() {
    let port = get_available_port();
    let config = write_config(&minimal_config(port, 100));

    let mut server = spawn_server(config.path()).await;
    assert!(
        wait_for_server(port, 40).await,
        "Server did not start in time"
    );

    let client = Client::new();
    let ticket = client
        .post(format!("http://127.0.0.1:{}/hash", port))
        .form(&[("password", "angryMonkey")])
        .send()
        .await
        .expect("Failed to send request")
        .text()
        .await
        .unwrap();
    assert_eq!(ticket, "1");

    sleep(Duration::from_millis(300)).await;

    let digest = client
        .get(format!("http://127.0.0.1:{}/hash/{}", port, ticket))
        .send()
        .await
        .expect("Failed to send request");
    assert!(digest.status().is_success());
    assert_eq!(digest.text().await.unwrap(), ANGRY_MONKEY_DIGEST);

    server.kill().await.ok();
}

#[tokio::test]
async fn test_shutdown_waits_for_pending_jobs() {
    let port = get_available_port();
    let delay = Duration::from_millis(1000);
    let config = write_config(&minimal_config(port, delay.as_millis() as u64));

    let mut server = spawn_server(config.path()).await;
    assert!(
        wait_for_server(port, 40).await,
        "Server did not start in time"
    );

    let client = Client::new();
    let admitted_at = Instant::now();
    let response = client
        .post(format!("http://127.0.0.1:{}/hash", port))
        .form(&[("password", "angryMonkey")])
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let response = client
        .get(format!("http://127.0.0.1:{}/shutdown", port))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.text().await.unwrap(), "shutting down");

    let status = timeout(Duration::from_secs(10), server.wait())
        .await
        .expect("Server did not exit after shutdown")
        .expect("Failed to wait for server");

    assert!(status.success());
    assert!(
        admitted_at.elapsed() >= delay,
        "Server exited before the pending job finished"
    );
}

#[tokio::test]
async fn test_config_endpoint_reflects_file() {
    let port = get_available_port();
    let config = write_config(&minimal_config(port, 250));

    let mut server = spawn_server(config.path()).await;
    assert!(
        wait_for_server(port, 40).await,
        "Server did not start in time"
    );

    let json: serde_json::Value = Client::new()
        .get(format!("http://127.0.0.1:{}/config", port))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse JSON");

    assert_eq!(json["server"]["port"], port);
    assert_eq!(json["jobs"]["delay_ms"], 250);

    server.kill().await.ok();
}

#[tokio::test]
async fn test_missing_config_file_exits_with_error() {
    let result = timeout(
        Duration::from_secs(5),
        tokio::process::Command::new(env!("CARGO_BIN_EXE_hasherd"))
            .env("HASHER_CONFIG", "/nonexistent/config.toml")
            .env("RUST_LOG", "error")
            .output(),
    )
    .await
    .expect("Command timed out")
    .expect("Failed to execute command");

    assert!(!result.status.success());
}

#[tokio::test]
async fn test_port_zero_exits_with_error() {
    let config = write_config(
        r#"
[server]
port = 0
"#,
    );

    let result = timeout(
        Duration::from_secs(5),
        tokio::process::Command::new(env!("CARGO_BIN_EXE_hasherd"))
            .env("HASHER_CONFIG", config.path())
            .env("RUST_LOG", "error")
            .output(),
    )
    .await
    .expect("Command timed out")
    .expect("Failed to execute command");

    assert!(!result.status.success());
}
