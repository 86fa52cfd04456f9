#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;

pub const TEST_SECRET: &str = "integration-test-csrf-secret";

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let child = server_command()
            .env("APP_ENV", "development")
            .env("CSRF_SECRET", TEST_SECRET)
            .env("CSRF_API_PORT", port.to_string())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

/// Command for the server binary with a clean CSRF environment
pub fn server_command() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_csrf-guard"));
    cmd.env_remove("APP_ENV")
        .env_remove("CSRF_SECRET")
        .env_remove("CSRF_MAX_AGE_MS")
        .env_remove("CSRF_MAX_FUTURE_SKEW_MS")
        .env_remove("PORT")
        .stdin(Stdio::null());
    cmd
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Start a dedicated server for one test; it is killed when dropped
pub async fn ensure_server() -> Result<TestServer> {
    let server = TestServer::spawn()?;
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Fetch a fresh token from the running server
pub async fn fetch_token(server: &TestServer) -> Result<String> {
    let res = reqwest::Client::new()
        .get(format!("{}/csrf/token", server.base_url))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "token endpoint returned {}", res.status());

    let token = res
        .headers()
        .get("x-csrf-token")
        .and_then(|v| v.to_str().ok())
        .context("missing X-CSRF-Token header")?
        .to_string();
    Ok(token)
}
