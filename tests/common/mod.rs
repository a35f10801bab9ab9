use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;

static SERVER: OnceLock<TestServer> = OnceLock::new();

#[allow(dead_code)]
pub const ADMIN_USER: &str = "reich";
pub const ADMIN_PASSWORD: &str = "it-test-admin-password";
#[allow(dead_code)]
pub const PLAIN_USER: &str = "will";
pub const PLAIN_PASSWORD: &str = "it-test-user-password";

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    #[allow(dead_code)]
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary to keep start fast during tests.
        // Assumes debug profile; adjust if you run tests with --release.
        let mut cmd = Command::new("target/debug/movies-api");
        cmd.env("MOVIES_API_PORT", port.to_string())
            // Pin the store and credentials so runs are deterministic
            .env_remove("DATABASE_URL")
            .env("JWT_SECRET", "integration-test-secret")
            .env("SEED_ADMIN_PASSWORD", ADMIN_PASSWORD)
            .env("SEED_USER_PASSWORD", PLAIN_PASSWORD)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

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
        anyhow::bail!(
            "server did not become ready on {} within {:?}",
            self.base_url,
            timeout
        )
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Log in and return the bearer token from the response body.
#[allow(dead_code)]
pub async fn obtain_token(base_url: &str, username: &str, password: &str) -> Result<String> {
    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/auth/token", base_url))
        .form(&[("username", username), ("password", password)])
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == StatusCode::OK,
        "login failed with status {}",
        res.status()
    );
    let body = res.json::<serde_json::Value>().await?;
    let token = body["data"]["access_token"]
        .as_str()
        .context("missing access_token in login response")?
        .to_string();
    Ok(token)
}

/// Create a movie and return its assigned id.
#[allow(dead_code)]
pub async fn create_movie(base_url: &str, payload: &serde_json::Value) -> Result<i64> {
    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/movies", base_url))
        .json(payload)
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == StatusCode::CREATED,
        "create failed with status {}",
        res.status()
    );
    let body = res.json::<serde_json::Value>().await?;
    body["data"]["id"].as_i64().context("missing id in create response")
}
