use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use tokio::sync::OnceCell;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

static HARNESS: OnceCell<TestHarness> = OnceCell::const_new();

pub struct TestHarness {
    pub base_url: String,
    #[allow(dead_code)]
    pub media_url: String,
    #[allow(dead_code)]
    child: Child,
}

/// Run the media-host stand-in on its own thread and runtime so it outlives
/// every per-test tokio runtime. Every upload succeeds with a hosted URL.
fn spawn_media_stub() -> Result<String> {
    let (tx, rx) = std::sync::mpsc::channel();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("media stub runtime");
        rt.block_on(async move {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/upload"))
                .respond_with(ResponseTemplate::new(200).set_body_json(
                    serde_json::json!({ "url": "https://cdn.test/hosted-image.jpg" }),
                ))
                .mount(&server)
                .await;
            tx.send(format!("{}/upload", server.uri())).ok();
            // Keep the stub alive for the whole test process
            std::future::pending::<()>().await;
        });
    });

    rx.recv_timeout(Duration::from_secs(10))
        .context("media stub did not start")
}

impl TestHarness {
    fn spawn() -> Result<Self> {
        let media_url = spawn_media_stub()?;

        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary to keep start fast during tests
        // Assumes debug profile; adjust if you run tests with --release
        let mut cmd = Command::new("target/debug/gavel-api");
        cmd.env("GAVEL_API_PORT", port.to_string())
            .env("MEDIA_UPLOAD_URL", &media_url)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Inherit the environment so the server sees DATABASE_URL from .env
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self {
            base_url,
            media_url,
            child,
        })
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

/// Spawn (or reuse) the server under test. Returns None when no database is
/// configured, so suites can skip instead of failing in bare environments.
pub async fn ensure_server() -> Result<Option<&'static TestHarness>> {
    let _ = dotenvy::dotenv();
    if std::env::var("DATABASE_URL").is_err() {
        return Ok(None);
    }

    let harness = HARNESS
        .get_or_init(|| async { TestHarness::spawn().expect("failed to spawn server") })
        .await;
    harness.wait_ready(Duration::from_secs(15)).await?;
    Ok(Some(harness))
}

/// Unique-per-run suffix so repeated test runs against a persistent
/// database never collide on unique columns.
#[allow(dead_code)]
pub fn unique(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}-{}", prefix, nanos)
}

/// Sign up a fresh user and log in, returning (access_token, user json).
#[allow(dead_code)]
pub async fn signup_and_login(
    client: &reqwest::Client,
    base_url: &str,
    role: Option<&str>,
) -> Result<(String, serde_json::Value)> {
    let name = unique("user");
    let email = format!("{}@example.com", name);
    let mut body = serde_json::json!({
        "username": &name,
        "email": &email,
        "password": "password123",
    });
    if let Some(role) = role {
        body["role"] = serde_json::json!(role);
    }

    let res = client
        .post(format!("{}/signup", base_url))
        .json(&body)
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == StatusCode::CREATED,
        "signup failed: {}",
        res.status()
    );

    let res = client
        .post(format!("{}/login", base_url))
        .json(&serde_json::json!({ "email": &email, "password": "password123" }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());

    let body = res.json::<serde_json::Value>().await?;
    let token = body["data"]["access_token"]
        .as_str()
        .context("missing access_token")?
        .to_string();
    let user = body["data"]["user"].clone();
    Ok((token, user))
}

/// Create an auction as the given admin, returning its id.
#[allow(dead_code)]
pub async fn create_auction(
    client: &reqwest::Client,
    base_url: &str,
    admin_token: &str,
) -> Result<i64> {
    let res = client
        .post(format!("{}/auctions", base_url))
        .bearer_auth(admin_token)
        .json(&serde_json::json!({
            "name": unique("auction"),
            "date": "2025-06-01",
            "start_time": "09:00",
            "end_time": "17:00",
        }))
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == StatusCode::CREATED,
        "auction create failed: {}",
        res.status()
    );
    let body = res.json::<serde_json::Value>().await?;
    body["data"]["auction_id"]
        .as_i64()
        .context("missing auction_id")
}
