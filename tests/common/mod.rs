//! Shared utilities for integration tests.

use std::future::Future;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};

use couch_relay::config::RelayConfig;
use couch_relay::couch::CouchClient;
use couch_relay::{HttpServer, Shutdown};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// A canned CouchDB answer.
pub struct MockResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl MockResponse {
    pub fn new(status: u16, content_type: &'static str, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type,
            body: body.into(),
        }
    }
}

/// Request targets (path and query) received by a mock backend.
pub type Recorded = Arc<Mutex<Vec<String>>>;

/// Start a programmable mock CouchDB. Each request target is recorded and
/// passed to `f`, which decides the response.
pub async fn start_mock_couch<F, Fut>(f: F) -> (SocketAddr, Recorded)
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = MockResponse> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let recorded: Recorded = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);

    let log = recorded.clone();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let f = f.clone();
            let log = log.clone();
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut chunk).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                    }
                }
                let head = String::from_utf8_lossy(&buf);
                let target = head
                    .lines()
                    .next()
                    .and_then(|line| line.split_whitespace().nth(1))
                    .unwrap_or("")
                    .to_string();
                log.lock().unwrap().push(target.clone());

                let response = f(target).await;
                let response_str = format!(
                    "HTTP/1.1 {} Mock\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    response.status,
                    response.content_type,
                    response.body.len(),
                    response.body
                );
                let _ = socket.write_all(response_str.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (addr, recorded)
}

/// Mock CouchDB that always gives the same answer.
pub async fn start_fixed_couch(status: u16, content_type: &'static str, body: &'static str) -> (SocketAddr, Recorded) {
    start_mock_couch(move |_| async move { MockResponse::new(status, content_type, body) }).await
}

/// A relay running on an ephemeral port.
pub struct TestRelay {
    pub address: String,
    pub client: reqwest::Client,
    shutdown: Shutdown,
}

impl TestRelay {
    pub async fn spawn(config: RelayConfig) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = format!("http://{}", listener.local_addr().unwrap());
        let shutdown = Shutdown::new();
        let upstream = reqwest::Client::builder().no_proxy().build().unwrap();
        let server = HttpServer::with_client(config, CouchClient::with_client(upstream));
        let server_shutdown = shutdown.subscribe();

        tokio::spawn(async move {
            let _ = server.run(listener, server_shutdown).await;
        });

        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(0)
            .no_proxy()
            .build()
            .unwrap();

        Self {
            address,
            client,
            shutdown,
        }
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Relay unreachable")
    }
}

impl Drop for TestRelay {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Configuration pointing the defaults at a mock backend.
pub fn config_for(backend: SocketAddr) -> RelayConfig {
    let mut config = RelayConfig::default();
    config.couch.default_url = Some(format!("http://{}/mydb", backend));
    config.couch.default_design_doc = Some("myapp".into());
    config
}

/// Write a template file under `dir`.
pub fn write_template(dir: &Path, name: &str, source: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, source).unwrap();
}
