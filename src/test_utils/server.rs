//! A minimal HTTP/1.1 server for tests.
//!
//! Routes map a request target (path plus optional query) to a status code
//! and a body. Each connection serves exactly one request and is closed.
//! Unknown routes answer 404.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, Once};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

#[derive(Default)]
struct State {
    routes: HashMap<String, (u16, Vec<u8>)>,
    hits: HashMap<String, usize>,
}

static BYPASS_PROXY: Once = Once::new();

/// Keeps loopback requests away from any proxy configured in the environment.
fn bypass_proxy_for_loopback() {
    BYPASS_PROXY.call_once(|| {
        let existing = std::env::var("NO_PROXY").or_else(|_| std::env::var("no_proxy")).unwrap_or_default();
        let value = if existing.is_empty() {
            "127.0.0.1,localhost".to_string()
        } else {
            format!("{existing},127.0.0.1,localhost")
        };
        // SAFETY: runs once, before any HTTP client in the test process is built
        unsafe {
            std::env::set_var("NO_PROXY", &value);
            std::env::set_var("no_proxy", &value);
        }
    });
}

/// Local HTTP server bound to an ephemeral port.
pub struct TestServer {
    addr: SocketAddr,
    state: Arc<Mutex<State>>,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Binds `127.0.0.1:0` and starts serving in the background.
    pub async fn start() -> Self {
        bypass_proxy_for_loopback();
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind test server");
        let addr = listener.local_addr().expect("local addr");
        let state = Arc::new(Mutex::new(State::default()));

        let shared = Arc::clone(&state);
        let handle = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let state = Arc::clone(&shared);
                tokio::spawn(async move {
                    let _ = handle_connection(stream, state).await;
                });
            }
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    /// Base URL such as `http://127.0.0.1:40123`.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Registers a response for `target` (e.g. `/releases?per_page=100&page=1`).
    pub fn route(&self, target: &str, status: u16, body: impl Into<Vec<u8>>) {
        let mut state = self.state.lock().expect("server state");
        state.routes.insert(target.to_string(), (status, body.into()));
    }

    /// Number of requests received for `target`.
    pub fn hits(&self, target: &str) -> usize {
        let state = self.state.lock().expect("server state");
        state.hits.get(target).copied().unwrap_or(0)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn handle_connection(mut stream: TcpStream, state: Arc<Mutex<State>>) -> std::io::Result<()> {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut buf).await?;
        if n == 0 {
            return Ok(());
        }
        request.extend_from_slice(&buf[..n]);
    }

    let head = String::from_utf8_lossy(&request);
    let target = head.split_whitespace().nth(1).unwrap_or("/").to_string();

    let (status, body) = {
        let mut state = state.lock().expect("server state");
        *state.hits.entry(target.clone()).or_default() += 1;
        state.routes.get(&target).cloned().unwrap_or((404, b"Not Found".to_vec()))
    };

    let reason = match status {
        200 => "OK",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    };
    let header = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Length: {}\r\nContent-Type: application/octet-stream\r\nConnection: close\r\n\r\n",
        body.len()
    );

    stream.write_all(header.as_bytes()).await?;
    stream.write_all(&body).await?;
    stream.shutdown().await
}
