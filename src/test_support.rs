// src/test_support.rs
// =============================================================================
// Test-only helpers shared by the module tests.
//
// - A checker that bypasses proxies
// - A tiny HTTP stub that answers every request with a fixed status per path
// - A slow server that tracks how many requests it is serving at once
// - A server that accepts connections and never answers (for timeouts)
// - A URL pointing at a port nobody listens on (for refused connections)
// - Sinks that record or reject inserts
//
// Nothing here touches the real network or a real database.
// =============================================================================

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use crate::checker::{HealthChecker, UrlHealth};
use crate::store::ResultSink;

// A checker that talks to the local stubs directly, ignoring any
// HTTP_PROXY set in the environment running the tests.
pub fn local_checker(timeout: Duration) -> HealthChecker {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .no_proxy()
        .build()
        .unwrap();
    HealthChecker::from_client(client)
}

// Starts an HTTP/1.1 stub on a random local port.
//
// Paths listed in `routes` answer with their status code, anything else 404.
// Returns the base URL, e.g. "http://127.0.0.1:41234".
pub async fn spawn_status_server(routes: &[(&str, u16)]) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let routes: Arc<HashMap<String, u16>> = Arc::new(
        routes
            .iter()
            .map(|(path, code)| (path.to_string(), *code))
            .collect(),
    );

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            let routes = routes.clone();
            tokio::spawn(answer(socket, routes));
        }
    });

    format!("http://{}", addr)
}

async fn answer(mut socket: TcpStream, routes: Arc<HashMap<String, u16>>) {
    let mut request = Vec::new();
    let mut chunk = [0u8; 1024];

    // Read until the end of the request headers
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&chunk[..n]),
        }
    }

    let head = String::from_utf8_lossy(&request);
    let path = head.split_whitespace().nth(1).unwrap_or("/");
    let code = routes.get(path).copied().unwrap_or(404);

    // 204 and 304 must not carry a body length
    let length = if code == 204 || code == 304 {
        ""
    } else {
        "content-length: 0\r\n"
    };
    let response = format!("HTTP/1.1 {} Stub\r\n{}connection: close\r\n\r\n", code, length);

    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}

// Requests currently being served, and the highest value seen.
#[derive(Debug, Default)]
pub struct InFlight {
    current: AtomicUsize,
    pub peak: AtomicUsize,
    pub served: AtomicUsize,
}

// Starts a stub that holds every request for `delay` before answering 200.
pub async fn spawn_counting_server(delay: Duration) -> (String, Arc<InFlight>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let in_flight = Arc::new(InFlight::default());
    let counter = in_flight.clone();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let counter = counter.clone();
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut chunk = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut chunk).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&chunk[..n]),
                    }
                }

                let now = counter.current.fetch_add(1, Ordering::SeqCst) + 1;
                counter.peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(delay).await;
                counter.current.fetch_sub(1, Ordering::SeqCst);
                counter.served.fetch_add(1, Ordering::SeqCst);

                let _ = socket
                    .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 0\r\nconnection: close\r\n\r\n")
                    .await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (format!("http://{}", addr), in_flight)
}

// Starts a server that accepts connections but never writes a response.
pub async fn spawn_silent_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            // Keep the socket open so the client waits for headers
            held.push(socket);
        }
    });

    format!("http://{}", addr)
}

// A URL on a local port that was bound once and then released.
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/", addr)
}

// Keeps every inserted record in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub records: Mutex<Vec<UrlHealth>>,
}

impl RecordingSink {
    pub fn urls(&self) -> Vec<String> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.url.clone())
            .collect()
    }
}

#[async_trait]
impl ResultSink for RecordingSink {
    async fn insert(&self, health: &UrlHealth) -> Result<()> {
        self.records.lock().unwrap().push(health.clone());
        Ok(())
    }
}

// Rejects inserts for URLs containing `needle`, records the rest.
#[derive(Debug)]
pub struct FailingSink {
    pub needle: String,
    pub attempts: Mutex<usize>,
    pub stored: RecordingSink,
}

impl FailingSink {
    pub fn rejecting(needle: &str) -> Self {
        Self {
            needle: needle.to_string(),
            attempts: Mutex::new(0),
            stored: RecordingSink::default(),
        }
    }
}

#[async_trait]
impl ResultSink for FailingSink {
    async fn insert(&self, health: &UrlHealth) -> Result<()> {
        *self.attempts.lock().unwrap() += 1;
        if health.url.contains(&self.needle) {
            return Err(anyhow!("store rejected {}", health.url));
        }
        self.stored.insert(health).await
    }
}
