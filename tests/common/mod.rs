//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Mutex;

use mongo_health_probe::config::StoreConfig;
use mongo_health_probe::observability::metrics::MetricsSink;
use mongo_health_probe::ConnectionState;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Sink that remembers every value the probe published.
#[derive(Default)]
pub struct RecordingSink {
    values: Mutex<Vec<ConnectionState>>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn last(&self) -> Option<ConnectionState> {
        self.values.lock().unwrap().last().copied()
    }

    pub fn history(&self) -> Vec<ConnectionState> {
        self.values.lock().unwrap().clone()
    }
}

impl MetricsSink for RecordingSink {
    fn record_connection_state(&self, state: ConnectionState) {
        self.values.lock().unwrap().push(state);
    }
}

/// Reserve a local port and release it, leaving nothing listening there.
#[allow(dead_code)]
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Start a TCP server that accepts connections and hangs up immediately,
/// standing in for something that is not a MongoDB server.
#[allow(dead_code)]
pub async fn start_hangup_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let _ = socket.shutdown().await;
        }
    });

    addr
}

/// Store config aimed at `addr` with a short selection timeout.
#[allow(dead_code)]
pub fn store_config_for(addr: SocketAddr) -> StoreConfig {
    StoreConfig {
        uri: format!("mongodb://{}/probe_test?directConnection=true", addr),
        server_selection_timeout_secs: 1,
        socket_timeout_secs: 2,
        ..StoreConfig::default()
    }
}

/// Minimal HTTP/1.1 GET returning the status line and body.
#[allow(dead_code)]
pub async fn http_get(addr: SocketAddr, path: &str) -> (String, String) {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!(
        "GET {} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n\r\n",
        path, addr
    );
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut raw = String::new();
    stream.read_to_string(&mut raw).await.unwrap();

    let status = raw.lines().next().unwrap_or_default().to_string();
    let body = raw
        .split_once("\r\n\r\n")
        .map(|(_, body)| body.to_string())
        .unwrap_or_default();
    (status, body)
}
