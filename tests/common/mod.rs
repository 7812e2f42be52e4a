//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use structured_logger::config::{DemoConfig, LoggerConfig};
use structured_logger::http::DemoServer;
use structured_logger::lifecycle::Shutdown;
use structured_logger::observability::{Level, Logger, MemorySink};
use tokio::net::TcpListener;

/// A running demo server whose logger writes to memory.
pub struct TestServer {
    pub addr: SocketAddr,
    pub memory: MemorySink,
    pub shutdown: Shutdown,
}

pub async fn start_demo_server(level: Level) -> TestServer {
    let memory = MemorySink::new();
    let logger = Arc::new(Logger::with_sink(
        LoggerConfig {
            service_name: "integration".into(),
            level,
            ..LoggerConfig::default()
        },
        memory.clone(),
    ));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = DemoServer::new(DemoConfig::default(), logger);
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestServer {
        addr,
        memory,
        shutdown,
    }
}

/// Wait until `memory` holds at least `count` records, or give up after a second.
#[allow(dead_code)]
pub async fn wait_for_records(memory: &MemorySink, count: usize) -> Vec<serde_json::Value> {
    for _ in 0..100 {
        let records = memory.records();
        if records.len() >= count {
            return records;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    memory.records()
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
