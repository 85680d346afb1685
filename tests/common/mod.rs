//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue};
use route_service_broker::catalog::{RawPlan, RawRouteService};
use route_service_broker::config::BrokerConfig;
use route_service_broker::lifecycle::{build_broker, Shutdown};
use route_service_broker::HttpServer;
use tokio::net::TcpListener;

pub const USERNAME: &str = "brokeruser";
pub const PASSWORD: &str = "password";

/// Two services: one relying on defaults, one with explicit plans.
pub fn test_config() -> BrokerConfig {
    BrokerConfig {
        route_services: vec![
            RawRouteService::new("echo", "http://echo.example.com"),
            RawRouteService::new("auth", "http://unused")
                .with_description("Authenticating proxy")
                .with_tags(["auth", "proxy"])
                .with_plan(RawPlan::new("auth-basic", "https://auth.example.com/basic"))
                .with_plan(RawPlan::new("auth-premium", "https://auth.example.com/premium")),
        ],
        ..BrokerConfig::default()
    }
}

/// Start the broker on an ephemeral port.
#[allow(dead_code)]
pub async fn start_broker(config: BrokerConfig) -> (SocketAddr, Shutdown) {
    let broker = build_broker(&config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(Arc::new(broker), &config);
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// Client sending the API version header on every request.
#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    let mut headers = HeaderMap::new();
    headers.insert("X-Broker-API-Version", HeaderValue::from_static("2.14"));
    reqwest::Client::builder()
        .default_headers(headers)
        .no_proxy()
        .build()
        .unwrap()
}
