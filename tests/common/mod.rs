//! Shared utilities for integration testing.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::Request,
    routing::{any, get, post},
    Router,
};
use tokio::net::TcpListener;

use blog_gateway::auth::{AuthProvider, IdentityResolver, MemorySessionStore, RequestIdentity};
use blog_gateway::{GatewayConfig, GatewayServer, Shutdown};

/// A running gateway bound to an ephemeral port.
pub struct TestGateway {
    pub addr: SocketAddr,
    pub store: Arc<MemorySessionStore>,
    shutdown: Shutdown,
}

impl Drop for TestGateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Stand-in for the blog application downstream of the gateway.
fn test_app() -> Router {
    Router::new()
        .route("/", get(|| async { "home" }))
        .route("/login", post(|| async { "login ok" }))
        .route("/post/{slug}", post(|| async { "comment ok" }))
        .route("/api/search", any(|| async { "api ok" }))
        .route("/whoami", get(whoami))
}

async fn whoami(request: Request) -> String {
    match request.extensions().get::<RequestIdentity>() {
        Some(identity) => format!("user:{}", identity.username),
        None => "anonymous".to_string(),
    }
}

/// Start a gateway using the local-session strategy backed by an in-memory
/// store the test can populate.
pub async fn start_gateway(config: GatewayConfig) -> TestGateway {
    let store = Arc::new(MemorySessionStore::new());
    let resolver = IdentityResolver::local(store.clone(), config.auth.session_cookie.clone());
    spawn_gateway(config, resolver, store).await
}

/// Start a gateway using the external-provider strategy.
pub async fn start_gateway_with_provider(
    config: GatewayConfig,
    provider: Arc<dyn AuthProvider>,
) -> TestGateway {
    let store = Arc::new(MemorySessionStore::new());
    spawn_gateway(config, IdentityResolver::external(provider), store).await
}

async fn spawn_gateway(
    config: GatewayConfig,
    resolver: IdentityResolver,
    store: Arc<MemorySessionStore>,
) -> TestGateway {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = GatewayServer::new(config, test_app(), resolver);
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestGateway {
        addr,
        store,
        shutdown,
    }
}

/// HTTP client that never picks up a system proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
