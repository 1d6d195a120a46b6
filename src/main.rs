//! Standalone gateway binary.
//!
//! Runs the gateway around a placeholder echo application, the way the blog
//! is exercised before the real page/API routers are mounted. Deployments
//! embed [`blog_gateway::GatewayServer`] around their own router and session
//! store instead.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{extract::Request, routing::any, Router};
use clap::Parser;
use tokio::net::TcpListener;

use blog_gateway::auth::{IdentityResolver, MemorySessionStore, RequestIdentity};
use blog_gateway::config::{loader, AuthStrategy, GatewayConfig};
use blog_gateway::{observability, GatewayServer, Shutdown};

#[derive(Parser)]
#[command(name = "blog-gateway", about = "Request gateway for the blog")]
struct Cli {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    observability::logging::init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => loader::load_config(path)?,
        None => GatewayConfig::default(),
    };

    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        strict_csp = config.security.strict_csp,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            observability::metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let resolver = match config.auth.strategy {
        AuthStrategy::Local => IdentityResolver::local(
            Arc::new(MemorySessionStore::new()),
            config.auth.session_cookie.clone(),
        ),
        AuthStrategy::External => {
            // The provider client is owned by the embedding application; the
            // standalone binary has nothing to wire it to.
            return Err("auth.strategy = \"external\" requires embedding the gateway \
                 library with a provider client"
                .into());
        }
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        blog_gateway::lifecycle::signals::wait_for_signal().await;
        tracing::info!("Shutdown signal received");
        shutdown.trigger();
    });

    let app = Router::new()
        .route("/", any(echo_handler))
        .fallback(echo_handler);
    let server = GatewayServer::new(config, app, resolver);
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Placeholder downstream application: reports what the gateway resolved.
async fn echo_handler(request: Request) -> String {
    let who = request
        .extensions()
        .get::<RequestIdentity>()
        .map(|identity| identity.username.clone())
        .unwrap_or_else(|| "anonymous".to_string());
    format!("{} {} ({})", request.method(), request.uri().path(), who)
}
