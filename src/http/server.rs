//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Wrap the application router with the gateway middleware stack
//! - Enforce the pass order: rate-check → identity-resolve → delegate →
//!   header-stamp
//! - Bind the server to a listener and serve with graceful shutdown
//! - Run the rate-limiter sweep task for the server's lifetime

use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::auth::identity::{identity_middleware, IdentityResolver};
use crate::config::GatewayConfig;
use crate::http::request::request_id_middleware;
use crate::security::headers::{security_headers_middleware, HeaderPolicy};
use crate::security::rate_limit::{self, rate_limit_middleware, RateLimiterState};

/// HTTP server wrapping an application router with the gateway stack.
pub struct GatewayServer {
    router: Router,
    limiter: Arc<RateLimiterState>,
    sweep_interval: Duration,
}

impl GatewayServer {
    /// Wrap `app` with the gateway middleware for this configuration.
    ///
    /// `resolver` is the deployment's single identity strategy, typically
    /// built from [`GatewayConfig::auth`] plus the session store or provider
    /// client the embedding application owns.
    pub fn new(config: GatewayConfig, app: Router, resolver: IdentityResolver) -> Self {
        let limiter = Arc::new(RateLimiterState::new(config.rate_limit.clone()));
        let header_policy = Arc::new(HeaderPolicy::new(&config.security));
        let resolver = Arc::new(resolver);

        // ServiceBuilder applies top to bottom on the request path. Headers
        // sit outside the rate limiter so 429 rejections are stamped too.
        let router = app.layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config.timeouts.request_secs,
                )))
                .layer(middleware::from_fn(request_id_middleware))
                .layer(middleware::from_fn_with_state(
                    header_policy,
                    security_headers_middleware,
                ))
                .layer(middleware::from_fn_with_state(
                    limiter.clone(),
                    rate_limit_middleware,
                ))
                .layer(middleware::from_fn_with_state(
                    resolver,
                    identity_middleware,
                )),
        );

        Self {
            router,
            limiter,
            sweep_interval: Duration::from_secs(config.rate_limit.sweep_interval_secs),
        }
    }

    /// Run the server, accepting connections on the given listener until
    /// the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Gateway starting");

        rate_limit::spawn_sweeper(
            self.limiter.clone(),
            self.sweep_interval,
            shutdown.resubscribe(),
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("Gateway stopped");
        Ok(())
    }
}
