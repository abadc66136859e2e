//! dapr-ledger - Account ledger service
//!
//! Serves account queries and balance changes over HTTP and consumes the
//! `deposit` / `withdraw` pub/sub topics through the Dapr sidecar.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{middleware, Router};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dapr_ledger::api::{self, AppState};
use dapr_ledger::state::{DaprStateClient, InMemoryStateStore, StateStoreClient};
use dapr_ledger::{AccountLedger, Config, StateBackend};

/// Initialize tracing/logging
fn init_tracing(json: bool) {
    let registry = tracing_subscriber::registry().with(
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "dapr_ledger=debug,tower_http=debug".into()),
    );

    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Select the state store client
fn build_state_client(config: &Config) -> anyhow::Result<Arc<dyn StateStoreClient>> {
    match config.state_backend {
        StateBackend::Dapr => {
            tracing::info!(
                "Using Dapr state store '{}' via sidecar at {}:{}",
                config.state_store_name,
                config.dapr_http_host,
                config.dapr_http_port
            );
            let mut client = DaprStateClient::new(
                &config.dapr_http_host,
                config.dapr_http_port,
                config.state_request_timeout,
            )?;
            if let Some(token) = &config.dapr_api_token {
                client = client.with_api_token(token.clone());
            }
            Ok(Arc::new(client))
        }
        StateBackend::Memory => {
            tracing::warn!("Using in-memory state store; balances are lost on restart");
            Ok(Arc::new(InMemoryStateStore::new()))
        }
    }
}

/// Build the application router
fn build_router(state: AppState) -> Router {
    // Note: Axum layers are applied in reverse order (last added = first executed)
    // Order: request id -> trace -> logging -> handler
    Router::new()
        // Health check
        .route("/health", axum::routing::get(health_check))
        .merge(api::create_app_router())
        .layer(middleware::from_fn(api::middleware::logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(config.log_json);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    tracing::info!("Starting dapr-ledger server");

    let client = build_state_client(&config)?;
    let ledger = AccountLedger::new(client, config.ledger_config());

    tracing::info!(
        max_attempts = config.ledger_max_attempts,
        allow_negative_balance = config.allow_negative_balance,
        "Ledger configured"
    );

    let app = build_router(AppState::new(ledger, config.pubsub_name.clone()));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down. Goodbye!");

    Ok(())
}

/// Shutdown signal handler for graceful shutdown
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}
