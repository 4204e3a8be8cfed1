//! The web server: REST endpoints, server-rendered pages, router wiring
//! and graceful shutdown.

pub mod error;
pub mod pages;
pub mod todos;

use crate::client::HttpTodoApi;
use crate::datastore::TodoStore;
use crate::libs::config::ServerConfig;
use crate::libs::messages::Message;
use crate::msg_print;
use anyhow::{Context, Result};
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application dependencies.
///
/// The store is a trait object so the backend (hosted REST or in-memory)
/// is selected at runtime; the API client is used by the server-rendered
/// pages for their self-referential fetches.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TodoStore>,
    pub api: HttpTodoApi,
}

impl AppState {
    pub fn new(store: Arc<dyn TodoStore>, public_url: &str) -> Self {
        Self {
            store,
            api: HttpTodoApi::new(public_url),
        }
    }
}

/// Builds the application router.
///
/// Unsupported methods on the API routes answer 405 with an `Allow`
/// header through axum's method fallback.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(pages::index))
        .route("/todo/{id}", get(pages::todo_detail))
        .route(
            "/api/todos",
            get(todos::list_todos).post(todos::create_todo),
        )
        .route(
            "/api/todos/{id}",
            get(todos::get_todo)
                .patch(todos::update_todo)
                .delete(todos::delete_todo),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Binds the configured address and serves until a shutdown signal.
pub async fn serve(config: &ServerConfig, store: Arc<dyn TodoStore>) -> Result<()> {
    let state = AppState::new(store, &config.public_url);
    let application = router(state);

    let address: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| {
            Message::InvalidServerAddress(format!("{}:{}", config.host, config.port)).to_string()
        })?;

    let listener = TcpListener::bind(address).await?;
    msg_print!(Message::ServerListening(address.to_string()));
    tracing::info!(%address, "server started");

    axum::serve(listener, application)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    msg_print!(Message::ServerShutdown);
    Ok(())
}

/// Completes when SIGINT (Ctrl+C) or, on Unix, SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::warn!(%error, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::warn!(%error, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received Ctrl+C, shutting down");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, shutting down");
        }
    }
}
