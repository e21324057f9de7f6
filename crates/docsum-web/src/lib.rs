//! Web front end for the Docsum document summary generator.
//!
//! Serves a single upload page: post a `.txt` or `.pdf` file and the page
//! comes back with an extractive summary of its text. The original upload is
//! archived to the configured object store alongside.
//!
//! # Endpoints
//!
//! - `GET /` upload form
//! - `POST /` summarize an uploaded file
//! - `GET /health` liveness and storage backend
//! - `GET /version` package name and version

pub mod error;
pub mod routes;
pub mod state;
pub mod templates;

pub use error::{Result, ServerError};
pub use state::AppState;
pub use templates::{IndexPage, Templates};

use std::future::Future;
use std::net::SocketAddr;

use axum::{extract::DefaultBodyLimit, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use docsum_core::AppConfig;

/// The Docsum HTTP server.
pub struct Server {
    /// Application state.
    state: AppState,
}

impl Server {
    /// Build the summarizer, archive store and templates from configuration.
    pub async fn new(config: AppConfig) -> Result<Self> {
        Ok(Self {
            state: AppState::from_config(config).await?,
        })
    }

    /// Create a server from a pre-built application state.
    pub fn from_state(state: AppState) -> Self {
        Self { state }
    }

    /// Build the router with all routes and middleware.
    pub fn router(&self) -> Router {
        Router::new()
            .merge(routes::upload_routes())
            .merge(routes::health_routes())
            .layer(DefaultBodyLimit::max(self.state.config.server.max_upload_bytes))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Bind the configured address and serve until `shutdown` resolves.
    pub async fn run<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.bind_address();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Internal(format!("Failed to bind {}: {}", addr, e)))?;

        self.serve(listener, shutdown).await
    }

    /// Serve on an already-bound listener (useful for testing).
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let router = self.router();
        info!("Starting server on {}", listener.local_addr()?);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ServerError::Internal(format!("Server error: {}", e)))?;

        info!("Server stopped");
        Ok(())
    }

    /// Get the configured bind address.
    pub fn bind_address(&self) -> SocketAddr {
        self.state.config.server.bind_address
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }
}
