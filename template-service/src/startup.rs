//! Application bootstrap and lifecycle.

use crate::config::TemplateConfig;
use crate::services::{Database, RedisCache};
use crate::{build_router, AppState};
use axum::Router;
use service_core::error::AppError;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
    db: Database,
}

impl Application {
    /// Connect the database (applying migrations) and the cache, then bind
    /// the listener.
    pub async fn build(config: TemplateConfig) -> Result<Self, AppError> {
        let db = Database::connect(&config.database).await?;
        db.run_migrations().await?;

        let cache = RedisCache::connect(&config.cache).await?;
        tracing::info!("Cache initialized");

        let state = AppState {
            config,
            db,
            cache: Arc::new(cache),
        };
        Self::with_state(state).await
    }

    /// Bind the listener for already-built state. Port 0 picks a free port.
    pub async fn with_state(state: AppState) -> Result<Self, AppError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], state.config.server.port));
        let listener = TcpListener::bind(addr).await?;
        let port = listener.local_addr()?.port();
        let db = state.db.clone();

        Ok(Self {
            port,
            listener,
            router: build_router(state),
            db,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), AppError> {
        self.run_with_graceful_shutdown(std::future::pending()).await
    }

    /// Serve until `signal` resolves, drain in-flight requests, then close
    /// the database pool.
    pub async fn run_with_graceful_shutdown<F>(self, signal: F) -> Result<(), AppError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tracing::info!(port = self.port, "Listening");

        axum::serve(self.listener, self.router.into_make_service())
            .with_graceful_shutdown(signal)
            .await?;

        self.db.close().await;
        tracing::info!("Server stopped");
        Ok(())
    }
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
