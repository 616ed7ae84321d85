//! Application wiring: store selection, route table and server lifecycle.

use crate::config::{StoreBackend, UserConfig};
use crate::handlers;
use crate::services::{InMemoryUserStore, MongoUserStore, UserStore};
use axum::{middleware::from_fn, routing::get, Router};
use service_core::error::AppError;
use service_core::middleware::{
    http_trace_layer, metrics_middleware, request_id_middleware, security_headers_middleware,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;

/// Shared application state, created once at startup and handed to every
/// handler.
#[derive(Clone)]
pub struct AppState {
    pub config: UserConfig,
    pub store: Arc<dyn UserStore>,
}

impl AppState {
    pub fn store_timeout(&self) -> Duration {
        self.config.store.timeout()
    }
}

/// Route table for the user resource plus operational endpoints.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .route("/users", get(handlers::get_all_users))
        .route("/user", axum::routing::post(handlers::create_user))
        .route(
            "/user/:user_id",
            get(handlers::get_user)
                .put(handlers::edit_user)
                .delete(handlers::delete_user),
        )
        .layer(from_fn(metrics_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(http_trace_layer())
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Open the store selected by configuration.
pub async fn connect_store(config: &UserConfig) -> Result<Arc<dyn UserStore>, AppError> {
    match config.store.backend {
        StoreBackend::Mongodb => {
            let uri = config.mongodb.uri.as_deref().ok_or_else(|| {
                AppError::ConfigError(anyhow::anyhow!(
                    "MONGODB_URI is required for the mongodb store backend"
                ))
            })?;

            let store =
                MongoUserStore::connect(uri, &config.mongodb.database, &config.mongodb.collection)
                    .await?;
            store.initialize_indexes().await.map_err(|e| {
                tracing::error!("Failed to initialize database indexes: {}", e);
                e
            })?;
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory user store; data is lost on restart");
            Ok(Arc::new(InMemoryUserStore::new()))
        }
    }
}

pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    pub async fn build(config: UserConfig) -> Result<Self, AppError> {
        let store = connect_store(&config).await?;
        Self::build_with_store(config, store).await
    }

    /// Build around an already opened store.
    pub async fn build_with_store(
        config: UserConfig,
        store: Arc<dyn UserStore>,
    ) -> Result<Self, AppError> {
        // Port 0 picks a free port, used by the test-suite.
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(port, store = store.backend(), "Listening on {}", port);

        Ok(Self {
            port,
            listener,
            state: AppState { config, store },
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn store(&self) -> Arc<dyn UserStore> {
        self.state.store.clone()
    }

    /// Serve until Ctrl+C or SIGTERM, then drain in-flight requests.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let app = router(self.state);
        axum::serve(self.listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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
