use std::sync::Arc;

use rcrt_store::EntryStore;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::handler::AppState;
use crate::router::build_router;

/// Timeline gateway bound to one store.
pub struct RcrtServer {
    config: ServerConfig,
    store: Arc<EntryStore>,
}

impl RcrtServer {
    /// Validate the config and open its store, creating it when allowed.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        config.validate()?;
        let store = if config.init_if_missing {
            EntryStore::open_or_init(&config.db_path)?
        } else {
            EntryStore::open(&config.db_path)?
        };
        Ok(Self {
            config,
            store: Arc::new(store),
        })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn store(&self) -> &EntryStore {
        &self.store
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(AppState::new(self.store.clone(), self.config.clone()))
    }

    /// Serve until Ctrl-C.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!(
            addr = %self.config.bind_addr,
            prefix = %self.config.prefix,
            db = %self.config.db_path.display(),
            mode = self.config.mode(),
            "rcrt server listening"
        );
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn requires_existing_store() {
        let dir = TempDir::new().unwrap();
        let config = ServerConfig {
            db_path: dir.path().join("db"),
            ..ServerConfig::default()
        };
        assert!(matches!(
            RcrtServer::new(config),
            Err(ServerError::Store(rcrt_store::StoreError::CorruptStore { .. }))
        ));
    }

    #[test]
    fn unified_variant_initializes_store() {
        let dir = TempDir::new().unwrap();
        let config = ServerConfig {
            db_path: dir.path().join("db"),
            init_if_missing: true,
            ..ServerConfig::default()
        };
        let server = RcrtServer::new(config).unwrap();
        assert_eq!(server.store().load().unwrap().len(), 4);
        let _router = server.router();
    }

    #[test]
    fn rejects_invalid_config() {
        let config = ServerConfig {
            prefix: "rcrt".into(),
            ..ServerConfig::default()
        };
        assert!(matches!(RcrtServer::new(config), Err(ServerError::Config(_))));
    }
}
