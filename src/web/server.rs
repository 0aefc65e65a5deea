//! Web server for Fileshelf.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::auth::AuthService;
use crate::config::Config;
use crate::file::BlobStore;
use crate::{Database, Result, ShelfError};

use super::handlers::AppState;
use super::router::create_router;

/// Web server for the API.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// Allowed CORS origins.
    cors_origins: Vec<String>,
}

impl WebServer {
    /// Create a new web server.
    ///
    /// Fails when the configuration is invalid or the blob store root cannot
    /// be created.
    pub fn new(config: &Config, db: Database) -> Result<Self> {
        config.validate()?;

        let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .map_err(|e| ShelfError::Config(format!("invalid server address: {e}")))?;

        let storage = BlobStore::new(&config.storage.root)?;
        tracing::info!("File storage initialized at: {}", config.storage.root);

        let auth = AuthService::from_config(db.pool().clone(), &config.auth);
        let app_state = AppState::new(db, auth, storage, config.storage.max_upload_bytes());

        Ok(Self {
            addr,
            app_state: Arc::new(app_state),
            cors_origins: config.web.cors_origins.clone(),
        })
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Build the router without binding a socket.
    pub fn router(&self) -> Router {
        create_router(self.app_state.clone(), &self.cors_origins)
    }

    /// Run the web server.
    pub async fn run(self) -> std::result::Result<(), std::io::Error> {
        let router = self.router();

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!("Web server listening on http://{}", local_addr);

        axum::serve(listener, router).await
    }

    /// Run the server and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> std::result::Result<SocketAddr, std::io::Error> {
        let router = self.router();

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!("Web server listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    fn create_test_config(storage: &TempDir) -> Config {
        let mut config = Config::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 0; // Use random port
        config.storage.root = storage.path().join("blobs").display().to_string();
        config.auth.jwt_secret = "test-secret-key-0123456789abcdef".to_string();
        config
    }

    #[tokio::test]
    async fn test_web_server_new() {
        let storage = TempDir::new().unwrap();
        let config = create_test_config(&storage);
        let db = Database::open_in_memory().await.unwrap();

        let server = WebServer::new(&config, db).unwrap();
        assert_eq!(server.addr().ip().to_string(), "127.0.0.1");
        assert!(storage.path().join("blobs").is_dir());
    }

    #[tokio::test]
    async fn test_web_server_rejects_short_secret() {
        let storage = TempDir::new().unwrap();
        let mut config = create_test_config(&storage);
        config.auth.jwt_secret = "short".to_string();
        let db = Database::open_in_memory().await.unwrap();

        assert!(matches!(
            WebServer::new(&config, db),
            Err(ShelfError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_web_server_run() {
        let storage = TempDir::new().unwrap();
        let config = create_test_config(&storage);
        let db = Database::open_in_memory().await.unwrap();

        let server = WebServer::new(&config, db).unwrap();
        let addr = server.run_with_addr().await.unwrap();

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();

        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(response.ends_with("OK"));
    }
}
