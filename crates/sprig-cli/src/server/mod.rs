//! HTTP servers: the development router and the plain static server.
//!
//! Both return a [`ServerHandle`] once the listener is bound, so callers can
//! read the actual port (useful with port `0`), stop the server and wait for
//! it to finish.

mod router;

pub use router::{NOT_FOUND_BODY, clean_request_path, decode_request_path, dev_router, static_router};

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use sprig_bundler::{BundleCapability, Mode, PackageNamespace};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Settings for the development server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevServerConfig {
    pub host: String,
    pub port: u16,
    /// Files here are compiled or served as-is.
    pub source_dir: PathBuf,
    /// Fallback for paths not present in `source_dir`.
    pub static_dir: PathBuf,
    pub namespace: PackageNamespace,
    /// Bundle scripts instead of transforming them one module at a time.
    pub bundle: bool,
    pub mode: Mode,
}

impl DevServerConfig {
    pub fn new(source_dir: impl Into<PathBuf>, static_dir: impl Into<PathBuf>) -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3000,
            source_dir: source_dir.into(),
            static_dir: static_dir.into(),
            namespace: PackageNamespace::default(),
            bundle: false,
            mode: Mode::Development,
        }
    }
}

/// Settings for serving a directory as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticServerConfig {
    pub host: String,
    pub port: u16,
    pub dir: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The listener could not bind the requested address.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// The server stopped with an I/O error.
    #[error("server error: {0}")]
    Serve(#[source] io::Error),

    /// The server task panicked or was aborted.
    #[error("server task failed: {0}")]
    Task(String),
}

/// Stops a running server from anywhere.
#[derive(Debug, Clone)]
pub struct Stopper {
    tx: Arc<watch::Sender<bool>>,
}

impl Stopper {
    pub fn stop(&self) {
        self.tx.send_replace(true);
    }
}

/// A running server.
#[derive(Debug)]
pub struct ServerHandle {
    host: String,
    port: u16,
    stopper: Stopper,
    task: JoinHandle<io::Result<()>>,
}

impl ServerHandle {
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The bound port, which differs from the requested one when that was `0`.
    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// Begin graceful shutdown. In-flight requests complete first.
    pub fn stop(&self) {
        self.stopper.stop();
    }

    pub fn stopper(&self) -> Stopper {
        self.stopper.clone()
    }

    /// Wait for the server to exit. A stopped server returns `Ok(())`.
    pub async fn wait(self) -> Result<(), ServerError> {
        match self.task.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(ServerError::Serve(e)),
            Err(e) => Err(ServerError::Task(e.to_string())),
        }
    }
}

/// Start the development server.
pub async fn start(
    config: DevServerConfig,
    bundler: Arc<dyn BundleCapability>,
) -> Result<ServerHandle, ServerError> {
    let (host, port) = (config.host.clone(), config.port);
    let router = dev_router(config, bundler);
    listen(&host, port, router).await
}

/// Serve a directory statically.
pub async fn serve(config: StaticServerConfig) -> Result<ServerHandle, ServerError> {
    let router = static_router(&config.dir);
    listen(&config.host, config.port, router).await
}

async fn listen(host: &str, port: u16, router: axum::Router) -> Result<ServerHandle, ServerError> {
    let addr = format!("{host}:{port}");
    let listener = TcpListener::bind((host, port))
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;
    let bound = listener
        .local_addr()
        .map_err(|source| ServerError::Bind { addr, source })?;

    let (tx, mut rx) = watch::channel(false);
    let task = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = rx.wait_for(|stopped| *stopped).await;
                debug!("[sprig-server] shutdown requested");
            })
            .await
    });

    info!("[sprig-server] listening on {}", bound);
    Ok(ServerHandle {
        host: host.to_string(),
        port: bound.port(),
        stopper: Stopper { tx: Arc::new(tx) },
        task,
    })
}
