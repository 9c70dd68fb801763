//! Startup orchestration.
//!
//! # Responsibilities
//! - Bind the listener from configuration
//! - Spawn the server with a shutdown subscription
//! - Hand back a handle that can stop it
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The route table is compiled before the listener is bound, so traffic
//!   only arrives once routing is ready

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::config::AppConfig;
use crate::http::{Dispatcher, HttpServer};
use crate::lifecycle::Shutdown;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// A server running on a background task.
#[derive(Debug)]
pub struct RunningServer {
    local_addr: SocketAddr,
    shutdown: Shutdown,
    handle: JoinHandle<Result<(), std::io::Error>>,
}

impl RunningServer {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn shutdown(&self) -> &Shutdown {
        &self.shutdown
    }

    /// Wait for the server task to exit on its own.
    pub async fn wait(self) -> Result<(), std::io::Error> {
        self.handle.await.map_err(std::io::Error::other)?
    }

    /// Trigger shutdown and wait for in-flight requests to drain.
    pub async fn stop(self) -> Result<(), std::io::Error> {
        self.shutdown.trigger();
        self.wait().await
    }
}

/// Bind `config.server.bind_address` and serve `dispatcher` on it.
pub async fn start(config: &AppConfig, dispatcher: Dispatcher) -> Result<RunningServer, StartupError> {
    let address = config.server.bind_address.clone();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;
    let local_addr = listener.local_addr().map_err(|source| StartupError::Bind {
        address: address.clone(),
        source,
    })?;

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config.server.clone(), dispatcher);
    let handle = tokio::spawn(server.run(listener, shutdown.subscribe()));

    tracing::info!(address = %local_addr, "Listening for connections");
    Ok(RunningServer {
        local_addr,
        shutdown,
        handle,
    })
}
