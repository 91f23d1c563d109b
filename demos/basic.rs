//! # Example: basic
//!
//! Two TCP "hello" servers managed by one group.
//!
//! Shows how to:
//! - Implement the [`Service`] trait for a long-running listener.
//! - Attach the built-in [`LogWriter`] and route it through `tracing-subscriber`.
//! - Let the group stop everything on Ctrl-C (or SIGTERM) within 5 seconds.
//!
//! ## Flow
//! ```text
//! Group::start()
//!     ├─► HelloServer("server-1").start(ctx) ── accept loop until ctx cancelled
//!     ├─► HelloServer("server-2").start(ctx) ── accept loop until ctx cancelled
//!     └─► signal listener ── Ctrl-C ─► stop fan-out
//!                                        ├─► server-1.stop(deadline)
//!                                        └─► server-2.stop(deadline)
//! Group::wait()
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=debug cargo run --example basic
//! # in another shell
//! nc 127.0.0.1 56999
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lullaby::{Config, Group, LogWriter, Service, ServiceError, Subscribe};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Greets every client with one line, then closes the connection.
struct HelloServer {
    name: &'static str,
    addr: &'static str,
    /// Cancelled once the accept loop has exited.
    closed: CancellationToken,
}

impl HelloServer {
    fn new(name: &'static str, addr: &'static str) -> Self {
        Self {
            name,
            addr,
            closed: CancellationToken::new(),
        }
    }
}

#[async_trait]
impl Service for HelloServer {
    fn name(&self) -> &str {
        self.name
    }

    async fn start(&self, ctx: CancellationToken) -> Result<(), ServiceError> {
        let _closed = self.closed.clone().drop_guard();
        let listener = TcpListener::bind(self.addr).await?;
        tracing::info!(service = self.name, addr = self.addr, "listening");

        loop {
            tokio::select! {
                _ = ctx.cancelled() => return Ok(()),
                accepted = listener.accept() => {
                    let (mut stream, peer) = accepted?;
                    let greeting = format!("Hello from {}!\n", self.name);
                    tokio::spawn(async move {
                        if let Err(e) = stream.write_all(greeting.as_bytes()).await {
                            tracing::warn!(%peer, error = %e, "write failed");
                        }
                    });
                }
            }
        }
    }

    async fn stop(&self, deadline: CancellationToken) -> Result<(), ServiceError> {
        tracing::info!(service = self.name, "shutting down");
        tokio::select! {
            _ = self.closed.cancelled() => Ok(()),
            _ = deadline.cancelled() => Err(ServiceError::fail("accept loop did not exit")),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter)];
    let mut group = Group::builder(Config::with_stop_timeout(Duration::from_secs(5)))
        .with_subscribers(subs)
        .build();

    group.add(Arc::new(HelloServer::new("server-1", "127.0.0.1:56999")))?;
    group.add(Arc::new(HelloServer::new("server-2", "127.0.0.1:57000")))?;

    group.start()?;
    group.wait().await?;

    tracing::info!(cause = ?group.stop_cause(), "all servers stopped");
    Ok(())
}
