use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use tokio::net::{TcpListener, TcpSocket, lookup_host};
use tracing::{error, info, warn};

use crate::config::{Config, IpVersion};
use crate::dispatch::Dispatcher;
use crate::http::connection::Connection;
use crate::store::Backend;

/// Pending connections the kernel may queue
const BACKLOG: u32 = 5;

/// Pause after a failed accept before trying again
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Resolves the configured host, then binds and listens on the first address
/// of the configured family.
pub async fn bind(cfg: &Config) -> anyhow::Result<TcpListener> {
    let addr = resolve(cfg).await?;

    let socket = match addr {
        SocketAddr::V4(_) => TcpSocket::new_v4(),
        SocketAddr::V6(_) => TcpSocket::new_v6(),
    }
    .context("Failed to create socket")?;

    socket
        .set_reuseaddr(cfg.reuse_address)
        .context("Failed to set SO_REUSEADDR")?;
    socket
        .bind(addr)
        .with_context(|| format!("Failed to bind {}", addr))?;

    let listener = socket.listen(BACKLOG).context("Failed to listen")?;
    info!("Listening on {}", listener.local_addr()?);

    Ok(listener)
}

async fn resolve(cfg: &Config) -> anyhow::Result<SocketAddr> {
    let mut addrs = lookup_host((cfg.host.as_str(), cfg.port))
        .await
        .with_context(|| format!("Failed to resolve {}", cfg.host))?;

    addrs
        .find(|addr| match cfg.ip_version {
            IpVersion::V4 => addr.is_ipv4(),
            IpVersion::V6 => addr.is_ipv6(),
        })
        .with_context(|| format!("No {} address for {}", cfg.ip_version, cfg.host))
}

/// Accept loop serving one connection at a time.
pub struct Server<B> {
    listener: TcpListener,
    dispatcher: Dispatcher<B>,
    max_request_size: usize,
    read_timeout: Duration,
}

impl<B: Backend> Server<B> {
    pub fn new(listener: TcpListener, backend: B, cfg: &Config) -> Self {
        Self {
            listener,
            dispatcher: Dispatcher::new(backend),
            max_request_size: cfg.max_request_size,
            read_timeout: cfg.read_timeout(),
        }
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves connections until `shutdown` resolves.
    ///
    /// Each accepted connection runs to completion before the next accept, so
    /// a shutdown that arrives mid-request lets that request finish. A failed
    /// connection is logged and dropped; only `shutdown` ends the loop.
    pub async fn run(&self, shutdown: impl Future) {
        tokio::pin!(shutdown);

        loop {
            let accepted = tokio::select! {
                biased;

                _ = &mut shutdown => {
                    info!("Shutdown signal received");
                    break;
                }

                res = self.listener.accept() => res,
            };

            let (socket, peer) = match accepted {
                Ok(pair) => pair,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {
                    info!("Accept interrupted, shutting down");
                    break;
                }
                Err(e) => {
                    error!(error = %e, "Failed to accept connection");
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                    continue;
                }
            };

            info!(peer = %peer, "Accepted connection");

            let mut conn = Connection::new(
                socket,
                &self.dispatcher,
                self.max_request_size,
                self.read_timeout,
            );

            if let Err(e) = conn.run().await {
                warn!(peer = %peer, error = %e, "Connection abandoned");
            }
        }
    }
}
