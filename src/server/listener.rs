use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle, JoinSet};
use tracing::info;

use crate::config::Config;
use crate::http::connection::{Connection, Site};

/// Owns the listening socket and the site it serves.
///
/// The accept loop runs until the shutdown flag flips. A connection still
/// waiting for its request line is then closed; one whose response is being
/// written runs to completion.
pub struct Server {
    listener: TcpListener,
    site: Arc<Site>,
    concurrent: bool,
}

/// Handle to a server running in its own task.
///
/// `stop` consumes the handle, so a server can only be stopped once.
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl Server {
    pub async fn bind(cfg: &Config) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(&cfg.server.listen_addr).await?;
        Ok(Self {
            listener,
            site: Arc::new(Site::from_config(cfg)),
            concurrent: cfg.server.concurrent,
        })
    }

    /// Wraps an already bound listener.
    pub fn from_listener(listener: TcpListener, site: Site) -> Self {
        Self {
            listener,
            site: Arc::new(site),
            concurrent: false,
        }
    }

    /// Handle each connection in its own task instead of one at a time.
    pub fn concurrent(mut self, concurrent: bool) -> Self {
        self.concurrent = concurrent;
        self
    }

    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Runs the accept loop in a new task.
    pub fn spawn(self) -> anyhow::Result<ServerHandle> {
        let local_addr = self.local_addr()?;
        let (shutdown, signal) = watch::channel(false);
        let task = tokio::spawn(self.run(signal));

        Ok(ServerHandle {
            local_addr,
            shutdown,
            task,
        })
    }

    /// Accepts connections until `shutdown` becomes true or its sender is
    /// dropped. Per-connection failures are logged and never end the loop.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        if let Ok(addr) = self.listener.local_addr() {
            info!("Listening on http://{}", addr);
        }
        let mut in_flight = JoinSet::new();

        loop {
            if *shutdown.borrow() {
                break;
            }

            let accepted = tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
                res = self.listener.accept() => res,
            };

            let (socket, peer) = match accepted {
                Ok(pair) => pair,
                Err(e) => {
                    tracing::warn!("Accept failed: {}", e);
                    continue;
                }
            };
            tracing::debug!("Accepted connection from {}", peer);

            if self.concurrent {
                let site = self.site.clone();
                in_flight.spawn(handle(socket, peer, site, shutdown.clone()));
                while let Some(joined) = in_flight.try_join_next() {
                    log_join(joined);
                }
            } else {
                handle(socket, peer, self.site.clone(), shutdown.clone()).await;
            }
        }

        drop(self.listener);
        while let Some(joined) = in_flight.join_next().await {
            log_join(joined);
        }
        info!("Server stopped");
    }
}

async fn handle(
    socket: TcpStream,
    peer: SocketAddr,
    site: Arc<Site>,
    shutdown: watch::Receiver<bool>,
) {
    let conn = Connection::new(socket, site).with_shutdown(shutdown);
    if let Err(e) = conn.run().await {
        tracing::error!("Connection error from {}: {:#}", peer, e);
    }
}

fn log_join(joined: Result<(), JoinError>) {
    if let Err(e) = joined {
        tracing::error!("Connection task failed: {}", e);
    }
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Asks the accept loop to stop without waiting for it.
    pub fn shutdown(&self) {
        let _ = self.shutdown.send(true);
    }

    /// Stops the accept loop and waits for it and any in-flight connection.
    pub async fn stop(self) -> anyhow::Result<()> {
        self.shutdown();
        self.task.await?;
        Ok(())
    }
}
