use anyhow::Context;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::http::connection::{Connection, DEFAULT_READ_BUFFER_SIZE};
use crate::net::{ServerSocket, SocketProvider, TcpProvider};
use crate::project::file::FileReader;
use crate::server::path_map::{PathMap, PathMapStore};

/// The only address the server ever binds to.
pub const HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// Pending connections allowed on the listening socket.
pub const DEFAULT_BACKLOG: u32 = 50;

/// Pause after a failed accept before trying again.
const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Preview server: one loopback listener plus the path map it serves.
pub struct Server<P: SocketProvider = TcpProvider> {
    provider: Arc<P>,
    port: u16,
    backlog: u32,
    read_buffer_size: usize,
    path_map: PathMapStore,
    reader: Arc<dyn FileReader>,
    generation: Arc<AtomicU64>,
    listening: Option<ListenerHandle>,
}

struct ListenerHandle {
    local_addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl Server<TcpProvider> {
    pub fn new(port: u16, path_map: PathMap, reader: Arc<dyn FileReader>) -> Self {
        Self::with_provider(TcpProvider, port, path_map, reader)
    }

    pub fn from_config(cfg: &Config, path_map: PathMap, reader: Arc<dyn FileReader>) -> Self {
        Self::new(cfg.port, path_map, reader)
            .backlog(cfg.backlog)
            .read_buffer_size(cfg.read_buffer_size)
    }
}

impl<P: SocketProvider> Server<P> {
    pub fn with_provider(
        provider: P,
        port: u16,
        path_map: PathMap,
        reader: Arc<dyn FileReader>,
    ) -> Self {
        Self {
            provider: Arc::new(provider),
            port,
            backlog: DEFAULT_BACKLOG,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            path_map: PathMapStore::new(path_map),
            reader,
            generation: Arc::new(AtomicU64::new(0)),
            listening: None,
        }
    }

    pub fn backlog(mut self, backlog: u32) -> Self {
        self.backlog = backlog;
        self
    }

    pub fn read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size;
        self
    }

    /// Shared handle on the path map, for collaborators that push new
    /// snapshots.
    pub fn path_map(&self) -> PathMapStore {
        self.path_map.clone()
    }

    pub fn is_listening(&self) -> bool {
        self.listening.is_some()
    }

    /// Address the listener is bound to, if it is running.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listening.as_ref().map(|l| l.local_addr)
    }

    /// Binds `127.0.0.1:<port>` and starts accepting connections.
    ///
    /// Bind and listen failures are returned to the caller; there is no
    /// retry.
    pub async fn start(&mut self) -> anyhow::Result<SocketAddr> {
        if let Some(listening) = &self.listening {
            anyhow::bail!("Server already listening on {}", listening.local_addr);
        }

        let addr = SocketAddr::new(HOST, self.port);
        let listener = self
            .provider
            .listen(addr, self.backlog)
            .await
            .with_context(|| format!("Failed to listen on {}", addr))?;
        let local_addr = listener.local_addr().context("Failed to read bound address")?;

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let (shutdown, shutdown_rx) = oneshot::channel();

        let task = tokio::spawn(accept_loop(
            listener,
            generation,
            self.generation.clone(),
            shutdown_rx,
            self.path_map.clone(),
            self.reader.clone(),
            self.read_buffer_size,
        ));

        info!("Listening on {}", local_addr);

        self.listening = Some(ListenerHandle {
            local_addr,
            shutdown,
            task,
        });
        Ok(local_addr)
    }

    /// Closes the listening socket. Connections already accepted keep
    /// running until they close on their own.
    ///
    /// Does nothing if the server is not listening.
    pub async fn stop(&mut self) {
        let Some(listening) = self.listening.take() else {
            return;
        };

        info!("Stopping listener on {}", listening.local_addr);

        // Invalidate the generation first so an accept racing the shutdown
        // is dropped.
        self.generation.fetch_add(1, Ordering::SeqCst);
        let _ = listening.shutdown.send(());

        if let Err(e) = listening.task.await {
            warn!(error = %e, "Accept task ended abnormally");
        }
    }

    /// Swaps in a new path map. The listener keeps running; lookups already
    /// in progress finish against the snapshot they took.
    pub async fn refresh(&self, path_map: PathMap) {
        let files = path_map.len();
        self.path_map.replace(path_map).await;
        info!(files, "Path map refreshed");
    }

    /// Stops the listener, swaps the path map and listens again on the
    /// configured port.
    pub async fn restart(&mut self, path_map: PathMap) -> anyhow::Result<SocketAddr> {
        self.stop().await;
        self.refresh(path_map).await;
        self.start().await
    }
}

async fn accept_loop<L: ServerSocket>(
    mut listener: L,
    generation: u64,
    current: Arc<AtomicU64>,
    mut shutdown: oneshot::Receiver<()>,
    path_map: PathMapStore,
    reader: Arc<dyn FileReader>,
    read_buffer_size: usize,
) {
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                break;
            }

            accepted = listener.accept() => {
                let (socket, peer) = match accepted {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        warn!(error = %e, "Accept failed");
                        tokio::time::sleep(ACCEPT_RETRY_DELAY).await;
                        continue;
                    }
                };

                if current.load(Ordering::SeqCst) != generation {
                    debug!(peer = %peer, "Ignoring accept from a stale listener");
                    continue;
                }

                info!("Accepted connection from {}", peer);

                let path_map = path_map.clone();
                let reader = reader.clone();
                tokio::spawn(async move {
                    let mut conn = Connection::new(socket, peer, path_map, reader)
                        .with_read_buffer_size(read_buffer_size);
                    if let Err(e) = conn.run().await {
                        error!("Connection error from {}: {}", peer, e);
                    }
                });
            }
        }
    }

    debug!(generation, "Listener closed");
}
