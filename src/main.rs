use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use webviewer::config::Config;
use webviewer::project::{DirectoryWatcher, DiskFileReader, scan_directory};
use webviewer::server::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;

    // Register the watch before scanning so no change slips between the two.
    let watcher = cfg
        .watch_debounce()
        .map(|debounce| DirectoryWatcher::watch(&cfg.root, debounce))
        .transpose()?;

    let path_map = scan_directory(&cfg.root).await?;
    tracing::info!(root = %cfg.root.display(), files = path_map.len(), "Project scanned");

    let mut server = Server::from_config(&cfg, path_map, Arc::new(DiskFileReader));
    let addr = server.start().await?;
    tracing::info!("Preview at http://{}/", addr);

    let watcher = watcher.map(|w| w.spawn(server.path_map()));

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");

    if let Some(watcher) = watcher {
        watcher.abort();
    }
    server.stop().await;

    Ok(())
}
