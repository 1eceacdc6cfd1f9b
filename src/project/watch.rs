//! Watches the project directory and republishes the path map on change.

use anyhow::Context;
use notify::event::ModifyKind;
use notify::{Config as NotifyConfig, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::project::scan::scan_directory;
use crate::server::path_map::PathMapStore;

const EVENT_QUEUE: usize = 64;

/// A recursive filesystem watch on the project root.
///
/// Events start queueing as soon as [`DirectoryWatcher::watch`] returns, so
/// a change made while the initial scan runs still triggers a rescan once
/// the watcher is spawned.
pub struct DirectoryWatcher {
    root: PathBuf,
    debounce: Duration,
    // Dropping the notify watcher ends the event stream.
    _watcher: RecommendedWatcher,
    events: mpsc::Receiver<notify::Result<Event>>,
}

impl DirectoryWatcher {
    pub fn watch(root: impl Into<PathBuf>, debounce: Duration) -> anyhow::Result<Self> {
        let root = root.into();
        let (event_tx, events) = mpsc::channel(EVENT_QUEUE);

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                let _ = event_tx.blocking_send(res);
            },
            NotifyConfig::default(),
        )
        .with_context(|| format!("Failed to create watcher for {}", root.display()))?;

        watcher
            .watch(&root, RecursiveMode::Recursive)
            .with_context(|| format!("Failed to watch {}", root.display()))?;

        Ok(Self {
            root,
            debounce,
            _watcher: watcher,
            events,
        })
    }

    /// Scans the root and swaps the result into `path_map`. On error the
    /// previous snapshot stays in place.
    pub async fn rescan(&self, path_map: &PathMapStore) -> anyhow::Result<usize> {
        let map = scan_directory(&self.root).await?;
        let count = map.len();
        path_map.replace(map).await;
        Ok(count)
    }

    /// Rescans after every burst of relevant events until the watch ends.
    pub async fn run(mut self, path_map: PathMapStore) {
        while let Some(event) = self.events.recv().await {
            match event {
                Ok(event) if is_content_change(&event.kind) => {}
                Ok(_) => continue,
                Err(e) => {
                    warn!(root = %self.root.display(), error = %e, "Watch error");
                    continue;
                }
            }

            // Collapse the rest of the burst into one rescan.
            tokio::time::sleep(self.debounce).await;
            let mut skipped = 0usize;
            while self.events.try_recv().is_ok() {
                skipped += 1;
            }
            debug!(skipped, "Coalesced watch events");

            match self.rescan(&path_map).await {
                Ok(files) => info!(root = %self.root.display(), files, "Project changed, path map refreshed"),
                Err(e) => warn!(root = %self.root.display(), error = %e, "Project rescan failed"),
            }
        }

        debug!(root = %self.root.display(), "Watch ended");
    }

    pub fn spawn(self, path_map: PathMapStore) -> JoinHandle<()> {
        tokio::spawn(self.run(path_map))
    }
}

fn is_content_change(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Any
            | EventKind::Create(_)
            | EventKind::Remove(_)
            | EventKind::Modify(ModifyKind::Any)
            | EventKind::Modify(ModifyKind::Name(_))
            | EventKind::Modify(ModifyKind::Data(_))
    )
}
