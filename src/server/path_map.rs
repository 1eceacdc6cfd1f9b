//! The uri → file lookup table shared by all connections.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::project::file::FileEntry;

/// Maps a request URI (exact match, query already stripped) to a file.
pub type PathMap = HashMap<String, FileEntry>;

/// Holds the current path-map snapshot.
///
/// A snapshot is never modified after publication; [`replace`](Self::replace)
/// swaps in a whole new map. Readers keep whatever snapshot they took for the
/// rest of their lookup.
#[derive(Debug, Clone, Default)]
pub struct PathMapStore {
    current: Arc<RwLock<Arc<PathMap>>>,
}

impl PathMapStore {
    pub fn new(map: PathMap) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(map))),
        }
    }

    /// Returns the current snapshot.
    pub async fn snapshot(&self) -> Arc<PathMap> {
        self.current.read().await.clone()
    }

    /// Publishes a new snapshot, returning the previous one.
    pub async fn replace(&self, map: PathMap) -> Arc<PathMap> {
        let mut current = self.current.write().await;
        std::mem::replace(&mut *current, Arc::new(map))
    }

    pub async fn len(&self) -> usize {
        self.current.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
