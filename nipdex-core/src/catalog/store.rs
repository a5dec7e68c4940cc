//! Holder of the current catalog snapshot
//!
//! Rebuilds fetch and build outside any lock and then install the finished
//! catalog by swapping an `Arc`, so readers always see either the previous
//! catalog or the new one in full. When rebuilds overlap, the one started
//! last wins and older results are dropped.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::builder::Catalog;
use super::entry::Entry;
use super::source::DocumentSource;

struct Installed {
    generation: u64,
    catalog: Arc<Catalog>,
}

/// Outcome of one rebuild
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    /// Ticket of this rebuild; later rebuilds get higher numbers
    pub generation: u64,

    /// Entries in the catalog this rebuild produced
    pub entries: usize,

    /// Whether the result became the current catalog
    pub installed: bool,

    /// Fetch failure, if the rebuild fell back to an empty catalog
    pub error: Option<String>,
}

pub struct CatalogStore {
    current: RwLock<Installed>,
    next_generation: AtomicU64,
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogStore {
    /// A store holding an empty catalog
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Installed {
                generation: 0,
                catalog: Arc::new(Catalog::default()),
            }),
            next_generation: AtomicU64::new(1),
        }
    }

    /// The current catalog
    pub async fn snapshot(&self) -> Arc<Catalog> {
        Arc::clone(&self.current.read().await.catalog)
    }

    /// Run `query` against the current catalog, returning owned entries.
    pub async fn search(&self, query: &str) -> Vec<Entry> {
        let catalog = self.snapshot().await;
        catalog.search(query).into_iter().cloned().collect()
    }

    /// Fetch the document from `source`, build a catalog, and install it.
    ///
    /// Never fails: a fetch error is logged and turns into an empty catalog,
    /// reported through `BuildReport::error`.
    pub async fn rebuild(&self, source: &dyn DocumentSource) -> BuildReport {
        let generation = self.next_generation.fetch_add(1, Ordering::SeqCst);
        debug!("Rebuild #{} from {}", generation, source.location());

        let (catalog, error) = match source.fetch_document().await {
            Ok(text) => (Catalog::build(&text), None),
            Err(e) => {
                warn!(
                    "Failed to fetch NIPs index from {}: {}",
                    source.location(),
                    e
                );
                (Catalog::default(), Some(e.to_string()))
            }
        };

        let entries = catalog.len();
        let installed = self.install(generation, catalog).await;

        if installed {
            info!("Installed catalog #{} with {} entries", generation, entries);
        } else {
            debug!("Discarded stale catalog #{}", generation);
        }

        BuildReport {
            generation,
            entries,
            installed,
            error,
        }
    }

    /// Install `catalog` unless a newer rebuild has already been installed.
    async fn install(&self, generation: u64, catalog: Catalog) -> bool {
        let mut current = self.current.write().await;
        if generation < current.generation {
            return false;
        }
        *current = Installed {
            generation,
            catalog: Arc::new(catalog),
        };
        true
    }
}
