//! Frame registry implementation
//!
//! Holds the current [`Catalog`] and replaces it from a [`FrameSource`] on
//! refresh.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;
use tokio::sync::Mutex;

use super::builtin;
use super::error::RegistryError;
use super::frame::{Catalog, Sequence};
use super::source::FrameSource;

/// Result of a successful refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshOutcome {
    /// Number of sequences in the new catalog
    pub sequences: usize,
    /// Registry generation after the swap
    pub generation: u64,
}

/// Registry of named frame sequences
///
/// Readers load the current catalog without locking. A refresh builds a
/// complete catalog off to the side and publishes it with a single atomic
/// store, so a reader sees either the old or the new catalog, never a mix.
/// Refreshes are serialized against each other.
pub struct FrameRegistry {
    /// Current snapshot
    catalog: ArcSwap<Catalog>,

    /// Where refresh loads from
    source: Arc<dyn FrameSource>,

    /// Single-writer guard for refresh
    refresh_lock: Mutex<()>,

    /// Number of successful swaps
    generation: AtomicU64,
}

impl FrameRegistry {
    /// Create a registry serving the built-in animations until the first refresh
    pub fn new(source: Arc<dyn FrameSource>) -> Self {
        Self::with_catalog(builtin::catalog(), source)
    }

    /// Create a registry with an explicit initial catalog
    pub fn with_catalog(catalog: Catalog, source: Arc<dyn FrameSource>) -> Self {
        Self {
            catalog: ArcSwap::from_pointee(catalog),
            source,
            refresh_lock: Mutex::new(()),
            generation: AtomicU64::new(0),
        }
    }

    /// Create a registry and load it from `source` once
    ///
    /// If the initial load fails the built-in animations stay in place.
    pub async fn load(source: Arc<dyn FrameSource>) -> Self {
        let registry = Self::new(source);

        if let Err(e) = registry.refresh().await {
            tracing::warn!(
                error = %e,
                sequences = registry.len(),
                "Initial frame load failed, serving builtin frames"
            );
        }

        registry
    }

    /// Look up a sequence by name
    pub fn lookup(&self, name: &str) -> Option<Arc<Sequence>> {
        self.catalog.load().get(name)
    }

    /// Names of all sequences, sorted
    pub fn names(&self) -> Vec<String> {
        self.catalog.load().names()
    }

    /// Current catalog snapshot
    pub fn snapshot(&self) -> Arc<Catalog> {
        self.catalog.load_full()
    }

    /// Number of sequences
    pub fn len(&self) -> usize {
        self.catalog.load().len()
    }

    /// Whether the registry has no sequences
    pub fn is_empty(&self) -> bool {
        self.catalog.load().is_empty()
    }

    /// Number of successful refreshes so far
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// The configured frame source
    pub fn source(&self) -> &Arc<dyn FrameSource> {
        &self.source
    }

    /// Reload the catalog from the frame source
    ///
    /// On failure the current catalog is kept and the error is returned.
    pub async fn refresh(&self) -> Result<RefreshOutcome, RegistryError> {
        let _guard = self.refresh_lock.lock().await;

        let catalog = match self.source.load().await {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::warn!(
                    source = %self.source.describe(),
                    error = %e,
                    "Frame refresh failed, keeping previous frames"
                );
                return Err(e);
            }
        };

        let sequences = catalog.len();
        self.catalog.store(Arc::new(catalog));
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;

        tracing::info!(
            source = %self.source.describe(),
            sequences = sequences,
            generation = generation,
            "Frames refreshed"
        );

        Ok(RefreshOutcome {
            sequences,
            generation,
        })
    }
}

impl std::fmt::Debug for FrameRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameRegistry")
            .field("source", &self.source.describe())
            .field("sequences", &self.len())
            .field("generation", &self.generation())
            .finish()
    }
}
