//! Lazily built, process-wide source stores.
//!
//! Each [`Partition`] is loaded at most once per cache lifetime. Concurrent
//! first requests for the same partition block on a single build; requests
//! for other partitions proceed independently. A dataset that fails to read
//! is logged and contributes nothing, so a corrupt file can only ever make
//! its own partition come up short.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::GeoConfig;
use crate::geometry::Geometry;
use crate::identifier::{probe, RawIdentifier, SourceKey};
use crate::storage::layout::{DatasetLayout, Partition};
use crate::storage::traits::DatasetReader;

/// An immutable key-to-geometry map for one partition.
#[derive(Debug, Clone)]
pub struct SourceStore {
    partition: Partition,
    entries: HashMap<SourceKey, Geometry>,
    files: Vec<PathBuf>,
    built_at: DateTime<Utc>,
}

impl SourceStore {
    /// An empty store, as produced for a partition with no readable files.
    #[must_use]
    pub fn empty(partition: Partition) -> Self {
        Self {
            partition,
            entries: HashMap::new(),
            files: Vec::new(),
            built_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    /// Exact-key lookup.
    #[must_use]
    pub fn get(&self, key: &SourceKey) -> Option<&Geometry> {
        self.entries.get(key)
    }

    /// Lookup trying every candidate representation of `id`.
    #[must_use]
    pub fn lookup(&self, id: &RawIdentifier) -> Option<&Geometry> {
        probe(id, |key| self.entries.get(key))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Files that contributed rows, in merge order.
    #[must_use]
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    #[must_use]
    pub const fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    /// Content hash over keys and geometries, independent of insertion order.
    ///
    /// Two builds from unchanged files produce the same fingerprint.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let mut keys: Vec<&SourceKey> = self.entries.keys().collect();
        keys.sort();

        let mut hasher = blake3::Hasher::new();
        for key in keys {
            match key {
                SourceKey::Int(v) => {
                    hasher.update(b"i");
                    hasher.update(&v.to_le_bytes());
                }
                SourceKey::Text(v) => {
                    hasher.update(b"s");
                    hasher.update(&(v.len() as u64).to_le_bytes());
                    hasher.update(v.as_bytes());
                }
            }
            if let Some(Ok(bytes)) = self.entries.get(key).map(serde_json::to_vec) {
                hasher.update(&(bytes.len() as u64).to_le_bytes());
                hasher.update(&bytes);
            }
        }
        hasher.finalize().to_hex().to_string()
    }
}

/// Snapshot of cache occupancy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Partitions currently built.
    pub partitions: usize,
    /// Geometries held across all built partitions.
    pub entries: usize,
    /// Builds performed since the cache was created.
    pub builds: u64,
    pub oldest_built_at: Option<DateTime<Utc>>,
}

type Slot = Arc<OnceLock<Arc<SourceStore>>>;

/// Process-wide cache of [`SourceStore`]s keyed by [`Partition`].
#[derive(Debug)]
pub struct SourceStoreCache {
    layout: DatasetLayout,
    reader: Arc<dyn DatasetReader>,
    slots: RwLock<HashMap<Partition, Slot>>,
    builds: AtomicU64,
}

impl SourceStoreCache {
    /// Cache reading the on-disk datasets under `config.data_dir`.
    ///
    /// Without the `parquet` feature no file format is available and every
    /// partition builds empty; use [`SourceStoreCache::with_reader`].
    #[must_use]
    pub fn new(config: &GeoConfig) -> Self {
        #[cfg(feature = "parquet")]
        let reader: Arc<dyn DatasetReader> = Arc::new(crate::storage::ParquetDatasetReader::new());
        #[cfg(not(feature = "parquet"))]
        let reader: Arc<dyn DatasetReader> = Arc::new(crate::storage::InMemoryDatasetReader::new());

        Self::with_reader(config, reader)
    }

    #[must_use]
    pub fn with_reader(config: &GeoConfig, reader: Arc<dyn DatasetReader>) -> Self {
        Self {
            layout: DatasetLayout::new(config.clone()),
            reader,
            slots: RwLock::new(HashMap::new()),
            builds: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn layout(&self) -> &DatasetLayout {
        &self.layout
    }

    /// The store for `partition`, building it on first use.
    pub fn get(&self, partition: &Partition) -> Arc<SourceStore> {
        let slot = self.slot(partition);
        let store = slot.get_or_init(|| Arc::new(self.build(partition)));
        tracing::trace!(%partition, entries = store.len(), "source store hit");
        Arc::clone(store)
    }

    #[must_use]
    pub fn cadastre(&self) -> Arc<SourceStore> {
        self.get(&Partition::Cadastre)
    }

    #[must_use]
    pub fn ava(&self) -> Arc<SourceStore> {
        self.get(&Partition::Ava)
    }

    #[must_use]
    pub fn country(&self, iso: &str) -> Arc<SourceStore> {
        self.get(&Partition::country(iso))
    }

    #[must_use]
    pub fn vineyards(&self, region: &str, appellation: Option<&str>) -> Arc<SourceStore> {
        self.get(&Partition::vineyards(self.layout.config(), region, appellation))
    }

    /// True if `partition` has been built and not cleared since.
    #[must_use]
    pub fn is_cached(&self, partition: &Partition) -> bool {
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(partition)
            .is_some_and(|slot| slot.get().is_some())
    }

    /// Drops every built store. The next request for any partition rebuilds
    /// from disk. Stores already handed out stay valid.
    pub fn clear(&self) {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        let evicted = slots.values().filter(|s| s.get().is_some()).count();
        slots.clear();
        tracing::info!(evicted, "source store cache cleared");
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        let built: Vec<&Arc<SourceStore>> = slots.values().filter_map(|s| s.get()).collect();
        CacheStats {
            partitions: built.len(),
            entries: built.iter().map(|s| s.len()).sum(),
            builds: self.builds.load(Ordering::Relaxed),
            oldest_built_at: built.iter().map(|s| s.built_at).min(),
        }
    }

    fn slot(&self, partition: &Partition) -> Slot {
        if let Some(slot) = self
            .slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(partition)
        {
            return Arc::clone(slot);
        }

        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(partition.clone()).or_default())
    }

    fn build(&self, partition: &Partition) -> SourceStore {
        self.builds.fetch_add(1, Ordering::Relaxed);

        let files = self.layout.files(partition, self.reader.as_ref());
        if files.is_empty() {
            tracing::debug!(%partition, "no dataset files, empty source store");
            return SourceStore::empty(partition.clone());
        }

        let spec = self.layout.spec(partition);
        let mut entries = HashMap::new();
        let mut contributed = Vec::with_capacity(files.len());

        for path in files {
            let rows = match self.reader.read(&path, &spec) {
                Ok(rows) => rows,
                Err(e) => {
                    tracing::warn!(
                        %partition,
                        path = %path.display(),
                        error = %e,
                        "skipping unreadable dataset"
                    );
                    continue;
                }
            };

            for (key, geometry) in rows {
                if let Some(key) = self.layout.store_key(partition, key) {
                    entries.insert(key, geometry);
                }
            }
            contributed.push(path);
        }

        tracing::debug!(
            %partition,
            files = contributed.len(),
            entries = entries.len(),
            "source store built"
        );

        SourceStore {
            partition: partition.clone(),
            entries,
            files: contributed,
            built_at: Utc::now(),
        }
    }
}
