//! In-memory dataset reader.
//!
//! Holds datasets as already-decoded rows keyed by path. It is intended for
//! tests, embedded usage without the `parquet` feature, and as a reference
//! implementation of [`DatasetReader`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};

use crate::error::DatasetError;
use crate::geometry::Geometry;
use crate::identifier::SourceKey;
use crate::storage::traits::{DatasetReader, DatasetRows, TableSpec};

fn lock_err(path: &Path, context: &'static str) -> DatasetError {
    DatasetError::Decode {
        path: path.to_path_buf(),
        message: format!("poisoned lock: {context}"),
    }
}

#[derive(Debug, Clone)]
enum MemoryTable {
    Rows {
        key_column: String,
        geometry_column: String,
        rows: DatasetRows,
    },
    Corrupt {
        message: String,
    },
}

/// Thread-safe reader over datasets registered in memory.
///
/// ```
/// use winegeo::storage::{DatasetReader, InMemoryDatasetReader, TableSpec};
/// use winegeo::{Geometry, SourceKey};
///
/// let reader = InMemoryDatasetReader::new();
/// reader.insert(
///     "geo/france.parquet",
///     "id_app",
///     vec![(SourceKey::Int(1), Geometry::point(4.8, 47.0))],
/// );
///
/// let rows = reader
///     .read("geo/france.parquet".as_ref(), &TableSpec::new(&["id_app"], "geometry"))
///     .unwrap();
/// assert_eq!(rows.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryDatasetReader {
    tables: RwLock<HashMap<PathBuf, MemoryTable>>,
    reads: AtomicUsize,
}

impl InMemoryDatasetReader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a dataset keyed by `key_column` with a `geometry` column.
    pub fn insert(
        &self,
        path: impl Into<PathBuf>,
        key_column: &str,
        rows: impl IntoIterator<Item = (SourceKey, Geometry)>,
    ) {
        self.put(
            path.into(),
            MemoryTable::Rows {
                key_column: key_column.to_string(),
                geometry_column: "geometry".to_string(),
                rows: rows.into_iter().collect(),
            },
        );
    }

    /// Registers a dataset with no rows.
    pub fn insert_empty(&self, path: impl Into<PathBuf>, key_column: &str) {
        self.insert(path, key_column, Vec::new());
    }

    /// Registers a dataset that fails every read with `message`.
    pub fn insert_corrupt(&self, path: impl Into<PathBuf>, message: impl Into<String>) {
        self.put(
            path.into(),
            MemoryTable::Corrupt {
                message: message.into(),
            },
        );
    }

    /// Removes a dataset. Returns whether it was registered.
    pub fn remove(&self, path: &Path) -> bool {
        self.tables
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(path)
            .is_some()
    }

    /// Number of `read` calls served so far, successful or not.
    #[must_use]
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }

    fn put(&self, path: PathBuf, table: MemoryTable) {
        self.tables
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path, table);
    }
}

impl DatasetReader for InMemoryDatasetReader {
    fn exists(&self, path: &Path) -> bool {
        self.tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(path)
    }

    fn list(&self, dir: &Path) -> Vec<PathBuf> {
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        let mut out: Vec<PathBuf> = tables
            .keys()
            .filter(|p| p.parent() == Some(dir))
            .cloned()
            .collect();
        out.sort();
        out
    }

    fn read(&self, path: &Path, spec: &TableSpec) -> Result<DatasetRows, DatasetError> {
        self.reads.fetch_add(1, Ordering::Relaxed);

        let tables = self.tables.read().map_err(|_| lock_err(path, "tables"))?;
        let Some(table) = tables.get(path) else {
            return Err(DatasetError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        };

        match table {
            MemoryTable::Corrupt { message } => Err(DatasetError::Decode {
                path: path.to_path_buf(),
                message: message.clone(),
            }),
            MemoryTable::Rows {
                key_column,
                geometry_column,
                rows,
            } => {
                if spec.pick_key_column(std::slice::from_ref(key_column)).is_none() {
                    return Err(spec.missing_key(path));
                }
                if *geometry_column != spec.geometry_column {
                    return Err(spec.missing_geometry(path));
                }
                Ok(rows.clone())
            }
        }
    }
}
