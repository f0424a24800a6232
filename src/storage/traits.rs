//! Abstract dataset reader.
//!
//! The source store cache never touches a file format directly. Readers turn
//! one on-disk dataset into `(key, geometry)` rows, which lets us:
//! - read GeoParquet in production
//! - substitute an in-memory reader in tests and embedded use

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::DatasetError;
use crate::geometry::Geometry;
use crate::identifier::SourceKey;

/// Which columns a dataset read should use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    /// Acceptable key columns, in preference order. The first one present
    /// in the file wins.
    pub key_columns: Vec<String>,

    /// The geometry column.
    pub geometry_column: String,
}

impl TableSpec {
    #[must_use]
    pub fn new(key_columns: &[&str], geometry_column: &str) -> Self {
        Self {
            key_columns: key_columns.iter().map(|c| (*c).to_string()).collect(),
            geometry_column: geometry_column.to_string(),
        }
    }

    /// First key column contained in `available`.
    #[must_use]
    pub fn pick_key_column<'a>(&'a self, available: &[String]) -> Option<&'a str> {
        self.key_columns
            .iter()
            .find(|c| available.contains(c))
            .map(String::as_str)
    }

    pub(crate) fn missing_key(&self, path: &Path) -> DatasetError {
        DatasetError::MissingKeyColumn {
            path: path.to_path_buf(),
            expected: self.key_columns.clone(),
        }
    }

    pub(crate) fn missing_geometry(&self, path: &Path) -> DatasetError {
        DatasetError::MissingGeometryColumn {
            path: path.to_path_buf(),
            column: self.geometry_column.clone(),
        }
    }
}

/// Rows read from one dataset: normalized key and decoded geometry.
///
/// Rows with a null key or an undecodable geometry are dropped by the reader.
pub type DatasetRows = Vec<(SourceKey, Geometry)>;

/// Reads immutable geometry datasets.
///
/// # Contract
/// - `read` either returns every usable row of the file or an error; it
///   never returns a partial result for a file that failed midway.
/// - Reads have no side effects, so reading a file twice yields equal rows.
pub trait DatasetReader: Send + Sync + fmt::Debug {
    /// True if a dataset exists at `path`.
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    /// Files directly inside `dir`. A missing directory lists as empty.
    fn list(&self, dir: &Path) -> Vec<PathBuf> {
        let Ok(entries) = std::fs::read_dir(dir) else {
            return Vec::new();
        };
        entries
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .collect()
    }

    /// Reads every row of the dataset at `path`.
    ///
    /// # Errors
    /// Any I/O, decode or schema problem with the file.
    fn read(&self, path: &Path, spec: &TableSpec) -> Result<DatasetRows, DatasetError>;
}
