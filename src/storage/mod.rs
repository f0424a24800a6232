//! Dataset storage.
//!
//! - [`DatasetReader`]: reads one on-disk dataset into keyed geometries
//! - [`DatasetLayout`]: maps a [`Partition`] to files and key columns
//! - [`SourceStoreCache`]: builds each partition once and shares it

mod cache;
mod layout;
mod memory;
#[cfg(feature = "parquet")]
mod geoparquet;
mod traits;

pub use cache::{CacheStats, SourceStore, SourceStoreCache};
pub use layout::{region_slug, DatasetLayout, Partition};
pub use memory::InMemoryDatasetReader;
#[cfg(feature = "parquet")]
pub use geoparquet::ParquetDatasetReader;
pub use traits::{DatasetReader, DatasetRows, TableSpec};
