//! # winegeo - Geometry resolution for a wine library
//!
//! winegeo picks the one geometry to draw for an appellation or a vineyard by
//! reconciling several independently sourced geometry datasets, then frames
//! the result for an interactive map.
//!
//! ## Core Concepts
//!
//! - **Source store**: an immutable key-to-geometry map built lazily from one
//!   on-disk dataset partition (cadastre, country boundaries, AVA, vineyards)
//! - **Resolver**: an ordered, short-circuiting lookup across sources for one
//!   entity kind; "nothing found" is `None`, never an error
//! - **Identifier normalization**: every lookup probes the integer and string
//!   forms of an id, because record and dataset key types do not always agree
//! - **Map context**: center, zoom hint, bounds and styled entries handed to a
//!   map widget
//!
//! ## Usage
//!
//! ```rust,no_run
//! use winegeo::{Appellation, GeoConfig, Region, WineAtlas};
//!
//! let atlas = WineAtlas::new(GeoConfig::with_data_dir("/srv/winelib/data"))?;
//!
//! let app = Appellation::new(12, "Meursault")
//!     .with_region(Region::new("Bourgogne").with_country("France"))
//!     .with_inao_id(1234)
//!     .with_pdo_id("PDO-FR-A0123");
//!
//! if let Some(map) = atlas.appellation_map(&app) {
//!     println!("center {:?}, zoom {}", map.center, map.zoom);
//! }
//! # Ok::<(), winegeo::GeoError>(())
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod entity;
pub mod error;
pub mod geometry;
pub mod identifier;

pub mod atlas;
pub mod map;
pub mod resolver;
pub mod storage;

// Re-export primary types at crate root for convenience
pub use atlas::WineAtlas;
pub use config::GeoConfig;
pub use entity::{Appellation, GeoEntity, Place, Region, Vineyard};
pub use error::{
    ConfigError, DatasetError, GeoError, GeoJsonError, GeoResult, ValidationError, WkbError,
};
pub use geometry::{
    center_or, geometry_bounds, union_bounds, Bounds, Feature, Geometry, LatLng, Shape,
};
pub use identifier::{PdoId, RawIdentifier, SourceKey};
pub use map::{Category, MapComposer, MapContext, MapEntry, MapTarget, MapTheme};
pub use resolver::{AppellationResolver, GeometrySource, Resolution, VineyardResolver};
pub use storage::{CacheStats, DatasetReader, SourceStore, SourceStoreCache};
