//! Geometry values, WKB cells and bounds math.

mod bounds;
mod types;
pub mod wkb;

pub use bounds::{center_or, geometry_bounds, union_bounds, Bounds, LatLng};
pub use types::{Feature, Geometry, Properties, Shape};
