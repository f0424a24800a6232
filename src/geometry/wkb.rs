//! WKB geometry cells.
//!
//! GeoParquet stores geometries as ISO Well-Known Binary; PostGIS exports
//! use EWKB (SRID and dimension flags in the type word). Both decode to a
//! 2D shape, extra ordinates dropped. Encoding writes 2D ISO WKB.

use geozero::wkb::{Ewkb, Wkb};
use geozero::{CoordDimensions, ToGeo, ToWkb};

use crate::error::WkbError;

use super::types::{Geometry, Shape};

/// Decodes one ISO WKB or EWKB geometry.
///
/// # Errors
/// Returns `WkbError` when the payload is neither.
pub fn decode(bytes: &[u8]) -> Result<Geometry, WkbError> {
    let shape = match Wkb(bytes.to_vec()).to_geo() {
        Ok(shape) => shape,
        Err(iso) => Ewkb(bytes.to_vec()).to_geo().map_err(|_| iso)?,
    };
    Ok(Geometry::Shape(shape))
}

/// Encodes a geometry as 2D WKB.
///
/// WKB has no feature concept: a `Feature` encodes as its shape (an empty
/// collection when it has none) and a `FeatureCollection` as a
/// `GeometryCollection` of its members' shapes.
///
/// # Errors
/// Returns `WkbError` if the writer rejects the shape.
pub fn encode(geometry: &Geometry) -> Result<Vec<u8>, WkbError> {
    let shape = match geometry {
        Geometry::Shape(shape) => shape.clone(),
        Geometry::Feature(_) | Geometry::FeatureCollection(_) => {
            Shape::GeometryCollection(geometry.shapes().cloned().collect())
        }
    };
    Ok(shape.to_wkb(CoordDimensions::xy())?)
}
