//! Bounding boxes and map centering.
//!
//! Map widgets want `(lat, lng)` pairs while GeoJSON stores `[lon, lat]`;
//! everything here is in the map order.

use geo::{BoundingRect, Coord, Rect};
use serde::{Deserialize, Serialize};

use super::types::Geometry;

/// A `(latitude, longitude)` pair. Serializes as `[lat, lng]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Latitude within [-90, 90], longitude within [-180, 180], both finite.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

impl From<[f64; 2]> for LatLng {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<LatLng> for [f64; 2] {
    fn from(p: LatLng) -> Self {
        [p.lat, p.lng]
    }
}

impl From<Coord<f64>> for LatLng {
    fn from(c: Coord<f64>) -> Self {
        Self::new(c.y, c.x)
    }
}

/// Axis-aligned bounding box, serialized as `[[min_lat, min_lng], [max_lat, max_lng]]`.
///
/// # Examples
///
/// ```
/// use winegeo::{geometry_bounds, Geometry};
///
/// let b = geometry_bounds(&Geometry::point(2.3, 48.8)).unwrap();
/// assert_eq!(b.to_array(), [[48.8, 2.3], [48.8, 2.3]]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[LatLng; 2]", into = "[LatLng; 2]")]
pub struct Bounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl Bounds {
    /// A degenerate box around one point.
    #[must_use]
    pub const fn at(point: LatLng) -> Self {
        Self {
            south_west: point,
            north_east: point,
        }
    }

    fn extend(&mut self, point: LatLng) {
        self.south_west.lat = self.south_west.lat.min(point.lat);
        self.south_west.lng = self.south_west.lng.min(point.lng);
        self.north_east.lat = self.north_east.lat.max(point.lat);
        self.north_east.lng = self.north_east.lng.max(point.lng);
    }

    /// Smallest box containing both. Commutative and associative.
    #[must_use]
    pub fn union(mut self, other: Self) -> Self {
        self.extend(other.south_west);
        self.extend(other.north_east);
        self
    }

    /// Midpoint of the box.
    #[must_use]
    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }

    /// `[[min_lat, min_lng], [max_lat, max_lng]]`, the shape `fit_bounds` style APIs take.
    #[must_use]
    pub fn to_array(&self) -> [[f64; 2]; 2] {
        [self.south_west.into(), self.north_east.into()]
    }
}

impl From<Rect<f64>> for Bounds {
    fn from(rect: Rect<f64>) -> Self {
        Self {
            south_west: rect.min().into(),
            north_east: rect.max().into(),
        }
    }
}

impl From<[LatLng; 2]> for Bounds {
    fn from([south_west, north_east]: [LatLng; 2]) -> Self {
        Self {
            south_west,
            north_east,
        }
    }
}

impl From<Bounds> for [LatLng; 2] {
    fn from(b: Bounds) -> Self {
        [b.south_west, b.north_east]
    }
}

/// Bounding box of any geometry shape, feature or feature collection.
///
/// Returns `None` for empty geometries and for malformed ones (non-finite
/// coordinates, degenerate lines or rings). A feature collection's box is
/// the union of its members; features without a geometry are skipped.
#[must_use]
pub fn geometry_bounds(geometry: &Geometry) -> Option<Bounds> {
    if !geometry.is_well_formed() {
        return None;
    }
    geometry
        .shapes()
        .filter_map(|shape| shape.bounding_rect())
        .map(Bounds::from)
        .reduce(Bounds::union)
}

/// Union of the boxes of every geometry that has one.
#[must_use]
pub fn union_bounds<'a>(geometries: impl IntoIterator<Item = &'a Geometry>) -> Option<Bounds> {
    geometries
        .into_iter()
        .filter_map(geometry_bounds)
        .reduce(Bounds::union)
}

/// Center of `bounds`, or `fallback` when there is no box.
#[must_use]
pub fn center_or(bounds: Option<&Bounds>, fallback: LatLng) -> LatLng {
    bounds.map_or(fallback, Bounds::center)
}
