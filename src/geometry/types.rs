//! The geometry value shared by every source.
//!
//! Whatever a dataset stores (WKB from a GeoParquet column, GeoJSON text on a
//! database record), it is converted into [`Geometry`] at the source boundary,
//! so downstream code never branches on where a shape came from. Shapes are
//! plain `geo` geometries; the wrapper only adds the GeoJSON feature layers.

use std::fmt;

use geo::{CoordsIter, LineString, Point, Polygon};
use geojson::GeoJson;
use serde::{Deserialize, Serialize};

use crate::error::GeoJsonError;

/// A bare shape, longitude on `x` and latitude on `y`.
pub type Shape = geo::Geometry<f64>;

/// Feature properties (a JSON object).
pub type Properties = serde_json::Map<String, serde_json::Value>;

/// A GeoJSON feature: an optional shape plus properties.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Feature {
    pub geometry: Option<Shape>,
    pub properties: Option<Properties>,
}

impl Feature {
    #[must_use]
    pub fn new(geometry: Shape) -> Self {
        Self {
            geometry: Some(geometry),
            properties: None,
        }
    }

    #[must_use]
    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = Some(properties);
        self
    }
}

/// A geometry in any of the GeoJSON forms the map layer understands.
///
/// Serialized exactly as GeoJSON, so a literal fallback stored on a record
/// parses straight into it.
///
/// # Examples
///
/// ```
/// use winegeo::Geometry;
///
/// let g = Geometry::parse_geojson(r#"{"type":"Point","coordinates":[2.3,48.8]}"#).unwrap();
/// assert_eq!(g, Geometry::point(2.3, 48.8));
/// assert!(Geometry::parse_geojson("not json").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "GeoJson", try_from = "GeoJson")]
pub enum Geometry {
    Shape(Shape),
    Feature(Feature),
    FeatureCollection(Vec<Feature>),
}

impl Geometry {
    /// Creates a point from `(lon, lat)`.
    #[must_use]
    pub fn point(lon: f64, lat: f64) -> Self {
        Self::Shape(Point::new(lon, lat).into())
    }

    /// Creates a single-ring polygon from `(lon, lat)` pairs. The ring is
    /// closed if needed.
    #[must_use]
    pub fn polygon(ring: &[(f64, f64)]) -> Self {
        Self::Shape(Polygon::new(LineString::from(ring.to_vec()), vec![]).into())
    }

    /// Parses GeoJSON text. Blank or malformed text yields `None`.
    ///
    /// Polygon rings are closed on the way in, so a hand-entered
    /// `[[a, b, c]]` ring is the triangle `a b c a`.
    #[must_use]
    pub fn parse_geojson(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let parsed = text
            .parse::<GeoJson>()
            .map_err(GeoJsonError::from)
            .and_then(Self::try_from);
        match parsed {
            Ok(geometry) => Some(geometry),
            Err(e) => {
                tracing::trace!(error = %e, "literal geometry is not valid GeoJSON");
                None
            }
        }
    }

    /// Returns the GeoJSON type name.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Shape(shape) => shape_type_name(shape),
            Self::Feature(_) => "Feature",
            Self::FeatureCollection(_) => "FeatureCollection",
        }
    }

    /// The shape of a bare geometry or a `Feature`. Feature collections and
    /// features without a geometry have none.
    #[must_use]
    pub fn as_shape(&self) -> Option<&Shape> {
        match self {
            Self::Shape(shape) => Some(shape),
            Self::Feature(feature) => feature.geometry.as_ref(),
            Self::FeatureCollection(_) => None,
        }
    }

    /// Every shape held, descending into feature collections.
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        let features: &[Feature] = match self {
            Self::FeatureCollection(features) => features,
            _ => &[],
        };
        self.as_shape()
            .into_iter()
            .chain(features.iter().filter_map(|f| f.geometry.as_ref()))
    }

    /// Structural validity: every coordinate finite, lines hold at least two
    /// positions and polygon rings at least four once closed.
    /// Empty parts are allowed.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.shapes().all(shape_well_formed)
    }
}

impl From<Shape> for Geometry {
    fn from(shape: Shape) -> Self {
        Self::Shape(shape)
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

fn shape_type_name(shape: &Shape) -> &'static str {
    match shape {
        Shape::Point(_) => "Point",
        Shape::Line(_) | Shape::LineString(_) => "LineString",
        Shape::Polygon(_) | Shape::Rect(_) | Shape::Triangle(_) => "Polygon",
        Shape::MultiPoint(_) => "MultiPoint",
        Shape::MultiLineString(_) => "MultiLineString",
        Shape::MultiPolygon(_) => "MultiPolygon",
        Shape::GeometryCollection(_) => "GeometryCollection",
    }
}

fn shape_well_formed(shape: &Shape) -> bool {
    fn line_ok(line: &LineString<f64>) -> bool {
        line.0.len() != 1
    }
    fn ring_ok(ring: &LineString<f64>) -> bool {
        ring.0.is_empty() || ring.0.len() >= 4
    }
    fn polygon_ok(polygon: &Polygon<f64>) -> bool {
        ring_ok(polygon.exterior()) && polygon.interiors().iter().all(ring_ok)
    }

    let finite = shape.coords_iter().all(|c| c.x.is_finite() && c.y.is_finite());
    finite
        && match shape {
            Shape::LineString(line) => line_ok(line),
            Shape::MultiLineString(lines) => lines.0.iter().all(line_ok),
            Shape::Polygon(polygon) => polygon_ok(polygon),
            Shape::MultiPolygon(polygons) => polygons.0.iter().all(polygon_ok),
            Shape::GeometryCollection(members) => members.0.iter().all(shape_well_formed),
            _ => true,
        }
}

// GeoJSON conversions. Positions are checked before handing values to the
// `geo` conversion, which indexes the first two ordinates directly.

fn position_ok(position: &[f64]) -> Result<(), GeoJsonError> {
    if position.len() < 2 {
        return Err(GeoJsonError::ShortPosition(position.len()));
    }
    Ok(())
}

fn check_positions(value: &geojson::Value) -> Result<(), GeoJsonError> {
    use geojson::Value;

    match value {
        Value::Point(p) => position_ok(p),
        Value::MultiPoint(ps) | Value::LineString(ps) => {
            ps.iter().try_for_each(|p| position_ok(p))
        }
        Value::MultiLineString(ls) | Value::Polygon(ls) => {
            ls.iter().flatten().try_for_each(|p| position_ok(p))
        }
        Value::MultiPolygon(ps) => {
            ps.iter().flatten().flatten().try_for_each(|p| position_ok(p))
        }
        Value::GeometryCollection(members) => {
            members.iter().try_for_each(|g| check_positions(&g.value))
        }
    }
}

fn shape_from_geojson(geometry: geojson::Geometry) -> Result<Shape, GeoJsonError> {
    check_positions(&geometry.value)?;
    Ok(Shape::try_from(geometry)?)
}

fn feature_from_geojson(feature: geojson::Feature) -> Result<Feature, GeoJsonError> {
    Ok(Feature {
        geometry: feature.geometry.map(shape_from_geojson).transpose()?,
        properties: feature.properties,
    })
}

fn feature_to_geojson(feature: Feature) -> geojson::Feature {
    geojson::Feature {
        bbox: None,
        geometry: feature.geometry.as_ref().map(shape_to_geojson),
        id: None,
        properties: feature.properties,
        foreign_members: None,
    }
}

fn shape_to_geojson(shape: &Shape) -> geojson::Geometry {
    geojson::Geometry::new(geojson::Value::from(shape))
}

impl TryFrom<GeoJson> for Geometry {
    type Error = GeoJsonError;

    fn try_from(value: GeoJson) -> Result<Self, Self::Error> {
        match value {
            GeoJson::Geometry(g) => shape_from_geojson(g).map(Self::Shape),
            GeoJson::Feature(f) => feature_from_geojson(f).map(Self::Feature),
            GeoJson::FeatureCollection(fc) => fc
                .features
                .into_iter()
                .map(feature_from_geojson)
                .collect::<Result<_, _>>()
                .map(Self::FeatureCollection),
        }
    }
}

impl From<Geometry> for GeoJson {
    fn from(value: Geometry) -> Self {
        match value {
            Geometry::Shape(shape) => Self::Geometry(shape_to_geojson(&shape)),
            Geometry::Feature(feature) => Self::Feature(feature_to_geojson(feature)),
            Geometry::FeatureCollection(features) => {
                Self::FeatureCollection(geojson::FeatureCollection {
                    bbox: None,
                    features: features.into_iter().map(feature_to_geojson).collect(),
                    foreign_members: None,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point() {
        let g = Geometry::parse_geojson(r#"{"type":"Point","coordinates":[2.3,48.8]}"#).unwrap();
        assert_eq!(g, Geometry::point(2.3, 48.8));
        assert_eq!(g.type_name(), "Point");
    }

    #[test]
    fn test_parse_drops_altitude() {
        let g = Geometry::parse_geojson(r#"{"type":"Point","coordinates":[2.3,48.8,120.0]}"#).unwrap();
        assert_eq!(g, Geometry::point(2.3, 48.8));
    }

    #[test]
    fn test_parse_rejects_short_position() {
        assert!(Geometry::parse_geojson(r#"{"type":"Point","coordinates":[2.3]}"#).is_none());
        let short_ring = r#"{"type":"Polygon","coordinates":[[[0,0],[1],[1,1],[0,0]]]}"#;
        assert!(Geometry::parse_geojson(short_ring).is_none());
    }

    #[test]
    fn test_parse_malformed_and_blank() {
        assert!(Geometry::parse_geojson("").is_none());
        assert!(Geometry::parse_geojson("   ").is_none());
        assert!(Geometry::parse_geojson("{\"type\":\"Point\"").is_none());
        assert!(Geometry::parse_geojson(r#"{"type":"Circle","radius":3}"#).is_none());
    }

    #[test]
    fn test_parse_closes_open_ring() {
        let g = Geometry::parse_geojson(r#"{"type":"Polygon","coordinates":[[[4,47],[5,47],[5,48]]]}"#).unwrap();
        assert_eq!(g, Geometry::polygon(&[(4.0, 47.0), (5.0, 47.0), (5.0, 48.0), (4.0, 47.0)]));
        assert!(g.is_well_formed());
    }

    #[test]
    fn test_parse_feature_with_null_geometry() {
        let g = Geometry::parse_geojson(r#"{"type":"Feature","geometry":null,"properties":{}}"#).unwrap();
        assert_eq!(g.type_name(), "Feature");
        assert!(g.as_shape().is_none());
        assert_eq!(g.shapes().count(), 0);
    }

    #[test]
    fn test_parse_feature_collection() {
        let text = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "id": 7, "properties": null,
                 "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]]}},
                {"type": "Feature", "properties": {"name": "b"},
                 "geometry": {"type": "Point", "coordinates": [3,4]}}
            ]
        }"#;
        let g = Geometry::parse_geojson(text).unwrap();
        assert_eq!(g.type_name(), "FeatureCollection");
        assert!(g.as_shape().is_none());
        assert_eq!(g.shapes().count(), 2);
    }

    #[test]
    fn test_serializes_as_geojson() {
        let json = serde_json::to_value(Geometry::point(2.3, 48.8)).unwrap();
        assert_eq!(json, serde_json::json!({"type": "Point", "coordinates": [2.3, 48.8]}));

        let mut props = Properties::new();
        props.insert("name".to_string(), "Chablis".into());
        let feature = Geometry::Feature(Feature::new(Point::new(3.8, 47.8).into()).with_properties(props));
        let json = serde_json::to_value(&feature).unwrap();
        assert_eq!(json["type"], "Feature");
        assert_eq!(json["properties"]["name"], "Chablis");
        assert_eq!(json["geometry"]["coordinates"], serde_json::json!([3.8, 47.8]));
    }

    #[test]
    fn test_deserializes_from_json_value() {
        let value = serde_json::json!({"type": "MultiPoint", "coordinates": [[1.0, 2.0], [3.0, 4.0]]});
        let g: Geometry = serde_json::from_value(value).unwrap();
        assert_eq!(g.type_name(), "MultiPoint");
    }

    #[test]
    fn test_well_formed_rejects_degenerate_ring() {
        // two distinct positions close to three, still not a ring
        let bad = Geometry::polygon(&[(0.0, 0.0), (1.0, 0.0), (0.0, 0.0)]);
        assert!(!bad.is_well_formed());
        let good = Geometry::polygon(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]);
        assert!(good.is_well_formed());
    }

    #[test]
    fn test_well_formed_rejects_nan() {
        assert!(!Geometry::point(f64::NAN, 1.0).is_well_formed());
    }
}
