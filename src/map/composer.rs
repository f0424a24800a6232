use serde_json::Value;

use crate::config::{GeoConfig, MAX_ZOOM};
use crate::entity::{Appellation, Place, Vineyard};
use crate::geometry::{
    center_or, geometry_bounds, Bounds, Feature, Geometry, LatLng, Properties, Shape,
};

use super::context::{MapContext, MapEntry, MapEntryKind};
use super::style::{Category, MapTheme, Style, APPELLATION_COLOR};

pub const PLACE_ZOOM: u8 = 15;
pub const APPELLATION_ZOOM: u8 = 10;
pub const VINEYARD_ZOOM: u8 = 14;
pub const WINE_ZOOM: u8 = 10;

/// A resolved geometry waiting to be placed on a map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapTarget {
    pub geometry: Geometry,
    pub name: String,
    pub category: Category,
    pub id: Option<i64>,
    /// Overrides the category color.
    pub color: Option<String>,
}

impl MapTarget {
    #[must_use]
    pub fn new(geometry: Geometry, name: impl Into<String>, category: Category) -> Self {
        Self {
            geometry,
            name: name.into(),
            category,
            id: None,
            color: None,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Appellation target, colored by its region.
    #[must_use]
    pub fn appellation(app: &Appellation, geometry: Geometry) -> Self {
        let target = Self::new(geometry, app.name.clone(), Category::Appellation).with_id(app.id);
        match app.region.as_ref().and_then(|r| r.color.as_deref()) {
            Some(color) if !color.trim().is_empty() => target.with_color(color),
            _ => target.with_color(APPELLATION_COLOR),
        }
    }

    #[must_use]
    pub fn vineyard(vineyard: &Vineyard, geometry: Geometry) -> Self {
        Self::new(geometry, vineyard.name.clone(), Category::Vineyard).with_id(vineyard.id)
    }
}

/// Turns resolved geometries into [`MapContext`]s.
#[derive(Debug, Clone)]
pub struct MapComposer {
    config: GeoConfig,
    theme: MapTheme,
}

impl MapComposer {
    #[must_use]
    pub fn new(config: GeoConfig) -> Self {
        Self {
            config,
            theme: MapTheme::default(),
        }
    }

    #[must_use]
    pub fn with_theme(mut self, theme: MapTheme) -> Self {
        self.theme = theme;
        self
    }

    #[must_use]
    pub const fn theme(&self) -> MapTheme {
        self.theme
    }

    /// Configured base layers followed by the theme layer.
    #[must_use]
    pub fn tile_layers(&self) -> Vec<String> {
        let mut layers = self.config.tile_layers.clone();
        layers.push(self.theme.tile_layer().to_string());
        layers
    }

    /// Composes any number of targets, in order.
    ///
    /// Points become markers, everything else a GeoJSON shape. The bounds
    /// are the union over every target; the center is their midpoint, or
    /// the configured default center when nothing has bounds.
    #[must_use]
    pub fn compose(&self, targets: impl IntoIterator<Item = MapTarget>, zoom: u8) -> MapContext {
        let mut bounds: Option<Bounds> = None;
        let mut entries = Vec::new();

        for target in targets {
            if let Some(b) = geometry_bounds(&target.geometry) {
                bounds = Some(bounds.map_or(b, |acc| acc.union(b)));
            }
            entries.push(entry(target));
        }

        MapContext {
            center: center_or(bounds.as_ref(), self.config.default_center),
            zoom: zoom.min(MAX_ZOOM),
            bounds,
            entries,
            tile_layers: self.tile_layers(),
        }
    }

    /// Marker map for a place; `None` without valid coordinates.
    #[must_use]
    pub fn for_place(&self, place: &Place) -> Option<MapContext> {
        let location = LatLng::new(place.lat?, place.lng?);
        if !location.is_valid() {
            return None;
        }

        let marker = MapEntry {
            name: place.name.clone(),
            id: Some(place.id),
            category: Category::Place,
            tooltip: place.tooltip(),
            style: Style::marker(Category::Place.default_color()),
            kind: MapEntryKind::Marker { location },
        };
        Some(MapContext {
            center: location,
            zoom: PLACE_ZOOM,
            bounds: Some(Bounds::at(location)),
            entries: vec![marker],
            tile_layers: self.tile_layers(),
        })
    }

    #[must_use]
    pub fn for_appellation(&self, app: &Appellation, geometry: Geometry) -> MapContext {
        self.compose([MapTarget::appellation(app, geometry)], APPELLATION_ZOOM)
    }

    #[must_use]
    pub fn for_vineyard(&self, vineyard: &Vineyard, geometry: Geometry) -> MapContext {
        self.compose([MapTarget::vineyard(vineyard, geometry)], VINEYARD_ZOOM)
    }

    /// Appellation and vineyard of one wine on a shared map. `None` when
    /// neither has a geometry. The caption is [`MapContext::label`].
    #[must_use]
    pub fn for_wine(
        &self,
        appellation: Option<(&Appellation, Geometry)>,
        vineyard: Option<(&Vineyard, Geometry)>,
    ) -> Option<MapContext> {
        let targets: Vec<MapTarget> = appellation
            .map(|(a, g)| MapTarget::appellation(a, g))
            .into_iter()
            .chain(vineyard.map(|(v, g)| MapTarget::vineyard(v, g)))
            .collect();
        if targets.is_empty() {
            return None;
        }
        Some(self.compose(targets, WINE_ZOOM))
    }

    /// Multi-entity overview, opened at the overview center and zoom.
    /// Bounds still cover every target so the widget can fit them.
    #[must_use]
    pub fn overview(&self, targets: impl IntoIterator<Item = MapTarget>) -> MapContext {
        let mut ctx = self.compose(targets, self.config.overview_zoom);
        if ctx.bounds.is_none() {
            ctx.center = self.config.overview_center;
        }
        ctx
    }
}

fn entry(target: MapTarget) -> MapEntry {
    let MapTarget {
        geometry,
        name,
        category,
        id,
        color,
    } = target;
    let color = color.unwrap_or_else(|| category.default_color().to_string());
    let tooltip = format!("{category}: {name}");

    let point = match geometry.as_shape() {
        Some(Shape::Point(p)) => Some(LatLng::from(p.0)),
        _ => None,
    };

    let (style, kind) = match point {
        Some(location) => (Style::marker(&color), MapEntryKind::Marker { location }),
        None => (
            Style::shape(category, &color),
            MapEntryKind::Shape {
                geojson: decorate(geometry, &name, id, category, &color),
            },
        ),
    };

    MapEntry {
        name,
        id,
        category,
        tooltip,
        style,
        kind,
    }
}

/// Wraps bare geometries into a feature and stamps the entry properties.
/// Feature collections are passed through untouched.
fn decorate(
    geometry: Geometry,
    name: &str,
    id: Option<i64>,
    category: Category,
    color: &str,
) -> Geometry {
    let mut props = Properties::new();
    props.insert("name".to_string(), Value::from(name));
    props.insert("id".to_string(), id.map_or(Value::Null, Value::from));
    props.insert("ftype".to_string(), Value::from(category.as_str()));
    props.insert("color".to_string(), Value::from(color));

    match geometry {
        Geometry::FeatureCollection(_) => geometry,
        Geometry::Feature(Feature { geometry, properties }) => {
            let mut merged = properties.unwrap_or_default();
            merged.extend(props);
            Geometry::Feature(Feature {
                geometry,
                properties: Some(merged),
            })
        }
        Geometry::Shape(shape) => Geometry::Feature(Feature::new(shape).with_properties(props)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Region;

    fn square(lon: f64, lat: f64) -> Geometry {
        Geometry::polygon(&[(lon, lat), (lon + 1.0, lat), (lon + 1.0, lat + 1.0), (lon, lat)])
    }

    fn composer() -> MapComposer {
        MapComposer::new(GeoConfig::default())
    }

    #[test]
    fn test_points_become_markers_and_polygons_shapes() {
        let ctx = composer().compose(
            [
                MapTarget::new(Geometry::point(4.0, 47.0), "Pommard", Category::Appellation),
                MapTarget::new(square(4.5, 47.5), "Rugiens", Category::Vineyard).with_id(7),
            ],
            WINE_ZOOM,
        );

        assert_eq!(ctx.entries.len(), 2);
        assert!(ctx.entries[0].is_marker());
        assert_eq!(ctx.entries[0].color(), APPELLATION_COLOR);
        assert!(!ctx.entries[1].is_marker());

        let MapEntryKind::Shape { geojson } = &ctx.entries[1].kind else {
            panic!("expected shape");
        };
        let Geometry::Feature(Feature { properties: Some(props), .. }) = geojson else {
            panic!("expected feature");
        };
        assert_eq!(props["ftype"], "Vineyard");
        assert_eq!(props["id"], 7);
        assert_eq!(props["color"], "#228b22");
    }

    #[test]
    fn test_bounds_union_over_all_targets() {
        let ctx = composer().compose(
            [
                MapTarget::new(Geometry::point(4.0, 47.0), "A", Category::Appellation),
                MapTarget::new(square(6.0, 49.0), "B", Category::Vineyard),
            ],
            WINE_ZOOM,
        );
        let bounds = ctx.bounds.unwrap();
        assert_eq!(bounds.to_array(), [[47.0, 4.0], [50.0, 7.0]]);
        assert_eq!(ctx.center, LatLng::new(48.5, 5.5));
    }

    #[test]
    fn test_unbounded_targets_use_default_center() {
        let broken = Geometry::polygon(&[(f64::NAN, 1.0), (2.0, 1.0), (2.0, 2.0), (f64::NAN, 1.0)]);
        let ctx = composer().compose([MapTarget::new(broken, "X", Category::Appellation)], 10);
        assert!(ctx.bounds.is_none());
        assert_eq!(ctx.center, LatLng::new(47.0, 4.0));
        assert_eq!(ctx.entries.len(), 1);
    }

    #[test]
    fn test_appellation_uses_region_color() {
        let app = Appellation::new(1, "Pauillac").with_region(Region::new("Bordeaux").with_color("#7b1e3a"));
        let ctx = composer().for_appellation(&app, square(-0.8, 45.2));
        assert_eq!(ctx.zoom, APPELLATION_ZOOM);
        assert_eq!(ctx.entries[0].color(), "#7b1e3a");
        assert_eq!(ctx.entries[0].style.weight, 1.0);

        let plain = Appellation::new(2, "Margaux");
        let ctx = composer().for_appellation(&plain, square(-0.7, 45.0));
        assert_eq!(ctx.entries[0].color(), APPELLATION_COLOR);
    }

    #[test]
    fn test_wine_map_label() {
        let app = Appellation::new(1, "Pommard");
        let vineyard = Vineyard::new(2, "Rugiens");
        let ctx = composer()
            .for_wine(Some((&app, square(4.8, 47.0))), Some((&vineyard, square(4.81, 47.01))))
            .unwrap();
        assert_eq!(ctx.label(), "Appellation: Pommard + Vineyard: Rugiens");

        assert!(composer().for_wine(None, None).is_none());
    }

    #[test]
    fn test_place_map() {
        let place = Place::new(1, "Le Bistrot").at(48.85, 2.35);
        let ctx = composer().for_place(&place).unwrap();
        assert_eq!(ctx.zoom, PLACE_ZOOM);
        assert_eq!(ctx.center, LatLng::new(48.85, 2.35));
        assert!(ctx.entries[0].is_marker());

        assert!(composer().for_place(&Place::new(2, "Nowhere")).is_none());
        assert!(composer().for_place(&Place::new(3, "Bad").at(120.0, 0.0)).is_none());
    }

    #[test]
    fn test_overview_defaults() {
        let ctx = composer().overview(Vec::new());
        assert_eq!(ctx.zoom, 6);
        assert_eq!(ctx.center, LatLng::new(46.0, 4.0));
        assert!(ctx.is_empty());
    }

    #[test]
    fn test_tile_layers_follow_theme() {
        let layers = composer().with_theme(MapTheme::Dark).tile_layers();
        assert_eq!(
            layers,
            vec!["OpenStreetMap.France", "OpenTopoMap", "CartoDB dark_matter"]
        );
    }

    #[test]
    fn test_feature_collection_passes_through() {
        let shape = square(0.0, 0.0).as_shape().cloned().unwrap();
        let fc = Geometry::FeatureCollection(vec![Feature::new(shape).with_properties(Properties::new())]);
        let ctx = composer().compose([MapTarget::new(fc.clone(), "FC", Category::Appellation)], 10);
        assert_eq!(ctx.entries[0].kind, MapEntryKind::Shape { geojson: fc });
    }
}
