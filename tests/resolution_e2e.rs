//! Resolution and framing properties through the public API, over an
//! in-memory dataset reader.

use std::sync::Arc;

use winegeo::storage::InMemoryDatasetReader;
use winegeo::{
    geometry_bounds, union_bounds, Appellation, Feature, GeoConfig, GeoEntity, Geometry,
    GeometrySource, LatLng, MapTheme, Region, SourceKey, Vineyard, WineAtlas,
};

const ROOT: &str = "/srv/data";

fn square(lon: f64, lat: f64) -> Geometry {
    Geometry::polygon(&[(lon, lat), (lon + 1.0, lat), (lon + 1.0, lat + 1.0), (lon, lat + 1.0), (lon, lat)])
}

fn setup() -> (Arc<InMemoryDatasetReader>, WineAtlas) {
    let reader = Arc::new(InMemoryDatasetReader::new());
    let atlas = WineAtlas::with_reader(GeoConfig::with_data_dir(ROOT), reader.clone()).unwrap();
    (reader, atlas)
}

fn path(relative: &str) -> String {
    format!("{ROOT}/geo/{relative}")
}

#[test]
fn test_resolution_is_idempotent() {
    let (reader, atlas) = setup();
    reader.insert(path("italy_pdo.parquet"), "pdo_id", vec![(SourceKey::text("PDO-IT-A1"), square(8.0, 44.0))]);

    let entity: GeoEntity = Appellation::new(1, "Barolo").with_pdo_id("PDO-IT-A1").into();
    let first = atlas.resolve_with_source(&entity);
    let second = atlas.resolve_with_source(&entity);
    assert!(first.is_some());
    assert_eq!(first, second);
    assert_eq!(reader.read_count(), 1);
}

#[test]
fn test_ava_consulted_first_even_with_inao_id() {
    let (reader, atlas) = setup();
    reader.insert(
        path("us_avas_combined.parquet"),
        "ava_id",
        vec![(SourceKey::text("temecula_valley"), square(-117.0, 33.0))],
    );
    reader.insert(path("france.parquet"), "id_app", vec![(SourceKey::Int(5), square(4.0, 47.0))]);

    let app = Appellation::new(1, "Temecula Valley")
        .with_region(Region::new("South Coast").with_country("United States"))
        .with_inao_id(5)
        .with_pdo_id("US-AVA-temecula_valley");
    let hit = atlas.resolve_with_source(&app.into()).unwrap();
    assert_eq!(hit.source, GeometrySource::Ava);
    assert_eq!(hit.geometry, square(-117.0, 33.0));
}

#[test]
fn test_literal_point_when_no_source_matches() {
    let (_reader, atlas) = setup();
    let app = Appellation::new(1, "Côtes du Jura")
        .with_pdo_id("PDO-XX")
        .with_geojson(r#"{"type": "Point", "coordinates": [5.6, 46.7]}"#);
    assert_eq!(atlas.resolve_appellation(&app), Some(Geometry::point(5.6, 46.7)));
}

#[test]
fn test_all_sources_absent_is_none() {
    let (_reader, atlas) = setup();
    let app = Appellation::new(1, "Ghost")
        .with_region(Region::new("Bourgogne").with_country("France"))
        .with_inao_id(404)
        .with_pdo_id("PDO-DE-B404");
    assert!(atlas.resolve_appellation(&app).is_none());
    assert!(atlas.appellation_map(&app).is_none());
    assert!(atlas.bounds(&app.into()).is_none());
}

#[test]
fn test_single_segment_pdo_falls_through_to_literal() {
    let (reader, atlas) = setup();
    reader.insert(path("france_pdo.parquet"), "pdo_id", vec![(SourceKey::text("FR"), square(0.0, 0.0))]);

    let app = Appellation::new(1, "Odd").with_pdo_id("FR").with_geojson(r#"{"type":"Point","coordinates":[1,2]}"#);
    let hit = atlas.resolve_with_source(&app.into()).unwrap();
    assert_eq!(hit.source, GeometrySource::Literal);
}

#[test]
fn test_int_and_string_ids_hit_string_keyed_store() {
    let (reader, atlas) = setup();
    reader.insert(
        path("vineyards/loire_saumur.parquet"),
        "id",
        vec![(SourceKey::text("42"), Geometry::point(-0.1, 47.2))],
    );

    for v in [Vineyard::new(1, "Clos").with_vineyard_id(42), Vineyard::new(2, "Clos").with_vineyard_id("42")] {
        assert_eq!(atlas.resolve_vineyard(&v, Some("Loire"), None), Some(Geometry::point(-0.1, 47.2)));
    }
}

#[test]
fn test_corrupt_region_does_not_break_other_region() {
    let (reader, atlas) = setup();
    reader.insert_corrupt(path("vineyards/x_a.parquet"), "invalid footer");
    reader.insert(path("vineyards/y_a.parquet"), "id", vec![(SourceKey::Int(1), Geometry::point(1.0, 1.0))]);

    let x = Vineyard::new(1, "X vineyard").with_region(Region::new("X")).with_vineyard_id(1);
    let y = Vineyard::new(2, "Y vineyard").with_region(Region::new("Y")).with_vineyard_id(1);
    assert!(atlas.resolve(&x.into()).is_none());
    assert!(atlas.resolve(&y.into()).is_some());
}

#[test]
fn test_point_bounds() {
    let bounds = geometry_bounds(&Geometry::point(2.3, 48.8)).unwrap();
    assert_eq!(bounds.to_array(), [[48.8, 2.3], [48.8, 2.3]]);
}

#[test]
fn test_feature_collection_bounds_are_order_independent() {
    let a = square(0.0, 0.0);
    let b = square(10.0, 20.0);
    let feature = |g: &Geometry| Feature::new(g.as_shape().cloned().unwrap());
    let collection = |first: &Geometry, second: &Geometry| {
        Geometry::FeatureCollection(vec![feature(first), feature(second)])
    };

    let expected = union_bounds([&a, &b]).unwrap();
    assert_eq!(geometry_bounds(&collection(&a, &b)), Some(expected));
    assert_eq!(geometry_bounds(&collection(&b, &a)), Some(expected));
    assert_eq!(expected.to_array(), [[0.0, 0.0], [21.0, 11.0]]);
}

#[test]
fn test_unclosed_literal_polygon_is_framed() {
    let (_reader, atlas) = setup();
    let app = Appellation::new(4, "Irancy")
        .with_geojson(r#"{"type":"Polygon","coordinates":[[[4,47],[5,47],[5,48]]]}"#);

    let ctx = atlas.appellation_map(&app).unwrap();
    assert_eq!(ctx.bounds.unwrap().to_array(), [[47.0, 4.0], [48.0, 5.0]]);
    assert_eq!(ctx.center, LatLng::new(47.5, 4.5));
}

#[test]
fn test_map_context_serializes_for_widget() {
    let (_reader, atlas) = setup();
    let atlas = atlas.with_theme(MapTheme::Dark);
    let app = Appellation::new(3, "Chablis")
        .with_region(Region::new("Bourgogne").with_color("#e6c229"))
        .with_geojson(r#"{"type":"Polygon","coordinates":[[[3.7,47.8],[3.9,47.8],[3.9,47.9],[3.7,47.8]]]}"#);

    let ctx = atlas.appellation_map(&app).unwrap();
    let json = serde_json::to_value(&ctx).unwrap();

    assert_eq!(json["zoom"], 10);
    assert_eq!(json["bounds"], serde_json::json!([[47.8, 3.7], [47.9, 3.9]]));
    assert_eq!(json["entries"][0]["type"], "shape");
    assert_eq!(json["entries"][0]["tooltip"], "Appellation: Chablis");
    assert_eq!(json["entries"][0]["geojson"]["properties"]["color"], "#e6c229");
    assert_eq!(json["tile_layers"][2], "CartoDB dark_matter");
}
