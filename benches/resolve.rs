use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion, Throughput};

use winegeo::storage::InMemoryDatasetReader;
use winegeo::{
    geometry_bounds, Appellation, Feature, GeoConfig, Geometry, Region, SourceKey, Vineyard, WineAtlas,
};

fn ring(lon: f64, lat: f64, vertices: usize) -> Geometry {
    let mut points: Vec<(f64, f64)> = (0..vertices)
        .map(|i| {
            let angle = std::f64::consts::TAU * i as f64 / vertices as f64;
            (lon + 0.05 * angle.cos(), lat + 0.05 * angle.sin())
        })
        .collect();
    points.push(points[0]);
    Geometry::polygon(&points)
}

fn make_atlas() -> WineAtlas {
    let reader = Arc::new(InMemoryDatasetReader::new());

    // 4096 cadastral polygons keyed by integer id, as the national file ships them.
    reader.insert(
        "/bench/geo/france.parquet",
        "id_app",
        (0..4096i64).map(|i| {
            let (col, row) = ((i % 64) as f64, (i / 64) as f64);
            (SourceKey::Int(i), ring(4.0 + col * 0.1, 45.0 + row * 0.05, 32))
        }),
    );
    reader.insert(
        "/bench/geo/vineyards/bourgogne_cote_de_nuits.parquet",
        "id",
        (0..1024i64).map(|i| (SourceKey::text(i.to_string()), ring(4.9, 47.1, 16))),
    );

    WineAtlas::with_reader(GeoConfig::with_data_dir("/bench"), reader).unwrap()
}

fn bench_resolve_appellation(c: &mut Criterion) {
    let atlas = make_atlas();
    let app = Appellation::new(1, "Gevrey-Chambertin")
        .with_region(Region::new("Bourgogne").with_country("France"))
        .with_inao_id("2048");
    // warm the partition so the loop measures lookups, not the build
    let _ = atlas.resolve_appellation(&app);

    c.bench_function("resolve/appellation_cadastre_hit", |b| {
        b.iter(|| black_box(atlas.resolve_appellation(black_box(&app))));
    });
}

fn bench_resolve_vineyard(c: &mut Criterion) {
    let atlas = make_atlas();
    let vineyard = Vineyard::new(1, "Clos de Bèze")
        .with_region(Region::new("Bourgogne"))
        .with_vineyard_id(512);
    let _ = atlas.resolve_vineyard(&vineyard, None, None);

    c.bench_function("resolve/vineyard_int_id_on_text_keys", |b| {
        b.iter(|| black_box(atlas.resolve_vineyard(black_box(&vineyard), None, None)));
    });
}

fn bench_bounds(c: &mut Criterion) {
    let mut group = c.benchmark_group("bounds");
    let collection = Geometry::FeatureCollection(
        (0..256)
            .filter_map(|i| ring(f64::from(i) * 0.1, 45.0, 64).as_shape().cloned())
            .map(Feature::new)
            .collect(),
    );
    group.throughput(Throughput::Elements(256));
    group.bench_function("feature_collection_256x64", |b| {
        b.iter(|| black_box(geometry_bounds(black_box(&collection))));
    });
    group.finish();
}

criterion_group!(benches, bench_resolve_appellation, bench_resolve_vineyard, bench_bounds);
criterion_main!(benches);
