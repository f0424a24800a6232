//! Shared fixtures: GeoParquet files written with the parquet writer API.

#![allow(dead_code)]

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parquet::data_type::{ByteArray, ByteArrayType, DoubleType, Int64Type};
use parquet::file::properties::WriterProperties;
use parquet::file::writer::{SerializedColumnWriter, SerializedFileWriter};
use parquet::schema::parser::parse_message_type;

use winegeo::geometry::wkb;
use winegeo::Geometry;

/// Key column contents; `None` is a null cell.
pub enum Keys {
    Int(Vec<Option<i64>>),
    Double(Vec<Option<f64>>),
    Text(Vec<Option<&'static str>>),
}

/// WKB cell for a geometry.
pub fn cell(geometry: &Geometry) -> Option<Vec<u8>> {
    Some(wkb::encode(geometry).unwrap())
}

pub fn square(lon: f64, lat: f64) -> Geometry {
    Geometry::polygon(&[
        (lon, lat),
        (lon + 1.0, lat),
        (lon + 1.0, lat + 1.0),
        (lon, lat + 1.0),
        (lon, lat),
    ])
}

/// `{data_dir}/geo/{relative}`, creating parent directories.
pub fn geo_path(data_dir: &Path, relative: &str) -> PathBuf {
    let path = data_dir.join("geo").join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    path
}

/// Writes a two-column GeoParquet file: `key_column` and `geometry`.
pub fn write_dataset(path: &Path, key_column: &str, keys: Keys, geometries: Vec<Option<Vec<u8>>>) {
    let key_type = match &keys {
        Keys::Int(_) => "INT64",
        Keys::Double(_) => "DOUBLE",
        Keys::Text(_) => "BYTE_ARRAY",
    };
    let annotation = if matches!(keys, Keys::Text(_)) { " (UTF8)" } else { "" };
    let message = format!(
        "message schema {{ OPTIONAL {key_type} {key_column}{annotation}; OPTIONAL BYTE_ARRAY geometry; }}"
    );

    let schema = Arc::new(parse_message_type(&message).unwrap());
    let props = Arc::new(WriterProperties::builder().build());
    let file = File::create(path).unwrap();
    let mut writer = SerializedFileWriter::new(file, schema, props).unwrap();

    let mut row_group = writer.next_row_group().unwrap();
    let mut index = 0;
    while let Some(mut column) = row_group.next_column().unwrap() {
        if index == 0 {
            write_keys(&mut column, &keys);
        } else {
            write_bytes(&mut column, &geometries);
        }
        column.close().unwrap();
        index += 1;
    }
    row_group.close().unwrap();
    writer.close().unwrap();
}

/// Writes bytes that are not a parquet file.
pub fn write_corrupt(path: &Path) {
    fs::write(path, b"PAR1 this is not really parquet").unwrap();
}

fn def_levels<T>(values: &[Option<T>]) -> Vec<i16> {
    values.iter().map(|v| i16::from(v.is_some())).collect()
}

fn write_keys(column: &mut SerializedColumnWriter<'_>, keys: &Keys) {
    match keys {
        Keys::Int(values) => {
            let present: Vec<i64> = values.iter().flatten().copied().collect();
            column
                .typed::<Int64Type>()
                .write_batch(&present, Some(def_levels(values).as_slice()), None)
                .unwrap();
        }
        Keys::Double(values) => {
            let present: Vec<f64> = values.iter().flatten().copied().collect();
            column
                .typed::<DoubleType>()
                .write_batch(&present, Some(def_levels(values).as_slice()), None)
                .unwrap();
        }
        Keys::Text(values) => {
            let present: Vec<ByteArray> = values.iter().flatten().map(|s| ByteArray::from(*s)).collect();
            column
                .typed::<ByteArrayType>()
                .write_batch(&present, Some(def_levels(values).as_slice()), None)
                .unwrap();
        }
    }
}

fn write_bytes(column: &mut SerializedColumnWriter<'_>, values: &[Option<Vec<u8>>]) {
    let present: Vec<ByteArray> = values.iter().flatten().map(|b| ByteArray::from(b.clone())).collect();
    column
        .typed::<ByteArrayType>()
        .write_batch(&present, Some(def_levels(values).as_slice()), None)
        .unwrap();
}
