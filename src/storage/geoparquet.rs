//! GeoParquet dataset reader.
//!
//! Reads rows through the parquet record API. Keys are normalized as they are
//! read: integer columns (and integral doubles) become [`SourceKey::Int`],
//! text columns become [`SourceKey::Text`]. Geometry is WKB in a binary
//! column; text columns are accepted as GeoJSON.

use std::fs::File;
use std::path::Path;

use parquet::errors::ParquetError;
use parquet::file::reader::{FileReader, SerializedFileReader};
use parquet::record::Field;

use crate::error::DatasetError;
use crate::geometry::{wkb, Geometry};
use crate::identifier::SourceKey;
use crate::storage::traits::{DatasetReader, DatasetRows, TableSpec};

fn decode_err(path: &Path, e: &ParquetError) -> DatasetError {
    DatasetError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

/// Reads `.parquet` files from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParquetDatasetReader;

impl ParquetDatasetReader {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl DatasetReader for ParquetDatasetReader {
    fn read(&self, path: &Path, spec: &TableSpec) -> Result<DatasetRows, DatasetError> {
        let file = File::open(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let reader = SerializedFileReader::new(file).map_err(|e| decode_err(path, &e))?;

        let columns: Vec<String> = reader
            .metadata()
            .file_metadata()
            .schema_descr()
            .root_schema()
            .get_fields()
            .iter()
            .map(|f| f.name().to_string())
            .collect();

        let key_column = spec.pick_key_column(&columns).ok_or_else(|| spec.missing_key(path))?;
        if !columns.contains(&spec.geometry_column) {
            return Err(spec.missing_geometry(path));
        }

        let mut rows = Vec::new();
        let mut skipped = 0usize;
        for row in reader.get_row_iter(None).map_err(|e| decode_err(path, &e))? {
            let row = row.map_err(|e| decode_err(path, &e))?;

            let mut key = None;
            let mut geometry = None;
            for (name, field) in row.get_column_iter() {
                if name == key_column {
                    key = field_key(field);
                } else if *name == spec.geometry_column {
                    geometry = field_geometry(field);
                }
            }

            match (key, geometry) {
                (Some(key), Some(geometry)) => rows.push((key, geometry)),
                _ => skipped += 1,
            }
        }

        tracing::debug!(
            path = %path.display(),
            key_column,
            rows = rows.len(),
            skipped,
            "parquet dataset read"
        );
        Ok(rows)
    }
}

/// Normalizes a key cell. Nulls and non-key types yield `None`.
fn field_key(field: &Field) -> Option<SourceKey> {
    let key = match field {
        Field::Byte(v) => SourceKey::Int(i64::from(*v)),
        Field::Short(v) => SourceKey::Int(i64::from(*v)),
        Field::Int(v) => SourceKey::Int(i64::from(*v)),
        Field::Long(v) => SourceKey::Int(*v),
        Field::UByte(v) => SourceKey::Int(i64::from(*v)),
        Field::UShort(v) => SourceKey::Int(i64::from(*v)),
        Field::UInt(v) => SourceKey::Int(i64::from(*v)),
        Field::ULong(v) => SourceKey::Int(i64::try_from(*v).ok()?),
        Field::Float(v) => integral_key(f64::from(*v))?,
        Field::Double(v) => integral_key(*v)?,
        Field::Str(v) => SourceKey::Text(v.clone()),
        Field::Bytes(v) => SourceKey::Text(std::str::from_utf8(v.data()).ok()?.to_string()),
        _ => return None,
    };
    Some(key)
}

/// Integer-valued floats (ids written through a float column) become `Int`.
#[allow(clippy::cast_possible_truncation)]
fn integral_key(v: f64) -> Option<SourceKey> {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 9.0e15 {
        Some(SourceKey::Int(v as i64))
    } else if v.is_finite() {
        Some(SourceKey::Text(v.to_string()))
    } else {
        None
    }
}

fn field_geometry(field: &Field) -> Option<Geometry> {
    match field {
        Field::Bytes(v) => match wkb::decode(v.data()) {
            Ok(g) => Some(g),
            Err(e) => {
                let text = std::str::from_utf8(v.data()).ok();
                let parsed = text.and_then(Geometry::parse_geojson);
                if parsed.is_none() {
                    tracing::trace!(error = %e, "undecodable geometry cell");
                }
                parsed
            }
        },
        Field::Str(v) => Geometry::parse_geojson(v),
        _ => None,
    }
}
