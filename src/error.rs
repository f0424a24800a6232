//! Error types for winegeo.
//!
//! Errors are strongly typed using thiserror. Note that resolution itself
//! never returns these: a missing or broken dataset degrades to "no geometry".
//! They surface only from configuration and from direct dataset reads.

use std::path::PathBuf;

use thiserror::Error;

/// Validation errors raised while checking configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField {
        field: String,
    },

    #[error("Coordinate ({lat}, {lng}) is out of range")]
    CoordinateOutOfRange {
        lat: f64,
        lng: f64,
    },

    #[error("Country marker '{marker}' must be two ASCII letters")]
    InvalidCountryMarker {
        marker: String,
    },

    #[error("Zoom level {zoom} exceeds maximum of {max}")]
    ZoomOutOfRange {
        zoom: u8,
        max: u8,
    },
}

/// Errors reading a single on-disk geometry dataset.
///
/// The source store cache catches every one of these and substitutes an
/// empty store, so one corrupt file never breaks resolution elsewhere.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode {path}: {message}")]
    Decode {
        path: PathBuf,
        message: String,
    },

    #[error("None of the key columns {expected:?} found in {path}")]
    MissingKeyColumn {
        path: PathBuf,
        expected: Vec<String>,
    },

    #[error("Geometry column '{column}' not found in {path}")]
    MissingGeometryColumn {
        path: PathBuf,
        column: String,
    },
}

impl DatasetError {
    /// The file this error refers to.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Io { path, .. }
            | Self::Decode { path, .. }
            | Self::MissingKeyColumn { path, .. }
            | Self::MissingGeometryColumn { path, .. } => path,
        }
    }
}

/// Errors loading a configuration document.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Undecodable WKB geometry cell.
#[derive(Debug, Error)]
#[error("malformed WKB: {0}")]
pub struct WkbError(#[from] pub geozero::error::GeozeroError);

/// GeoJSON text that does not describe a usable geometry.
#[derive(Debug, Error)]
pub enum GeoJsonError {
    #[error("invalid GeoJSON: {0}")]
    Parse(#[from] geojson::Error),

    #[error("position needs at least 2 ordinates, got {0}")]
    ShortPosition(usize),
}

/// Top-level error type for winegeo.
#[derive(Debug, Error)]
pub enum GeoError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl GeoError {
    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is a dataset error.
    #[must_use]
    pub const fn is_dataset(&self) -> bool {
        matches!(self, Self::Dataset(_))
    }

    /// Returns true if this is a config loading error.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

/// Result type alias for winegeo operations.
pub type GeoResult<T> = Result<T, GeoError>;
