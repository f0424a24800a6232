//! Configuration for geometry resolution and map framing.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, GeoError, ValidationError};
use crate::geometry::LatLng;

/// Highest zoom level a map widget accepts.
pub const MAX_ZOOM: u8 = 22;

/// Configuration for [`crate::WineAtlas`].
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```
/// use winegeo::GeoConfig;
///
/// let cfg = GeoConfig::from_json_str(r#"{"data_dir": "/srv/winelib/data"}"#).unwrap();
/// assert_eq!(cfg.cadastre_marker, "FR");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct GeoConfig {
    /// Root holding `geo/` and `geo/vineyards/`.
    pub data_dir: PathBuf,

    /// Map center used when a geometry has no usable bounds.
    pub default_center: LatLng,

    /// Center and zoom of the multi-entity overview map.
    pub overview_center: LatLng,
    pub overview_zoom: u8,

    /// The one country covered by the cadastral dataset.
    pub cadastre_country: String,
    pub cadastre_marker: String,

    /// Region country values that select the AVA dataset.
    pub ava_countries: Vec<String>,
    pub ava_marker: String,

    /// Regions (lowercase) that ship an extra premier-cru vineyard file.
    pub premier_cru_regions: Vec<String>,

    /// ISO country code to country-boundary file slug.
    pub country_slugs: BTreeMap<String, String>,

    /// Base tile layers offered by the map widget.
    pub tile_layers: Vec<String>,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            default_center: LatLng::new(47.0, 4.0),
            overview_center: LatLng::new(46.0, 4.0),
            overview_zoom: 6,
            cadastre_country: "France".to_string(),
            cadastre_marker: "FR".to_string(),
            ava_countries: vec!["United States".to_string(), "USA".to_string()],
            ava_marker: "AVA".to_string(),
            premier_cru_regions: vec!["bourgogne".to_string(), "burgundy".to_string()],
            country_slugs: default_country_slugs(),
            tile_layers: vec!["OpenStreetMap.France".to_string(), "OpenTopoMap".to_string()],
        }
    }
}

fn default_country_slugs() -> BTreeMap<String, String> {
    [
        ("IT", "italy"),
        ("FR", "france"),
        ("ES", "spain"),
        ("DE", "germany"),
        ("PT", "portugal"),
        ("AT", "austria"),
        ("BE", "belgium"),
        ("BG", "bulgaria"),
        ("CY", "cyprus"),
        ("CZ", "czech_republic"),
        ("EL", "greece"),
        ("GR", "gr"),
        ("HU", "hungary"),
        ("HR", "croatia"),
        ("LU", "luxembourg"),
        ("MT", "malta"),
        ("NL", "netherlands"),
        ("PL", "poland"),
        ("RO", "romania"),
        ("SI", "slovenia"),
        ("SK", "slovakia"),
        ("GB", "united_kingdom"),
        ("DK", "dk"),
    ]
    .into_iter()
    .map(|(iso, slug)| (iso.to_string(), slug.to_string()))
    .collect()
}

impl GeoConfig {
    /// Config rooted at `data_dir`, everything else default.
    #[must_use]
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Parses and validates a JSON document.
    ///
    /// # Errors
    /// Returns `GeoError::Config` on malformed JSON and
    /// `GeoError::Validation` on out-of-range values.
    pub fn from_json_str(text: &str) -> Result<Self, GeoError> {
        let cfg: Self = serde_json::from_str(text).map_err(ConfigError::from)?;
        cfg.validate()
    }

    /// Reads, parses and validates a JSON config file.
    ///
    /// # Errors
    /// Returns `GeoError::Config` when the file cannot be read, otherwise
    /// as [`GeoConfig::from_json_str`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, GeoError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Checks values a map widget or resolver cannot work with.
    ///
    /// # Errors
    /// Returns the first `ValidationError` found.
    pub fn validate(self) -> Result<Self, GeoError> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ValidationError::EmptyField {
                field: "data_dir".to_string(),
            }
            .into());
        }

        for center in [self.default_center, self.overview_center] {
            if !center.is_valid() {
                return Err(ValidationError::CoordinateOutOfRange {
                    lat: center.lat,
                    lng: center.lng,
                }
                .into());
            }
        }

        if self.overview_zoom > MAX_ZOOM {
            return Err(ValidationError::ZoomOutOfRange {
                zoom: self.overview_zoom,
                max: MAX_ZOOM,
            }
            .into());
        }

        let marker_ok = self.cadastre_marker.len() == 2
            && self.cadastre_marker.chars().all(|c| c.is_ascii_alphabetic());
        if !marker_ok {
            return Err(ValidationError::InvalidCountryMarker {
                marker: self.cadastre_marker,
            }
            .into());
        }

        for (field, value) in [
            ("cadastre_country", &self.cadastre_country),
            ("ava_marker", &self.ava_marker),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::EmptyField {
                    field: field.to_string(),
                }
                .into());
            }
        }

        if self.tile_layers.iter().any(|t| t.trim().is_empty()) {
            return Err(ValidationError::EmptyField {
                field: "tile_layers".to_string(),
            }
            .into());
        }

        Ok(self)
    }

    /// File slug for a country partition. Unknown codes fall back to the
    /// lowercased code.
    #[must_use]
    pub fn country_slug(&self, iso: &str) -> String {
        let iso = iso.to_ascii_uppercase();
        self.country_slugs
            .get(&iso)
            .cloned()
            .unwrap_or_else(|| iso.to_ascii_lowercase())
    }

    /// Synthesized AVA key prefix, `US-AVA-`.
    #[must_use]
    pub fn ava_key_prefix(&self) -> String {
        format!("US-{}-", self.ava_marker)
    }

    #[must_use]
    pub fn is_ava_country(&self, country: &str) -> bool {
        self.ava_countries.iter().any(|c| c == country)
    }

    #[must_use]
    pub fn is_premier_cru_region(&self, region: &str) -> bool {
        let region = region.to_lowercase();
        self.premier_cru_regions.iter().any(|r| r.to_lowercase() == region)
    }
}
