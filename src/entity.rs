//! Records the geometry layer reads.
//!
//! These mirror the rows owned by the persistence layer, reduced to the
//! fields resolution and map composition need. The core never mutates them.

use serde::{Deserialize, Serialize};

use crate::identifier::RawIdentifier;

/// A wine region. Its `country` decides which national source applies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,

    #[serde(default)]
    pub country: Option<String>,

    /// Display color, a CSS hex string.
    #[serde(default)]
    pub color: Option<String>,
}

impl Region {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// An appellation (AOC, PDO, AVA, ...).
///
/// # Examples
///
/// ```
/// use winegeo::{Appellation, Region};
///
/// let app = Appellation::new(1, "Meursault")
///     .with_region(Region::new("Bourgogne").with_country("France"))
///     .with_inao_id(1234);
/// assert_eq!(app.region_name(), Some("Bourgogne"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Appellation {
    pub id: i64,

    pub name: String,

    /// Key into the national cadastral dataset.
    #[serde(default)]
    pub inao_id: Option<RawIdentifier>,

    /// Composite key, e.g. `PDO-IT-A0123` or `US-AVA-temecula_valley`.
    #[serde(default)]
    pub pdo_id: Option<String>,

    /// Literal GeoJSON fallback.
    #[serde(default)]
    pub geojson: Option<String>,

    #[serde(default)]
    pub region: Option<Region>,
}

impl Appellation {
    #[must_use]
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    #[must_use]
    pub fn with_inao_id(mut self, inao_id: impl Into<RawIdentifier>) -> Self {
        self.inao_id = Some(inao_id.into());
        self
    }

    #[must_use]
    pub fn with_pdo_id(mut self, pdo_id: impl Into<String>) -> Self {
        self.pdo_id = Some(pdo_id.into());
        self
    }

    #[must_use]
    pub fn with_geojson(mut self, geojson: impl Into<String>) -> Self {
        self.geojson = Some(geojson.into());
        self
    }

    #[must_use]
    pub fn region_name(&self) -> Option<&str> {
        self.region.as_ref().map(|r| r.name.as_str())
    }

    #[must_use]
    pub fn country(&self) -> Option<&str> {
        self.region.as_ref().and_then(|r| r.country.as_deref())
    }

    /// `pdo_id` with blank strings treated as absent.
    #[must_use]
    pub fn pdo_id(&self) -> Option<&str> {
        self.pdo_id.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// `inao_id` with blank strings treated as absent.
    #[must_use]
    pub fn inao_id(&self) -> Option<&RawIdentifier> {
        self.inao_id.as_ref().filter(|id| !id.is_blank())
    }
}

/// A vineyard (lieu-dit, cru, single field).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vineyard {
    pub id: i64,

    pub name: String,

    /// Key into the regional vineyard datasets.
    #[serde(default)]
    pub vineyard_id: Option<RawIdentifier>,

    #[serde(default)]
    pub geojson: Option<String>,

    #[serde(default)]
    pub region: Option<Region>,

    #[serde(default)]
    pub sub_region: Option<String>,

    #[serde(default)]
    pub village: Option<String>,
}

impl Vineyard {
    #[must_use]
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    #[must_use]
    pub fn with_vineyard_id(mut self, vineyard_id: impl Into<RawIdentifier>) -> Self {
        self.vineyard_id = Some(vineyard_id.into());
        self
    }

    #[must_use]
    pub fn with_geojson(mut self, geojson: impl Into<String>) -> Self {
        self.geojson = Some(geojson.into());
        self
    }

    #[must_use]
    pub fn with_location(mut self, sub_region: Option<&str>, village: Option<&str>) -> Self {
        self.sub_region = sub_region.map(str::to_string);
        self.village = village.map(str::to_string);
        self
    }

    #[must_use]
    pub fn region_name(&self) -> Option<&str> {
        self.region.as_ref().map(|r| r.name.as_str())
    }

    #[must_use]
    pub fn vineyard_id(&self) -> Option<&RawIdentifier> {
        self.vineyard_id.as_ref().filter(|id| !id.is_blank())
    }

    /// `"sub_region - village - name"`, skipping missing parts. Tells apart
    /// same-named vineyards from different villages on an overview map.
    #[must_use]
    pub fn label(&self) -> String {
        [self.sub_region.as_deref(), self.village.as_deref(), Some(self.name.as_str())]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" - ")
    }
}

/// A place where wine was tasted (restaurant, home, bar).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub michelin_stars: Option<u8>,
}

impl Place {
    #[must_use]
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn at(mut self, lat: f64, lng: f64) -> Self {
        self.lat = Some(lat);
        self.lng = Some(lng);
        self
    }

    /// `"Name (2*)"` for starred places, the bare name otherwise.
    #[must_use]
    pub fn tooltip(&self) -> String {
        match self.michelin_stars {
            Some(stars) if stars > 0 => format!("{} ({stars}*)", self.name),
            _ => self.name.clone(),
        }
    }
}

/// Anything the resolvers can place on a map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GeoEntity {
    Appellation(Appellation),
    Vineyard(Vineyard),
}

impl GeoEntity {
    #[must_use]
    pub fn id(&self) -> i64 {
        match self {
            Self::Appellation(a) => a.id,
            Self::Vineyard(v) => v.id,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Appellation(a) => &a.name,
            Self::Vineyard(v) => &v.name,
        }
    }
}

impl From<Appellation> for GeoEntity {
    fn from(a: Appellation) -> Self {
        Self::Appellation(a)
    }
}

impl From<Vineyard> for GeoEntity {
    fn from(v: Vineyard) -> Self {
        Self::Vineyard(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_ids_are_absent() {
        let app = Appellation::new(1, "X").with_pdo_id("  ").with_inao_id("");
        assert!(app.pdo_id().is_none());
        assert!(app.inao_id().is_none());
    }

    #[test]
    fn test_vineyard_label() {
        let v = Vineyard::new(1, "Les Perrières")
            .with_location(Some("Côte de Beaune"), Some("Meursault"));
        assert_eq!(v.label(), "Côte de Beaune - Meursault - Les Perrières");
        assert_eq!(Vineyard::new(2, "Clos").label(), "Clos");
    }

    #[test]
    fn test_place_tooltip() {
        let mut p = Place::new(1, "Odette");
        assert_eq!(p.tooltip(), "Odette");
        p.michelin_stars = Some(3);
        assert_eq!(p.tooltip(), "Odette (3*)");
    }

    #[test]
    fn test_entity_deserializes_from_record() {
        let json = r#"{
            "kind": "appellation",
            "id": 3,
            "name": "Barolo",
            "pdo_id": "PDO-IT-A0001",
            "inao_id": "77",
            "region": {"name": "Piemonte", "country": "Italy"}
        }"#;
        let entity: GeoEntity = serde_json::from_str(json).unwrap();
        let GeoEntity::Appellation(app) = entity else {
            panic!("expected appellation");
        };
        assert_eq!(app.country(), Some("Italy"));
        assert_eq!(app.inao_id(), Some(&RawIdentifier::from("77")));
    }
}
