//! Geometry resolvers.
//!
//! A resolver walks an ordered list of sources for one entity kind and stops
//! at the first hit. Resolution never fails: a missing, corrupt or
//! non-matching source is simply skipped, and "nothing found" is `None`.

mod appellation;
mod vineyard;

use std::fmt;

use serde::Serialize;

use crate::geometry::Geometry;

pub use appellation::AppellationResolver;
pub use vineyard::VineyardResolver;

/// Which source produced a resolved geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometrySource {
    Ava,
    Cadastre,
    CountryBoundary,
    Vineyards,
    /// Geometry text stored on the record itself.
    Literal,
}

impl GeometrySource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ava => "ava",
            Self::Cadastre => "cadastre",
            Self::CountryBoundary => "country_boundary",
            Self::Vineyards => "vineyards",
            Self::Literal => "literal",
        }
    }
}

impl fmt::Display for GeometrySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved geometry and where it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub source: GeometrySource,
    pub geometry: Geometry,
}

impl Resolution {
    pub(crate) fn found(source: GeometrySource, geometry: Geometry, entity_id: i64) -> Self {
        tracing::debug!(entity_id, %source, kind = geometry.type_name(), "geometry resolved");
        Self { source, geometry }
    }
}

/// Parses literal geometry text stored on a record. Blank or invalid text
/// yields `None`.
pub(crate) fn literal(text: Option<&str>, entity_id: i64) -> Option<Resolution> {
    let geometry = Geometry::parse_geojson(text?)?;
    Some(Resolution::found(GeometrySource::Literal, geometry, entity_id))
}
