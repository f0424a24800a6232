use serde::Serialize;

use crate::geometry::{Bounds, Geometry, LatLng};

use super::style::{Category, Style};

/// How an entry is drawn.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MapEntryKind {
    /// A circle marker at one location.
    Marker { location: LatLng },
    /// A GeoJSON layer; polygons are wrapped in a `Feature` carrying
    /// `name`, `id`, `ftype` and `color` properties.
    Shape { geojson: Geometry },
}

/// One renderable item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapEntry {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub category: Category,
    pub tooltip: String,
    pub style: Style,
    #[serde(flatten)]
    pub kind: MapEntryKind,
}

impl MapEntry {
    #[must_use]
    pub const fn is_marker(&self) -> bool {
        matches!(self.kind, MapEntryKind::Marker { .. })
    }

    #[must_use]
    pub fn color(&self) -> &str {
        &self.style.color
    }
}

/// Everything a map widget needs to draw one view.
///
/// `bounds`, when present, should be fitted after the initial `center`/`zoom`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapContext {
    pub center: LatLng,
    pub zoom: u8,
    pub bounds: Option<Bounds>,
    pub entries: Vec<MapEntry>,
    pub tile_layers: Vec<String>,
}

impl MapContext {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Caption listing the entries, e.g. `"Appellation: Pommard + Vineyard: Rugiens"`.
    #[must_use]
    pub fn label(&self) -> String {
        self.entries
            .iter()
            .map(|e| e.tooltip.as_str())
            .collect::<Vec<_>>()
            .join(" + ")
    }
}
