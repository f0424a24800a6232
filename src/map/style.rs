use std::fmt;

use serde::{Deserialize, Serialize};

/// Fallback appellation color when the region has none.
pub const APPELLATION_COLOR: &str = "#c27ba0";

pub const VINEYARD_COLOR: &str = "#228b22";

pub const PLACE_COLOR: &str = "red";

/// What an entry on the map stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Appellation,
    Vineyard,
    Place,
}

impl Category {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Appellation => "Appellation",
            Self::Vineyard => "Vineyard",
            Self::Place => "Place",
        }
    }

    #[must_use]
    pub const fn default_color(self) -> &'static str {
        match self {
            Self::Appellation => APPELLATION_COLOR,
            Self::Vineyard => VINEYARD_COLOR,
            Self::Place => PLACE_COLOR,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Leaflet-style path options for one entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Style {
    pub color: String,
    pub fill_color: String,
    pub weight: f64,
    pub fill_opacity: f64,
    /// Circle radius in pixels, markers only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
}

impl Style {
    /// Outline and fill for a shape of `category`.
    #[must_use]
    pub fn shape(category: Category, color: &str) -> Self {
        let (weight, fill_opacity) = match category {
            Category::Appellation => (1.0, 0.4),
            Category::Vineyard | Category::Place => (2.0, 0.6),
        };
        Self {
            color: color.to_string(),
            fill_color: color.to_string(),
            weight,
            fill_opacity,
            radius: None,
        }
    }

    /// Filled circle marker.
    #[must_use]
    pub fn marker(color: &str) -> Self {
        Self {
            color: color.to_string(),
            fill_color: color.to_string(),
            weight: 1.0,
            fill_opacity: 0.7,
            radius: Some(6.0),
        }
    }
}

/// UI theme, selects the extra base layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapTheme {
    #[default]
    Light,
    Dark,
}

impl MapTheme {
    #[must_use]
    pub const fn tile_layer(self) -> &'static str {
        match self {
            Self::Light => "CartoDB positron",
            Self::Dark => "CartoDB dark_matter",
        }
    }
}
