//! Map context composition.
//!
//! Nothing here draws. The output is hand-off data for a map widget: a
//! center, a zoom hint, optional bounds to fit, styled entries and the base
//! tile layers to offer.

mod composer;
mod context;
mod style;

pub use composer::{MapComposer, MapTarget, APPELLATION_ZOOM, PLACE_ZOOM, VINEYARD_ZOOM, WINE_ZOOM};
pub use context::{MapContext, MapEntry, MapEntryKind};
pub use style::{Category, MapTheme, Style, APPELLATION_COLOR, PLACE_COLOR, VINEYARD_COLOR};
