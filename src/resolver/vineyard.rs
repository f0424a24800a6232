use std::sync::Arc;

use crate::entity::Vineyard;
use crate::geometry::Geometry;
use crate::storage::SourceStoreCache;

use super::{literal, GeometrySource, Resolution};

/// Resolves vineyard geometry: the regional vineyard datasets first, then
/// the literal geometry stored on the record.
#[derive(Debug, Clone)]
pub struct VineyardResolver {
    cache: Arc<SourceStoreCache>,
}

impl VineyardResolver {
    #[must_use]
    pub fn new(cache: Arc<SourceStoreCache>) -> Self {
        Self { cache }
    }

    /// The geometry for `vineyard`, or `None`.
    ///
    /// `region` overrides the vineyard's own region when picking the dataset
    /// partition; `appellation` decides whether a premier-cru addendum file
    /// takes part.
    #[must_use]
    pub fn resolve(
        &self,
        vineyard: &Vineyard,
        region: Option<&str>,
        appellation: Option<&str>,
    ) -> Option<Geometry> {
        self.resolve_with_source(vineyard, region, appellation)
            .map(|r| r.geometry)
    }

    #[must_use]
    pub fn resolve_with_source(
        &self,
        vineyard: &Vineyard,
        region: Option<&str>,
        appellation: Option<&str>,
    ) -> Option<Resolution> {
        self.from_datasets(vineyard, region, appellation)
            .or_else(|| literal(vineyard.geojson.as_deref(), vineyard.id))
    }

    fn from_datasets(
        &self,
        vineyard: &Vineyard,
        region: Option<&str>,
        appellation: Option<&str>,
    ) -> Option<Resolution> {
        let id = vineyard.vineyard_id()?;
        let region = region
            .or_else(|| vineyard.region_name())
            .filter(|r| !r.trim().is_empty())?;

        let store = self.cache.vineyards(region, appellation);
        let geometry = store.lookup(id)?;
        Some(Resolution::found(GeometrySource::Vineyards, geometry.clone(), vineyard.id))
    }
}
