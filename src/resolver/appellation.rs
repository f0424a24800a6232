use std::sync::Arc;

use crate::config::GeoConfig;
use crate::entity::Appellation;
use crate::geometry::Geometry;
use crate::identifier::{PdoId, RawIdentifier, SourceKey};
use crate::storage::SourceStoreCache;

use super::{literal, GeometrySource, Resolution};

/// Resolves appellation geometry.
///
/// Sources are tried in a fixed order, first hit wins:
/// 1. AVA, for US regions with a `pdo_id`
/// 2. the national cadastre, for appellations of the cadastral country with an `inao_id`
/// 3. the country-boundary partition named by the `pdo_id` country segment
/// 4. the literal geometry stored on the record
#[derive(Debug, Clone)]
pub struct AppellationResolver {
    cache: Arc<SourceStoreCache>,
}

impl AppellationResolver {
    #[must_use]
    pub fn new(cache: Arc<SourceStoreCache>) -> Self {
        Self { cache }
    }

    fn config(&self) -> &GeoConfig {
        self.cache.layout().config()
    }

    /// The geometry for `app`, or `None` when no source has one.
    #[must_use]
    pub fn resolve(&self, app: &Appellation) -> Option<Geometry> {
        self.resolve_with_source(app).map(|r| r.geometry)
    }

    /// Like [`Self::resolve`], also reporting the winning source.
    #[must_use]
    pub fn resolve_with_source(&self, app: &Appellation) -> Option<Resolution> {
        self.from_ava(app)
            .or_else(|| self.from_cadastre(app))
            .or_else(|| self.from_country_boundary(app))
            .or_else(|| literal(app.geojson.as_deref(), app.id))
    }

    fn from_ava(&self, app: &Appellation) -> Option<Resolution> {
        let pdo_id = app.pdo_id()?;
        if !self.config().is_ava_country(app.country()?) {
            return None;
        }

        let store = self.cache.ava();
        let geometry = store.get(&SourceKey::text(pdo_id))?;
        Some(Resolution::found(GeometrySource::Ava, geometry.clone(), app.id))
    }

    fn from_cadastre(&self, app: &Appellation) -> Option<Resolution> {
        let inao_id = app.inao_id()?;
        if !self.in_cadastre_country(app) {
            return None;
        }

        let store = self.cache.cadastre();
        let geometry = store.lookup(inao_id)?;
        Some(Resolution::found(GeometrySource::Cadastre, geometry.clone(), app.id))
    }

    fn from_country_boundary(&self, app: &Appellation) -> Option<Resolution> {
        let pdo = PdoId::parse(app.pdo_id()?)?;
        let country = pdo.country();
        let cfg = self.config();
        if country.is_empty()
            || country.eq_ignore_ascii_case(&cfg.cadastre_marker)
            || country.eq_ignore_ascii_case(&cfg.ava_marker)
        {
            return None;
        }

        let store = self.cache.country(country);
        let geometry = store.lookup(&RawIdentifier::from(pdo.as_str()))?;
        Some(Resolution::found(GeometrySource::CountryBoundary, geometry.clone(), app.id))
    }

    /// Region country, region name, or a `-FR-` style `pdo_id` segment.
    fn in_cadastre_country(&self, app: &Appellation) -> bool {
        let cfg = self.config();
        let by_country = app.country() == Some(cfg.cadastre_country.as_str());
        let by_region_name = app
            .region_name()
            .is_some_and(|name| name.to_lowercase() == cfg.cadastre_country.to_lowercase());
        let by_pdo_id = app
            .pdo_id()
            .is_some_and(|pdo| PdoId::mentions(pdo, &cfg.cadastre_marker));
        by_country || by_region_name || by_pdo_id
    }
}
