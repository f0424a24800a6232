//! The `WineAtlas` facade.

use std::sync::Arc;

use crate::config::GeoConfig;
use crate::entity::{Appellation, GeoEntity, Place, Vineyard};
use crate::error::GeoResult;
use crate::geometry::{geometry_bounds, Bounds, Geometry};
use crate::map::{MapComposer, MapContext, MapTarget, MapTheme};
use crate::resolver::{AppellationResolver, Resolution, VineyardResolver};
use crate::storage::{CacheStats, DatasetReader, SourceStoreCache};

/// One shared cache, both resolvers and the map composer.
///
/// Construct once per process and share it; every method takes `&self`.
///
/// # Examples
///
/// ```
/// use winegeo::{Appellation, GeoConfig, WineAtlas};
///
/// let atlas = WineAtlas::new(GeoConfig::with_data_dir("/nonexistent")).unwrap();
/// let app = Appellation::new(1, "Somewhere")
///     .with_geojson(r#"{"type":"Point","coordinates":[4.8,47.0]}"#);
///
/// let ctx = atlas.appellation_map(&app).unwrap();
/// assert_eq!(ctx.center.lat, 47.0);
/// ```
#[derive(Debug, Clone)]
pub struct WineAtlas {
    cache: Arc<SourceStoreCache>,
    appellations: AppellationResolver,
    vineyards: VineyardResolver,
    composer: MapComposer,
}

impl WineAtlas {
    /// Atlas reading datasets from `config.data_dir`.
    ///
    /// # Errors
    /// Returns `GeoError::Validation` if the config does not validate.
    pub fn new(config: GeoConfig) -> GeoResult<Self> {
        let config = config.validate()?;
        let cache = SourceStoreCache::new(&config);
        Ok(Self::assemble(config, cache))
    }

    /// Atlas over a custom dataset reader.
    ///
    /// # Errors
    /// Returns `GeoError::Validation` if the config does not validate.
    pub fn with_reader(config: GeoConfig, reader: Arc<dyn DatasetReader>) -> GeoResult<Self> {
        let config = config.validate()?;
        let cache = SourceStoreCache::with_reader(&config, reader);
        Ok(Self::assemble(config, cache))
    }

    fn assemble(config: GeoConfig, cache: SourceStoreCache) -> Self {
        let cache = Arc::new(cache);
        Self {
            appellations: AppellationResolver::new(Arc::clone(&cache)),
            vineyards: VineyardResolver::new(Arc::clone(&cache)),
            composer: MapComposer::new(config),
            cache,
        }
    }

    #[must_use]
    pub fn with_theme(mut self, theme: MapTheme) -> Self {
        self.composer = self.composer.with_theme(theme);
        self
    }

    #[must_use]
    pub fn cache(&self) -> &Arc<SourceStoreCache> {
        &self.cache
    }

    #[must_use]
    pub fn composer(&self) -> &MapComposer {
        &self.composer
    }

    /// Geometry of any entity. Vineyards use their own region.
    #[must_use]
    pub fn resolve(&self, entity: &GeoEntity) -> Option<Geometry> {
        self.resolve_with_source(entity).map(|r| r.geometry)
    }

    #[must_use]
    pub fn resolve_with_source(&self, entity: &GeoEntity) -> Option<Resolution> {
        match entity {
            GeoEntity::Appellation(a) => self.appellations.resolve_with_source(a),
            GeoEntity::Vineyard(v) => self.vineyards.resolve_with_source(v, None, None),
        }
    }

    #[must_use]
    pub fn resolve_appellation(&self, app: &Appellation) -> Option<Geometry> {
        self.appellations.resolve(app)
    }

    /// See [`VineyardResolver::resolve`] for the `region`/`appellation` overrides.
    #[must_use]
    pub fn resolve_vineyard(
        &self,
        vineyard: &Vineyard,
        region: Option<&str>,
        appellation: Option<&str>,
    ) -> Option<Geometry> {
        self.vineyards.resolve(vineyard, region, appellation)
    }

    /// Bounding box of the entity's resolved geometry.
    #[must_use]
    pub fn bounds(&self, entity: &GeoEntity) -> Option<Bounds> {
        geometry_bounds(&self.resolve(entity)?)
    }

    #[must_use]
    pub fn place_map(&self, place: &Place) -> Option<MapContext> {
        self.composer.for_place(place)
    }

    #[must_use]
    pub fn appellation_map(&self, app: &Appellation) -> Option<MapContext> {
        let geometry = self.resolve_appellation(app)?;
        Some(self.composer.for_appellation(app, geometry))
    }

    #[must_use]
    pub fn vineyard_map(
        &self,
        vineyard: &Vineyard,
        appellation: Option<&str>,
    ) -> Option<MapContext> {
        let geometry = self.resolve_vineyard(vineyard, None, appellation)?;
        Some(self.composer.for_vineyard(vineyard, geometry))
    }

    /// Shared map of a wine's appellation and vineyard.
    ///
    /// The vineyard partition is chosen by `region` (the wine's region) and
    /// the appellation name.
    #[must_use]
    pub fn wine_map(
        &self,
        appellation: Option<&Appellation>,
        vineyard: Option<&Vineyard>,
        region: Option<&str>,
    ) -> Option<MapContext> {
        let app_geo = appellation.and_then(|a| Some((a, self.resolve_appellation(a)?)));
        let vine_geo = vineyard.and_then(|v| {
            let app_name = appellation.map(|a| a.name.as_str());
            Some((v, self.resolve_vineyard(v, region, app_name)?))
        });
        self.composer.for_wine(app_geo, vine_geo)
    }

    /// Overview map of every entity that resolves. Unresolved ones are
    /// left out; vineyards are named by their full label.
    #[must_use]
    pub fn overview_map<'a>(
        &self,
        entities: impl IntoIterator<Item = &'a GeoEntity>,
    ) -> MapContext {
        let targets = entities.into_iter().filter_map(|entity| {
            let geometry = self.resolve(entity)?;
            Some(match entity {
                GeoEntity::Appellation(a) => MapTarget::appellation(a, geometry),
                GeoEntity::Vineyard(v) => MapTarget {
                    name: v.label(),
                    ..MapTarget::vineyard(v, geometry)
                },
            })
        });
        self.composer.overview(targets)
    }

    /// Drops every cached source store; the next resolution rebuilds.
    pub fn invalidate(&self) {
        self.cache.clear();
    }

    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
