//! Where each source partition lives on disk and how it is keyed.

use std::fmt;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::config::GeoConfig;
use crate::identifier::SourceKey;

use super::traits::{DatasetReader, TableSpec};

const GEOMETRY_COLUMN: &str = "geometry";
const AVA_FILE: &str = "us_avas_combined.parquet";
const PREMIER_CRU_FILE: &str = "vineyards_premier_crus_inao.parquet";

/// One cacheable unit of source data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Partition {
    /// The national cadastral dataset.
    Cadastre,

    /// Administrative boundaries for one country, by uppercase ISO code.
    CountryBoundary {
        iso: String,
    },

    /// The synthetic US AVA dataset.
    Ava,

    /// Every vineyard file for a region slug, plus the premier-cru addendum
    /// when `premier_cru` is set.
    Vineyards {
        region: String,
        premier_cru: bool,
    },
}

impl Partition {
    /// Country partition for an ISO code (case-insensitive).
    #[must_use]
    pub fn country(iso: &str) -> Self {
        Self::CountryBoundary {
            iso: iso.to_ascii_uppercase(),
        }
    }

    /// Vineyard partition for a region, honoring the premier-cru split.
    ///
    /// The addendum file is included only for regions that ship one, and
    /// only when no appellation filter is given or the filter names a
    /// premier-cru appellation.
    #[must_use]
    pub fn vineyards(config: &GeoConfig, region: &str, appellation: Option<&str>) -> Self {
        let premier_cru = config.is_premier_cru_region(region)
            && appellation.map_or(true, |a| a.to_lowercase().contains("premier cru"));
        Self::Vineyards {
            region: region_slug(region),
            premier_cru,
        }
    }

    /// Short source name, for logs.
    #[must_use]
    pub const fn source_name(&self) -> &'static str {
        match self {
            Self::Cadastre => "cadastre",
            Self::CountryBoundary { .. } => "country_boundary",
            Self::Ava => "ava",
            Self::Vineyards { .. } => "vineyards",
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cadastre | Self::Ava => f.write_str(self.source_name()),
            Self::CountryBoundary { iso } => write!(f, "country_boundary:{iso}"),
            Self::Vineyards { region, premier_cru } => {
                write!(f, "vineyards:{region}")?;
                if *premier_cru {
                    f.write_str("+premier_cru")?;
                }
                Ok(())
            }
        }
    }
}

/// File-name slug for a region: lowercase, spaces and slashes to `_`.
///
/// ```
/// assert_eq!(winegeo::storage::region_slug("Côte / Chalonnaise"), "côte___chalonnaise");
/// assert_eq!(winegeo::storage::region_slug("Bourgogne"), "bourgogne");
/// ```
#[must_use]
pub fn region_slug(region: &str) -> String {
    region.to_lowercase().replace([' ', '/'], "_")
}

/// Maps partitions to files, table specs and key transforms.
#[derive(Debug, Clone)]
pub struct DatasetLayout {
    config: GeoConfig,
}

impl DatasetLayout {
    #[must_use]
    pub fn new(config: GeoConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &GeoConfig {
        &self.config
    }

    fn geo_dir(&self) -> PathBuf {
        self.config.data_dir.join("geo")
    }

    fn vineyard_dir(&self) -> PathBuf {
        self.geo_dir().join("vineyards")
    }

    /// Candidate file paths for a partition, whether or not they exist.
    /// Partitions backed by a directory scan are resolved by [`Self::files`].
    #[must_use]
    pub fn fixed_path(&self, partition: &Partition) -> Option<PathBuf> {
        match partition {
            Partition::Cadastre => {
                let slug = self.config.country_slug(&self.config.cadastre_marker);
                Some(self.geo_dir().join(format!("{slug}.parquet")))
            }
            Partition::CountryBoundary { iso } => {
                let slug = self.config.country_slug(iso);
                Some(self.geo_dir().join(format!("{slug}_pdo.parquet")))
            }
            Partition::Ava => Some(self.geo_dir().join(AVA_FILE)),
            Partition::Vineyards { .. } => None,
        }
    }

    /// Existing dataset files for a partition, sorted and deduplicated so
    /// every build merges them in the same order.
    #[must_use]
    pub fn files(&self, partition: &Partition, reader: &dyn DatasetReader) -> Vec<PathBuf> {
        let mut files = match partition {
            Partition::Vineyards { region, premier_cru } => {
                let dir = self.vineyard_dir();
                let mut files = regional_files(&dir, region, reader);
                if *premier_cru {
                    files.push(dir.join(PREMIER_CRU_FILE));
                }
                files
            }
            other => self.fixed_path(other).into_iter().collect(),
        };

        files.retain(|p| reader.exists(p));
        files.sort();
        files.dedup();
        files
    }

    /// Key and geometry columns for a partition.
    #[must_use]
    pub fn spec(&self, partition: &Partition) -> TableSpec {
        match partition {
            Partition::Cadastre => TableSpec::new(&["id_app"], GEOMETRY_COLUMN),
            Partition::CountryBoundary { .. } => {
                TableSpec::new(&["pdo_id", "osm_id"], GEOMETRY_COLUMN)
            }
            Partition::Ava => TableSpec::new(&["ava_id"], GEOMETRY_COLUMN),
            Partition::Vineyards { .. } => TableSpec::new(&["id", "vineyard_id"], GEOMETRY_COLUMN),
        }
    }

    /// Turns a raw dataset key into the key stored in the cache.
    ///
    /// AVA keys get the `US-AVA-` prefix here, once per build; empty or zero
    /// AVA ids are dropped. Other partitions keep their keys unchanged.
    #[must_use]
    pub fn store_key(&self, partition: &Partition, key: SourceKey) -> Option<SourceKey> {
        match partition {
            Partition::Ava => {
                let blank = match &key {
                    SourceKey::Int(v) => *v == 0,
                    SourceKey::Text(s) => s.trim().is_empty(),
                };
                if blank {
                    return None;
                }
                Some(SourceKey::Text(format!("{}{key}", self.config.ava_key_prefix())))
            }
            _ => Some(key),
        }
    }
}

fn regional_files(dir: &Path, region: &str, reader: &dyn DatasetReader) -> Vec<PathBuf> {
    if region.is_empty() {
        return Vec::new();
    }
    let Ok(pattern) = Regex::new(&format!(r"^{}_.*\.parquet$", regex::escape(region))) else {
        return Vec::new();
    };
    reader
        .list(dir)
        .into_iter()
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .map_or(false, |n| pattern.is_match(n))
        })
        .collect()
}
