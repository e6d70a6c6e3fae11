use std::path::PathBuf;

use core_config::{ConfigError, FromEnv, env_or_default};
use tracing::{info, instrument};

use crate::catalog::{Catalog, CatalogColumns};
use crate::error::{RecommendError, RecommendResult};
use crate::index::{FlatIndex, MetricType};
use crate::models::CatalogEntry;

/// Locations of the paired catalog and index artifacts
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub catalog_path: PathBuf,
    pub index_path: PathBuf,
    pub columns: CatalogColumns,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("shl_catalog_detailed.csv"),
            index_path: PathBuf::from("shl_assessments_index.faiss"),
            columns: CatalogColumns::default(),
        }
    }
}

impl FromEnv for StoreConfig {
    /// - CATALOG_PATH: defaults to shl_catalog_detailed.csv
    /// - INDEX_PATH: defaults to shl_assessments_index.faiss
    /// - CATALOG_COLUMN_*: header overrides
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            catalog_path: env_or_default("CATALOG_PATH", &defaults.catalog_path.to_string_lossy())
                .into(),
            index_path: env_or_default("INDEX_PATH", &defaults.index_path.to_string_lossy())
                .into(),
            columns: CatalogColumns::from_env()?,
        })
    }
}

/// A catalog row matched by a search
#[derive(Debug, Clone, Copy)]
pub struct Neighbor<'a> {
    pub row: usize,
    pub distance: f32,
    pub entry: &'a CatalogEntry,
}

/// Catalog and vector index loaded as one unit.
///
/// Construction guarantees both hold the same number of rows, so every index
/// hit resolves to a catalog entry. Read-only after construction.
#[derive(Debug)]
pub struct AssessmentStore {
    catalog: Catalog,
    index: FlatIndex,
}

impl AssessmentStore {
    pub fn new(catalog: Catalog, index: FlatIndex) -> RecommendResult<Self> {
        if catalog.len() != index.len() {
            return Err(RecommendError::Integrity(format!(
                "catalog has {} rows but index holds {} vectors",
                catalog.len(),
                index.len()
            )));
        }
        if catalog.is_empty() {
            return Err(RecommendError::Catalog("catalog is empty".to_string()));
        }

        Ok(Self { catalog, index })
    }

    /// Read both artifacts from disk. Blocking; call from `spawn_blocking`
    /// inside a runtime.
    #[instrument(skip_all, fields(
        catalog = %config.catalog_path.display(),
        index = %config.index_path.display(),
    ))]
    pub fn load(config: &StoreConfig) -> RecommendResult<Self> {
        let catalog = Catalog::from_path(&config.catalog_path, &config.columns)?;
        let index = FlatIndex::from_path(&config.index_path)?;
        let store = Self::new(catalog, index)?;

        info!(
            entries = store.len(),
            dimension = store.dimension(),
            metric = ?store.metric(),
            "Assessment store loaded"
        );
        Ok(store)
    }

    /// Nearest catalog entries for `vector`, best first.
    pub fn search(&self, vector: &[f32], k: usize) -> RecommendResult<Vec<Neighbor<'_>>> {
        self.index
            .search(vector, k)?
            .into_iter()
            .map(|hit| {
                let entry = self.catalog.row_at(hit.row).ok_or_else(|| {
                    RecommendError::Integrity(format!(
                        "index returned row {} but catalog has {} rows",
                        hit.row,
                        self.catalog.len()
                    ))
                })?;
                Ok(Neighbor {
                    row: hit.row,
                    distance: hit.distance,
                    entry,
                })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.index.dimension()
    }

    pub fn metric(&self) -> MetricType {
        self.index.metric()
    }
}
