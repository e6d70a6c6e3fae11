use std::fs::File;
use std::io::Read;
use std::path::Path;

use core_config::{ConfigError, FromEnv, env_or_default};
use tracing::{debug, warn};

use crate::error::{RecommendError, RecommendResult};
use crate::models::CatalogEntry;

/// Maps each logical catalog field to the CSV header it is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogColumns {
    pub url: String,
    pub description: String,
    pub duration: String,
    pub remote_testing: String,
    pub adaptive_irt: String,
    pub test_types: String,
}

impl Default for CatalogColumns {
    fn default() -> Self {
        Self {
            url: "URL".to_string(),
            description: "Individual Test Solutions".to_string(),
            duration: "Assessment Length".to_string(),
            remote_testing: "Remote Testing (y/n)".to_string(),
            adaptive_irt: "Adaptive/IRT (y/n)".to_string(),
            test_types: "Test Type".to_string(),
        }
    }
}

impl FromEnv for CatalogColumns {
    /// Each header can be overridden through `CATALOG_COLUMN_*`.
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            url: env_or_default("CATALOG_COLUMN_URL", &defaults.url),
            description: env_or_default("CATALOG_COLUMN_DESCRIPTION", &defaults.description),
            duration: env_or_default("CATALOG_COLUMN_DURATION", &defaults.duration),
            remote_testing: env_or_default("CATALOG_COLUMN_REMOTE", &defaults.remote_testing),
            adaptive_irt: env_or_default("CATALOG_COLUMN_ADAPTIVE", &defaults.adaptive_irt),
            test_types: env_or_default("CATALOG_COLUMN_TEST_TYPE", &defaults.test_types),
        })
    }
}

/// Ordered assessment records. Row `i` pairs with vector `i` of the index.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    pub fn from_path(path: &Path, columns: &CatalogColumns) -> RecommendResult<Self> {
        let file = File::open(path).map_err(|e| {
            RecommendError::Catalog(format!("cannot open {}: {}", path.display(), e))
        })?;
        Self::from_reader(file, columns)
    }

    /// Parse a headed CSV. `url` and `description` columns are required;
    /// other missing columns read as empty strings for every row.
    pub fn from_reader<R: Read>(reader: R, columns: &CatalogColumns) -> RecommendResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let position = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
        };

        let required = |name: &str| {
            position(name).ok_or_else(|| {
                RecommendError::Catalog(format!("missing required column '{}'", name))
            })
        };
        let optional = |name: &str| {
            let idx = position(name);
            if idx.is_none() {
                warn!(column = name, "Catalog column missing, values default to empty");
            }
            idx
        };

        let url = required(columns.url.as_str())?;
        let description = required(columns.description.as_str())?;
        let duration = optional(columns.duration.as_str());
        let remote_testing = optional(columns.remote_testing.as_str());
        let adaptive_irt = optional(columns.adaptive_irt.as_str());
        let test_types = optional(columns.test_types.as_str());

        let mut entries = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = record
                .map_err(|e| RecommendError::Catalog(format!("row {}: {}", row, e)))?;
            let field = |idx: Option<usize>| {
                idx.and_then(|i| record.get(i))
                    .unwrap_or_default()
                    .to_string()
            };

            entries.push(CatalogEntry {
                url: field(Some(url)),
                description: field(Some(description)),
                duration: field(duration),
                remote_testing: field(remote_testing),
                adaptive_irt: field(adaptive_irt),
                test_types: field(test_types),
            });
        }

        debug!(rows = entries.len(), "Catalog parsed");
        Ok(Self { entries })
    }

    pub fn row_at(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
Individual Test Solutions,URL,Remote Testing (y/n),Adaptive/IRT (y/n),Test Type,Assessment Length
Java 8 (New),https://example.com/java-8,y,n,K,Approximate Completion Time in minutes = 18
\"OPQ32r, Personality\",https://example.com/opq,y,y,P,25
Verify Numerical,https://example.com/verify,n,y,A,
";

    #[test]
    fn test_parses_rows_in_file_order() {
        let catalog = Catalog::from_reader(CSV.as_bytes(), &CatalogColumns::default()).unwrap();

        assert_eq!(catalog.len(), 3);
        let first = catalog.row_at(0).unwrap();
        assert_eq!(first.description, "Java 8 (New)");
        assert_eq!(first.url, "https://example.com/java-8");
        assert_eq!(first.remote_testing, "y");
        assert_eq!(first.test_types, "K");

        assert_eq!(catalog.row_at(1).unwrap().description, "OPQ32r, Personality");
        assert_eq!(catalog.row_at(2).unwrap().duration, "");
        assert!(catalog.row_at(3).is_none());
    }

    #[test]
    fn test_missing_required_column_fails() {
        let csv = "Name,Link\nJava,https://example.com\n";
        let err = Catalog::from_reader(csv.as_bytes(), &CatalogColumns::default()).unwrap_err();
        assert!(matches!(err, RecommendError::Catalog(ref msg) if msg.contains("URL")));
    }

    #[test]
    fn test_missing_optional_column_reads_empty() {
        let csv = "URL,Individual Test Solutions\nhttps://example.com/a,A\n";
        let catalog = Catalog::from_reader(csv.as_bytes(), &CatalogColumns::default()).unwrap();
        let entry = catalog.row_at(0).unwrap();
        assert_eq!(entry.test_types, "");
        assert_eq!(entry.remote_testing, "");
    }

    #[test]
    fn test_custom_column_names() {
        let columns = CatalogColumns {
            url: "link".into(),
            description: "name".into(),
            ..Default::default()
        };
        let csv = "name,link\nVerify,https://example.com/v\n";
        let catalog = Catalog::from_reader(csv.as_bytes(), &columns).unwrap();
        assert_eq!(catalog.row_at(0).unwrap().url, "https://example.com/v");
    }

    #[test]
    fn test_short_row_is_padded() {
        let csv = "URL,Individual Test Solutions,Test Type\nhttps://example.com/a,A\n";
        let catalog = Catalog::from_reader(csv.as_bytes(), &CatalogColumns::default()).unwrap();
        assert_eq!(catalog.row_at(0).unwrap().test_types, "");
    }

    #[test]
    fn test_columns_from_env() {
        temp_env::with_vars(
            [
                ("CATALOG_COLUMN_URL", Some("link")),
                ("CATALOG_COLUMN_TEST_TYPE", None::<&str>),
            ],
            || {
                let columns = CatalogColumns::from_env().unwrap();
                assert_eq!(columns.url, "link");
                assert_eq!(columns.test_types, "Test Type");
            },
        );
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = Catalog::from_path(Path::new("/nonexistent/catalog.csv"), &CatalogColumns::default())
            .unwrap_err();
        assert!(matches!(err, RecommendError::Catalog(_)));
    }
}
