//! Exact (flat) nearest-neighbour index read from the FAISS `IndexFlat`
//! on-disk format.
//!
//! Layout, all little-endian:
//!
//! ```text
//! fourcc   [u8; 4]   "IxF2" (L2) | "IxFI" (inner product) | "IxFl"
//! d        i32       vector dimension
//! ntotal   i64       number of vectors
//! dummy    i64 x 2
//! trained  u8
//! metric   i32       0 = inner product, 1 = L2
//! count    u64       number of f32 that follow, d * ntotal
//! data     f32 x count
//! ```

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::debug;

use crate::error::{RecommendError, RecommendResult};

const FOURCC_L2: [u8; 4] = *b"IxF2";
const FOURCC_INNER_PRODUCT: [u8; 4] = *b"IxFI";
const FOURCC_FLAT: [u8; 4] = *b"IxFl";

/// Distance metric of a flat index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MetricType {
    /// Higher is closer
    InnerProduct,
    /// Squared euclidean distance, lower is closer
    #[default]
    L2,
}

impl MetricType {
    fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(MetricType::InnerProduct),
            1 => Some(MetricType::L2),
            _ => None,
        }
    }

    fn score(&self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            MetricType::InnerProduct => a.iter().zip(b).map(|(x, y)| x * y).sum(),
            MetricType::L2 => a
                .iter()
                .zip(b)
                .map(|(x, y)| {
                    let d = x - y;
                    d * d
                })
                .sum(),
        }
    }
}

/// A single search hit: catalog row plus its distance (or similarity).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub row: usize,
    pub distance: f32,
}

#[derive(Debug, Clone)]
pub struct FlatIndex {
    dimension: usize,
    metric: MetricType,
    data: Vec<f32>,
}

impl FlatIndex {
    pub fn new(dimension: usize, metric: MetricType, data: Vec<f32>) -> RecommendResult<Self> {
        if dimension == 0 {
            return Err(RecommendError::Index("dimension must be positive".to_string()));
        }
        if data.len() % dimension != 0 {
            return Err(RecommendError::Index(format!(
                "{} values do not divide into vectors of dimension {}",
                data.len(),
                dimension
            )));
        }

        Ok(Self {
            dimension,
            metric,
            data,
        })
    }

    pub fn from_path(path: &Path) -> RecommendResult<Self> {
        let file = File::open(path).map_err(|e| {
            RecommendError::Index(format!("cannot open {}: {}", path.display(), e))
        })?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(mut reader: R) -> RecommendResult<Self> {
        let fourcc: [u8; 4] = read_array(&mut reader)?;
        if ![FOURCC_L2, FOURCC_INNER_PRODUCT, FOURCC_FLAT].contains(&fourcc) {
            return Err(RecommendError::Index(format!(
                "unsupported index type '{}', only flat indexes can be read",
                String::from_utf8_lossy(&fourcc)
            )));
        }

        let dimension = i32::from_le_bytes(read_array(&mut reader)?);
        let ntotal = i64::from_le_bytes(read_array(&mut reader)?);
        let _dummy: [u8; 16] = read_array(&mut reader)?;
        let _is_trained: [u8; 1] = read_array(&mut reader)?;
        let raw_metric = i32::from_le_bytes(read_array(&mut reader)?);

        let metric = MetricType::from_raw(raw_metric).ok_or_else(|| {
            RecommendError::Index(format!("unsupported metric type {}", raw_metric))
        })?;
        let dimension = usize::try_from(dimension)
            .ok()
            .filter(|d| *d > 0)
            .ok_or_else(|| RecommendError::Index(format!("invalid dimension {}", dimension)))?;
        let ntotal = usize::try_from(ntotal)
            .map_err(|_| RecommendError::Index(format!("invalid vector count {}", ntotal)))?;

        let count = u64::from_le_bytes(read_array(&mut reader)?);
        let expected = dimension
            .checked_mul(ntotal)
            .ok_or_else(|| RecommendError::Index("vector count overflows".to_string()))?;
        if usize::try_from(count).ok() != Some(expected) {
            return Err(RecommendError::Index(format!(
                "header declares {} vectors of dimension {} but payload holds {} values",
                ntotal, dimension, count
            )));
        }

        let byte_len = expected
            .checked_mul(size_of::<f32>())
            .ok_or_else(|| RecommendError::Index("vector payload overflows".to_string()))?;
        let mut bytes = Vec::new();
        reader
            .take(byte_len as u64)
            .read_to_end(&mut bytes)
            .map_err(|e| RecommendError::Index(format!("failed to read vectors: {}", e)))?;
        if bytes.len() != byte_len {
            return Err(RecommendError::Index(format!(
                "truncated vector payload: expected {} bytes, found {}",
                byte_len,
                bytes.len()
            )));
        }

        let data = bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();

        debug!(dimension, vectors = ntotal, metric = ?metric, "Flat index read");
        Self::new(dimension, metric, data)
    }

    pub fn len(&self) -> usize {
        self.data.len() / self.dimension
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn metric(&self) -> MetricType {
        self.metric
    }

    /// Exhaustive k-nearest search. Returns `min(k, len)` hits, best first;
    /// equal distances are ordered by row.
    pub fn search(&self, query: &[f32], k: usize) -> RecommendResult<Vec<Hit>> {
        if query.len() != self.dimension {
            return Err(RecommendError::Integrity(format!(
                "query vector has dimension {}, index expects {}",
                query.len(),
                self.dimension
            )));
        }

        let mut hits: Vec<Hit> = self
            .data
            .chunks_exact(self.dimension)
            .enumerate()
            .map(|(row, vector)| Hit {
                row,
                distance: self.metric.score(query, vector),
            })
            .collect();

        match self.metric {
            MetricType::L2 => hits.sort_by(|a, b| {
                a.distance.total_cmp(&b.distance).then(a.row.cmp(&b.row))
            }),
            MetricType::InnerProduct => hits.sort_by(|a, b| {
                b.distance.total_cmp(&a.distance).then(a.row.cmp(&b.row))
            }),
        }
        hits.truncate(k);

        Ok(hits)
    }
}

fn read_array<const N: usize, R: Read>(reader: &mut R) -> RecommendResult<[u8; N]> {
    let mut buf = [0u8; N];
    reader
        .read_exact(&mut buf)
        .map_err(|e| RecommendError::Index(format!("truncated index header: {}", e)))?;
    Ok(buf)
}
