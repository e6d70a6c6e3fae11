//! Assessment recommendations for free-text hiring queries.
//!
//! ```text
//! query ──► RecommendationService ──► QueryShortener (optional, bounded)
//!                  │                        │
//!                  │◄───── keywords or original query
//!                  ▼
//!              Embedder ──► AssessmentStore::search ──► CatalogEntry
//!                                                          │
//!                                    to_recommendation ◄───┘
//! ```
//!
//! The [`AssessmentStore`] pairs a CSV catalog with a flat vector index whose
//! row `i` describes catalog row `i`. Both are loaded once at startup and only
//! read afterwards.

pub mod catalog;
pub mod config;
pub mod embedding;
pub mod error;
pub mod handlers;
pub mod index;
pub mod models;
pub mod normalize;
pub mod preprocess;
pub mod service;
pub mod store;

pub use catalog::{Catalog, CatalogColumns};
pub use config::RecommenderOptions;
pub use embedding::{Embedder, EmbeddingConfig, OpenAiEmbedder};
pub use error::{RecommendError, RecommendResult};
pub use handlers::ApiDoc;
pub use index::{FlatIndex, Hit, MetricType};
pub use models::{
    CatalogEntry, Recommendation, RecommendRequest, RecommendResponse, SupportFlag, TestType,
    TestTypeFallback,
};
pub use normalize::{
    DEFAULT_TEST_TYPE, DEFAULT_TOP_K, MAX_TOP_K, MIN_TOP_K, effective_top_k, map_test_types,
    normalize_duration, normalize_flag,
};
pub use preprocess::{GeminiConfig, GeminiShortener, PassthroughShortener, QueryShortener};
pub use service::RecommendationService;
pub use store::{AssessmentStore, Neighbor, StoreConfig};
