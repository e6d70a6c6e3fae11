use std::sync::Arc;
use std::time::Instant;

use observability::{PreprocessOutcome, RecommendationMetrics, RequestOutcome};
use tracing::{debug, instrument, warn};

use crate::config::RecommenderOptions;
use crate::embedding::Embedder;
use crate::error::{RecommendError, RecommendResult};
use crate::models::Recommendation;
use crate::normalize::effective_top_k;
use crate::preprocess::{MAX_KEYWORDS, PassthroughShortener, QueryShortener, truncate_keywords};
use crate::store::AssessmentStore;

/// Recommendation pipeline: validate, clamp, optionally shorten, embed,
/// search, project.
///
/// Holds no mutable state, so one instance is shared by every request.
#[derive(Clone)]
pub struct RecommendationService {
    store: Arc<AssessmentStore>,
    embedder: Arc<dyn Embedder>,
    shortener: Arc<dyn QueryShortener>,
    options: RecommenderOptions,
}

impl RecommendationService {
    pub fn new(
        store: Arc<AssessmentStore>,
        embedder: Arc<dyn Embedder>,
        options: RecommenderOptions,
    ) -> Self {
        Self {
            store,
            embedder,
            shortener: Arc::new(PassthroughShortener),
            options,
        }
    }

    /// Use `shortener` for query preprocessing when it is enabled.
    pub fn with_shortener(mut self, shortener: Arc<dyn QueryShortener>) -> Self {
        self.shortener = shortener;
        self
    }

    /// Top assessments for `query`, best match first.
    ///
    /// An empty or whitespace-only query fails with
    /// [`RecommendError::Validation`] before any embedding work.
    #[instrument(skip(self, query), fields(query_len = query.len(), top_k = ?top_k))]
    pub async fn recommend(
        &self,
        query: &str,
        top_k: Option<i64>,
    ) -> RecommendResult<Vec<Recommendation>> {
        let result = self.run(query, top_k).await;

        match &result {
            Ok(recommendations) => {
                RecommendationMetrics::record_request(RequestOutcome::Success, recommendations.len())
            }
            Err(RecommendError::Validation(_)) => {
                RecommendationMetrics::record_request(RequestOutcome::Rejected, 0)
            }
            Err(_) => RecommendationMetrics::record_request(RequestOutcome::Failed, 0),
        }

        result
    }

    async fn run(&self, query: &str, top_k: Option<i64>) -> RecommendResult<Vec<Recommendation>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(RecommendError::Validation(
                "query must not be empty".to_string(),
            ));
        }

        let k = effective_top_k(top_k);
        let search_text = self.preprocess(query).await;

        let started = Instant::now();
        let vector = self.embedder.encode(&search_text).await?;
        RecommendationMetrics::record_embedding(started.elapsed());

        let neighbors = self.store.search(&vector, k)?;
        debug!(k, hits = neighbors.len(), "Index searched");

        let fallback = self.options.test_type_fallback;
        Ok(neighbors
            .iter()
            .map(|neighbor| neighbor.entry.to_recommendation(fallback))
            .collect())
    }

    /// Text to embed for `query`.
    ///
    /// With preprocessing enabled the shortener gets at most
    /// `preprocess_timeout`; on error, timeout or an empty answer the
    /// original query is used. Never fails.
    pub async fn preprocess(&self, query: &str) -> String {
        if !self.options.enable_preprocessing {
            return query.to_string();
        }

        let timeout = self.options.preprocess_timeout;
        match tokio::time::timeout(timeout, self.shortener.shorten(query)).await {
            Ok(Ok(text)) => {
                let keywords = truncate_keywords(&text, MAX_KEYWORDS);
                if keywords.is_empty() {
                    warn!("Query preprocessing returned nothing, using original query");
                    RecommendationMetrics::record_preprocessing(PreprocessOutcome::Fallback);
                    return query.to_string();
                }
                debug!(keywords = %keywords, "Query preprocessed");
                RecommendationMetrics::record_preprocessing(PreprocessOutcome::Applied);
                keywords
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Query preprocessing failed, using original query");
                RecommendationMetrics::record_preprocessing(PreprocessOutcome::Fallback);
                query.to_string()
            }
            Err(_) => {
                warn!(
                    timeout_ms = timeout.as_millis() as u64,
                    "Query preprocessing timed out, using original query"
                );
                RecommendationMetrics::record_preprocessing(PreprocessOutcome::TimedOut);
                query.to_string()
            }
        }
    }

    /// Check the embedder answers and produces vectors the index can search.
    pub async fn probe_embedder(&self) -> RecommendResult<()> {
        let vector = self.embedder.encode("readiness probe").await?;
        if vector.len() != self.store.dimension() {
            return Err(RecommendError::Integrity(format!(
                "embedder produces {}-dimensional vectors, index expects {}",
                vector.len(),
                self.store.dimension()
            )));
        }
        Ok(())
    }
}
