//! Recommendation pipeline metrics.

use metrics::{counter, gauge, histogram};
use std::time::Duration;

/// How a recommendation request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    Success,
    Rejected,
    Failed,
}

impl RequestOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Rejected => "rejected",
            Self::Failed => "failed",
        }
    }
}

/// What happened to the query in the preprocessing step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreprocessOutcome {
    Applied,
    Fallback,
    TimedOut,
}

impl PreprocessOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::Fallback => "fallback",
            Self::TimedOut => "timed_out",
        }
    }
}

/// Recommendation metrics recorder. All calls are no-ops until a recorder is installed.
pub struct RecommendationMetrics;

impl RecommendationMetrics {
    pub fn record_request(outcome: RequestOutcome, results: usize) {
        counter!("recommendations_requests_total", "outcome" => outcome.as_str()).increment(1);
        if outcome == RequestOutcome::Success {
            histogram!("recommendations_results_returned").record(results as f64);
        }
    }

    pub fn record_preprocessing(outcome: PreprocessOutcome) {
        counter!("query_preprocessing_total", "outcome" => outcome.as_str()).increment(1);
    }

    pub fn record_embedding(elapsed: Duration) {
        histogram!("embedding_duration_seconds").record(elapsed.as_secs_f64());
    }

    pub fn set_catalog_entries(count: usize) {
        gauge!("catalog_entries").set(count as f64);
    }
}
