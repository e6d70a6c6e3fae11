//! Pure field normalization from raw catalog values to response values.

use crate::models::{CatalogEntry, Recommendation, SupportFlag, TestType, TestTypeFallback};

pub const DEFAULT_TOP_K: usize = 5;
pub const MIN_TOP_K: usize = 1;
pub const MAX_TOP_K: usize = 10;

/// Resolve the requested result count: absent means [`DEFAULT_TOP_K`],
/// anything else is clamped to `[MIN_TOP_K, MAX_TOP_K]`.
pub fn effective_top_k(requested: Option<i64>) -> usize {
    match requested {
        None => DEFAULT_TOP_K,
        Some(k) => k.clamp(MIN_TOP_K as i64, MAX_TOP_K as i64) as usize,
    }
}

/// Minutes taken from the first contiguous run of ASCII digits, 0 if none.
///
/// `"Approximate Completion Time in minutes = 30"` yields 30, `"1-2 hours"`
/// yields 1. A run too large for `u32` saturates.
pub fn normalize_duration(raw: &str) -> u32 {
    let Some(start) = raw.find(|c: char| c.is_ascii_digit()) else {
        return 0;
    };
    let run = &raw[start..];
    let end = run.find(|c: char| !c.is_ascii_digit()).unwrap_or(run.len());

    run[..end].parse().unwrap_or(u32::MAX)
}

pub fn normalize_flag(raw: &str) -> SupportFlag {
    if raw.trim().eq_ignore_ascii_case("y") {
        SupportFlag::Yes
    } else {
        SupportFlag::No
    }
}

/// Label used when a row carries no usable test-type code.
pub const DEFAULT_TEST_TYPE: TestType = TestType::KnowledgeSkills;

/// Split whitespace-separated codes and map each to its label, preserving order
/// and duplicates. Unknown codes follow `fallback`.
///
/// The result is never empty: a blank field, or one whose codes were all
/// dropped, yields [`DEFAULT_TEST_TYPE`].
pub fn map_test_types(raw: &str, fallback: TestTypeFallback) -> Vec<String> {
    let labels: Vec<String> = raw
        .split_whitespace()
        .filter_map(|code| match TestType::from_code(code) {
            Some(test_type) => Some(test_type.label().to_string()),
            None => match fallback {
                TestTypeFallback::Passthrough => Some(code.to_string()),
                TestTypeFallback::Drop => None,
            },
        })
        .collect();

    if labels.is_empty() {
        vec![DEFAULT_TEST_TYPE.label().to_string()]
    } else {
        labels
    }
}

impl CatalogEntry {
    pub fn to_recommendation(&self, fallback: TestTypeFallback) -> Recommendation {
        Recommendation {
            url: self.url.clone(),
            adaptive_support: normalize_flag(&self.adaptive_irt),
            description: self.description.clone(),
            duration: normalize_duration(&self.duration),
            remote_support: normalize_flag(&self.remote_testing),
            test_type: map_test_types(&self.test_types, fallback),
        }
    }
}
