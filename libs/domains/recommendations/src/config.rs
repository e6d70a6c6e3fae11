use std::time::Duration;

use core_config::{ConfigError, FromEnv, env_flag, env_parse};

use crate::models::TestTypeFallback;

/// Request-path behavior of the recommendation service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommenderOptions {
    /// Rewrite queries through the configured shortener before embedding
    pub enable_preprocessing: bool,
    /// Upper bound on a single shortener call
    pub preprocess_timeout: Duration,
    pub test_type_fallback: TestTypeFallback,
}

impl Default for RecommenderOptions {
    fn default() -> Self {
        Self {
            enable_preprocessing: false,
            preprocess_timeout: Duration::from_millis(3000),
            test_type_fallback: TestTypeFallback::Passthrough,
        }
    }
}

impl FromEnv for RecommenderOptions {
    /// - PREPROCESSING_ENABLED: defaults to false
    /// - PREPROCESS_TIMEOUT_MS: defaults to 3000
    /// - TEST_TYPE_FALLBACK: `passthrough` (default) or `drop`
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let timeout_ms = env_parse(
            "PREPROCESS_TIMEOUT_MS",
            defaults.preprocess_timeout.as_millis() as u64,
        )?;
        if timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "PREPROCESS_TIMEOUT_MS must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            enable_preprocessing: env_flag("PREPROCESSING_ENABLED", defaults.enable_preprocessing)?,
            preprocess_timeout: Duration::from_millis(timeout_ms),
            test_type_fallback: env_parse("TEST_TYPE_FALLBACK", defaults.test_type_fallback)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 3] = [
        "PREPROCESSING_ENABLED",
        "PREPROCESS_TIMEOUT_MS",
        "TEST_TYPE_FALLBACK",
    ];

    #[test]
    fn test_defaults_when_unset() {
        temp_env::with_vars_unset(VARS, || {
            assert_eq!(
                RecommenderOptions::from_env().unwrap(),
                RecommenderOptions::default()
            );
        });
    }

    #[test]
    fn test_reads_values() {
        temp_env::with_vars(
            [
                ("PREPROCESSING_ENABLED", Some("true")),
                ("PREPROCESS_TIMEOUT_MS", Some("750")),
                ("TEST_TYPE_FALLBACK", Some("Drop")),
            ],
            || {
                let options = RecommenderOptions::from_env().unwrap();
                assert!(options.enable_preprocessing);
                assert_eq!(options.preprocess_timeout, Duration::from_millis(750));
                assert_eq!(options.test_type_fallback, TestTypeFallback::Drop);
            },
        );
    }

    #[test]
    fn test_rejects_unknown_fallback() {
        temp_env::with_vars(
            [
                ("PREPROCESSING_ENABLED", None),
                ("PREPROCESS_TIMEOUT_MS", None),
                ("TEST_TYPE_FALLBACK", Some("ignore")),
            ],
            || {
                let err = RecommenderOptions::from_env().unwrap_err();
                assert!(err.to_string().contains("TEST_TYPE_FALLBACK"));
            },
        );
    }

    #[test]
    fn test_rejects_zero_timeout() {
        temp_env::with_var("PREPROCESS_TIMEOUT_MS", Some("0"), || {
            assert!(RecommenderOptions::from_env().is_err());
        });
    }
}
