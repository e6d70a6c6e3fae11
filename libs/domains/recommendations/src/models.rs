use serde::{Deserialize, Deserializer, Serialize, de};
use std::fmt;
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Rejects queries that are empty or whitespace only.
fn validate_query(query: &str) -> Result<(), validator::ValidationError> {
    if query.trim().is_empty() {
        let mut err = validator::ValidationError::new("blank_query");
        err.message = Some("query must not be empty".into());
        return Err(err);
    }
    Ok(())
}

/// Reads a result count from any JSON number or query-string numeral.
///
/// Values outside `i64` saturate to `i64::MIN`/`i64::MAX` so clamping still
/// applies to them. Fractions truncate toward zero. A blank query-string value
/// counts as absent.
fn lenient_top_k<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    struct TopKVisitor;

    impl<'de> de::Visitor<'de> for TopKVisitor {
        type Value = Option<i64>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an integer result count")
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
            deserializer.deserialize_any(TopKVisitor)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(i64::try_from(v).unwrap_or(i64::MAX)))
        }

        fn visit_i128<E: de::Error>(self, v: i128) -> Result<Self::Value, E> {
            Ok(Some(v.clamp(i64::MIN as i128, i64::MAX as i128) as i64))
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> Result<Self::Value, E> {
            Ok(Some(i64::try_from(v).unwrap_or(i64::MAX)))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            if v.is_nan() {
                return Err(E::invalid_value(de::Unexpected::Float(v), &self));
            }
            // float-to-int `as` saturates
            Ok(Some(v as i64))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            let raw = v.trim();
            if raw.is_empty() {
                return Ok(None);
            }
            if let Ok(k) = raw.parse::<i64>() {
                return Ok(Some(k));
            }

            let (negative, digits) = match raw.strip_prefix('-') {
                Some(rest) => (true, rest),
                None => (false, raw.strip_prefix('+').unwrap_or(raw)),
            };
            if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                return Ok(Some(if negative { i64::MIN } else { i64::MAX }));
            }

            match raw.parse::<f64>() {
                Ok(f) => de::Visitor::visit_f64(self, f),
                Err(_) => Err(E::invalid_value(de::Unexpected::Str(v), &self)),
            }
        }
    }

    deserializer.deserialize_any(TopKVisitor)
}

/// Normalized Yes/No support flag as exposed on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, ToSchema)]
pub enum SupportFlag {
    Yes,
    No,
}

/// Assessment categories keyed by their single-letter catalog code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestType {
    AbilityAptitude,
    BiodataSituationalJudgement,
    Competencies,
    Development360,
    AssessmentExercises,
    KnowledgeSkills,
    PersonalityBehaviour,
    Simulations,
}

impl TestType {
    pub const ALL: [TestType; 8] = [
        TestType::AbilityAptitude,
        TestType::BiodataSituationalJudgement,
        TestType::Competencies,
        TestType::Development360,
        TestType::AssessmentExercises,
        TestType::KnowledgeSkills,
        TestType::PersonalityBehaviour,
        TestType::Simulations,
    ];

    /// Codes are case-sensitive: `"k"` is not Knowledge & Skills.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }

    pub fn code(&self) -> &'static str {
        match self {
            TestType::AbilityAptitude => "A",
            TestType::BiodataSituationalJudgement => "B",
            TestType::Competencies => "C",
            TestType::Development360 => "D",
            TestType::AssessmentExercises => "E",
            TestType::KnowledgeSkills => "K",
            TestType::PersonalityBehaviour => "P",
            TestType::Simulations => "S",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TestType::AbilityAptitude => "Ability & Aptitude",
            TestType::BiodataSituationalJudgement => "Biodata & Situational Judgement",
            TestType::Competencies => "Competencies",
            TestType::Development360 => "Development & 360",
            TestType::AssessmentExercises => "Assessment Exercises",
            TestType::KnowledgeSkills => "Knowledge & Skills",
            TestType::PersonalityBehaviour => "Personality & Behaviour",
            TestType::Simulations => "Simulations",
        }
    }
}

/// What to do with a test-type code that has no known label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TestTypeFallback {
    /// Emit the raw code unchanged
    #[default]
    Passthrough,
    /// Leave the code out of the result
    Drop,
}

/// One catalog row, fields kept exactly as read from the CSV
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogEntry {
    pub url: String,
    pub description: String,
    pub duration: String,
    pub remote_testing: String,
    pub adaptive_irt: String,
    pub test_types: String,
}

/// A single normalized recommendation.
///
/// Field order is part of the response contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Recommendation {
    /// Assessment page URL
    pub url: String,
    pub adaptive_support: SupportFlag,
    /// Assessment name or description
    pub description: String,
    /// Length in minutes, 0 when the catalog gives none
    pub duration: u32,
    pub remote_support: SupportFlag,
    /// Human-readable test-type labels in catalog order
    pub test_type: Vec<String>,
}

/// Recommendation request, shared by the JSON body and the query string
#[derive(Debug, Clone, Deserialize, Validate, ToSchema, IntoParams)]
pub struct RecommendRequest {
    /// Free-text job description or hiring need
    #[serde(default)]
    #[validate(custom(function = "validate_query"))]
    #[schema(example = "Java developers who can collaborate with business teams")]
    pub query: String,

    /// Number of results; defaults to 5 and is clamped to [1, 10]
    #[serde(default, deserialize_with = "lenient_top_k")]
    #[param(minimum = 1, maximum = 10)]
    pub top_k: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecommendResponse {
    pub recommended_assessments: Vec<Recommendation>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_every_code_round_trips() {
        for test_type in TestType::ALL {
            assert_eq!(TestType::from_code(test_type.code()), Some(test_type));
        }
        assert_eq!(TestType::from_code("k"), None);
        assert_eq!(TestType::from_code("Z"), None);
    }

    #[test]
    fn test_fallback_parses_case_insensitively() {
        assert_eq!(TestTypeFallback::from_str("DROP").unwrap(), TestTypeFallback::Drop);
        assert_eq!(
            TestTypeFallback::from_str("passthrough").unwrap(),
            TestTypeFallback::Passthrough
        );
        assert!(TestTypeFallback::from_str("ignore").is_err());
        assert_eq!(TestTypeFallback::Drop.to_string(), "drop");
    }

    #[test]
    fn test_support_flag_serializes_as_words() {
        assert_eq!(serde_json::to_value(SupportFlag::Yes).unwrap(), "Yes");
        assert_eq!(serde_json::to_value(SupportFlag::No).unwrap(), "No");
    }

    #[test]
    fn test_recommendation_field_order() {
        let rec = Recommendation {
            url: "https://example.com/a".into(),
            adaptive_support: SupportFlag::No,
            description: "Java 8".into(),
            duration: 30,
            remote_support: SupportFlag::Yes,
            test_type: vec!["Knowledge & Skills".into()],
        };
        let json = serde_json::to_string(&rec).unwrap();
        let keys = [
            "\"url\"",
            "\"adaptive_support\"",
            "\"description\"",
            "\"duration\"",
            "\"remote_support\"",
            "\"test_type\"",
        ];
        let positions: Vec<usize> = keys.iter().map(|k| json.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{json}");
    }

    #[test]
    fn test_request_validation() {
        let blank: RecommendRequest = serde_json::from_str(r#"{"query": "   "}"#).unwrap();
        assert!(blank.validate().is_err());

        let missing: RecommendRequest = serde_json::from_str("{}").unwrap();
        assert!(missing.validate().is_err());

        let ok: RecommendRequest =
            serde_json::from_str(r#"{"query": "sales manager", "top_k": 3}"#).unwrap();
        assert!(ok.validate().is_ok());
        assert_eq!(ok.top_k, Some(3));
    }

    fn top_k_of(json: &str) -> Option<i64> {
        serde_json::from_str::<RecommendRequest>(json).unwrap().top_k
    }

    #[test]
    fn test_top_k_saturates_outside_i64() {
        assert_eq!(top_k_of(r#"{"query": "q", "top_k": 10000000000000000000}"#), Some(i64::MAX));
        assert_eq!(top_k_of(r#"{"query": "q", "top_k": 99999999999999999999}"#), Some(i64::MAX));
        assert_eq!(top_k_of(r#"{"query": "q", "top_k": -99999999999999999999}"#), Some(i64::MIN));
        assert_eq!(top_k_of(r#"{"query": "q", "top_k": 2.9}"#), Some(2));
        assert_eq!(top_k_of(r#"{"query": "q", "top_k": null}"#), None);
        assert_eq!(top_k_of(r#"{"query": "q"}"#), None);
    }

    #[test]
    fn test_top_k_accepts_numeric_strings() {
        assert_eq!(top_k_of(r#"{"query": "q", "top_k": "7"}"#), Some(7));
        assert_eq!(top_k_of(r#"{"query": "q", "top_k": "99999999999999999999"}"#), Some(i64::MAX));
        assert_eq!(top_k_of(r#"{"query": "q", "top_k": "-99999999999999999999"}"#), Some(i64::MIN));
        assert_eq!(top_k_of(r#"{"query": "q", "top_k": "1e3"}"#), Some(1000));
        assert_eq!(top_k_of(r#"{"query": "q", "top_k": ""}"#), None);
        assert!(serde_json::from_str::<RecommendRequest>(r#"{"query": "q", "top_k": "many"}"#).is_err());
        assert!(serde_json::from_str::<RecommendRequest>(r#"{"query": "q", "top_k": true}"#).is_err());
    }
}
