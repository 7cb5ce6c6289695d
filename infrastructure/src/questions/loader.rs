//! Question JSON loader

use forecast_domain::{NumericRange, QuestionContext, QuestionKind, QuestionSpec, QuestionType};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum QuestionLoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Field '{0}' cannot be empty")]
    EmptyField(&'static str),

    #[error("Invalid question type: {0}. Must be one of binary, numeric, discrete, multiple_choice")]
    InvalidType(String),

    #[error("Numeric/Discrete questions require 'scaling' field")]
    MissingScaling,

    #[error("range_min ({min}) must be less than range_max ({max})")]
    InvalidRange { min: f64, max: f64 },

    #[error("Numeric/Discrete questions require 'open_lower_bound' and 'open_upper_bound' fields")]
    MissingBoundFlags,

    #[error("Discrete questions require 'inbound_outcome_count' of at least 1 in scaling")]
    MissingOutcomeCount,

    #[error("Multiple choice questions must have at least 2 distinct options")]
    TooFewOptions,

    #[error("{path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: Box<QuestionLoadError>,
    },
}

/// `scaling` object of a numeric or discrete question
#[derive(Debug, Clone, Deserialize)]
pub struct FileScaling {
    pub range_min: f64,
    pub range_max: f64,
    #[serde(default)]
    pub zero_point: Option<f64>,
    #[serde(default)]
    pub inbound_outcome_count: Option<usize>,
}

/// A question exactly as written in the JSON file
#[derive(Debug, Clone, Deserialize)]
pub struct FileQuestion {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub resolution_criteria: String,
    #[serde(default)]
    pub fine_print: String,
    #[serde(rename = "type", default)]
    pub question_type: String,
    #[serde(default)]
    pub scaling: Option<FileScaling>,
    #[serde(default)]
    pub open_lower_bound: Option<bool>,
    #[serde(default)]
    pub open_upper_bound: Option<bool>,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub unit: Option<String>,
}

impl FileQuestion {
    /// Validate into a question; `fallback_id` is used when the file has no `id`
    pub fn into_spec(self, fallback_id: u64) -> Result<QuestionSpec, QuestionLoadError> {
        for (field, value) in [
            ("title", &self.title),
            ("description", &self.description),
            ("resolution_criteria", &self.resolution_criteria),
            ("type", &self.question_type),
        ] {
            if value.trim().is_empty() {
                return Err(QuestionLoadError::EmptyField(field));
            }
        }

        let question_type: QuestionType = self
            .question_type
            .parse()
            .map_err(|_| QuestionLoadError::InvalidType(self.question_type.clone()))?;

        let kind = match question_type {
            QuestionType::Binary => QuestionKind::Binary,
            QuestionType::Numeric => QuestionKind::Numeric {
                range: self.range()?,
            },
            QuestionType::Discrete => {
                let range = self.range()?;
                let outcome_count = self
                    .scaling
                    .as_ref()
                    .and_then(|s| s.inbound_outcome_count)
                    .filter(|&n| n >= 1)
                    .ok_or(QuestionLoadError::MissingOutcomeCount)?;
                QuestionKind::Discrete {
                    range,
                    outcome_count,
                }
            }
            QuestionType::MultipleChoice => {
                let distinct: HashSet<&str> = self.options.iter().map(|o| o.trim()).collect();
                if distinct.len() < 2 || distinct.contains("") {
                    return Err(QuestionLoadError::TooFewOptions);
                }
                QuestionKind::MultipleChoice {
                    options: self.options.clone(),
                }
            }
        };

        let context = QuestionContext {
            description: self.description,
            resolution_criteria: self.resolution_criteria,
            fine_print: self.fine_print,
            unit: self.unit,
        };
        Ok(QuestionSpec::new(self.id.unwrap_or(fallback_id), self.title, kind).with_context(context))
    }

    fn range(&self) -> Result<NumericRange, QuestionLoadError> {
        let scaling = self.scaling.as_ref().ok_or(QuestionLoadError::MissingScaling)?;
        if !(scaling.range_min < scaling.range_max) {
            return Err(QuestionLoadError::InvalidRange {
                min: scaling.range_min,
                max: scaling.range_max,
            });
        }
        let (Some(open_lower), Some(open_upper)) = (self.open_lower_bound, self.open_upper_bound)
        else {
            return Err(QuestionLoadError::MissingBoundFlags);
        };
        Ok(NumericRange::closed(scaling.range_min, scaling.range_max)
            .with_open_lower(open_lower)
            .with_open_upper(open_upper)
            .with_zero_point(scaling.zero_point))
    }
}

/// Loads question files from disk
pub struct QuestionLoader;

impl QuestionLoader {
    /// Load one question file
    pub fn load(path: &Path, fallback_id: u64) -> Result<QuestionSpec, QuestionLoadError> {
        let content = std::fs::read_to_string(path).map_err(|source| QuestionLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let question = Self::parse(&content, fallback_id).map_err(|e| match e {
            QuestionLoadError::Json { source, .. } => QuestionLoadError::Json {
                path: path.to_path_buf(),
                source,
            },
            other => QuestionLoadError::Invalid {
                path: path.to_path_buf(),
                source: Box::new(other),
            },
        })?;
        debug!(
            "Loaded {} question {} from {}",
            question.question_type(),
            question.id,
            path.display()
        );
        Ok(question)
    }

    /// Load several files; files without an `id` are numbered by position from 1
    pub fn load_all(paths: &[PathBuf]) -> Result<Vec<QuestionSpec>, QuestionLoadError> {
        paths
            .iter()
            .enumerate()
            .map(|(i, path)| Self::load(path, i as u64 + 1))
            .collect()
    }

    /// Parse question JSON text
    pub fn parse(content: &str, fallback_id: u64) -> Result<QuestionSpec, QuestionLoadError> {
        let question: FileQuestion =
            serde_json::from_str(content).map_err(|source| QuestionLoadError::Json {
                path: PathBuf::new(),
                source,
            })?;
        question.into_spec(fallback_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const BINARY: &str = r#"{
        "id": 42,
        "title": "Will the meeting happen?",
        "description": "Background",
        "resolution_criteria": "Resolves Yes if it happens",
        "type": "binary"
    }"#;

    fn numeric(extra: &str) -> String {
        format!(
            r#"{{
                "title": "How many?",
                "description": "Background",
                "resolution_criteria": "The count",
                "type": "numeric",
                "unit": "people"{extra}
            }}"#
        )
    }

    #[test]
    fn test_parse_binary() {
        let q = QuestionLoader::parse(BINARY, 1).unwrap();
        assert_eq!(q.id.0, 42);
        assert_eq!(q.question_type(), QuestionType::Binary);
        assert_eq!(q.context.fine_print, "");
    }

    #[test]
    fn test_parse_numeric_with_log_scaling() {
        let json = numeric(
            r#", "scaling": {"range_min": 1, "range_max": 1000, "zero_point": 0},
                "open_lower_bound": false, "open_upper_bound": true"#,
        );
        let q = QuestionLoader::parse(&json, 7).unwrap();
        assert_eq!(q.id.0, 7);
        let range = q.kind.range().unwrap();
        assert_eq!(range.lower, 1.0);
        assert_eq!(range.upper, 1000.0);
        assert!(!range.open_lower && range.open_upper);
        assert_eq!(range.zero_point, Some(0.0));
        assert_eq!(q.context.unit.as_deref(), Some("people"));
    }

    #[test]
    fn test_numeric_rules() {
        let missing_scaling = numeric(r#", "open_lower_bound": false, "open_upper_bound": false"#);
        assert!(matches!(
            QuestionLoader::parse(&missing_scaling, 1),
            Err(QuestionLoadError::MissingScaling)
        ));

        let inverted = numeric(
            r#", "scaling": {"range_min": 10, "range_max": 10},
                "open_lower_bound": false, "open_upper_bound": false"#,
        );
        assert!(matches!(
            QuestionLoader::parse(&inverted, 1),
            Err(QuestionLoadError::InvalidRange { .. })
        ));

        let no_flags = numeric(r#", "scaling": {"range_min": 0, "range_max": 10}"#);
        assert!(matches!(
            QuestionLoader::parse(&no_flags, 1),
            Err(QuestionLoadError::MissingBoundFlags)
        ));
    }

    #[test]
    fn test_discrete_requires_outcome_count() {
        let base = r#"{
            "title": "Goals?", "description": "d", "resolution_criteria": "r",
            "type": "discrete", "open_lower_bound": false, "open_upper_bound": false,
            "scaling": {"range_min": -0.5, "range_max": 10.5 OUTCOMES}
        }"#;
        let without = base.replace(" OUTCOMES", "");
        assert!(matches!(
            QuestionLoader::parse(&without, 1),
            Err(QuestionLoadError::MissingOutcomeCount)
        ));

        let with = base.replace(" OUTCOMES", r#", "inbound_outcome_count": 11"#);
        let q = QuestionLoader::parse(&with, 1).unwrap();
        assert_eq!(q.kind.cdf_size(), Some(12));
    }

    #[test]
    fn test_multiple_choice_rules() {
        let json = |options: &str| {
            format!(
                r#"{{"title": "Who?", "description": "d", "resolution_criteria": "r",
                    "type": "multiple_choice", "options": {options}}}"#
            )
        };
        let q = QuestionLoader::parse(&json(r#"["Red", "Blue", "Green"]"#), 1).unwrap();
        assert_eq!(q.kind.options().unwrap(), ["Red", "Blue", "Green"]);

        assert!(matches!(
            QuestionLoader::parse(&json(r#"["Red"]"#), 1),
            Err(QuestionLoadError::TooFewOptions)
        ));
        assert!(matches!(
            QuestionLoader::parse(&json(r#"["Red", "Red"]"#), 1),
            Err(QuestionLoadError::TooFewOptions)
        ));
    }

    #[test]
    fn test_empty_and_invalid_fields() {
        let empty = BINARY.replace("Background", " ");
        assert!(matches!(
            QuestionLoader::parse(&empty, 1),
            Err(QuestionLoadError::EmptyField("description"))
        ));

        let bad_type = BINARY.replace("\"binary\"", "\"date\"");
        assert!(matches!(
            QuestionLoader::parse(&bad_type, 1),
            Err(QuestionLoadError::InvalidType(t)) if t == "date"
        ));
    }

    #[test]
    fn test_load_all_numbers_missing_ids() {
        let dir = tempfile::tempdir().unwrap();
        let with_id = dir.path().join("a.json");
        fs::write(&with_id, BINARY).unwrap();
        let without_id = dir.path().join("b.json");
        fs::write(&without_id, BINARY.replace("\"id\": 42,", "")).unwrap();

        let questions = QuestionLoader::load_all(&[with_id, without_id]).unwrap();
        assert_eq!(questions[0].id.0, 42);
        assert_eq!(questions[1].id.0, 2);
    }

    #[test]
    fn test_load_errors_carry_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            QuestionLoader::load(&missing, 1),
            Err(QuestionLoadError::Io { .. })
        ));

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{ not json").unwrap();
        let err = QuestionLoader::load(&broken, 1).unwrap_err();
        assert!(err.to_string().contains("broken.json"));

        let invalid = dir.path().join("invalid.json");
        fs::write(&invalid, BINARY.replace("\"binary\"", "\"date\"")).unwrap();
        let err = QuestionLoader::load(&invalid, 1).unwrap_err();
        assert!(matches!(err, QuestionLoadError::Invalid { .. }));
        assert!(err.to_string().contains("invalid.json"));
    }
}
