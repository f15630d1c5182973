//! Engine configuration.
//!
//! All tunables live in [`FathomConfig`]. Every section implements `Default`,
//! and the whole structure can be loaded from a JSON file where missing keys
//! fall back to their defaults.
//!
//! ```
//! use fathom::config::FathomConfig;
//!
//! let config: FathomConfig = serde_json::from_str(r#"{"max_query_terms": 5}"#).unwrap();
//! assert_eq!(config.max_query_terms, 5);
//! assert_eq!(config.field_weights.title, 10.0);
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::document::Field;
use crate::error::{FathomError, Result};

/// Static importance weights of the indexed fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldWeights {
    pub title: f64,
    pub headings: f64,
    pub text: f64,
}

impl Default for FieldWeights {
    fn default() -> Self {
        FieldWeights {
            title: 10.0,
            headings: 3.0,
            text: 1.0,
        }
    }
}

impl FieldWeights {
    /// Weight configured for the given field.
    pub fn weight(&self, field: Field) -> f64 {
        match field {
            Field::Title => self.title,
            Field::Headings => self.headings,
            Field::Text => self.text,
        }
    }
}

/// Spelling fallback configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpellingConfig {
    /// Suggestions are attempted when the top result's reported score is at or
    /// below this value, or when there are no results. Heuristic, not derived.
    pub threshold: f64,
    /// Maximum edit distance for a suggestion.
    pub max_distance: usize,
    /// Maximum number of candidates the model ranks per term.
    pub max_suggestions: usize,
}

impl Default for SpellingConfig {
    fn default() -> Self {
        SpellingConfig {
            threshold: 0.6,
            max_distance: 2,
            max_suggestions: 5,
        }
    }
}

/// HITS iteration and score blending configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkAnalysisConfig {
    /// Upper bound on refinement rounds.
    pub max_iterations: usize,
    /// Convergence tolerance on the L1 change of both score vectors.
    pub tolerance: f64,
    /// Multiplier on the max-scaled authority score when blending.
    pub authority_weight: f64,
    /// Multiplier on the max-scaled hub score when blending.
    pub hub_weight: f64,
}

impl Default for LinkAnalysisConfig {
    fn default() -> Self {
        LinkAnalysisConfig {
            max_iterations: 50,
            tolerance: 1e-6,
            authority_weight: 1.0,
            hub_weight: 0.25,
        }
    }
}

/// Top-level configuration for the search engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FathomConfig {
    pub field_weights: FieldWeights,
    /// Maximum number of distinct terms a query may contain.
    pub max_query_terms: usize,
    /// Maximum number of results returned to callers of the service.
    pub max_results: usize,
    pub spelling: SpellingConfig,
    pub link_analysis: LinkAnalysisConfig,
}

impl Default for FathomConfig {
    fn default() -> Self {
        FathomConfig {
            field_weights: FieldWeights::default(),
            max_query_terms: 10,
            max_results: 100,
            spelling: SpellingConfig::default(),
            link_analysis: LinkAnalysisConfig::default(),
        }
    }
}

impl FathomConfig {
    /// Load a configuration from a JSON file and validate it.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            FathomError::invalid_config(format!(
                "Failed to read configuration file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: FathomConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        for field in Field::ALL {
            let weight = self.field_weights.weight(field);
            if !(weight.is_finite() && weight > 0.0) {
                return Err(FathomError::invalid_config(format!(
                    "field weight for {field} must be positive, got {weight}"
                )));
            }
        }

        if self.max_query_terms == 0 {
            return Err(FathomError::invalid_config(
                "max_query_terms must be at least 1",
            ));
        }

        if self.max_results == 0 {
            return Err(FathomError::invalid_config("max_results must be at least 1"));
        }

        let link = &self.link_analysis;
        if link.max_iterations == 0 || !(link.tolerance >= 0.0) {
            return Err(FathomError::invalid_config(
                "link analysis needs at least one iteration and a non-negative tolerance",
            ));
        }
        if !(link.authority_weight >= 0.0 && link.hub_weight >= 0.0) {
            return Err(FathomError::invalid_config(
                "link analysis blend weights must be non-negative",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = FathomConfig::default();
        assert_eq!(config.field_weights.weight(Field::Title), 10.0);
        assert_eq!(config.field_weights.weight(Field::Headings), 3.0);
        assert_eq!(config.field_weights.weight(Field::Text), 1.0);
        assert_eq!(config.max_query_terms, 10);
        assert_eq!(config.spelling.threshold, 0.6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"field_weights": {{"title": 20.0}}, "spelling": {{"threshold": 0.4}}}}"#
        )
        .unwrap();
        file.flush().unwrap();

        let config = FathomConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.field_weights.title, 20.0);
        assert_eq!(config.field_weights.headings, 3.0);
        assert_eq!(config.spelling.threshold, 0.4);
        assert_eq!(config.spelling.max_distance, 2);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = FathomConfig::default();
        config.field_weights.text = 0.0;
        assert!(matches!(
            config.validate(),
            Err(FathomError::InvalidConfig(_))
        ));

        let mut config = FathomConfig::default();
        config.max_query_terms = 0;
        assert!(config.validate().is_err());

        let mut config = FathomConfig::default();
        config.link_analysis.tolerance = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file() {
        let result = FathomConfig::load_from_file("/nonexistent/fathom.json");
        assert!(matches!(result, Err(FathomError::InvalidConfig(_))));
    }
}
