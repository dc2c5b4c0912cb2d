//! The persisted model: a regressor plus the authoritative order of its
//! input columns.
//!
//! # JSON layout
//!
//! ```text
//! {
//!   "features": ["temperature", "relativehumidity", ...],
//!   "model": {"kind": "linear", "intercept": 4.2, "coefficients": [...]}
//! }
//! ```

use crate::error::{ModelError, Result};
use crate::regressor::Regressor;
use aq_features::{NextDayFeatures, SchemaMismatch};
use log::info;
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fs, path::Path};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Input column names, in the order the regressor reads them.
    pub features: Vec<String>,
    pub model: Regressor,
}

impl ModelArtifact {
    /// Parse and validate an artifact from its JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let artifact: ModelArtifact = serde_json::from_str(json)?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Read, parse and validate an artifact file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let artifact = Self::from_json(&fs::read_to_string(path)?)?;
        info!(
            "Loaded model artifact {} ({} features)",
            path.display(),
            artifact.features.len()
        );
        Ok(artifact)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Internal consistency: a non-empty, duplicate-free feature list that
    /// the regressor can be evaluated on.
    pub fn validate(&self) -> Result<()> {
        if self.features.is_empty() {
            return Err(ModelError::InvalidArtifact(
                "feature list is empty".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for name in &self.features {
            if !seen.insert(name.as_str()) {
                return Err(ModelError::InvalidArtifact(format!(
                    "feature {name:?} is listed twice"
                )));
            }
        }
        self.model
            .check_width(self.features.len())
            .map_err(ModelError::InvalidArtifact)
    }

    /// Predict from a vector already in `self.features` order.
    pub fn predict(&self, x: &[f64]) -> Result<f64> {
        if x.len() != self.features.len() {
            return Err(SchemaMismatch::Count {
                expected: self.features.len(),
                actual: x.len(),
            }
            .into());
        }
        self.model.predict(x).map_err(ModelError::InvalidArtifact)
    }

    /// Reorder the named features to this artifact's column order and predict.
    pub fn predict_next_day(&self, features: &NextDayFeatures) -> Result<f64> {
        let x = features.values_for(&self.features)?;
        self.predict(&x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regressor::TreeNode;
    use aq_features::FEATURE_COLUMNS;
    use chrono::NaiveDate;

    const LINEAR_JSON: &str = include_str!("../../fixtures/pm25_linear.json");
    const FOREST_JSON: &str = include_str!("../../fixtures/pm25_forest.json");

    fn features() -> NextDayFeatures {
        NextDayFeatures {
            anchor_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            target_date: NaiveDate::from_ymd_opt(2024, 1, 11).unwrap(),
            temperature: 1.0,
            relativehumidity: 2.0,
            windspeed: 3.0,
            pm25_lag_1: 4.0,
            pm25_lag_2: 5.0,
            pm25_lag_3: 6.0,
            pm25_lag_7: 7.0,
            pm25_ma_3: 8.0,
            dayofyear: 11,
        }
    }

    /// Linear model whose coefficient `i` is `10^i`, so the prediction
    /// encodes which value landed in which slot.
    fn positional_artifact(order: &[&str]) -> ModelArtifact {
        ModelArtifact {
            features: order.iter().map(|s| s.to_string()).collect(),
            model: Regressor::Linear {
                intercept: 0.0,
                coefficients: (0..order.len() as i32).map(|i| 10f64.powi(i)).collect(),
            },
        }
    }

    #[test]
    fn test_fixtures_load() {
        let linear = ModelArtifact::from_json(LINEAR_JSON).unwrap();
        assert_eq!(linear.features, FEATURE_COLUMNS.to_vec());
        let forest = ModelArtifact::from_json(FOREST_JSON).unwrap();
        assert!(matches!(forest.model, Regressor::Forest { ref trees } if trees.len() == 3));
    }

    #[test]
    fn test_reordering_follows_artifact() {
        let canonical = positional_artifact(&FEATURE_COLUMNS);
        let mut reversed_order = FEATURE_COLUMNS;
        reversed_order.reverse();
        let reversed = positional_artifact(&reversed_order);

        // canonical: temperature * 1 + ... + dayofyear * 1e8
        assert_eq!(
            canonical.predict_next_day(&features()).unwrap(),
            1.0 + 20.0 + 300.0 + 4e3 + 5e4 + 6e5 + 7e6 + 8e7 + 11e8
        );
        // reversed: dayofyear * 1 + ... + temperature * 1e8
        assert_eq!(
            reversed.predict_next_day(&features()).unwrap(),
            11.0 + 80.0 + 700.0 + 6e3 + 5e4 + 4e5 + 3e6 + 2e7 + 1e8
        );
    }

    #[test]
    fn test_unknown_feature_is_schema_mismatch() {
        let mut order = FEATURE_COLUMNS;
        order[0] = "no2";
        let artifact = positional_artifact(&order);
        let err = artifact.predict_next_day(&features()).unwrap_err();
        assert!(matches!(
            err,
            ModelError::SchemaMismatch(SchemaMismatch::UnknownFeature(ref name)) if name == "no2"
        ));
    }

    #[test]
    fn test_wrong_width_is_schema_mismatch() {
        let artifact = positional_artifact(&FEATURE_COLUMNS[..8]);
        assert!(matches!(
            artifact.predict_next_day(&features()),
            Err(ModelError::SchemaMismatch(SchemaMismatch::Count { .. }))
        ));
        let artifact = positional_artifact(&FEATURE_COLUMNS);
        assert!(matches!(
            artifact.predict(&[1.0, 2.0]),
            Err(ModelError::SchemaMismatch(SchemaMismatch::Count {
                expected: 9,
                actual: 2
            }))
        ));
    }

    #[test]
    fn test_invalid_artifacts_are_rejected() {
        let empty = r#"{"features":[],"model":{"kind":"linear","intercept":0.0,"coefficients":[]}}"#;
        assert!(matches!(
            ModelArtifact::from_json(empty),
            Err(ModelError::InvalidArtifact(_))
        ));

        let duplicate = r#"{"features":["a","a"],"model":{"kind":"linear","intercept":0.0,"coefficients":[1.0,1.0]}}"#;
        assert!(matches!(
            ModelArtifact::from_json(duplicate),
            Err(ModelError::InvalidArtifact(_))
        ));

        let narrow = r#"{"features":["a","b"],"model":{"kind":"linear","intercept":0.0,"coefficients":[1.0]}}"#;
        assert!(matches!(
            ModelArtifact::from_json(narrow),
            Err(ModelError::InvalidArtifact(_))
        ));

        assert!(matches!(
            ModelArtifact::from_json("{\"features\": 3}"),
            Err(ModelError::Parse(_))
        ));
    }

    #[test]
    fn test_unvalidated_artifact_errors_instead_of_panicking() {
        let out_of_range = ModelArtifact {
            features: vec!["a".to_string(), "b".to_string()],
            model: Regressor::Forest {
                trees: vec![TreeNode::Split {
                    feature: 7,
                    threshold: 0.0,
                    left: Box::new(TreeNode::Leaf { value: 1.0 }),
                    right: Box::new(TreeNode::Leaf { value: 2.0 }),
                }],
            },
        };
        assert!(matches!(
            out_of_range.predict(&[1.0, 2.0]),
            Err(ModelError::InvalidArtifact(_))
        ));

        let empty_forest = ModelArtifact {
            features: vec!["a".to_string()],
            model: Regressor::Forest { trees: vec![] },
        };
        assert!(matches!(
            empty_forest.predict(&[1.0]),
            Err(ModelError::InvalidArtifact(_))
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let artifact = ModelArtifact {
            features: vec!["a".to_string()],
            model: Regressor::Forest {
                trees: vec![TreeNode::Leaf { value: 12.5 }],
            },
        };
        let json = artifact.to_json().unwrap();
        assert_eq!(ModelArtifact::from_json(&json).unwrap(), artifact);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            ModelArtifact::from_path("/nonexistent/model.json"),
            Err(ModelError::Io(_))
        ));
    }
}
