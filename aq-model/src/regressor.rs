//! Regressors that can be evaluated from a persisted artifact.

use serde::{Deserialize, Serialize};

/// One node of a fitted regression tree. A sample goes left when
/// `x[feature] <= threshold`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeNode {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    /// Walk the tree for one sample. `None` when a split reads past the end
    /// of `x`.
    pub fn predict(&self, x: &[f64]) -> Option<f64> {
        let mut node = self;
        loop {
            match node {
                TreeNode::Leaf { value } => return Some(*value),
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if *x.get(*feature)? <= *threshold {
                        left.as_ref()
                    } else {
                        right.as_ref()
                    };
                }
            }
        }
    }

    /// Largest feature index any split reads, if the tree splits at all.
    fn max_feature(&self) -> Option<usize> {
        match self {
            TreeNode::Leaf { .. } => None,
            TreeNode::Split {
                feature,
                left,
                right,
                ..
            } => [Some(*feature), left.max_feature(), right.max_feature()]
                .into_iter()
                .flatten()
                .max(),
        }
    }
}

/// The fitted model inside an artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Regressor {
    /// `intercept + coefficients · x`
    Linear {
        intercept: f64,
        coefficients: Vec<f64>,
    },
    /// Mean of the trees' predictions (a random-forest style ensemble).
    Forest { trees: Vec<TreeNode> },
}

impl Regressor {
    /// Evaluate on `x`. Fails instead of guessing when the regressor cannot
    /// read a vector of this width.
    pub fn predict(&self, x: &[f64]) -> Result<f64, String> {
        self.check_width(x.len())?;
        match self {
            Regressor::Linear {
                intercept,
                coefficients,
            } => Ok(intercept
                + coefficients
                    .iter()
                    .zip(x)
                    .map(|(c, v)| c * v)
                    .sum::<f64>()),
            Regressor::Forest { trees } => {
                let mut total = 0.0;
                for tree in trees {
                    total += tree
                        .predict(x)
                        .ok_or_else(|| format!("tree reads past {} features", x.len()))?;
                }
                Ok(total / trees.len() as f64)
            }
        }
    }

    /// Check the regressor can be evaluated on `n_features` inputs.
    pub fn check_width(&self, n_features: usize) -> Result<(), String> {
        match self {
            Regressor::Linear { coefficients, .. } => {
                if coefficients.len() != n_features {
                    return Err(format!(
                        "linear model has {} coefficients for {} features",
                        coefficients.len(),
                        n_features
                    ));
                }
            }
            Regressor::Forest { trees } => {
                if trees.is_empty() {
                    return Err("forest has no trees".to_string());
                }
                for (i, tree) in trees.iter().enumerate() {
                    if let Some(feature) = tree.max_feature() {
                        if feature >= n_features {
                            return Err(format!(
                                "tree {i} splits on feature {feature} but only {n_features} features exist"
                            ));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
