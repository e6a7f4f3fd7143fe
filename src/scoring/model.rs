//! Persisted classifier artifacts.
//!
//! An artifact is a JSON document holding either a bare classifier or a
//! wrapper `{ "model": ..., "features": [...] }` that also records the feature
//! names used at training time. Two classifier kinds are supported: logistic
//! regression and a gradient-boosted tree ensemble in the XGBoost layout.

use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::application::{FEATURE_COUNT, FEATURE_ORDER};

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("no model artifact loaded")]
    NotLoaded,

    #[error("model artifact unavailable at {}", .path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed model artifact at {}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid model structure: {0}")]
    InvalidStructure(String),

    #[error("feature shape mismatch: expected {expected} features, found {found}")]
    FeatureShape { expected: usize, found: usize },

    #[error("model produced an invalid probability: {0}")]
    InvalidOutput(f64),
}

/// A binary classifier over the canonical feature vector.
pub trait Classifier: Send + Sync + fmt::Debug {
    /// Short model kind, used in logs
    fn name(&self) -> &str;

    /// Class probabilities `[P(reject), P(approve)]`
    fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2], ModelError>;

    /// Binary approval label
    fn predict(&self, features: &[f64]) -> Result<bool, ModelError> {
        Ok(self.predict_proba(features)?[1] >= 0.5)
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

fn check_shape(features: &[f64]) -> Result<(), ModelError> {
    if features.len() != FEATURE_COUNT {
        return Err(ModelError::FeatureShape {
            expected: FEATURE_COUNT,
            found: features.len(),
        });
    }
    Ok(())
}

fn probabilities(p1: f64) -> Result<[f64; 2], ModelError> {
    if !p1.is_finite() || !(0.0..=1.0).contains(&p1) {
        return Err(ModelError::InvalidOutput(p1));
    }
    Ok([1.0 - p1, p1])
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogisticModel {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LogisticModel {
    fn check(&self) -> Result<(), ModelError> {
        if self.coefficients.len() != FEATURE_COUNT {
            return Err(ModelError::FeatureShape {
                expected: FEATURE_COUNT,
                found: self.coefficients.len(),
            });
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ModelError::InvalidStructure(
                "logistic coefficients must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

impl Classifier for LogisticModel {
    fn name(&self) -> &str {
        "logistic"
    }

    fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2], ModelError> {
        check_shape(features)?;
        let z = self.intercept
            + self
                .coefficients
                .iter()
                .zip(features)
                .map(|(c, x)| c * x)
                .sum::<f64>();
        probabilities(sigmoid(z))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    /// Go to `left` when `x[feature] < threshold`, otherwise `right`
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

impl Tree {
    fn check(&self, index: usize) -> Result<(), ModelError> {
        if self.nodes.is_empty() {
            return Err(ModelError::InvalidStructure(format!("tree {} has no nodes", index)));
        }
        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= FEATURE_COUNT {
                        return Err(ModelError::FeatureShape {
                            expected: FEATURE_COUNT,
                            found: feature + 1,
                        });
                    }
                    if threshold.is_nan() {
                        return Err(ModelError::InvalidStructure(format!(
                            "tree {} node {}: threshold is NaN",
                            index, i
                        )));
                    }
                    // Children must point forward so traversal always terminates
                    for child in [left, right] {
                        if *child <= i || *child >= self.nodes.len() {
                            return Err(ModelError::InvalidStructure(format!(
                                "tree {} node {}: child index {} out of range",
                                index, i, child
                            )));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(ModelError::InvalidStructure(format!(
                            "tree {} node {}: leaf value must be finite",
                            index, i
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    fn leaf_value(&self, features: &[f64]) -> f64 {
        let mut i = 0;
        loop {
            match &self.nodes[i] {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    i = if features[*feature] < *threshold { *left } else { *right };
                }
            }
        }
    }
}

fn default_base_score() -> f64 {
    0.5
}

#[derive(Debug, Clone, Deserialize)]
pub struct TreeEnsemble {
    /// Prior probability the boosted margin starts from
    #[serde(default = "default_base_score")]
    pub base_score: f64,
    pub trees: Vec<Tree>,
}

impl TreeEnsemble {
    fn check(&self) -> Result<(), ModelError> {
        if !(self.base_score > 0.0 && self.base_score < 1.0) {
            return Err(ModelError::InvalidStructure(format!(
                "base_score must be within (0, 1), got {}",
                self.base_score
            )));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.check(i)?;
        }
        Ok(())
    }
}

impl Classifier for TreeEnsemble {
    fn name(&self) -> &str {
        "tree_ensemble"
    }

    fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2], ModelError> {
        check_shape(features)?;
        let base_margin = (self.base_score / (1.0 - self.base_score)).ln();
        let margin = base_margin + self.trees.iter().map(|t| t.leaf_value(features)).sum::<f64>();
        probabilities(sigmoid(margin))
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ClassifierSpec {
    Logistic(LogisticModel),
    TreeEnsemble(TreeEnsemble),
}

impl ClassifierSpec {
    fn into_classifier(self) -> Result<Arc<dyn Classifier>, ModelError> {
        match self {
            ClassifierSpec::Logistic(model) => {
                model.check()?;
                Ok(Arc::new(model))
            }
            ClassifierSpec::TreeEnsemble(model) => {
                model.check()?;
                Ok(Arc::new(model))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ArtifactFile {
    Wrapped {
        model: ClassifierSpec,
        #[serde(default)]
        features: Option<Vec<String>>,
    },
    Raw(ClassifierSpec),
}

/// A loaded, validated classifier. Cheap to clone; the classifier is shared.
#[derive(Debug, Clone)]
pub struct ModelArtifact {
    classifier: Arc<dyn Classifier>,
    feature_names: Vec<String>,
    source: Option<PathBuf>,
}

impl ModelArtifact {
    /// Wrap an in-memory classifier trained on the canonical feature order
    pub fn from_classifier(classifier: impl Classifier + 'static) -> Self {
        Self {
            classifier: Arc::new(classifier),
            feature_names: canonical_names(),
            source: None,
        }
    }

    /// Read and validate an artifact file
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let content = fs::read_to_string(path).map_err(|source| ModelError::Unavailable {
            path: path.to_path_buf(),
            source,
        })?;
        let artifact = Self::parse(&content, path)?;

        info!(
            path = %path.display(),
            kind = artifact.classifier.name(),
            "Model artifact loaded"
        );
        Ok(artifact)
    }

    /// Parse artifact JSON. `origin` is only used for error reporting.
    pub fn parse(json: &str, origin: &Path) -> Result<Self, ModelError> {
        let file: ArtifactFile =
            serde_json::from_str(json).map_err(|source| ModelError::Malformed {
                path: origin.to_path_buf(),
                source,
            })?;

        let (spec, features) = match file {
            ArtifactFile::Wrapped { model, features } => (model, features),
            ArtifactFile::Raw(model) => (model, None),
        };

        let feature_names = match features {
            Some(names) => {
                if names.len() != FEATURE_COUNT {
                    return Err(ModelError::FeatureShape {
                        expected: FEATURE_COUNT,
                        found: names.len(),
                    });
                }
                if names.iter().zip(FEATURE_ORDER).any(|(a, b)| a != b) {
                    warn!(
                        trained = ?names,
                        expected = ?FEATURE_ORDER,
                        "Artifact feature names differ from the canonical order"
                    );
                }
                names
            }
            None => {
                debug!("Artifact carries no feature list, assuming canonical order");
                canonical_names()
            }
        };

        Ok(Self {
            classifier: spec.into_classifier()?,
            feature_names,
            source: Some(origin.to_path_buf()),
        })
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

fn canonical_names() -> Vec<String> {
    FEATURE_ORDER.iter().map(|s| s.to_string()).collect()
}
