use std::path::Path;
use tracing::{debug, info, warn};

use super::model::{ModelArtifact, ModelError};
use super::prediction::{Prediction, PredictionMethod};
use super::rules::predict_rule_based;
use crate::application::{derive_features, Application, FeatureVector};
use crate::config::ModelConfig;

/// Owns the (optional) loaded classifier and answers scoring requests.
///
/// Build it once at startup and share it by reference or clone; the artifact
/// is immutable after loading, so concurrent callers need no locking.
#[derive(Debug, Clone, Default)]
pub struct ScoringService {
    model: Option<ModelArtifact>,
}

impl ScoringService {
    /// Service that always uses the rule-based scorer
    pub fn rule_based() -> Self {
        Self { model: None }
    }

    pub fn with_model(model: ModelArtifact) -> Self {
        Self { model: Some(model) }
    }

    /// Load the artifact at `path`, failing if it cannot be used
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        ModelArtifact::load(path).map(Self::with_model)
    }

    /// Load the artifact at `path`, falling back to rule-based scoring on any failure
    pub fn load_or_rule_based(path: &Path) -> Self {
        match Self::load(path) {
            Ok(service) => service,
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Model artifact not usable, scoring with rules only"
                );
                Self::rule_based()
            }
        }
    }

    pub fn from_config(config: &ModelConfig) -> Self {
        if !config.enabled {
            info!("Model scoring disabled by config");
            return Self::rule_based();
        }
        Self::load_or_rule_based(&config.artifact_path())
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    pub fn model(&self) -> Option<&ModelArtifact> {
        self.model.as_ref()
    }

    /// Score with the loaded classifier only. Errors are returned, not masked.
    pub fn predict_with_model(&self, features: &FeatureVector) -> Result<Prediction, ModelError> {
        let model = self.model.as_ref().ok_or(ModelError::NotLoaded)?;
        let classifier = model.classifier();
        let row = features.to_array();

        let proba = classifier.predict_proba(&row)?;
        let approved = classifier.predict(&row)?;

        Ok(Prediction::new(approved, proba[1], *features, PredictionMethod::Model))
    }

    /// Score derived features, preferring the model and falling back to rules.
    pub fn predict_features(&self, features: &FeatureVector) -> Prediction {
        if !self.has_model() {
            return predict_rule_based(features);
        }

        match self.predict_with_model(features) {
            Ok(prediction) => {
                debug!(
                    probability = prediction.approval_probability,
                    approved = prediction.approved,
                    "Model prediction"
                );
                prediction
            }
            Err(e) => {
                warn!(error = %e, "Model prediction failed, using rule-based scoring");
                predict_rule_based(features)
            }
        }
    }

    /// Top-level prediction for a raw application. Never fails.
    pub fn predict(&self, app: &Application) -> Prediction {
        self.predict_features(&derive_features(app))
    }
}
