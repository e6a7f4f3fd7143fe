use serde::{Deserialize, Serialize};
use std::fmt;

use crate::application::FeatureVector;

/// Which decision path produced a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionMethod {
    Model,
    RuleBased,
}

impl PredictionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PredictionMethod::Model => "model",
            PredictionMethod::RuleBased => "rule_based",
        }
    }
}

impl fmt::Display for PredictionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Prediction {
    pub approved: bool,
    /// Probability of approval, always within [0, 1]
    pub approval_probability: f64,
    pub rejection_probability: f64,
    pub features_used: FeatureVector,
    pub method: PredictionMethod,
}

impl Prediction {
    pub fn new(
        approved: bool,
        approval_probability: f64,
        features_used: FeatureVector,
        method: PredictionMethod,
    ) -> Self {
        Self {
            approved,
            approval_probability,
            rejection_probability: 1.0 - approval_probability,
            features_used,
            method,
        }
    }
}
