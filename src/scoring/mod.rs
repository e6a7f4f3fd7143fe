pub mod model;
pub mod prediction;
pub mod rules;
pub mod service;

pub use model::{Classifier, LogisticModel, ModelArtifact, ModelError, TreeEnsemble};
pub use prediction::{Prediction, PredictionMethod};
pub use rules::{
    predict_rule_based, score_rules, FactorContribution, RuleBreakdown, APPROVAL_THRESHOLD,
};
pub use service::ScoringService;
