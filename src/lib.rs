//! Credit scoring and loan pricing engine.
//!
//! Flow: [`application::derive_features`] → [`scoring::ScoringService`]
//! (model with rule-based fallback) → [`risk::classify_risk`] →
//! [`pricing::price_loan`]. [`assessment::assess`] runs the whole chain.

pub mod application;
pub mod assessment;
pub mod config;
pub mod output;
pub mod pricing;
pub mod risk;
pub mod scoring;

pub use application::{derive_features, Application, FeatureVector, FEATURE_ORDER};
pub use assessment::{assess, Assessment};
pub use pricing::{calculate_emi, PricingResult};
pub use risk::{classify_risk, RiskLevel};
pub use scoring::{Prediction, PredictionMethod, ScoringService};
