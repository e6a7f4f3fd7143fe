use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::Application;
use crate::pricing::{price_loan, PricingConfig, PricingResult};
use crate::risk::{risk_for, RiskLevel};
use crate::scoring::{Prediction, ScoringService};

/// Full decision for one application.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Assessment {
    pub application: Application,
    pub prediction: Prediction,
    pub risk_level: RiskLevel,
    pub pricing: PricingResult,
    pub assessed_at: DateTime<Utc>,
}

/// Derive features, predict, bucket risk and price the loan.
pub fn assess(app: &Application, service: &ScoringService, pricing: &PricingConfig) -> Assessment {
    let prediction = service.predict(app);
    let risk_level = risk_for(&prediction);
    let pricing = price_loan(pricing, app, risk_level);

    debug!(
        method = %prediction.method,
        probability = prediction.approval_probability,
        risk = %risk_level,
        rate = pricing.interest_rate,
        emi = pricing.emi,
        "Assessed application"
    );

    Assessment {
        application: app.clone(),
        prediction,
        risk_level,
        pricing,
        assessed_at: Utc::now(),
    }
}
