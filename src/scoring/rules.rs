use serde::{Deserialize, Serialize};

use super::prediction::{Prediction, PredictionMethod};
use crate::application::FeatureVector;

/// Score at or above which an application is approved
pub const APPROVAL_THRESHOLD: f64 = 0.5;

/// Rule weights are kept in hundredths of a point so sums like 0.3 + 0.2 hit
/// the approval threshold exactly.
const POINTS_PER_UNIT: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangeOp {
    LessThan(f64),
    GreaterThan(f64),
    GreaterEqual(f64),
    Between(f64, f64), // Inclusive range: N-M
}

impl RangeOp {
    pub fn matches(&self, value: f64) -> bool {
        match self {
            RangeOp::LessThan(n) => value < *n,
            RangeOp::GreaterThan(n) => value > *n,
            RangeOp::GreaterEqual(n) => value >= *n,
            RangeOp::Between(low, high) => value >= *low && value <= *high,
        }
    }

    fn describe(&self) -> String {
        match self {
            RangeOp::LessThan(n) => format!("<{}", n),
            RangeOp::GreaterThan(n) => format!(">{}", n),
            RangeOp::GreaterEqual(n) => format!(">={}", n),
            RangeOp::Between(low, high) => format!("{}-{}", low, high),
        }
    }
}

struct Tier {
    range: RangeOp,
    points: i32,
}

/// One scored signal. Tiers are checked in order and the first match wins.
struct Signal {
    label: &'static str,
    value: fn(&FeatureVector) -> f64,
    tiers: &'static [Tier],
}

const SIGNALS: [Signal; 6] = [
    Signal {
        label: "Income",
        value: |f| f.monthly_income,
        tiers: &[
            Tier {
                range: RangeOp::GreaterEqual(50_000.0),
                points: 30,
            },
            Tier {
                range: RangeOp::GreaterEqual(30_000.0),
                points: 20,
            },
            Tier {
                range: RangeOp::GreaterEqual(20_000.0),
                points: 10,
            },
        ],
    },
    Signal {
        label: "Age",
        value: |f| f.age,
        tiers: &[Tier {
            range: RangeOp::Between(25.0, 60.0),
            points: 20,
        }],
    },
    Signal {
        label: "Debt-to-income",
        value: |f| f.debt_to_income,
        tiers: &[
            Tier {
                range: RangeOp::LessThan(40.0),
                points: 20,
            },
            Tier {
                range: RangeOp::LessThan(60.0),
                points: 10,
            },
        ],
    },
    Signal {
        label: "Employment",
        value: |f| f.employment_years,
        tiers: &[Tier {
            range: RangeOp::GreaterEqual(2.0),
            points: 20,
        }],
    },
    Signal {
        label: "Loan-to-income",
        value: |f| f.loan_to_income,
        tiers: &[Tier {
            range: RangeOp::LessThan(200.0),
            points: 10,
        }],
    },
    Signal {
        label: "Existing loans",
        value: |f| f.existing_loans,
        tiers: &[Tier {
            range: RangeOp::GreaterThan(2.0),
            points: -10,
        }],
    },
];

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FactorContribution {
    pub label: String,       // e.g. "Income", "Age"
    pub description: String, // e.g. "52000 matched '>=50000' -> +0.30"
    pub before: f64,         // Score before this factor
    pub after: f64,          // Score after this factor
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RuleBreakdown {
    /// Raw additive score, may fall outside [0, 1]
    pub score: f64,
    pub factors: Vec<FactorContribution>,
}

pub fn is_approved(score: f64) -> bool {
    score >= APPROVAL_THRESHOLD
}

fn to_score(points: i32) -> f64 {
    points as f64 / POINTS_PER_UNIT
}

/// Run every signal against the features and record which ones fired.
pub fn score_rules(features: &FeatureVector) -> RuleBreakdown {
    let mut points = 0;
    let mut factors = Vec::new();

    for signal in &SIGNALS {
        let value = (signal.value)(features);
        if let Some(tier) = signal.tiers.iter().find(|t| t.range.matches(value)) {
            let before = to_score(points);
            points += tier.points;
            factors.push(FactorContribution {
                label: signal.label.to_string(),
                description: format!(
                    "{} matched '{}' -> {:+.2}",
                    value,
                    tier.range.describe(),
                    to_score(tier.points)
                ),
                before,
                after: to_score(points),
            });
        }
    }

    RuleBreakdown {
        score: to_score(points),
        factors,
    }
}

/// Deterministic fallback decision used whenever no model answer is available.
pub fn predict_rule_based(features: &FeatureVector) -> Prediction {
    let score = score_rules(features).score;
    Prediction::new(
        is_approved(score),
        score.clamp(0.0, 1.0),
        *features,
        PredictionMethod::RuleBased,
    )
}
