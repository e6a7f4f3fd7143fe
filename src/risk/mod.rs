use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::scoring::Prediction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 4] = [
        RiskLevel::Low,
        RiskLevel::Medium,
        RiskLevel::High,
        RiskLevel::VeryHigh,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::VeryHigh => "very_high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RiskLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == s.trim())
            .ok_or_else(|| format!("unknown risk level '{}'", s))
    }
}

/// One rung of the risk ladder: (approval probability, debt-to-income) -> matches?
pub struct RiskRule {
    pub level: RiskLevel,
    pub matches: fn(f64, f64) -> bool,
}

/// Checked top to bottom; the first matching rule wins. The last rung always matches.
pub const RISK_LADDER: [RiskRule; 4] = [
    RiskRule {
        level: RiskLevel::Low,
        matches: |prob, dti| prob >= 0.8 && dti < 40.0,
    },
    RiskRule {
        level: RiskLevel::Medium,
        matches: |prob, dti| prob >= 0.6 && dti < 60.0,
    },
    RiskRule {
        level: RiskLevel::High,
        matches: |prob, _| prob >= 0.4,
    },
    RiskRule {
        level: RiskLevel::VeryHigh,
        matches: |_, _| true,
    },
];

pub fn classify_risk(approval_probability: f64, debt_to_income: f64) -> RiskLevel {
    RISK_LADDER
        .iter()
        .find(|rule| (rule.matches)(approval_probability, debt_to_income))
        .map(|rule| rule.level)
        .unwrap_or(RiskLevel::VeryHigh)
}

pub fn risk_for(prediction: &Prediction) -> RiskLevel {
    classify_risk(
        prediction.approval_probability,
        prediction.features_used.debt_to_income,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_risk() {
        assert_eq!(classify_risk(0.9, 20.0), RiskLevel::Low);
        assert_eq!(classify_risk(0.8, 39.999), RiskLevel::Low);
    }

    #[test]
    fn test_dti_boundary_drops_to_medium() {
        assert_eq!(classify_risk(0.8, 40.0), RiskLevel::Medium);
    }

    #[test]
    fn test_high_probability_with_high_dti_falls_through() {
        // Fails both low (dti) and medium (dti), lands on high
        assert_eq!(classify_risk(0.85, 70.0), RiskLevel::High);
    }

    #[test]
    fn test_medium_and_high_boundaries() {
        assert_eq!(classify_risk(0.6, 59.9), RiskLevel::Medium);
        assert_eq!(classify_risk(0.6, 60.0), RiskLevel::High);
        assert_eq!(classify_risk(0.59, 10.0), RiskLevel::High);
        assert_eq!(classify_risk(0.4, 100.0), RiskLevel::High);
    }

    #[test]
    fn test_very_high() {
        assert_eq!(classify_risk(0.39, 10.0), RiskLevel::VeryHigh);
        assert_eq!(classify_risk(0.0, 100.0), RiskLevel::VeryHigh);
    }

    #[test]
    fn test_ladder_order() {
        let levels: Vec<_> = RISK_LADDER.iter().map(|r| r.level).collect();
        assert_eq!(levels, RiskLevel::ALL.to_vec());
    }

    #[test]
    fn test_risk_for_prediction_uses_features_dti() {
        use crate::application::FeatureVector;
        use crate::scoring::PredictionMethod;

        let features = FeatureVector {
            debt_to_income: 45.0,
            ..Default::default()
        };
        let prediction = Prediction::new(true, 0.9, features, PredictionMethod::Model);
        assert_eq!(risk_for(&prediction), RiskLevel::Medium);
    }

    #[test]
    fn test_parse_and_display() {
        for level in RiskLevel::ALL {
            assert_eq!(level.to_string().parse::<RiskLevel>().unwrap(), level);
        }
        assert!("extreme".parse::<RiskLevel>().is_err());
        assert_eq!(
            serde_json::to_string(&RiskLevel::VeryHigh).unwrap(),
            "\"very_high\""
        );
    }
}
