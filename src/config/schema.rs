use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::pricing::PricingConfig;

pub const DEFAULT_MODEL_PATH: &str = "models/loan_model.json";

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub model: Option<ModelConfig>,

    #[serde(default)]
    pub pricing: Option<PricingConfig>,
}

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    /// Set to false to always score with rules
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Artifact location (default: models/loan_model.json)
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
        }
    }
}

impl ModelConfig {
    pub fn artifact_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH))
    }
}

impl Config {
    pub fn effective_model(&self) -> ModelConfig {
        self.model.clone().unwrap_or_default()
    }

    pub fn effective_pricing(&self) -> PricingConfig {
        self.pricing.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_parse() {
        let config: Config = serde_saphyr::from_str("{}").unwrap();
        assert!(config.model.is_none());
        assert!(config.pricing.is_none());
        assert!(config.effective_model().enabled);
        assert_eq!(
            config.effective_model().artifact_path(),
            PathBuf::from("models/loan_model.json")
        );
        assert_eq!(config.effective_pricing(), PricingConfig::default());
    }

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
model:
  enabled: false
  path: /srv/models/credit.json
pricing:
  base_rate: 11.0
  tenure_years: 3
  default_premium: 6.0
  risk_premium:
    low: 0.5
    medium: 2.5
    high: 5.5
    very_high: 9.0
  products:
    - name: "Home Loan"
      base_rate: 9.0
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        let model = config.effective_model();
        assert!(!model.enabled);
        assert_eq!(model.artifact_path(), PathBuf::from("/srv/models/credit.json"));

        let pricing = config.effective_pricing();
        assert_eq!(pricing.base_rate(), 11.0);
        assert_eq!(pricing.tenure_years(), 3.0);
        assert_eq!(pricing.premium_for("very_high"), 9.0);
        assert_eq!(pricing.base_rate_for(Some("Home Loan")), 9.0);
    }

    #[test]
    fn test_model_enabled_by_default() {
        let yaml = r#"
model:
  path: model.json
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert!(config.effective_model().enabled);
    }

    #[test]
    fn test_unknown_section_rejected() {
        let yaml = "queries: []";
        assert!(serde_saphyr::from_str::<Config>(yaml).is_err());
    }
}
