use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::risk::RiskLevel;

pub const DEFAULT_BASE_RATE: f64 = 12.0;
pub const DEFAULT_TENURE_YEARS: f64 = 5.0;

/// Premium applied when a risk level has no entry in the table
pub const DEFAULT_PREMIUM: f64 = 5.0;

/// Loan pricing configuration.
///
/// The interest rate is the base rate (or the matching product's base rate)
/// plus the premium for the applicant's risk level. Every field is optional.
///
/// Example YAML:
/// ```yaml
/// pricing:
///   base_rate: 12.0
///   tenure_years: 5
///   risk_premium: { low: 0.0, medium: 2.0, high: 5.0, very_high: 8.0 }
///   products:
///     - { name: "Home Loan", base_rate: 9.5 }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PricingConfig {
    /// Annual base rate in percent (default: 12.0)
    #[serde(default)]
    pub base_rate: Option<f64>,

    /// Loan tenure in years when the application does not ask for one (default: 5)
    #[serde(default)]
    pub tenure_years: Option<f64>,

    /// Premium for risk levels missing from `risk_premium` (default: 5.0)
    #[serde(default)]
    pub default_premium: Option<f64>,

    /// Premium in percentage points per risk level
    #[serde(default)]
    pub risk_premium: Option<BTreeMap<String, f64>>,

    /// Product-specific base rates, matched case-insensitively on `loan_type`
    #[serde(default)]
    pub products: Option<Vec<ProductRate>>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ProductRate {
    pub name: String,
    pub base_rate: f64,
}

pub fn default_risk_premiums() -> BTreeMap<String, f64> {
    [
        (RiskLevel::Low, 0.0),
        (RiskLevel::Medium, 2.0),
        (RiskLevel::High, 5.0),
        (RiskLevel::VeryHigh, 8.0),
    ]
    .into_iter()
    .map(|(level, premium)| (level.as_str().to_string(), premium))
    .collect()
}

fn product(name: &str, base_rate: f64) -> ProductRate {
    ProductRate {
        name: name.to_string(),
        base_rate,
    }
}

pub fn default_products() -> Vec<ProductRate> {
    vec![
        product("Personal Loan", 12.5),
        product("Home Loan", 9.5),
        product("Car Loan", 10.5),
        product("Business Loan", 14.0),
    ]
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            base_rate: Some(DEFAULT_BASE_RATE),
            tenure_years: Some(DEFAULT_TENURE_YEARS),
            default_premium: Some(DEFAULT_PREMIUM),
            risk_premium: Some(default_risk_premiums()),
            products: Some(default_products()),
        }
    }
}

impl PricingConfig {
    pub fn base_rate(&self) -> f64 {
        self.base_rate.unwrap_or(DEFAULT_BASE_RATE)
    }

    pub fn tenure_years(&self) -> f64 {
        self.tenure_years.unwrap_or(DEFAULT_TENURE_YEARS)
    }

    /// Base rate for a loan product, or the general base rate if it is unknown.
    /// Without a `products` section the built-in products apply.
    pub fn base_rate_for(&self, loan_type: Option<&str>) -> f64 {
        let Some(loan_type) = loan_type else {
            return self.base_rate();
        };
        let matches = |p: &&ProductRate| p.name.trim().eq_ignore_ascii_case(loan_type.trim());
        let rate = match &self.products {
            Some(products) => products.iter().find(matches).map(|p| p.base_rate),
            None => default_products().iter().find(matches).map(|p| p.base_rate),
        };
        rate.unwrap_or_else(|| self.base_rate())
    }

    /// Premium for a risk level name. Unknown names get the default premium.
    pub fn premium_for(&self, risk_level: &str) -> f64 {
        let default_premium = self.default_premium.unwrap_or(DEFAULT_PREMIUM);
        match &self.risk_premium {
            Some(table) => table.get(risk_level).copied().unwrap_or(default_premium),
            None => default_risk_premiums()
                .get(risk_level)
                .copied()
                .unwrap_or(default_premium),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pricing_config() {
        let config = PricingConfig::default();

        assert_eq!(config.base_rate, Some(12.0));
        assert_eq!(config.tenure_years, Some(5.0));
        assert_eq!(config.premium_for("low"), 0.0);
        assert_eq!(config.premium_for("medium"), 2.0);
        assert_eq!(config.premium_for("high"), 5.0);
        assert_eq!(config.premium_for("very_high"), 8.0);
        assert_eq!(config.products.as_ref().unwrap().len(), 4);
    }

    #[test]
    fn test_unknown_risk_level_gets_default_premium() {
        let config = PricingConfig::default();
        assert_eq!(config.premium_for("catastrophic"), 5.0);
    }

    #[test]
    fn test_product_base_rate_case_insensitive() {
        let config = PricingConfig::default();
        assert_eq!(config.base_rate_for(Some("home loan")), 9.5);
        assert_eq!(config.base_rate_for(Some("Business Loan")), 14.0);
        assert_eq!(config.base_rate_for(Some("Boat Loan")), 12.0);
        assert_eq!(config.base_rate_for(None), 12.0);
    }

    #[test]
    fn test_pricing_config_serde_roundtrip() {
        let config = PricingConfig::default();
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: PricingConfig = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_pricing_config_parse() {
        let yaml = r#"
base_rate: 10
risk_premium:
  low: 1.0
  medium: 3.0
"#;
        let config: PricingConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.base_rate(), 10.0);
        assert_eq!(config.tenure_years(), 5.0);
        assert_eq!(config.premium_for("low"), 1.0);
        // Missing from the table, falls back to the default premium
        assert_eq!(config.premium_for("very_high"), 5.0);
        assert!(config.products.is_none());
    }

    #[test]
    fn test_missing_products_section_keeps_default_products() {
        let config: PricingConfig = serde_saphyr::from_str("base_rate: 11.0\n").unwrap();
        assert_eq!(config.base_rate_for(Some("Home Loan")), 9.5);
        assert_eq!(config.base_rate_for(Some("business loan")), 14.0);
        assert_eq!(config.base_rate_for(Some("Boat Loan")), 11.0);
        assert_eq!(config.base_rate_for(None), 11.0);
    }

    #[test]
    fn test_empty_products_section_disables_products() {
        let config: PricingConfig = serde_saphyr::from_str("products: []\n").unwrap();
        assert_eq!(config.base_rate_for(Some("Home Loan")), 12.0);
    }

    #[test]
    fn test_empty_pricing_config_parse() {
        let yaml = "{}";
        let config: PricingConfig = serde_saphyr::from_str(yaml).unwrap();
        assert!(config.base_rate.is_none());
        assert_eq!(config.base_rate(), 12.0);
        assert_eq!(config.premium_for("medium"), 2.0);
        assert_eq!(config.premium_for("unknown"), 5.0);
    }

    #[test]
    fn test_products_parse() {
        let yaml = r#"
products:
  - name: "Gold Loan"
    base_rate: 8.75
"#;
        let config: PricingConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.base_rate_for(Some("gold loan")), 8.75);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = "base_rat: 10";
        assert!(serde_saphyr::from_str::<PricingConfig>(yaml).is_err());
    }
}
