pub mod config;
pub mod emi;
pub mod validation;

pub use config::{
    PricingConfig, ProductRate, DEFAULT_BASE_RATE, DEFAULT_PREMIUM, DEFAULT_TENURE_YEARS,
};
pub use emi::{
    amortization_schedule, calculate_emi, validate_loan_terms, Installment, MAX_SCHEDULE_MONTHS,
};
pub use validation::validate_pricing;

use serde::{Deserialize, Serialize};

use crate::application::Application;
use crate::risk::RiskLevel;
use emi::round2;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PricingResult {
    /// Annual percentage rate
    pub interest_rate: f64,
    /// Monthly installment
    pub emi: f64,
    pub tenure_years: f64,
    pub total_payable: f64,
    pub total_interest: f64,
}

/// Interest rate for a risk level name. Unknown names are priced with the default premium.
pub fn calculate_interest_rate(config: &PricingConfig, risk_level: &str) -> f64 {
    config.base_rate() + config.premium_for(risk_level)
}

/// Price an application that has already been assigned a risk level.
pub fn price_loan(config: &PricingConfig, app: &Application, risk: RiskLevel) -> PricingResult {
    let interest_rate =
        config.base_rate_for(app.loan_type.as_deref()) + config.premium_for(risk.as_str());
    let tenure_years = app.tenure_years.unwrap_or_else(|| config.tenure_years());
    let emi = calculate_emi(app.loan_amount, interest_rate, tenure_years);

    let (total_payable, total_interest) = if emi > 0.0 {
        let total = round2(emi * tenure_years * 12.0);
        (total, round2(total - app.loan_amount))
    } else {
        (0.0, 0.0)
    };

    PricingResult {
        interest_rate,
        emi,
        tenure_years,
        total_payable,
        total_interest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loan(amount: f64, loan_type: Option<&str>, tenure: Option<f64>) -> Application {
        Application {
            loan_amount: amount,
            loan_type: loan_type.map(str::to_string),
            tenure_years: tenure,
            ..Default::default()
        }
    }

    #[test]
    fn test_interest_rate_per_level() {
        let config = PricingConfig::default();
        assert_eq!(calculate_interest_rate(&config, "low"), 12.0);
        assert_eq!(calculate_interest_rate(&config, "medium"), 14.0);
        assert_eq!(calculate_interest_rate(&config, "high"), 17.0);
        assert_eq!(calculate_interest_rate(&config, "very_high"), 20.0);
    }

    #[test]
    fn test_unknown_level_uses_base_plus_five() {
        let config = PricingConfig::default();
        assert_eq!(
            calculate_interest_rate(&config, "unheard_of"),
            config.base_rate() + 5.0
        );
    }

    #[test]
    fn test_price_loan_default_tenure() {
        let config = PricingConfig {
            base_rate: Some(10.5),
            products: None,
            ..PricingConfig::default()
        };
        let result = price_loan(&config, &loan(300000.0, None, None), RiskLevel::Medium);

        assert_eq!(result.interest_rate, 12.5);
        assert_eq!(result.tenure_years, 5.0);
        assert_eq!(result.emi, 6749.38);
        assert_eq!(result.total_payable, round2(6749.38 * 60.0));
        assert_eq!(result.total_interest, round2(result.total_payable - 300000.0));
    }

    #[test]
    fn test_product_rate_and_tenure_override() {
        let config = PricingConfig::default();
        let result = price_loan(
            &config,
            &loan(100000.0, Some("Home Loan"), Some(1.0)),
            RiskLevel::Low,
        );
        assert_eq!(result.interest_rate, 9.5);
        assert_eq!(result.tenure_years, 1.0);
        assert_eq!(result.emi, calculate_emi(100000.0, 9.5, 1.0));
    }

    #[test]
    fn test_partial_config_prices_default_products() {
        let config: PricingConfig = serde_saphyr::from_str("base_rate: 11.0\n").unwrap();
        let app = loan(300000.0, Some("Home Loan"), None);
        let result = price_loan(&config, &app, RiskLevel::Medium);
        assert_eq!(result.interest_rate, 11.5);
    }

    #[test]
    fn test_zero_loan_prices_to_zero() {
        let result = price_loan(&PricingConfig::default(), &loan(0.0, None, None), RiskLevel::High);
        assert_eq!(result.interest_rate, 17.0);
        assert_eq!(result.emi, 0.0);
        assert_eq!(result.total_payable, 0.0);
        assert_eq!(result.total_interest, 0.0);
    }
}
