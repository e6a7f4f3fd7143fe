use std::collections::HashSet;
use std::str::FromStr;

use super::config::PricingConfig;
use crate::risk::RiskLevel;

fn check_rate(errors: &mut Vec<String>, field: &str, value: f64) {
    if !value.is_finite() {
        errors.push(format!("{}: must be a finite number", field));
    } else if value < 0.0 {
        errors.push(format!("{}: must be non-negative", field));
    }
}

/// Validate pricing configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_pricing(config: &PricingConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(base) = config.base_rate {
        check_rate(&mut errors, "pricing.base_rate", base);
    }

    if let Some(tenure) = config.tenure_years {
        if !tenure.is_finite() || tenure <= 0.0 {
            errors.push("pricing.tenure_years: must be greater than zero".to_string());
        }
    }

    if let Some(premium) = config.default_premium {
        check_rate(&mut errors, "pricing.default_premium", premium);
    }

    if let Some(ref table) = config.risk_premium {
        for (level, premium) in table {
            let field = format!("pricing.risk_premium.{}", level);
            if RiskLevel::from_str(level).is_err() {
                errors.push(format!(
                    "{}: unknown risk level (expected low, medium, high or very_high)",
                    field
                ));
            }
            check_rate(&mut errors, &field, *premium);
        }
    }

    if let Some(ref products) = config.products {
        let mut seen = HashSet::new();
        for (i, product) in products.iter().enumerate() {
            if product.name.trim().is_empty() {
                errors.push(format!("pricing.products[{}].name: must not be empty", i));
            } else if !seen.insert(product.name.trim().to_lowercase()) {
                errors.push(format!(
                    "pricing.products[{}].name: duplicate product '{}'",
                    i, product.name
                ));
            }
            check_rate(
                &mut errors,
                &format!("pricing.products[{}].base_rate", i),
                product.base_rate,
            );
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
