pub mod features;

pub use features::{derive_features, FeatureVector, FEATURE_COUNT, FEATURE_ORDER};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Raw loan application as supplied by the upstream form.
///
/// Every numeric field is optional on the wire and defaults to zero.
/// `monthly_expenses` stays `None` when absent so the feature deriver can
/// apply its half-of-income default.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Application {
    #[serde(default)]
    pub monthly_income: f64,

    #[serde(default)]
    pub loan_amount: f64,

    #[serde(default)]
    pub age: f64,

    #[serde(default)]
    pub employment_years: f64,

    #[serde(default)]
    pub existing_loans: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_expenses: Option<f64>,

    /// Product name (e.g. "Home Loan"), used to pick a product base rate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loan_type: Option<String>,

    /// Requested tenure in years, overrides the configured default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenure_years: Option<f64>,
}

impl Application {
    /// Check that every numeric field is finite and non-negative.
    /// Returns all problems at once (not just the first).
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        let fields = [
            ("monthly_income", Some(self.monthly_income)),
            ("loan_amount", Some(self.loan_amount)),
            ("age", Some(self.age)),
            ("employment_years", Some(self.employment_years)),
            ("existing_loans", Some(self.existing_loans)),
            ("monthly_expenses", self.monthly_expenses),
            ("tenure_years", self.tenure_years),
        ];

        for (name, value) in fields {
            let Some(value) = value else { continue };
            if !value.is_finite() {
                errors.push(format!("{}: must be a finite number", name));
            } else if value < 0.0 {
                errors.push(format!("{}: must be non-negative (got {})", name, value));
            }
        }

        if let Some(tenure) = self.tenure_years {
            if tenure == 0.0 {
                errors.push("tenure_years: must be greater than zero".to_string());
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Load an application from a JSON or YAML file.
///
/// `.yaml`/`.yml` files are parsed as YAML, everything else as JSON.
pub fn load_application(path: &Path) -> Result<Application> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read application file at {}", path.display()))?;

    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );

    let application = if is_yaml {
        serde_saphyr::from_str(&content).with_context(|| {
            format!(
                "Failed to parse application: invalid YAML in {}",
                path.display()
            )
        })?
    } else {
        serde_json::from_str(&content).with_context(|| {
            format!(
                "Failed to parse application: invalid JSON in {}",
                path.display()
            )
        })?
    };

    Ok(application)
}
