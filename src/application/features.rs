use serde::{Deserialize, Serialize};

use super::Application;

pub const FEATURE_COUNT: usize = 8;

/// Canonical feature order. Any persisted model must be trained on exactly this order.
pub const FEATURE_ORDER: [&str; FEATURE_COUNT] = [
    "age",
    "monthly_income",
    "loan_amount",
    "employment_years",
    "debt_to_income",
    "loan_to_income",
    "employment_stability",
    "existing_loans",
];

/// Debt-to-income used when income is zero (worst case)
const NO_INCOME_DTI: f64 = 100.0;

/// Loan-to-income sentinel used when income is zero (unaffordable)
const NO_INCOME_LTI: f64 = 999.0;

/// Numeric features derived from an application.
///
/// Field order matches `FEATURE_ORDER`, so the serialized map keeps the
/// training order too.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq)]
pub struct FeatureVector {
    pub age: f64,
    pub monthly_income: f64,
    pub loan_amount: f64,
    pub employment_years: f64,
    pub debt_to_income: f64,
    pub loan_to_income: f64,
    pub employment_stability: f64,
    pub existing_loans: f64,
}

impl FeatureVector {
    /// Values in canonical order, ready to feed a classifier
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.age,
            self.monthly_income,
            self.loan_amount,
            self.employment_years,
            self.debt_to_income,
            self.loan_to_income,
            self.employment_stability,
            self.existing_loans,
        ]
    }

    /// (name, value) pairs in canonical order
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> {
        FEATURE_ORDER.into_iter().zip(self.to_array())
    }
}

/// Derive the feature vector for an application. All divisions are guarded.
pub fn derive_features(app: &Application) -> FeatureVector {
    let income = app.monthly_income;
    let monthly_expenses = app.monthly_expenses.unwrap_or(income * 0.5);

    let debt_to_income = if income > 0.0 {
        monthly_expenses / income * 100.0
    } else {
        NO_INCOME_DTI
    };

    let loan_to_income = if income > 0.0 {
        app.loan_amount / (income * 12.0) * 100.0
    } else {
        NO_INCOME_LTI
    };

    let employment_stability = if app.age > 0.0 {
        app.employment_years / app.age
    } else {
        0.0
    };

    FeatureVector {
        age: app.age,
        monthly_income: income,
        loan_amount: app.loan_amount,
        employment_years: app.employment_years,
        debt_to_income,
        loan_to_income,
        employment_stability,
        existing_loans: app.existing_loans,
    }
}
