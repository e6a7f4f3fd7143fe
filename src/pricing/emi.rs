use serde::{Deserialize, Serialize};

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Longest repayment plan `amortization_schedule` will build (100 years)
pub const MAX_SCHEDULE_MONTHS: u32 = 1200;

/// Monthly rate and month count, or None for a degenerate loan
fn terms(principal: f64, annual_rate: f64, tenure_years: f64) -> Option<(f64, f64)> {
    let inputs = [principal, annual_rate, tenure_years];
    if inputs.iter().any(|v| !v.is_finite() || *v <= 0.0) {
        return None;
    }
    Some((annual_rate / 1200.0, tenure_years * 12.0))
}

fn raw_emi(principal: f64, r: f64, n: f64) -> f64 {
    // (1 + r)^n - 1 without cancellation for tiny r
    let growth_m1 = (n * r.ln_1p()).exp_m1();
    if growth_m1 == 0.0 {
        return principal / n;
    }
    principal * r * (growth_m1 + 1.0) / growth_m1
}

/// Check raw loan terms before pricing them. Zero is allowed and prices to 0.0.
/// Returns all validation errors at once.
pub fn validate_loan_terms(
    principal: f64,
    annual_rate: f64,
    tenure_years: f64,
) -> Result<(), Vec<String>> {
    let errors: Vec<String> = [
        ("principal", principal),
        ("rate", annual_rate),
        ("tenure", tenure_years),
    ]
    .into_iter()
    .filter_map(|(field, value)| {
        if !value.is_finite() {
            Some(format!("{}: must be a finite number", field))
        } else if value < 0.0 {
            Some(format!("{}: must be non-negative", field))
        } else {
            None
        }
    })
    .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Equated monthly installment under reducing-balance amortization.
///
/// `annual_rate` is in percent. Returns 0.0 when principal, rate or tenure is
/// not a positive finite number. The result is rounded to 2 decimal places.
pub fn calculate_emi(principal: f64, annual_rate: f64, tenure_years: f64) -> f64 {
    match terms(principal, annual_rate, tenure_years) {
        Some((r, n)) => round2(raw_emi(principal, r, n)),
        None => 0.0,
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Installment {
    pub month: u32,
    pub payment: f64,
    pub interest: f64,
    pub principal: f64,
    pub balance: f64,
}

/// Month-by-month repayment plan.
///
/// Every installment but the last pays the same EMI as [`calculate_emi`]; the
/// final one clears the remaining balance, so a tenure that is not a whole
/// number of months ends with a shorter payment. Empty for degenerate loans
/// and for plans longer than [`MAX_SCHEDULE_MONTHS`].
pub fn amortization_schedule(
    principal: f64,
    annual_rate: f64,
    tenure_years: f64,
) -> Vec<Installment> {
    let Some((r, n)) = terms(principal, annual_rate, tenure_years) else {
        return Vec::new();
    };
    // Absorb float noise such as 36.000000000000004
    let months = (n - 1e-9).ceil().max(1.0);
    if months > f64::from(MAX_SCHEDULE_MONTHS) {
        return Vec::new();
    }
    let months = months as u32;
    let emi = raw_emi(principal, r, n);

    let mut balance = principal;
    let mut schedule = Vec::with_capacity(months as usize);

    for month in 1..=months {
        let interest = balance * r;
        let principal_part = if month == months {
            balance
        } else {
            (emi - interest).min(balance)
        };
        balance -= principal_part;

        schedule.push(Installment {
            month,
            payment: round2(principal_part + interest),
            interest: round2(interest),
            principal: round2(principal_part),
            balance: round2(balance.max(0.0)),
        });
    }

    schedule
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_emi() {
        // r = 12.5 / 1200, n = 60
        assert_eq!(calculate_emi(300000.0, 12.5, 5.0), 6749.38);
    }

    #[test]
    fn test_emi_matches_closed_form() {
        let (p, rate, years) = (500000.0_f64, 14.0_f64, 5.0_f64);
        let r = rate / 1200.0;
        let n = years * 12.0;
        let expected = p * r * (1.0 + r).powf(n) / ((1.0 + r).powf(n) - 1.0);
        assert!((calculate_emi(p, rate, years) - expected).abs() <= 0.005);
        assert_eq!(calculate_emi(p, rate, years), 11634.13);
    }

    #[test]
    fn test_one_year_emi() {
        assert_eq!(calculate_emi(100000.0, 12.0, 1.0), 8884.88);
    }

    #[test]
    fn test_degenerate_inputs_return_zero() {
        assert_eq!(calculate_emi(0.0, 12.0, 5.0), 0.0);
        assert_eq!(calculate_emi(-5.0, 12.0, 5.0), 0.0);
        assert_eq!(calculate_emi(100000.0, 0.0, 5.0), 0.0);
        assert_eq!(calculate_emi(100000.0, -1.0, 5.0), 0.0);
        assert_eq!(calculate_emi(100000.0, 12.0, 0.0), 0.0);
    }

    #[test]
    fn test_non_finite_inputs_return_zero() {
        assert_eq!(calculate_emi(f64::NAN, 12.0, 5.0), 0.0);
        assert_eq!(calculate_emi(100000.0, f64::INFINITY, 5.0), 0.0);
        assert_eq!(calculate_emi(100000.0, 12.0, f64::INFINITY), 0.0);
    }

    #[test]
    fn test_validate_loan_terms() {
        assert!(validate_loan_terms(300000.0, 12.5, 5.0).is_ok());
        assert!(validate_loan_terms(0.0, 0.0, 0.0).is_ok());

        let errors = validate_loan_terms(f64::NAN, -1.0, f64::INFINITY).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors[0].starts_with("principal"));
        assert!(errors[1].contains("non-negative"));
        assert!(errors[2].starts_with("tenure"));
    }

    #[test]
    fn test_zero_monthly_rate_guard() {
        assert_eq!(raw_emi(1200.0, 0.0, 12.0), 100.0);
    }

    #[test]
    fn test_tiny_positive_rate_approaches_even_split() {
        // P / n = 1666.666...
        assert_eq!(calculate_emi(100000.0, 1e-10, 5.0), 1666.67);
        assert_eq!(calculate_emi(100000.0, 1e-15, 5.0), 1666.67);
    }

    #[test]
    fn test_schedule_length_and_payoff() {
        let schedule = amortization_schedule(300000.0, 12.5, 5.0);
        assert_eq!(schedule.len(), 60);
        assert_eq!(schedule[0].month, 1);
        assert_eq!(schedule.last().unwrap().balance, 0.0);

        // First month interest = 300000 * 12.5 / 1200 = 3125
        assert_eq!(schedule[0].interest, 3125.0);
        assert_eq!(schedule[0].payment, 6749.38);
        assert_eq!(schedule[0].principal, 3624.38);
    }

    #[test]
    fn test_schedule_principal_sums_to_loan() {
        let schedule = amortization_schedule(250000.0, 10.5, 3.0);
        let repaid: f64 = schedule.iter().map(|i| i.principal).sum();
        assert!((repaid - 250000.0).abs() < 0.5);

        // Balance never increases
        assert!(schedule.windows(2).all(|w| w[1].balance <= w[0].balance));
    }

    #[test]
    fn test_fractional_tenure_schedule_matches_emi() {
        // 1.04 years = 12.48 months: 12 full installments and a short 13th
        let emi = calculate_emi(100000.0, 12.0, 1.04);
        let schedule = amortization_schedule(100000.0, 12.0, 1.04);
        assert_eq!(schedule.len(), 13);
        assert!(schedule[..12].iter().all(|i| i.payment == emi));
        assert!(schedule[12].payment < emi);
        assert_eq!(schedule[12].balance, 0.0);
    }

    #[test]
    fn test_schedule_refuses_overlong_plans() {
        assert!(amortization_schedule(100000.0, 12.0, f64::INFINITY).is_empty());
        assert!(amortization_schedule(100000.0, 12.0, 101.0).is_empty());
        assert_eq!(amortization_schedule(100000.0, 12.0, 100.0).len(), 1200);
    }

    #[test]
    fn test_schedule_degenerate_is_empty() {
        assert!(amortization_schedule(0.0, 12.0, 5.0).is_empty());
        assert!(amortization_schedule(100000.0, 0.0, 5.0).is_empty());
        assert!(amortization_schedule(100000.0, 12.0, 0.0).is_empty());
        assert!(amortization_schedule(f64::NAN, 12.0, 5.0).is_empty());
    }
}
