use owo_colors::OwoColorize;
use std::io::IsTerminal;

use crate::assessment::Assessment;
use crate::pricing::Installment;
use crate::risk::RiskLevel;
use crate::scoring::RuleBreakdown;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format an amount with thousands separators and 2 decimals (1234567.8 -> "1,234,567.80")
pub fn format_amount(amount: f64) -> String {
    let formatted = format!("{:.2}", amount.abs());
    let (whole, fraction) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, fraction)
}

/// Format a probability as a percentage (0.734 -> "73.4%")
pub fn format_probability(probability: f64) -> String {
    format!("{:.1}%", probability * 100.0)
}

fn colored_risk(risk: RiskLevel) -> String {
    match risk {
        RiskLevel::Low => risk.as_str().green().to_string(),
        RiskLevel::Medium => risk.as_str().yellow().to_string(),
        RiskLevel::High => risk.as_str().red().to_string(),
        RiskLevel::VeryHigh => risk.as_str().red().bold().to_string(),
    }
}

/// Multi-line decision summary
pub fn format_assessment(assessment: &Assessment, use_colors: bool) -> String {
    let prediction = &assessment.prediction;
    let features = &prediction.features_used;
    let pricing = &assessment.pricing;

    let decision = match (prediction.approved, use_colors) {
        (true, true) => "APPROVED".green().bold().to_string(),
        (false, true) => "REJECTED".red().bold().to_string(),
        (true, false) => "APPROVED".to_string(),
        (false, false) => "REJECTED".to_string(),
    };
    let risk = if use_colors {
        colored_risk(assessment.risk_level)
    } else {
        assessment.risk_level.to_string()
    };

    let mut lines = vec![
        format!("Decision: {} ({})", decision, prediction.method),
        format!(
            "  Approval probability: {}",
            format_probability(prediction.approval_probability)
        ),
        format!("  Risk level: {}", risk),
        format!("  Debt-to-income: {:.1}%", features.debt_to_income),
        format!("  Loan-to-income: {:.1}%", features.loan_to_income),
        format!("  Interest rate: {:.2}%", pricing.interest_rate),
        format!(
            "  EMI: {} over {} years",
            format_amount(pricing.emi),
            pricing.tenure_years
        ),
    ];

    if pricing.emi > 0.0 {
        lines.push(format!(
            "  Total payable: {} (interest {})",
            format_amount(pricing.total_payable),
            format_amount(pricing.total_interest)
        ));
    }

    lines.join("\n")
}

/// One line per rule that fired, with the score before and after it
pub fn format_breakdown(breakdown: &RuleBreakdown) -> String {
    if breakdown.factors.is_empty() {
        return format!("No rules matched (score {:.2})", breakdown.score);
    }

    let mut lines: Vec<String> = breakdown
        .factors
        .iter()
        .map(|f| {
            format!(
                "  {:<16} {:>5.2} -> {:>5.2}  {}",
                f.label, f.before, f.after, f.description
            )
        })
        .collect();
    lines.insert(0, "Rule breakdown:".to_string());
    lines.push(format!("  {:<16} {:>14.2}", "Score", breakdown.score));
    lines.join("\n")
}

/// Amortization schedule as a fixed-width table
pub fn format_schedule(schedule: &[Installment]) -> String {
    if schedule.is_empty() {
        return "No repayment schedule (amount, rate and tenure must be positive).".to_string();
    }

    let mut lines = vec![format!(
        "{:>5}  {:>14}  {:>14}  {:>14}  {:>16}",
        "Month", "Payment", "Interest", "Principal", "Balance"
    )];
    lines.extend(schedule.iter().map(|i| {
        format!(
            "{:>5}  {:>14}  {:>14}  {:>14}  {:>16}",
            i.month,
            format_amount(i.payment),
            format_amount(i.interest),
            format_amount(i.principal),
            format_amount(i.balance)
        )
    }));
    lines.join("\n")
}
