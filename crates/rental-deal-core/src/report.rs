//! Plain-text deal report.
//!
//! Rendering is a pure function of the inputs and metrics, so the same deal
//! always produces byte-identical text suitable for clipboard or email.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::deal::mortgage::principal_paid;
use crate::deal::{DealMetrics, FinancialInputs, VerdictPolicy};
use crate::types::{Money, Percent};

const LABEL_WIDTH: usize = 30;
const VALUE_WIDTH: usize = 16;

/// Render the report using the default verdict thresholds for strategy notes.
pub fn render_report(inputs: &FinancialInputs, metrics: &DealMetrics) -> String {
    render_report_with_policy(inputs, metrics, &VerdictPolicy::default())
}

/// Render the report; `policy` only feeds the strategy notes.
pub fn render_report_with_policy(
    inputs: &FinancialInputs,
    metrics: &DealMetrics,
    policy: &VerdictPolicy,
) -> String {
    let mut out = String::new();

    let title = match inputs.label() {
        Some(label) => format!("RENTAL DEAL REPORT: {label}"),
        None => "RENTAL DEAL REPORT".to_string(),
    };
    push_line(&mut out, &title);
    push_line(&mut out, &"=".repeat(title.chars().count()));

    section(&mut out, "ASSUMPTIONS");
    line(&mut out, "Purchase price", &money(inputs.purchase_price));
    line(&mut out, "Down payment", &percent(inputs.down_payment_percent));
    line(&mut out, "Interest rate", &percent(inputs.interest_rate));
    line(&mut out, "Loan term", &format!("{} years", inputs.loan_term_years));
    line(&mut out, "Monthly rent", &money(inputs.monthly_rent));
    line(&mut out, "Annual taxes", &money(inputs.annual_taxes));
    line(&mut out, "Annual insurance", &money(inputs.annual_insurance));
    line(&mut out, "Monthly HOA", &money(inputs.monthly_hoa));
    line(&mut out, "Other monthly expenses", &money(inputs.other_monthly_expenses));
    line(
        &mut out,
        "Maintenance & vacancy",
        &format!("{} of rent", percent(inputs.maintenance_vacancy_percent)),
    );
    line(&mut out, "Closing costs", &percent(inputs.closing_costs_percent));
    line(&mut out, "Upfront repairs", &money(inputs.upfront_repairs));

    section(&mut out, "FINANCING");
    line(&mut out, "Down payment amount", &money(metrics.down_payment_amount));
    line(&mut out, "Loan amount", &money(metrics.loan_amount));
    line(&mut out, "Mortgage payment", &money(metrics.monthly_mortgage_payment));

    section(&mut out, "MONTHLY BREAKDOWN");
    line(&mut out, "Rent", &money(inputs.monthly_rent));
    line(&mut out, "Mortgage", &money(metrics.monthly_mortgage_payment));
    line(&mut out, "Taxes", &money(metrics.monthly_taxes));
    line(&mut out, "Insurance", &money(metrics.monthly_insurance));
    line(&mut out, "HOA", &money(inputs.monthly_hoa));
    line(
        &mut out,
        "Maintenance & vacancy",
        &money(metrics.maintenance_vacancy_amount),
    );
    line(&mut out, "Other", &money(inputs.other_monthly_expenses));
    line(&mut out, "Total expenses", &money(metrics.total_monthly_expenses));
    line(&mut out, "Cash flow", &money(metrics.monthly_cash_flow));

    section(&mut out, "RETURNS");
    line(&mut out, "Annual cash flow", &money(metrics.annual_cash_flow));
    line(
        &mut out,
        "Net operating income",
        &money(metrics.annual_net_operating_income),
    );
    line(&mut out, "Cap rate", &percent(metrics.cap_rate_percent));
    line(&mut out, "Closing costs", &money(metrics.closing_costs_amount));
    line(&mut out, "Total cash invested", &money(metrics.total_cash_invested));
    line(
        &mut out,
        "Cash-on-cash return",
        &percent(metrics.cash_on_cash_return_percent),
    );
    if !metrics.debt_service_coverage_ratio.is_zero() {
        line(
            &mut out,
            "Debt service coverage",
            &format!("{}x", round2(metrics.debt_service_coverage_ratio)),
        );
    }

    section(&mut out, "VERDICT");
    push_line(&mut out, &format!("  {}", metrics.verdict));
    push_line(&mut out, &format!("  {}", metrics.verdict_explanation));

    let notes = strategy_notes(inputs, metrics, policy);
    if !notes.is_empty() {
        section(&mut out, "STRATEGY NOTES");
        for note in notes {
            push_line(&mut out, &format!("  - {note}"));
        }
    }

    out
}

/// Observations derived from the metrics, in a fixed order.
pub fn strategy_notes(
    inputs: &FinancialInputs,
    metrics: &DealMetrics,
    policy: &VerdictPolicy,
) -> Vec<String> {
    let mut notes = Vec::new();

    if metrics.monthly_cash_flow < Decimal::ZERO && metrics.break_even_rent > Decimal::ZERO {
        notes.push(format!(
            "Rent must reach {}/mo to break even.",
            money(metrics.break_even_rent)
        ));
    }

    let rent_retained = Decimal::ONE - inputs.maintenance_vacancy_percent / dec!(100);
    if metrics.total_cash_invested > Decimal::ZERO && rent_retained > Decimal::ZERO {
        if let Some(note) = rent_gap_note(metrics, policy, rent_retained) {
            notes.push(note);
        }
    }

    if metrics.loan_amount.is_zero() {
        notes.push("All-cash purchase: no mortgage, returns are unlevered.".into());
    } else if inputs.interest_rate.is_zero() && inputs.loan_term_years > 0 {
        notes.push("Zero-interest financing: every payment goes to principal.".into());
    }

    if metrics.monthly_mortgage_payment > Decimal::ZERO {
        let monthly_rate = inputs.interest_rate / dec!(100) / dec!(12);
        let total_months = u64::from(inputs.loan_term_years) * 12;
        let paydown = principal_paid(metrics.loan_amount, monthly_rate, total_months, 12);
        notes.push(format!(
            "First-year principal paydown builds {} of equity on top of cash flow.",
            money(paydown)
        ));
    }

    notes
}

/// Extra rent needed to reach the Decent tier. The tier asks for both the
/// cash-on-cash threshold and the cash-flow floor; the note names whichever
/// one needs more cash flow.
fn rent_gap_note(
    metrics: &DealMetrics,
    policy: &VerdictPolicy,
    rent_retained: Decimal,
) -> Option<String> {
    let coc_cash_flow = policy
        .decent_cash_on_cash_percent
        .checked_mul(metrics.total_cash_invested)?
        / dec!(1200);

    let (target, goal) = if policy.min_monthly_cash_flow > coc_cash_flow {
        (
            policy.min_monthly_cash_flow,
            format!("monthly cash flow to {}", money(policy.min_monthly_cash_flow)),
        )
    } else {
        (
            coc_cash_flow,
            format!("cash-on-cash to {}", percent(policy.decent_cash_on_cash_percent)),
        )
    };

    if metrics.monthly_cash_flow >= target {
        return None;
    }
    let extra = target
        .checked_sub(metrics.monthly_cash_flow)?
        .checked_div(rent_retained)?;
    Some(format!("Another {}/mo in rent would lift {goal}.", money(extra)))
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

fn push_line(out: &mut String, text: &str) {
    out.push_str(text);
    out.push('\n');
}

fn section(out: &mut String, name: &str) {
    out.push('\n');
    push_line(out, name);
}

fn line(out: &mut String, label: &str, value: &str) {
    push_line(
        out,
        &format!(
            "  {label:<lw$}{value:>vw$}",
            lw = LABEL_WIDTH,
            vw = VALUE_WIDTH
        ),
    );
}

fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `$1,234.56`, negatives as `-$1,234.56`.
pub fn money(value: Money) -> String {
    let rounded = round2(value);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}${grouped}.{cents}")
}

/// `7.92%`
pub fn percent(value: Percent) -> String {
    format!("{:.2}%", round2(value))
}
