use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::deal::inputs::FinancialInputs;
use crate::deal::mortgage::monthly_payment;
use crate::deal::verdict::{Verdict, VerdictPolicy};
use crate::error::RentalDealError;
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Rate};
use crate::RentalDealResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);
const HUNDRED: Decimal = dec!(100);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Derived investment metrics for one deal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealMetrics {
    // Financing
    pub down_payment_amount: Money,
    pub loan_amount: Money,
    pub monthly_mortgage_payment: Money,
    // Monthly operating figures
    pub monthly_taxes: Money,
    pub monthly_insurance: Money,
    pub maintenance_vacancy_amount: Money,
    /// Mortgage + taxes + insurance + HOA + maintenance/vacancy + other
    pub total_monthly_expenses: Money,
    // Cash flow
    pub monthly_cash_flow: Money,
    pub annual_cash_flow: Money,
    // Unlevered yield
    /// Annual rent less operating expenses, before debt service
    pub annual_net_operating_income: Money,
    pub cap_rate_percent: Percent,
    // Levered yield
    pub closing_costs_amount: Money,
    /// Down payment + closing costs + repairs
    pub total_cash_invested: Money,
    /// Zero when no cash is invested
    pub cash_on_cash_return_percent: Percent,
    /// NOI / annual debt service, zero without debt service
    pub debt_service_coverage_ratio: Decimal,
    /// Monthly rent at which cash flow is exactly zero
    pub break_even_rent: Money,
    pub verdict: Verdict,
    pub verdict_explanation: String,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Evaluate a deal with the default verdict thresholds.
///
/// Fails with `InsufficientData` when the purchase price or the monthly rent
/// is not positive. Every other input may be zero.
pub fn evaluate(inputs: &FinancialInputs) -> RentalDealResult<DealMetrics> {
    compute_metrics(inputs, &VerdictPolicy::default())
}

/// Evaluate a deal with caller-supplied verdict thresholds.
pub fn evaluate_with_policy(
    inputs: &FinancialInputs,
    policy: &VerdictPolicy,
) -> RentalDealResult<DealMetrics> {
    policy.validate()?;
    compute_metrics(inputs, policy)
}

/// Evaluate a deal and wrap the metrics with advisory warnings and metadata.
pub fn analyze_deal(
    inputs: &FinancialInputs,
    policy: &VerdictPolicy,
) -> RentalDealResult<ComputationOutput<DealMetrics>> {
    let start = Instant::now();

    let metrics = evaluate_with_policy(inputs, policy)?;
    let warnings = collect_warnings(inputs, &metrics);

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Rental Deal Evaluation (Cash Flow, Cap Rate, Cash-on-Cash)",
        inputs,
        warnings,
        elapsed,
        metrics,
    ))
}

// ---------------------------------------------------------------------------
// Computation
// ---------------------------------------------------------------------------

fn validate_inputs(inputs: &FinancialInputs) -> RentalDealResult<()> {
    if inputs.purchase_price <= Decimal::ZERO {
        return Err(RentalDealError::InsufficientData {
            field: "purchase_price".into(),
            reason: "Purchase price must be positive to evaluate a deal".into(),
        });
    }
    if inputs.monthly_rent <= Decimal::ZERO {
        return Err(RentalDealError::InsufficientData {
            field: "monthly_rent".into(),
            reason: "Monthly rent must be positive to evaluate a deal".into(),
        });
    }
    Ok(())
}

fn compute_metrics(
    inputs: &FinancialInputs,
    policy: &VerdictPolicy,
) -> RentalDealResult<DealMetrics> {
    validate_inputs(inputs)?;

    let price = inputs.purchase_price;
    let rent = inputs.monthly_rent;

    // --- Financing ---
    let down_payment_amount =
        percent_of(price, inputs.down_payment_percent, "down_payment_amount")?;
    let loan_amount = (price - down_payment_amount).max(Decimal::ZERO);
    let monthly_rate: Rate = inputs.interest_rate / HUNDRED / MONTHS_PER_YEAR;
    let total_months = u64::from(inputs.loan_term_years) * 12;
    let monthly_mortgage_payment = monthly_payment(loan_amount, monthly_rate, total_months);

    // --- Monthly operating figures ---
    let monthly_taxes = inputs.annual_taxes / MONTHS_PER_YEAR;
    let monthly_insurance = inputs.annual_insurance / MONTHS_PER_YEAR;
    let maintenance_vacancy_amount = percent_of(
        rent,
        inputs.maintenance_vacancy_percent,
        "maintenance_vacancy_amount",
    )?;

    let total_monthly_expenses = sum(
        &[
            monthly_mortgage_payment,
            monthly_taxes,
            monthly_insurance,
            inputs.monthly_hoa,
            maintenance_vacancy_amount,
            inputs.other_monthly_expenses,
        ],
        "total_monthly_expenses",
    )?;

    // --- Cash flow ---
    let monthly_cash_flow = rent - total_monthly_expenses;
    let annual_cash_flow = annualize(monthly_cash_flow, "annual_cash_flow")?;

    // --- NOI and cap rate (debt service excluded) ---
    let annual_operating_expenses = sum(
        &[
            inputs.annual_taxes,
            inputs.annual_insurance,
            annualize(inputs.monthly_hoa, "monthly_hoa")?,
            annualize(maintenance_vacancy_amount, "maintenance_vacancy_amount")?,
            annualize(inputs.other_monthly_expenses, "other_monthly_expenses")?,
        ],
        "annual_operating_expenses",
    )?;
    let annual_net_operating_income =
        annualize(rent, "monthly_rent")? - annual_operating_expenses;
    let cap_rate_percent =
        ratio_percent(annual_net_operating_income, price, "cap_rate_percent")?;

    // --- Cash invested and cash-on-cash ---
    let closing_costs_amount =
        percent_of(price, inputs.closing_costs_percent, "closing_costs_amount")?;
    let total_cash_invested = sum(
        &[down_payment_amount, closing_costs_amount, inputs.upfront_repairs],
        "total_cash_invested",
    )?;
    let cash_on_cash_return_percent = if total_cash_invested > Decimal::ZERO {
        ratio_percent(annual_cash_flow, total_cash_invested, "cash_on_cash_return_percent")?
    } else {
        Decimal::ZERO
    };

    // --- Supplementary ratios ---
    let annual_debt_service = annualize(monthly_mortgage_payment, "monthly_mortgage_payment")?;
    let debt_service_coverage_ratio = if annual_debt_service.is_zero() {
        Decimal::ZERO
    } else {
        overflow_checked(
            annual_net_operating_income.checked_div(annual_debt_service),
            "debt_service_coverage_ratio",
        )?
    };

    let rent_retained = Decimal::ONE - inputs.maintenance_vacancy_percent / HUNDRED;
    let break_even_rent = if rent_retained > Decimal::ZERO {
        overflow_checked(
            (total_monthly_expenses - maintenance_vacancy_amount).checked_div(rent_retained),
            "break_even_rent",
        )?
    } else {
        Decimal::ZERO
    };

    // --- Verdict ---
    let verdict = policy.classify(monthly_cash_flow, cash_on_cash_return_percent);

    tracing::debug!(
        %verdict,
        %monthly_cash_flow,
        %cash_on_cash_return_percent,
        %cap_rate_percent,
        "deal evaluated"
    );

    Ok(DealMetrics {
        down_payment_amount,
        loan_amount,
        monthly_mortgage_payment,
        monthly_taxes,
        monthly_insurance,
        maintenance_vacancy_amount,
        total_monthly_expenses,
        monthly_cash_flow,
        annual_cash_flow,
        annual_net_operating_income,
        cap_rate_percent,
        closing_costs_amount,
        total_cash_invested,
        cash_on_cash_return_percent,
        debt_service_coverage_ratio,
        break_even_rent,
        verdict,
        verdict_explanation: verdict.explanation().to_string(),
    })
}

/// Inputs are non-negative and finite, but large enough magnitudes still
/// overflow 28-digit Decimal arithmetic. Those surface as `InvalidInput`.
fn overflow_checked(value: Option<Decimal>, field: &str) -> RentalDealResult<Decimal> {
    value.ok_or_else(|| RentalDealError::InvalidInput {
        field: field.into(),
        reason: "Value is too large to evaluate".into(),
    })
}

fn percent_of(amount: Money, percent: Percent, field: &str) -> RentalDealResult<Money> {
    overflow_checked(amount.checked_mul(percent).map(|v| v / HUNDRED), field)
}

fn annualize(monthly: Money, field: &str) -> RentalDealResult<Money> {
    overflow_checked(monthly.checked_mul(MONTHS_PER_YEAR), field)
}

fn ratio_percent(
    numerator: Decimal,
    denominator: Decimal,
    field: &str,
) -> RentalDealResult<Percent> {
    overflow_checked(
        numerator
            .checked_div(denominator)
            .and_then(|r| r.checked_mul(HUNDRED)),
        field,
    )
}

fn sum(values: &[Decimal], field: &str) -> RentalDealResult<Decimal> {
    overflow_checked(
        values
            .iter()
            .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v)),
        field,
    )
}

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

fn collect_warnings(inputs: &FinancialInputs, metrics: &DealMetrics) -> Vec<String> {
    let mut warnings = Vec::new();

    if metrics.monthly_cash_flow < Decimal::ZERO {
        warnings.push(format!(
            "Monthly cash flow is negative ({:.2}); the property needs {:.2}/mo in rent to break even",
            metrics.monthly_cash_flow, metrics.break_even_rent
        ));
    }

    if metrics.total_cash_invested.is_zero() {
        warnings.push(
            "No cash invested; cash-on-cash return is undefined and reported as 0".into(),
        );
    }

    if metrics.loan_amount > Decimal::ZERO && inputs.loan_term_years == 0 {
        warnings.push(format!(
            "Loan of {:.2} has a zero-year term; mortgage payment treated as 0",
            metrics.loan_amount
        ));
    }

    let percents = [
        ("down_payment_percent", inputs.down_payment_percent),
        ("interest_rate", inputs.interest_rate),
        ("maintenance_vacancy_percent", inputs.maintenance_vacancy_percent),
        ("closing_costs_percent", inputs.closing_costs_percent),
    ];
    for (field, value) in percents {
        if value > HUNDRED {
            warnings.push(format!(
                "{field} is {value}%, above 100%; percent inputs are percent points, not fractions"
            ));
        }
    }

    if metrics.debt_service_coverage_ratio > Decimal::ZERO
        && metrics.debt_service_coverage_ratio < dec!(1.2)
    {
        warnings.push(format!(
            "DSCR of {:.2} is below 1.20x; most lenders would decline this loan",
            metrics.debt_service_coverage_ratio
        ));
    }

    warnings
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
