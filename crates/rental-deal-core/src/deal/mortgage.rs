use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};

/// One month of an amortisation schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub month: u64,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    pub balance: Money,
}

/// Level monthly payment for a fully amortising loan.
///
/// `P * r(1+r)^n / ((1+r)^n - 1)` for a positive rate, `P / n` for a zero
/// rate, and zero when there is no principal or no term. If `(1+r)^n`
/// overflows, or the product does, the payment is taken at its limit,
/// interest only (`P * r`), saturating at `Decimal::MAX`.
pub fn monthly_payment(principal: Money, monthly_rate: Rate, total_months: u64) -> Money {
    if principal <= Decimal::ZERO || total_months == 0 {
        return Decimal::ZERO;
    }

    if monthly_rate <= Decimal::ZERO {
        return principal / Decimal::from(total_months);
    }

    let interest_only = principal.saturating_mul(monthly_rate);
    let compound = match (Decimal::ONE + monthly_rate).checked_powu(total_months) {
        Some(c) => c,
        None => return interest_only,
    };

    let denominator = compound - Decimal::ONE;
    if denominator.is_zero() {
        // Rate too small to register at 28 digits
        return principal / Decimal::from(total_months);
    }

    // (1+r)^n / ((1+r)^n - 1) sits just above 1 for long terms; scale by it
    // last so P * r * (1+r)^n is never formed
    compound
        .checked_div(denominator)
        .and_then(|ratio| interest_only.checked_mul(ratio))
        .unwrap_or(interest_only)
}

/// Month-by-month amortisation schedule, `periods` rows at most.
///
/// The balance is clamped at zero so rounding in the last payment never
/// leaves a negative remainder.
pub fn amortization_schedule(
    principal: Money,
    monthly_rate: Rate,
    total_months: u64,
    periods: u64,
) -> Vec<AmortizationRow> {
    let payment = monthly_payment(principal, monthly_rate, total_months);
    let rows = periods.min(total_months);
    let mut schedule = Vec::new();
    let mut balance = principal.max(Decimal::ZERO);

    for month in 1..=rows {
        if balance.is_zero() {
            break;
        }
        let interest = balance.saturating_mul(monthly_rate.max(Decimal::ZERO));
        let mut principal_part = payment - interest;
        if month == total_months || principal_part > balance {
            principal_part = balance;
        }
        balance -= principal_part;

        schedule.push(AmortizationRow {
            month,
            payment: interest + principal_part,
            interest,
            principal: principal_part,
            balance,
        });
    }

    schedule
}

/// Principal retired over the first `months` payments.
pub fn principal_paid(
    principal: Money,
    monthly_rate: Rate,
    total_months: u64,
    months: u64,
) -> Money {
    amortization_schedule(principal, monthly_rate, total_months, months)
        .iter()
        .map(|row| row.principal)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_monthly_payment_standard_30_year() {
        // $160k at 6% over 30 years, ~$959.28/mo
        let payment = monthly_payment(dec!(160000), dec!(0.005), 360);
        assert!(
            (payment - dec!(959.28)).abs() < dec!(0.01),
            "Monthly payment {payment} outside expected range"
        );
    }

    #[test]
    fn test_zero_rate_is_straight_line() {
        let payment = monthly_payment(dec!(120000), Decimal::ZERO, 120);
        assert_eq!(payment, dec!(1000));
    }

    #[test]
    fn test_no_term_or_no_principal_is_zero() {
        assert_eq!(monthly_payment(dec!(100000), dec!(0.005), 0), Decimal::ZERO);
        assert_eq!(monthly_payment(Decimal::ZERO, dec!(0.005), 360), Decimal::ZERO);
    }

    #[test]
    fn test_overflowing_term_falls_back_to_interest_only() {
        let payment = monthly_payment(dec!(100000), dec!(0.01), u64::from(u32::MAX) * 12);
        assert_eq!(payment, dec!(1000));
    }

    #[test]
    fn test_high_rate_long_term_stays_near_interest_only() {
        // 100% APR over 60 years: (1+r)^n ~ 1e25 fits, P*r*(1+r)^n would not
        let rate = dec!(100) / dec!(100) / dec!(12);
        let payment = monthly_payment(dec!(160000), rate, 720);
        let interest_only = dec!(160000) * rate;
        assert!(payment >= interest_only);
        assert!(
            (payment - interest_only).abs() < dec!(0.01),
            "Payment {payment} should approach interest only {interest_only}"
        );
    }

    #[test]
    fn test_huge_principal_saturates_instead_of_panicking() {
        let payment = monthly_payment(Decimal::MAX, dec!(2), 360);
        assert_eq!(payment, Decimal::MAX);
    }

    #[test]
    fn test_schedule_retires_loan() {
        let schedule = amortization_schedule(dec!(10000), dec!(0.01), 12, 12);
        assert_eq!(schedule.len(), 12);
        assert_eq!(schedule.last().unwrap().balance, Decimal::ZERO);

        let total_principal: Decimal = schedule.iter().map(|r| r.principal).sum();
        assert!((total_principal - dec!(10000)).abs() < dec!(0.000001));
    }

    #[test]
    fn test_schedule_first_row_split() {
        let schedule = amortization_schedule(dec!(160000), dec!(0.005), 360, 1);
        let first = &schedule[0];
        assert_eq!(first.interest, dec!(800));
        assert!((first.principal - dec!(159.28)).abs() < dec!(0.01));
    }

    #[test]
    fn test_principal_paid_zero_rate() {
        let paid = principal_paid(dec!(120000), Decimal::ZERO, 120, 12);
        assert_eq!(paid, dec!(12000));
    }
}
