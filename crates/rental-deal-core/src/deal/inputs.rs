use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::{Money, Percent};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Financial assumptions for a single rental purchase.
///
/// Every numeric field is non-negative. Deserialisation is lenient: missing,
/// empty, non-numeric or negative values become zero, and a handful of common
/// alternative field names are accepted alongside the canonical ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialInputs {
    /// Acquisition price
    #[serde(
        default,
        deserialize_with = "lenient_amount",
        alias = "purchasePrice",
        alias = "price"
    )]
    pub purchase_price: Money,
    /// Down payment as percent of purchase price (20 = 20%)
    #[serde(
        default,
        deserialize_with = "lenient_amount",
        alias = "downPaymentPercent",
        alias = "downPayment",
        alias = "down_payment"
    )]
    pub down_payment_percent: Percent,
    /// Nominal annual interest rate in percent
    #[serde(
        default,
        deserialize_with = "lenient_amount",
        alias = "interestRate",
        alias = "rate"
    )]
    pub interest_rate: Percent,
    /// Amortisation term in whole years
    #[serde(
        default,
        deserialize_with = "lenient_years",
        alias = "loanTermYears",
        alias = "loan_term",
        alias = "term"
    )]
    pub loan_term_years: u32,
    /// Expected gross monthly rent
    #[serde(
        default,
        deserialize_with = "lenient_amount",
        alias = "monthlyRent",
        alias = "rent"
    )]
    pub monthly_rent: Money,
    #[serde(
        default,
        deserialize_with = "lenient_amount",
        alias = "annualTaxes",
        alias = "taxes"
    )]
    pub annual_taxes: Money,
    #[serde(
        default,
        deserialize_with = "lenient_amount",
        alias = "annualInsurance",
        alias = "insurance"
    )]
    pub annual_insurance: Money,
    #[serde(
        default,
        deserialize_with = "lenient_amount",
        alias = "monthlyHOA",
        alias = "monthlyHoa",
        alias = "hoa"
    )]
    pub monthly_hoa: Money,
    #[serde(
        default,
        deserialize_with = "lenient_amount",
        alias = "otherMonthlyExpenses",
        alias = "other_expenses"
    )]
    pub other_monthly_expenses: Money,
    /// Maintenance and vacancy reserve as percent of monthly rent
    #[serde(
        default,
        deserialize_with = "lenient_amount",
        alias = "maintenanceVacancyPercent",
        alias = "maintenance_percent",
        alias = "vacancy_percent"
    )]
    pub maintenance_vacancy_percent: Percent,
    /// Closing costs as percent of purchase price
    #[serde(
        default,
        deserialize_with = "lenient_amount",
        alias = "closingCostsPercent",
        alias = "closing_costs"
    )]
    pub closing_costs_percent: Percent,
    /// One-time repairs paid at acquisition
    #[serde(
        default,
        deserialize_with = "lenient_amount",
        alias = "upfrontRepairs",
        alias = "repairs"
    )]
    pub upfront_repairs: Money,
    /// Free-text label, only used for display
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        alias = "propertyLabel",
        alias = "label"
    )]
    pub property_label: Option<String>,
}

impl FinancialInputs {
    /// Display label, or `None` when absent or blank.
    pub fn label(&self) -> Option<&str> {
        self.property_label
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Normalisation
// ---------------------------------------------------------------------------

/// Parse a user-typed amount into a non-negative Decimal.
///
/// Currency symbols, thousands separators, surrounding whitespace and a
/// trailing `%` are ignored. Anything that still fails to parse, or parses
/// negative, yields zero.
pub fn parse_amount(raw: &str) -> Decimal {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | '£' | '€' | ',' | '_' | '%') && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return Decimal::ZERO;
    }

    let parsed = Decimal::from_str(&cleaned).or_else(|_| Decimal::from_scientific(&cleaned));
    match parsed {
        Ok(value) => non_negative(value),
        Err(_) => Decimal::ZERO,
    }
}

fn non_negative(value: Decimal) -> Decimal {
    if value.is_sign_negative() {
        Decimal::ZERO
    } else {
        value.normalize()
    }
}

fn whole_years(value: Decimal) -> u32 {
    value.trunc().to_u32().unwrap_or(u32::MAX)
}

struct LenientAmount;

impl<'de> Visitor<'de> for LenientAmount {
    type Value = Decimal;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number, a numeric string, or null")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Decimal, E> {
        Ok(non_negative(Decimal::from(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Decimal, E> {
        Ok(Decimal::from(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Decimal, E> {
        Ok(Decimal::try_from(v).map(non_negative).unwrap_or_default())
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Decimal, E> {
        Ok(parse_amount(v))
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Decimal, E> {
        Ok(Decimal::ZERO)
    }

    fn visit_none<E: de::Error>(self) -> Result<Decimal, E> {
        Ok(Decimal::ZERO)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Decimal, E> {
        Ok(Decimal::ZERO)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Decimal, D::Error> {
        d.deserialize_any(LenientAmount)
    }

    fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Decimal, A::Error> {
        while seq.next_element::<de::IgnoredAny>()?.is_some() {}
        Ok(Decimal::ZERO)
    }

    fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<Decimal, A::Error> {
        while map.next_entry::<de::IgnoredAny, de::IgnoredAny>()?.is_some() {}
        Ok(Decimal::ZERO)
    }
}

fn lenient_amount<'de, D: Deserializer<'de>>(d: D) -> Result<Decimal, D::Error> {
    d.deserialize_any(LenientAmount)
}

fn lenient_years<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    d.deserialize_any(LenientAmount).map(whole_years)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_amount_strips_formatting() {
        assert_eq!(parse_amount("$200,000"), dec!(200000));
        assert_eq!(parse_amount(" 6.5% "), dec!(6.5));
        assert_eq!(parse_amount("€1 250.50"), dec!(1250.5));
    }

    #[test]
    fn test_parse_amount_garbage_is_zero() {
        assert_eq!(parse_amount(""), Decimal::ZERO);
        assert_eq!(parse_amount("   "), Decimal::ZERO);
        assert_eq!(parse_amount("abc"), Decimal::ZERO);
        assert_eq!(parse_amount("12abc"), Decimal::ZERO);
    }

    #[test]
    fn test_parse_amount_negative_is_zero() {
        assert_eq!(parse_amount("-500"), Decimal::ZERO);
    }

    #[test]
    fn test_parse_amount_scientific() {
        assert_eq!(parse_amount("2e5"), dec!(200000));
    }

    #[test]
    fn test_deserialize_canonical_fields() {
        let json = r#"{
            "purchase_price": 200000,
            "down_payment_percent": 20,
            "interest_rate": "6",
            "loan_term_years": 30,
            "monthly_rent": 1800
        }"#;
        let inputs: FinancialInputs = serde_json::from_str(json).unwrap();
        assert_eq!(inputs.purchase_price, dec!(200000));
        assert_eq!(inputs.down_payment_percent, dec!(20));
        assert_eq!(inputs.interest_rate, dec!(6));
        assert_eq!(inputs.loan_term_years, 30);
        assert_eq!(inputs.monthly_rent, dec!(1800));
        assert_eq!(inputs.annual_taxes, Decimal::ZERO);
        assert_eq!(inputs.property_label, None);
    }

    #[test]
    fn test_deserialize_aliases() {
        let json = r#"{
            "purchasePrice": "$150,000",
            "rent": "1,400",
            "monthlyHOA": 75,
            "term": "15",
            "label": "12 Elm St"
        }"#;
        let inputs: FinancialInputs = serde_json::from_str(json).unwrap();
        assert_eq!(inputs.purchase_price, dec!(150000));
        assert_eq!(inputs.monthly_rent, dec!(1400));
        assert_eq!(inputs.monthly_hoa, dec!(75));
        assert_eq!(inputs.loan_term_years, 15);
        assert_eq!(inputs.label(), Some("12 Elm St"));
    }

    #[test]
    fn test_deserialize_malformed_values_become_zero() {
        let json = r#"{
            "purchase_price": null,
            "monthly_rent": "",
            "annual_taxes": -1200,
            "annual_insurance": "n/a",
            "monthly_hoa": true,
            "loan_term_years": "thirty"
        }"#;
        let inputs: FinancialInputs = serde_json::from_str(json).unwrap();
        assert_eq!(inputs, FinancialInputs::default());
    }

    #[test]
    fn test_fractional_term_truncates() {
        let inputs: FinancialInputs =
            serde_json::from_str(r#"{"loan_term_years": 29.9}"#).unwrap();
        assert_eq!(inputs.loan_term_years, 29);
    }

    #[test]
    fn test_blank_label_is_none() {
        let inputs = FinancialInputs {
            property_label: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(inputs.label(), None);
    }

    #[test]
    fn test_nested_values_become_zero() {
        let inputs: FinancialInputs = serde_json::from_str(
            r#"{"purchase_price": [1, 2], "monthly_rent": {"amount": 1800}, "interest_rate": 6}"#,
        )
        .unwrap();
        assert_eq!(inputs.purchase_price, Decimal::ZERO);
        assert_eq!(inputs.monthly_rent, Decimal::ZERO);
        assert_eq!(inputs.interest_rate, dec!(6));
    }
}
