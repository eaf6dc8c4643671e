use rental_deal_core::deal::{DealMetrics, FinancialInputs, VerdictPolicy};
use rental_deal_core::report::render_report_with_policy;
use serde_json::Value;

/// Render the envelope as the plain-text deal report.
pub fn print_report(value: &Value) {
    match report_text(value) {
        Ok(text) => print!("{}", text),
        Err(e) => eprintln!("Report rendering error: {}", e),
    }
}

/// Rebuild inputs, metrics and policy from the evaluation envelope.
pub fn report_text(value: &Value) -> Result<String, serde_json::Error> {
    let inputs: FinancialInputs = serde_json::from_value(value["assumptions"].clone())?;
    let metrics: DealMetrics = serde_json::from_value(value["result"].clone())?;
    let policy: VerdictPolicy = match value.get("policy") {
        Some(p) => serde_json::from_value(p.clone())?,
        None => VerdictPolicy::default(),
    };
    Ok(render_report_with_policy(&inputs, &metrics, &policy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rental_deal_core::deal::{analyze_deal, evaluate};
    use rental_deal_core::report::render_report;
    use rust_decimal_macros::dec;

    #[test]
    fn test_envelope_report_matches_direct_render() {
        let inputs = FinancialInputs {
            purchase_price: dec!(200000),
            down_payment_percent: dec!(20),
            interest_rate: dec!(6),
            loan_term_years: 30,
            monthly_rent: dec!(1800),
            annual_taxes: dec!(2400),
            annual_insurance: dec!(1200),
            maintenance_vacancy_percent: dec!(10),
            closing_costs_percent: dec!(3),
            upfront_repairs: dec!(5000),
            property_label: Some("Maple Ave".into()),
            ..Default::default()
        };
        let out = analyze_deal(&inputs, &VerdictPolicy::default()).unwrap();
        let value = serde_json::to_value(out).unwrap();

        let direct = render_report(&inputs, &evaluate(&inputs).unwrap());
        assert_eq!(report_text(&value).unwrap(), direct);
    }
}
