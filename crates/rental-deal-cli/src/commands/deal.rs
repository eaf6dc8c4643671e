use clap::Args;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;

use rental_deal_core::deal::{self, parse_amount, FinancialInputs, VerdictPolicy};

use crate::input;
use crate::store::LastInputsStore;

/// Verdict threshold overrides shared by `evaluate` and `recall`
#[derive(Args, Debug, Default)]
pub struct PolicyArgs {
    /// Verdict policy file (JSON, or YAML with a .yaml/.yml extension)
    #[arg(long)]
    pub policy: Option<String>,

    /// Cash-on-cash percent required for a Strong verdict (default 12)
    #[arg(long)]
    pub strong_coc: Option<Decimal>,

    /// Cash-on-cash percent required for a Decent verdict (default 8)
    #[arg(long)]
    pub decent_coc: Option<Decimal>,

    /// Monthly cash flow a deal must clear to rate Decent or better (default 0)
    #[arg(long)]
    pub min_cash_flow: Option<Decimal>,
}

/// Arguments for deal evaluation
#[derive(Args, Debug, Default)]
#[command(allow_hyphen_values = true)]
pub struct EvaluateArgs {
    /// Purchase price (e.g. 200000 or "$200,000")
    #[arg(long, value_parser = lenient_decimal)]
    pub purchase_price: Option<Decimal>,

    /// Down payment as percent of price (20 for 20%)
    #[arg(long, alias = "down", value_parser = lenient_decimal)]
    pub down_payment_percent: Option<Decimal>,

    /// Nominal annual interest rate in percent (6 for 6%)
    #[arg(long, alias = "rate", value_parser = lenient_decimal)]
    pub interest_rate: Option<Decimal>,

    /// Loan term in years
    #[arg(long, alias = "term", value_parser = lenient_years)]
    pub loan_term_years: Option<u32>,

    /// Expected monthly rent
    #[arg(long, alias = "rent", value_parser = lenient_decimal)]
    pub monthly_rent: Option<Decimal>,

    /// Annual property taxes
    #[arg(long, value_parser = lenient_decimal)]
    pub annual_taxes: Option<Decimal>,

    /// Annual insurance premium
    #[arg(long, value_parser = lenient_decimal)]
    pub annual_insurance: Option<Decimal>,

    /// Monthly HOA dues
    #[arg(long, alias = "hoa", value_parser = lenient_decimal)]
    pub monthly_hoa: Option<Decimal>,

    /// Other monthly expenses (utilities, management, ...)
    #[arg(long, value_parser = lenient_decimal)]
    pub other_monthly_expenses: Option<Decimal>,

    /// Maintenance and vacancy reserve as percent of rent
    #[arg(long, alias = "maintenance", value_parser = lenient_decimal)]
    pub maintenance_vacancy_percent: Option<Decimal>,

    /// Closing costs as percent of price
    #[arg(long, alias = "closing", value_parser = lenient_decimal)]
    pub closing_costs_percent: Option<Decimal>,

    /// One-time repairs at acquisition
    #[arg(long, alias = "repairs", value_parser = lenient_decimal)]
    pub upfront_repairs: Option<Decimal>,

    /// Property label shown in the report
    #[arg(long)]
    pub label: Option<String>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Save the evaluated inputs here for a later `recall`
    #[arg(long)]
    pub save_last: Option<String>,

    #[command(flatten)]
    pub policy: PolicyArgs,
}

/// Arguments for re-evaluating the last saved inputs
#[derive(Args, Debug)]
pub struct RecallArgs {
    /// File written by `evaluate --save-last`
    #[arg(long)]
    pub from: String,

    #[command(flatten)]
    pub policy: PolicyArgs,
}

pub fn run_evaluate(args: EvaluateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let inputs: FinancialInputs = if let Some(ref path) = args.input {
        warn_ignored_flags(&args, "--input file");
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        warn_ignored_flags(&args, "piped stdin");
        serde_json::from_value(data)?
    } else {
        inputs_from_flags(&args)
    };
    let policy = resolve_policy(&args.policy)?;

    let value = evaluate_to_value(&inputs, &policy)?;

    if let Some(ref path) = args.save_last {
        // A failed save must not hide a successful evaluation
        if let Err(e) = LastInputsStore::new(path).save(&inputs) {
            tracing::warn!(path = %path, error = %e, "could not save last inputs");
        }
    }

    Ok(value)
}

pub fn run_recall(args: RecallArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let store = LastInputsStore::new(&args.from);
    let stored = store
        .load()
        .ok_or_else(|| format!("No prior input saved at '{}'", store.path().display()))?;
    tracing::info!(saved_at = %stored.saved_at, "recalled last inputs");

    let policy = resolve_policy(&args.policy)?;
    let mut value = evaluate_to_value(&stored.inputs, &policy)?;
    value["saved_at"] = serde_json::to_value(stored.saved_at)?;
    Ok(value)
}

/// Run the engine and attach the policy so report output can reuse it.
fn evaluate_to_value(
    inputs: &FinancialInputs,
    policy: &VerdictPolicy,
) -> Result<Value, Box<dyn std::error::Error>> {
    let result = deal::analyze_deal(inputs, policy)?;
    let mut value = serde_json::to_value(result)?;
    value["policy"] = serde_json::to_value(policy)?;
    Ok(value)
}

/// Deal flags given alongside a file or piped JSON have no effect.
fn warn_ignored_flags(args: &EvaluateArgs, source: &str) {
    if has_deal_flags(args) {
        tracing::warn!("deal flags ignored; inputs are read from {source}");
    }
}

fn has_deal_flags(args: &EvaluateArgs) -> bool {
    [
        args.purchase_price,
        args.down_payment_percent,
        args.interest_rate,
        args.monthly_rent,
        args.annual_taxes,
        args.annual_insurance,
        args.monthly_hoa,
        args.other_monthly_expenses,
        args.maintenance_vacancy_percent,
        args.closing_costs_percent,
        args.upfront_repairs,
    ]
    .iter()
    .any(Option::is_some)
        || args.loan_term_years.is_some()
        || args.label.is_some()
}

fn inputs_from_flags(args: &EvaluateArgs) -> FinancialInputs {
    FinancialInputs {
        purchase_price: args.purchase_price.unwrap_or_default(),
        down_payment_percent: args.down_payment_percent.unwrap_or_default(),
        interest_rate: args.interest_rate.unwrap_or_default(),
        loan_term_years: args.loan_term_years.unwrap_or_default(),
        monthly_rent: args.monthly_rent.unwrap_or_default(),
        annual_taxes: args.annual_taxes.unwrap_or_default(),
        annual_insurance: args.annual_insurance.unwrap_or_default(),
        monthly_hoa: args.monthly_hoa.unwrap_or_default(),
        other_monthly_expenses: args.other_monthly_expenses.unwrap_or_default(),
        maintenance_vacancy_percent: args.maintenance_vacancy_percent.unwrap_or_default(),
        closing_costs_percent: args.closing_costs_percent.unwrap_or_default(),
        upfront_repairs: args.upfront_repairs.unwrap_or_default(),
        property_label: args.label.clone(),
    }
}

fn resolve_policy(args: &PolicyArgs) -> Result<VerdictPolicy, Box<dyn std::error::Error>> {
    let mut policy: VerdictPolicy = match args.policy {
        Some(ref path) => input::file::read_config(path)?,
        None => VerdictPolicy::default(),
    };

    if let Some(strong) = args.strong_coc {
        policy.strong_cash_on_cash_percent = strong;
    }
    if let Some(decent) = args.decent_coc {
        policy.decent_cash_on_cash_percent = decent;
    }
    if let Some(min) = args.min_cash_flow {
        policy.min_monthly_cash_flow = min;
    }

    Ok(policy)
}

fn lenient_decimal(raw: &str) -> Result<Decimal, String> {
    Ok(parse_amount(raw))
}

fn lenient_years(raw: &str) -> Result<u32, String> {
    Ok(parse_amount(raw).trunc().to_u32().unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: EvaluateArgs,
    }

    fn parse(argv: &[&str]) -> EvaluateArgs {
        let mut full = vec!["rdeal"];
        full.extend_from_slice(argv);
        Harness::parse_from(full).args
    }

    #[test]
    fn test_flags_build_inputs() {
        let args = parse(&[
            "--purchase-price",
            "$200,000",
            "--down",
            "20%",
            "--rate",
            "6",
            "--term",
            "30",
            "--rent",
            "1800",
            "--label",
            "Maple Ave",
        ]);
        let inputs = inputs_from_flags(&args);
        assert_eq!(inputs.purchase_price, dec!(200000));
        assert_eq!(inputs.down_payment_percent, dec!(20));
        assert_eq!(inputs.interest_rate, dec!(6));
        assert_eq!(inputs.loan_term_years, 30);
        assert_eq!(inputs.monthly_rent, dec!(1800));
        assert_eq!(inputs.annual_taxes, Decimal::ZERO);
        assert_eq!(inputs.label(), Some("Maple Ave"));
    }

    #[test]
    fn test_malformed_flags_become_zero() {
        let args = parse(&["--purchase-price", "-5000", "--hoa", "abc", "--term", "x"]);
        let inputs = inputs_from_flags(&args);
        assert_eq!(inputs.purchase_price, Decimal::ZERO);
        assert_eq!(inputs.monthly_hoa, Decimal::ZERO);
        assert_eq!(inputs.loan_term_years, 0);
    }

    #[test]
    fn test_deal_flags_detected() {
        assert!(!has_deal_flags(&parse(&[])));
        assert!(!has_deal_flags(&parse(&["--input", "deal.json", "--min-cash-flow", "200"])));
        assert!(has_deal_flags(&parse(&["--rent", "1800"])));
        assert!(has_deal_flags(&parse(&["--term", "30"])));
        assert!(has_deal_flags(&parse(&["--label", "Maple Ave"])));
    }

    #[test]
    fn test_policy_flags_override_defaults() {
        let policy = resolve_policy(&PolicyArgs {
            min_cash_flow: Some(dec!(200)),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(policy.min_monthly_cash_flow, dec!(200));
        assert_eq!(policy.strong_cash_on_cash_percent, dec!(12));
    }

    #[test]
    fn test_evaluate_value_carries_policy_and_verdict() {
        let inputs = FinancialInputs {
            purchase_price: dec!(100000),
            down_payment_percent: dec!(100),
            monthly_rent: dec!(1000),
            ..Default::default()
        };
        let value = evaluate_to_value(&inputs, &VerdictPolicy::default()).unwrap();
        assert_eq!(value["result"]["verdict"], "Strong");
        assert!(value["policy"].is_object());
        assert!(value["warnings"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_insufficient_data_surfaces_as_error() {
        let err = evaluate_to_value(&FinancialInputs::default(), &VerdictPolicy::default())
            .unwrap_err();
        assert!(err.to_string().starts_with("Insufficient data"));
    }

    #[test]
    fn test_recall_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("last.json");
        let inputs = FinancialInputs {
            purchase_price: dec!(150000),
            down_payment_percent: dec!(100),
            monthly_rent: dec!(1000),
            ..Default::default()
        };
        LastInputsStore::new(&path).save(&inputs).unwrap();

        let value = run_recall(RecallArgs {
            from: path.to_string_lossy().into_owned(),
            policy: PolicyArgs::default(),
        })
        .unwrap();
        assert_eq!(value["result"]["verdict"], "Decent");
        assert!(value["saved_at"].is_string());
    }

    #[test]
    fn test_recall_without_saved_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_recall(RecallArgs {
            from: dir.path().join("none.json").to_string_lossy().into_owned(),
            policy: PolicyArgs::default(),
        })
        .unwrap_err();
        assert!(err.to_string().starts_with("No prior input"));
    }
}
