use napi::Result as NapiResult;
use napi_derive::napi;

use rental_deal_core::deal::{self, FinancialInputs, VerdictPolicy};
use rental_deal_core::report;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_policy(policy_json: Option<String>) -> NapiResult<VerdictPolicy> {
    match policy_json.as_deref().map(str::trim) {
        Some(json) if !json.is_empty() => serde_json::from_str(json).map_err(to_napi_error),
        _ => Ok(VerdictPolicy::default()),
    }
}

/// Evaluate a deal; returns the JSON evaluation envelope.
#[napi]
pub fn evaluate_deal(input_json: String, policy_json: Option<String>) -> NapiResult<String> {
    let input: FinancialInputs = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let policy = parse_policy(policy_json)?;
    let output = deal::analyze_deal(&input, &policy).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Evaluate a deal and render the plain-text report for clipboard or email.
#[napi]
pub fn render_deal_report(input_json: String, policy_json: Option<String>) -> NapiResult<String> {
    let input: FinancialInputs = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let policy = parse_policy(policy_json)?;
    let metrics = deal::evaluate_with_policy(&input, &policy).map_err(to_napi_error)?;
    Ok(report::render_report_with_policy(&input, &metrics, &policy))
}

/// Normalise a form field value the same way the engine's input parser does.
#[napi]
pub fn parse_amount(raw: String) -> String {
    deal::parse_amount(&raw).to_string()
}
