//! Rental deal evaluation: financing, operating cash flow, yields and verdict.

pub mod evaluator;
pub mod inputs;
pub mod mortgage;
pub mod verdict;

pub use evaluator::{analyze_deal, evaluate, evaluate_with_policy, DealMetrics};
pub use inputs::{parse_amount, FinancialInputs};
pub use verdict::{Verdict, VerdictPolicy};
