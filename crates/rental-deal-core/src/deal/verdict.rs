use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::RentalDealError;
use crate::types::{Money, Percent};
use crate::RentalDealResult;

/// Categorical assessment of a deal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    Strong,
    Decent,
    Borderline,
    Negative,
}

impl Verdict {
    /// Fixed one-sentence explanation shown alongside the category.
    pub fn explanation(&self) -> &'static str {
        match self {
            Verdict::Strong => {
                "Strong deal: the property cash flows and returns well on the cash you put in."
            }
            Verdict::Decent => {
                "Decent deal: the property at least breaks even and the cash-on-cash return is solid."
            }
            Verdict::Borderline => {
                "Borderline deal: the property does not lose money, but the return on your cash is thin."
            }
            Verdict::Negative => {
                "Negative cash flow: rent does not cover the mortgage and operating costs."
            }
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Verdict::Strong => "Strong",
            Verdict::Decent => "Decent",
            Verdict::Borderline => "Borderline",
            Verdict::Negative => "Negative",
        };
        f.write_str(label)
    }
}

/// Thresholds driving verdict classification.
///
/// Defaults are 12% / 8% cash-on-cash with no minimum cash-flow buffer.
/// Setting `min_monthly_cash_flow` to e.g. 200 requires that much monthly
/// surplus before a deal can rate Decent or Strong.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerdictPolicy {
    /// Cash-on-cash return (percent) at or above which a positive deal is Strong
    pub strong_cash_on_cash_percent: Percent,
    /// Cash-on-cash return (percent) at or above which a non-negative deal is Decent
    pub decent_cash_on_cash_percent: Percent,
    /// Monthly cash flow a deal must clear to rate Decent or better
    pub min_monthly_cash_flow: Money,
}

impl Default for VerdictPolicy {
    fn default() -> Self {
        Self {
            strong_cash_on_cash_percent: dec!(12),
            decent_cash_on_cash_percent: dec!(8),
            min_monthly_cash_flow: Decimal::ZERO,
        }
    }
}

impl VerdictPolicy {
    pub fn validate(&self) -> RentalDealResult<()> {
        if self.decent_cash_on_cash_percent < Decimal::ZERO {
            return Err(RentalDealError::InvalidInput {
                field: "decent_cash_on_cash_percent".into(),
                reason: "Decent threshold cannot be negative".into(),
            });
        }
        if self.strong_cash_on_cash_percent < self.decent_cash_on_cash_percent {
            return Err(RentalDealError::InvalidInput {
                field: "strong_cash_on_cash_percent".into(),
                reason: "Strong threshold must be at least the Decent threshold".into(),
            });
        }
        if self.min_monthly_cash_flow < Decimal::ZERO {
            return Err(RentalDealError::InvalidInput {
                field: "min_monthly_cash_flow".into(),
                reason: "Minimum monthly cash flow cannot be negative".into(),
            });
        }
        Ok(())
    }

    /// Ordered rule evaluation, first match wins.
    pub fn classify(&self, monthly_cash_flow: Money, cash_on_cash_percent: Percent) -> Verdict {
        if monthly_cash_flow > self.min_monthly_cash_flow
            && cash_on_cash_percent >= self.strong_cash_on_cash_percent
        {
            Verdict::Strong
        } else if monthly_cash_flow >= self.min_monthly_cash_flow
            && cash_on_cash_percent >= self.decent_cash_on_cash_percent
        {
            Verdict::Decent
        } else if monthly_cash_flow < Decimal::ZERO {
            Verdict::Negative
        } else {
            Verdict::Borderline
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strong() {
        let policy = VerdictPolicy::default();
        assert_eq!(policy.classify(dec!(1), dec!(12)), Verdict::Strong);
        assert_eq!(policy.classify(dec!(500), dec!(25)), Verdict::Strong);
    }

    #[test]
    fn test_zero_cash_flow_is_never_strong() {
        let policy = VerdictPolicy::default();
        assert_eq!(policy.classify(Decimal::ZERO, dec!(30)), Verdict::Decent);
    }

    #[test]
    fn test_decent_boundary_is_inclusive() {
        let policy = VerdictPolicy::default();
        assert_eq!(policy.classify(Decimal::ZERO, dec!(8)), Verdict::Decent);
        assert_eq!(policy.classify(dec!(100), dec!(11.99)), Verdict::Decent);
    }

    #[test]
    fn test_negative_cash_flow() {
        let policy = VerdictPolicy::default();
        assert_eq!(policy.classify(dec!(-0.01), dec!(50)), Verdict::Negative);
        assert_eq!(policy.classify(dec!(-300), dec!(-7)), Verdict::Negative);
    }

    #[test]
    fn test_borderline() {
        let policy = VerdictPolicy::default();
        assert_eq!(policy.classify(dec!(50), dec!(7.99)), Verdict::Borderline);
        assert_eq!(policy.classify(Decimal::ZERO, Decimal::ZERO), Verdict::Borderline);
    }

    #[test]
    fn test_cash_flow_buffer_gates_decent() {
        let policy = VerdictPolicy {
            min_monthly_cash_flow: dec!(200),
            ..Default::default()
        };
        assert_eq!(policy.classify(dec!(150), dec!(15)), Verdict::Borderline);
        assert_eq!(policy.classify(dec!(200), dec!(9)), Verdict::Decent);
        assert_eq!(policy.classify(dec!(200), dec!(15)), Verdict::Decent);
        assert_eq!(policy.classify(dec!(201), dec!(15)), Verdict::Strong);
        assert_eq!(policy.classify(dec!(-1), dec!(15)), Verdict::Negative);
    }

    #[test]
    fn test_policy_deserializes_with_defaults() {
        let policy: VerdictPolicy =
            serde_json::from_str(r#"{"min_monthly_cash_flow": "200"}"#).unwrap();
        assert_eq!(policy.strong_cash_on_cash_percent, dec!(12));
        assert_eq!(policy.decent_cash_on_cash_percent, dec!(8));
        assert_eq!(policy.min_monthly_cash_flow, dec!(200));
    }

    #[test]
    fn test_policy_validation() {
        assert!(VerdictPolicy::default().validate().is_ok());

        let inverted = VerdictPolicy {
            strong_cash_on_cash_percent: dec!(6),
            ..Default::default()
        };
        assert!(inverted.validate().is_err());

        let negative_buffer = VerdictPolicy {
            min_monthly_cash_flow: dec!(-50),
            ..Default::default()
        };
        assert!(negative_buffer.validate().is_err());
    }

    #[test]
    fn test_every_verdict_has_explanation() {
        for v in [
            Verdict::Strong,
            Verdict::Decent,
            Verdict::Borderline,
            Verdict::Negative,
        ] {
            assert!(v.explanation().starts_with(&v.to_string()[..3]));
        }
    }
}
