use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::PaywiseError;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates as the user supplies them: whole percentages (12 = 12% p.a.).
pub type Rate = Decimal;

/// GST levied on interest and on processing fees.
pub const GST_RATE: Decimal = dec!(0.18);

/// How the processing fee is charged.
///
/// `Fixed` fees are billed upfront in month 1 alongside their GST.
/// `Percentage` fees (and their GST) are folded into the financed principal
/// and repaid through the installments themselves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeeMode {
    #[default]
    Fixed,
    Percentage,
}

impl FeeMode {
    pub fn label(&self) -> &'static str {
        match self {
            FeeMode::Fixed => "Fixed",
            FeeMode::Percentage => "Percentage",
        }
    }
}

impl fmt::Display for FeeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FeeMode {
    type Err = PaywiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fixed" | "f" => Ok(FeeMode::Fixed),
            "percentage" | "percent" | "p" => Ok(FeeMode::Percentage),
            other => Err(PaywiseError::InvalidInput {
                field: "fee_mode".into(),
                reason: format!("Unknown fee mode '{other}'. Use: fixed, percentage"),
            }),
        }
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_mode_parsing() {
        assert_eq!("fixed".parse::<FeeMode>().unwrap(), FeeMode::Fixed);
        assert_eq!("Percentage".parse::<FeeMode>().unwrap(), FeeMode::Percentage);
        assert_eq!("p".parse::<FeeMode>().unwrap(), FeeMode::Percentage);
        assert_eq!("F".parse::<FeeMode>().unwrap(), FeeMode::Fixed);
        assert!("quarterly".parse::<FeeMode>().is_err());
    }

    #[test]
    fn test_gst_rate_is_18_percent() {
        assert_eq!(GST_RATE, dec!(0.18));
    }
}
