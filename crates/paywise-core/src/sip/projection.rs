use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::PaywiseError;
use crate::types::{Money, Rate};
use crate::PaywiseResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Parameters of a step-up SIP projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SipInput {
    pub monthly_sip: Money,
    /// Annual increase of the contribution, applied once per completed
    /// 12-month block (10 = 10%).
    pub annual_stepup_percent: Rate,
    pub annual_return_percent: Rate,
    pub annual_inflation_percent: Rate,
    pub years: u32,
    /// Calendar label for the first month; grouping only, never computation.
    pub start_year: i32,
}

/// One month of the projection. All three tracked quantities are running
/// totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SipProjectionRow {
    pub year: i32,
    pub month_index: u32,
    pub total_invested: Money,
    pub nominal_value: Money,
    pub real_value: Money,
}

/// Year-end snapshot of the running totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SipYearlyRow {
    pub year: i32,
    pub total_invested: Money,
    pub nominal_value: Money,
    pub real_value: Money,
}

impl SipInput {
    fn validate(&self) -> PaywiseResult<()> {
        if self.monthly_sip <= Decimal::ZERO {
            return Err(PaywiseError::InvalidInput {
                field: "monthly_sip".into(),
                reason: "must be > 0".into(),
            });
        }
        if self.years == 0 {
            return Err(PaywiseError::InvalidInput {
                field: "years".into(),
                reason: "must be >= 1".into(),
            });
        }
        for (field, rate) in [
            ("annual_stepup_percent", self.annual_stepup_percent),
            ("annual_return_percent", self.annual_return_percent),
            ("annual_inflation_percent", self.annual_inflation_percent),
        ] {
            if rate < Decimal::ZERO {
                return Err(PaywiseError::InvalidInput {
                    field: field.into(),
                    reason: "must be >= 0".into(),
                });
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// Project a step-up SIP month by month, tracking cumulative invested,
/// nominal value, and inflation-adjusted value.
///
/// Each month the contribution is credited first, then the return is applied
/// to the post-contribution nominal balance. The real balance receives the
/// same interest amount minus inflation erosion on its pre-interest value;
/// erosion is a separate subtraction, never compounded against the return.
pub fn project_growth(input: &SipInput) -> PaywiseResult<Vec<SipProjectionRow>> {
    input.validate()?;

    let monthly_return = input.annual_return_percent / dec!(100) / dec!(12);
    let monthly_inflation = input.annual_inflation_percent / dec!(100) / dec!(12);
    let stepup_factor = Decimal::ONE + input.annual_stepup_percent / dec!(100);
    let total_months = input.years * 12;

    let mut invested = Decimal::ZERO;
    let mut nominal = Decimal::ZERO;
    let mut real = Decimal::ZERO;
    let mut contribution = input.monthly_sip;

    let mut rows = Vec::with_capacity(total_months as usize);

    for m in 1..=total_months {
        // The step-up triggers at each completed 12-month block, not gradually
        if m > 1 && (m - 1) % 12 == 0 {
            contribution *= stepup_factor;
        }

        invested += contribution;
        nominal += contribution;
        real += contribution;

        let interest = nominal * monthly_return;
        let erosion = real * monthly_inflation;
        nominal += interest;
        real = real + interest - erosion;

        rows.push(SipProjectionRow {
            year: input.start_year + ((m - 1) / 12) as i32,
            month_index: m,
            total_invested: invested,
            nominal_value: nominal,
            real_value: real,
        });
    }

    Ok(rows)
}

/// Keep only the last month's running totals per calendar year. No summation:
/// the last observation is definitionally the year-end snapshot.
pub fn rollup_yearly(rows: &[SipProjectionRow]) -> Vec<SipYearlyRow> {
    let mut out: Vec<SipYearlyRow> = Vec::new();

    for row in rows {
        match out.last_mut() {
            Some(last) if last.year == row.year => {
                last.total_invested = row.total_invested;
                last.nominal_value = row.nominal_value;
                last.real_value = row.real_value;
            }
            _ => out.push(SipYearlyRow {
                year: row.year,
                total_invested: row.total_invested,
                nominal_value: row.nominal_value,
                real_value: row.real_value,
            }),
        }
    }

    out
}
