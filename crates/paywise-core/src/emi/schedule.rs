use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::PaywiseError;
use crate::types::{FeeMode, Money, Rate, GST_RATE};
use crate::PaywiseResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Purchase and financing terms for a single comparison scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanTerms {
    pub purchase_amount: Money,
    /// Nominal annual interest rate in percent (12 = 12% p.a.).
    pub annual_rate_percent: Rate,
    pub tenure_months: u32,
    /// Processing fee amount. Billed upfront under `Fixed`, financed under
    /// `Percentage`.
    pub processing_fee_base: Money,
    pub fee_mode: FeeMode,
    pub cashback_full: Money,
    pub cashback_emi: Money,
    pub cashback_nocost: Money,
}

/// One month of the amortization schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub month: u32,
    pub installment: Money,
    pub principal_paid: Money,
    pub interest: Money,
    pub tax_on_interest: Money,
    /// Nonzero only in month 1, and only under `Fixed` fee mode.
    pub processing_fee: Money,
    pub tax_on_fee: Money,
    /// Installment + tax on interest + fee + tax on fee.
    pub total_payment: Money,
    /// Clamped to >= 0 for display; the running balance is not clamped.
    pub principal_remaining: Money,
}

/// Flow columns of the schedule summed per 12-month block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearlyScheduleRow {
    pub year_number: u32,
    pub installments: Money,
    pub principal_paid: Money,
    pub interest: Money,
    pub tax_on_interest: Money,
    pub processing_fee: Money,
    pub tax_on_fee: Money,
    pub total_payment: Money,
    /// Last observation within the block, not a sum.
    pub principal_remaining: Money,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Compute (1 + r)^n via iterative multiplication (avoids Decimal::powd drift).
fn compound(rate: Decimal, n: u32) -> Decimal {
    let mut result = Decimal::ONE;
    let factor = Decimal::ONE + rate;
    for _ in 0..n {
        result *= factor;
    }
    result
}

fn require_non_negative(field: &str, value: Money) -> PaywiseResult<()> {
    if value < Decimal::ZERO {
        return Err(PaywiseError::InvalidInput {
            field: field.into(),
            reason: "must be >= 0".into(),
        });
    }
    Ok(())
}

impl LoanTerms {
    pub fn validate(&self) -> PaywiseResult<()> {
        if self.purchase_amount <= Decimal::ZERO {
            return Err(PaywiseError::InvalidInput {
                field: "purchase_amount".into(),
                reason: "must be > 0".into(),
            });
        }
        if self.tenure_months == 0 {
            return Err(PaywiseError::InvalidInput {
                field: "tenure_months".into(),
                reason: "must be >= 1".into(),
            });
        }
        require_non_negative("annual_rate_percent", self.annual_rate_percent)?;
        require_non_negative("processing_fee_base", self.processing_fee_base)?;
        require_non_negative("cashback_full", self.cashback_full)?;
        require_non_negative("cashback_emi", self.cashback_emi)?;
        require_non_negative("cashback_nocost", self.cashback_nocost)?;
        Ok(())
    }

    /// GST charged on the processing fee.
    pub fn fee_gst(&self) -> Money {
        self.processing_fee_base * GST_RATE
    }

    /// The principal the installment is computed over. Under `Percentage`
    /// fee mode the fee and its GST are financed through the EMI.
    pub fn financed_principal(&self) -> Money {
        match self.fee_mode {
            FeeMode::Fixed => self.purchase_amount,
            FeeMode::Percentage => self.purchase_amount + self.processing_fee_base + self.fee_gst(),
        }
    }

    fn monthly_rate(&self) -> Rate {
        self.annual_rate_percent / dec!(12) / dec!(100)
    }
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// Fixed monthly installment for a loan via the standard amortization formula.
/// Falls back to straight-line principal/months when the rate is zero.
pub fn compute_installment(
    principal: Money,
    annual_rate_percent: Rate,
    months: u32,
) -> PaywiseResult<Money> {
    if months == 0 {
        return Err(PaywiseError::InvalidInput {
            field: "months".into(),
            reason: "must be >= 1".into(),
        });
    }
    if principal < Decimal::ZERO {
        return Err(PaywiseError::InvalidInput {
            field: "principal".into(),
            reason: "must be >= 0".into(),
        });
    }

    let r = annual_rate_percent / dec!(12) / dec!(100);
    if r.is_zero() {
        return Ok(principal / Decimal::from(months));
    }

    let factor = compound(r, months);
    let denominator = factor - Decimal::ONE;
    if denominator.is_zero() {
        return Err(PaywiseError::DivisionByZero {
            context: "installment annuity factor".into(),
        });
    }

    Ok(principal * r * factor / denominator)
}

/// Generate the full amortization schedule and the installment it is built on.
///
/// The running balance starts at the financed principal and is reduced by the
/// principal portion of each installment. Month 1 additionally carries the
/// upfront fee and its GST under `Fixed` fee mode.
pub fn build_schedule(terms: &LoanTerms) -> PaywiseResult<(Vec<AmortizationRow>, Money)> {
    terms.validate()?;

    let financed = terms.financed_principal();
    let installment = compute_installment(financed, terms.annual_rate_percent, terms.tenure_months)?;
    let monthly_rate = terms.monthly_rate();

    let (upfront_fee, upfront_fee_tax) = match terms.fee_mode {
        FeeMode::Fixed => (terms.processing_fee_base, terms.fee_gst()),
        FeeMode::Percentage => (Decimal::ZERO, Decimal::ZERO),
    };

    let mut balance = financed;
    let mut rows = Vec::with_capacity(terms.tenure_months as usize);

    for month in 1..=terms.tenure_months {
        let interest = balance * monthly_rate;
        let tax_on_interest = interest * GST_RATE;
        let principal_paid = installment - interest;
        balance -= principal_paid;

        let (processing_fee, tax_on_fee) = if month == 1 {
            (upfront_fee, upfront_fee_tax)
        } else {
            (Decimal::ZERO, Decimal::ZERO)
        };

        let total_payment = installment + tax_on_interest + processing_fee + tax_on_fee;

        rows.push(AmortizationRow {
            month,
            installment,
            principal_paid,
            interest,
            tax_on_interest,
            processing_fee,
            tax_on_fee,
            total_payment,
            principal_remaining: balance.max(Decimal::ZERO),
        });
    }

    Ok((rows, installment))
}

/// Collapse a monthly schedule into per-year rows: flow columns are summed
/// within each 12-month block, the remaining balance is the block's last
/// observation.
pub fn yearly_schedule(rows: &[AmortizationRow]) -> Vec<YearlyScheduleRow> {
    let mut out: Vec<YearlyScheduleRow> = Vec::new();

    for row in rows {
        let year_number = (row.month - 1) / 12 + 1;
        match out.last_mut() {
            Some(last) if last.year_number == year_number => {
                last.installments += row.installment;
                last.principal_paid += row.principal_paid;
                last.interest += row.interest;
                last.tax_on_interest += row.tax_on_interest;
                last.processing_fee += row.processing_fee;
                last.tax_on_fee += row.tax_on_fee;
                last.total_payment += row.total_payment;
                last.principal_remaining = row.principal_remaining;
            }
            _ => out.push(YearlyScheduleRow {
                year_number,
                installments: row.installment,
                principal_paid: row.principal_paid,
                interest: row.interest,
                tax_on_interest: row.tax_on_interest,
                processing_fee: row.processing_fee,
                tax_on_fee: row.tax_on_fee,
                total_payment: row.total_payment,
                principal_remaining: row.principal_remaining,
            }),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_terms(
        purchase: Decimal,
        rate: Decimal,
        tenure: u32,
        fee: Decimal,
    ) -> LoanTerms {
        LoanTerms {
            purchase_amount: purchase,
            annual_rate_percent: rate,
            tenure_months: tenure,
            processing_fee_base: fee,
            fee_mode: FeeMode::Fixed,
            cashback_full: Decimal::ZERO,
            cashback_emi: Decimal::ZERO,
            cashback_nocost: Decimal::ZERO,
        }
    }

    fn assert_close(actual: Decimal, expected: Decimal, tolerance: Decimal) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_zero_rate_installment_is_straight_line() {
        let installment = compute_installment(dec!(12000), dec!(0), 12).unwrap();
        assert_eq!(installment, dec!(1000));
    }

    #[test]
    fn test_installment_rejects_zero_months() {
        let err = compute_installment(dec!(10000), dec!(12), 0).unwrap_err();
        assert!(matches!(err, PaywiseError::InvalidInput { .. }));
    }

    #[test]
    fn test_installment_rejects_negative_principal() {
        let err = compute_installment(dec!(-1), dec!(12), 12).unwrap_err();
        assert!(matches!(err, PaywiseError::InvalidInput { .. }));
    }

    #[test]
    fn test_installment_matches_standard_formula() {
        // 100k at 12% over 12 months: the textbook answer is ~8884.88
        let installment = compute_installment(dec!(100000), dec!(12), 12).unwrap();
        assert_close(installment, dec!(8884.88), dec!(0.01));
    }

    #[test]
    fn test_schedule_principal_sums_to_financed_and_balance_converges() {
        let terms = fixed_terms(dec!(50000), dec!(14), 24, dec!(500));
        let (rows, _) = build_schedule(&terms).unwrap();
        assert_eq!(rows.len(), 24);

        let principal_sum: Decimal = rows.iter().map(|r| r.principal_paid).sum();
        assert_close(principal_sum, terms.financed_principal(), dec!(0.000001));
        assert_close(
            rows.last().unwrap().principal_remaining,
            Decimal::ZERO,
            dec!(0.000001),
        );
    }

    #[test]
    fn test_balance_is_monotonically_non_increasing() {
        let terms = fixed_terms(dec!(75000), dec!(18), 18, dec!(0));
        let (rows, _) = build_schedule(&terms).unwrap();
        for pair in rows.windows(2) {
            assert!(pair[1].principal_remaining <= pair[0].principal_remaining);
        }
    }

    #[test]
    fn test_fixed_fee_appears_only_in_month_one() {
        let terms = fixed_terms(dec!(12000), dec!(0), 12, dec!(300));
        let (rows, installment) = build_schedule(&terms).unwrap();

        assert_eq!(installment, dec!(1000));
        assert_eq!(rows[0].processing_fee, dec!(300));
        assert_eq!(rows[0].tax_on_fee, dec!(54));
        assert_eq!(rows[0].total_payment, dec!(1354));
        for row in &rows[1..] {
            assert_eq!(row.processing_fee, Decimal::ZERO);
            assert_eq!(row.tax_on_fee, Decimal::ZERO);
        }
    }

    #[test]
    fn test_percentage_fee_is_financed_not_billed() {
        let mut terms = fixed_terms(dec!(100000), dec!(0), 10, dec!(1000));
        terms.fee_mode = FeeMode::Percentage;

        let (rows, installment) = build_schedule(&terms).unwrap();
        // (100000 + 1000 + 180) / 10
        assert_eq!(installment, dec!(10118));

        let fee_column: Decimal = rows.iter().map(|r| r.processing_fee).sum();
        let fee_tax_column: Decimal = rows.iter().map(|r| r.tax_on_fee).sum();
        assert_eq!(fee_column, Decimal::ZERO);
        assert_eq!(fee_tax_column, Decimal::ZERO);
    }

    #[test]
    fn test_schedule_rejects_invalid_terms() {
        let zero_tenure = fixed_terms(dec!(10000), dec!(10), 0, dec!(0));
        assert!(matches!(
            build_schedule(&zero_tenure).unwrap_err(),
            PaywiseError::InvalidInput { .. }
        ));

        let negative_purchase = fixed_terms(dec!(-5), dec!(10), 12, dec!(0));
        assert!(matches!(
            build_schedule(&negative_purchase).unwrap_err(),
            PaywiseError::InvalidInput { .. }
        ));
    }

    #[test]
    fn test_yearly_schedule_reconciles_with_monthly() {
        let terms = fixed_terms(dec!(60000), dec!(12), 24, dec!(400));
        let (rows, _) = build_schedule(&terms).unwrap();
        let yearly = yearly_schedule(&rows);

        assert_eq!(yearly.len(), 2);
        assert_eq!(yearly[0].year_number, 1);
        assert_eq!(yearly[1].year_number, 2);

        let interest_from_yearly: Decimal = yearly.iter().map(|y| y.interest).sum();
        let interest_from_monthly: Decimal = rows.iter().map(|r| r.interest).sum();
        assert_eq!(interest_from_yearly, interest_from_monthly);

        // Fixed fee lands entirely in year 1
        assert_eq!(yearly[0].processing_fee, dec!(400));
        assert_eq!(yearly[1].processing_fee, Decimal::ZERO);

        // Year-end balance is the last monthly observation
        assert_eq!(yearly[0].principal_remaining, rows[11].principal_remaining);
        assert_eq!(yearly[1].principal_remaining, rows[23].principal_remaining);
    }
}
