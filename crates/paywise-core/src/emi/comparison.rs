use std::time::Instant;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::emi::schedule::{build_schedule, AmortizationRow, LoanTerms};
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::PaywiseResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The three ways of paying for the purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMode {
    Full,
    Emi,
    NoCost,
}

impl PaymentMode {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMode::Full => "Full Payment",
            PaymentMode::Emi => "Regular EMI",
            PaymentMode::NoCost => "No-Cost EMI",
        }
    }
}

/// Column sums over the schedule plus the three effective costs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostTotals {
    pub purchase_amount: Money,
    pub total_interest: Money,
    pub total_tax_on_interest: Money,
    /// The fee base. Reported in both fee modes, even though under
    /// `Percentage` mode no fee row appears in the schedule.
    pub total_fee: Money,
    pub total_tax_on_fee: Money,
    pub total_paid: Money,
    pub effective_cost_full: Money,
    pub effective_cost_emi: Money,
    pub effective_cost_nocost: Money,
}

/// Per-period averages for the comparison summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Averages {
    pub avg_monthly_outflow: Money,
    pub avg_fee: Money,
    /// Total interest as a percentage of the purchase amount.
    pub interest_pct_of_purchase: Decimal,
}

/// One row of the fixed three-row comparison table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub mode: PaymentMode,
    pub total_cost: Money,
    pub interest_paid: Money,
    pub fee_paid: Money,
}

/// Four-way cost split for one payment mode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentBreakdown {
    pub principal: Money,
    pub interest: Money,
    pub tax: Money,
    pub fee: Money,
}

impl ComponentBreakdown {
    pub fn total(&self) -> Money {
        self.principal + self.interest + self.tax + self.fee
    }
}

/// Gross and cashback-adjusted breakdown for one payment mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeBreakdown {
    pub gross: ComponentBreakdown,
    pub net: ComponentBreakdown,
    pub cashback: Money,
    pub net_total: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Breakdowns {
    pub full: ModeBreakdown,
    pub emi: ModeBreakdown,
    pub nocost: ModeBreakdown,
}

/// Everything the presentation layer needs for one scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmiComparison {
    pub installment: Money,
    pub schedule: Vec<AmortizationRow>,
    pub totals: CostTotals,
    pub averages: Averages,
    pub comparison: Vec<ComparisonRow>,
    pub breakdowns: Breakdowns,
}

/// Flat one-look summary of a comparison (totals plus per-month averages).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostSummary {
    pub total_interest: Money,
    pub total_tax_on_interest: Money,
    pub total_fee_with_tax: Money,
    pub full_total: Money,
    pub emi_total: Money,
    pub nocost_total: Money,
    pub avg_monthly: Money,
    pub avg_principal: Money,
    pub avg_interest: Money,
    pub avg_tax: Money,
    pub avg_fee: Money,
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// Reduce a gross breakdown by a cashback, in priority order
/// principal -> interest -> tax -> fee. Each component is floored at zero;
/// cashback beyond the gross total is silently discarded.
pub fn allocate_cashback(components: &ComponentBreakdown, cashback: Money) -> ComponentBreakdown {
    let mut remaining = cashback.max(Decimal::ZERO);
    let mut parts = [
        components.principal,
        components.interest,
        components.tax,
        components.fee,
    ];

    for part in parts.iter_mut() {
        if remaining <= Decimal::ZERO {
            break;
        }
        let available = (*part).max(Decimal::ZERO);
        if available.is_zero() {
            continue;
        }
        let reduction = available.min(remaining);
        *part -= reduction;
        remaining -= reduction;
    }

    ComponentBreakdown {
        principal: parts[0],
        interest: parts[1],
        tax: parts[2],
        fee: parts[3],
    }
}

/// Aggregate a schedule into `CostTotals`, including the three effective
/// costs net of their cashbacks.
///
/// Full payment never carries financing fees or interest. No-cost EMI waives
/// the interest itself but not the GST levied on it, nor the fees.
pub fn compute_cashflow_totals(schedule: &[AmortizationRow], terms: &LoanTerms) -> CostTotals {
    let total_interest: Money = schedule.iter().map(|r| r.interest).sum();
    let total_tax_on_interest: Money = schedule.iter().map(|r| r.tax_on_interest).sum();
    let total_paid: Money = schedule.iter().map(|r| r.total_payment).sum();

    let total_fee = terms.processing_fee_base;
    let total_tax_on_fee = terms.fee_gst();

    CostTotals {
        purchase_amount: terms.purchase_amount,
        total_interest,
        total_tax_on_interest,
        total_fee,
        total_tax_on_fee,
        total_paid,
        effective_cost_full: terms.purchase_amount - terms.cashback_full,
        effective_cost_emi: total_paid - terms.cashback_emi,
        effective_cost_nocost: terms.purchase_amount + total_tax_on_interest + total_fee
            + total_tax_on_fee
            - terms.cashback_nocost,
    }
}

/// Build the totals and per-period averages for a scenario without the full
/// comparison bundle. What-if runs lean on this to stay cheap.
pub fn build_totals_and_averages(terms: &LoanTerms) -> PaywiseResult<(CostTotals, Averages)> {
    let (schedule, _) = build_schedule(terms)?;
    let totals = compute_cashflow_totals(&schedule, terms);

    let tenure = Decimal::from(terms.tenure_months);
    let fee_with_gst = totals.total_fee + totals.total_tax_on_fee;
    let averages = Averages {
        avg_monthly_outflow: totals.total_paid / tenure,
        avg_fee: fee_with_gst / tenure,
        interest_pct_of_purchase: totals.total_interest / terms.purchase_amount * dec!(100),
    };

    Ok((totals, averages))
}

fn mode_breakdown(gross: ComponentBreakdown, cashback: Money) -> ModeBreakdown {
    let net = allocate_cashback(&gross, cashback);
    let net_total = net.total();
    ModeBreakdown {
        gross,
        net,
        cashback,
        net_total,
    }
}

/// Run the full three-way comparison for one scenario.
pub fn compute_emi_comparison(
    terms: &LoanTerms,
) -> PaywiseResult<ComputationOutput<EmiComparison>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let (schedule, installment) = build_schedule(terms)?;
    let totals = compute_cashflow_totals(&schedule, terms);

    let tenure = Decimal::from(terms.tenure_months);
    let fee_with_gst = totals.total_fee + totals.total_tax_on_fee;

    let averages = Averages {
        avg_monthly_outflow: totals.total_paid / tenure,
        avg_fee: fee_with_gst / tenure,
        interest_pct_of_purchase: totals.total_interest / terms.purchase_amount * dec!(100),
    };

    let comparison = vec![
        ComparisonRow {
            mode: PaymentMode::Full,
            total_cost: totals.effective_cost_full,
            interest_paid: Decimal::ZERO,
            fee_paid: Decimal::ZERO,
        },
        ComparisonRow {
            mode: PaymentMode::Emi,
            total_cost: totals.effective_cost_emi,
            interest_paid: totals.total_interest + totals.total_tax_on_interest,
            fee_paid: fee_with_gst,
        },
        ComparisonRow {
            mode: PaymentMode::NoCost,
            total_cost: totals.effective_cost_nocost,
            interest_paid: Decimal::ZERO,
            fee_paid: fee_with_gst,
        },
    ];

    let gross_full = ComponentBreakdown {
        principal: terms.purchase_amount,
        ..Default::default()
    };
    let gross_emi = ComponentBreakdown {
        principal: terms.purchase_amount,
        interest: totals.total_interest,
        tax: totals.total_tax_on_interest,
        fee: fee_with_gst,
    };
    let gross_nocost = ComponentBreakdown {
        principal: terms.purchase_amount,
        interest: Decimal::ZERO,
        tax: totals.total_tax_on_interest,
        fee: fee_with_gst,
    };

    for (field, cashback, gross) in [
        ("cashback_full", terms.cashback_full, &gross_full),
        ("cashback_emi", terms.cashback_emi, &gross_emi),
        ("cashback_nocost", terms.cashback_nocost, &gross_nocost),
    ] {
        if cashback > gross.total() {
            warnings.push(format!(
                "{field} exceeds the gross cost of its payment mode; the excess is discarded"
            ));
        }
    }

    let breakdowns = Breakdowns {
        full: mode_breakdown(gross_full, terms.cashback_full),
        emi: mode_breakdown(gross_emi, terms.cashback_emi),
        nocost: mode_breakdown(gross_nocost, terms.cashback_nocost),
    };

    let result = EmiComparison {
        installment,
        schedule,
        totals,
        averages,
        comparison,
        breakdowns,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "EMI amortization with GST on interest and fees; three-way cost comparison (full / regular EMI / no-cost EMI)",
        terms,
        warnings,
        elapsed,
        result,
    ))
}

/// Condense a comparison into a flat summary record.
pub fn summarize(comparison: &EmiComparison) -> CostSummary {
    // The schedule is never empty for a comparison built by this module.
    let tenure = Decimal::from(comparison.schedule.len().max(1) as u64);
    let totals = &comparison.totals;
    let fee_with_tax = totals.total_fee + totals.total_tax_on_fee;

    CostSummary {
        total_interest: totals.total_interest,
        total_tax_on_interest: totals.total_tax_on_interest,
        total_fee_with_tax: fee_with_tax,
        full_total: totals.effective_cost_full,
        emi_total: totals.effective_cost_emi,
        nocost_total: totals.effective_cost_nocost,
        avg_monthly: comparison.averages.avg_monthly_outflow,
        avg_principal: totals.purchase_amount / tenure,
        avg_interest: totals.total_interest / tenure,
        avg_tax: totals.total_tax_on_interest / tenure,
        avg_fee: fee_with_tax / tenure,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FeeMode;
    use pretty_assertions::assert_eq;

    fn terms(
        purchase: Decimal,
        rate: Decimal,
        tenure: u32,
        fee: Decimal,
        fee_mode: FeeMode,
    ) -> LoanTerms {
        LoanTerms {
            purchase_amount: purchase,
            annual_rate_percent: rate,
            tenure_months: tenure,
            processing_fee_base: fee,
            fee_mode,
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
    fn test_allocate_cashback_priority_order() {
        let gross = ComponentBreakdown {
            principal: dec!(100),
            interest: dec!(50),
            tax: dec!(10),
            fee: dec!(5),
        };

        let net = allocate_cashback(&gross, dec!(120));
        assert_eq!(net.principal, Decimal::ZERO);
        assert_eq!(net.interest, dec!(30));
        assert_eq!(net.tax, dec!(10));
        assert_eq!(net.fee, dec!(5));
    }

    #[test]
    fn test_allocate_cashback_caps_at_gross_total() {
        let gross = ComponentBreakdown {
            principal: dec!(100),
            interest: dec!(50),
            tax: dec!(10),
            fee: dec!(5),
        };

        let net = allocate_cashback(&gross, dec!(1000));
        assert_eq!(net.total(), Decimal::ZERO);
        assert!(net.principal >= Decimal::ZERO);
        assert!(net.fee >= Decimal::ZERO);
    }

    #[test]
    fn test_allocate_cashback_conserves_absorbed_amount() {
        let gross = ComponentBreakdown {
            principal: dec!(200),
            interest: dec!(40),
            tax: dec!(7.2),
            fee: dec!(11.8),
        };
        let cashback = dec!(150);

        let net = allocate_cashback(&gross, cashback);
        let absorbed = cashback.min(gross.total());
        assert_eq!(net.total() + absorbed, gross.total());
    }

    #[test]
    fn test_fixed_fee_zero_rate_effective_costs() {
        // purchase=12000, tenure=12, fee=300, rate=0
        let t = terms(dec!(12000), dec!(0), 12, dec!(300), FeeMode::Fixed);
        let output = compute_emi_comparison(&t).unwrap();
        let totals = &output.result.totals;

        assert_eq!(output.result.installment, dec!(1000));
        assert_eq!(totals.total_interest, Decimal::ZERO);
        assert_eq!(totals.total_tax_on_interest, Decimal::ZERO);
        assert_eq!(totals.total_paid, dec!(12354));
        assert_eq!(totals.effective_cost_emi, dec!(12354));
        assert_eq!(totals.effective_cost_full, dec!(12000));
        assert_eq!(totals.effective_cost_nocost, dec!(12354));
    }

    #[test]
    fn test_percentage_fee_zero_rate_effective_costs() {
        let t = terms(dec!(100000), dec!(0), 10, dec!(1000), FeeMode::Percentage);
        let output = compute_emi_comparison(&t).unwrap();
        let totals = &output.result.totals;

        assert_eq!(output.result.installment, dec!(10118));
        assert_eq!(totals.total_paid, dec!(101180));
        assert_eq!(totals.effective_cost_emi, dec!(101180));
        // The fee is still reported in the totals even though it never
        // appears as a schedule line
        assert_eq!(totals.total_fee, dec!(1000));
        assert_eq!(totals.total_tax_on_fee, dec!(180));
    }

    #[test]
    fn test_nocost_waives_interest_but_not_its_tax() {
        let t = terms(dec!(50000), dec!(12), 12, dec!(200), FeeMode::Fixed);
        let output = compute_emi_comparison(&t).unwrap();
        let totals = &output.result.totals;

        let expected = dec!(50000) + totals.total_tax_on_interest + dec!(200) + dec!(36);
        assert_eq!(totals.effective_cost_nocost, expected);
        assert!(totals.total_tax_on_interest > Decimal::ZERO);
    }

    #[test]
    fn test_cashback_reduces_mode_total_by_exactly_min() {
        let mut t = terms(dec!(50000), dec!(12), 12, dec!(200), FeeMode::Fixed);
        t.cashback_emi = dec!(1000);

        let output = compute_emi_comparison(&t).unwrap();
        let emi = &output.result.breakdowns.emi;

        assert_close(
            emi.net_total,
            emi.gross.total() - dec!(1000),
            dec!(0.000001),
        );
        assert_close(
            emi.net_total,
            output.result.totals.effective_cost_emi,
            dec!(0.000001),
        );
    }

    #[test]
    fn test_net_breakdowns_match_effective_costs() {
        let mut t = terms(dec!(80000), dec!(15), 18, dec!(500), FeeMode::Fixed);
        t.cashback_full = dec!(2000);
        t.cashback_emi = dec!(1500);
        t.cashback_nocost = dec!(750);

        let output = compute_emi_comparison(&t).unwrap();
        let r = &output.result;

        assert_close(
            r.breakdowns.full.net_total,
            r.totals.effective_cost_full,
            dec!(0.000001),
        );
        assert_close(
            r.breakdowns.emi.net_total,
            r.totals.effective_cost_emi,
            dec!(0.000001),
        );
        assert_close(
            r.breakdowns.nocost.net_total,
            r.totals.effective_cost_nocost,
            dec!(0.000001),
        );
    }

    #[test]
    fn test_excess_cashback_warns_and_floors_at_zero() {
        let mut t = terms(dec!(10000), dec!(0), 10, dec!(0), FeeMode::Fixed);
        t.cashback_emi = dec!(50000);

        let output = compute_emi_comparison(&t).unwrap();
        assert!(!output.warnings.is_empty());
        assert_eq!(output.result.breakdowns.emi.net_total, Decimal::ZERO);
    }

    #[test]
    fn test_comparison_table_shape() {
        let t = terms(dec!(30000), dec!(10), 6, dec!(150), FeeMode::Fixed);
        let output = compute_emi_comparison(&t).unwrap();
        let table = &output.result.comparison;

        assert_eq!(table.len(), 3);
        assert_eq!(table[0].mode.label(), "Full Payment");
        assert_eq!(table[1].mode.label(), "Regular EMI");
        assert_eq!(table[2].mode.label(), "No-Cost EMI");

        assert_eq!(table[0].interest_paid, Decimal::ZERO);
        assert_eq!(table[0].fee_paid, Decimal::ZERO);
        assert_eq!(table[2].interest_paid, Decimal::ZERO);
        assert_eq!(table[2].fee_paid, dec!(177));
    }

    #[test]
    fn test_summarize_reconciles_with_totals() {
        let t = terms(dec!(24000), dec!(12), 24, dec!(300), FeeMode::Fixed);
        let output = compute_emi_comparison(&t).unwrap();
        let summary = summarize(&output.result);
        let totals = &output.result.totals;

        assert_eq!(summary.emi_total, totals.effective_cost_emi);
        assert_eq!(summary.avg_monthly, totals.total_paid / dec!(24));
        assert_eq!(summary.avg_principal, dec!(1000));
        assert_eq!(summary.avg_fee, dec!(354) / dec!(24));
    }
}
