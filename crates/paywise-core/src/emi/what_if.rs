use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::emi::comparison::build_totals_and_averages;
use crate::emi::schedule::LoanTerms;
use crate::types::Money;
use crate::PaywiseResult;

/// A labelled perturbation of a base scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhatIfShift {
    pub label: String,
    pub terms: LoanTerms,
}

/// Cost deltas of one perturbed scenario against the base scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhatIfRow {
    pub label: String,
    pub emi_total_delta: Money,
    pub emi_monthly_delta: Money,
    pub nocost_total_delta: Money,
    pub full_total_delta: Money,
}

/// One perturbation per lever: rate, tenure, fee, EMI cashback.
pub fn shifts_with(
    base: &LoanTerms,
    rate_bump: Decimal,
    tenure_bump: u32,
    fee_bump: Money,
    cashback_bump: Money,
) -> Vec<WhatIfShift> {
    let mut rate_up = base.clone();
    rate_up.annual_rate_percent += rate_bump;

    let mut tenure_up = base.clone();
    tenure_up.tenure_months += tenure_bump;

    let mut fee_up = base.clone();
    fee_up.processing_fee_base += fee_bump;

    let mut cashback_up = base.clone();
    cashback_up.cashback_emi += cashback_bump;

    vec![
        WhatIfShift {
            label: format!("Interest rate +{rate_bump}%"),
            terms: rate_up,
        },
        WhatIfShift {
            label: format!("Tenure +{tenure_bump} month(s)"),
            terms: tenure_up,
        },
        WhatIfShift {
            label: format!("Processing fee +{fee_bump}"),
            terms: fee_up,
        },
        WhatIfShift {
            label: format!("EMI cashback +{cashback_bump}"),
            terms: cashback_up,
        },
    ]
}

/// The canonical perturbations: rate +0.5%, tenure +1 month, fee +100,
/// EMI cashback +500.
pub fn standard_shifts(base: &LoanTerms) -> Vec<WhatIfShift> {
    shifts_with(base, dec!(0.5), 1, dec!(100), dec!(500))
}

/// Re-run the engine once per shift and report the cost deltas against the
/// base scenario. Each run is an independent pure call.
pub fn what_if(base: &LoanTerms, shifts: &[WhatIfShift]) -> PaywiseResult<Vec<WhatIfRow>> {
    let (base_totals, base_averages) = build_totals_and_averages(base)?;

    let mut rows = Vec::with_capacity(shifts.len());
    for shift in shifts {
        let (totals, averages) = build_totals_and_averages(&shift.terms)?;
        rows.push(WhatIfRow {
            label: shift.label.clone(),
            emi_total_delta: totals.effective_cost_emi - base_totals.effective_cost_emi,
            emi_monthly_delta: averages.avg_monthly_outflow - base_averages.avg_monthly_outflow,
            nocost_total_delta: totals.effective_cost_nocost - base_totals.effective_cost_nocost,
            full_total_delta: totals.effective_cost_full - base_totals.effective_cost_full,
        });
    }

    Ok(rows)
}
