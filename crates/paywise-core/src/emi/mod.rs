pub mod comparison;
pub mod schedule;
pub mod what_if;

pub use comparison::{
    allocate_cashback, build_totals_and_averages, compute_cashflow_totals, compute_emi_comparison,
    summarize, Averages, Breakdowns, ComparisonRow, ComponentBreakdown, CostSummary, CostTotals,
    EmiComparison, ModeBreakdown, PaymentMode,
};
pub use schedule::{
    build_schedule, compute_installment, yearly_schedule, AmortizationRow, LoanTerms,
    YearlyScheduleRow,
};
pub use what_if::{shifts_with, standard_shifts, what_if, WhatIfRow, WhatIfShift};
