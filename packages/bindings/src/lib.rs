use napi::Result as NapiResult;
use napi_derive::napi;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// EMI engine
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_emi_comparison(input_json: String) -> NapiResult<String> {
    let terms: paywise_core::emi::LoanTerms =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = paywise_core::emi::compute_emi_comparison(&terms).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let terms: paywise_core::emi::LoanTerms =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let (rows, installment) = paywise_core::emi::build_schedule(&terms).map_err(to_napi_error)?;
    serde_json::to_string(&serde_json::json!({
        "installment": installment,
        "rows": rows,
    }))
    .map_err(to_napi_error)
}

#[napi]
pub fn cost_summary(input_json: String) -> NapiResult<String> {
    let terms: paywise_core::emi::LoanTerms =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = paywise_core::emi::compute_emi_comparison(&terms).map_err(to_napi_error)?;
    let summary = paywise_core::emi::summarize(&output.result);
    serde_json::to_string(&summary).map_err(to_napi_error)
}

#[napi]
pub fn what_if_standard(input_json: String) -> NapiResult<String> {
    let terms: paywise_core::emi::LoanTerms =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let shifts = paywise_core::emi::standard_shifts(&terms);
    let rows = paywise_core::emi::what_if(&terms, &shifts).map_err(to_napi_error)?;
    serde_json::to_string(&rows).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// SIP engine
// ---------------------------------------------------------------------------

#[napi]
pub fn project_sip(input_json: String) -> NapiResult<String> {
    let input: paywise_core::sip::SipInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let rows = paywise_core::sip::project_growth(&input).map_err(to_napi_error)?;
    serde_json::to_string(&rows).map_err(to_napi_error)
}

#[napi]
pub fn sip_yearly(input_json: String) -> NapiResult<String> {
    let input: paywise_core::sip::SipInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let rows = paywise_core::sip::project_growth(&input).map_err(to_napi_error)?;
    let yearly = paywise_core::sip::rollup_yearly(&rows);
    serde_json::to_string(&yearly).map_err(to_napi_error)
}
