use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Serialize;

use emi_core::{AmortizationSchedule, ComputationOutput, Notification};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[napi]
pub fn validate_loan_input(input_json: String) -> NapiResult<String> {
    let input: emi_core::LoanInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    emi_core::validate(&input).map_err(to_napi_error)?;
    serde_json::to_string(&serde_json::json!({ "valid": true })).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

#[napi]
pub fn build_amortization_schedule(input_json: String) -> NapiResult<String> {
    let input: emi_core::LoanInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = emi_core::build_schedule(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Calculator session
// ---------------------------------------------------------------------------

/// Outcome of a form-driven calculation: the schedule envelope when the
/// input passes, or the notification the presentation layer should surface.
#[derive(Serialize)]
#[serde(rename_all = "lowercase")]
enum FormOutcome<'a> {
    Schedule(&'a ComputationOutput<AmortizationSchedule>),
    Notification(Notification),
}

/// Drive a session from the three raw form fields. Rejected input returns
/// the notification payload instead of throwing, matching the toast flow.
#[napi]
pub fn calculate_from_form(form_json: String) -> NapiResult<String> {
    let form: emi_core::LoanForm = serde_json::from_str(&form_json).map_err(to_napi_error)?;
    let mut session = emi_core::CalculatorSession::with_form(form);
    let outcome = match session.calculate() {
        Ok(output) => serde_json::to_string(&FormOutcome::Schedule(output)),
        Err(note) => serde_json::to_string(&FormOutcome::Notification(note)),
    };
    outcome.map_err(to_napi_error)
}
