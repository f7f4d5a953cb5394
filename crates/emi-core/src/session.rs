//! Calculator session shell.
//!
//! Owns the raw input form and the most recent schedule computation. A
//! session is `Idle` until a calculation succeeds, shows that schedule until
//! `reset`, and is left completely untouched by rejected input; the caller
//! receives a [`Notification`] to surface instead.

use log::warn;

use crate::form::LoanForm;
use crate::schedule::{build_schedule, AmortizationSchedule};
use crate::types::{ComputationOutput, Notification};

/// Where the shell currently is in its display cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    DisplayingSchedule,
}

/// Input fields plus the last successful computation
#[derive(Debug, Clone, Default)]
pub struct CalculatorSession {
    form: LoanForm,
    output: Option<ComputationOutput<AmortizationSchedule>>,
}

impl CalculatorSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_form(form: LoanForm) -> Self {
        CalculatorSession { form, output: None }
    }

    pub fn form(&self) -> &LoanForm {
        &self.form
    }

    pub fn set_principal(&mut self, value: impl Into<String>) {
        self.form.set_principal(value);
    }

    pub fn set_annual_rate_pct(&mut self, value: impl Into<String>) {
        self.form.set_annual_rate_pct(value);
    }

    pub fn set_term_months(&mut self, value: impl Into<String>) {
        self.form.set_term_months(value);
    }

    pub fn state(&self) -> SessionState {
        if self.output.is_some() {
            SessionState::DisplayingSchedule
        } else {
            SessionState::Idle
        }
    }

    /// True when a schedule is available for display
    pub fn show_schedule(&self) -> bool {
        self.output.is_some()
    }

    pub fn schedule(&self) -> Option<&AmortizationSchedule> {
        self.output.as_ref().map(|output| &output.result)
    }

    pub fn last_output(&self) -> Option<&ComputationOutput<AmortizationSchedule>> {
        self.output.as_ref()
    }

    /// Parse the form, validate and compute. On success the new schedule
    /// replaces any previous one. On any failure the session keeps its
    /// current form and schedule and the caller gets the fixed warning
    /// notification; the detailed reason goes to the log only.
    pub fn calculate(&mut self) -> Result<&ComputationOutput<AmortizationSchedule>, Notification> {
        let computed = self.form.parse().and_then(|input| build_schedule(&input));
        match computed {
            Ok(output) => Ok(self.output.insert(output)),
            Err(err) => {
                warn!("calculation rejected: {err}");
                Err(Notification::invalid_input())
            }
        }
    }

    /// Clear all three inputs and the displayed schedule, returning to `Idle`
    pub fn reset(&mut self) {
        self.form.clear();
        self.output = None;
    }
}
