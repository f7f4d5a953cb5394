use clap::Args;
use log::warn;
use serde_json::Value;

use emi_core::{validate, CalculatorSession, LoanForm, LoanInput, Notification};

use crate::input;

/// Arguments for schedule computation
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ScheduleArgs {
    /// Loan principal, e.g. 100000
    #[arg(long)]
    pub principal: Option<String>,

    /// Annual interest rate in percent, e.g. 12 for 12% p.a.
    #[arg(long)]
    pub annual_rate: Option<String>,

    /// Loan term in months
    #[arg(long)]
    pub term_months: Option<String>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Path to a stored loan record to load instead of entering values
    #[arg(long)]
    pub record: Option<String>,
}

/// Arguments for input validation
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ValidateArgs {
    /// Loan principal
    #[arg(long)]
    pub principal: Option<String>,

    /// Annual interest rate in percent
    #[arg(long)]
    pub annual_rate: Option<String>,

    /// Loan term in months
    #[arg(long)]
    pub term_months: Option<String>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Path to a stored loan record to load instead of entering values
    #[arg(long)]
    pub record: Option<String>,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut session = CalculatorSession::new();

    if let Some(ref path) = args.record {
        // A failed fetch surfaces as an error notification and never
        // populates the inputs.
        match input::record::load_record(path) {
            Ok(record) => record.populate(&mut session),
            Err(e) => {
                let note =
                    Notification::error("Error Message", format!("Failed to load loan record: {e}"));
                return Ok(notification_value(&note));
            }
        }
    } else if let Some(ref path) = args.input {
        let loan: LoanInput = input::file::read_json(path)?;
        apply_loan_input(&mut session, &loan);
    } else if let Some(loan) = input::stdin::read_loan_input()? {
        apply_loan_input(&mut session, &loan);
    } else {
        if let Some(principal) = args.principal {
            session.set_principal(principal);
        }
        if let Some(rate) = args.annual_rate {
            session.set_annual_rate_pct(rate);
        }
        if let Some(term) = args.term_months {
            session.set_term_months(term);
        }
    }

    match session.calculate() {
        Ok(output) => Ok(serde_json::to_value(output)?),
        Err(note) => Ok(notification_value(&note)),
    }
}

pub fn run_validate(args: ValidateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.record {
        return match input::record::load_record(path) {
            Ok(record) => {
                let mut session = CalculatorSession::new();
                record.populate(&mut session);
                Ok(form_outcome(session.form()))
            }
            Err(e) => {
                let note =
                    Notification::error("Error Message", format!("Failed to load loan record: {e}"));
                Ok(notification_value(&note))
            }
        };
    }
    if let Some(ref path) = args.input {
        let loan: LoanInput = input::file::read_json(path)?;
        return Ok(validation_outcome(&loan));
    }
    if let Some(loan) = input::stdin::read_loan_input()? {
        return Ok(validation_outcome(&loan));
    }

    let mut form = LoanForm::new();
    if let Some(principal) = args.principal {
        form.set_principal(principal);
    }
    if let Some(rate) = args.annual_rate {
        form.set_annual_rate_pct(rate);
    }
    if let Some(term) = args.term_months {
        form.set_term_months(term);
    }

    Ok(form_outcome(&form))
}

fn form_outcome(form: &LoanForm) -> Value {
    match form.parse() {
        Ok(loan) => validation_outcome(&loan),
        Err(err) => {
            warn!("validation rejected: {err}");
            notification_value(&Notification::invalid_input())
        }
    }
}

fn validation_outcome(loan: &LoanInput) -> Value {
    match validate(loan) {
        Ok(()) => serde_json::json!({ "valid": true, "input": loan }),
        Err(err) => {
            warn!("validation rejected: {err}");
            notification_value(&Notification::invalid_input())
        }
    }
}

fn apply_loan_input(session: &mut CalculatorSession, loan: &LoanInput) {
    session.set_principal(loan.principal.to_string());
    session.set_annual_rate_pct(loan.annual_rate_pct.to_string());
    session.set_term_months(loan.term_months.to_string());
}

fn notification_value(note: &Notification) -> Value {
    serde_json::json!({ "notification": note })
}
