//! Raw text inputs for the calculator.
//!
//! A presentation layer collects principal, annual rate and term as free
//! text. `LoanForm` holds those three strings with an explicit setter per
//! field and parses them strictly into a [`LoanInput`]; blank and
//! non-numeric text both surface as `InvalidInput` so the caller sees a
//! single rejection kind.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EmiError;
use crate::schedule::LoanInput;
use crate::EmiResult;

/// The three unparsed input fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanForm {
    pub principal: String,
    pub annual_rate_pct: String,
    pub term_months: String,
}

impl LoanForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_principal(&mut self, value: impl Into<String>) {
        self.principal = value.into();
    }

    pub fn set_annual_rate_pct(&mut self, value: impl Into<String>) {
        self.annual_rate_pct = value.into();
    }

    pub fn set_term_months(&mut self, value: impl Into<String>) {
        self.term_months = value.into();
    }

    /// True when every field is empty
    pub fn is_blank(&self) -> bool {
        self.principal.is_empty() && self.annual_rate_pct.is_empty() && self.term_months.is_empty()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Parse all three fields into a typed input. Values are trimmed first;
    /// partial numbers like "12abc" and fractional terms are rejected rather
    /// than coerced.
    pub fn parse(&self) -> EmiResult<LoanInput> {
        let principal = parse_decimal("principal", &self.principal)?;
        let annual_rate_pct = parse_decimal("annual_rate_pct", &self.annual_rate_pct)?;
        let term_months = parse_months("term_months", &self.term_months)?;
        Ok(LoanInput {
            principal,
            annual_rate_pct,
            term_months,
        })
    }
}

fn parse_decimal(field: &str, raw: &str) -> EmiResult<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EmiError::InvalidInput {
            field: field.into(),
            reason: "A value is required".into(),
        });
    }
    trimmed.parse::<Decimal>().map_err(|_| EmiError::InvalidInput {
        field: field.into(),
        reason: format!("'{trimmed}' is not a number"),
    })
}

fn parse_months(field: &str, raw: &str) -> EmiResult<u32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EmiError::InvalidInput {
            field: field.into(),
            reason: "A value is required".into(),
        });
    }
    trimmed.parse::<u32>().map_err(|_| EmiError::InvalidInput {
        field: field.into(),
        reason: format!("'{trimmed}' is not a whole number of months"),
    })
}
