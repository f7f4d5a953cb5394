//! Stored loan records fetched from disk.
//!
//! Stands in for the upstream system that persists loan terms. The fetch is
//! asynchronous so a front end can overlap it with start-up; the CLI goes
//! through the blocking front door once before calculating.

use log::info;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use emi_core::CalculatorSession;

/// A loan record persisted by an upstream system
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredLoanRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub principal: Decimal,
    pub annual_rate_pct: Decimal,
    pub term_months: u32,
}

impl StoredLoanRecord {
    /// Feed the record into a session through the field setters
    pub fn populate(&self, session: &mut CalculatorSession) {
        session.set_principal(self.principal.to_string());
        session.set_annual_rate_pct(self.annual_rate_pct.to_string());
        session.set_term_months(self.term_months.to_string());
    }
}

/// Fetch a stored loan record from `path`.
pub async fn fetch_record(path: &str) -> Result<StoredLoanRecord, Box<dyn std::error::Error>> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| format!("Failed to read '{path}': {e}"))?;
    let record: StoredLoanRecord = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{path}': {e}"))?;
    match record.name {
        Some(ref name) => info!("loaded loan record '{name}' from {path}"),
        None => info!("loaded loan record from {path}"),
    }
    Ok(record)
}

/// Blocking front door for `fetch_record`, used once at start-up.
pub fn load_record(path: &str) -> Result<StoredLoanRecord, Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(fetch_record(path))
}
