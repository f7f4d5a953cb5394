use std::io::{self, Read};

use emi_core::LoanInput;

/// Read a typed loan input from stdin when data is being piped.
/// Returns None when stdin is a TTY (interactive) or empty.
pub fn read_loan_input() -> Result<Option<LoanInput>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let input: LoanInput =
        serde_json::from_str(trimmed).map_err(|e| format!("Failed to parse stdin JSON: {e}"))?;
    Ok(Some(input))
}
