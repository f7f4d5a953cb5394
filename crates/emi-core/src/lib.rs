pub mod error;
pub mod form;
pub mod schedule;
pub mod session;
pub mod types;

pub use error::EmiError;
pub use form::LoanForm;
pub use schedule::{build_schedule, validate, AmortizationSchedule, LoanInput, ScheduleRow};
pub use session::{CalculatorSession, SessionState};
pub use types::*;

/// Standard result type for all schedule operations
pub type EmiResult<T> = Result<T, EmiError>;
