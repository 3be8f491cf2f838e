//! Home-loan affordability and repayment calculations with decimal precision.
//!
//! The engine is a pure, deterministic function of user inputs and
//! jurisdiction-specific reference tables: progressive income tax,
//! serviceability-constrained maximum borrowing, amortization schedules,
//! LVR / lenders'-mortgage-insurance estimation, and bracketed stamp duty.
//! All math is performed in `rust_decimal::Decimal`.
//!
//! Out-of-range or missing numeric data degrades to a defined zero/neutral
//! value rather than an error; `Err` is reserved for structural failures
//! such as a required reference table that cannot be interpreted.

pub mod bands;
pub mod error;
pub mod normalize;
pub mod types;

#[cfg(feature = "tax")]
pub mod tax;

#[cfg(feature = "serviceability")]
pub mod serviceability;

#[cfg(feature = "amortization")]
pub mod amortization;

#[cfg(feature = "lvr_lmi")]
pub mod lvr_lmi;

#[cfg(feature = "stamp_duty")]
pub mod stamp_duty;

#[cfg(feature = "affordability")]
pub mod affordability;

pub use error::HomeLoanError;
pub use types::*;

/// Standard result type for all home-loan operations
pub type HomeLoanResult<T> = Result<T, HomeLoanError>;
