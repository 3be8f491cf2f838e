pub mod borrowing_power;
pub mod costs;
pub mod repayments;
