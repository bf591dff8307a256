pub mod investing;
pub mod loans;
pub mod timezone;
