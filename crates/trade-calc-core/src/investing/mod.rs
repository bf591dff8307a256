pub mod sip;
pub mod stock_average;
