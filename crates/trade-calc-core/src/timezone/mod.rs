pub mod convert;
pub mod offset;
