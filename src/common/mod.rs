pub mod error;
pub mod intervals;
