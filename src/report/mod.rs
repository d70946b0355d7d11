//! Farm report and CSV export generation.

pub mod csv;
pub mod generator;

pub use csv::*;
pub use generator::*;
