//! Stationarity testing and differencing.

pub mod adf;
pub mod differencing;

pub use adf::{adf_critical_value, adf_test, adf_test_at, AdfOutcome, SignificanceLevel};
pub use differencing::{
    difference, stationarize, DifferencingReport, DEFAULT_MAX_STEPS,
};
