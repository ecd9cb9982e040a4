//! # floodcast
//!
//! Flood forecasting over daily weather series.
//!
//! Stationarizes a six-feature weather history by iterative ADF-gated
//! differencing, forecasts the next day with a VAR model fit by OLS,
//! classifies the forecast as flood or no-flood with k-NN, rebalances
//! the flood minority with SMOTE-style oversampling, and scores the
//! whole chain with a rolling-origin backtest.

#![allow(clippy::needless_range_loop)]

pub mod backtest;
pub mod classify;
pub mod core;
pub mod error;
pub mod oversample;
pub mod pipeline;
pub mod stationarity;
pub mod var;

pub use error::{FloodcastError, Result};

pub mod prelude {
    pub use crate::backtest::{BacktestConfig, BacktestReport, ConfusionMatrix};
    pub use crate::classify::{classify, Classification, FloodLabel};
    pub use crate::core::{WeatherRecord, WeatherSeries, FEATURE_COUNT, FEATURE_NAMES};
    pub use crate::error::{FloodcastError, Result};
    pub use crate::oversample::{oversample, Oversampled, SmoteConfig};
    pub use crate::pipeline::{PipelineConfig, PipelineReport};
    pub use crate::stationarity::{adf_test, stationarize, AdfOutcome, DifferencingReport};
    pub use crate::var::{forecast_one, VarModel};
}
