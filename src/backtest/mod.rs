//! Rolling-origin evaluation of the forecaster and the classifier.
//!
//! Each split reserves a growing tail of the series as test data. Within
//! a split the model is refit on every prefix `[..t]` and judged against
//! record `t`, so every test point is predicted from strictly earlier
//! observations.

pub mod confusion;

pub use confusion::ConfusionMatrix;

use crate::classify::classify;
use crate::core::{feature_range, WeatherRecord, FEATURE_COUNT};
use crate::error::{FloodcastError, Result};
use crate::var::{forecast_one, MAX_LAG_ORDER, MIN_LAG_ORDER};

/// Default evaluation splits: 5% through 30% of the series as test data.
pub const DEFAULT_SPLITS: [f64; 6] = [0.05, 0.10, 0.15, 0.20, 0.25, 0.30];

/// Parameters shared by both evaluation passes.
#[derive(Debug, Clone)]
pub struct BacktestConfig {
    /// Test fractions, each in (0, 1).
    pub splits: Vec<f64>,
    pub lag_order: usize,
    /// Neighbor count for the classifier pass.
    pub k: usize,
}

impl BacktestConfig {
    pub fn new(lag_order: usize, k: usize) -> Self {
        Self {
            splits: DEFAULT_SPLITS.to_vec(),
            lag_order,
            k,
        }
    }

    pub fn with_splits(mut self, splits: Vec<f64>) -> Self {
        self.splits = splits;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.splits.is_empty() {
            return Err(FloodcastError::InvalidParameter(
                "at least one evaluation split is required".to_string(),
            ));
        }
        for &split in &self.splits {
            if !(split > 0.0 && split < 1.0) {
                return Err(FloodcastError::InvalidParameter(format!(
                    "split fraction must be in (0, 1), got {split}"
                )));
            }
        }
        if !(MIN_LAG_ORDER..=MAX_LAG_ORDER).contains(&self.lag_order) {
            return Err(FloodcastError::InvalidParameter(format!(
                "lag order must be {MIN_LAG_ORDER}-{MAX_LAG_ORDER}, got {}",
                self.lag_order
            )));
        }
        if self.k == 0 {
            return Err(FloodcastError::InvalidParameter(
                "k must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Forecast accuracy for one split.
#[derive(Debug, Clone)]
pub struct ForecastSplitScore {
    pub test_fraction: f64,
    /// Per-feature RMSE normalized by the full-series range; 0 when the
    /// range (or the error) is zero.
    pub nrmse: [f64; FEATURE_COUNT],
    /// How many one-step forecasts were scored.
    pub evaluations: usize,
}

/// Classifier performance for one split.
#[derive(Debug, Clone)]
pub struct ClassifierSplitScore {
    pub test_fraction: f64,
    pub matrix: ConfusionMatrix,
}

/// Both evaluation passes over the same splits.
#[derive(Debug, Clone)]
pub struct BacktestReport {
    pub forecast: Vec<ForecastSplitScore>,
    pub classifier: Vec<ClassifierSplitScore>,
}

fn split_bounds(len: usize, fraction: f64) -> (usize, usize) {
    let test_size = (len as f64 * fraction).floor() as usize;
    (len - test_size, test_size)
}

/// Score one-step forecasts over every split.
pub fn evaluate_forecasts(
    records: &[WeatherRecord],
    config: &BacktestConfig,
) -> Result<Vec<ForecastSplitScore>> {
    config.validate()?;
    let (min, max) = feature_range(records)?;
    let n = records.len();

    let mut scores = Vec::with_capacity(config.splits.len());
    for &fraction in &config.splits {
        let (train_size, _) = split_bounds(n, fraction);

        let mut squared_error = [0.0; FEATURE_COUNT];
        let mut evaluations = 0;
        for t in train_size..n.saturating_sub(1) {
            let predicted = forecast_one(&records[..t], config.lag_order)?;
            let actual = records[t].features();
            for f in 0..FEATURE_COUNT {
                squared_error[f] += (predicted[f] - actual[f]).powi(2);
            }
            evaluations += 1;
        }

        let mut nrmse = [0.0; FEATURE_COUNT];
        if evaluations > 0 {
            for f in 0..FEATURE_COUNT {
                let rmse = (squared_error[f] / evaluations as f64).sqrt();
                let range = max[f] - min[f];
                nrmse[f] = if rmse == 0.0 || range == 0.0 {
                    0.0
                } else {
                    rmse / range
                };
            }
        }

        log::debug!(
            "forecast split {:.0}%: {} evaluations",
            fraction * 100.0,
            evaluations
        );
        scores.push(ForecastSplitScore {
            test_fraction: fraction,
            nrmse,
            evaluations,
        });
    }
    Ok(scores)
}

/// Score the forecast-then-classify chain over every split. Works on the
/// plain series or on an oversampled reference list.
pub fn evaluate_classifier(
    records: &[WeatherRecord],
    config: &BacktestConfig,
) -> Result<Vec<ClassifierSplitScore>> {
    config.validate()?;
    if records.is_empty() {
        return Err(FloodcastError::EmptyData);
    }
    let n = records.len();

    let mut scores = Vec::with_capacity(config.splits.len());
    for &fraction in &config.splits {
        let (train_size, _) = split_bounds(n, fraction);

        let mut matrix = ConfusionMatrix::new();
        for t in train_size..n.saturating_sub(1) {
            let train = &records[..t];
            let predicted = forecast_one(train, config.lag_order)?;
            let label = classify(train, &predicted, config.k)?.label;
            matrix.record(records[t].flood, label.is_flood());
        }

        log::debug!(
            "classifier split {:.0}%: {} evaluations",
            fraction * 100.0,
            matrix.total()
        );
        scores.push(ClassifierSplitScore {
            test_fraction: fraction,
            matrix,
        });
    }
    Ok(scores)
}

/// Run both evaluation passes on the same record list.
pub fn run(records: &[WeatherRecord], config: &BacktestConfig) -> Result<BacktestReport> {
    Ok(BacktestReport {
        forecast: evaluate_forecasts(records, config)?,
        classifier: evaluate_classifier(records, config)?,
    })
}
