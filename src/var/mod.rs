//! Vector autoregression fit and one-step forecasting.
//!
//! A VAR(p) model regresses each of the six weather features on p lagged
//! values of all six, jointly by OLS over a shared design matrix.

use crate::core::matrix::{least_squares, Matrix};
use crate::core::{WeatherRecord, FEATURE_COUNT};
use crate::error::{FloodcastError, Result};

/// Contractual range for the lag order.
pub const MIN_LAG_ORDER: usize = 1;
pub const MAX_LAG_ORDER: usize = 10;

/// A fitted VAR(p) model. Ephemeral: rebuilt on every forecast call and
/// never persisted.
#[derive(Debug, Clone)]
pub struct VarModel {
    lag_order: usize,
    /// (1 + 6p) × 6 coefficient matrix; row 0 is the intercept, then p
    /// six-wide lag blocks, most recent lag first.
    coefficients: Matrix,
}

impl VarModel {
    /// Fit by solving the normal equations over the record history.
    pub fn fit(records: &[WeatherRecord], lag_order: usize) -> Result<Self> {
        if !(MIN_LAG_ORDER..=MAX_LAG_ORDER).contains(&lag_order) {
            return Err(FloodcastError::InvalidParameter(format!(
                "lag order must be {MIN_LAG_ORDER}-{MAX_LAG_ORDER}, got {lag_order}"
            )));
        }
        // The design matrix has 1 + 6p columns and N - p rows; demand an
        // over-determined system up front instead of failing in the solve.
        let needed = lag_order * FEATURE_COUNT + FEATURE_COUNT + 2;
        if records.len() < needed {
            return Err(FloodcastError::InsufficientData {
                needed,
                got: records.len(),
            });
        }

        let n = records.len();
        let row_count = n - lag_order;
        let mut response = Vec::with_capacity(row_count);
        let mut regressors = Vec::with_capacity(row_count);
        for i in 0..row_count {
            response.push(records[lag_order + i].features().to_vec());
            let mut row = Vec::with_capacity(1 + lag_order * FEATURE_COUNT);
            row.push(1.0);
            for lag in 1..=lag_order {
                row.extend_from_slice(&records[lag_order + i - lag].features());
            }
            regressors.push(row);
        }

        let x = Matrix::from_rows(regressors)?;
        let y = Matrix::from_rows(response)?;
        let coefficients = least_squares(&x, &y)?;

        Ok(Self {
            lag_order,
            coefficients,
        })
    }

    pub fn lag_order(&self) -> usize {
        self.lag_order
    }

    /// Coefficient for one response variable at a flattened regressor
    /// index (0 is the intercept).
    pub fn coefficient(&self, index: usize, variable: usize) -> f64 {
        self.coefficients.get(index, variable)
    }

    /// One-step-ahead forecast from the most recent p observations.
    ///
    /// Flattened coefficient index m (1-based within the lag blocks)
    /// maps to lag ⌈m/6⌉ and feature (m-1) mod 6.
    pub fn forecast(&self, records: &[WeatherRecord]) -> Result<[f64; FEATURE_COUNT]> {
        if records.len() < self.lag_order {
            return Err(FloodcastError::InsufficientData {
                needed: self.lag_order,
                got: records.len(),
            });
        }
        let n = records.len();
        let mut prediction = [0.0; FEATURE_COUNT];
        for (variable, value) in prediction.iter_mut().enumerate() {
            *value = self.coefficients.get(0, variable);
            for m in 1..self.coefficients.rows() {
                let lag = (m - 1) / FEATURE_COUNT + 1;
                let feature = (m - 1) % FEATURE_COUNT;
                *value +=
                    self.coefficients.get(m, variable) * records[n - lag].features()[feature];
            }
        }
        Ok(prediction)
    }
}

/// Fit on the full history and forecast the next step in one call.
pub fn forecast_one(
    records: &[WeatherRecord],
    lag_order: usize,
) -> Result<[f64; FEATURE_COUNT]> {
    let model = VarModel::fit(records, lag_order)?;
    model.forecast(records)
}
