//! First-differencing and the iterative stationarization loop.

use crate::core::{WeatherRecord, WeatherSeries, FEATURE_COUNT};
use crate::error::{FloodcastError, Result};
use crate::stationarity::adf::{adf_test, AdfOutcome};

/// Default cap on differencing iterations. The loop in the original had
/// no bound; exceeding the cap is reported as `DifferencingDiverged`
/// instead of looping until the series is too short to test.
pub const DEFAULT_MAX_STEPS: usize = 10;

/// First difference: `out[i] = series[i+1] - series[i]`.
pub fn difference(series: &[f64]) -> Vec<f64> {
    if series.len() < 2 {
        return Vec::new();
    }
    series.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Diagnostics from one stationarization run.
#[derive(Debug, Clone)]
pub struct DifferencingReport {
    /// How many times every column was differenced.
    pub steps: usize,
    /// Per-feature critical value from the final ADF pass.
    pub critical_values: [f64; FEATURE_COUNT],
    /// Per-feature β statistic from the final ADF pass.
    pub statistics: [f64; FEATURE_COUNT],
}

/// Difference all six feature columns together until every column passes
/// the ADF test, carrying dates and flood labels along with the
/// `steps`-row offset.
pub fn stationarize(
    series: &WeatherSeries,
    max_steps: usize,
) -> Result<(WeatherSeries, DifferencingReport)> {
    let mut columns: Vec<Vec<f64>> = (0..FEATURE_COUNT)
        .map(|f| series.feature_column(f))
        .collect();

    let mut steps = 0;
    let mut critical_values = [0.0; FEATURE_COUNT];
    let mut statistics = [0.0; FEATURE_COUNT];

    loop {
        let mut all_stationary = true;
        for (f, column) in columns.iter().enumerate() {
            let AdfOutcome {
                is_stationary,
                critical_value,
                statistic,
            } = adf_test(column)?;
            critical_values[f] = critical_value;
            statistics[f] = statistic;
            all_stationary &= is_stationary;
        }
        if all_stationary {
            break;
        }
        if steps >= max_steps {
            return Err(FloodcastError::DifferencingDiverged { max_steps });
        }
        for column in columns.iter_mut() {
            *column = difference(column);
        }
        steps += 1;
        log::debug!("differencing step {steps}");
    }

    let length = columns[0].len();
    let mut records = Vec::with_capacity(length);
    for i in 0..length {
        let source = &series.records()[steps + i];
        let features = [
            columns[0][i],
            columns[1][i],
            columns[2][i],
            columns[3][i],
            columns[4][i],
            columns[5][i],
        ];
        records.push(WeatherRecord::from_features(
            source.date,
            features,
            source.flood,
        ));
    }

    let report = DifferencingReport {
        steps,
        critical_values,
        statistics,
    };
    Ok((WeatherSeries::new(records)?, report))
}
