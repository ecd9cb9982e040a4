//! End-to-end forecasting pipeline.
//!
//! Stages, in order: stationarize the series by iterative differencing,
//! fit a VAR and forecast the next day, classify the forecast by k-NN,
//! oversample the flood minority, classify again on the augmented
//! reference list, then backtest both the forecaster and the classifier.

use crate::backtest::{self, BacktestConfig, BacktestReport, ClassifierSplitScore, DEFAULT_SPLITS};
use crate::classify::{classify, Classification};
use crate::core::{summarize, SeriesSummary, WeatherSeries, FEATURE_COUNT};
use crate::error::{FloodcastError, Result};
use crate::oversample::{
    cosine_similarity_diagnostic, oversample, Oversampled, SimilarityDiagnostic, SmoteConfig,
};
use crate::stationarity::{stationarize, DifferencingReport, DEFAULT_MAX_STEPS};
use crate::var::{forecast_one, MAX_LAG_ORDER, MIN_LAG_ORDER};

/// Contractual bounds on the classifier neighbor count.
pub const MAX_NEIGHBORS: usize = 500;
/// Contractual bound on the oversampling neighbor count.
pub const MAX_SMOTE_NEIGHBORS: usize = 10;
/// Lag order used when the caller does not choose one.
pub const DEFAULT_LAG_ORDER: usize = 5;

/// Parameters for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub lag_order: usize,
    /// Neighbor count for classification.
    pub neighbors: usize,
    /// Neighbor count for minority oversampling.
    pub smote_neighbors: usize,
    pub splits: Vec<f64>,
    /// Seed for the oversampling draws.
    pub seed: Option<u64>,
    pub max_differencing_steps: usize,
}

impl PipelineConfig {
    pub fn new(neighbors: usize, smote_neighbors: usize) -> Self {
        Self {
            lag_order: DEFAULT_LAG_ORDER,
            neighbors,
            smote_neighbors,
            splits: DEFAULT_SPLITS.to_vec(),
            seed: None,
            max_differencing_steps: DEFAULT_MAX_STEPS,
        }
    }

    pub fn with_lag_order(mut self, lag_order: usize) -> Self {
        self.lag_order = lag_order;
        self
    }

    pub fn with_splits(mut self, splits: Vec<f64>) -> Self {
        self.splits = splits;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_LAG_ORDER..=MAX_LAG_ORDER).contains(&self.lag_order) {
            return Err(FloodcastError::InvalidParameter(format!(
                "lag order must be {MIN_LAG_ORDER}-{MAX_LAG_ORDER}, got {}",
                self.lag_order
            )));
        }
        if !(1..=MAX_NEIGHBORS).contains(&self.neighbors) {
            return Err(FloodcastError::InvalidParameter(format!(
                "neighbor count must be 1-{MAX_NEIGHBORS}, got {}",
                self.neighbors
            )));
        }
        if !(1..=MAX_SMOTE_NEIGHBORS).contains(&self.smote_neighbors) {
            return Err(FloodcastError::InvalidParameter(format!(
                "SMOTE neighbor count must be 1-{MAX_SMOTE_NEIGHBORS}, got {}",
                self.smote_neighbors
            )));
        }
        for &split in &self.splits {
            if !(split > 0.0 && split < 1.0) {
                return Err(FloodcastError::InvalidParameter(format!(
                    "split fraction must be in (0, 1), got {split}"
                )));
            }
        }
        Ok(())
    }

    fn backtest_config(&self) -> BacktestConfig {
        BacktestConfig::new(self.lag_order, self.neighbors).with_splits(self.splits.clone())
    }
}

/// Everything a pipeline run produces.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// Descriptive statistics of the raw input.
    pub summary: SeriesSummary,
    pub differencing: DifferencingReport,
    /// Next-day forecast of the six (differenced) features.
    pub forecast: [f64; FEATURE_COUNT],
    /// Classification of the forecast against the plain series.
    pub classification: Classification,
    pub oversampled: Oversampled,
    /// Classification of the same forecast against the augmented list.
    pub smote_classification: Classification,
    /// Synthetic-quality diagnostic; absent when nothing was synthesized.
    pub similarity: Option<SimilarityDiagnostic>,
    /// Forecaster and classifier scores on the plain series.
    pub backtest: BacktestReport,
    /// Classifier scores on the augmented reference list.
    pub smote_classifier: Vec<ClassifierSplitScore>,
}

/// Run the full pipeline on a raw weather series.
pub fn run(series: &WeatherSeries, config: &PipelineConfig) -> Result<PipelineReport> {
    config.validate()?;

    let summary = summarize(series.records())?;

    let (working, differencing) = stationarize(series, config.max_differencing_steps)?;
    log::info!(
        "stationarized {} records in {} differencing steps",
        series.len(),
        differencing.steps
    );

    let forecast = forecast_one(working.records(), config.lag_order)?;
    let classification = classify(working.records(), &forecast, config.neighbors)?;
    log::info!("next-day classification: {}", classification.label);

    let smote = SmoteConfig {
        k: config.smote_neighbors,
        seed: config.seed,
    };
    let oversampled = oversample(&working, &smote)?;
    let similarity = if oversampled.synthetic.is_empty() {
        None
    } else {
        Some(cosine_similarity_diagnostic(
            &oversampled.synthetic,
            &working.minority(),
            working.records(),
        )?)
    };
    let smote_classification = classify(&oversampled.augmented, &forecast, config.neighbors)?;
    log::info!(
        "post-oversampling classification: {} ({} synthetic records)",
        smote_classification.label,
        oversampled.synthetic.len()
    );

    let backtest_config = config.backtest_config();
    let backtest = backtest::run(working.records(), &backtest_config)?;
    let smote_classifier =
        backtest::evaluate_classifier(&oversampled.augmented, &backtest_config)?;

    Ok(PipelineReport {
        summary,
        differencing,
        forecast,
        classification,
        oversampled,
        smote_classification,
        similarity,
        backtest,
        smote_classifier,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PipelineConfig {
        PipelineConfig::new(3, 2).with_lag_order(1).with_seed(42)
    }

    #[test]
    fn validate_enforces_every_parameter_range() {
        assert!(config().validate().is_ok());

        assert!(matches!(
            config().with_lag_order(0).validate(),
            Err(FloodcastError::InvalidParameter(_))
        ));
        assert!(matches!(
            config().with_lag_order(11).validate(),
            Err(FloodcastError::InvalidParameter(_))
        ));
        assert!(matches!(
            PipelineConfig::new(0, 2).validate(),
            Err(FloodcastError::InvalidParameter(_))
        ));
        assert!(matches!(
            PipelineConfig::new(501, 2).validate(),
            Err(FloodcastError::InvalidParameter(_))
        ));
        assert!(matches!(
            PipelineConfig::new(3, 0).validate(),
            Err(FloodcastError::InvalidParameter(_))
        ));
        assert!(matches!(
            PipelineConfig::new(3, 11).validate(),
            Err(FloodcastError::InvalidParameter(_))
        ));
        assert!(matches!(
            config().with_splits(vec![0.0]).validate(),
            Err(FloodcastError::InvalidParameter(_))
        ));
    }

    #[test]
    fn defaults_match_the_contract() {
        let config = PipelineConfig::new(5, 3);
        assert_eq!(config.lag_order, DEFAULT_LAG_ORDER);
        assert_eq!(config.splits, DEFAULT_SPLITS.to_vec());
        assert_eq!(config.max_differencing_steps, DEFAULT_MAX_STEPS);
        assert!(config.seed.is_none());
    }
}
