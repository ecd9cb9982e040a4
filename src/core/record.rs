//! Weather records and the ordered daily series the pipeline runs on.

use crate::error::{FloodcastError, Result};
use chrono::NaiveDate;

/// Number of weather features per daily record.
pub const FEATURE_COUNT: usize = 6;

/// Feature names in contractual order. Every distance, regression and
/// interpolation operation in the crate indexes features positionally
/// against this order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "WS10M",
    "RH2M",
    "PRECTOTCORR",
    "T2M",
    "T2M_MAX",
    "T2M_MIN",
];

/// One day of weather observations plus the flood indicator.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherRecord {
    pub date: NaiveDate,
    pub wind_speed: f64,
    pub rel_humidity: f64,
    pub precipitation: f64,
    pub temp_avg: f64,
    pub temp_max: f64,
    pub temp_min: f64,
    pub flood: bool,
}

impl WeatherRecord {
    /// Build a record from a feature vector in contractual order.
    pub fn from_features(date: NaiveDate, features: [f64; FEATURE_COUNT], flood: bool) -> Self {
        Self {
            date,
            wind_speed: features[0],
            rel_humidity: features[1],
            precipitation: features[2],
            temp_avg: features[3],
            temp_max: features[4],
            temp_min: features[5],
            flood,
        }
    }

    /// Feature vector in contractual order.
    pub fn features(&self) -> [f64; FEATURE_COUNT] {
        [
            self.wind_speed,
            self.rel_humidity,
            self.precipitation,
            self.temp_avg,
            self.temp_max,
            self.temp_min,
        ]
    }

    /// Whether two records carry exactly the same feature values.
    /// Used to exclude a record from its own neighbor set.
    pub fn same_features(&self, other: &WeatherRecord) -> bool {
        self.features() == other.features()
    }
}

/// Ordered daily weather series, strictly increasing by date.
///
/// Produced by the ingestion collaborator; the pipeline only reads it or
/// derives new series from it (differencing, augmentation).
#[derive(Debug, Clone)]
pub struct WeatherSeries {
    records: Vec<WeatherRecord>,
}

impl WeatherSeries {
    /// Create a series, validating that dates are strictly increasing.
    pub fn new(records: Vec<WeatherRecord>) -> Result<Self> {
        for pair in records.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(FloodcastError::DateError(
                    "record dates must be strictly increasing".to_string(),
                ));
            }
        }
        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[WeatherRecord] {
        &self.records
    }

    /// One feature column across the whole series.
    pub fn feature_column(&self, feature: usize) -> Vec<f64> {
        self.records.iter().map(|r| r.features()[feature]).collect()
    }

    /// Records flagged as flood days (the minority class).
    pub fn minority(&self) -> Vec<WeatherRecord> {
        self.records.iter().filter(|r| r.flood).cloned().collect()
    }

    pub fn flood_count(&self) -> usize {
        self.records.iter().filter(|r| r.flood).count()
    }

    /// Per-feature (min, max) over the whole series.
    pub fn feature_range(&self) -> Result<([f64; FEATURE_COUNT], [f64; FEATURE_COUNT])> {
        feature_range(&self.records)
    }

    /// Descriptive per-feature statistics plus flood counts.
    pub fn summarize(&self) -> Result<SeriesSummary> {
        summarize(&self.records)
    }
}

/// Per-feature (min, max) over a record slice.
pub fn feature_range(
    records: &[WeatherRecord],
) -> Result<([f64; FEATURE_COUNT], [f64; FEATURE_COUNT])> {
    let first = records.first().ok_or(FloodcastError::EmptyData)?;
    let mut min = first.features();
    let mut max = first.features();
    for record in records {
        let features = record.features();
        for f in 0..FEATURE_COUNT {
            if features[f] < min[f] {
                min[f] = features[f];
            }
            if features[f] > max[f] {
                max[f] = features[f];
            }
        }
    }
    Ok((min, max))
}

/// Per-feature descriptive statistics.
#[derive(Debug, Clone)]
pub struct FeatureStats {
    pub min: [f64; FEATURE_COUNT],
    pub max: [f64; FEATURE_COUNT],
    pub mean: [f64; FEATURE_COUNT],
    pub variance: [f64; FEATURE_COUNT],
    pub std_dev: [f64; FEATURE_COUNT],
}

/// Descriptive summary of a series: feature statistics and class balance.
#[derive(Debug, Clone)]
pub struct SeriesSummary {
    pub stats: FeatureStats,
    pub record_count: usize,
    pub flood_count: usize,
    pub flood_fraction: f64,
}

/// Compute descriptive statistics over a record slice.
pub fn summarize(records: &[WeatherRecord]) -> Result<SeriesSummary> {
    let (min, max) = feature_range(records)?;
    let n = records.len() as f64;

    let mut mean = [0.0; FEATURE_COUNT];
    for record in records {
        let features = record.features();
        for f in 0..FEATURE_COUNT {
            mean[f] += features[f];
        }
    }
    for m in mean.iter_mut() {
        *m /= n;
    }

    let mut variance = [0.0; FEATURE_COUNT];
    for record in records {
        let features = record.features();
        for f in 0..FEATURE_COUNT {
            variance[f] += (features[f] - mean[f]).powi(2);
        }
    }
    let mut std_dev = [0.0; FEATURE_COUNT];
    for f in 0..FEATURE_COUNT {
        variance[f] /= n;
        std_dev[f] = variance[f].sqrt();
    }

    let flood_count = records.iter().filter(|r| r.flood).count();
    Ok(SeriesSummary {
        stats: FeatureStats {
            min,
            max,
            mean,
            variance,
            std_dev,
        },
        record_count: records.len(),
        flood_count,
        flood_fraction: flood_count as f64 / n,
    })
}

/// Fuse two per-day flood label streams by logical OR.
///
/// A day counts as a flood day if either upstream source (disaster
/// registry or news mentions) flags it.
pub fn fuse_flood_labels(registry: &[bool], news: &[bool]) -> Result<Vec<bool>> {
    if registry.len() != news.len() {
        return Err(FloodcastError::DimensionMismatch {
            expected: registry.len(),
            got: news.len(),
        });
    }
    Ok(registry
        .iter()
        .zip(news.iter())
        .map(|(&a, &b)| a || b)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn day(offset: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(offset)
    }

    fn record(offset: i64, base: f64, flood: bool) -> WeatherRecord {
        WeatherRecord::from_features(
            day(offset),
            [base, base + 1.0, base + 2.0, base + 3.0, base + 4.0, base + 5.0],
            flood,
        )
    }

    #[test]
    fn feature_order_is_contractual() {
        let r = WeatherRecord::from_features(day(0), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0], false);
        assert_eq!(r.wind_speed, 1.0);
        assert_eq!(r.rel_humidity, 2.0);
        assert_eq!(r.precipitation, 3.0);
        assert_eq!(r.temp_avg, 4.0);
        assert_eq!(r.temp_max, 5.0);
        assert_eq!(r.temp_min, 6.0);
        assert_eq!(r.features(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn series_rejects_non_increasing_dates() {
        let records = vec![record(1, 0.0, false), record(1, 1.0, false)];
        assert!(matches!(
            WeatherSeries::new(records),
            Err(FloodcastError::DateError(_))
        ));

        let records = vec![record(2, 0.0, false), record(1, 1.0, false)];
        assert!(WeatherSeries::new(records).is_err());
    }

    #[test]
    fn series_accepts_increasing_dates() {
        let records = vec![record(0, 0.0, false), record(1, 1.0, true)];
        let series = WeatherSeries::new(records).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.flood_count(), 1);
    }

    #[test]
    fn feature_range_tracks_min_and_max() {
        let series = WeatherSeries::new(vec![
            record(0, 0.0, false),
            record(1, 10.0, false),
            record(2, -5.0, false),
        ])
        .unwrap();
        let (min, max) = series.feature_range().unwrap();
        assert_eq!(min[0], -5.0);
        assert_eq!(max[0], 10.0);
        assert_eq!(min[5], 0.0);
        assert_eq!(max[5], 15.0);
    }

    #[test]
    fn feature_range_empty_errors() {
        let series = WeatherSeries::new(vec![]).unwrap();
        assert!(matches!(
            series.feature_range(),
            Err(FloodcastError::EmptyData)
        ));
    }

    #[test]
    fn minority_extracts_flood_days() {
        let series = WeatherSeries::new(vec![
            record(0, 0.0, true),
            record(1, 1.0, false),
            record(2, 2.0, true),
        ])
        .unwrap();
        let minority = series.minority();
        assert_eq!(minority.len(), 2);
        assert!(minority.iter().all(|r| r.flood));
    }

    #[test]
    fn summary_statistics() {
        let series = WeatherSeries::new(vec![
            record(0, 0.0, true),
            record(1, 2.0, false),
            record(2, 4.0, false),
            record(3, 6.0, false),
        ])
        .unwrap();
        let summary = series.summarize().unwrap();
        assert_relative_eq!(summary.stats.mean[0], 3.0, epsilon = 1e-12);
        assert_relative_eq!(summary.stats.variance[0], 5.0, epsilon = 1e-12);
        assert_relative_eq!(summary.stats.std_dev[0], 5.0_f64.sqrt(), epsilon = 1e-12);
        assert_eq!(summary.record_count, 4);
        assert_eq!(summary.flood_count, 1);
        assert_relative_eq!(summary.flood_fraction, 0.25, epsilon = 1e-12);
    }

    #[test]
    fn label_fusion_is_logical_or() {
        let registry = vec![true, false, false, true];
        let news = vec![false, false, true, true];
        let fused = fuse_flood_labels(&registry, &news).unwrap();
        assert_eq!(fused, vec![true, false, true, true]);
    }

    #[test]
    fn label_fusion_rejects_length_mismatch() {
        assert!(matches!(
            fuse_flood_labels(&[true], &[true, false]),
            Err(FloodcastError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn same_features_ignores_date_and_label() {
        let a = WeatherRecord::from_features(day(0), [1.0; 6], true);
        let b = WeatherRecord::from_features(day(5), [1.0; 6], false);
        assert!(a.same_features(&b));
        let c = WeatherRecord::from_features(day(0), [1.0, 1.0, 1.0, 1.0, 1.0, 2.0], true);
        assert!(!a.same_features(&c));
    }
}
