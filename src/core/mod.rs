//! Core data structures: weather records, series and matrix support.

pub mod matrix;
pub mod record;

pub use matrix::{least_squares, Matrix};
pub use record::{
    feature_range, fuse_flood_labels, summarize, FeatureStats, SeriesSummary, WeatherRecord,
    WeatherSeries, FEATURE_COUNT, FEATURE_NAMES,
};
