//! SMOTE-style minority oversampling for the flood class.
//!
//! Synthesizes new flood records by interpolating between each flood day
//! and its nearest flood-day neighbors, then appends the synthetics in
//! front of the original series.

use crate::classify::rank_by_distance;
use crate::core::{feature_range, WeatherRecord, WeatherSeries, FEATURE_COUNT};
use crate::error::{FloodcastError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

/// Configuration for one oversampling run.
#[derive(Debug, Clone)]
pub struct SmoteConfig {
    /// Neighbors considered per minority record.
    pub k: usize,
    /// Seed for the interpolation draws (None for entropy).
    pub seed: Option<u64>,
}

impl SmoteConfig {
    pub fn new(k: usize) -> Self {
        Self { k, seed: None }
    }

    /// Set the RNG seed for reproducible synthesis.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Result of oversampling: the synthetics alone and the augmented
/// reference list (synthetics followed by the originals).
#[derive(Debug, Clone)]
pub struct Oversampled {
    pub synthetic: Vec<WeatherRecord>,
    pub augmented: Vec<WeatherRecord>,
}

/// Generate synthetic flood records and append them to the series.
///
/// For each flood record, its k nearest flood neighbors (excluding
/// itself by feature equality) each contribute one synthetic record,
/// interpolated with a single λ ∈ [0, 1) shared across all six features.
pub fn oversample(series: &WeatherSeries, config: &SmoteConfig) -> Result<Oversampled> {
    if config.k == 0 {
        return Err(FloodcastError::InvalidParameter(
            "SMOTE k must be at least 1".to_string(),
        ));
    }
    if series.is_empty() {
        return Err(FloodcastError::EmptyData);
    }
    if config.k > series.len() - 1 {
        return Err(FloodcastError::InvalidParameter(format!(
            "SMOTE k ({}) must not exceed series length - 1 ({})",
            config.k,
            series.len() - 1
        )));
    }

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let minority = series.minority();
    let mut synthetic = Vec::new();
    for record in &minority {
        // Rank within the minority class; the record itself ranks first
        // at distance zero and is skipped by feature equality.
        let ranked = rank_by_distance(&minority, &record.features());
        let take = (config.k + 1).min(ranked.len());
        for neighbor in &ranked[..take] {
            if record.same_features(&neighbor.record) {
                continue;
            }
            synthetic.push(interpolate(record, &neighbor.record, rng.gen::<f64>()));
        }
    }
    log::debug!(
        "oversampling produced {} synthetic records from {} minority records",
        synthetic.len(),
        minority.len()
    );

    let mut augmented = synthetic.clone();
    augmented.extend_from_slice(series.records());

    Ok(Oversampled {
        synthetic,
        augmented,
    })
}

/// Linear interpolation between two records with one shared λ.
fn interpolate(record: &WeatherRecord, neighbor: &WeatherRecord, lambda: f64) -> WeatherRecord {
    let a = record.features();
    let b = neighbor.features();
    let mut features = [0.0; FEATURE_COUNT];
    for f in 0..FEATURE_COUNT {
        features[f] = a[f] + lambda * (b[f] - a[f]);
    }
    WeatherRecord::from_features(record.date, features, true)
}

/// Averaged cosine similarity of each synthetic record against the whole
/// minority class, after per-feature min-max normalization over the full
/// historical range. Purely descriptive; computed as an independent
/// fan-out per synthetic record.
#[derive(Debug, Clone)]
pub struct SimilarityDiagnostic {
    /// Mean similarity per synthetic record, in input order.
    pub per_record: Vec<f64>,
    /// Grand mean across all synthetic records.
    pub mean: f64,
}

pub fn cosine_similarity_diagnostic(
    synthetic: &[WeatherRecord],
    minority: &[WeatherRecord],
    history: &[WeatherRecord],
) -> Result<SimilarityDiagnostic> {
    if synthetic.is_empty() || minority.is_empty() {
        return Err(FloodcastError::EmptyData);
    }
    let (min, max) = feature_range(history)?;

    let per_record: Vec<f64> = synthetic
        .par_iter()
        .map(|synth| {
            let scaled = scale(&synth.features(), &min, &max);
            let total: f64 = minority
                .iter()
                .map(|m| cosine_similarity(&scaled, &scale(&m.features(), &min, &max)))
                .sum();
            total / minority.len() as f64
        })
        .collect();

    let mean = per_record.iter().sum::<f64>() / per_record.len() as f64;
    Ok(SimilarityDiagnostic { per_record, mean })
}

fn scale(
    features: &[f64; FEATURE_COUNT],
    min: &[f64; FEATURE_COUNT],
    max: &[f64; FEATURE_COUNT],
) -> [f64; FEATURE_COUNT] {
    let mut out = [0.0; FEATURE_COUNT];
    for f in 0..FEATURE_COUNT {
        let range = max[f] - min[f];
        out[f] = if range == 0.0 {
            0.0
        } else {
            (features[f] - min[f]) / range
        };
    }
    out
}

fn cosine_similarity(a: &[f64; FEATURE_COUNT], b: &[f64; FEATURE_COUNT]) -> f64 {
    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    let denominator = norm_a * norm_b;
    if denominator == 0.0 {
        0.0
    } else {
        dot / denominator
    }
}
