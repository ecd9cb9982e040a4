//! k-nearest-neighbor flood classification.

use crate::core::{WeatherRecord, FEATURE_COUNT};
use crate::error::{FloodcastError, Result};
use std::cmp::Ordering;
use std::fmt;

/// Binary classification outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloodLabel {
    Flood,
    NoFlood,
}

impl FloodLabel {
    pub fn is_flood(self) -> bool {
        matches!(self, FloodLabel::Flood)
    }
}

impl fmt::Display for FloodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FloodLabel::Flood => write!(f, "Flood"),
            FloodLabel::NoFlood => write!(f, "No Flood"),
        }
    }
}

/// A reference record paired with its distance to the query.
#[derive(Debug, Clone)]
pub struct Neighbor {
    pub record: WeatherRecord,
    pub distance: f64,
}

/// Classification result: the voted label plus the ordered k-neighbor
/// table for display and evaluation.
#[derive(Debug, Clone)]
pub struct Classification {
    pub label: FloodLabel,
    pub neighbors: Vec<Neighbor>,
}

/// Euclidean distance over the six weather features. The flood label
/// plays no part in distance.
pub fn euclidean_distance(a: &[f64; FEATURE_COUNT], b: &[f64; FEATURE_COUNT]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Every reference record ranked by ascending distance to the query.
/// Shared by classification and minority oversampling.
pub fn rank_by_distance(records: &[WeatherRecord], query: &[f64; FEATURE_COUNT]) -> Vec<Neighbor> {
    let mut neighbors: Vec<Neighbor> = records
        .iter()
        .map(|record| Neighbor {
            distance: euclidean_distance(&record.features(), query),
            record: record.clone(),
        })
        .collect();
    neighbors.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap_or(Ordering::Equal));
    neighbors
}

/// Classify a query vector by majority vote among its k nearest
/// reference records. Ties go to `NoFlood`.
pub fn classify(
    records: &[WeatherRecord],
    query: &[f64; FEATURE_COUNT],
    k: usize,
) -> Result<Classification> {
    if k == 0 {
        return Err(FloodcastError::InvalidParameter(
            "k must be at least 1".to_string(),
        ));
    }
    if records.is_empty() {
        return Err(FloodcastError::EmptyData);
    }
    if k > records.len() - 1 {
        return Err(FloodcastError::InvalidParameter(format!(
            "k ({k}) must not exceed reference size - 1 ({})",
            records.len() - 1
        )));
    }

    let mut neighbors = rank_by_distance(records, query);
    neighbors.truncate(k);

    let votes_flood = neighbors.iter().filter(|n| n.record.flood).count();
    let votes_no_flood = k - votes_flood;
    let label = if votes_no_flood >= votes_flood {
        FloodLabel::NoFlood
    } else {
        FloodLabel::Flood
    };

    Ok(Classification { label, neighbors })
}
