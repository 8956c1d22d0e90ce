//! Run summary over exported records
//!
//! Descriptive statistics for the price column and non-empty cell counts per
//! column, printed after each crawl.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::ListingRecord;

/// Descriptive statistics of a numeric column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceStatistics {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; `NaN` for a single value
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub max: f64,
}

impl PriceStatistics {
    /// Statistics over the present prices of `records`
    ///
    /// Returns `None` when no record has a price.
    pub fn from_records(records: &[ListingRecord]) -> Option<Self> {
        Self::from_values(records.iter().filter_map(|r| r.price_billion).collect())
    }

    /// Statistics over arbitrary values, ignoring NaN
    pub fn from_values(mut values: Vec<f64>) -> Option<Self> {
        values.retain(|v| !v.is_nan());
        if values.is_empty() {
            return None;
        }

        values.sort_by(|a, b| a.total_cmp(b));

        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;
        let std = if count > 1 {
            let variance =
                values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
            variance.sqrt()
        } else {
            f64::NAN
        };

        Some(Self {
            count,
            mean,
            std,
            min: values[0],
            p25: quantile(&values, 0.25),
            p50: quantile(&values, 0.50),
            p75: quantile(&values, 0.75),
            max: values[count - 1],
        })
    }
}

/// Linear-interpolated quantile of sorted, non-empty values
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = (sorted.len() - 1) as f64 * q;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;

    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

impl fmt::Display for PriceStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<6}{:>14}", "count", self.count)?;
        let rows = [
            ("mean", self.mean),
            ("std", self.std),
            ("min", self.min),
            ("25%", self.p25),
            ("50%", self.p50),
            ("75%", self.p75),
            ("max", self.max),
        ];
        for (label, value) in rows {
            writeln!(f, "{label:<6}{value:>14.6}")?;
        }
        Ok(())
    }
}

/// Non-empty cells per export column, in column order
pub fn column_coverage(records: &[ListingRecord]) -> Vec<(&'static str, usize)> {
    let counts = [
        records.len(),
        records.iter().filter(|r| r.listing_id.is_some()).count(),
        records.iter().filter(|r| r.title.is_some()).count(),
        records.iter().filter(|r| r.price_billion.is_some()).count(),
        records.iter().filter(|r| r.area_sq_m.is_some()).count(),
        records.iter().filter(|r| r.bedroom_count.is_some()).count(),
        records.iter().filter(|r| r.bathroom_count.is_some()).count(),
        records.iter().filter(|r| r.address.is_some()).count(),
        records.iter().filter(|r| r.orientation.is_some()).count(),
        records.iter().filter(|r| r.url.is_some()).count(),
        records
            .iter()
            .filter(|r| r.price_per_sq_m_million.is_some())
            .count(),
    ];

    ListingRecord::COLUMNS.into_iter().zip(counts).collect()
}
