//! Empirical p-values from the permutation null.
//!
//! Per power: the share of replicates whose pathway statistic strictly
//! exceeds the observed one in absolute value. Adaptive: every replicate
//! row is itself scored against the other rows, its smallest per-power
//! p-value forms the minP null, and the observed minP is compared against
//! it.

use serde::{Deserialize, Serialize};

use crate::permutation::NullDistribution;
use crate::spu::{Normalization, PathwayStatistics, PerVariant};

/// `#{b : |null[b]| > |observed|} / n`.
pub fn empirical_pvalue(observed: f64, null: &[f64]) -> f64 {
    if null.is_empty() {
        return 1.0;
    }
    let threshold = observed.abs();
    let exceed = null.iter().filter(|v| v.abs() > threshold).count();
    exceed as f64 / null.len() as f64
}

/// Leave-one-out p-value of every replicate in a null column:
/// `#{b' != b : |null[b']| > |null[b]|} / (n - 1)`.
///
/// A single replicate has no peers and gets 0.
pub fn null_pvalues(null: &[f64]) -> Vec<f64> {
    let n = null.len();
    let mut sorted: Vec<f64> = null.iter().map(|v| v.abs()).collect();
    sorted.sort_by(f64::total_cmp);
    let denom = n.saturating_sub(1).max(1) as f64;

    null.iter()
        .map(|v| {
            let a = v.abs();
            // Ties and the replicate itself sit at or below `a`.
            let exceed = n - sorted.partition_point(|s| *s <= a);
            exceed as f64 / denom
        })
        .collect()
}

/// Per-replicate minimum over powers of the leave-one-out p-values.
///
/// `columns[j]` is the null column of power `j`.
pub fn min_p_null(columns: &[Vec<f64>]) -> Vec<f64> {
    let n_perm = columns.first().map_or(0, Vec::len);
    let mut min_p = vec![f64::INFINITY; n_perm];
    for column in columns {
        for (m, p) in min_p.iter_mut().zip(null_pvalues(column)) {
            *m = m.min(p);
        }
    }
    min_p
}

/// `#{b : min_p_null[b] < observed_min_p} / n`.
pub fn adaptive_pvalue(observed_min_p: f64, min_p_null: &[f64]) -> f64 {
    if min_p_null.is_empty() {
        return 1.0;
    }
    let below = min_p_null.iter().filter(|p| **p < observed_min_p).count();
    below as f64 / min_p_null.len() as f64
}

/// Calibrated p-values of one normalization family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    /// One p-value per power, in power order.
    pub per_power: Vec<f64>,
    /// Smallest per-power p-value.
    pub min_p: f64,
    pub adaptive: f64,
}

/// Calibrate one variant's observed pathway statistics against the null.
pub fn calibrate(observed: &[f64], null: &NullDistribution, variant: Normalization) -> Calibration {
    let columns: Vec<Vec<f64>> = (0..observed.len())
        .map(|j| null.pathway_column(variant, j))
        .collect();

    let per_power: Vec<f64> = observed
        .iter()
        .zip(columns.iter())
        .map(|(t, column)| empirical_pvalue(*t, column))
        .collect();
    let min_p = per_power.iter().copied().fold(f64::INFINITY, f64::min);
    let adaptive = adaptive_pvalue(min_p, &min_p_null(&columns));

    Calibration {
        per_power,
        min_p,
        adaptive,
    }
}

/// Calibrate every variant.
pub fn calibrate_all(
    observed: &PathwayStatistics,
    null: &NullDistribution,
) -> PerVariant<Calibration> {
    observed.map(|variant, stats| calibrate(stats, null, variant))
}
