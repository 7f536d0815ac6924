//! Pathway-level combination of gene statistics.

use crate::util::math::max_abs;

use super::gene::GeneStatistics;
use super::{Normalization, PerVariant};

/// One pathway statistic per power, for each normalization variant.
pub type PathwayStatistics = PerVariant<Vec<f64>>;

/// Per power, the largest absolute gene statistic.
pub fn combine_pathway(genes: &GeneStatistics) -> PathwayStatistics {
    PerVariant::from_fn(|variant: Normalization| {
        (0..genes.n_powers)
            .map(|j| max_abs(genes.power_slice(variant, j).iter().copied()))
            .collect()
    })
}
