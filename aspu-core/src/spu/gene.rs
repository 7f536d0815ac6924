//! Gene-level SPU statistics.

use crate::error::{AspuError, Result};
use crate::mapping::GeneGroups;
use crate::util::math::max_abs;

use super::power::{signed_pow, Power};
use super::{Normalization, PerVariant};

/// Gene statistics for every (power, gene) pair, power-major:
/// entry `j * n_genes + g` holds power `j`, gene `g`.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneStatistics {
    pub n_genes: usize,
    pub n_powers: usize,
    pub values: PerVariant<Vec<f64>>,
}

impl GeneStatistics {
    pub fn at(&self, variant: Normalization, power: usize, gene: usize) -> f64 {
        self.values.get(variant)[power * self.n_genes + gene]
    }

    /// The gene statistics of one power, gene order.
    pub fn power_slice(&self, variant: Normalization, power: usize) -> &[f64] {
        let start = power * self.n_genes;
        &self.values.get(variant)[start..start + self.n_genes]
    }
}

/// Statistics for one gene at one power: (unnormalized, root, standardized).
pub fn gene_statistic(scores: &[f64], members: &[usize], power: Power) -> (f64, f64, f64) {
    match power {
        Power::Infinite => {
            let m = max_abs(members.iter().map(|&k| scores[k]));
            (m, m, m)
        }
        Power::Finite(gamma) => {
            let a: f64 = members
                .iter()
                .map(|&k| Power::element_pow(gamma, scores[k]))
                .sum();
            let inv = 1.0 / gamma;
            let root = signed_pow(a, inv);
            let standardized = signed_pow(a / members.len() as f64, inv);
            (a, root, standardized)
        }
    }
}

/// Gene-level statistics of a score vector for every power.
///
/// Pure function of its inputs; the permutation engine calls it once per
/// replicate exactly as it is called for the observed scores.
pub fn compute_statistics(
    scores: &[f64],
    groups: &GeneGroups,
    powers: &[Power],
) -> Result<GeneStatistics> {
    let n_genes = groups.len();
    let size = n_genes * powers.len();
    let mut values = PerVariant::from_fn(|_| Vec::with_capacity(size));

    for &power in powers {
        for group in groups {
            let (a, root, standardized) = gene_statistic(scores, &group.members, power);
            if a.is_nan() || root.is_nan() || standardized.is_nan() {
                return Err(AspuError::DegenerateStatistic {
                    gene: group.gene_id.clone(),
                    power: power.label(),
                });
            }
            values.unnormalized.push(a);
            values.root.push(root);
            values.standardized.push(standardized);
        }
    }

    Ok(GeneStatistics {
        n_genes,
        n_powers: powers.len(),
        values,
    })
}
