//! Permutation null distribution.
//!
//! Each replicate relabels the phenotype with a uniformly random
//! permutation (genotype and covariate rows stay fixed), recomputes the
//! score vector from the shared [`ScoreBuilder`], and recomputes the
//! gene and pathway statistics. Replicates run on the rayon pool and
//! return their own row; rows are collected in replicate order.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::{AspuError, Result};
use crate::mapping::GeneGroups;
use crate::score::{PermutationTarget, ScoreBuilder};
use crate::spu::{combine_pathway, compute_statistics, GeneStatistics, Normalization, PathwayStatistics, Power};

/// Source of the subject relabelling used by each replicate.
pub trait PermutationSource: Sync {
    /// A permutation of `0..n` for replicate `replicate`.
    fn permutation(&self, replicate: usize, n: usize) -> Vec<usize>;
}

/// Fisher-Yates shuffle. Every replicate draws from its own ChaCha8
/// stream (stream id = replicate index) under the one key derived from
/// `seed`, so output does not depend on thread count or scheduling and
/// nearby seeds do not share replicates.
#[derive(Debug, Clone, Copy)]
pub struct SeededShuffler {
    pub seed: u64,
}

impl SeededShuffler {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl PermutationSource for SeededShuffler {
    fn permutation(&self, replicate: usize, n: usize) -> Vec<usize> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        rng.set_stream(replicate as u64);
        let mut indices: Vec<usize> = (0..n).collect();
        indices.shuffle(&mut rng);
        indices
    }
}

/// Statistics of one permutation replicate.
#[derive(Debug, Clone, PartialEq)]
pub struct Replicate {
    pub genes: GeneStatistics,
    pub pathway: PathwayStatistics,
}

/// All replicates, row b = replicate b.
#[derive(Debug, Clone)]
pub struct NullDistribution {
    replicates: Vec<Replicate>,
}

impl NullDistribution {
    pub fn new(replicates: Vec<Replicate>) -> Self {
        Self { replicates }
    }

    pub fn n_perm(&self) -> usize {
        self.replicates.len()
    }

    pub fn replicates(&self) -> &[Replicate] {
        &self.replicates
    }

    /// Pathway statistic of one power across all replicates.
    pub fn pathway_column(&self, variant: Normalization, power: usize) -> Vec<f64> {
        self.replicates
            .iter()
            .map(|r| r.pathway.get(variant)[power])
            .collect()
    }

    /// Gene statistic row `b`: n_genes x n_powers values, power-major.
    pub fn gene_row(&self, variant: Normalization, b: usize) -> &[f64] {
        self.replicates[b].genes.values.get(variant)
    }
}

/// Runs replicates against shared, read-only inputs.
pub struct PermutationEngine<'a> {
    builder: &'a ScoreBuilder,
    groups: &'a GeneGroups,
    powers: &'a [Power],
    source: &'a dyn PermutationSource,
    target: PermutationTarget,
}

impl<'a> PermutationEngine<'a> {
    pub fn new(
        builder: &'a ScoreBuilder,
        groups: &'a GeneGroups,
        powers: &'a [Power],
        source: &'a dyn PermutationSource,
        target: PermutationTarget,
    ) -> Self {
        Self {
            builder,
            groups,
            powers,
            source,
            target,
        }
    }

    pub fn run_replicate(&self, replicate: usize) -> Result<Replicate> {
        let perm = self.source.permutation(replicate, self.builder.n_subjects());
        let scores = self.builder.permuted_scores(&perm, self.target)?;
        let genes = compute_statistics(&scores, self.groups, self.powers)?;
        let pathway = combine_pathway(&genes);
        Ok(Replicate { genes, pathway })
    }

    /// Run `n_perm` replicates. Any failing replicate fails the run.
    pub fn run(&self, n_perm: usize) -> Result<NullDistribution> {
        if n_perm == 0 {
            return Err(AspuError::InvalidPermutationCount(n_perm));
        }
        info!(
            "Running {} permutations ({} genes, {} powers, {:?} target)",
            n_perm,
            self.groups.len(),
            self.powers.len(),
            self.target
        );

        let replicates = (0..n_perm)
            .into_par_iter()
            .map(|b| self.run_replicate(b))
            .collect::<Result<Vec<_>>>()?;

        debug!("Permutation null assembled: {} rows", replicates.len());
        Ok(NullDistribution::new(replicates))
    }
}
