//! Score vector construction.
//!
//! Without covariates the score is `U = X' (Y - mean(Y))`. With
//! covariates the phenotype is fitted on them (logit or identity link),
//! every predictor column is residualized on them with an identity fit,
//! and `U = R' (Y - p_hat)`.
//!
//! Only the residual depends on the phenotype. The residualized
//! predictors and `p_hat` are computed once in [`ScoreBuilder::new`] and
//! shared read-only by every permutation replicate.

use aspu_linalg::DenseMatrix;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::{AspuError, Result};
use crate::glm::{LinkKind, RegressionFitter, TraitType};
use crate::mapping::{GeneGroup, GeneGroups};
use crate::reduction::ComponentReducer;
use crate::util::math::mean;

/// What the permutation engine shuffles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum PermutationTarget {
    /// Shuffle phenotype labels, then subtract the fixed `p_hat`
    /// (or the permuted mean when there are no covariates).
    #[default]
    Phenotype,
    /// Shuffle the observed residual `Y - p_hat`.
    Residual,
}

/// Gather the mapped SNP columns into gene-block order, optionally
/// replacing each gene's block by its reduced components.
///
/// Returns the predictor matrix and the groups with `members` pointing
/// at its columns.
pub fn gene_block_matrix(
    genotypes: &DenseMatrix,
    groups: &GeneGroups,
    reducer: Option<(&dyn ComponentReducer, f64)>,
) -> Result<(DenseMatrix, GeneGroups)> {
    let Some((reducer, var_prop)) = reducer else {
        return Ok((genotypes.select_columns(&groups.snp_order()), groups.clone()));
    };

    let mut columns: Vec<Vec<f64>> = Vec::with_capacity(groups.n_units());
    let mut reduced = Vec::with_capacity(groups.len());
    for group in groups {
        let block = reducer.reduce(&genotypes.select_columns(&group.snp_indices), var_prop)?;
        if block.nrows() != genotypes.nrows() {
            return Err(AspuError::DimensionMismatch {
                what: "reduced component rows",
                expected: genotypes.nrows(),
                got: block.nrows(),
            });
        }
        if block.ncols() == 0 {
            return Err(AspuError::DimensionMismatch {
                what: "reduced component columns",
                expected: 1,
                got: 0,
            });
        }
        debug!(
            "Gene {}: {} SNPs reduced to {} components",
            group.gene_id,
            group.snp_indices.len(),
            block.ncols()
        );
        let start = columns.len();
        columns.extend(block.columns());
        reduced.push(GeneGroup {
            gene_id: group.gene_id.clone(),
            snp_indices: group.snp_indices.clone(),
            members: (start..columns.len()).collect(),
        });
    }

    let matrix = if columns.is_empty() {
        DenseMatrix::zeros(genotypes.nrows(), 0)
    } else {
        DenseMatrix::from_columns(&columns)
    };
    Ok((matrix, GeneGroups::new(reduced)))
}

/// Phenotype-independent half of the score computation, built once.
#[derive(Debug, Clone)]
pub struct ScoreBuilder {
    /// Predictors entering `U = P' r`; residualized when covariates exist.
    predictors: DenseMatrix,
    /// Fitted phenotype on covariates; `None` means centre on the mean.
    fitted_trait: Option<Vec<f64>>,
    phenotype: Vec<f64>,
}

impl ScoreBuilder {
    pub fn new(
        phenotype: &[f64],
        predictors: DenseMatrix,
        covariates: Option<&DenseMatrix>,
        trait_type: TraitType,
        fitter: &dyn RegressionFitter,
    ) -> Result<Self> {
        let Some(cov) = covariates else {
            return Ok(Self {
                predictors,
                fitted_trait: None,
                phenotype: phenotype.to_vec(),
            });
        };

        info!(
            "Adjusting for {} covariates ({} trait, {} predictor fits)",
            cov.ncols(),
            trait_type,
            predictors.ncols()
        );
        let n = phenotype.len();
        let fitted_trait = fitter.fitted_values(phenotype, cov, trait_type.link())?;
        check_fitted_len(fitted_trait.len(), n)?;

        let residual_columns = (0..predictors.ncols())
            .into_par_iter()
            .map(|j| {
                let x = predictors.col(j);
                let fitted = fitter.fitted_values(&x, cov, LinkKind::Identity)?;
                check_fitted_len(fitted.len(), x.len())?;
                Ok(x.iter().zip(fitted.iter()).map(|(a, b)| a - b).collect())
            })
            .collect::<Result<Vec<Vec<f64>>>>()?;

        let residualized = if residual_columns.is_empty() {
            DenseMatrix::zeros(predictors.nrows(), 0)
        } else {
            DenseMatrix::from_columns(&residual_columns)
        };

        Ok(Self {
            predictors: residualized,
            fitted_trait: Some(fitted_trait),
            phenotype: phenotype.to_vec(),
        })
    }

    pub fn n_subjects(&self) -> usize {
        self.phenotype.len()
    }

    pub fn n_units(&self) -> usize {
        self.predictors.ncols()
    }

    /// The predictors scores are taken against (residualized if adjusted).
    pub fn predictors(&self) -> &DenseMatrix {
        &self.predictors
    }

    /// Residual of a phenotype vector against the fixed trait fit.
    pub fn residual(&self, y: &[f64]) -> Vec<f64> {
        match &self.fitted_trait {
            Some(p_hat) => y.iter().zip(p_hat.iter()).map(|(yi, pi)| yi - pi).collect(),
            None => {
                let m = mean(y);
                y.iter().map(|yi| yi - m).collect()
            }
        }
    }

    /// `U = P' r`.
    pub fn score(&self, residual: &[f64]) -> Vec<f64> {
        self.predictors.t_mat_vec(residual)
    }

    pub fn observed_scores(&self) -> Vec<f64> {
        self.score(&self.residual(&self.phenotype))
    }

    /// Score vector after relabelling subject `i` with `perm[i]`'s value.
    ///
    /// `perm` must be a permutation of `0..n_subjects()`.
    pub fn permuted_scores(&self, perm: &[usize], target: PermutationTarget) -> Result<Vec<f64>> {
        check_permutation(perm, self.phenotype.len())?;
        let residual = match target {
            PermutationTarget::Phenotype => {
                let y0: Vec<f64> = perm.iter().map(|&k| self.phenotype[k]).collect();
                self.residual(&y0)
            }
            PermutationTarget::Residual => {
                let r = self.residual(&self.phenotype);
                perm.iter().map(|&k| r[k]).collect()
            }
        };
        Ok(self.score(&residual))
    }
}

fn check_fitted_len(got: usize, expected: usize) -> Result<()> {
    if got != expected {
        return Err(AspuError::DimensionMismatch {
            what: "fitted values",
            expected,
            got,
        });
    }
    Ok(())
}

fn check_permutation(perm: &[usize], n: usize) -> Result<()> {
    if perm.len() != n {
        return Err(AspuError::DimensionMismatch {
            what: "permutation length",
            expected: n,
            got: perm.len(),
        });
    }
    let mut seen = vec![false; n];
    for &k in perm {
        if k >= n || seen[k] {
            return Err(AspuError::DimensionMismatch {
                what: "permutation entry",
                expected: n,
                got: k,
            });
        }
        seen[k] = true;
    }
    Ok(())
}
