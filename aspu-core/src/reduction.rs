//! Per-gene dimensionality reduction.
//!
//! Correlated SNPs inside one gene can be replaced by the leading
//! principal components that explain a target share of the gene's
//! variance. Reduction runs once on observed data; permutation replicates
//! reuse the reduced matrix.

use aspu_linalg::decomposition::SymmetricEigen;
use aspu_linalg::DenseMatrix;

use crate::error::{AspuError, Result};

/// Replaces a gene's predictor block by a smaller set of columns.
pub trait ComponentReducer: Sync {
    /// `block` is subjects x SNPs for one gene. The result must have the
    /// same number of rows and at least one column.
    fn reduce(&self, block: &DenseMatrix, var_prop: f64) -> Result<DenseMatrix>;
}

/// Centered PCA through the eigendecomposition of the SNP covariance.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrincipalComponents;

impl PrincipalComponents {
    /// Smallest k whose leading eigenvalues reach `var_prop` of the total.
    pub fn n_components(eigenvalues: &[f64], var_prop: f64) -> usize {
        let total: f64 = eigenvalues.iter().map(|v| v.max(0.0)).sum();
        if total <= 0.0 {
            return 1;
        }
        let mut cumulative = 0.0;
        for (k, v) in eigenvalues.iter().enumerate() {
            cumulative += v.max(0.0);
            if cumulative / total >= var_prop - 1e-12 {
                return k + 1;
            }
        }
        eigenvalues.len().max(1)
    }
}

impl ComponentReducer for PrincipalComponents {
    fn reduce(&self, block: &DenseMatrix, var_prop: f64) -> Result<DenseMatrix> {
        if !(var_prop > 0.0 && var_prop <= 1.0) {
            return Err(AspuError::InvalidVarianceCutoff(var_prop));
        }
        if block.ncols() <= 1 {
            return Ok(block.clone());
        }

        let centered = block.centered();
        let eig = SymmetricEigen::new(&centered.gram())?;
        let k = Self::n_components(&eig.values, var_prop);
        let loadings = eig.vectors.select_columns(&(0..k).collect::<Vec<_>>());
        Ok(centered.mat_mul(&loadings))
    }
}
