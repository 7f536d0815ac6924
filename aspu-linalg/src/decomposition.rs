#![allow(clippy::needless_range_loop)]
//! Matrix decompositions and solvers.
//!
//! Cholesky for the IRLS normal equations, a rank-revealing Gram-Schmidt
//! basis for least-squares projections with aliased covariates, and a
//! faer-backed symmetric eigendecomposition for per-gene PCA.

use crate::dense::DenseMatrix;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LinalgError {
    #[error("Matrix is not positive definite")]
    NotPositiveDefinite,

    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}

/// Result of a Cholesky decomposition.
pub struct CholeskyDecomp {
    /// Lower triangular factor L such that A = L * L'.
    pub l: DenseMatrix,
}

impl CholeskyDecomp {
    /// Compute the Cholesky decomposition of a symmetric positive definite matrix.
    pub fn new(a: &DenseMatrix) -> Result<Self, LinalgError> {
        let n = a.nrows();
        if n != a.ncols() {
            return Err(LinalgError::DimensionMismatch {
                expected: n,
                got: a.ncols(),
            });
        }
        let mut l = DenseMatrix::zeros(n, n);

        for j in 0..n {
            let mut sum = 0.0;
            for k in 0..j {
                sum += l.get(j, k) * l.get(j, k);
            }
            let diag = a.get(j, j) - sum;
            if diag <= 0.0 || !diag.is_finite() {
                return Err(LinalgError::NotPositiveDefinite);
            }
            l.set(j, j, diag.sqrt());

            for i in (j + 1)..n {
                let mut sum = 0.0;
                for k in 0..j {
                    sum += l.get(i, k) * l.get(j, k);
                }
                l.set(i, j, (a.get(i, j) - sum) / l.get(j, j));
            }
        }

        Ok(CholeskyDecomp { l })
    }

    /// Solve L * L' * x = b.
    pub fn solve(&self, b: &[f64]) -> Vec<f64> {
        let n = self.l.nrows();
        assert_eq!(b.len(), n);

        // Forward: L y = b
        let mut y = vec![0.0; n];
        for i in 0..n {
            let mut sum = 0.0;
            for j in 0..i {
                sum += self.l.get(i, j) * y[j];
            }
            y[i] = (b[i] - sum) / self.l.get(i, i);
        }

        // Backward: L' x = y
        let mut x = vec![0.0; n];
        for i in (0..n).rev() {
            let mut sum = 0.0;
            for j in (i + 1)..n {
                sum += self.l.get(j, i) * x[j];
            }
            x[i] = (y[i] - sum) / self.l.get(i, i);
        }

        x
    }
}

/// Orthonormal basis of the column space of a matrix, built column by
/// column with modified Gram-Schmidt.
///
/// A column whose component orthogonal to the earlier kept columns has
/// norm below `tol` times its own norm is aliased and skipped, the way a
/// pivoting least-squares fit drops linearly dependent predictors.
#[derive(Debug, Clone)]
pub struct ColumnBasis {
    /// Orthonormal vectors, one per kept column.
    q: Vec<Vec<f64>>,
    /// Indices of the kept (linearly independent) columns.
    pub kept: Vec<usize>,
    /// Indices of the aliased columns.
    pub aliased: Vec<usize>,
}

impl ColumnBasis {
    pub fn new(a: &DenseMatrix, tol: f64) -> Self {
        let m = a.nrows();
        let mut q: Vec<Vec<f64>> = Vec::new();
        let mut kept = Vec::new();
        let mut aliased = Vec::new();

        for j in 0..a.ncols() {
            let original = a.col(j);
            let original_norm = DenseMatrix::dot(&original, &original).sqrt();
            let mut v = original;

            // Two passes keep the basis orthogonal to working precision.
            for _ in 0..2 {
                for qk in &q {
                    let r = DenseMatrix::dot(qk, &v);
                    for i in 0..m {
                        v[i] -= r * qk[i];
                    }
                }
            }

            let norm = DenseMatrix::dot(&v, &v).sqrt();
            if original_norm == 0.0 || norm <= tol * original_norm {
                aliased.push(j);
                continue;
            }
            for vi in v.iter_mut() {
                *vi /= norm;
            }
            q.push(v);
            kept.push(j);
        }

        Self { q, kept, aliased }
    }

    /// Numerical rank (number of kept columns).
    pub fn rank(&self) -> usize {
        self.q.len()
    }

    /// Orthogonal projection of `y` onto the column space: Q Q' y.
    ///
    /// These are the least-squares fitted values of `y` on the matrix.
    pub fn project(&self, y: &[f64]) -> Vec<f64> {
        let mut fitted = vec![0.0; y.len()];
        for qk in &self.q {
            let c = DenseMatrix::dot(qk, y);
            for (f, &qi) in fitted.iter_mut().zip(qk.iter()) {
                *f += c * qi;
            }
        }
        fitted
    }
}

/// Eigendecomposition of a symmetric matrix, eigenvalues descending.
pub struct SymmetricEigen {
    pub values: Vec<f64>,
    /// Column k is the eigenvector of `values[k]`.
    pub vectors: DenseMatrix,
}

impl SymmetricEigen {
    pub fn new(a: &DenseMatrix) -> Result<Self, LinalgError> {
        let n = a.nrows();
        if n != a.ncols() {
            return Err(LinalgError::DimensionMismatch {
                expected: n,
                got: a.ncols(),
            });
        }

        let evd = a.as_faer().selfadjoint_eigendecomposition(faer::Side::Lower);
        let s = evd.s().column_vector();
        let u = evd.u();

        // faer returns ascending order
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&i, &j| s.read(j).total_cmp(&s.read(i)));

        let values: Vec<f64> = order.iter().map(|&k| s.read(k)).collect();
        let mut vectors = DenseMatrix::zeros(n, n);
        for (dst, &src) in order.iter().enumerate() {
            for i in 0..n {
                vectors.set(i, dst, u.read(i, src));
            }
        }

        Ok(Self { values, vectors })
    }
}

/// Solve a symmetric positive definite system A*x = b using Cholesky.
pub fn solve_spd(a: &DenseMatrix, b: &[f64]) -> Result<Vec<f64>, LinalgError> {
    let chol = CholeskyDecomp::new(a)?;
    Ok(chol.solve(b))
}
