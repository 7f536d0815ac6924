#![allow(clippy::needless_range_loop)]
//! Dense matrix operations backed by faer.
//!
//! Genotype, covariate and residualized predictor matrices are all
//! subjects x columns, column-major. The score statistics only ever need
//! column access and `X' * v` products, so those are the fast paths here.

use faer::Mat;

/// A dense matrix wrapper around faer's `Mat<f64>`.
#[derive(Debug, Clone)]
pub struct DenseMatrix {
    inner: Mat<f64>,
}

impl DenseMatrix {
    /// Create a new dense matrix filled with zeros.
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self {
            inner: Mat::zeros(nrows, ncols),
        }
    }

    /// Create a dense matrix from a flat slice in row-major order.
    pub fn from_row_major(nrows: usize, ncols: usize, data: &[f64]) -> Self {
        assert_eq!(data.len(), nrows * ncols);
        let inner = Mat::from_fn(nrows, ncols, |i, j| data[i * ncols + j]);
        Self { inner }
    }

    /// Create a matrix whose j-th column is `columns[j]`.
    ///
    /// All columns must have the same length. An empty slice gives a
    /// 0 x 0 matrix.
    pub fn from_columns(columns: &[Vec<f64>]) -> Self {
        let nrows = columns.first().map_or(0, Vec::len);
        assert!(columns.iter().all(|c| c.len() == nrows));
        let inner = Mat::from_fn(nrows, columns.len(), |i, j| columns[j][i]);
        Self { inner }
    }

    /// Number of rows.
    pub fn nrows(&self) -> usize {
        self.inner.nrows()
    }

    /// Number of columns.
    pub fn ncols(&self) -> usize {
        self.inner.ncols()
    }

    /// Get element at (row, col).
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.inner.read(row, col)
    }

    /// Set element at (row, col).
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.inner.write(row, col, value);
    }

    /// Get a reference to the underlying faer matrix.
    pub fn as_faer(&self) -> &Mat<f64> {
        &self.inner
    }

    /// Extract column as a Vec<f64>.
    pub fn col(&self, j: usize) -> Vec<f64> {
        (0..self.nrows()).map(|i| self.inner.read(i, j)).collect()
    }

    /// All columns, in order.
    pub fn columns(&self) -> Vec<Vec<f64>> {
        (0..self.ncols()).map(|j| self.col(j)).collect()
    }

    /// New matrix made of the given columns, in the given order.
    ///
    /// Indices may repeat; each one must be `< ncols()`.
    pub fn select_columns(&self, indices: &[usize]) -> DenseMatrix {
        let inner = Mat::from_fn(self.nrows(), indices.len(), |i, j| {
            self.inner.read(i, indices[j])
        });
        DenseMatrix { inner }
    }

    /// Matrix-vector product: self * v.
    pub fn mat_vec(&self, v: &[f64]) -> Vec<f64> {
        assert_eq!(self.ncols(), v.len());
        let n = self.nrows();
        let mut result = vec![0.0; n];
        for j in 0..self.ncols() {
            let vj = v[j];
            if vj == 0.0 {
                continue;
            }
            for i in 0..n {
                result[i] += self.inner.read(i, j) * vj;
            }
        }
        result
    }

    /// Transposed matrix-vector product: self' * v.
    ///
    /// This is the score product `U = X' r` used once per replicate.
    pub fn t_mat_vec(&self, v: &[f64]) -> Vec<f64> {
        assert_eq!(self.nrows(), v.len());
        (0..self.ncols())
            .map(|j| {
                let mut s = 0.0;
                for i in 0..self.nrows() {
                    s += self.inner.read(i, j) * v[i];
                }
                s
            })
            .collect()
    }

    /// Matrix-matrix product: self * other.
    pub fn mat_mul(&self, other: &DenseMatrix) -> DenseMatrix {
        assert_eq!(self.ncols(), other.nrows());
        let result = &self.inner * &other.inner;
        DenseMatrix { inner: result }
    }

    /// Mean of each column.
    pub fn column_means(&self) -> Vec<f64> {
        let n = self.nrows();
        if n == 0 {
            return vec![0.0; self.ncols()];
        }
        (0..self.ncols())
            .map(|j| (0..n).map(|i| self.inner.read(i, j)).sum::<f64>() / n as f64)
            .collect()
    }

    /// Copy with every column shifted to mean zero.
    pub fn centered(&self) -> DenseMatrix {
        let means = self.column_means();
        let inner = Mat::from_fn(self.nrows(), self.ncols(), |i, j| {
            self.inner.read(i, j) - means[j]
        });
        DenseMatrix { inner }
    }

    /// Gram matrix X' * X.
    pub fn gram(&self) -> DenseMatrix {
        let w = vec![1.0; self.nrows()];
        self.xtwx(&w)
    }

    /// Dot product of two equal-length slices.
    pub fn dot(a: &[f64], b: &[f64]) -> f64 {
        assert_eq!(a.len(), b.len());
        a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
    }

    /// Compute X' * diag(w) * X for design matrix X and weight vector w.
    pub fn xtwx(&self, w: &[f64]) -> DenseMatrix {
        let n = self.nrows();
        let p = self.ncols();
        assert_eq!(w.len(), n);
        let mut result = DenseMatrix::zeros(p, p);
        for j in 0..p {
            for k in j..p {
                let mut s = 0.0;
                for i in 0..n {
                    s += self.inner.read(i, j) * w[i] * self.inner.read(i, k);
                }
                result.set(j, k, s);
                if j != k {
                    result.set(k, j, s);
                }
            }
        }
        result
    }

    /// Compute X' * diag(w) * v.
    pub fn xtwv(&self, w: &[f64], v: &[f64]) -> Vec<f64> {
        let n = self.nrows();
        assert_eq!(w.len(), n);
        assert_eq!(v.len(), n);
        let wv: Vec<f64> = w.iter().zip(v.iter()).map(|(wi, vi)| wi * vi).collect();
        self.t_mat_vec(&wv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros() {
        let m = DenseMatrix::zeros(3, 4);
        assert_eq!(m.nrows(), 3);
        assert_eq!(m.ncols(), 4);
        assert_eq!(m.get(2, 3), 0.0);
    }

    #[test]
    fn test_from_columns_and_row_major_agree() {
        let by_col = DenseMatrix::from_columns(&[vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]);
        let by_row = DenseMatrix::from_row_major(2, 3, &[1.0, 3.0, 5.0, 2.0, 4.0, 6.0]);
        assert_eq!(by_col.nrows(), 2);
        assert_eq!(by_col.ncols(), 3);
        for i in 0..2 {
            for j in 0..3 {
                assert_eq!(by_col.get(i, j), by_row.get(i, j));
            }
        }
    }

    #[test]
    fn test_t_mat_vec_is_column_dot() {
        let a = DenseMatrix::from_row_major(3, 2, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let v = vec![1.0, -1.0, 2.0];
        let u = a.t_mat_vec(&v);
        assert_eq!(u[1], DenseMatrix::dot(&a.col(1), &v));
        assert_eq!(u, vec![8.0, 10.0]);
    }

    #[test]
    fn test_mat_mul() {
        let a = DenseMatrix::from_row_major(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let b = DenseMatrix::from_row_major(3, 2, &[7.0, 8.0, 9.0, 10.0, 11.0, 12.0]);
        let c = a.mat_mul(&b);
        assert!((c.get(0, 0) - 58.0).abs() < 1e-10);
        assert!((c.get(1, 1) - 154.0).abs() < 1e-10);
    }

    #[test]
    fn test_select_columns_reorders() {
        let a = DenseMatrix::from_row_major(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let s = a.select_columns(&[2, 0]);
        assert_eq!(s.ncols(), 2);
        assert_eq!(s.col(0), vec![3.0, 6.0]);
        assert_eq!(s.col(1), vec![1.0, 4.0]);
    }

    #[test]
    fn test_centered_columns_have_zero_mean() {
        let a = DenseMatrix::from_row_major(3, 2, &[1.0, 10.0, 2.0, 20.0, 6.0, 30.0]);
        let c = a.centered();
        for m in c.column_means() {
            assert!(m.abs() < 1e-12);
        }
        assert!((c.get(0, 0) + 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_xtwx() {
        let x = DenseMatrix::from_row_major(3, 2, &[1.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
        let result = x.xtwx(&[1.0, 2.0, 3.0]);
        assert!((result.get(0, 0) - 4.0).abs() < 1e-10);
        assert!((result.get(0, 1) - 3.0).abs() < 1e-10);
        assert!((result.get(1, 0) - 3.0).abs() < 1e-10);
        assert!((result.get(1, 1) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_xtwv() {
        let x = DenseMatrix::from_row_major(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let r = x.xtwv(&[1.0, 0.5], &[2.0, 2.0]);
        assert_eq!(r, vec![5.0, 8.0]);
    }
}
