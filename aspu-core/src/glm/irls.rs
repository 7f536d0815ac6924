//! Iteratively reweighted least squares.
//!
//! Design is `[1 | covariates]` restricted to its linearly independent
//! columns. Identity-link fits are a single orthogonal projection; logit
//! fits iterate Newton steps on the normal equations until the relative
//! deviance change drops below `tol`.

use aspu_linalg::decomposition::{solve_spd, ColumnBasis};
use aspu_linalg::DenseMatrix;
use tracing::debug;

use super::family::Family;
use super::link::LinkKind;
use super::RegressionFitter;
use crate::error::{AspuError, Result};

/// Configuration for the IRLS fitter.
#[derive(Debug, Clone)]
pub struct IrlsConfig {
    /// Maximum Newton iterations for non-identity links.
    pub max_iter: usize,
    /// Relative deviance change that counts as converged.
    pub tol: f64,
    /// Relative norm below which a design column counts as aliased.
    pub alias_tol: f64,
}

impl Default for IrlsConfig {
    fn default() -> Self {
        Self {
            max_iter: 50,
            tol: 1e-10,
            alias_tol: 1e-7,
        }
    }
}

/// Default [`RegressionFitter`].
#[derive(Debug, Clone, Default)]
pub struct IrlsFitter {
    pub config: IrlsConfig,
}

impl IrlsFitter {
    pub fn new(config: IrlsConfig) -> Self {
        Self { config }
    }

    fn logit_fit(&self, y: &[f64], x: &DenseMatrix) -> Result<Vec<f64>> {
        let family = Family::new(LinkKind::Logit);
        let mut mu = family.initialize_mu(y);
        let mut eta = family.link(&mu);
        let mut dev_old = family.deviance(y, &mu);

        for iter in 0..self.config.max_iter {
            let w = family.working_weights(&eta, &mu);
            let z = family.working_response(y, &eta, &mu);
            let beta = solve_spd(&x.xtwx(&w), &x.xtwv(&w, &z))?;

            eta = x.mat_vec(&beta);
            mu = family.update_mu(&eta);
            let dev = family.deviance(y, &mu);

            if (dev - dev_old).abs() / (dev.abs() + 0.1) < self.config.tol {
                debug!("IRLS converged after {} iterations (deviance {:.6})", iter + 1, dev);
                return Ok(mu);
            }
            dev_old = dev;
        }

        Err(AspuError::FitNotConverged {
            iterations: self.config.max_iter,
        })
    }
}

/// `[1 | covariates]` as a single matrix.
pub fn design_with_intercept(covariates: &DenseMatrix) -> DenseMatrix {
    let mut columns = Vec::with_capacity(covariates.ncols() + 1);
    columns.push(vec![1.0; covariates.nrows()]);
    columns.extend(covariates.columns());
    DenseMatrix::from_columns(&columns)
}

impl RegressionFitter for IrlsFitter {
    fn fitted_values(
        &self,
        response: &[f64],
        covariates: &DenseMatrix,
        link: LinkKind,
    ) -> Result<Vec<f64>> {
        if response.len() != covariates.nrows() {
            return Err(AspuError::DimensionMismatch {
                what: "regression response",
                expected: covariates.nrows(),
                got: response.len(),
            });
        }

        let design = design_with_intercept(covariates);
        let basis = ColumnBasis::new(&design, self.config.alias_tol);
        if !basis.aliased.is_empty() {
            debug!("Dropping aliased design columns {:?}", basis.aliased);
        }

        match link {
            LinkKind::Identity => Ok(basis.project(response)),
            LinkKind::Logit => self.logit_fit(response, &design.select_columns(&basis.kept)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mean(v: &[f64]) -> f64 {
        v.iter().sum::<f64>() / v.len() as f64
    }

    #[test]
    fn test_identity_fit_recovers_linear_response() {
        let cov = DenseMatrix::from_columns(&[vec![0.0, 1.0, 2.0, 3.0, 4.0]]);
        let y: Vec<f64> = (0..5).map(|i| 2.0 + 3.0 * i as f64).collect();
        let fitted = IrlsFitter::default()
            .fitted_values(&y, &cov, LinkKind::Identity)
            .unwrap();
        for (f, yi) in fitted.iter().zip(y.iter()) {
            assert!((f - yi).abs() < 1e-10);
        }
    }

    #[test]
    fn test_constant_covariate_reduces_to_intercept() {
        let cov = DenseMatrix::from_columns(&[vec![7.0; 6]]);
        let y = vec![1.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        let fitter = IrlsFitter::default();

        let gaussian = fitter.fitted_values(&y, &cov, LinkKind::Identity).unwrap();
        let logit = fitter.fitted_values(&y, &cov, LinkKind::Logit).unwrap();
        let ybar = mean(&y);
        for i in 0..y.len() {
            assert!((gaussian[i] - ybar).abs() < 1e-10);
            assert!((logit[i] - ybar).abs() < 1e-6, "logit {} vs {}", logit[i], ybar);
        }
    }

    #[test]
    fn test_logit_fit_score_equations_hold() {
        // At the MLE, X'(y - mu) = 0 for the intercept and the covariate.
        let x: Vec<f64> = (0..40).map(|i| (i as f64 - 20.0) / 10.0).collect();
        let y: Vec<f64> = (0..40)
            .map(|i| if (i * 7) % 11 < 4 + i / 8 { 1.0 } else { 0.0 })
            .collect();
        let cov = DenseMatrix::from_columns(&[x.clone()]);
        let mu = IrlsFitter::default()
            .fitted_values(&y, &cov, LinkKind::Logit)
            .unwrap();
        let resid: Vec<f64> = y.iter().zip(mu.iter()).map(|(a, b)| a - b).collect();
        assert!(resid.iter().sum::<f64>().abs() < 1e-6);
        assert!(DenseMatrix::dot(&x, &resid).abs() < 1e-6);
    }

    #[test]
    fn test_response_length_checked() {
        let cov = DenseMatrix::from_columns(&[vec![1.0, 2.0, 3.0]]);
        let err = IrlsFitter::default()
            .fitted_values(&[1.0, 2.0], &cov, LinkKind::Identity)
            .unwrap_err();
        assert!(matches!(err, AspuError::DimensionMismatch { .. }));
    }
}
