//! Regression collaborator for covariate adjustment.
//!
//! The score builder needs fitted values from two kinds of fits: the
//! phenotype on covariates (logit or identity link, by trait) and every
//! predictor column on covariates (identity link). Both go through the
//! [`RegressionFitter`] seam so callers can plug in their own GLM code.

pub mod family;
pub mod irls;
pub mod link;

use aspu_linalg::DenseMatrix;

use crate::error::Result;
pub use irls::{IrlsConfig, IrlsFitter};
pub use link::{LinkKind, TraitType};

/// Fits `response ~ 1 + covariates` and returns per-subject fitted values.
///
/// Implementations must add the intercept themselves and must cope with
/// aliased covariate columns (e.g. a constant column) by dropping them.
pub trait RegressionFitter: Sync {
    fn fitted_values(
        &self,
        response: &[f64],
        covariates: &DenseMatrix,
        link: LinkKind,
    ) -> Result<Vec<f64>>;
}
