//! aspu-linalg: Linear algebra wrappers for the aSPU pathway test
//!
//! Provides the dense matrix type shared by every stage of the test,
//! plus the small set of decompositions the regression and PCA
//! collaborators need.

pub mod decomposition;
pub mod dense;

pub use decomposition::LinalgError;
pub use dense::DenseMatrix;
