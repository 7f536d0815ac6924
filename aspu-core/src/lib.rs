//! aspu-core: permutation-calibrated SPU and aSPU pathway tests
//!
//! Maps SNPs to the genes of a pathway, builds (optionally covariate
//! adjusted) score vectors, computes gene- and pathway-level Sum of
//! Powered Score statistics for a set of powers, and calibrates them
//! against a parallel, seed-reproducible permutation null.

pub mod calibrate;
pub mod error;
pub mod glm;
pub mod mapping;
pub mod permutation;
pub mod reduction;
pub mod score;
pub mod spu;
pub mod util;

pub use error::{AspuError, Result};
pub use glm::TraitType;
pub use mapping::{GeneInfo, SnpInfo};
pub use pathway_test::{
    aspu_path_single, PValueMap, PathwayData, PathwayTest, PathwayTestConfig, PathwayTestResult,
};
pub use spu::{Normalization, Power};
