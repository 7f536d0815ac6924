//! Sum of Powered Score (SPU) statistics.
//!
//! Gene level: for power `gamma` and gene scores `u_1..u_m`,
//! `a = sum u_i^gamma`, reported three ways (unnormalized `a`,
//! root-normalized `sign(a)|a|^(1/gamma)`, standardized
//! `sign(a)(|a|/m)^(1/gamma)`). The infinite power is `max |u_i|`.
//!
//! Pathway level: per power and variant, the max absolute gene statistic.

pub mod gene;
pub mod pathway;
pub mod power;

use serde::{Deserialize, Serialize};

pub use gene::{compute_statistics, GeneStatistics};
pub use pathway::{combine_pathway, PathwayStatistics};
pub use power::{default_powers, parse_powers, signed_pow, Power};

/// How a gene's powered sum is normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Normalization {
    /// The raw powered sum `a`.
    Unnormalized,
    /// `sign(a) |a|^(1/gamma)`.
    Root,
    /// `sign(a) (|a| / m)^(1/gamma)`, m = units in the gene.
    Standardized,
}

impl Normalization {
    pub const ALL: [Normalization; 3] = [
        Normalization::Unnormalized,
        Normalization::Root,
        Normalization::Standardized,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Normalization::Unnormalized => "unnormalized",
            Normalization::Root => "root",
            Normalization::Standardized => "standardized",
        }
    }
}

/// One value per normalization variant.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PerVariant<T> {
    pub unnormalized: T,
    pub root: T,
    pub standardized: T,
}

impl<T> PerVariant<T> {
    pub fn get(&self, variant: Normalization) -> &T {
        match variant {
            Normalization::Unnormalized => &self.unnormalized,
            Normalization::Root => &self.root,
            Normalization::Standardized => &self.standardized,
        }
    }

    pub fn get_mut(&mut self, variant: Normalization) -> &mut T {
        match variant {
            Normalization::Unnormalized => &mut self.unnormalized,
            Normalization::Root => &mut self.root,
            Normalization::Standardized => &mut self.standardized,
        }
    }

    /// Build from a function of the variant.
    pub fn from_fn<F: FnMut(Normalization) -> T>(mut f: F) -> Self {
        Self {
            unnormalized: f(Normalization::Unnormalized),
            root: f(Normalization::Root),
            standardized: f(Normalization::Standardized),
        }
    }

    pub fn map<U, F: FnMut(Normalization, &T) -> U>(&self, mut f: F) -> PerVariant<U> {
        PerVariant::from_fn(|v| f(v, self.get(v)))
    }
}
