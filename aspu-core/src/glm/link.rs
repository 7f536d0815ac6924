//! Link functions for the covariate-adjustment regressions.
//!
//! Maps between the linear predictor (eta) and the mean (mu).

use std::fmt;
use std::str::FromStr;

use crate::error::AspuError;

/// Kind of trait being tested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TraitType {
    /// Case/control phenotype coded 0/1; fitted with the logit link.
    Binary,
    /// Continuous phenotype; fitted with the identity link.
    Continuous,
}

impl TraitType {
    /// Link used when regressing the phenotype on covariates.
    pub fn link(self) -> LinkKind {
        match self {
            TraitType::Binary => LinkKind::Logit,
            TraitType::Continuous => LinkKind::Identity,
        }
    }
}

impl FromStr for TraitType {
    type Err = AspuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "binary" | "binomial" => Ok(TraitType::Binary),
            "continuous" | "gaussian" | "quantitative" => Ok(TraitType::Continuous),
            _ => Err(AspuError::InvalidTraitKind(s.to_string())),
        }
    }
}

impl fmt::Display for TraitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraitType::Binary => write!(f, "binary"),
            TraitType::Continuous => write!(f, "continuous"),
        }
    }
}

/// The two links a regression collaborator must support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Identity,
    Logit,
}

/// Link function interface.
pub trait LinkFunction {
    /// Apply the link function: eta = g(mu).
    fn link(&self, mu: f64) -> f64;
    /// Apply the inverse link: mu = g^{-1}(eta).
    fn inv_link(&self, eta: f64) -> f64;
    /// Derivative of the inverse link: d(mu)/d(eta).
    fn inv_link_deriv(&self, eta: f64) -> f64;
    /// Variance function: V(mu).
    fn variance(&self, mu: f64) -> f64;
}

/// Logit link for binary traits.
#[derive(Debug, Clone, Copy)]
pub struct LogitLink;

impl LinkFunction for LogitLink {
    fn link(&self, mu: f64) -> f64 {
        (mu / (1.0 - mu)).ln()
    }

    fn inv_link(&self, eta: f64) -> f64 {
        1.0 / (1.0 + (-eta).exp())
    }

    fn inv_link_deriv(&self, eta: f64) -> f64 {
        let p = self.inv_link(eta);
        p * (1.0 - p)
    }

    fn variance(&self, mu: f64) -> f64 {
        mu * (1.0 - mu)
    }
}

/// Identity link for continuous traits and predictor residualization.
#[derive(Debug, Clone, Copy)]
pub struct IdentityLink;

impl LinkFunction for IdentityLink {
    fn link(&self, mu: f64) -> f64 {
        mu
    }

    fn inv_link(&self, eta: f64) -> f64 {
        eta
    }

    fn inv_link_deriv(&self, _eta: f64) -> f64 {
        1.0
    }

    fn variance(&self, _mu: f64) -> f64 {
        1.0
    }
}

/// Get the link function implementation for a link kind.
pub fn get_link(kind: LinkKind) -> Box<dyn LinkFunction + Send + Sync> {
    match kind {
        LinkKind::Logit => Box::new(LogitLink),
        LinkKind::Identity => Box::new(IdentityLink),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logit() {
        let link = LogitLink;
        assert!((link.inv_link(0.0) - 0.5).abs() < 1e-10);
        assert!((link.link(0.5) - 0.0).abs() < 1e-10);
        assert!((link.inv_link(link.link(0.3)) - 0.3).abs() < 1e-10);
        assert!((link.inv_link_deriv(0.0) - 0.25).abs() < 1e-10);
    }

    #[test]
    fn test_identity() {
        let link = IdentityLink;
        assert_eq!(link.link(5.0), 5.0);
        assert_eq!(link.inv_link(5.0), 5.0);
        assert_eq!(link.inv_link_deriv(5.0), 1.0);
        assert_eq!(link.variance(5.0), 1.0);
    }

    #[test]
    fn test_trait_type_parsing() {
        assert_eq!("binary".parse::<TraitType>().unwrap(), TraitType::Binary);
        assert_eq!("Binomial".parse::<TraitType>().unwrap(), TraitType::Binary);
        assert_eq!("gaussian".parse::<TraitType>().unwrap(), TraitType::Continuous);
        assert_eq!(" continuous ".parse::<TraitType>().unwrap(), TraitType::Continuous);
        assert!(matches!(
            "survival".parse::<TraitType>(),
            Err(AspuError::InvalidTraitKind(s)) if s == "survival"
        ));
    }

    #[test]
    fn test_trait_link() {
        assert_eq!(TraitType::Binary.link(), LinkKind::Logit);
        assert_eq!(TraitType::Continuous.link(), LinkKind::Identity);
    }
}
