//! GLM families: distribution + link.
//!
//! Supplies the starting values, working weights and deviance the IRLS
//! loop needs for the binomial/logit and gaussian/identity fits.

use super::link::{get_link, LinkFunction, LinkKind};

/// A GLM family: distribution + link function.
pub struct Family {
    pub kind: LinkKind,
    link: Box<dyn LinkFunction + Send + Sync>,
}

impl Family {
    pub fn new(kind: LinkKind) -> Self {
        Self {
            kind,
            link: get_link(kind),
        }
    }

    /// Initialize mu from y.
    pub fn initialize_mu(&self, y: &[f64]) -> Vec<f64> {
        match self.kind {
            // mu_init = (y + 0.5) / 2
            LinkKind::Logit => y.iter().map(|&yi| (yi + 0.5) / 2.0).collect(),
            LinkKind::Identity => y.to_vec(),
        }
    }

    /// Compute linear predictor eta = g(mu).
    pub fn link(&self, mu: &[f64]) -> Vec<f64> {
        mu.iter().map(|&m| self.link.link(m)).collect()
    }

    /// Working weights W = (d mu / d eta)^2 / V(mu).
    pub fn working_weights(&self, eta: &[f64], mu: &[f64]) -> Vec<f64> {
        eta.iter()
            .zip(mu.iter())
            .map(|(&e, &m)| {
                let d = self.link.inv_link_deriv(e);
                let v = self.link.variance(m).max(1e-30);
                (d * d / v).max(1e-30)
            })
            .collect()
    }

    /// Working response z = eta + (y - mu) / (d mu / d eta).
    pub fn working_response(&self, y: &[f64], eta: &[f64], mu: &[f64]) -> Vec<f64> {
        y.iter()
            .zip(eta.iter().zip(mu.iter()))
            .map(|(&yi, (&e, &m))| {
                let d = self.link.inv_link_deriv(e).max(1e-30);
                e + (yi - m) / d
            })
            .collect()
    }

    /// Update mu from eta, clamping to the valid range.
    pub fn update_mu(&self, eta: &[f64]) -> Vec<f64> {
        let mu = eta.iter().map(|&e| self.link.inv_link(e));
        match self.kind {
            LinkKind::Logit => mu.map(|m| m.clamp(1e-10, 1.0 - 1e-10)).collect(),
            LinkKind::Identity => mu.collect(),
        }
    }

    /// Residual deviance of the fit.
    pub fn deviance(&self, y: &[f64], mu: &[f64]) -> f64 {
        match self.kind {
            LinkKind::Logit => {
                2.0 * y
                    .iter()
                    .zip(mu.iter())
                    .map(|(&yi, &mi)| xlogy(yi, yi / mi) + xlogy(1.0 - yi, (1.0 - yi) / (1.0 - mi)))
                    .sum::<f64>()
            }
            LinkKind::Identity => y
                .iter()
                .zip(mu.iter())
                .map(|(&yi, &mi)| (yi - mi).powi(2))
                .sum(),
        }
    }
}

/// x * ln(r), with 0 * ln(0) = 0.
fn xlogy(x: f64, r: f64) -> f64 {
    if x == 0.0 {
        0.0
    } else {
        x * r.ln()
    }
}
