//! Power exponents and the sign-preserving power.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AspuError, Result};
use crate::util::math::sign;

/// One exponent of the SPU family.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Power {
    /// A positive, finite exponent (may be fractional).
    Finite(f64),
    /// The max-type statistic, `max |u_i|`.
    Infinite,
}

impl Power {
    /// Validate an exponent. `f64::INFINITY` maps to [`Power::Infinite`].
    pub fn new(gamma: f64) -> Result<Self> {
        if gamma == f64::INFINITY {
            Ok(Power::Infinite)
        } else if gamma.is_finite() && gamma > 0.0 {
            Ok(Power::Finite(gamma))
        } else {
            Err(AspuError::InvalidPower(gamma.to_string()))
        }
    }

    /// Label suffix: shortest decimal form, or `Inf`.
    pub fn label(&self) -> String {
        match self {
            Power::Finite(g) => format!("{}", g),
            Power::Infinite => "Inf".to_string(),
        }
    }

    pub fn is_valid(&self) -> bool {
        match self {
            Power::Finite(g) => g.is_finite() && *g > 0.0,
            Power::Infinite => true,
        }
    }

    /// `u^gamma` for one score. Integral exponents use the true power so
    /// even exponents stay non-negative; fractional exponents keep the
    /// sign of `u`.
    pub fn element_pow(gamma: f64, u: f64) -> f64 {
        if gamma.fract() == 0.0 && gamma.abs() <= i32::MAX as f64 {
            u.powi(gamma as i32)
        } else {
            signed_pow(u, gamma)
        }
    }
}

impl fmt::Display for Power {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for Power {
    type Err = AspuError;

    fn from_str(s: &str) -> Result<Self> {
        let t = s.trim();
        match t.to_lowercase().as_str() {
            "inf" | "infinity" | "+inf" => Ok(Power::Infinite),
            _ => {
                let gamma: f64 = t
                    .parse()
                    .map_err(|_| AspuError::InvalidPower(s.to_string()))?;
                Power::new(gamma)
            }
        }
    }
}

/// Parse a comma-separated power list such as `1,2,4,inf`.
pub fn parse_powers(s: &str) -> Result<Vec<Power>> {
    let powers = s
        .split(',')
        .filter(|p| !p.trim().is_empty())
        .map(str::parse)
        .collect::<Result<Vec<Power>>>()?;
    if powers.is_empty() {
        return Err(AspuError::EmptyPowerSet);
    }
    Ok(powers)
}

/// Powers 1 through 8 plus the max-type statistic.
pub fn default_powers() -> Vec<Power> {
    (1..=8)
        .map(|g| Power::Finite(g as f64))
        .chain(std::iter::once(Power::Infinite))
        .collect()
}

/// `sign(value) * |value|^exponent`.
///
/// Defined for every real `value`, including negative values with a
/// fractional exponent where a plain `powf` would yield NaN.
pub fn signed_pow(value: f64, exponent: f64) -> f64 {
    sign(value) * value.abs().powf(exponent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_pow_boundaries() {
        assert_eq!(signed_pow(0.0, 0.5), 0.0);
        assert_eq!(signed_pow(0.0, 3.0), 0.0);
        assert_eq!(signed_pow(0.0, f64::INFINITY), 0.0);
        assert_eq!(signed_pow(-0.0, 0.5), 0.0);
        assert!((signed_pow(-8.0, 1.0 / 3.0) + 2.0).abs() < 1e-12);
        assert!((signed_pow(-4.0, 0.5) + 2.0).abs() < 1e-12);
        assert!((signed_pow(9.0, 0.5) - 3.0).abs() < 1e-12);
        assert!(!signed_pow(-2.0, 0.25).is_nan());
    }

    #[test]
    fn test_element_pow() {
        assert_eq!(Power::element_pow(2.0, -3.0), 9.0);
        assert_eq!(Power::element_pow(3.0, -2.0), -8.0);
        assert!((Power::element_pow(0.5, -4.0) + 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Power::Finite(1.0).label(), "1");
        assert_eq!(Power::Finite(2.0).label(), "2");
        assert_eq!(Power::Finite(0.5).label(), "0.5");
        assert_eq!(Power::Infinite.label(), "Inf");
    }

    #[test]
    fn test_parse() {
        assert_eq!("inf".parse::<Power>().unwrap(), Power::Infinite);
        assert_eq!("Inf".parse::<Power>().unwrap(), Power::Infinite);
        assert_eq!(" 3 ".parse::<Power>().unwrap(), Power::Finite(3.0));
        assert!("0".parse::<Power>().is_err());
        assert!("-1".parse::<Power>().is_err());
        assert!("abc".parse::<Power>().is_err());
        assert!("nan".parse::<Power>().is_err());

        let ps = parse_powers("1, 2,inf").unwrap();
        assert_eq!(ps, vec![Power::Finite(1.0), Power::Finite(2.0), Power::Infinite]);
        assert!(matches!(parse_powers(" , "), Err(AspuError::EmptyPowerSet)));
    }

    #[test]
    fn test_new() {
        assert_eq!(Power::new(f64::INFINITY).unwrap(), Power::Infinite);
        assert!(Power::new(f64::NEG_INFINITY).is_err());
        assert!(Power::new(0.0).is_err());
        assert!(!Power::Finite(-1.0).is_valid());
    }

    #[test]
    fn test_default_powers() {
        let ps = default_powers();
        assert_eq!(ps.len(), 9);
        assert_eq!(ps[0], Power::Finite(1.0));
        assert_eq!(ps[8], Power::Infinite);
    }
}
