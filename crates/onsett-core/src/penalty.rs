// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::OnsetError;
use std::fmt;
use std::str::FromStr;

/// Penalty added per extra segment in penalized segmentation.
///
/// Larger penalties yield fewer, more significant change points.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Penalty {
    /// Bayesian information criterion: `params_per_segment * ln(n)`.
    Bic,
    /// Akaike information criterion: `2 * params_per_segment`.
    Aic,
    /// Fixed user-supplied penalty.
    Manual(f64),
}

impl Default for Penalty {
    fn default() -> Self {
        Self::Manual(1400.0)
    }
}

impl fmt::Display for Penalty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bic => write!(f, "bic"),
            Self::Aic => write!(f, "aic"),
            Self::Manual(value) => write!(f, "{value}"),
        }
    }
}

impl FromStr for Penalty {
    type Err = OnsetError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "bic" => Ok(Self::Bic),
            "aic" => Ok(Self::Aic),
            other => {
                let value = other.parse::<f64>().map_err(|_| {
                    OnsetError::invalid_input(format!(
                        "invalid penalty '{raw}'; expected a positive number, 'bic' or 'aic'"
                    ))
                })?;
                if !value.is_finite() || value <= 0.0 {
                    return Err(OnsetError::invalid_input(format!(
                        "manual penalty must be finite and > 0.0; got {value}"
                    )));
                }
                Ok(Self::Manual(value))
            }
        }
    }
}

/// Resolves a penalty to the scalar `beta` used by the objective.
pub fn penalty_value(
    penalty: &Penalty,
    n: usize,
    params_per_segment: usize,
) -> Result<f64, OnsetError> {
    if n == 0 {
        return Err(OnsetError::invalid_input("penalty requires n >= 1"));
    }
    if params_per_segment == 0 {
        return Err(OnsetError::invalid_input(
            "params_per_segment must be >= 1; got 0",
        ));
    }

    let beta = match penalty {
        Penalty::Bic => params_per_segment as f64 * (n as f64).ln(),
        Penalty::Aic => 2.0 * params_per_segment as f64,
        Penalty::Manual(value) => *value,
    };
    Ok(beta)
}
