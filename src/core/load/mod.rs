pub mod appliances;
pub mod monthly;

use serde::{Deserialize, Serialize};
use serde_valid::Validate;
use std::fmt::Display;
use thiserror::Error;

/// Daily consumption figures normalised to kWh, the canonical unit both
/// input paths produce and the sizing calculator consumes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DailyDemand {
    /// Nameplate sum before the diversity reduction.
    pub total_daily_kwh: f64,
    /// Demand after the diversity reduction; equals the total on the
    /// monthly path, which already represents realised consumption.
    pub adjusted_daily_kwh: f64,
    /// Diversity-adjusted subtotal of essential-flagged appliances, when
    /// appliance-level data was supplied.
    pub essential_daily_kwh: Option<f64>,
}

/// Fraction of simultaneous appliance usage assumed realistic, reducing the
/// nameplate sum to an expected demand. A factor of 1.0 disables the
/// reduction and the full nameplate sum is used.
///
/// Operators can retune this at any time, so it is read at calculation time
/// rather than captured once.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, PartialOrd, Serialize, Validate)]
#[serde(transparent)]
#[repr(transparent)]
pub struct DiversityFactor(
    #[validate(minimum = 0.)]
    #[validate(maximum = 1.)]
    f64,
);

impl DiversityFactor {
    pub fn new(factor: f64) -> Result<Self, DiversityFactorError> {
        if !(0. ..=1.).contains(&factor) {
            return Err(DiversityFactorError::OutOfRange(factor));
        }
        Ok(Self(factor))
    }

    pub fn factor(&self) -> f64 {
        self.0
    }

    pub fn is_disabled(&self) -> bool {
        self.0 >= 1.
    }

    pub(crate) fn apply(&self, raw_daily_kwh: f64) -> f64 {
        self.0 * raw_daily_kwh
    }
}

impl Default for DiversityFactor {
    fn default() -> Self {
        Self(1.)
    }
}

impl Display for DiversityFactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Error)]
pub enum DiversityFactorError {
    #[error("Diversity factor must be between 0 and 1 inclusive (got {0})")]
    OutOfRange(f64),
}
