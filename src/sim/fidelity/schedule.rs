use serde::{Deserialize, Serialize};

use super::level::FidelityLevel;
use crate::error::{SimError, check_positive};

/// Time-based fidelity cycle.
///
/// The selection is a pure function of accumulated simulation time. It does not
/// look at the physics, so it is a schedule rather than an adaptive policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FidelitySchedule {
    /// Low, Medium, High for one `band_width` each (period `3 * band_width`).
    ///
    /// `floor(t / band_width) mod 3` selects the level.
    Ramp { band_width: f64 },
    /// High for the first 30% of every period, Medium until 70%, Low for the rest.
    ///
    /// Models a transient burst at the start of each cycle followed by steady state.
    TransientFirst { period: f64 },
}

impl Default for FidelitySchedule {
    fn default() -> Self {
        Self::Ramp { band_width: 10.0 }
    }
}

impl FidelitySchedule {
    pub fn validate(&self) -> Result<(), SimError> {
        match *self {
            Self::Ramp { band_width } => check_positive("band_width", band_width)?,
            Self::TransientFirst { period } => check_positive("period", period)?,
        };
        Ok(())
    }

    /// Fidelity governing the solve at simulation time `t`.
    pub fn level_at(&self, t: f64) -> FidelityLevel {
        match *self {
            Self::Ramp { band_width } => {
                let band = (t / band_width).floor().rem_euclid(3.0) as u8;
                FidelityLevel::from_ordinal(band).unwrap_or(FidelityLevel::Low)
            }
            Self::TransientFirst { period } => {
                let phase = t.rem_euclid(period) / period;
                if phase < 0.3 {
                    FidelityLevel::High
                } else if phase < 0.7 {
                    FidelityLevel::Medium
                } else {
                    FidelityLevel::Low
                }
            }
        }
    }
}
