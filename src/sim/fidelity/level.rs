use serde::{Deserialize, Serialize};

/// Discrete solver fidelity tier.
///
/// Every per-fidelity parameter is an exhaustive `match` on this enum, so adding a
/// tier forces all lookup tables to be extended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FidelityLevel {
    Low,
    Medium,
    High,
}

impl FidelityLevel {
    pub const ALL: [FidelityLevel; 3] = [Self::Low, Self::Medium, Self::High];

    /// Ordinal used on the wire (0, 1, 2).
    pub fn ordinal(self) -> u8 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
        }
    }

    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        match ordinal {
            0 => Some(Self::Low),
            1 => Some(Self::Medium),
            2 => Some(Self::High),
            _ => None,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Low => "Low (LF)",
            Self::Medium => "Medium (MF)",
            Self::High => "High (HF)",
        }
    }

    /// Number of explicit Euler sub-steps per solve.
    pub fn sub_steps(self) -> usize {
        match self {
            Self::Low => 5,
            Self::Medium => 20,
            Self::High => 100,
        }
    }

    /// Reported energy-balance residual of the PDE model.
    pub fn nominal_residual(self) -> f64 {
        match self {
            Self::Low => 1e-3,
            Self::Medium => 1e-5,
            Self::High => 1e-8,
        }
    }

    /// Parameters of the synthesized (non-integrated) field model.
    pub fn analytic_params(self) -> AnalyticFidelityParams {
        match self {
            Self::Low => AnalyticFidelityParams {
                hotspot_intensity_k: 5.0,
                noise_amplitude_k: 2.0,
                base_residual: 1e-2,
            },
            Self::Medium => AnalyticFidelityParams {
                hotspot_intensity_k: 3.0,
                noise_amplitude_k: 1.0,
                base_residual: 1e-3,
            },
            Self::High => AnalyticFidelityParams {
                hotspot_intensity_k: 1.0,
                noise_amplitude_k: 0.5,
                base_residual: 1e-5,
            },
        }
    }
}

impl std::fmt::Display for FidelityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Per-fidelity knobs of the analytic field model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyticFidelityParams {
    /// Centre-to-edge temperature rise of the radial hotspot [K].
    pub hotspot_intensity_k: f64,
    /// Half-width of the uniform per-cell noise [K].
    pub noise_amplitude_k: f64,
    /// Residual before the spread-dependent scaling.
    pub base_residual: f64,
}
