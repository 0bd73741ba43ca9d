use rand::Rng;
use serde::{Deserialize, Serialize};

use super::config::CELSIUS_OFFSET;
use super::grid::TemperatureGrid;
use crate::error::{SimError, check_positive, check_range};
use crate::sim::fidelity::FidelityLevel;

/// Parameters of the synthesized panel field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticFieldConfig {
    /// Panel edge temperature before hotspot, noise and diurnal terms [K].
    pub base_temperature_k: f64,
    /// Scale of the slow triangular time variation; the peak contribution is half of it [K].
    pub time_variation_amplitude_k: f64,
    /// Period of the time variation in simulation time units.
    pub time_variation_period: f64,
}

impl AnalyticFieldConfig {
    pub fn new() -> Self {
        Self {
            base_temperature_k: 45.0 + CELSIUS_OFFSET,
            time_variation_amplitude_k: 2.0,
            time_variation_period: 20.0,
        }
    }

    pub fn validate(&self) -> Result<(), SimError> {
        check_range("base_temperature_k", self.base_temperature_k, 1.0, 1.0e4)?;
        check_range(
            "time_variation_amplitude_k",
            self.time_variation_amplitude_k,
            0.0,
            1.0e3,
        )?;
        check_positive("time_variation_period", self.time_variation_period)?;
        Ok(())
    }

    /// Triangular wave: peaks at the start of every period, zero at mid-period.
    pub fn time_variation(&self, time: f64) -> f64 {
        let phase = time.rem_euclid(self.time_variation_period) / self.time_variation_period;
        self.time_variation_amplitude_k * (0.5 - phase).abs()
    }
}

impl Default for AnalyticFieldConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Synthesizes a radial-hotspot field without integrating the heat balance.
///
/// Lower fidelity means a stronger hotspot and more per-cell noise. The result is
/// not clamped; callers clamp it like any solver output.
pub fn synthesize_field<R: Rng + ?Sized>(
    config: &AnalyticFieldConfig,
    rows: usize,
    cols: usize,
    fidelity: FidelityLevel,
    time: f64,
    rng: &mut R,
) -> Result<TemperatureGrid, SimError> {
    let params = fidelity.analytic_params();
    let center_r = rows as f64 / 2.0;
    let center_c = cols as f64 / 2.0;
    let radius = rows.min(cols) as f64 / 2.0;
    let diurnal = config.time_variation(time);
    let noise = params.noise_amplitude_k;

    let mut grid = TemperatureGrid::uniform(rows, cols, config.base_temperature_k)?;
    for ((i, j), t) in grid.values_mut().indexed_iter_mut() {
        let dist = ((i as f64 - center_r).powi(2) + (j as f64 - center_c).powi(2)).sqrt();
        let radial = params.hotspot_intensity_k * (1.0 - dist / radius);
        let jitter = if noise > 0.0 {
            rng.gen_range(-noise..=noise)
        } else {
            0.0
        };
        *t += radial + jitter + diurnal;
    }
    Ok(grid)
}
