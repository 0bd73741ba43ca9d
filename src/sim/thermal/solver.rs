use ndarray::{Array2, Zip};

use super::config::{PanelForcing, PanelThermalConfig};
use super::flux::{
    absorbed_solar_flux, convection_coefficient, convective_flux, radiative_flux, sky_temperature,
};
use super::grid::TemperatureGrid;
use crate::error::SimError;
use crate::sim::fidelity::FidelityLevel;

/// Explicit (forward Euler) 2D panel heat-balance solver.
///
/// Every sub-step applies, cell by cell:
///
/// ```text
/// q_net = a*G - h(V)*(T - T_amb) - eps*sigma*(T^4 - T_sky^4) + alpha * lap(T)
/// T    += q_net * dt / C
/// ```
///
/// and after the last sub-step every cell is clamped into the configured range.
/// The number of sub-steps is set by the [`FidelityLevel`].
#[derive(Debug, Clone)]
pub struct ThermalSolver {
    config: PanelThermalConfig,
    grid: TemperatureGrid,
    /// Laplacian scratch buffer, same shape as `grid`.
    laplacian: Array2<f64>,
}

impl ThermalSolver {
    pub fn new(grid: TemperatureGrid, config: PanelThermalConfig) -> Result<Self, SimError> {
        config.validate()?;
        let laplacian = Array2::zeros(grid.shape());
        Ok(Self {
            config,
            grid,
            laplacian,
        })
    }

    /// Solver over a fresh `rows x cols` grid at a uniform temperature.
    pub fn uniform(
        rows: usize,
        cols: usize,
        temperature: f64,
        config: PanelThermalConfig,
    ) -> Result<Self, SimError> {
        Self::new(TemperatureGrid::uniform(rows, cols, temperature)?, config)
    }

    /// Runs `fidelity.sub_steps()` sub-steps, then clamps the grid.
    pub fn solve(
        &mut self,
        forcing: &PanelForcing,
        fidelity: FidelityLevel,
    ) -> Result<&TemperatureGrid, SimError> {
        self.solve_steps(forcing, fidelity.sub_steps())
    }

    /// Runs an explicit number of sub-steps, then clamps the grid.
    ///
    /// Fails before stepping if the sub-step is too long for `forcing`, and after
    /// stepping if any cell left the finite range.
    pub fn solve_steps(
        &mut self,
        forcing: &PanelForcing,
        sub_steps: usize,
    ) -> Result<&TemperatureGrid, SimError> {
        let t_ref = self
            .config
            .max_temperature_k
            .max(forcing.ambient_temperature);
        self.config.check_stability(forcing.wind_speed, t_ref)?;

        for _ in 0..sub_steps {
            self.step(forcing)?;
        }
        if let Some(t) = self.grid.iter().find(|t| !t.is_finite()) {
            return Err(SimError::invariant(format!(
                "explicit update diverged to {t} after {sub_steps} sub-steps"
            )));
        }
        self.grid
            .clamp(self.config.min_temperature_k, self.config.max_temperature_k);
        Ok(&self.grid)
    }

    /// Single unclamped sub-step.
    pub fn step(&mut self, forcing: &PanelForcing) -> Result<(), SimError> {
        let cfg = &self.config;
        self.grid
            .laplacian_into(cfg.grid_spacing_m, &mut self.laplacian)?;

        let h = convection_coefficient(cfg, forcing.wind_speed);
        let t_amb = forcing.ambient_temperature;
        let t_sky = sky_temperature(cfg, t_amb);
        let q_solar = absorbed_solar_flux(cfg, forcing.solar_irradiance);
        let alpha = cfg.thermal_diffusivity_m2_per_s;
        let eps = cfg.emissivity;
        let factor = cfg.update_factor();

        Zip::from(self.grid.values_mut())
            .and(&self.laplacian)
            .for_each(|t, &lap| {
                let q_conv = convective_flux(h, *t, t_amb);
                let q_rad = radiative_flux(eps, *t, t_sky);
                let q_net = q_solar - q_conv - q_rad + alpha * lap;
                *t += q_net * factor;
            });
        Ok(())
    }

    pub fn grid(&self) -> &TemperatureGrid {
        &self.grid
    }

    pub fn into_grid(self) -> TemperatureGrid {
        self.grid
    }
}
