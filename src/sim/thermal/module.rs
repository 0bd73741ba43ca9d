use anyhow::{Context, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use super::analytic::synthesize_field;
use super::config::PanelForcing;
use super::grid::TemperatureGrid;
use super::solver::ThermalSolver;
use crate::error::SimError;
use crate::sim::coupling::{ActiveFidelity, FidelityBookkeeping, SimulationTime};
use crate::sim::framework::{Bus, SimContext, SimModule};

/// How the panel field is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldModel {
    /// Explicit integration of the heat balance ([`ThermalSolver`]).
    #[default]
    Pde,
    /// Synthesized radial hotspot field ([`synthesize_field`]).
    Analytic,
}

impl FieldModel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pde => "pde",
            Self::Analytic => "analytic",
        }
    }
}

/// Lifetime of the temperature grid between requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridPersistence {
    /// Fresh grid at the request's ambient temperature for every request.
    #[default]
    PerRequest,
    /// One grid carried from request to request.
    Persistent,
}

/// Produces the panel temperature field for the current request.
///
/// Inputs (via [`Bus`]):
/// - [`PanelForcing`] (optional; defaults to [`PanelForcing::default`])
/// - [`ActiveFidelity`] (required)
/// - [`SimulationTime`] (required by the analytic model)
/// - [`FidelityBookkeeping`] (optional; mixes the tick count into the noise seed)
/// - [`TemperatureGrid`] (optional; taken as the initial state when present)
///
/// Outputs (via [`Bus`]):
/// - [`TemperatureGrid`] after the solve, clamped to the configured range
pub struct PanelThermalModule {
    seed: Option<u64>,
}

impl PanelThermalModule {
    /// `seed` makes the analytic model's noise reproducible; `None` uses entropy.
    pub fn new(seed: Option<u64>) -> Self {
        Self { seed }
    }

    fn rng(&self, bus: &Bus) -> StdRng {
        match self.seed {
            Some(seed) => {
                let tick = bus
                    .get::<FidelityBookkeeping>()
                    .map(|b| b.total_ticks)
                    .unwrap_or(0);
                StdRng::seed_from_u64(seed.wrapping_add(tick))
            }
            None => StdRng::from_entropy(),
        }
    }

    fn initial_grid(
        &self,
        ctx: &SimContext,
        bus: &mut Bus,
        forcing: &PanelForcing,
    ) -> Result<TemperatureGrid, SimError> {
        let (rows, cols) = ctx.grid_shape();
        match bus.take::<TemperatureGrid>() {
            Some(grid) if grid.shape() == (rows, cols) => Ok(grid),
            Some(grid) => Err(SimError::invariant(format!(
                "carried grid has shape {:?}, solver configured for {:?}",
                grid.shape(),
                (rows, cols)
            ))),
            None => TemperatureGrid::uniform(rows, cols, forcing.ambient_temperature),
        }
    }
}

impl SimModule for PanelThermalModule {
    fn name(&self) -> &'static str {
        "panel_thermal"
    }

    fn init(&mut self, ctx: &SimContext, _bus: &mut Bus) -> Result<()> {
        ctx.config.thermal.validate()?;
        ctx.config.analytic.validate()?;
        Ok(())
    }

    fn step(&mut self, ctx: &SimContext, bus: &mut Bus) -> Result<()> {
        let config = ctx.config;
        let forcing = bus.get::<PanelForcing>().copied().unwrap_or_default();
        forcing.validate(&config.forcing_limits)?;
        let fidelity = bus.require::<ActiveFidelity>()?.0;

        let grid = match config.field_model {
            FieldModel::Pde => {
                let initial = self.initial_grid(ctx, bus, &forcing)?;
                let mut solver = ThermalSolver::new(initial, config.thermal.clone())?;
                solver.solve(&forcing, fidelity)?;
                solver.into_grid()
            }
            FieldModel::Analytic => {
                let time = bus
                    .require::<SimulationTime>()
                    .context("analytic field needs the simulation time")?
                    .0;
                let mut rng = self.rng(bus);
                let mut grid = synthesize_field(
                    &config.analytic,
                    config.grid_rows,
                    config.grid_cols,
                    fidelity,
                    time,
                    &mut rng,
                )?;
                grid.clamp(
                    config.thermal.min_temperature_k,
                    config.thermal.max_temperature_k,
                );
                grid
            }
        };

        tracing::debug!(
            model = config.field_model.as_str(),
            ?fidelity,
            sub_steps = fidelity.sub_steps(),
            "panel field updated"
        );
        bus.put(grid);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::config::SimulationConfig;
    use crate::sim::fidelity::FidelityLevel;

    fn small_config() -> SimulationConfig {
        SimulationConfig {
            grid_rows: 4,
            grid_cols: 3,
            ..SimulationConfig::new()
        }
    }

    #[test]
    fn test_requires_active_fidelity() {
        let config = small_config();
        let ctx = SimContext::new(&config);
        let mut bus = Bus::new();
        let mut module = PanelThermalModule::new(Some(1));
        assert!(module.step(&ctx, &mut bus).is_err());
    }

    #[test]
    fn test_pde_step_publishes_clamped_grid() -> Result<()> {
        let config = small_config();
        let ctx = SimContext::new(&config);
        let mut bus = Bus::new();
        bus.put(ActiveFidelity(FidelityLevel::Medium));
        bus.put(PanelForcing::default());

        let mut module = PanelThermalModule::new(None);
        module.init(&ctx, &mut bus)?;
        module.step(&ctx, &mut bus)?;
        let grid = bus.require::<TemperatureGrid>()?;
        assert_eq!(grid.shape(), (4, 3));
        assert!(grid.iter().all(|&t| (250.0..=400.0).contains(&t)));
        assert!(grid.iter().all(|&t| t > 298.15));
        Ok(())
    }

    #[test]
    fn test_carried_grid_is_used_as_initial_state() -> Result<()> {
        let config = small_config();
        let ctx = SimContext::new(&config);
        let mut module = PanelThermalModule::new(None);
        let forcing = PanelForcing::new(0.0, 0.0, 298.15);

        let mut bus = Bus::new();
        bus.put(ActiveFidelity(FidelityLevel::Low));
        bus.put(forcing);
        bus.put(TemperatureGrid::uniform(4, 3, 330.0)?);
        module.step(&ctx, &mut bus)?;
        let t = bus.require::<TemperatureGrid>()?.get(0, 0).unwrap();
        assert!(t > 320.0 && t < 330.0, "started hot and cooled a little, got {t}");
        Ok(())
    }

    #[test]
    fn test_mismatched_carried_grid_is_invariant_violation() {
        let config = small_config();
        let ctx = SimContext::new(&config);
        let mut module = PanelThermalModule::new(None);
        let mut bus = Bus::new();
        bus.put(ActiveFidelity(FidelityLevel::Low));
        bus.put(TemperatureGrid::uniform(2, 2, 300.0).unwrap());

        let err = module.step(&ctx, &mut bus).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SimError>(),
            Some(SimError::InternalInvariantViolation(_))
        ));
    }

    #[test]
    fn test_invalid_forcing_is_rejected() {
        let config = small_config();
        let ctx = SimContext::new(&config);
        let mut module = PanelThermalModule::new(None);
        let mut bus = Bus::new();
        bus.put(ActiveFidelity(FidelityLevel::Low));
        bus.put(PanelForcing::new(f64::INFINITY, 2.0, 298.15));

        let err = module.step(&ctx, &mut bus).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SimError>(),
            Some(SimError::InvalidParameter {
                name: "solar_irradiance",
                ..
            })
        ));
    }

    #[test]
    fn test_analytic_model_needs_time() -> Result<()> {
        let config = SimulationConfig {
            field_model: FieldModel::Analytic,
            ..small_config()
        };
        let ctx = SimContext::new(&config);
        let mut module = PanelThermalModule::new(Some(5));
        let mut bus = Bus::new();
        bus.put(ActiveFidelity(FidelityLevel::High));
        assert!(module.step(&ctx, &mut bus).is_err());

        bus.put(SimulationTime(4.0));
        module.step(&ctx, &mut bus)?;
        let stats_mean = bus.require::<TemperatureGrid>()?.iter().sum::<f64>() / 12.0;
        assert!((stats_mean - 318.15).abs() < 3.0, "mean {stats_mean}");
        Ok(())
    }
}
