use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::sim::fidelity::OrchestratorConfig;
use crate::sim::thermal::{
    AnalyticFieldConfig, FieldModel, ForcingLimits, GridPersistence, PanelThermalConfig,
};

/// Top-level configuration of a simulation service.
///
/// Every field has a default, so a partial JSON document is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of grid rows.
    pub grid_rows: usize,
    /// Number of grid columns.
    pub grid_cols: usize,
    /// How the panel field is produced.
    pub field_model: FieldModel,
    /// Whether the grid survives between requests.
    pub grid_persistence: GridPersistence,
    /// Heat-balance constants.
    pub thermal: PanelThermalConfig,
    /// Accepted request ranges.
    pub forcing_limits: ForcingLimits,
    /// Synthesized field parameters (used when `field_model` is `analytic`).
    pub analytic: AnalyticFieldConfig,
    /// Clock, schedule, history and confidence settings.
    pub orchestrator: OrchestratorConfig,
}

impl SimulationConfig {
    pub fn new() -> Self {
        Self {
            grid_rows: 20,
            grid_cols: 20,
            field_model: FieldModel::Pde,
            grid_persistence: GridPersistence::PerRequest,
            thermal: PanelThermalConfig::new(),
            forcing_limits: ForcingLimits::default(),
            analytic: AnalyticFieldConfig::new(),
            orchestrator: OrchestratorConfig::new(),
        }
    }

    /// Settings of the analytic dashboard variant: 10x10 synthesized field with a
    /// transient-first fidelity cycle driven by wall-clock time.
    pub fn analytic_dashboard() -> Self {
        use crate::sim::fidelity::{ClockMode, FidelitySchedule};
        Self {
            grid_rows: 10,
            grid_cols: 10,
            field_model: FieldModel::Analytic,
            orchestrator: OrchestratorConfig {
                clock: ClockMode::WallClock,
                schedule: FidelitySchedule::TransientFirst { period: 10.0 },
                ..OrchestratorConfig::new()
            },
            ..Self::new()
        }
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.grid_rows == 0 || self.grid_cols == 0 {
            return Err(SimError::invalid(
                "grid_size",
                (self.grid_rows * self.grid_cols) as f64,
                format!(
                    "grid must have at least one cell, got {}x{}",
                    self.grid_rows, self.grid_cols
                ),
            ));
        }
        self.thermal.validate()?;
        self.forcing_limits.validate()?;
        let limits = &self.forcing_limits;
        self.thermal.check_stability(
            limits.max_wind_speed_m_per_s,
            self.thermal
                .max_temperature_k
                .max(limits.max_ambient_temperature_k),
        )?;
        self.analytic.validate()?;
        self.orchestrator.validate()?;
        Ok(())
    }

    /// Human-readable grid size, e.g. `20×20`.
    pub fn grid_label(&self) -> String {
        format!("{}×{}", self.grid_rows, self.grid_cols)
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let cfg = SimulationConfig::default();
        assert_eq!(cfg.grid_rows, 20);
        assert_eq!(cfg.grid_cols, 20);
        assert_eq!(cfg.field_model, FieldModel::Pde);
        assert_eq!(cfg.grid_persistence, GridPersistence::PerRequest);
        assert_eq!(cfg.orchestrator.history_limit, 100);
        assert_eq!(cfg.grid_label(), "20×20");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_analytic_dashboard_preset() {
        let cfg = SimulationConfig::analytic_dashboard();
        assert_eq!(cfg.grid_label(), "10×10");
        assert_eq!(cfg.field_model, FieldModel::Analytic);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_unstable_thermal_config_is_invalid() {
        let mut cfg = SimulationConfig::new();
        cfg.thermal.time_step_s = 1.0e6;
        cfg.thermal.areal_heat_capacity_j_per_m2_k = 1.0;
        assert!(cfg.thermal.validate().is_ok());
        assert!(matches!(
            cfg.validate(),
            Err(SimError::InvalidParameter {
                name: "time_step_s",
                ..
            })
        ));
    }

    #[test]
    fn test_stability_uses_configured_wind_limit() {
        // Stable at 60 m/s, unstable once the accepted wind range is widened.
        let mut cfg = SimulationConfig::new();
        cfg.thermal.time_step_s = 2.0;
        assert!(cfg.validate().is_ok());
        cfg.forcing_limits.max_wind_speed_m_per_s = 200.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_zero_grid_is_invalid() {
        let cfg = SimulationConfig {
            grid_cols: 0,
            ..SimulationConfig::new()
        };
        assert!(matches!(
            cfg.validate(),
            Err(SimError::InvalidParameter {
                name: "grid_size",
                ..
            })
        ));
    }
}
