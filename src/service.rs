//! Request/response contract consumed by a transport layer.
//!
//! [`Simulator`] owns all process-wide state (the fidelity orchestrator and, when
//! enabled, the persistent grid). It is `Send + Sync`; share it between request
//! handlers with an `Arc`.

use std::sync::{Arc, Mutex};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::sim::config::SimulationConfig;
use crate::sim::coupling::{
    ActiveFidelity, FidelityBookkeeping, FieldDiagnostics, OrchestratorConfidence, SimulationTime,
};
use crate::sim::diagnostics::DiagnosticsModule;
use crate::sim::fidelity::{FidelityModule, FidelityOrchestrator};
use crate::sim::framework::{Bus, Pipeline, SimContext};
use crate::sim::thermal::{GridPersistence, PanelForcing, PanelThermalModule, TemperatureGrid};

/// Simulation request. Missing fields take the documented defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationRequest {
    /// Solar irradiance [W/m²], default 1000.0.
    pub solar: Option<f64>,
    /// Wind speed [m/s], default 2.0.
    pub wind: Option<f64>,
    /// Ambient temperature [K], default 298.15.
    pub ambient: Option<f64>,
}

impl SimulationRequest {
    pub fn new(solar: f64, wind: f64, ambient: f64) -> Self {
        Self {
            solar: Some(solar),
            wind: Some(wind),
            ambient: Some(ambient),
        }
    }

    pub fn forcing(&self) -> PanelForcing {
        let defaults = PanelForcing::default();
        PanelForcing {
            solar_irradiance: self.solar.unwrap_or(defaults.solar_irradiance),
            wind_speed: self.wind.unwrap_or(defaults.wind_speed),
            ambient_temperature: self.ambient.unwrap_or(defaults.ambient_temperature),
        }
    }
}

/// Summary temperatures in Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldStats {
    pub min_t: f64,
    pub max_t: f64,
    pub avg_t: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    pub grid_size: String,
    pub field_model: String,
    pub total_fidelity_selections: u64,
    pub recent_switches: usize,
}

/// Simulation response. `temperature_field` is Kelvin, `stats` are Celsius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResponse {
    pub temperature_field: Vec<Vec<f64>>,
    pub fidelity_level: u8,
    pub fidelity_name: String,
    pub energy_residuals: f64,
    pub ml_confidence: f64,
    pub timestamp: f64,
    pub stats: FieldStats,
    pub metadata: ResponseMetadata,
}

/// Liveness and bookkeeping snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub simulation_time: f64,
    pub fidelity_history_len: usize,
    pub total_ticks: u64,
    pub version: String,
}

/// Serves simulation requests against shared orchestrator state.
pub struct Simulator {
    config: SimulationConfig,
    orchestrator: Arc<Mutex<FidelityOrchestrator>>,
    /// Carried grid when `grid_persistence` is `Persistent`.
    grid: Mutex<Option<TemperatureGrid>>,
}

impl Simulator {
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let orchestrator = FidelityOrchestrator::new(config.orchestrator.clone())?;
        tracing::info!(
            grid = %config.grid_label(),
            model = config.field_model.as_str(),
            persistence = ?config.grid_persistence,
            "simulator ready"
        );
        Ok(Self {
            config,
            orchestrator: Arc::new(Mutex::new(orchestrator)),
            grid: Mutex::new(None),
        })
    }

    /// Runs one request: tick the orchestrator, produce the field, report.
    ///
    /// Invalid input is rejected before the orchestrator is ticked.
    pub fn simulate(&self, request: &SimulationRequest) -> Result<SimulationResponse> {
        let forcing = request.forcing();
        if let Err(e) = forcing.validate(&self.config.forcing_limits) {
            tracing::warn!(error = %e, "rejected simulation request");
            return Err(e.into());
        }

        let persistent = self.config.grid_persistence == GridPersistence::Persistent;
        // Held for the whole request so carried-grid updates are serialized.
        let mut carried = if persistent {
            Some(
                self.grid
                    .lock()
                    .map_err(|_| SimError::invariant("persistent grid mutex poisoned"))?,
            )
        } else {
            None
        };

        let mut bus = Bus::new();
        bus.put(forcing);
        if let Some(grid) = carried.as_ref().and_then(|g| (**g).as_ref()) {
            bus.put(grid.clone());
        }

        let ctx = SimContext::new(&self.config);
        let mut pipeline = self.pipeline();
        pipeline.init(&ctx, &mut bus)?;
        pipeline.step(&ctx, &mut bus)?;

        if let Some(slot) = carried.as_mut() {
            **slot = Some(bus.require::<TemperatureGrid>()?.clone());
        }
        drop(carried);

        let response = self.response(&bus)?;
        tracing::info!(
            fidelity = %response.fidelity_name,
            confidence = response.ml_confidence,
            time = response.timestamp,
            max_t = response.stats.max_t,
            "simulation step complete"
        );
        Ok(response)
    }

    pub fn health(&self) -> Result<HealthReport> {
        let orch = self
            .orchestrator
            .lock()
            .map_err(|_| SimError::invariant("fidelity orchestrator mutex poisoned"))?;
        Ok(HealthReport {
            status: "healthy".to_string(),
            simulation_time: round_to(orch.time(), 2),
            fidelity_history_len: orch.history().len(),
            total_ticks: orch.total_ticks(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }

    fn pipeline(&self) -> Pipeline {
        Pipeline::new()
            .with_module(FidelityModule::new(self.orchestrator.clone()))
            .with_module(PanelThermalModule::new(self.config.orchestrator.seed))
            .with_module(DiagnosticsModule)
    }

    fn response(&self, bus: &Bus) -> Result<SimulationResponse> {
        let fidelity = bus.require::<ActiveFidelity>()?.0;
        let confidence = bus.require::<OrchestratorConfidence>()?.0;
        let time = bus.require::<SimulationTime>()?.0;
        let bookkeeping = bus.require::<FidelityBookkeeping>()?;
        let diagnostics = bus.require::<FieldDiagnostics>()?;
        let grid = bus.require::<TemperatureGrid>()?;

        let temperature_field = grid
            .to_rows()
            .into_iter()
            .map(|row| row.into_iter().map(|t| round_to(t, 2)).collect())
            .collect();

        Ok(SimulationResponse {
            temperature_field,
            fidelity_level: fidelity.ordinal(),
            fidelity_name: fidelity.display_name().to_string(),
            energy_residuals: diagnostics.energy_residual,
            ml_confidence: round_to(confidence, 3),
            timestamp: round_to(time, 2),
            stats: FieldStats {
                min_t: round_to(diagnostics.stats.min_c(), 2),
                max_t: round_to(diagnostics.stats.max_c(), 2),
                avg_t: round_to(diagnostics.stats.mean_c(), 2),
            },
            metadata: ResponseMetadata {
                grid_size: self.config.grid_label(),
                field_model: self.config.field_model.as_str().to_string(),
                total_fidelity_selections: bookkeeping.total_ticks,
                recent_switches: bookkeeping.recent_switches,
            },
        })
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}
