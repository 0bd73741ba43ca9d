//! Payloads exchanged between simulation stages via the
//! [`crate::sim::framework::Bus`].
//!
//! Conventions:
//! - temperatures on the bus are Kelvin,
//! - Celsius appears only in reporting types outside this module.
//!
//! [`crate::sim::thermal::PanelForcing`] and [`crate::sim::thermal::TemperatureGrid`]
//! travel on the bus as-is and have no wrapper here.

use crate::sim::diagnostics::GridStatistics;
use crate::sim::fidelity::FidelityLevel;

/// Fidelity selected for the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveFidelity(pub FidelityLevel);

/// Orchestrator stability score in `[0.80, 0.99]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrchestratorConfidence(pub f64);

/// Simulation clock value after the current tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationTime(pub f64);

/// Orchestrator bookkeeping snapshot taken under the same lock as the tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FidelityBookkeeping {
    /// Ticks since process start.
    pub total_ticks: u64,
    /// Retained history entries.
    pub history_len: usize,
    /// Switches within the confidence window.
    pub recent_switches: usize,
}

/// Energy residual and summary statistics of the current field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDiagnostics {
    pub energy_residual: f64,
    pub stats: GridStatistics,
}
