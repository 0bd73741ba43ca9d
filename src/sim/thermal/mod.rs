//! Panel thermal field: explicit heat-balance solver and analytic field model.
//!
//! # Architecture
//!
//! ```text
//! PanelForcing ─┐
//!               ├─► ThermalSolver::solve() ──► TemperatureGrid (clamped)
//! FidelityLevel ┘        │
//!                   sub_steps × step()
//!                        │
//!        absorbed solar − convection − radiation + α·∇²T
//! ```
//!
//! Temperatures are Kelvin throughout; conversion to Celsius happens only when
//! results are reported.

pub mod analytic;
pub mod config;
pub mod flux;
pub mod grid;
pub mod module;
pub mod solver;

pub use analytic::{AnalyticFieldConfig, synthesize_field};
pub use config::{
    CELSIUS_OFFSET, ForcingLimits, MAX_STABILITY_NUMBER, PanelForcing, PanelThermalConfig,
    STEFAN_BOLTZMANN,
};
pub use grid::TemperatureGrid;
pub use module::{FieldModel, GridPersistence, PanelThermalModule};
pub use solver::ThermalSolver;
