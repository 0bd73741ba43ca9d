//! Fidelity orchestration.
//!
//! ```text
//! SimulationClock ──► FidelitySchedule ──► FidelityLevel ──► FidelityHistory
//!                                              │                   │
//!                                         sub-steps,          confidence()
//!                                         residuals
//! ```

pub mod level;
pub mod module;
pub mod orchestrator;
pub mod schedule;

pub use level::{AnalyticFidelityParams, FidelityLevel};
pub use module::FidelityModule;
pub use orchestrator::{ClockMode, FidelityOrchestrator, OrchestratorConfig};
pub use schedule::FidelitySchedule;
