pub mod error;
pub mod io;
pub mod service;
pub mod sim;

// Prelude
pub use error::SimError;
pub use service::{HealthReport, SimulationRequest, SimulationResponse, Simulator};
pub use sim::config::SimulationConfig;
pub use sim::fidelity::{FidelityLevel, FidelityOrchestrator};
pub use sim::thermal::{PanelForcing, TemperatureGrid, ThermalSolver};
