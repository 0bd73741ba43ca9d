//! Field diagnostics: energy residual and single-pass summary statistics.

pub mod module;
pub mod residual;
pub mod statistics;

pub use module::DiagnosticsModule;
pub use residual::energy_residual;
pub use statistics::GridStatistics;
