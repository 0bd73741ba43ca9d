use crate::sim::config::SimulationConfig;

/// Shared read-only context passed to simulation modules.
///
/// Mutable per-request data travels on the [`super::Bus`]; process-wide mutable
/// state (the fidelity orchestrator, a persistent grid) is owned by the modules
/// that need it, never by the context.
pub struct SimContext<'a> {
    pub config: &'a SimulationConfig,
}

impl<'a> SimContext<'a> {
    pub fn new(config: &'a SimulationConfig) -> Self {
        Self { config }
    }

    /// Configured grid shape `(rows, cols)`.
    pub fn grid_shape(&self) -> (usize, usize) {
        (self.config.grid_rows, self.config.grid_cols)
    }
}
