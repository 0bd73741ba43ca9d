use std::sync::{Arc, Mutex};

use anyhow::Result;

use super::orchestrator::FidelityOrchestrator;
use crate::error::SimError;
use crate::sim::coupling::{
    ActiveFidelity, FidelityBookkeeping, OrchestratorConfidence, SimulationTime,
};
use crate::sim::framework::{Bus, SimContext, SimModule};

/// Ticks the shared orchestrator once per step and publishes its decision.
///
/// Outputs (via [`Bus`]):
/// - [`ActiveFidelity`]
/// - [`OrchestratorConfidence`]
/// - [`SimulationTime`]
/// - [`FidelityBookkeeping`]
///
/// The tick, the confidence score and the bookkeeping snapshot are taken under a
/// single lock, so concurrent requests never interleave inside one decision.
pub struct FidelityModule {
    orchestrator: Arc<Mutex<FidelityOrchestrator>>,
}

impl FidelityModule {
    pub fn new(orchestrator: Arc<Mutex<FidelityOrchestrator>>) -> Self {
        Self { orchestrator }
    }
}

impl SimModule for FidelityModule {
    fn name(&self) -> &'static str {
        "fidelity"
    }

    fn step(&mut self, _ctx: &SimContext, bus: &mut Bus) -> Result<()> {
        let (level, confidence, time, bookkeeping) = {
            let mut orch = self
                .orchestrator
                .lock()
                .map_err(|_| SimError::invariant("fidelity orchestrator mutex poisoned"))?;
            let level = orch.advance_tick();
            let confidence = orch.confidence();
            let bookkeeping = FidelityBookkeeping {
                total_ticks: orch.total_ticks(),
                history_len: orch.history().len(),
                recent_switches: orch.recent_switches(),
            };
            (level, confidence, orch.time(), bookkeeping)
        };

        tracing::debug!(?level, confidence, time, "fidelity selected");
        bus.put(ActiveFidelity(level));
        bus.put(OrchestratorConfidence(confidence));
        bus.put(SimulationTime(time));
        bus.put(bookkeeping);
        Ok(())
    }
}
