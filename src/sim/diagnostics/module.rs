use anyhow::Result;

use super::residual::energy_residual;
use super::statistics::GridStatistics;
use crate::sim::coupling::{ActiveFidelity, FieldDiagnostics};
use crate::sim::framework::{Bus, SimContext, SimModule};
use crate::sim::thermal::TemperatureGrid;

/// Derives residual and summary statistics from the current field.
///
/// Inputs (via [`Bus`]): [`TemperatureGrid`], [`ActiveFidelity`] (both required).
///
/// Outputs (via [`Bus`]): [`FieldDiagnostics`].
pub struct DiagnosticsModule;

impl SimModule for DiagnosticsModule {
    fn name(&self) -> &'static str {
        "diagnostics"
    }

    fn step(&mut self, ctx: &SimContext, bus: &mut Bus) -> Result<()> {
        let fidelity = bus.require::<ActiveFidelity>()?.0;
        let stats = GridStatistics::from_grid(bus.require::<TemperatureGrid>()?);
        let energy_residual = energy_residual(ctx.config.field_model, fidelity, &stats);
        tracing::debug!(
            energy_residual,
            max_k = stats.max_k,
            mean_k = stats.mean_k,
            "field diagnostics"
        );
        bus.put(FieldDiagnostics {
            energy_residual,
            stats,
        });
        Ok(())
    }
}
