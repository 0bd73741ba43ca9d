use anyhow::Result;

use super::{Bus, SimContext};

/// A composable stage of a simulation request.
///
/// The fidelity, thermal and diagnostics stages run as modules of one
/// [`super::Pipeline`] and talk to each other only through the [`Bus`].
pub trait SimModule {
    /// Human-readable identifier for logs and error context.
    fn name(&self) -> &'static str;

    /// Optional one-time initialization hook.
    fn init(&mut self, _ctx: &SimContext, _bus: &mut Bus) -> Result<()> {
        Ok(())
    }

    /// Advances the module by one step.
    fn step(&mut self, ctx: &SimContext, bus: &mut Bus) -> Result<()>;
}
