//! Staged simulation framework.
//!
//! A request is served by a [`Pipeline`] of [`SimModule`]s (fidelity selection,
//! thermal field, diagnostics). Stages exchange typed values through a [`Bus`] and
//! read shared configuration from a [`SimContext`].

pub mod bus;
pub mod context;
pub mod module;
pub mod pipeline;

pub use bus::Bus;
pub use context::SimContext;
pub use module::SimModule;
pub use pipeline::Pipeline;
