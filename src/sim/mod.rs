pub mod config;
pub mod coupling;
pub mod diagnostics;
pub mod fidelity;
pub mod framework;
pub mod thermal;
