//! File I/O for simulation settings.
//!
//! Configuration is stored as JSON. See [`config`] for the format.

pub mod config;

pub use config::{config_from_str, load_config, save_config};
