//! Command implementations

pub mod config;
pub mod gate;
pub mod quantum;
pub mod score;

use crate::error::CliResult;
use nomos_determinacy_engine::EngineConfig;
use std::path::Path;
use tracing::debug;

/// Load the engine configuration, falling back to the defaults.
pub fn load_config(path: Option<&Path>) -> CliResult<EngineConfig> {
    match path {
        Some(path) => Ok(EngineConfig::load(path)?),
        None => {
            debug!("No configuration file given, using defaults");
            Ok(EngineConfig::default())
        }
    }
}
