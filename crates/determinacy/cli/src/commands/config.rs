//! Effective configuration

use crate::error::CliResult;
use crate::output::{print_structured, OutputFormat};
use colored::Colorize;
use nomos_determinacy_engine::EngineConfig;

/// Execute config command
pub fn execute(config: &EngineConfig, format: OutputFormat) -> CliResult<()> {
    config.validate()?;
    if !print_structured(config, format)? {
        println!("{}", "Engine Configuration".bold().cyan());
        println!("{}", "=".repeat(50));
        println!("{}", toml::to_string_pretty(config)?);
    }
    Ok(())
}
