//! Quantum bit inspection

use crate::error::{CliError, CliResult};
use crate::output::{print_rows, print_structured, MetricRow, OutputFormat};
use clap::Args;
use nomos_determinacy_engine::quantum::{bit_entropy, quantum_weight};
use nomos_determinacy_engine::{EngineConfig, NoiseSource, QuantumBitsNoise};
use nomos_determinacy_types::set_ratio;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct QuantumArgs {
    /// Bit string, e.g. 01101001
    #[arg(short, long)]
    pub bits: String,
}

#[derive(Debug, Serialize)]
struct QuantumReport {
    bits: usize,
    set_ratio: f64,
    entropy: f64,
    multiplier: f64,
    /// First ε the bits would inject at the configured amplitude.
    noise: f64,
}

/// Execute quantum command
pub fn execute(args: QuantumArgs, config: &EngineConfig, format: OutputFormat) -> CliResult<()> {
    let bits = parse_bits(&args.bits)?;
    let report = QuantumReport {
        bits: bits.len(),
        set_ratio: set_ratio(&bits),
        entropy: bit_entropy(&bits),
        multiplier: quantum_weight(&bits),
        noise: QuantumBitsNoise::new(&bits).draw(config.noise.amplitude),
    };

    if !print_structured(&report, format)? {
        print_rows(
            "Quantum Bits",
            vec![
                MetricRow::new("bits", report.bits),
                MetricRow::score("set ratio", report.set_ratio),
                MetricRow::score("entropy", report.entropy),
                MetricRow::score("multiplier", report.multiplier),
                MetricRow::score("noise", report.noise),
            ],
        );
    }
    Ok(())
}

/// Accepts `0`/`1` characters; `_` and whitespace are ignored as separators.
fn parse_bits(raw: &str) -> CliResult<Vec<bool>> {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .map(|c| match c {
            '0' => Ok(false),
            '1' => Ok(true),
            other => Err(CliError::InvalidArgument(format!(
                "quantum bits may only contain 0 and 1, found `{other}`"
            ))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bit_strings() {
        assert_eq!(parse_bits("1010").unwrap(), vec![true, false, true, false]);
        assert_eq!(parse_bits("11_00 1").unwrap().len(), 5);
        assert!(parse_bits("").unwrap().is_empty());
        assert!(matches!(parse_bits("10x1"), Err(CliError::InvalidArgument(_))));
    }
}
