//! Participation gate check

use crate::error::{CliError, CliResult};
use crate::output::{print_rows, print_structured, print_success, print_warning, MetricRow, OutputFormat};
use clap::Args;
use nomos_determinacy_engine::{apply_sanctions, EngineConfig, GateDecision, ParticipationGate, ProofBonus};
use nomos_determinacy_types::NANOS_PER_SECOND;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct GateArgs {
    /// Determinacy score to check
    #[arg(short, long)]
    pub score: f64,

    /// Rule violations to sanction before the check
    #[arg(long, default_value = "0")]
    pub violations: u32,

    /// Treat a violation as severe (caps the score)
    #[arg(long)]
    pub severe: bool,

    /// A verified off-chain proof was submitted
    #[arg(long)]
    pub proof: bool,

    /// Seconds since the previous verified proof
    #[arg(long, requires = "proof")]
    pub since_proof: Option<u64>,
}

#[derive(Debug, Serialize)]
struct GateReport {
    input: f64,
    adjusted: f64,
    threshold: f64,
    #[serde(flatten)]
    decision: GateDecision,
}

/// Execute gate command
pub fn execute(args: GateArgs, config: &EngineConfig, format: OutputFormat) -> CliResult<()> {
    if !args.score.is_finite() || !(0.0..=1.0).contains(&args.score) {
        return Err(CliError::InvalidArgument(format!(
            "score must lie in [0, 1], got {}",
            args.score
        )));
    }

    let sanctioned = apply_sanctions(args.score, args.violations, args.severe, &config.gate);
    let since = args
        .since_proof
        .map(|secs| i64::try_from(secs).unwrap_or(i64::MAX).saturating_mul(NANOS_PER_SECOND));
    let adjusted = ProofBonus::from_config(&config.gate).apply(sanctioned, args.proof, since);

    let gate = ParticipationGate::from_config(&config.gate);
    let report = GateReport {
        input: args.score,
        adjusted,
        threshold: gate.threshold(),
        decision: gate.evaluate(adjusted),
    };

    if !print_structured(&report, format)? {
        print_rows(
            "Participation Gate",
            vec![
                MetricRow::score("input", report.input),
                MetricRow::score("adjusted", report.adjusted),
                MetricRow::score("threshold", report.threshold),
            ],
        );
        println!();
        match report.decision {
            GateDecision::Eligible { .. } => print_success("eligible"),
            GateDecision::Ineligible { shortfall, .. } => {
                print_warning(&format!("ineligible, short by {shortfall:.4}"))
            }
        }
    }
    Ok(())
}
