//! Score an event file

use crate::error::{CliError, CliResult};
use crate::output::{print_rows, print_structured, print_warning, MetricRow, OutputFormat};
use clap::{Args, ValueEnum};
use colored::Colorize;
use nomos_determinacy_engine::{
    DeterminacyEngine, EngineConfig, EventSource, FixedNoise, GateDecision, InMemoryEventLog,
    RandomNoise,
};
use nomos_determinacy_types::{
    DeterminacyResult, Event, MemberId, QuantumTimeWindow, ScoreRequest, TimeWindow,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Member id used when scoring a whole event file.
const COMMUNITY: &str = "community";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Switch {
    On,
    Off,
}

#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// JSON file holding an array of events
    #[arg(short, long)]
    pub events: PathBuf,

    /// Engine identifier; selects standard or environmental mode
    #[arg(long, default_value = "default")]
    pub engine: String,

    /// Lookback window in seconds
    #[arg(short, long, default_value = "3600")]
    pub window: u64,

    /// End of the window in nanoseconds (defaults to the current time)
    #[arg(long, allow_hyphen_values = true)]
    pub now: Option<i64>,

    /// Only score this member's events
    #[arg(short, long)]
    pub member: Option<String>,

    /// Fixed noise value instead of a random draw
    #[arg(long, allow_hyphen_values = true, conflicts_with_all = ["quantum", "seed"])]
    pub noise: Option<f64>,

    /// Seed for the pseudo-random noise source
    #[arg(long, conflicts_with = "quantum")]
    pub seed: Option<u64>,

    /// JSON file holding a quantum time window
    #[arg(short, long)]
    pub quantum: Option<PathBuf>,

    /// Override the IPAT correction switch
    #[arg(long, value_enum)]
    pub ipat: Option<Switch>,
}

/// Score plus the participation check, as reported by the CLI.
#[derive(Debug, Serialize)]
struct ScoreReport {
    #[serde(flatten)]
    result: DeterminacyResult,
    participation: GateDecision,
}

/// Execute score command
pub fn execute(args: ScoreArgs, config: EngineConfig, format: OutputFormat) -> CliResult<()> {
    let engine = DeterminacyEngine::new(config)?;
    if let Some(switch) = args.ipat {
        engine.set_ipat_enabled(switch == Switch::On);
    }

    let log = read_events(&args.events)?;
    let result = match &args.quantum {
        Some(path) => {
            let window: QuantumTimeWindow = serde_json::from_str(&std::fs::read_to_string(path)?)?;
            if window.end_time < window.start_time {
                return Err(CliError::InvalidArgument(format!(
                    "quantum window ends ({}) before it starts ({})",
                    window.end_time, window.start_time
                )));
            }
            let request = build_request(&args, &log, window.end_time);
            engine.score_in_quantum_window(&request, &window)
        }
        None => {
            let now = args.now.unwrap_or_else(current_time);
            let request = build_request(&args, &log, now);
            match (args.noise, args.seed) {
                (Some(noise), _) => engine.score(&request, &mut FixedNoise(noise)),
                (None, Some(seed)) => {
                    engine.score(&request, &mut RandomNoise::with_rng(StdRng::seed_from_u64(seed)))
                }
                (None, None) => engine.score_random(&request),
            }
        }
    };

    info!(
        member = %result.member_id,
        engine = %result.engine_id,
        determinacy = result.determinacy,
        "Scored"
    );

    let report = ScoreReport {
        participation: engine.gate().evaluate(result.determinacy),
        result,
    };
    if !print_structured(&report, format)? {
        print_table(&report);
    }
    Ok(())
}

fn read_events(path: &Path) -> CliResult<InMemoryEventLog> {
    let events: Vec<Event> = serde_json::from_str(&std::fs::read_to_string(path)?)?;
    let mut log = InMemoryEventLog::new();
    log.extend(events)?;
    Ok(log)
}

fn build_request(args: &ScoreArgs, log: &InMemoryEventLog, now: i64) -> ScoreRequest {
    let window = TimeWindow::seconds(args.window);
    // The quantum path re-selects by its own bounds, so hand it everything.
    let bounds = if args.quantum.is_some() {
        log.span().unwrap_or_else(|| window.bounds(now))
    } else {
        window.bounds(now)
    };
    let (member, events) = match &args.member {
        Some(member) => {
            let member = MemberId::new(member.as_str());
            let events = log.events_for(&member, bounds);
            (member, events)
        }
        None => (MemberId::new(COMMUNITY), log.events_in(bounds)),
    };
    ScoreRequest::new(member, events, window, args.engine.as_str(), now)
}

fn current_time() -> i64 {
    chrono::Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or(i64::MAX)
}

fn print_table(report: &ScoreReport) {
    let r = &report.result;
    let mut rows = vec![
        MetricRow::new("member", &r.member_id),
        MetricRow::new("engine", &r.engine_id),
        MetricRow::new("mode", r.mode),
        MetricRow::new("events", r.event_count),
        MetricRow::score("consistency", r.behavioral.consistency),
        MetricRow::score("regularity", r.behavioral.regularity),
        MetricRow::score("intent strength", r.behavioral.intent_strength),
    ];
    if let Some(env) = r.environmental {
        rows.push(MetricRow::score("fairness", env.fairness));
        rows.push(MetricRow::score("adaptation", env.adaptation));
    }
    rows.push(MetricRow::score("noise", r.noise));
    rows.push(MetricRow::score("base", r.base_dt));
    if let Some(ipat) = r.ipat {
        rows.push(MetricRow::score("ipat impact", ipat.impact));
    }
    if let Some(m) = r.quantum_multiplier {
        rows.push(MetricRow::score("quantum multiplier", m));
    }
    rows.push(MetricRow::score("determinacy", r.determinacy));
    print_rows("Determinacy Score", rows);

    println!();
    match report.participation {
        GateDecision::Eligible { .. } => {
            println!("  {} eligible for governance participation", "●".green())
        }
        GateDecision::Ineligible { shortfall, .. } => print_warning(&format!(
            "below the participation threshold by {shortfall:.4}"
        )),
    }
    if r.event_count == 0 {
        print_warning("no events inside the window");
    }
}
