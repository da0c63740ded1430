//! Session simulator CLI - plays whole two-player sessions in memory.
//!
//! Reaction times are simulated per challenge kind, so schedule generation,
//! scoring and results can be exercised in bulk without any presentation layer.

mod metrics;
mod output;
mod simulator;
mod types;

use std::time::{Duration, Instant};

use clap::Parser;
use metrics::build_session_metrics;
use output::OutputWriter;
use session_core::{Player, ScheduleConfig};
use simulator::{SessionRun, Simulator};
use tracing::{info, warn};
use types::OutputFormat;

#[derive(Parser)]
#[command(name = "session-simulator")]
#[command(about = "In-memory simulator for two-player reaction race sessions")]
struct Args {
    /// Number of sessions to simulate
    #[arg(short, long, default_value = "1")]
    sessions: u32,

    /// Base seed; every session derives its own schedule and outcome seeds
    #[arg(long)]
    seed: Option<u64>,

    /// Walk the guided tutorial before each main session
    #[arg(long)]
    tutorial: bool,

    /// End each session early when this round comes up
    #[arg(long)]
    early_stop_at: Option<u8>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Show output summary and file paths
    #[arg(long)]
    show_output: bool,

    /// Output directory for results
    #[arg(long, default_value = "./simulation-results")]
    output_dir: String,

    /// Output format
    #[arg(long, value_enum, default_value = "jsonl")]
    output_format: OutputFormat,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = if args.verbose {
        "debug"
    } else if args.show_output {
        "info"
    } else {
        "warn"
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // NEURORACE_* variables override the shipped schedule knobs.
    let config = ScheduleConfig::from_env()?;
    let base_seed = args.seed.unwrap_or_else(rand::random);

    if args.show_output {
        info!(
            sessions = args.sessions,
            base_seed,
            rounds = config.rounds,
            "starting session simulator"
        );
    }

    let mut output_writer = OutputWriter::new(&args.output_dir, args.output_format)?;

    let start = Instant::now();
    let mut runs = Vec::new();
    let mut errors = 0u32;

    for session_no in 1..=args.sessions {
        let session_start = Instant::now();
        let outcome = Simulator::new(config.clone(), base_seed, session_no).and_then(|sim| {
            sim.with_tutorial(args.tutorial)
                .with_early_stop(args.early_stop_at)
                .simulate_session()
        });

        match outcome {
            Ok(run) => {
                let duration_ms = session_start.elapsed().as_secs_f64() * 1000.0;
                let metrics = build_session_metrics(session_no, &config, &run, duration_ms);
                if let Err(e) = output_writer.write_session(&metrics) {
                    warn!(session_no, error = %e, "failed to write session metrics");
                }
                if args.verbose {
                    info!(session_no, totals = ?run.results.totals, "session completed");
                }
                runs.push(run);
            }
            Err(e) => {
                errors += 1;
                warn!(session_no, error = %e, "session failed");
            }
        }
    }

    let elapsed = start.elapsed();
    let (jsonl_path, csv_path) = output_writer.output_paths();
    let jsonl_path = jsonl_path.cloned();
    let csv_path = csv_path.cloned();
    output_writer.finish()?;

    if args.show_output {
        if let Some(path) = jsonl_path {
            info!("Detailed results written to: {}", path.display());
        }
        if let Some(path) = csv_path {
            info!("Summary CSV written to: {}", path.display());
        }
        print_summary(&runs, errors, elapsed, args.sessions);
    }

    Ok(())
}

fn print_summary(runs: &[SessionRun], errors: u32, elapsed: Duration, total: u32) {
    println!("\n=== Simulation Summary ===");
    println!("Sessions completed: {}/{}", runs.len(), total);
    if errors > 0 {
        println!("Errors: {errors}");
    }
    println!("Total time: {elapsed:?}");
    if runs.is_empty() {
        return;
    }
    println!("Average time per session: {:?}", elapsed / runs.len() as u32);

    let mut wins = [0u32; 2];
    let mut ties = 0u32;
    let mut total_times = [0f64; 2];
    let mut early = 0u32;

    for run in runs {
        match run.results.winner {
            Some(player) => wins[player.index()] += 1,
            None => ties += 1,
        }
        for player in Player::ALL {
            total_times[player.index()] += run.results.totals[player.index()];
        }
        if run.ended_early {
            early += 1;
        }
    }

    println!("\n=== Results by Player ===");
    for player in Player::ALL {
        let idx = player.index();
        let avg = total_times[idx] / runs.len() as f64;
        let win_rate = wins[idx] as f64 / runs.len() as f64 * 100.0;
        println!(
            "{player}: avg total={avg:.2}s, wins={} ({win_rate:.1}%)",
            wins[idx]
        );
    }
    println!("Ties: {ties}");
    if early > 0 {
        println!("Ended early: {early}");
    }
}
