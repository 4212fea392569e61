mod types;
mod patterns;
mod persistence;
mod engine;
mod config;
mod web;

use std::path::Path;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use config::AdvisorConfig;
use engine::{AppendReport, PredictionTracker, UndoReport};
use patterns::{Advice, Prediction, SuggestionFamily};
use persistence::SnapshotStore;
use types::{Outcome, Resolution};
use web::{start_api_server, AppState};

#[derive(Parser)]
#[command(name = "bacbo-advisor")]
#[command(version = "0.1.0")]
#[command(about = "Pattern-based round advisor for the Bac Bo dice game", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API and WebSocket server
    Serve {
        /// Override the configured port
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Record one or more finished rounds
    Add {
        /// Outcomes in play order (player, banker or tie; p/b/t also work)
        outcomes: Vec<String>,

        /// Dice sums for a single round, as PLAYER BANKER
        #[arg(long, num_args = 2, value_names = ["PLAYER", "BANKER"])]
        sums: Option<Vec<u8>>,
    },
    /// Remove the most recent round and its side effects
    Undo,
    /// Wipe the session: rounds, signals and counters
    Clear {
        /// Skip the confirmation step
        #[arg(long)]
        yes: bool,
    },
    /// Show what the rule table predicts for the next round
    Predict,
    /// Show family-grouped betting suggestions
    Advise {
        /// Comma-separated families: color, sum, tie, combo (all when empty)
        #[arg(short, long, default_value = "")]
        families: String,
    },
    /// Show hit/miss statistics for resolved predictions
    Stats {
        /// Break the tally down by pattern
        #[arg(long)]
        per_pattern: bool,
    },
    /// Print recent rounds
    History {
        /// Number of rounds to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Export the round history as CSV
    Export {
        /// Output file path (prints to stdout when omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = AdvisorConfig::load_or_default(Path::new(&cli.config))?;

    match cli.command {
        Commands::Serve { port } => {
            run_server(config, port).await?;
        }
        Commands::Add { outcomes, sums } => {
            add_rounds(&config, &outcomes, sums.as_deref())?;
        }
        Commands::Undo => {
            undo_round(&config)?;
        }
        Commands::Clear { yes } => {
            clear_session(&config, yes)?;
        }
        Commands::Predict => {
            show_prediction(&config)?;
        }
        Commands::Advise { families } => {
            show_advice(&config, &families)?;
        }
        Commands::Stats { per_pattern } => {
            show_stats(&config, per_pattern)?;
        }
        Commands::History { limit } => {
            show_history(&config, limit)?;
        }
        Commands::Export { output } => {
            export_history(&config, output.as_deref())?;
        }
    }

    Ok(())
}

fn load_tracker(config: &AdvisorConfig) -> Result<PredictionTracker> {
    let store = SnapshotStore::new(config.storage.snapshot_path.clone());
    Ok(PredictionTracker::load(store)?)
}

async fn run_server(config: AdvisorConfig, port_override: Option<u16>) -> Result<()> {
    let tracker = load_tracker(&config)?;

    let host = config.server.host.clone();
    let port = port_override.unwrap_or(config.server.port);
    let state = AppState::new(tracker, config);

    start_api_server(state, &host, port).await
}

fn add_rounds(config: &AdvisorConfig, outcomes: &[String], sums: Option<&[u8]>) -> Result<()> {
    // Parse everything up front so a typo cannot leave a partial batch behind
    let mut parsed = Vec::with_capacity(outcomes.len());
    for raw in outcomes {
        match Outcome::from_str(raw) {
            Some(outcome) => parsed.push(outcome),
            None => {
                error!("Unknown outcome: {}. Use player, banker or tie", raw);
                return Ok(());
            }
        }
    }

    if let Some(sums) = sums {
        // --sums records a single round; the outcome is optional because the
        // dice determine it, and cross-checked when supplied
        if parsed.len() > 1 {
            error!("--sums records one round, but {} outcomes were given", parsed.len());
            return Ok(());
        }
        let mut tracker = load_tracker(config)?;
        let report = tracker.append(parsed.first().copied(), Some((sums[0], sums[1])))?;
        print_append_report(&report);
        return Ok(());
    }

    if parsed.is_empty() {
        error!("Nothing to add. Pass outcomes (player, banker, tie) or --sums");
        return Ok(());
    }

    let mut tracker = load_tracker(config)?;
    for outcome in parsed {
        let report = tracker.append(Some(outcome), None)?;
        print_append_report(&report);
    }
    Ok(())
}

fn print_append_report(report: &AppendReport) {
    println!("Recorded {}", report.round.outcome);
    if let Some(signal) = &report.resolved {
        let verdict = match signal.resolution {
            Some(Resolution::Hit) => "hit",
            _ => "miss",
        };
        println!(
            "  Pattern {} prediction of {} was a {}",
            signal.pattern_id, signal.predicted, verdict
        );
    }
    if let Some(opened) = &report.opened {
        println!(
            "  Pattern {} ({}) now predicts {}",
            opened.pattern_id, opened.name, opened.predicted
        );
    }
}

fn undo_round(config: &AdvisorConfig) -> Result<()> {
    let mut tracker = load_tracker(config)?;
    match tracker.undo_last()? {
        UndoReport::Undone { round } => {
            println!(
                "Removed the {} round from {}",
                round.outcome,
                round.timestamp.format("%H:%M:%S")
            );
        }
        UndoReport::Empty => println!("History is already empty"),
    }
    Ok(())
}

fn clear_session(config: &AdvisorConfig, yes: bool) -> Result<()> {
    if !yes {
        println!("This wipes every round, signal and counter. Re-run with --yes to confirm.");
        return Ok(());
    }
    let mut tracker = load_tracker(config)?;
    tracker.clear_all()?;
    println!("Session cleared");
    Ok(())
}

fn show_prediction(config: &AdvisorConfig) -> Result<()> {
    let tracker = load_tracker(config)?;
    match tracker.current_prediction() {
        Prediction::InsufficientData => println!("Not enough rounds yet (need at least 2)"),
        Prediction::NoMatch => println!("No pattern matches the current history"),
        Prediction::Match(matched) => {
            println!(
                "Pattern {} ({}) predicts {}",
                matched.pattern_id, matched.name, matched.predicted
            );
        }
    }
    Ok(())
}

fn show_advice(config: &AdvisorConfig, families: &str) -> Result<()> {
    let families = match SuggestionFamily::parse_list(families) {
        Ok(families) => families,
        Err(bad) => {
            error!("Unknown suggestion family: {}. Use color, sum, tie or combo", bad);
            return Ok(());
        }
    };

    let tracker = load_tracker(config)?;
    match tracker.suggestions(&families) {
        Advice::InsufficientData => println!("Not enough rounds yet (need at least 2)"),
        Advice::Suggestions(suggestions) if suggestions.is_empty() => {
            println!("No suggestions for the current history");
        }
        Advice::Suggestions(suggestions) => {
            for suggestion in suggestions {
                println!("[{}] {}", suggestion.family, suggestion.message);
            }
        }
    }
    Ok(())
}

fn show_stats(config: &AdvisorConfig, per_pattern: bool) -> Result<()> {
    let tracker = load_tracker(config)?;
    let counters = *tracker.performance();

    println!("\n=== Prediction Performance ===");
    println!(
        "Resolved: {} | Hits: {} | Misses: {} | Accuracy: {:.1}%",
        counters.total,
        counters.hits,
        counters.misses,
        tracker.accuracy()
    );

    if per_pattern {
        let breakdown = tracker.per_pattern_breakdown();
        if breakdown.is_empty() {
            println!("No resolved signals yet");
            return Ok(());
        }
        println!(
            "\n{:<4} {:<26} {:>6} {:>6} {:>6} {:>9}",
            "Id", "Pattern", "Total", "Hits", "Misses", "Accuracy"
        );
        println!("{}", "-".repeat(62));
        for stats in breakdown {
            println!(
                "{:<4} {:<26} {:>6} {:>6} {:>6} {:>8.1}%",
                stats.pattern_id,
                stats.name,
                stats.counters.total,
                stats.counters.hits,
                stats.counters.misses,
                stats.counters.accuracy_pct()
            );
        }
    }
    Ok(())
}

fn show_history(config: &AdvisorConfig, limit: usize) -> Result<()> {
    let tracker = load_tracker(config)?;
    let rounds = tracker.history().last_n(limit);
    if rounds.is_empty() {
        println!("No rounds recorded yet");
        return Ok(());
    }

    println!("\n=== Last {} Rounds ===", rounds.len());
    for round in rounds {
        let sums = match round.sums {
            Some((player, banker)) => format!("{}-{}", player, banker),
            None => "-".to_string(),
        };
        println!(
            "{}  {:<6} {}",
            round.timestamp.format("%Y-%m-%d %H:%M:%S"),
            round.outcome,
            sums
        );
    }
    Ok(())
}

fn export_history(config: &AdvisorConfig, output: Option<&str>) -> Result<()> {
    let tracker = load_tracker(config)?;
    let csv = tracker.export_csv();
    match output {
        Some(path) => {
            std::fs::write(path, &csv)?;
            info!("Exported {} rounds to {}", tracker.history().len(), path);
        }
        None => print!("{}", csv),
    }
    Ok(())
}
