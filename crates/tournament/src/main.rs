//! Knockout CLI
//!
//! Replays a tournament record, records the result of the pending match,
//! and picks the next one.

use anyhow::{Context, Result};
use knockout::{
    append_result, format_result, generate_report, generate_standings, load_tournament,
    next_match, render_match, NextMatchFile, Settings, Tournament, TournamentSummary,
};
use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn print_usage() {
    println!("Knockout Tournament Manager");
    println!();
    println!("Usage:");
    println!("  knockout <tournament-file> [--winner SEED] [--config FILE] [--no-color] [--json]");
    println!();
    println!("Options:");
    println!("  --winner, -w SEED   Seed of the pending match's winner (prompted if omitted)");
    println!("  --config, -c FILE   Settings file (default: knockout.toml if present)");
    println!("  --no-color          Plain output");
    println!("  --json              Print standings as JSON instead of the bracket");
    println!();
    println!("The pending match is kept in <tournament>-nextmatch beside the record.");
}

struct Args {
    record: PathBuf,
    winner: Option<u32>,
    config: Option<PathBuf>,
    no_color: bool,
    json: bool,
}

/// `None` when usage was requested
fn parse_args(args: &[String]) -> Result<Option<Args>> {
    let mut record = None;
    let mut winner = None;
    let mut config = None;
    let mut no_color = false;
    let mut json = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" | "help" => return Ok(None),
            "--winner" | "-w" => {
                let value = args.get(i + 1).context("--winner needs a seed")?;
                winner = Some(
                    value
                        .parse()
                        .with_context(|| format!("Bad seed: {}", value))?,
                );
                i += 1;
            }
            "--config" | "-c" => {
                let value = args.get(i + 1).context("--config needs a file")?;
                config = Some(PathBuf::from(value));
                i += 1;
            }
            "--no-color" => no_color = true,
            "--json" => json = true,
            other if record.is_none() && !other.starts_with('-') => {
                record = Some(PathBuf::from(other));
            }
            other => anyhow::bail!("Unknown argument: {}", other),
        }
        i += 1;
    }

    let record = record.context("Missing tournament file")?;
    if !record.is_file() {
        anyhow::bail!("Bad tournament file: {}", record.display());
    }
    Ok(Some(Args {
        record,
        winner,
        config,
        no_color,
        json,
    }))
}

fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // Stdout carries the report, logs go to stderr
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn prompt_winner() -> Result<Option<u32>> {
    print!("Winner? ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().parse().ok())
}

/// What happened to the pending match on this run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Settlement {
    /// No side file, or it held a bye
    NoPending,
    /// The side file named a match that is no longer open
    Stale,
    /// A pending match was shown but no valid winner was given
    Unrecorded,
    Recorded,
}

impl Settlement {
    /// True when a new match should be picked
    fn needs_new_match(self) -> bool {
        self != Settlement::Unrecorded
    }

    /// Message for a `--winner` that could not be applied
    fn ignored_winner_notice(self, winner: Option<u32>) -> Option<&'static str> {
        match (self, winner) {
            (Settlement::NoPending | Settlement::Stale, Some(_)) => {
                Some("No pending match; --winner ignored")
            }
            _ => None,
        }
    }
}

/// Apply the pending match's result if one is given
fn settle_pending(
    tournament: &mut Tournament,
    side_file: &NextMatchFile,
    args: &Args,
    color: bool,
) -> Result<Settlement> {
    let Some(pending) = side_file.load(tournament)? else {
        return Ok(Settlement::NoPending);
    };
    let Some(opponent) = pending.b else {
        return Ok(Settlement::NoPending);
    };
    let open = tournament
        .current()
        .and_then(|round| round.find_match(pending.a, opponent))
        .filter(|m| !m.is_resolved());
    let Some(m) = open else {
        warn!(path = %side_file.path().display(), "stale pending match, picking a new one");
        return Ok(Settlement::Stale);
    };
    println!("Current matchup: {}", render_match(tournament, m, color));

    let seed = match args.winner {
        Some(seed) => Some(seed),
        None => prompt_winner()?,
    };
    let Some((winner, loser)) = seed.and_then(|s| pending.by_seed(&*tournament, s)) else {
        println!("No result recorded.");
        return Ok(Settlement::Unrecorded);
    };

    tournament.add_result(winner, loser)?;
    let recorded: &Tournament = tournament;
    let line = recorded
        .rounds()
        .iter()
        .find_map(|round| round.find_match(winner, loser))
        .and_then(|m| format_result(recorded, m))
        .context("Recorded match went missing")?;
    append_result(&args.record, &line)
        .with_context(|| format!("Failed to write {}", args.record.display()))?;
    info!(result = %line.trim(), "result recorded");
    Ok(Settlement::Recorded)
}

fn run(args: Args) -> Result<()> {
    let settings = Settings::discover(args.config.as_deref()).map_err(anyhow::Error::msg)?;
    init_logging(&settings.log_level);
    let color = settings.color && !args.no_color;

    let mut tournament = load_tournament(&args.record, settings.rating)
        .with_context(|| format!("Failed to load {}", args.record.display()))?;
    let side_file = NextMatchFile::for_record(&args.record);

    let settlement = settle_pending(&mut tournament, &side_file, &args, color)?;
    if let Some(notice) = settlement.ignored_winner_notice(args.winner) {
        eprintln!("{}", notice);
    }

    let summary = TournamentSummary::new(&tournament);
    if args.json {
        println!("{}", summary.to_json().map_err(anyhow::Error::msg)?);
    } else {
        print!("{}", generate_report(&tournament, color));
        if tournament.is_complete() {
            println!();
            print!("{}", generate_standings(&summary));
        }
    }

    if settlement.needs_new_match() {
        let next = tournament.pick_pending_match(&mut rand::thread_rng());
        let token = next.map(|m| next_match::encode(&tournament, m));
        side_file
            .store(token.as_deref())
            .with_context(|| format!("Failed to write {}", side_file.path().display()))?;
        if let Some(m) = next.filter(|_| !args.json) {
            println!("Next matchup: {}", render_match(&tournament, m, color));
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();

    let args = match parse_args(&args) {
        Ok(Some(args)) => args,
        Ok(None) => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_winner_without_pending_match_is_reported() {
        for settlement in [Settlement::NoPending, Settlement::Stale] {
            assert_eq!(
                settlement.ignored_winner_notice(Some(3)),
                Some("No pending match; --winner ignored")
            );
            assert_eq!(settlement.ignored_winner_notice(None), None);
            assert!(settlement.needs_new_match());
        }
    }

    #[test]
    fn test_settled_runs_need_no_notice() {
        assert_eq!(Settlement::Recorded.ignored_winner_notice(Some(1)), None);
        assert_eq!(Settlement::Unrecorded.ignored_winner_notice(Some(9)), None);
        assert!(Settlement::Recorded.needs_new_match());
        assert!(!Settlement::Unrecorded.needs_new_match());
    }
}
