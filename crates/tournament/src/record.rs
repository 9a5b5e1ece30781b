//! Tournament record files
//!
//! A record is a line-oriented text file holding the whole history of a
//! tournament. Blank lines and `#` comments are ignored.
//!
//! ```text
//! :tournament 4 Autumn Cup
//! :round semis 4 0
//! :round final 2 0
//! :rating 1.0 0.2
//! Abbey Road 3.1
//! Blue Train 2.7
//! Kind of Blue 2.9
//! Pet Sounds 2.2
//! :round semis
//!   1 Abbey Road beat   4 Pet Sounds
//! ```
//!
//! The current state is rebuilt by replaying every result in file order.

use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use tracing::debug;

use crate::bracket::Tournament;
use crate::elo::RatingParams;
use crate::entrant::EntrantId;
use crate::error::{Result, TournamentError};
use crate::matchup::Match;
use crate::round::RoundSpec;

/// Reference to an entrant by seed and name, as written in records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedName {
    pub seed: u32,
    pub name: String,
}

impl SeedName {
    /// Parse `SEED NAME`, tolerating padding around the seed.
    pub(crate) fn parse(text: &str, line: usize) -> Result<Self> {
        let text = text.trim();
        let (seed, name) = text
            .split_once(char::is_whitespace)
            .ok_or_else(|| TournamentError::malformed(line, format!("expected SEED NAME, got {text:?}")))?;
        let seed = seed
            .parse()
            .map_err(|_| TournamentError::malformed(line, format!("bad seed {seed:?}")))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(TournamentError::malformed(line, "missing entrant name"));
        }
        Ok(Self {
            seed,
            name: name.to_string(),
        })
    }

    pub(crate) fn resolve(&self, tournament: &Tournament) -> Result<EntrantId> {
        tournament.lookup_entrant(&self.name, self.seed)
    }
}

/// One line of the results section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordEntry {
    /// `:round NAME`, marks where a round's results begin
    RoundMarker { line: usize, name: String },
    /// `SEED NAME beat SEED NAME`
    Result {
        line: usize,
        winner: SeedName,
        loser: SeedName,
    },
}

/// Parsed contents of a record file, before replay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentRecord {
    pub name: String,
    pub rounds: Vec<RoundSpec>,
    /// Entrant names and starting ratings, in file order
    pub entrants: Vec<(String, f64)>,
    /// Rating parameters from a `:rating` directive
    pub params: Option<RatingParams>,
    pub results: Vec<RecordEntry>,
}

/// Split a line into its directive keyword and the rest, if it is one
fn directive(text: &str) -> Option<(&str, &str)> {
    let body = text.strip_prefix(':')?;
    Some(match body.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest.trim()),
        None => (body, ""),
    })
}

fn parse_number<T: std::str::FromStr>(text: &str, what: &str, line: usize) -> Result<T> {
    text.parse()
        .map_err(|_| TournamentError::malformed(line, format!("bad {what} {text:?}")))
}

impl TournamentRecord {
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim_end()))
            .filter(|(_, l)| !l.trim().is_empty() && !l.starts_with('#'))
            .peekable();

        // :tournament <count> <name>
        let (line, first) = lines
            .next()
            .ok_or_else(|| TournamentError::malformed(0, "empty record"))?;
        let (count, name) = match directive(first) {
            Some(("tournament", rest)) => rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| TournamentError::malformed(line, "expected :tournament COUNT NAME"))?,
            _ => return Err(TournamentError::malformed(line, "record must start with :tournament")),
        };
        let count: usize = parse_number(count, "entrant count", line)?;

        let mut record = TournamentRecord {
            name: name.trim().to_string(),
            rounds: Vec::new(),
            entrants: Vec::with_capacity(count),
            params: None,
            results: Vec::new(),
        };

        // Header directives
        while let Some(&(line, text)) = lines.peek() {
            let Some((keyword, rest)) = directive(text) else {
                break;
            };
            let fields: Vec<&str> = rest.split_whitespace().collect();
            match (keyword, fields.as_slice()) {
                ("round", [name, size, byes]) => {
                    let spec = RoundSpec {
                        name: name.to_string(),
                        size: parse_number(size, "round size", line)?,
                        byes: parse_number(byes, "bye count", line)?,
                    };
                    if let Some(prev) = record.rounds.last() {
                        if spec.size != prev.advancing() {
                            return Err(TournamentError::malformed(
                                line,
                                format!(
                                    "round {} takes {} entrants but {} sends on {}",
                                    spec.name,
                                    spec.size,
                                    prev.name,
                                    prev.advancing()
                                ),
                            ));
                        }
                    }
                    record.rounds.push(spec);
                }
                ("rating", [spread, speed]) => {
                    let params = RatingParams::new(
                        parse_number(spread, "spread", line)?,
                        parse_number(speed, "speed", line)?,
                    )
                    .map_err(|e| TournamentError::malformed(line, e.to_string()))?;
                    record.params = Some(params);
                }
                // A bare `:round NAME` already belongs to the results section
                ("round", [_]) => break,
                _ => {
                    return Err(TournamentError::malformed(
                        line,
                        format!("unexpected header directive {text:?}"),
                    ))
                }
            }
            lines.next();
        }

        // <name> <rating>
        for _ in 0..count {
            let (line, text) = lines
                .next()
                .ok_or_else(|| TournamentError::malformed(0, format!("expected {count} entrants")))?;
            if directive(text).is_some() {
                return Err(TournamentError::malformed(line, "expected an entrant definition"));
            }
            let (name, rating) = text
                .rsplit_once(char::is_whitespace)
                .ok_or_else(|| TournamentError::malformed(line, "expected NAME RATING"))?;
            let name = name.trim();
            if name.is_empty() {
                return Err(TournamentError::malformed(line, "missing entrant name"));
            }
            record
                .entrants
                .push((name.to_string(), parse_number(rating, "rating", line)?));
        }

        // Results
        for (line, text) in lines {
            if let Some((keyword, rest)) = directive(text) {
                if keyword != "round" || rest.is_empty() || rest.contains(char::is_whitespace) {
                    return Err(TournamentError::malformed(
                        line,
                        format!("unexpected directive in results {text:?}"),
                    ));
                }
                record.results.push(RecordEntry::RoundMarker {
                    line,
                    name: rest.to_string(),
                });
                continue;
            }
            let (winner, loser) = text
                .split_once(" beat ")
                .ok_or_else(|| TournamentError::malformed(line, "expected WINNER beat LOSER"))?;
            record.results.push(RecordEntry::Result {
                line,
                winner: SeedName::parse(winner, line)?,
                loser: SeedName::parse(loser, line)?,
            });
        }

        Ok(record)
    }

    /// Rebuild the tournament with default rating parameters
    pub fn replay(&self) -> Result<Tournament> {
        self.replay_with(RatingParams::default())
    }

    /// Rebuild the tournament: register rounds and entrants, seed, then apply
    /// every result in order. `fallback` is used when the record has no
    /// `:rating` directive.
    pub fn replay_with(&self, fallback: RatingParams) -> Result<Tournament> {
        let mut tournament =
            Tournament::with_params(self.name.clone(), self.params.unwrap_or(fallback));
        for spec in &self.rounds {
            tournament.add_round(spec.name.clone(), spec.size, spec.byes)?;
        }
        for (name, rating) in &self.entrants {
            tournament.add_entrant(name.clone(), *rating)?;
        }
        tournament.seed()?;

        for entry in &self.results {
            match entry {
                RecordEntry::RoundMarker { line, name } => {
                    let current = tournament.current().map(|r| r.name());
                    if current != Some(name.as_str()) {
                        return Err(TournamentError::malformed(
                            *line,
                            format!("results for round {name} out of order"),
                        ));
                    }
                }
                RecordEntry::Result {
                    line,
                    winner,
                    loser,
                } => {
                    apply_result(&mut tournament, winner, loser).map_err(|source| {
                        TournamentError::Replay {
                            line: *line,
                            source: Box::new(source),
                        }
                    })?;
                }
            }
        }

        debug!(
            tournament = %tournament.name(),
            results = self.results.len(),
            "record replayed"
        );
        Ok(tournament)
    }
}

fn apply_result(tournament: &mut Tournament, winner: &SeedName, loser: &SeedName) -> Result<()> {
    let winner = winner.resolve(tournament)?;
    let loser = loser.resolve(tournament)?;
    tournament.add_result(winner, loser)
}

/// Read and replay the record at `path`
pub fn load_tournament(path: &Path, fallback: RatingParams) -> Result<Tournament> {
    let text = fs::read_to_string(path)?;
    TournamentRecord::parse(&text)?.replay_with(fallback)
}

/// `WINNER beat LOSER` for a resolved, non-bye match
pub fn format_result(tournament: &Tournament, m: &Match) -> Option<String> {
    let winner = m.winner()?;
    let loser = m.loser()?;
    Some(format!(
        "{} beat {}",
        tournament.entrant(winner),
        tournament.entrant(loser)
    ))
}

/// Append one result line to the record at `path`
pub fn append_result(path: &Path, line: &str) -> Result<()> {
    let needs_newline = fs::read(path)?.last().is_some_and(|&b| b != b'\n');
    let mut text = String::with_capacity(line.len() + 2);
    if needs_newline {
        text.push('\n');
    }
    text.push_str(line);
    text.push('\n');

    let mut file = OpenOptions::new().append(true).open(path)?;
    file.write_all(text.as_bytes())?;
    Ok(())
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod record_tests;
