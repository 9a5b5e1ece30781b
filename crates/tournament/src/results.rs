//! Tournament standings and reporting

use serde::{Deserialize, Serialize};

use crate::bracket::Tournament;
use crate::entrant::EntrantId;
use crate::matchup::Match;

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// One entrant's line in the standings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub seed: u32,
    pub name: String,
    pub original_rating: f64,
    pub rating: f64,
    pub drift: f64,
    /// Round the entrant lost in, `None` while still alive
    pub eliminated_in: Option<String>,
}

/// Snapshot of a tournament for reporting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentSummary {
    pub name: String,
    pub complete: bool,
    /// Round currently open for results
    pub current_round: Option<String>,
    pub champion: Option<String>,
    /// By seed
    pub standings: Vec<Standing>,
}

impl TournamentSummary {
    pub fn new(tournament: &Tournament) -> Self {
        let eliminated_in = |id: EntrantId| {
            tournament
                .rounds()
                .iter()
                .find(|r| r.matches().iter().any(|m| m.loser() == Some(id)))
                .map(|r| r.name().to_string())
        };

        let standings = tournament
            .seeded_entrants()
            .iter()
            .map(|&id| {
                let entrant = tournament.entrant(id);
                Standing {
                    seed: entrant.seed().unwrap_or_default(),
                    name: entrant.name.clone(),
                    original_rating: entrant.original_rating(),
                    rating: entrant.rating(),
                    drift: entrant.rating_drift(),
                    eliminated_in: eliminated_in(id),
                }
            })
            .collect();

        Self {
            name: tournament.name().to_string(),
            complete: tournament.is_complete(),
            current_round: tournament.current().map(|r| r.name().to_string()),
            champion: tournament
                .champion()
                .map(|id| tournament.entrant(id).name.clone()),
            standings,
        }
    }

    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string_pretty(self).map_err(|e| format!("Failed to serialize: {}", e))
    }
}

fn paint(text: String, code: &str, color: bool) -> String {
    if color {
        format!("{code}{text}{RESET}")
    } else {
        text
    }
}

/// One side of a match, green if it won and red if it lost
fn render_side(tournament: &Tournament, m: &Match, id: EntrantId, color: bool) -> String {
    let text = tournament.entrant(id).to_string();
    if m.is_bye() {
        return text;
    }
    if m.winner() == Some(id) {
        paint(text, GREEN, color)
    } else if m.loser() == Some(id) {
        paint(text, RED, color)
    } else {
        text
    }
}

/// `SEED NAME vs. SEED NAME`, or `SEED NAME (bye)`
pub fn render_match(tournament: &Tournament, m: &Match, color: bool) -> String {
    match m.entrants() {
        (a, Some(b)) => format!(
            "{} vs. {}",
            render_side(tournament, m, a, color),
            render_side(tournament, m, b, color)
        ),
        (a, None) => format!("{} (bye)", render_side(tournament, m, a, color)),
    }
}

/// Generate a text report of every round
pub fn generate_report(tournament: &Tournament, color: bool) -> String {
    let mut report = String::new();
    report.push_str(tournament.name());
    report.push('\n');

    for round in tournament.rounds() {
        report.push_str(&format!("Round: {}\n", round.name()));
        if !round.is_paired() {
            report.push_str("       Not yet paired\n");
            continue;
        }
        for m in round.matches() {
            report.push_str(&render_match(tournament, m, color));
            report.push('\n');
        }
    }

    if let Some(champion) = tournament.champion() {
        report.push_str(&format!(
            "Tournament Champion: {}\n",
            tournament.entrant(champion)
        ));
    }
    report
}

/// Generate the standings table with rating drift
pub fn generate_standings(summary: &TournamentSummary) -> String {
    let mut report = String::new();
    report.push_str(&format!(
        "{:>4} {:<30} {:>10} {:>10} {:>8}  {}\n",
        "Seed", "Entrant", "Start", "Rating", "Drift", "Out in"
    ));
    report.push_str(&"-".repeat(76));
    report.push('\n');
    for s in &summary.standings {
        report.push_str(&format!(
            "{:>4} {:<30} {:>10.3} {:>10.3} {:>+8.3}  {}\n",
            s.seed,
            s.name,
            s.original_rating,
            s.rating,
            s.drift,
            s.eliminated_in.as_deref().unwrap_or("-")
        ));
    }
    report
}

#[cfg(test)]
#[path = "results_tests.rs"]
mod results_tests;
