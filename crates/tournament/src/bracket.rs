//! Tournament state machine
//!
//! A [`Tournament`] moves through three phases:
//! - registration: entrants and round descriptors are added in any order
//! - play: after [`Tournament::seed`], results are recorded against the
//!   current round, and each finished round pairs the next one from its winners
//! - complete: the last round has finished and nothing more can be recorded

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::elo::RatingParams;
use crate::entrant::{Entrant, EntrantId};
use crate::error::{Result, TournamentError};
use crate::matchup::Match;
use crate::round::Round;

/// A single-elimination tournament with byes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tournament {
    name: String,
    entrants: Vec<Entrant>,
    /// Entrant ids by seed; `seed_order[0]` is seed 1
    seed_order: Vec<EntrantId>,
    rounds: Vec<Round>,
    current_round: usize,
    seeded: bool,
    complete: bool,
    params: RatingParams,
}

impl Tournament {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_params(name, RatingParams::default())
    }

    pub fn with_params(name: impl Into<String>, params: RatingParams) -> Self {
        Self {
            name: name.into(),
            entrants: Vec::new(),
            seed_order: Vec::new(),
            rounds: Vec::new(),
            current_round: 0,
            seeded: false,
            complete: false,
            params,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &RatingParams {
        &self.params
    }

    /// Replace the rating parameters. Only allowed before seeding.
    pub fn set_rating_params(&mut self, params: RatingParams) -> Result<()> {
        if self.seeded {
            return Err(TournamentError::ParamsLocked);
        }
        self.params = params;
        Ok(())
    }

    /// Register a new entrant. Names must be unique.
    pub fn add_entrant(&mut self, name: impl Into<String>, rating: f64) -> Result<EntrantId> {
        if self.seeded {
            return Err(TournamentError::AlreadySeeded);
        }
        let name = name.into();
        if self.find_entrant(&name).is_some() {
            return Err(TournamentError::DuplicateEntrant(name));
        }
        self.entrants.push(Entrant::new(name, rating));
        Ok(EntrantId(self.entrants.len() - 1))
    }

    /// Declare the next round, given its size and number of byes.
    pub fn add_round(&mut self, name: impl Into<String>, size: usize, byes: usize) -> Result<()> {
        if self.seeded {
            return Err(TournamentError::AlreadySeeded);
        }
        self.rounds.push(Round::new(name, size, byes)?);
        Ok(())
    }

    /// Rank entrants by rating and pair the first round.
    ///
    /// Call once every entrant and round has been added. Ties in rating keep
    /// registration order.
    pub fn seed(&mut self) -> Result<()> {
        if self.seeded {
            return Err(TournamentError::AlreadySeeded);
        }
        if self.rounds.is_empty() {
            return Err(TournamentError::NoRounds);
        }

        // Each round must take exactly the entrants the previous one sends on
        for pair in self.rounds.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if next.size() != prev.advancing() {
                return Err(TournamentError::SizeMismatch {
                    round: next.name().to_string(),
                    expected: next.size(),
                    got: prev.advancing(),
                });
            }
        }

        let mut order: Vec<EntrantId> = (0..self.entrants.len()).map(EntrantId).collect();
        order.sort_by(|a, b| {
            self.entrants[b.0]
                .rating
                .partial_cmp(&self.entrants[a.0].rating)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        // `order` is already seed order, and nothing is seeded until pairing succeeds
        self.rounds[0].pair(order.clone(), Some(false), &self.entrants)?;
        for (rank, id) in order.iter().enumerate() {
            self.entrants[id.0].seed = Some(rank as u32 + 1);
        }
        self.seed_order = order;
        self.current_round = 0;
        self.seeded = true;
        info!(
            tournament = %self.name,
            entrants = self.entrants.len(),
            rounds = self.rounds.len(),
            "tournament seeded"
        );
        Ok(())
    }

    /// Record that `winner` beat `loser` in the current round.
    ///
    /// Finishing the round pairs the next one from its winners, or completes
    /// the tournament after the last round.
    pub fn add_result(&mut self, winner: EntrantId, loser: EntrantId) -> Result<()> {
        if !self.seeded {
            return Err(TournamentError::NotSeeded);
        }
        if self.complete {
            return Err(TournamentError::TournamentComplete);
        }

        let round = &mut self.rounds[self.current_round];
        let Some(m) = round.find_match_mut(winner, loser) else {
            return Err(TournamentError::NoSuchMatch(
                self.display_name(winner),
                self.display_name(loser),
            ));
        };
        m.set_winner(winner, &mut self.entrants, &self.params)?;

        if round.is_finished() {
            self.advance()?;
        }
        Ok(())
    }

    fn advance(&mut self) -> Result<()> {
        let finished = &self.rounds[self.current_round];
        let winners = finished.winners();
        info!(round = %finished.name(), "round finished");

        self.current_round += 1;
        match self.rounds.get_mut(self.current_round) {
            Some(next) => {
                next.pair(winners, None, &self.entrants)?;
                info!(round = %next.name(), "round started");
            }
            None => {
                self.complete = true;
                if let Some(champion) = self.champion() {
                    info!(champion = %self.entrants[champion.0].name, "tournament complete");
                }
            }
        }
        Ok(())
    }

    /// Pick the next match to play, or `None` once the tournament is over
    pub fn pick_pending_match<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Match> {
        self.current()?.pick_pending_match(rng).ok()
    }

    /// The entrant holding `seed`, checked against `name`
    pub fn lookup_entrant(&self, name: &str, seed: u32) -> Result<EntrantId> {
        let mismatch = || TournamentError::SeedNameMismatch {
            seed,
            name: name.to_string(),
        };
        let index = (seed as usize).checked_sub(1).ok_or_else(mismatch)?;
        let id = *self.seed_order.get(index).ok_or_else(mismatch)?;
        let entrant = &self.entrants[id.0];
        if entrant.name != name || entrant.seed != Some(seed) {
            return Err(mismatch());
        }
        Ok(id)
    }

    pub fn find_entrant(&self, name: &str) -> Option<EntrantId> {
        self.entrants
            .iter()
            .position(|e| e.name == name)
            .map(EntrantId)
    }

    /// # Panics
    ///
    /// If `id` was not issued by this tournament.
    pub fn entrant(&self, id: EntrantId) -> &Entrant {
        &self.entrants[id.0]
    }

    /// Entrants in registration order
    pub fn entrants(&self) -> &[Entrant] {
        &self.entrants
    }

    /// Entrant ids in seed order, empty before seeding
    pub fn seeded_entrants(&self) -> &[EntrantId] {
        &self.seed_order
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    /// The round currently open for results
    pub fn current(&self) -> Option<&Round> {
        if !self.seeded || self.complete {
            return None;
        }
        self.rounds.get(self.current_round)
    }

    pub fn current_round(&self) -> Option<usize> {
        self.current().map(|_| self.current_round)
    }

    pub fn is_seeded(&self) -> bool {
        self.seeded
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Sole winner of the last round, once the tournament is complete
    pub fn champion(&self) -> Option<EntrantId> {
        if !self.complete {
            return None;
        }
        match self.rounds.last()?.winners().as_slice() {
            [champion] => Some(*champion),
            _ => None,
        }
    }

    fn display_name(&self, id: EntrantId) -> String {
        self.entrants
            .get(id.0)
            .map(|e| e.name.clone())
            .unwrap_or_else(|| format!("entrant #{}", id.0))
    }
}

#[cfg(test)]
#[path = "bracket_tests.rs"]
mod bracket_tests;
