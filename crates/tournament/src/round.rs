//! One elimination stage of the tournament

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entrant::{Entrant, EntrantId};
use crate::error::{Result, TournamentError};
use crate::matchup::Match;

/// Round descriptor as declared before play starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSpec {
    pub name: String,
    /// Number of entrants in the round
    pub size: usize,
    /// Number of entrants that advance without playing
    pub byes: usize,
}

impl RoundSpec {
    /// Entrants this round sends on: its byes plus one winner per match
    pub fn advancing(&self) -> usize {
        self.byes + self.size.saturating_sub(self.byes) / 2
    }
}

/// A fixed-size set of matches built from the previous round's winners
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    name: String,
    size: usize,
    byes: usize,
    matches: Vec<Match>,
    paired: bool,
}

impl Round {
    /// Fails if the entrants left after byes cannot be split into pairs.
    pub fn new(name: impl Into<String>, size: usize, byes: usize) -> Result<Self> {
        let name = name.into();
        if byes > size || (size - byes) % 2 != 0 {
            return Err(TournamentError::InvalidRound { name, size, byes });
        }
        Ok(Self {
            name,
            size,
            byes,
            matches: Vec::with_capacity(byes + (size - byes) / 2),
            paired: false,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn byes(&self) -> usize {
        self.byes
    }

    /// Entrants this round sends on to the next one
    pub fn advancing(&self) -> usize {
        self.byes + (self.size - self.byes) / 2
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn is_paired(&self) -> bool {
        self.paired
    }

    /// Fill the round with `entrants`.
    ///
    /// Entrants are sorted by seed when the round has byes, unless
    /// `sort_by_seed` says otherwise. The first `byes` entrants get a bye and
    /// the rest are folded: best remaining plays worst remaining, inward.
    pub fn pair(
        &mut self,
        mut entrants: Vec<EntrantId>,
        sort_by_seed: Option<bool>,
        arena: &[Entrant],
    ) -> Result<()> {
        if self.paired {
            return Err(TournamentError::AlreadyPaired(self.name.clone()));
        }
        if entrants.len() != self.size {
            return Err(TournamentError::SizeMismatch {
                round: self.name.clone(),
                expected: self.size,
                got: entrants.len(),
            });
        }

        if sort_by_seed.unwrap_or(self.byes > 0) {
            // Stable, so unseeded entrants keep their relative order at the back
            entrants.sort_by_key(|id| {
                arena
                    .get(id.index())
                    .and_then(Entrant::seed)
                    .unwrap_or(u32::MAX)
            });
        }

        self.matches.clear();
        self.matches
            .extend(entrants[..self.byes].iter().map(|&id| Match::bye(id)));

        let playing = self.size - self.byes;
        for i in 0..playing / 2 {
            let high = entrants[self.byes + i];
            let low = entrants[self.size - i - 1];
            self.matches.push(Match::new(high, Some(low)));
        }

        self.paired = true;
        debug!(
            round = %self.name,
            matches = self.matches.len(),
            byes = self.byes,
            "round paired"
        );
        Ok(())
    }

    /// True once paired and every match, byes included, has a winner
    pub fn is_finished(&self) -> bool {
        self.paired && self.matches.iter().all(Match::is_resolved)
    }

    /// Pick one unresolved match uniformly at random
    pub fn pick_pending_match<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&Match> {
        if !self.paired {
            return Err(TournamentError::RoundNotPaired(self.name.clone()));
        }
        let pending: Vec<&Match> = self.matches.iter().filter(|m| !m.is_resolved()).collect();
        pending
            .choose(rng)
            .copied()
            .ok_or_else(|| TournamentError::RoundFinished(self.name.clone()))
    }

    /// The match between `x` and `y`, if there is one in this round
    pub fn find_match(&self, x: EntrantId, y: EntrantId) -> Option<&Match> {
        self.matches.iter().find(|m| m.is_match_between(x, y))
    }

    pub(crate) fn find_match_mut(&mut self, x: EntrantId, y: EntrantId) -> Option<&mut Match> {
        self.matches.iter_mut().find(|m| m.is_match_between(x, y))
    }

    /// Winners in match order, byes included
    pub fn winners(&self) -> Vec<EntrantId> {
        self.matches.iter().filter_map(Match::winner).collect()
    }
}

#[cfg(test)]
#[path = "round_tests.rs"]
mod round_tests;
