//! A single pairing inside a round

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::elo::{self, RatingParams};
use crate::entrant::{Entrant, EntrantId};
use crate::error::{Result, TournamentError};

/// One match between two entrants, or a bye for a single entrant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    a: EntrantId,
    b: Option<EntrantId>,
    winner: Option<EntrantId>,
    loser: Option<EntrantId>,
}

impl Match {
    /// `a` vs. `b`. If `b` is `None`, `a` has a bye and is already the winner.
    pub fn new(a: EntrantId, b: Option<EntrantId>) -> Self {
        Self {
            a,
            b,
            winner: if b.is_none() { Some(a) } else { None },
            loser: None,
        }
    }

    pub fn bye(a: EntrantId) -> Self {
        Self::new(a, None)
    }

    pub fn entrants(&self) -> (EntrantId, Option<EntrantId>) {
        (self.a, self.b)
    }

    pub fn winner(&self) -> Option<EntrantId> {
        self.winner
    }

    pub fn loser(&self) -> Option<EntrantId> {
        self.loser
    }

    pub fn is_bye(&self) -> bool {
        self.b.is_none()
    }

    pub fn is_resolved(&self) -> bool {
        self.winner.is_some()
    }

    /// True if this is a match between `x` and `y`, in either order
    pub fn is_match_between(&self, x: EntrantId, y: EntrantId) -> bool {
        match self.b {
            Some(b) => (self.a == x && b == y) || (self.a == y && b == x),
            None => false,
        }
    }

    /// Record `winner` as the winner and apply the rating update to both sides.
    ///
    /// `entrants` is the tournament's entrant list that the ids index into.
    /// An id outside it fails with `UnknownEntrant` and changes nothing.
    pub fn set_winner(
        &mut self,
        winner: EntrantId,
        entrants: &mut [Entrant],
        params: &RatingParams,
    ) -> Result<()> {
        let loser = if winner == self.a {
            self.b
        } else if Some(winner) == self.b {
            Some(self.a)
        } else {
            let name = entrants
                .get(winner.index())
                .map(|e| e.name.clone())
                .unwrap_or_else(|| format!("entrant #{}", winner.index()));
            return Err(TournamentError::InvalidWinner(name));
        };

        if self.winner.is_some() {
            return Err(TournamentError::AlreadyResolved);
        }

        // A bye is resolved at creation, so a loser always exists here
        let Some(loser) = loser else {
            return Err(TournamentError::AlreadyResolved);
        };

        let (w, l) = (winner.index(), loser.index());
        if let Some(missing) = [w, l].into_iter().find(|&i| i >= entrants.len()) {
            return Err(TournamentError::UnknownEntrant(format!("#{missing}")));
        }

        let (new_winner, new_loser) =
            elo::update(entrants[w].rating, entrants[l].rating, params);
        debug!(
            winner = %entrants[w].name,
            loser = %entrants[l].name,
            new_winner,
            new_loser,
            "match resolved"
        );
        entrants[w].rating = new_winner;
        entrants[l].rating = new_loser;

        self.winner = Some(winner);
        self.loser = Some(loser);
        Ok(())
    }
}

#[cfg(test)]
#[path = "matchup_tests.rs"]
mod matchup_tests;
