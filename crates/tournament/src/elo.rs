//! Elo-style rating calculation
//!
//! Ratings live on a base-2 scale: a lead of `spread` points doubles the
//! odds of winning. `speed` is the k-factor and caps how far a single match
//! can move a rating.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TournamentError};

/// Default rating points that double the odds of winning
pub const DEFAULT_SPREAD: f64 = 1.0;

/// Default k-factor (higher = more volatile)
pub const DEFAULT_SPEED: f64 = 0.2;

/// Parameters of the rating model, fixed for the life of a tournament
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingParams {
    pub spread: f64,
    pub speed: f64,
}

impl Default for RatingParams {
    fn default() -> Self {
        Self {
            spread: DEFAULT_SPREAD,
            speed: DEFAULT_SPEED,
        }
    }
}

impl RatingParams {
    /// Both values must be finite and positive.
    pub fn new(spread: f64, speed: f64) -> Result<Self> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(spread) || !valid(speed) {
            return Err(TournamentError::InvalidRatingParams { spread, speed });
        }
        Ok(Self { spread, speed })
    }

    fn strength(&self, rating: f64) -> f64 {
        2.0_f64.powf(rating / self.spread)
    }
}

/// Expected score of a player rated `rating` against one rated `opponent`
pub fn expected_score(rating: f64, opponent: f64, params: &RatingParams) -> f64 {
    let q = params.strength(rating);
    let q_opp = params.strength(opponent);
    q / (q + q_opp)
}

/// New `(winner, loser)` ratings after the winner beat the loser
pub fn update(winner_rating: f64, loser_rating: f64, params: &RatingParams) -> (f64, f64) {
    let expected_winner = expected_score(winner_rating, loser_rating, params);
    let expected_loser = expected_score(loser_rating, winner_rating, params);

    (
        winner_rating + params.speed * (1.0 - expected_winner),
        loser_rating + params.speed * (0.0 - expected_loser),
    )
}

#[cfg(test)]
#[path = "elo_tests.rs"]
mod elo_tests;
