//! Tournament entrants

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable handle to an entrant inside a [`Tournament`](crate::Tournament).
///
/// Handles are indices into the tournament's entrant list and stay valid for
/// the tournament's whole life; seeding never reorders that list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntrantId(pub(crate) usize);

impl EntrantId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A competitor in the tournament
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entrant {
    pub name: String,
    /// Live rating, moved by every resolved match
    pub(crate) rating: f64,
    /// Rating at registration
    pub(crate) original_rating: f64,
    /// Rank by rating, assigned at seeding (1 = best)
    pub(crate) seed: Option<u32>,
}

impl Entrant {
    pub fn new(name: impl Into<String>, rating: f64) -> Self {
        Self {
            name: name.into(),
            rating,
            original_rating: rating,
            seed: None,
        }
    }

    pub fn rating(&self) -> f64 {
        self.rating
    }

    pub fn original_rating(&self) -> f64 {
        self.original_rating
    }

    pub fn seed(&self) -> Option<u32> {
        self.seed
    }

    /// How far the rating has moved since registration
    pub fn rating_drift(&self) -> f64 {
        self.rating - self.original_rating
    }
}

/// Renders as `SEED NAME` with the seed right-aligned to three columns.
impl fmt::Display for Entrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.seed {
            Some(seed) => write!(f, "{:>3} {}", seed, self.name),
            None => write!(f, "  - {}", self.name),
        }
    }
}
