//! Error types for tournament operations

use thiserror::Error;

/// Everything that can go wrong while building, playing or loading a tournament.
///
/// All variants are fatal to the operation that raised them: a failed result
/// leaves nothing half-applied that a caller would want to retry.
#[derive(Debug, Error)]
pub enum TournamentError {
    /// Entrant count supplied to a round does not match its declared size
    #[error("round {round} expects {expected} entrants, got {got}")]
    SizeMismatch {
        round: String,
        expected: usize,
        got: usize,
    },

    #[error("round {0} is already paired")]
    AlreadyPaired(String),

    #[error("match is already resolved")]
    AlreadyResolved,

    /// Reported winner is not one of the match's entrants
    #[error("{0} is not playing in this match")]
    InvalidWinner(String),

    #[error("no match between {0} and {1} in the current round")]
    NoSuchMatch(String, String),

    #[error("seed {seed} does not belong to {name}")]
    SeedNameMismatch { seed: u32, name: String },

    #[error("tournament is already complete")]
    TournamentComplete,

    #[error("line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    /// Round descriptor with an odd number of paired slots
    #[error("round {name}: {size} entrants with {byes} byes cannot be paired")]
    InvalidRound {
        name: String,
        size: usize,
        byes: usize,
    },

    #[error("invalid rating parameters: spread {spread}, speed {speed}")]
    InvalidRatingParams { spread: f64, speed: f64 },

    #[error("entrant {0} is already registered")]
    DuplicateEntrant(String),

    #[error("unknown entrant {0}")]
    UnknownEntrant(String),

    #[error("tournament has not been seeded")]
    NotSeeded,

    #[error("tournament is already seeded")]
    AlreadySeeded,

    #[error("rating parameters cannot change once the tournament is seeded")]
    ParamsLocked,

    #[error("tournament has no rounds")]
    NoRounds,

    #[error("round {0} has not been paired")]
    RoundNotPaired(String),

    #[error("round {0} is already finished")]
    RoundFinished(String),

    /// A syntactically valid result that could not be applied during replay
    #[error("line {line}: {source}")]
    Replay {
        line: usize,
        #[source]
        source: Box<TournamentError>,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TournamentError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        TournamentError::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }
}

/// Result type for tournament operations
pub type Result<T> = std::result::Result<T, TournamentError>;
