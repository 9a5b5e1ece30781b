//! Knockout tournament manager
//!
//! This crate provides:
//! - Single-elimination brackets with byes and fold seeding
//! - Elo-style rating updates on every result
//! - Line-oriented tournament records that are replayed to rebuild state
//! - A pending-match side file for playing one match per run
//!
//! # Usage
//!
//! ```bash
//! # Show the bracket and pick the next match
//! cargo run -p knockout -- playoff.txt
//!
//! # Record that seed 3 won the pending match
//! cargo run -p knockout -- playoff.txt --winner 3
//! ```

mod bracket;
mod config;
pub mod elo;
mod entrant;
mod error;
mod matchup;
pub mod next_match;
mod record;
mod results;
mod round;

pub use bracket::*;
pub use config::*;
pub use elo::RatingParams;
pub use entrant::*;
pub use error::{Result, TournamentError};
pub use matchup::*;
pub use next_match::{NextMatchFile, PendingMatch};
pub use record::*;
pub use results::*;
pub use round::*;
