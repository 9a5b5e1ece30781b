//! Pending match persisted between runs
//!
//! The pending match lives in a side file next to the record, holding a
//! single token such as `  3 Kind of Blue vs.   6 Blue Train`.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::bracket::Tournament;
use crate::entrant::EntrantId;
use crate::error::{Result, TournamentError};
use crate::matchup::Match;
use crate::record::SeedName;

/// Entrants referenced by a next-match token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingMatch {
    pub a: EntrantId,
    /// `None` for a bye
    pub b: Option<EntrantId>,
}

impl PendingMatch {
    /// The side holding `seed`, with its opponent
    pub fn by_seed(&self, tournament: &Tournament, seed: u32) -> Option<(EntrantId, EntrantId)> {
        let b = self.b?;
        if tournament.entrant(self.a).seed() == Some(seed) {
            Some((self.a, b))
        } else if tournament.entrant(b).seed() == Some(seed) {
            Some((b, self.a))
        } else {
            None
        }
    }
}

/// Render `m` as a next-match token
pub fn encode(tournament: &Tournament, m: &Match) -> String {
    match m.entrants() {
        (a, Some(b)) => format!("{} vs. {}", tournament.entrant(a), tournament.entrant(b)),
        (a, None) => format!("{} (bye)", tournament.entrant(a)),
    }
}

/// Resolve a next-match token against the tournament
pub fn decode(tournament: &Tournament, token: &str) -> Result<PendingMatch> {
    let token = token.trim();
    if let Some((a, b)) = token.split_once(" vs. ") {
        return Ok(PendingMatch {
            a: SeedName::parse(a, 1)?.resolve(tournament)?,
            b: Some(SeedName::parse(b, 1)?.resolve(tournament)?),
        });
    }
    if let Some(a) = token.strip_suffix("(bye)") {
        return Ok(PendingMatch {
            a: SeedName::parse(a, 1)?.resolve(tournament)?,
            b: None,
        });
    }
    Err(TournamentError::malformed(
        1,
        format!("bad next-match token {token:?}"),
    ))
}

/// Side file holding the pending match of one record
#[derive(Debug, Clone)]
pub struct NextMatchFile {
    path: PathBuf,
}

impl NextMatchFile {
    /// `cup.txt` keeps its pending match in `cup-nextmatch.txt`
    pub fn for_record(record: &Path) -> Self {
        let stem = record
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = match record.extension() {
            Some(ext) => format!("{stem}-nextmatch.{}", ext.to_string_lossy()),
            None => format!("{stem}-nextmatch"),
        };
        Self {
            path: record.with_file_name(name),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored pending match, or `None` when there is no side file
    pub fn load(&self, tournament: &Tournament) -> Result<Option<PendingMatch>> {
        let token = match fs::read_to_string(&self.path) {
            Ok(token) => token,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let first = token.lines().next().unwrap_or_default();
        decode(tournament, first).map(Some)
    }

    /// Write `token`, or remove the side file when there is nothing pending
    pub fn store(&self, token: Option<&str>) -> Result<()> {
        match token {
            Some(token) => {
                // Write beside the target, then rename over it
                let tmp = self.path.with_extension("tmp");
                fs::write(&tmp, format!("{token}\n"))?;
                fs::rename(&tmp, &self.path)?;
                debug!(path = %self.path.display(), token, "next match stored");
            }
            None => match fs::remove_file(&self.path) {
                Ok(()) => debug!(path = %self.path.display(), "next match cleared"),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            },
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "next_match_tests.rs"]
mod next_match_tests;
