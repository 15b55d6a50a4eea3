// This file is part of crokinole-doubles.
//
// crokinole-doubles is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// crokinole-doubles is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Id, standings::Standing};

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Phase {
    Byes,
    Partners,
    Opponents,
    Anomaly,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Byes => write!(f, "byes"),
            Self::Partners => write!(f, "partners"),
            Self::Opponents => write!(f, "opponents"),
            Self::Anomaly => write!(f, "anomaly"),
        }
    }
}

/// One recorded choice: which phase made it and a plain-language why.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Decision {
    pub phase: Phase,
    pub detail: String,
}

impl Decision {
    #[must_use]
    pub fn new(phase: Phase, detail: String) -> Self {
        Self { phase, detail }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.phase, self.detail)
    }
}

/// A standings row frozen at generation time.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct StandingRow {
    pub rank: usize,
    pub id: Id,
    pub name: String,
    pub score: u32,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub point_differential: i64,
    pub byes: u32,
}

impl StandingRow {
    #[must_use]
    pub fn new(rank: usize, standing: &Standing) -> Self {
        Self {
            rank,
            id: standing.id,
            name: standing.name.clone(),
            score: standing.score,
            wins: standing.wins,
            losses: standing.losses,
            ties: standing.ties,
            point_differential: standing.point_differential(),
            byes: standing.byes,
        }
    }
}

impl fmt::Display for StandingRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>2}. {} {} {}-{}-{} {:+} byes {}",
            self.rank,
            self.name,
            self.score,
            self.wins,
            self.losses,
            self.ties,
            self.point_differential,
            self.byes,
        )
    }
}

/// A finalized pairing and the reasoning that produced it.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PairingNote {
    pub match_id: Id,
    pub summary: String,
    pub reason: String,
}

impl fmt::Display for PairingNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "match {}: {} ({})", self.match_id, self.summary, self.reason)
    }
}

/// The full audit record for one generated round.
///
/// Strictly observational: nothing reads it back into the pairing engine,
/// and replaying the same inputs with the same seed reproduces it exactly.
/// Retracting a round removes its log together with its matches.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct RoundLog {
    pub round: u32,
    pub generated_at: DateTime<Utc>,
    pub player_count: usize,
    pub byes_needed: usize,
    pub standings: Vec<StandingRow>,
    pub decisions: Vec<Decision>,
    pub pairings: Vec<PairingNote>,
}

impl fmt::Display for RoundLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "round {} generated {} with {} players, {} byes needed",
            self.round,
            self.generated_at.format("%Y-%m-%d %H:%M:%S %z"),
            self.player_count,
            self.byes_needed,
        )?;

        writeln!(f, "standings going in:")?;
        for row in &self.standings {
            writeln!(f, "  {row}")?;
        }

        if !self.decisions.is_empty() {
            writeln!(f, "decisions:")?;
            for decision in &self.decisions {
                writeln!(f, "  {decision}")?;
            }
        }

        writeln!(f, "pairings:")?;
        for note in &self.pairings {
            writeln!(f, "  {note}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decisions_render_with_their_phase() {
        let decision = Decision::new(Phase::Byes, "Ada sits out".to_string());

        assert_eq!(decision.to_string(), "[byes] Ada sits out");
    }
}
