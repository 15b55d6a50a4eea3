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

use serde::{Deserialize, Serialize};

use crate::Id;

/// The players on one side of the board for a round.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Team {
    Pair(Id, Id),
    Solo(Id),
}

impl Team {
    #[must_use]
    pub fn players(self) -> Vec<Id> {
        match self {
            Self::Pair(a, b) => vec![a, b],
            Self::Solo(a) => vec![a],
        }
    }

    #[must_use]
    pub fn contains(self, id: Id) -> bool {
        match self {
            Self::Pair(a, b) => a == id || b == id,
            Self::Solo(a) => a == id,
        }
    }

    /// Order-independent key for history lookups.
    #[must_use]
    pub fn key(self) -> (Id, Id) {
        match self {
            Self::Pair(a, b) => (a.min(b), a.max(b)),
            Self::Solo(a) => (a, a),
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::Pair(a, b) => write!(f, "{a}+{b}"),
            Team::Solo(a) => write!(f, "{a}"),
        }
    }
}

/// One scheduled game of a round, or a bye when `team2` is absent.
///
/// A completed regular match holds scores summing to the tournament's
/// points-per-match. A bye is completed the moment it is created, with an
/// even score split and a twenties credit equal to the field's average.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Match {
    pub id: Id,
    pub round: u32,
    pub team1: Team,
    pub team2: Option<Team>,
    pub score1: Option<u32>,
    pub score2: Option<u32>,
    pub twenties1: f64,
    pub twenties2: f64,
    pub table: Option<Id>,
    pub completed: bool,
}

impl Match {
    #[must_use]
    pub fn regular(id: Id, round: u32, team1: Team, team2: Team) -> Self {
        Self {
            id,
            round,
            team1,
            team2: Some(team2),
            score1: None,
            score2: None,
            twenties1: 0.0,
            twenties2: 0.0,
            table: None,
            completed: false,
        }
    }

    #[must_use]
    pub fn bye(id: Id, round: u32, player: Id, points_per_match: u32, twenties_credit: f64) -> Self {
        Self {
            id,
            round,
            team1: Team::Solo(player),
            team2: None,
            score1: Some(points_per_match.div_ceil(2)),
            score2: Some(points_per_match / 2),
            twenties1: twenties_credit,
            twenties2: 0.0,
            table: None,
            completed: true,
        }
    }

    #[must_use]
    pub fn is_bye(&self) -> bool {
        self.team2.is_none()
    }

    /// Every player on either side of the board.
    #[must_use]
    pub fn players(&self) -> Vec<Id> {
        let mut players = self.team1.players();
        if let Some(team2) = self.team2 {
            players.extend(team2.players());
        }

        players
    }
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.team2 {
            Some(team2) => write!(f, "round {} match {}: {} vs {}", self.round, self.id, self.team1, team2)?,
            None => write!(f, "round {} match {}: bye for {}", self.round, self.id, self.team1)?,
        }

        if let (Some(score1), Some(score2)) = (self.score1, self.score2) {
            write!(f, " ({score1}-{score2})")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bye_splits_points_evenly() {
        let bye = Match::bye(7, 2, 3, 8, 0.5);

        assert!(bye.is_bye());
        assert!(bye.completed);
        assert_eq!(bye.score1, Some(4));
        assert_eq!(bye.score2, Some(4));
    }

    #[test]
    fn odd_points_give_the_extra_point_to_the_resting_player() {
        let bye = Match::bye(1, 1, 9, 9, 0.0);

        assert_eq!(bye.score1, Some(5));
        assert_eq!(bye.score2, Some(4));
    }

    #[test]
    fn team_key_ignores_seat_order() {
        assert_eq!(Team::Pair(4, 2).key(), Team::Pair(2, 4).key());
    }

    #[test]
    fn regular_match_lists_all_four_players() {
        let game = Match::regular(1, 1, Team::Pair(1, 2), Team::Pair(3, 4));

        assert_eq!(game.players(), vec![1, 2, 3, 4]);
        assert!(!game.is_bye());
        assert!(!game.completed);
    }
}
