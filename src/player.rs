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

fn active() -> bool {
    true
}

/// A registered player and their cumulative record.
///
/// Records are rebuilt from the match history whenever it changes, so a
/// retracted round or a retroactive bye reinterpretation never leaves a
/// stale count behind. Players referenced by matches are deactivated, never
/// deleted.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Player {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub ties: u32,
    #[serde(default)]
    pub points_for: u32,
    #[serde(default)]
    pub points_against: u32,
    #[serde(default)]
    pub twenties: f64,
    #[serde(default)]
    pub byes: u32,
    #[serde(default = "active")]
    pub active: bool,
}

impl Player {
    #[must_use]
    pub fn new(id: Id, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            wins: 0,
            losses: 0,
            ties: 0,
            points_for: 0,
            points_against: 0,
            twenties: 0.0,
            byes: 0,
            active: true,
        }
    }

    #[must_use]
    pub fn point_differential(&self) -> i64 {
        i64::from(self.points_for) - i64::from(self.points_against)
    }

    /// Zeroes everything except identity and the active flag.
    pub fn clear_record(&mut self) {
        self.wins = 0;
        self.losses = 0;
        self.ties = 0;
        self.points_for = 0;
        self.points_against = 0;
        self.twenties = 0.0;
        self.byes = 0;
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}-{}-{} {:+} {:.1} byes {}",
            self.name,
            self.wins,
            self.losses,
            self.ties,
            self.point_differential(),
            self.twenties,
            self.byes,
        )?;

        if !self.active {
            write!(f, " inactive")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn differential_can_go_negative() {
        let mut player = Player::new(1, "Maja");
        player.points_for = 6;
        player.points_against = 18;

        assert_eq!(player.point_differential(), -12);
    }

    #[test]
    fn display_marks_inactive_players() {
        let mut player = Player::new(2, "Otis");
        player.wins = 3;
        player.points_for = 20;
        player.points_against = 12;
        player.active = false;

        assert_eq!(player.to_string(), "Otis 3-0-0 +8 0.0 byes 0 inactive");
    }
}
