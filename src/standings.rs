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

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::{Id, matches::Match, player::Player};

/// How a bye counts toward the standings.
///
/// The stored bye match always carries an even score split; only the
/// interpretation switches. A lone early bye is a free win, but once two or
/// more byes exist tournament-wide every bye counts as a tie instead,
/// retroactively.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ByeCredit {
    Win,
    Tie,
}

impl fmt::Display for ByeCredit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Win => write!(f, "win"),
            Self::Tie => write!(f, "tie"),
        }
    }
}

#[must_use]
pub fn bye_credit(total_byes: usize) -> ByeCredit {
    if total_byes <= 1 {
        ByeCredit::Win
    } else {
        ByeCredit::Tie
    }
}

/// One row of the ranking, derived entirely from the match history.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Standing {
    pub id: Id,
    pub name: String,
    /// Win = 2, tie = 1, loss = 0, summed over completed matches.
    pub score: u32,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub points_for: u32,
    pub points_against: u32,
    pub byes: u32,
}

impl Standing {
    #[must_use]
    pub fn point_differential(&self) -> i64 {
        i64::from(self.points_for) - i64::from(self.points_against)
    }
}

impl fmt::Display for Standing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}-{}-{} {:+}",
            self.name,
            self.score,
            self.wins,
            self.losses,
            self.ties,
            self.point_differential(),
        )
    }
}

/// Ranks the active players by score, then point differential, then points
/// scored. Players tied on all three keys stay in roster order, so the
/// ordering is deterministic for a deterministic roster.
///
/// Matches referencing players missing from `players` contribute nothing;
/// the orchestrator reports those separately.
#[must_use]
pub fn standings(players: &[Player], matches: &[Match]) -> Vec<Standing> {
    let mut rows: Vec<Standing> = players
        .iter()
        .filter(|player| player.active)
        .map(|player| Standing {
            id: player.id,
            name: player.name.clone(),
            score: 0,
            wins: 0,
            losses: 0,
            ties: 0,
            points_for: 0,
            points_against: 0,
            byes: 0,
        })
        .collect();

    let index: FxHashMap<Id, usize> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| (row.id, i))
        .collect();

    let credit = bye_credit(matches.iter().filter(|game| game.is_bye()).count());

    for game in matches.iter().filter(|game| game.completed) {
        let (Some(score1), Some(score2)) = (game.score1, game.score2) else {
            continue;
        };

        if let Some(team2) = game.team2 {
            for id in game.team1.players() {
                if let Some(&i) = index.get(&id) {
                    tally(&mut rows[i], score1, score2);
                }
            }
            for id in team2.players() {
                if let Some(&i) = index.get(&id) {
                    tally(&mut rows[i], score2, score1);
                }
            }
        } else {
            for id in game.team1.players() {
                if let Some(&i) = index.get(&id) {
                    let row = &mut rows[i];
                    row.byes += 1;
                    row.points_for += score1;
                    row.points_against += score2;
                    match credit {
                        ByeCredit::Win => {
                            row.score += 2;
                            row.wins += 1;
                        }
                        ByeCredit::Tie => {
                            row.score += 1;
                            row.ties += 1;
                        }
                    }
                }
            }
        }
    }

    rows.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| b.point_differential().cmp(&a.point_differential()))
            .then_with(|| b.points_for.cmp(&a.points_for))
    });

    rows
}

fn tally(row: &mut Standing, points_for: u32, points_against: u32) {
    row.points_for += points_for;
    row.points_against += points_against;

    match points_for.cmp(&points_against) {
        std::cmp::Ordering::Greater => {
            row.score += 2;
            row.wins += 1;
        }
        std::cmp::Ordering::Equal => {
            row.score += 1;
            row.ties += 1;
        }
        std::cmp::Ordering::Less => row.losses += 1,
    }
}

/// The field-wide average of twenties per player per completed regular
/// match, used to credit byes without skewing the bonus statistic either
/// way. Zero when no regular match has finished.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn average_twenties(matches: &[Match]) -> f64 {
    let finished: Vec<&Match> = matches
        .iter()
        .filter(|game| game.completed && !game.is_bye())
        .collect();

    if finished.is_empty() {
        return 0.0;
    }

    let total: f64 = finished
        .iter()
        .map(|game| game.twenties1 + game.twenties2)
        .sum();

    total / (finished.len() as f64 * 4.0)
}

/// Identities referenced by the history but absent from the roster.
#[must_use]
pub fn missing_players(players: &[Player], matches: &[Match]) -> Vec<Id> {
    let known: FxHashSet<Id> = players.iter().map(|player| player.id).collect();

    let mut missing = Vec::new();
    for game in matches {
        for id in game.players() {
            if !known.contains(&id) && !missing.contains(&id) {
                missing.push(id);
            }
        }
    }

    missing
}
