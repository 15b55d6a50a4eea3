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

use rand::{Rng, seq::SliceRandom};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::{
    Id,
    matches::{Match, Team},
    standings::Standing,
    table::Table,
    teams::pair_key,
};

/// A finalized matchup and how it came to be.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MatchupChoice {
    pub team1: Team,
    pub team2: Team,
    pub reason: String,
    pub relaxed: bool,
}

/// Combined strength reuses the standings composite key: summed score,
/// then summed point differential, then summed points scored.
fn strength(team: Team, index: &FxHashMap<Id, &Standing>) -> (u32, i64, i64) {
    let mut score = 0;
    let mut differential = 0;
    let mut points_for = 0;

    for id in team.players() {
        if let Some(standing) = index.get(&id) {
            score += standing.score;
            differential += standing.point_differential();
            points_for += i64::from(standing.points_for);
        }
    }

    (score, differential, points_for)
}

fn gap(a: (u32, i64, i64), b: (u32, i64, i64)) -> (u32, i64, i64) {
    (a.0.abs_diff(b.0), (a.1 - b.1).abs(), (a.2 - b.2).abs())
}

fn fresh(a: Team, b: Team, met: &FxHashSet<(Id, Id)>) -> bool {
    a.players()
        .into_iter()
        .all(|p| b.players().into_iter().all(|q| !met.contains(&pair_key(p, q))))
}

pub(crate) fn label(team: Team, names: &FxHashMap<Id, &str>) -> String {
    let named: Vec<&str> = team
        .players()
        .into_iter()
        .map(|id| names.get(&id).copied().unwrap_or("?"))
        .collect();

    named.join(" and ")
}

/// Matches teams against each other for the round.
///
/// Round 1 shuffles the teams and pairs neighbors. Later rounds walk the
/// teams in formation order and give each one the unmatched opponent of
/// closest combined strength whose players it has never faced; when every
/// remaining team is a repeat the rule is relaxed, closest strength still
/// wins, and the repeat is recorded.
pub fn form_matchups<R: Rng>(
    teams: &[Team],
    standings: &[Standing],
    met: &FxHashSet<(Id, Id)>,
    round: u32,
    rng: &mut R,
) -> Vec<MatchupChoice> {
    debug_assert_eq!(teams.len() % 2, 0);

    let index: FxHashMap<Id, &Standing> = standings
        .iter()
        .map(|standing| (standing.id, standing))
        .collect();
    let names: FxHashMap<Id, &str> = standings
        .iter()
        .map(|standing| (standing.id, standing.name.as_str()))
        .collect();

    if round <= 1 {
        let mut pool: Vec<Team> = teams.to_vec();
        pool.shuffle(rng);

        return pool
            .chunks_exact(2)
            .map(|game| MatchupChoice {
                team1: game[0],
                team2: game[1],
                reason: format!(
                    "{} meet {} by random draw for the opening round",
                    label(game[0], &names),
                    label(game[1], &names),
                ),
                relaxed: false,
            })
            .collect();
    }

    let strengths: Vec<(u32, i64, i64)> = teams
        .iter()
        .map(|team| strength(*team, &index))
        .collect();

    let mut remaining: Vec<usize> = (0..teams.len()).collect();
    let mut choices = Vec::with_capacity(teams.len() / 2);

    while remaining.len() >= 2 {
        let a = remaining.remove(0);

        let eligible: Vec<usize> = remaining
            .iter()
            .copied()
            .filter(|&b| fresh(teams[a], teams[b], met))
            .collect();

        let relaxed = eligible.is_empty();
        let pool = if relaxed { remaining.clone() } else { eligible };

        // First team wins ties, keeping the walk deterministic.
        let mut best = pool[0];
        for &b in &pool[1..] {
            if gap(strengths[a], strengths[b]) < gap(strengths[a], strengths[best]) {
                best = b;
            }
        }

        remaining.retain(|&b| b != best);

        let reason = if relaxed {
            format!(
                "every free team already faced {}; repeat matchup with {} allowed, closest in strength",
                label(teams[a], &names),
                label(teams[best], &names),
            )
        } else {
            format!(
                "{} meet {}; closest combined strength among teams with no prior meetings",
                label(teams[a], &names),
                label(teams[best], &names),
            )
        };

        choices.push(MatchupChoice {
            team1: teams[a],
            team2: teams[best],
            reason,
            relaxed,
        });
    }

    choices
}

/// Hands out tables in display order, matches in round order. Byes never
/// occupy a table, and matches beyond the table count wait for an open
/// board.
pub fn assign_tables(matches: &mut [Match], tables: &[Table]) {
    let mut ordered: Vec<&Table> = tables.iter().collect();
    ordered.sort_by_key(|table| (table.order, table.id));

    let mut boards = ordered.iter();
    for game in matches.iter_mut().filter(|game| !game.is_bye()) {
        game.table = boards.next().map(|table| table.id);
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn standing(id: Id, score: u32, points_for: u32) -> Standing {
        Standing {
            id,
            name: format!("P{id}"),
            score,
            wins: 0,
            losses: 0,
            ties: 0,
            points_for,
            points_against: 0,
            byes: 0,
        }
    }

    #[test]
    fn closest_strength_wins_when_everyone_is_fresh() {
        // Teams in formation order: strengths 12, 4, 10, 2.
        let standings = vec![
            standing(1, 6, 0),
            standing(2, 6, 0),
            standing(3, 2, 0),
            standing(4, 2, 0),
            standing(5, 5, 0),
            standing(6, 5, 0),
            standing(7, 1, 0),
            standing(8, 1, 0),
        ];
        let teams = vec![
            Team::Pair(1, 2),
            Team::Pair(3, 4),
            Team::Pair(5, 6),
            Team::Pair(7, 8),
        ];
        let mut rng = StdRng::seed_from_u64(0);

        let choices = form_matchups(&teams, &standings, &FxHashSet::default(), 2, &mut rng);

        assert_eq!(choices[0].team1, Team::Pair(1, 2));
        assert_eq!(choices[0].team2, Team::Pair(5, 6));
        assert_eq!(choices[1].team1, Team::Pair(3, 4));
        assert_eq!(choices[1].team2, Team::Pair(7, 8));
        assert!(!choices[0].relaxed);
    }

    #[test]
    fn prior_meetings_push_a_team_further_down() {
        let standings: Vec<Standing> = (1..=8).map(|id| standing(id, 2, 0)).collect();
        let teams = vec![
            Team::Pair(1, 2),
            Team::Pair(3, 4),
            Team::Pair(5, 6),
            Team::Pair(7, 8),
        ];
        // Player 1 already faced player 3, so the first fresh opponent for
        // team one is team three.
        let mut met = FxHashSet::default();
        met.insert(pair_key(1, 3));
        let mut rng = StdRng::seed_from_u64(0);

        let choices = form_matchups(&teams, &standings, &met, 2, &mut rng);

        assert_eq!(choices[0].team2, Team::Pair(5, 6));
        assert!(choices[0].reason.contains("no prior meetings"));
    }

    #[test]
    fn exhausted_opponents_relax_with_a_note() {
        let standings: Vec<Standing> = (1..=4).map(|id| standing(id, 2, 0)).collect();
        let teams = vec![Team::Pair(1, 2), Team::Pair(3, 4)];
        let mut met = FxHashSet::default();
        met.insert(pair_key(1, 3));
        let mut rng = StdRng::seed_from_u64(0);

        let choices = form_matchups(&teams, &standings, &met, 2, &mut rng);

        assert_eq!(choices.len(), 1);
        assert!(choices[0].relaxed);
        assert!(choices[0].reason.contains("repeat matchup"));
    }

    #[test]
    fn tables_go_out_in_display_order() {
        let mut matches = vec![
            Match::bye(1, 1, 9, 8, 0.0),
            Match::regular(2, 1, Team::Pair(1, 2), Team::Pair(3, 4)),
            Match::regular(3, 1, Team::Pair(5, 6), Team::Pair(7, 8)),
        ];
        let tables = vec![
            Table {
                id: 11,
                name: "Window".to_string(),
                order: 2,
            },
            Table {
                id: 12,
                name: "Door".to_string(),
                order: 1,
            },
        ];

        assign_tables(&mut matches, &tables);

        assert_eq!(matches[0].table, None);
        assert_eq!(matches[1].table, Some(12));
        assert_eq!(matches[2].table, Some(11));
    }
}
