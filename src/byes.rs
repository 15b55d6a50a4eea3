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

use crate::{Id, standings::Standing};

/// A player chosen to sit out, with the rule that picked them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ByeChoice {
    pub id: Id,
    pub name: String,
    pub reason: String,
}

/// Picks `byes_needed` players to sit the round out.
///
/// Round 1 draws uniformly at random. Later rounds take the players with
/// the fewest byes, weakest first, so nobody sits out twice while anyone
/// has yet to sit out. Randomness only returns when several players are
/// tied on both byes and standing at the cut, and the recorded reason says
/// which rule fired.
///
/// `standings` must hold the active players in rank order.
pub fn select_byes<R: Rng>(
    standings: &[Standing],
    round: u32,
    byes_needed: usize,
    rng: &mut R,
) -> Vec<ByeChoice> {
    if byes_needed == 0 {
        return Vec::new();
    }

    if round <= 1 {
        let mut pool: Vec<&Standing> = standings.iter().collect();
        pool.shuffle(rng);
        pool.truncate(byes_needed);

        return pool
            .into_iter()
            .map(|standing| ByeChoice {
                id: standing.id,
                name: standing.name.clone(),
                reason: format!(
                    "{} drawn at random; the opening round has no history to weigh",
                    standing.name,
                ),
            })
            .collect();
    }

    // Weakest first, then stable-sorted so fewer byes always comes first.
    let mut candidates: Vec<(usize, &Standing)> = standings
        .iter()
        .enumerate()
        .map(|(i, standing)| (i + 1, standing))
        .rev()
        .collect();
    candidates.sort_by_key(|(_, standing)| standing.byes);

    let key = |standing: &Standing| {
        (
            standing.byes,
            standing.score,
            standing.point_differential(),
            standing.points_for,
        )
    };

    let mut chosen = Vec::with_capacity(byes_needed);
    let mut start = 0;
    while chosen.len() < byes_needed && start < candidates.len() {
        let mut end = start + 1;
        while end < candidates.len() && key(candidates[end].1) == key(candidates[start].1) {
            end += 1;
        }

        let group = &candidates[start..end];
        let remaining = byes_needed - chosen.len();

        if group.len() <= remaining {
            for (rank, standing) in group {
                chosen.push(ByeChoice {
                    id: standing.id,
                    name: standing.name.clone(),
                    reason: format!(
                        "{} sits out with {} byes at rank {rank}; players must share byes before repeats",
                        standing.name, standing.byes,
                    ),
                });
            }
        } else {
            let mut picks: Vec<&(usize, &Standing)> = group.iter().collect();
            picks.shuffle(rng);
            picks.truncate(remaining);

            for (rank, standing) in picks {
                chosen.push(ByeChoice {
                    id: standing.id,
                    name: standing.name.clone(),
                    reason: format!(
                        "{} drawn at random among {} players tied on byes and standing at rank {rank}",
                        standing.name,
                        group.len(),
                    ),
                });
            }
        }

        start = end;
    }

    chosen
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn standing(id: Id, name: &str, score: u32, byes: u32) -> Standing {
        Standing {
            id,
            name: name.to_string(),
            score,
            wins: score / 2,
            losses: 0,
            ties: score % 2,
            points_for: 0,
            points_against: 0,
            byes,
        }
    }

    #[test]
    fn opening_round_draws_the_right_count() {
        let field: Vec<Standing> = (1..=9)
            .map(|id| standing(id, &format!("P{id}"), 0, 0))
            .collect();
        let mut rng = StdRng::seed_from_u64(11);

        let chosen = select_byes(&field, 1, 1, &mut rng);

        assert_eq!(chosen.len(), 1);
        assert!(chosen[0].reason.contains("drawn at random"));
    }

    #[test]
    fn zero_byes_goes_first_regardless_of_rank() {
        // Z leads the standings but is the only player without a bye yet.
        let mut field = vec![standing(26, "Z", 6, 0)];
        for id in 1..=8 {
            field.push(standing(id, &format!("P{id}"), 4, 1));
        }
        let mut rng = StdRng::seed_from_u64(3);

        let chosen = select_byes(&field, 2, 1, &mut rng);

        assert_eq!(chosen[0].id, 26);
        assert!(chosen[0].reason.contains("players must share byes before repeats"));
    }

    #[test]
    fn weakest_of_the_bye_eligible_sits_out() {
        let field = vec![
            standing(1, "Ada", 6, 0),
            standing(2, "Bo", 4, 0),
            standing(3, "Cy", 2, 0),
        ];
        let mut rng = StdRng::seed_from_u64(5);

        let chosen = select_byes(&field, 3, 1, &mut rng);

        assert_eq!(chosen[0].id, 3);
    }

    #[test]
    fn ties_at_the_cut_fall_back_to_a_logged_draw() {
        let field = vec![
            standing(1, "Ada", 6, 0),
            standing(2, "Bo", 2, 0),
            standing(3, "Cy", 2, 0),
            standing(4, "Di", 2, 0),
        ];
        let mut rng = StdRng::seed_from_u64(5);

        let chosen = select_byes(&field, 2, 1, &mut rng);

        assert!([2, 3, 4].contains(&chosen[0].id));
        assert!(chosen[0].reason.contains("drawn at random among 3 players"));
    }

    #[test]
    fn nobody_rests_twice_while_anyone_has_zero() {
        let field = vec![
            standing(1, "Ada", 0, 1),
            standing(2, "Bo", 2, 0),
            standing(3, "Cy", 4, 0),
            standing(4, "Di", 6, 1),
            standing(5, "Eb", 8, 0),
        ];
        let mut rng = StdRng::seed_from_u64(9);

        let chosen = select_byes(&field, 4, 3, &mut rng);
        let ids: Vec<Id> = chosen.iter().map(|choice| choice.id).collect();

        assert!(ids.contains(&2) && ids.contains(&3) && ids.contains(&5));
    }
}
