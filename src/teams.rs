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
use rustc_hash::FxHashSet;

use crate::{Id, matches::Team, standings::Standing};

#[must_use]
pub(crate) fn pair_key(a: Id, b: Id) -> (Id, Id) {
    (a.min(b), a.max(b))
}

/// A formed team and how it came to be.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TeamChoice {
    pub team: Team,
    pub reason: String,
    pub relaxed: bool,
}

/// Pairs the field into two-player teams.
///
/// Round 1 shuffles the field and pairs neighbors. Later rounds walk the
/// standings and give each player the nearest-ranked partner they have not
/// teamed with before; when nobody unpartnered is left the rule is relaxed
/// and the repeat is recorded, never refused.
///
/// `field` must hold the non-bye players in rank order, and its length must
/// be even.
pub fn form_teams<R: Rng>(
    field: &[Standing],
    partner_history: &FxHashSet<(Id, Id)>,
    round: u32,
    rng: &mut R,
) -> Vec<TeamChoice> {
    debug_assert_eq!(field.len() % 2, 0);

    if round <= 1 {
        let mut pool: Vec<&Standing> = field.iter().collect();
        pool.shuffle(rng);

        return pool
            .chunks_exact(2)
            .map(|pair| TeamChoice {
                team: Team::Pair(pair[0].id, pair[1].id),
                reason: format!(
                    "{} and {} drawn together at random for the opening round",
                    pair[0].name, pair[1].name,
                ),
                relaxed: false,
            })
            .collect();
    }

    let mut remaining: Vec<(usize, &Standing)> = field
        .iter()
        .enumerate()
        .map(|(i, standing)| (i + 1, standing))
        .collect();

    let mut choices = Vec::with_capacity(field.len() / 2);
    while remaining.len() >= 2 {
        let (anchor_rank, anchor) = remaining.remove(0);

        let fresh = remaining
            .iter()
            .position(|(_, candidate)| !partner_history.contains(&pair_key(anchor.id, candidate.id)));

        let (choice, relaxed) = match fresh {
            Some(i) => (remaining.remove(i), false),
            None => (remaining.remove(0), true),
        };
        let (partner_rank, partner) = choice;

        let reason = if relaxed {
            format!(
                "no unpartnered player left for {}; repeat partnership with {} allowed",
                anchor.name, partner.name,
            )
        } else {
            format!(
                "{} teams with {}; nearest in the standings ({} ranks apart) not yet partnered",
                anchor.name,
                partner.name,
                partner_rank - anchor_rank,
            )
        };

        choices.push(TeamChoice {
            team: Team::Pair(anchor.id, partner.id),
            reason,
            relaxed,
        });
    }

    choices
}
