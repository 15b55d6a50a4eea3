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

use chrono::{DateTime, Utc};
use rand::Rng;
use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;

use crate::{
    Id, byes,
    matches::{Match, Team},
    matchups::{self, label},
    player::Player,
    round_log::{Decision, PairingNote, Phase, RoundLog, StandingRow},
    standings::{self, Standing},
    table::{AssignTables, Table},
    teams::{self, pair_key},
    tournament::Settings,
};

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum PairingError {
    #[error("pairing: a round needs at least 4 active players, found {0}")]
    TooFewPlayers(usize),
    #[error("pairing: round {round} is past the {total} scheduled rounds")]
    PastFinalRound { round: u32, total: u32 },
    #[error("pairing: round {0} cannot start until round {1} is fully scored")]
    UnfinishedRound(u32, u32),
    #[error("pairing: round {0} already has matches, retract them first")]
    AlreadyGenerated(u32),
}

/// What one call to the engine produces: the round's matches (byes first)
/// and the audit log that explains them.
#[derive(Clone, Debug, PartialEq)]
pub struct RoundPairings {
    pub matches: Vec<Match>,
    pub log: RoundLog,
}

/// Generates the pairings for `round` from the full history.
///
/// Pure and deterministic: nothing is mutated, nothing is read from the
/// environment, and the same inputs with the same `rng` state reproduce
/// the same round byte for byte. The caller merges the result into the
/// tournament and serializes calls per event.
///
/// A history that references players missing from the roster is flagged in
/// the log and excluded from aggregation, never fatal. Constraint
/// relaxations are logged, never errors; the engine always returns a
/// complete round.
///
/// # Errors
///
/// If fewer than four players are active, `round` is past the scheduled
/// count, the previous round still has unscored matches, or `round` was
/// already generated and not retracted.
pub fn generate_round_pairings<R: Rng>(
    players: &[Player],
    existing: &[Match],
    round: u32,
    tables: &[Table],
    settings: &Settings,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Result<RoundPairings, PairingError> {
    if round > settings.total_rounds {
        return Err(PairingError::PastFinalRound {
            round,
            total: settings.total_rounds,
        });
    }

    if existing.iter().any(|game| game.round == round) {
        return Err(PairingError::AlreadyGenerated(round));
    }

    if round >= 2
        && existing
            .iter()
            .any(|game| game.round == round - 1 && !game.is_bye() && !game.completed)
    {
        return Err(PairingError::UnfinishedRound(round, round - 1));
    }

    let active = players.iter().filter(|player| player.active).count();
    if active < 4 {
        return Err(PairingError::TooFewPlayers(active));
    }

    let mut decisions = Vec::new();
    for id in standings::missing_players(players, existing) {
        decisions.push(Decision::new(
            Phase::Anomaly,
            format!("history references unknown player {id}; their results are excluded from the standings"),
        ));
    }

    let ranked = standings::standings(players, existing);
    let byes_needed = active % settings.pool_size.max(1);

    let mut matches = Vec::new();
    let mut notes = Vec::new();
    let mut next_id = existing.iter().map(|game| game.id).max().unwrap_or(0) + 1;

    let bye_choices = byes::select_byes(&ranked, round, byes_needed, rng);
    let twenties_credit = standings::average_twenties(existing);
    for choice in &bye_choices {
        decisions.push(Decision::new(Phase::Byes, choice.reason.clone()));
        notes.push(PairingNote {
            match_id: next_id,
            summary: format!("bye for {}", choice.name),
            reason: choice.reason.clone(),
        });
        matches.push(Match::bye(
            next_id,
            round,
            choice.id,
            settings.points_per_match,
            twenties_credit,
        ));
        next_id += 1;
    }

    let sitting: FxHashSet<Id> = bye_choices.iter().map(|choice| choice.id).collect();
    let field: Vec<Standing> = ranked
        .iter()
        .filter(|standing| !sitting.contains(&standing.id))
        .cloned()
        .collect();

    let team_choices = teams::form_teams(&field, &partner_history(existing), round, rng);
    for choice in &team_choices {
        decisions.push(Decision::new(Phase::Partners, choice.reason.clone()));
    }
    let formed: Vec<Team> = team_choices.iter().map(|choice| choice.team).collect();

    let names: FxHashMap<Id, &str> = field
        .iter()
        .map(|standing| (standing.id, standing.name.as_str()))
        .collect();

    let matchup_choices =
        matchups::form_matchups(&formed, &field, &opponent_history(existing), round, rng);
    for choice in &matchup_choices {
        decisions.push(Decision::new(Phase::Opponents, choice.reason.clone()));
        notes.push(PairingNote {
            match_id: next_id,
            summary: format!(
                "{} vs {}",
                label(choice.team1, &names),
                label(choice.team2, &names),
            ),
            reason: choice.reason.clone(),
        });
        matches.push(Match::regular(next_id, round, choice.team1, choice.team2));
        next_id += 1;
    }

    if settings.assign_tables == AssignTables::Yes && !tables.is_empty() {
        matchups::assign_tables(&mut matches, tables);
    }

    let log = RoundLog {
        round,
        generated_at: now,
        player_count: active,
        byes_needed,
        standings: ranked
            .iter()
            .enumerate()
            .map(|(i, standing)| StandingRow::new(i + 1, standing))
            .collect(),
        decisions,
        pairings: notes,
    };

    Ok(RoundPairings { matches, log })
}

/// Every pair of players who have been on the same team.
fn partner_history(matches: &[Match]) -> FxHashSet<(Id, Id)> {
    let mut pairs = FxHashSet::default();
    for game in matches {
        for team in [Some(game.team1), game.team2].into_iter().flatten() {
            if let Team::Pair(a, b) = team {
                pairs.insert(pair_key(a, b));
            }
        }
    }

    pairs
}

/// Every pair of players who have faced each other across the board.
fn opponent_history(matches: &[Match]) -> FxHashSet<(Id, Id)> {
    let mut met = FxHashSet::default();
    for game in matches {
        if let Some(team2) = game.team2 {
            for p in game.team1.players() {
                for q in team2.players() {
                    met.insert(pair_key(p, q));
                }
            }
        }
    }

    met
}
