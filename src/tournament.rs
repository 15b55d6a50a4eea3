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

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use log::info;
use rand::Rng;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::{
    Id,
    matches::Match,
    pairing::{RoundPairings, generate_round_pairings},
    player::Player,
    round_log::RoundLog,
    standings::{self, ByeCredit, Standing, bye_credit},
    status::Status,
    table::{AssignTables, Table},
};

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Settings {
    pub points_per_match: u32,
    pub total_rounds: u32,
    /// Players per board; byes are whatever does not divide evenly.
    pub pool_size: usize,
    pub assign_tables: AssignTables,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            points_per_match: 8,
            total_rounds: 5,
            pool_size: 4,
            assign_tables: AssignTables::Yes,
        }
    }
}

/// The whole event: roster, tables, every match, every round log.
///
/// The aggregate is the only thing the lobby mutates. The pairing engine
/// itself never touches it; `generate_next_round` reads a snapshot, calls
/// the engine, and merges the result back in. Callers serialize those
/// read-generate-merge sequences per tournament.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Tournament {
    pub name: String,
    pub players: Vec<Player>,
    pub tables: Vec<Table>,
    pub matches: Vec<Match>,
    pub logs: Vec<RoundLog>,
    pub current_round: u32,
    pub status: Status,
    pub settings: Settings,
}

impl Tournament {
    #[must_use]
    pub fn new(name: &str, settings: Settings) -> Self {
        Self {
            name: name.to_string(),
            players: Vec::new(),
            tables: Vec::new(),
            matches: Vec::new(),
            logs: Vec::new(),
            current_round: 0,
            status: Status::Setup,
            settings,
        }
    }

    /// Registers a player; mid-event additions join the next round.
    pub fn add_player(&mut self, name: &str) -> Id {
        let id = self
            .players
            .iter()
            .map(|player| player.id)
            .max()
            .unwrap_or(0)
            + 1;

        info!("{}: registered player {name} as {id}", self.name);
        self.players.push(Player::new(id, name));
        id
    }

    /// Players with match history are deactivated, never deleted; their
    /// record stays on the books and they stop being paired.
    ///
    /// # Errors
    ///
    /// If no player has that id.
    pub fn set_player_active(&mut self, id: Id, active: bool) -> anyhow::Result<()> {
        let Some(player) = self.players.iter_mut().find(|player| player.id == id) else {
            return Err(anyhow::Error::msg(format!("no player with id {id}")));
        };

        info!(
            "{}: player {} is now {}",
            self.name,
            player.name,
            if active { "active" } else { "inactive" },
        );
        player.active = active;
        Ok(())
    }

    pub fn add_table(&mut self, name: &str) -> Id {
        let id = self.tables.iter().map(|table| table.id).max().unwrap_or(0) + 1;
        let order = u32::try_from(self.tables.len()).map_or(u32::MAX, |count| count + 1);

        self.tables.push(Table {
            id,
            name: name.to_string(),
            order,
        });
        id
    }

    #[must_use]
    pub fn active_players(&self) -> usize {
        self.players.iter().filter(|player| player.active).count()
    }

    /// The live ranking, for display between rounds.
    #[must_use]
    pub fn standings(&self) -> Vec<Standing> {
        standings::standings(&self.players, &self.matches)
    }

    /// Runs the pairing engine against the current state and merges the
    /// new round in. Returns the round's log.
    ///
    /// # Errors
    ///
    /// If the engine's preconditions fail, see
    /// [`crate::pairing::PairingError`].
    pub fn generate_next_round<R: Rng>(
        &mut self,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> anyhow::Result<&RoundLog> {
        let round = self.current_round + 1;
        let RoundPairings { matches, log } = generate_round_pairings(
            &self.players,
            &self.matches,
            round,
            &self.tables,
            &self.settings,
            now,
            rng,
        )?;

        info!(
            "{}: round {round} generated, {} matches, {} byes",
            self.name,
            matches.len(),
            log.byes_needed,
        );

        self.matches.extend(matches);
        self.logs.push(log);
        self.current_round = round;
        if self.status == Status::Setup {
            self.status = Status::Active;
        }
        self.rebuild_records();

        match self.logs.last() {
            Some(log) => Ok(log),
            None => Err(anyhow::Error::msg("round log missing after generation")),
        }
    }

    /// Enters a final score for a regular match.
    ///
    /// # Errors
    ///
    /// If the match is unknown, already scored, a bye, or the scores do not
    /// sum to the configured points per match.
    pub fn record_score(
        &mut self,
        match_id: Id,
        score1: u32,
        score2: u32,
        twenties1: f64,
        twenties2: f64,
    ) -> anyhow::Result<()> {
        let points = self.settings.points_per_match;
        let name = self.name.clone();

        let Some(game) = self.matches.iter_mut().find(|game| game.id == match_id) else {
            return Err(anyhow::Error::msg(format!("no match with id {match_id}")));
        };

        if game.is_bye() {
            return Err(anyhow::Error::msg(format!(
                "match {match_id} is a bye, nothing to score"
            )));
        }

        if game.completed {
            return Err(anyhow::Error::msg(format!(
                "match {match_id} is already scored"
            )));
        }

        if score1 + score2 != points {
            return Err(anyhow::Error::msg(format!(
                "scores {score1}-{score2} must sum to {points}"
            )));
        }

        game.score1 = Some(score1);
        game.score2 = Some(score2);
        game.twenties1 = twenties1;
        game.twenties2 = twenties2;
        game.completed = true;
        info!("{name}: match {match_id} scored {score1}-{score2}");

        self.rebuild_records();

        if self.current_round == self.settings.total_rounds && self.round_complete(self.current_round)
        {
            info!("{name}: final round scored, tournament completed");
            self.status = Status::Completed;
        }

        Ok(())
    }

    #[must_use]
    pub fn round_complete(&self, round: u32) -> bool {
        self.matches
            .iter()
            .filter(|game| game.round == round)
            .all(|game| game.completed)
    }

    /// Withdraws the latest round wholesale, matches and log together, so
    /// it can be regenerated after a correction. Records roll back with it.
    ///
    /// # Errors
    ///
    /// If `round` is not the latest generated round.
    pub fn retract_round(&mut self, round: u32) -> anyhow::Result<()> {
        if round == 0 || round != self.current_round {
            return Err(anyhow::Error::msg(format!(
                "only the latest round can be retracted, and {round} is not it"
            )));
        }

        self.matches.retain(|game| game.round != round);
        self.logs.retain(|log| log.round != round);
        self.current_round = round - 1;
        self.status = if self.current_round == 0 {
            Status::Setup
        } else {
            Status::Active
        };
        self.rebuild_records();

        info!("{}: round {round} retracted", self.name);
        Ok(())
    }

    /// Recomputes every player's record from the match history. Byes are
    /// credited under the current interpretation, so an early "free win"
    /// bye degrades to a tie here once byes become common.
    pub fn rebuild_records(&mut self) {
        let index: FxHashMap<Id, usize> = self
            .players
            .iter()
            .enumerate()
            .map(|(i, player)| (player.id, i))
            .collect();

        for player in &mut self.players {
            player.clear_record();
        }

        let credit = bye_credit(self.matches.iter().filter(|game| game.is_bye()).count());

        for game in &self.matches {
            if !game.completed {
                continue;
            }
            let (Some(score1), Some(score2)) = (game.score1, game.score2) else {
                continue;
            };

            if let Some(team2) = game.team2 {
                for id in game.team1.players() {
                    if let Some(&i) = index.get(&id) {
                        credit_match(&mut self.players[i], score1, score2, game.twenties1 / 2.0);
                    }
                }
                for id in team2.players() {
                    if let Some(&i) = index.get(&id) {
                        credit_match(&mut self.players[i], score2, score1, game.twenties2 / 2.0);
                    }
                }
            } else {
                for id in game.team1.players() {
                    if let Some(&i) = index.get(&id) {
                        let player = &mut self.players[i];
                        player.byes += 1;
                        player.points_for += score1;
                        player.points_against += score2;
                        player.twenties += game.twenties1;
                        match credit {
                            ByeCredit::Win => player.wins += 1,
                            ByeCredit::Tie => player.ties += 1,
                        }
                    }
                }
            }
        }
    }
}

fn credit_match(player: &mut Player, points_for: u32, points_against: u32, twenties: f64) {
    player.points_for += points_for;
    player.points_against += points_against;
    player.twenties += twenties;

    match points_for.cmp(&points_against) {
        Ordering::Greater => player.wins += 1,
        Ordering::Equal => player.ties += 1,
        Ordering::Less => player.losses += 1,
    }
}
