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

use std::{fs, io::Write, path::PathBuf};

use chrono::Utc;
use clap::{self, CommandFactory, Parser};
use log::info;
use rand::{Rng, SeedableRng, rngs::StdRng};

use crokinole_doubles::{
    COPYRIGHT, Id,
    tournament::{Settings, Tournament},
    utils::init_logger,
};

/// A Crokinole Doubles Round Simulator
///
/// Runs a whole doubles event through the same pairing engine the live
/// lobby uses, filling in random scores, and prints the standings and the
/// decision log after every round. Pass the same seed to replay an event
/// exactly, for example to audit a disputed pairing.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// How many players take part
    #[arg(long, default_value_t = 12)]
    players: u32,

    /// How many rounds to play
    #[arg(long, default_value_t = 5)]
    rounds: u32,

    /// Points per match
    #[arg(long, default_value_t = 8)]
    points: u32,

    /// How many tables the hall has, 0 leaves seating open
    #[arg(long, default_value_t = 0)]
    tables: u32,

    /// Seed for the random number generator, for replaying an event
    #[arg(long)]
    seed: Option<u64>,

    /// Write the finished tournament to this RON file
    #[arg(long)]
    save: Option<PathBuf>,

    /// Build the manpage
    #[arg(long)]
    man: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.man {
        let mut buffer: Vec<u8> = Vec::default();
        let cmd = Args::command().name("crokinole-rounds").long_version(None);
        let man = clap_mangen::Man::new(cmd).date("2026-07-15");

        man.render(&mut buffer)?;
        write!(buffer, "{COPYRIGHT}")?;

        fs::write("crokinole-rounds.1", buffer)?;
        return Ok(());
    }

    init_logger();

    let seed = args.seed.unwrap_or_else(|| rand::rng().random());
    info!("simulating with seed {seed}");
    let mut rng = StdRng::seed_from_u64(seed);

    let settings = Settings {
        points_per_match: args.points,
        total_rounds: args.rounds,
        assign_tables: (args.tables > 0).into(),
        ..Settings::default()
    };

    let mut tournament = Tournament::new("simulated event", settings);
    for i in 1..=args.players {
        tournament.add_player(&format!("Player {i}"));
    }
    for i in 1..=args.tables {
        tournament.add_table(&format!("Table {i}"));
    }

    for _ in 0..args.rounds {
        let log = tournament.generate_next_round(Utc::now(), &mut rng)?;
        println!("{log}");

        let pending: Vec<Id> = tournament
            .matches
            .iter()
            .filter(|game| !game.completed)
            .map(|game| game.id)
            .collect();

        for id in pending {
            let score1 = rng.random_range(0..=args.points);
            let twenties1 = f64::from(rng.random_range(0..4_u32));
            let twenties2 = f64::from(rng.random_range(0..4_u32));
            tournament.record_score(id, score1, args.points - score1, twenties1, twenties2)?;
        }
    }

    println!("final standings:");
    for (i, row) in tournament.standings().iter().enumerate() {
        println!("{:>2}. {row}", i + 1);
    }

    if let Some(path) = args.save {
        let pretty = ron::ser::to_string_pretty(&tournament, ron::ser::PrettyConfig::default())?;
        fs::write(&path, pretty)?;
        info!("tournament written to {}", path.display());
    }

    Ok(())
}
