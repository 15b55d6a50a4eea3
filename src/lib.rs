//! A round pairing engine for live crokinole doubles tournaments.
//!
//! The heart of the crate is [`pairing::generate_round_pairings`]: a pure
//! function that takes the roster, the full match history, and a seeded
//! random number generator, and returns the next round's teams, matchups,
//! and byes together with a [`round_log::RoundLog`] explaining every
//! non-trivial choice it made. Replaying the same inputs with the same seed
//! reproduces any historical round exactly, which is what makes the log an
//! audit trail rather than a story.
//!
//! The [`tournament::Tournament`] aggregate wraps the engine with score
//! entry, round retraction, and roster administration for the surrounding
//! lobby. The lobby, transport, and persistence live elsewhere; this crate
//! is the part that decides who plays whom.

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

#![deny(clippy::panic)]

pub mod byes;
pub mod matches;
pub mod matchups;
pub mod pairing;
pub mod player;
pub mod round_log;
pub mod standings;
pub mod status;
pub mod table;
pub mod teams;
pub mod tournament;
pub mod utils;

pub type Id = u64;

pub const COPYRIGHT: &str = r".SH COPYRIGHT
Copyright (C) 2025-2026 Developers of the crokinole-doubles project

This program is free software: you can redistribute it and/or modify
it under the terms of the GNU Affero General Public License as published by
the Free Software Foundation, either version 3 of the License, or
(at your option) any later version.

This program is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
GNU Affero General Public License for more details.

You should have received a copy of the GNU Affero General Public License
along with this program.  If not, see <https://www.gnu.org/licenses/>.
";
