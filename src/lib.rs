#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(
    clippy::nursery,
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_precision_loss,
    clippy::must_use_candidate
)]

//! Parses Retrosheet play-by-play event files and computes on-base
//! percentage along with its conditional variants for every batter.

pub mod event_file;
pub mod stats;
mod util;

pub use event_file::game::{Game, Player};
pub use event_file::play::{ObpClass, Outcome, OutcomeModifier, PlateAppearance};
pub use stats::aggregated::{player_to_stats, stat_rows, PlayerStats, PlayerToStats, StatRow};
