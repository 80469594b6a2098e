use std::collections::HashMap;
use std::ops::{Add, AddAssign};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::event_file::game::{Game, TEAM_PLAYER_ID};
use crate::event_file::play::PlateAppearance;
use crate::event_file::traits::PlayerId;

pub mod aggregated;
pub mod ba;
pub mod obp;
pub mod ops;
pub mod situation;
pub mod sp;

/// A counting statistic. With a zero denominator there is no data, which is
/// different from a ratio of zero.
#[derive(Debug, Default, Eq, PartialEq, Hash, Copy, Clone, Serialize, Deserialize)]
pub struct Ratio {
    pub numerator: u32,
    pub denominator: u32,
}

impl Ratio {
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    pub fn value(&self) -> Option<f64> {
        self.has_data()
            .then(|| f64::from(self.numerator) / f64::from(self.denominator))
    }

    pub const fn has_data(&self) -> bool {
        self.denominator > 0
    }
}

impl Add for Ratio {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.numerator + rhs.numerator,
            self.denominator + rhs.denominator,
        )
    }
}

impl AddAssign for Ratio {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

pub type PlayerToRatio = HashMap<PlayerId, Ratio>;

/// Looks up a player, falling back to the no-data value.
pub fn ratio_for(player_to_ratio: &PlayerToRatio, player_id: &str) -> Ratio {
    player_to_ratio.get(player_id).copied().unwrap_or_default()
}

/// Sums `count` over the plate appearances `select` picks from each game,
/// crediting the batter and the team pseudo-player. Games are independent,
/// so they are counted in parallel and merged.
pub(crate) fn tally<S, C>(games: &[Game], select: S, count: C) -> PlayerToRatio
where
    S: Fn(&Game) -> Vec<&PlateAppearance> + Sync,
    C: Fn(&PlateAppearance) -> Ratio + Sync,
{
    games
        .par_iter()
        .map(|game| {
            let mut counts = PlayerToRatio::new();
            for pa in select(game) {
                let contribution = count(pa);
                *counts.entry(pa.batter.clone()).or_default() += contribution;
                *counts.entry(TEAM_PLAYER_ID.to_string()).or_default() += contribution;
            }
            counts
        })
        .reduce(PlayerToRatio::new, merge)
}

fn merge(mut left: PlayerToRatio, right: PlayerToRatio) -> PlayerToRatio {
    for (player, ratio) in right {
        *left.entry(player).or_default() += ratio;
    }
    left
}
