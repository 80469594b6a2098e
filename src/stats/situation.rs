//! Which plate appearances count toward a conditional statistic.
//!
//! Whether an appearance qualifies depends on what happened before it in
//! the same half-inning, so each game is replayed in order with a small
//! amount of state that resets whenever the half-inning changes.

use crate::event_file::game::Game;
use crate::event_file::play::{ObpClass, PlateAppearance};

#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum Situation {
    /// Every plate appearance.
    Any,
    /// Some earlier batter in the half-inning reached base.
    RunnerReachedEarlier,
    /// The batter immediately before reached base. Records that aren't plate
    /// appearances (no play, caught stealing) don't count as the batter
    /// before.
    PreviousBatterReached,
}

#[derive(Debug, Default, Copy, Clone)]
struct HalfInningState {
    anyone_reached: bool,
    previous_reached: bool,
}

impl HalfInningState {
    fn observe(&mut self, pa: &PlateAppearance) {
        if pa.obp_class() == ObpClass::NotApplicable {
            return;
        }
        let reached = pa.results_in_on_base();
        self.anyone_reached |= reached;
        self.previous_reached = reached;
    }
}

impl Situation {
    const fn holds(self, state: HalfInningState) -> bool {
        match self {
            Self::Any => true,
            Self::RunnerReachedEarlier => state.anyone_reached,
            Self::PreviousBatterReached => state.previous_reached,
        }
    }

    /// The plate appearances of `game` for which the situation held, in
    /// game order.
    pub fn plate_appearances(self, game: &Game) -> Vec<&PlateAppearance> {
        if self == Self::Any {
            return game.plate_appearances().iter().collect();
        }
        game.half_innings()
            .flat_map(|(_, half)| {
                half.iter()
                    .scan(HalfInningState::default(), move |state, pa| {
                        let qualifies = self.holds(*state);
                        state.observe(pa);
                        Some((pa, qualifies))
                    })
            })
            .filter_map(|(pa, qualifies)| qualifies.then_some(pa))
            .collect()
    }
}
