use crate::event_file::game::Game;
use crate::event_file::play::PlateAppearance;
use crate::stats::situation::Situation;
use crate::stats::{tally, PlayerToRatio, Ratio};

fn on_base_contribution(pa: &PlateAppearance) -> Ratio {
    let class = pa.obp_class();
    Ratio::new(
        u32::from(class.in_obp_numerator()),
        u32::from(class.in_obp_denominator()),
    )
}

/// On-base percentage over the plate appearances where `situation` held.
pub fn player_to_situational_obp(games: &[Game], situation: Situation) -> PlayerToRatio {
    tally(
        games,
        |game| situation.plate_appearances(game),
        on_base_contribution,
    )
}

pub fn player_to_obp(games: &[Game]) -> PlayerToRatio {
    player_to_situational_obp(games, Situation::Any)
}

/// Conditional OBP: only plate appearances after someone earlier in the
/// half-inning reached base.
pub fn player_to_cobp(games: &[Game]) -> PlayerToRatio {
    player_to_situational_obp(games, Situation::RunnerReachedEarlier)
}

/// Situational OBP: only plate appearances right after a batter who reached.
pub fn player_to_sobp(games: &[Game]) -> PlayerToRatio {
    player_to_situational_obp(games, Situation::PreviousBatterReached)
}
