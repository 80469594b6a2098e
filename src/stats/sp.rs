use crate::event_file::game::Game;
use crate::event_file::play::PlateAppearance;
use crate::stats::{tally, PlayerToRatio, Ratio};

fn slugging_contribution(pa: &PlateAppearance) -> Ratio {
    if pa.obp_class().is_official_at_bat() {
        Ratio::new(pa.total_bases(), 1)
    } else {
        Ratio::default()
    }
}

/// Total bases over at-bats.
pub fn player_to_sp(games: &[Game]) -> PlayerToRatio {
    tally(
        games,
        |game| game.plate_appearances().iter().collect(),
        slugging_contribution,
    )
}
