use crate::event_file::game::Game;
use crate::event_file::play::PlateAppearance;
use crate::stats::{tally, PlayerToRatio, Ratio};

fn batting_contribution(pa: &PlateAppearance) -> Ratio {
    if pa.obp_class().is_official_at_bat() {
        Ratio::new(u32::from(pa.outcome.is_hit()), 1)
    } else {
        Ratio::default()
    }
}

/// Hits over at-bats.
pub fn player_to_ba(games: &[Game]) -> PlayerToRatio {
    tally(
        games,
        |game| game.plate_appearances().iter().collect(),
        batting_contribution,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_file::traits::Side;

    fn ba(descriptor: &str) -> Ratio {
        batting_contribution(&PlateAppearance::new(1, Side::Home, "a", descriptor).unwrap())
    }

    #[test]
    fn contributions() {
        assert_eq!(ba("S7"), Ratio::new(1, 1));
        assert_eq!(ba("HR/F7"), Ratio::new(1, 1));
        assert_eq!(ba("K"), Ratio::new(0, 1));
        assert_eq!(ba("E6"), Ratio::new(0, 1));
        assert_eq!(ba("W"), Ratio::default());
        assert_eq!(ba("HP"), Ratio::default());
        assert_eq!(ba("9/SF"), Ratio::default());
        assert_eq!(ba("NP"), Ratio::default());
    }
}
