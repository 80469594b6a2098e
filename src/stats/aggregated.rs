use std::collections::BTreeMap;

use itertools::Itertools;
use serde::Serialize;
use tracing::debug;

use crate::event_file::game::{players_in_games, Game, Player, TEAM_PLAYER_ID};
use crate::event_file::traits::PlayerId;
use crate::stats::ba::player_to_ba;
use crate::stats::obp::{player_to_cobp, player_to_obp, player_to_sobp};
use crate::stats::ops::{player_to_cops, player_to_ops, Composite};
use crate::stats::sp::player_to_sp;
use crate::stats::{ratio_for, Ratio};

/// Every statistic for one player over a set of games.
#[derive(Debug, Default, PartialEq, Copy, Clone, Serialize)]
pub struct PlayerStats {
    pub obp: Ratio,
    pub cobp: Ratio,
    pub sobp: Ratio,
    pub ba: Ratio,
    pub sp: Ratio,
    pub ops: Composite,
    pub cops: Composite,
}

pub type PlayerToStats = BTreeMap<PlayerId, PlayerStats>;

/// Computes a bundle for each player who appears in `games`, plus the team
/// pseudo-player. A player without any qualifying plate appearances for a
/// statistic gets its no-data value.
pub fn player_to_stats(games: &[Game]) -> PlayerToStats {
    let obp = player_to_obp(games);
    let cobp = player_to_cobp(games);
    let sobp = player_to_sobp(games);
    let ba = player_to_ba(games);
    let sp = player_to_sp(games);
    let ops = player_to_ops(&obp, &sp);
    let cops = player_to_cops(&cobp, &sp);

    let stats: PlayerToStats = players_in_games(games)
        .into_iter()
        .map(|p| p.id)
        .chain(std::iter::once(TEAM_PLAYER_ID.to_string()))
        .map(|id| {
            let bundle = PlayerStats {
                obp: ratio_for(&obp, &id),
                cobp: ratio_for(&cobp, &id),
                sobp: ratio_for(&sobp, &id),
                ba: ratio_for(&ba, &id),
                sp: ratio_for(&sp, &id),
                ops: ops.get(&id).copied().unwrap_or_default(),
                cops: cops.get(&id).copied().unwrap_or_default(),
            };
            (id, bundle)
        })
        .collect();
    debug!(
        "Computed statistics for {} players over {} games",
        stats.len(),
        games.len()
    );
    stats
}

/// One line of the report, keyed by display name.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct StatRow {
    #[serde(rename = "Player")]
    pub player: String,
    #[serde(skip)]
    pub player_id: PlayerId,
    #[serde(rename = "OBP")]
    pub obp: Option<f64>,
    #[serde(rename = "COBP")]
    pub cobp: Option<f64>,
    #[serde(rename = "SOBP")]
    pub sobp: Option<f64>,
    #[serde(rename = "BA")]
    pub ba: Option<f64>,
    #[serde(rename = "SP")]
    pub sp: Option<f64>,
    #[serde(rename = "OPS")]
    pub ops: Option<f64>,
    #[serde(rename = "COPS")]
    pub cops: Option<f64>,
}

impl StatRow {
    pub fn new(player: &Player, stats: &PlayerStats) -> Self {
        Self {
            player: player.name.clone(),
            player_id: player.id.clone(),
            obp: stats.obp.value(),
            cobp: stats.cobp.value(),
            sobp: stats.sobp.value(),
            ba: stats.ba.value(),
            sp: stats.sp.value(),
            ops: stats.ops.value(),
            cops: stats.cops.value(),
        }
    }

    /// Matches a display name or a Retrosheet ID, ignoring case.
    pub fn matches_player(&self, query: &str) -> bool {
        self.player.eq_ignore_ascii_case(query) || self.player_id.eq_ignore_ascii_case(query)
    }
}

/// Report rows: the team first, then players by name.
pub fn stat_rows(games: &[Game], stats: &PlayerToStats) -> Vec<StatRow> {
    let team = Player::team();
    let team_row = StatRow::new(&team, &stats.get(&team.id).copied().unwrap_or_default());
    let player_rows = players_in_games(games)
        .into_iter()
        .filter(|p| !p.is_team())
        .sorted_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)))
        .map(|p| StatRow::new(&p, &stats.get(&p.id).copied().unwrap_or_default()));
    std::iter::once(team_row).chain(player_rows).collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::event_file::game::RosterEntry;
    use crate::event_file::misc::GameId;
    use crate::event_file::play::PlateAppearance;
    use crate::event_file::traits::{Matchup, Side};
    use crate::stats::situation::Situation;

    fn game(id: &str, plays: &[(u8, Side, &str, &str)]) -> Game {
        let plate_appearances = plays
            .iter()
            .map(|(inning, side, batter, descriptor)| {
                PlateAppearance::new(*inning, *side, batter, descriptor).unwrap()
            })
            .collect();
        let roster = vec![
            RosterEntry {
                player: Player::new("a", "Zed Adams"),
                side: Side::Away,
                lineup_position: 1,
            },
            RosterEntry {
                player: Player::new("b", "Abe Baker"),
                side: Side::Away,
                lineup_position: 2,
            },
        ];
        Game::new(
            GameId { id: id.into() },
            NaiveDate::from_ymd_opt(2021, 4, 1).unwrap(),
            Matchup::new("AWY".into(), "HOM".into()),
            roster,
            plate_appearances,
        )
    }

    fn season() -> Vec<Game> {
        vec![
            game(
                "G1",
                &[
                    (1, Side::Away, "a", "S7"),
                    (1, Side::Away, "b", "W"),
                    (1, Side::Away, "c", "K"),
                    (1, Side::Home, "x", "HR/F7"),
                    (2, Side::Away, "a", "D8/L"),
                    (2, Side::Away, "b", "9/SF.3-H"),
                    (2, Side::Away, "c", "NP"),
                    (2, Side::Away, "c", "63/G"),
                ],
            ),
            game(
                "G2",
                &[
                    (1, Side::Away, "b", "HP"),
                    (1, Side::Away, "a", "K"),
                    (1, Side::Away, "c", "S9"),
                    (1, Side::Home, "x", "W"),
                    (1, Side::Home, "y", "E6"),
                ],
            ),
        ]
    }

    #[test]
    fn conditional_ratios_are_bounded_and_nested() {
        let stats = player_to_stats(&season());
        for (player, s) in &stats {
            for ratio in [s.obp, s.cobp, s.sobp, s.ba, s.sp] {
                assert!(ratio.numerator <= ratio.denominator * 4, "{player}");
            }
            for ratio in [s.obp, s.cobp, s.sobp, s.ba] {
                assert!(ratio.numerator <= ratio.denominator, "{player}");
            }
            assert!(s.sobp.numerator <= s.cobp.numerator, "{player}");
            assert!(s.sobp.denominator <= s.cobp.denominator, "{player}");
            assert!(s.cobp.numerator <= s.obp.numerator, "{player}");
            assert!(s.cobp.denominator <= s.obp.denominator, "{player}");
        }
    }

    #[test]
    fn situational_appearances_are_subsets() {
        fn contains(set: &[&PlateAppearance], pa: &PlateAppearance) -> bool {
            set.iter().any(|other| std::ptr::eq(*other, pa))
        }
        for game in &season() {
            let any = Situation::Any.plate_appearances(game);
            let earlier = Situation::RunnerReachedEarlier.plate_appearances(game);
            let previous = Situation::PreviousBatterReached.plate_appearances(game);
            assert!(!previous.is_empty());
            assert!(previous.len() < any.len());
            for pa in &previous {
                assert!(contains(&earlier, pa), "{pa}");
            }
            for pa in &earlier {
                assert!(contains(&any, pa), "{pa}");
            }
        }
    }

    #[test]
    fn team_is_the_sum_of_its_players() {
        let stats = player_to_stats(&season());
        let team = stats[TEAM_PLAYER_ID];
        let summed = stats
            .iter()
            .filter(|(id, _)| id.as_str() != TEAM_PLAYER_ID)
            .fold(PlayerStats::default(), |acc, (_, s)| PlayerStats {
                obp: acc.obp + s.obp,
                cobp: acc.cobp + s.cobp,
                sobp: acc.sobp + s.sobp,
                ba: acc.ba + s.ba,
                sp: acc.sp + s.sp,
                ..acc
            });
        assert_eq!(team.obp, summed.obp);
        assert_eq!(team.cobp, summed.cobp);
        assert_eq!(team.sobp, summed.sobp);
        assert_eq!(team.ba, summed.ba);
        assert_eq!(team.sp, summed.sp);
    }

    #[test]
    fn player_values() {
        let stats = player_to_stats(&season());
        let a = stats["a"];
        assert_eq!(a.obp, Ratio::new(2, 3));
        assert_eq!(a.cobp, Ratio::new(0, 1));
        assert_eq!(a.ba, Ratio::new(2, 3));
        assert_eq!(a.sp, Ratio::new(3, 3));
        assert_eq!(a.ops.value(), Some(2.0 / 3.0 + 1.0));

        let b = stats["b"];
        // walk, sacrifice fly, hit by pitch
        assert_eq!(b.obp, Ratio::new(3, 3));
        assert_eq!(b.cobp, Ratio::new(2, 2));
        assert_eq!(b.sobp, Ratio::new(2, 2));
        assert_eq!(b.ba, Ratio::default());
        assert_eq!(b.ops.value(), None);

        let c = stats["c"];
        assert_eq!(c.obp, Ratio::new(1, 3));
        assert_eq!(c.cobp, Ratio::new(1, 3));
        assert_eq!(c.sobp, Ratio::new(0, 1));
    }

    #[test]
    fn recomputing_gives_identical_results() {
        let games = season();
        assert_eq!(player_to_stats(&games), player_to_stats(&games));
    }

    #[test]
    fn rows_put_the_team_first_then_sort_by_name() {
        let games = season();
        let rows = stat_rows(&games, &player_to_stats(&games));
        let names = rows.iter().map(|r| r.player.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["Entire Team", "Abe Baker", "Zed Adams", "c", "x", "y"]);
        assert!(rows[1].matches_player("b"));
        assert!(rows[2].matches_player("zed adams"));
    }

    #[test]
    fn no_games() {
        let stats = player_to_stats(&[]);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[TEAM_PLAYER_ID], PlayerStats::default());
        let rows = stat_rows(&[], &stats);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].obp, None);
        assert_eq!(rows[0].cops, None);
    }
}
