use std::collections::HashSet;
use std::fmt::{self, Formatter};

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::event_file::info::InfoRecord;
use crate::event_file::misc::{AppearanceRecord, GameId};
use crate::event_file::parser::{GameRecords, MappedRecord};
use crate::event_file::play::PlateAppearance;
use crate::event_file::traits::{
    record_text, FromRetrosheetRecord, HalfInning, Matchup, PlayerId, Side, Team,
};

pub const TEAM_PLAYER_ID: &str = "TEAM";
pub const TEAM_PLAYER_NAME: &str = "Entire Team";

#[derive(Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
}

impl Player {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    /// The pseudo-player standing for every batter at once.
    pub fn team() -> Self {
        Self::new(TEAM_PLAYER_ID, TEAM_PLAYER_NAME)
    }

    pub fn is_team(&self) -> bool {
        self.id == TEAM_PLAYER_ID
    }
}

#[derive(Debug, Eq, PartialEq, Clone, Serialize, Deserialize)]
pub struct RosterEntry {
    pub player: Player,
    pub side: Side,
    /// Slot in the batting order when the player entered
    pub lineup_position: u8,
}

/// A completed game: who played and every `play` record in file order.
///
/// The order of `plate_appearances` is never changed after construction,
/// since conditional statistics depend on what happened earlier in each
/// half-inning.
#[derive(Debug, Eq, PartialEq, Clone, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub date: NaiveDate,
    pub teams: Matchup<Team>,
    roster: Vec<RosterEntry>,
    plate_appearances: Vec<PlateAppearance>,
}

impl Game {
    pub fn new(
        id: GameId,
        date: NaiveDate,
        teams: Matchup<Team>,
        roster: Vec<RosterEntry>,
        plate_appearances: Vec<PlateAppearance>,
    ) -> Self {
        Self {
            id,
            date,
            teams,
            roster,
            plate_appearances,
        }
    }

    /// Builds a game from its raw records. The first record that fails to
    /// parse fails the whole game.
    pub fn from_records(game_records: &GameRecords) -> Result<Self> {
        let game_id = game_records.game_id().unwrap_or("<unknown>").to_string();
        let start_line = game_records.line_offset();
        let mut id = None;
        let mut date = None;
        let mut away = None;
        let mut home = None;
        let mut roster: Vec<RosterEntry> = Vec::new();
        let mut plate_appearances = Vec::with_capacity(game_records.records.len());

        for positioned in &game_records.records {
            let mapped = MappedRecord::new(&positioned.record).with_context(|| {
                format!(
                    "Game {game_id}, line {}: `{}`",
                    positioned.line,
                    record_text(&positioned.record)
                )
            })?;
            match mapped {
                MappedRecord::GameId(g) => id = Some(g),
                MappedRecord::Info(InfoRecord::VisitingTeam(t)) => away = Some(t),
                MappedRecord::Info(InfoRecord::HomeTeam(t)) => home = Some(t),
                MappedRecord::Info(InfoRecord::GameDate(d)) => date = Some(d),
                MappedRecord::Start(a) | MappedRecord::Substitution(a) => {
                    add_to_roster(&mut roster, a);
                }
                MappedRecord::Play(pa) => plate_appearances.push(pa),
                _ => {}
            }
        }

        let id = id.ok_or_else(|| anyhow!("Game at line {start_line} has no id record"))?;
        let date = date.with_context(|| format!("Game {game_id} (line {start_line}) has no date"))?;
        let teams = Matchup::new(
            away.with_context(|| {
                format!("Game {game_id} (line {start_line}) has no visiting team")
            })?,
            home.with_context(|| format!("Game {game_id} (line {start_line}) has no home team"))?,
        );
        if plate_appearances.is_empty() {
            warn!("Game {game_id} has no play records");
        }
        Ok(Self::new(id, date, teams, roster, plate_appearances))
    }

    pub fn plate_appearances(&self) -> &[PlateAppearance] {
        &self.plate_appearances
    }

    pub fn roster(&self) -> &[RosterEntry] {
        &self.roster
    }

    /// Consecutive runs of plate appearances sharing an inning and batting
    /// side, in game order.
    pub fn half_innings(&self) -> impl Iterator<Item = (HalfInning, &[PlateAppearance])> {
        self.plate_appearances
            .chunk_by(|a, b| a.half_inning() == b.half_inning())
            .filter_map(|chunk| chunk.first().map(|first| (first.half_inning(), chunk)))
    }

    /// Everyone who appears in the game, either on the roster or as the batter
    /// of a play. Batters missing from the roster are named by their ID.
    pub fn players(&self) -> Vec<Player> {
        let mut seen = HashSet::new();
        let roster = self.roster.iter().map(|r| r.player.clone());
        let batters = self
            .plate_appearances
            .iter()
            .map(|pa| Player::new(&pa.batter, &pa.batter));
        roster
            .chain(batters)
            .filter(|p| seen.insert(p.id.clone()))
            .collect()
    }

    /// The same game seen from one team's dugout: only that team's players
    /// and the half-innings in which it batted.
    pub fn batting_view(&self, team: &str) -> Option<Self> {
        let side = self.teams.side_of(&team.to_string())?;
        Some(Self {
            id: self.id.clone(),
            date: self.date,
            teams: self.teams.clone(),
            roster: self
                .roster
                .iter()
                .filter(|r| r.side == side)
                .cloned()
                .collect(),
            plate_appearances: self
                .plate_appearances
                .iter()
                .filter(|pa| pa.batting_side == side)
                .cloned()
                .collect(),
        })
    }

    pub fn involves(&self, team: &str) -> bool {
        self.teams.away == team || self.teams.home == team
    }

    /// e.g. `2020-07-24: OAK @ ANA (ANA202007240)`
    pub fn pretty_id(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} @ {} ({})",
            self.date, self.teams.away, self.teams.home, self.id.id
        )
    }
}

fn add_to_roster(roster: &mut Vec<RosterEntry>, appearance: AppearanceRecord) {
    let already_listed = roster
        .iter()
        .any(|r| r.player.id == appearance.player_id && r.side == appearance.side);
    if !already_listed {
        roster.push(RosterEntry {
            player: Player::new(&appearance.player_id, &appearance.name),
            side: appearance.side,
            lineup_position: appearance.lineup_position,
        });
    }
}

/// Every player across `games`, each listed once in first-seen order.
pub fn players_in_games(games: &[Game]) -> Vec<Player> {
    let mut seen = HashSet::new();
    games
        .iter()
        .flat_map(Game::players)
        .filter(|p| seen.insert(p.id.clone()))
        .collect()
}
