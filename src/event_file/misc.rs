use serde::{Deserialize, Serialize};

use crate::event_file::error::ParseError;
use crate::event_file::traits::{
    parse_side, record_text, FromRetrosheetRecord, PlayerId, RetrosheetEventRecord, Side,
};

pub type Comment = String;

#[derive(Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Clone, Serialize, Deserialize)]
pub struct GameId {
    pub id: String,
}

impl FromRetrosheetRecord for GameId {
    fn new(record: &RetrosheetEventRecord) -> Result<Self, ParseError> {
        match record.get(1).map(str::trim) {
            Some(id) if !id.is_empty() => Ok(Self { id: id.to_string() }),
            _ => Err(Self::error("Missing game ID", record)),
        }
    }
}

/// A `start` or `sub` line: a player entering the game for one side.
#[derive(Debug, Eq, PartialEq, Clone, Serialize, Deserialize)]
pub struct AppearanceRecord {
    pub player_id: PlayerId,
    pub name: String,
    pub side: Side,
    /// Zero is the pitcher when a DH is used
    pub lineup_position: u8,
}

impl FromRetrosheetRecord for AppearanceRecord {
    fn new(record: &RetrosheetEventRecord) -> Result<Self, ParseError> {
        if record.len() < 6 {
            return Err(Self::error("Appearance record needs 6 fields", record));
        }
        let text = record_text(record);
        let field = |i: usize| record.get(i).unwrap_or_default().trim();
        let player_id = field(1);
        if player_id.is_empty() {
            return Err(Self::error("Missing player ID", record));
        }
        let lineup_position = field(4)
            .parse::<u8>()
            .ok()
            .filter(|p| *p <= 9)
            .ok_or_else(|| Self::error("Invalid lineup position", record))?;
        Ok(Self {
            player_id: player_id.to_string(),
            name: field(2).to_string(),
            side: parse_side(field(3), &text)?,
            lineup_position,
        })
    }
}

pub type StartRecord = AppearanceRecord;
pub type SubstitutionRecord = AppearanceRecord;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_id() {
        let record = RetrosheetEventRecord::from(vec!["id", "ANA202007240"]);
        assert_eq!(GameId::new(&record).unwrap().id, "ANA202007240");
        let record = RetrosheetEventRecord::from(vec!["id"]);
        assert!(GameId::new(&record).is_err());
    }

    #[test]
    fn start_record() {
        let record =
            RetrosheetEventRecord::from(vec!["start", "semim001", "Marcus Semien", "0", "1", "6"]);
        let start = StartRecord::new(&record).unwrap();
        assert_eq!(start.player_id, "semim001");
        assert_eq!(start.name, "Marcus Semien");
        assert_eq!(start.side, Side::Away);
        assert_eq!(start.lineup_position, 1);
    }

    #[test]
    fn bad_appearance_records() {
        let record = RetrosheetEventRecord::from(vec!["sub", "semim001", "Marcus Semien", "0"]);
        assert!(SubstitutionRecord::new(&record).is_err());
        let record =
            RetrosheetEventRecord::from(vec!["sub", "semim001", "Marcus Semien", "3", "1", "6"]);
        assert!(SubstitutionRecord::new(&record).is_err());
        let record =
            RetrosheetEventRecord::from(vec!["sub", "semim001", "Marcus Semien", "0", "12", "6"]);
        assert!(SubstitutionRecord::new(&record).is_err());
    }
}
