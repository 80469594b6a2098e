use chrono::NaiveDate;

use crate::event_file::error::ParseError;
use crate::event_file::traits::{FromRetrosheetRecord, RetrosheetEventRecord, Team};

const DATE_FORMAT: &str = "%Y/%m/%d";

/// The `info` keys statistics need. Everything else Retrosheet records
/// about a game (weather, umpires, scorer) is kept as `Other`.
#[derive(Debug, Eq, PartialEq, Clone)]
pub enum InfoRecord {
    VisitingTeam(Team),
    HomeTeam(Team),
    GameDate(NaiveDate),
    Other { key: String, value: String },
}

impl FromRetrosheetRecord for InfoRecord {
    fn new(record: &RetrosheetEventRecord) -> Result<Self, ParseError> {
        let key = record
            .get(1)
            .map(str::trim)
            .ok_or_else(|| Self::error("Missing info key", record))?;
        let value = record.get(2).unwrap_or_default().trim();

        let info = match key {
            "visteam" => Self::VisitingTeam(value.to_string()),
            "hometeam" => Self::HomeTeam(value.to_string()),
            "date" => Self::GameDate(
                NaiveDate::parse_from_str(value, DATE_FORMAT)
                    .map_err(|_| Self::error("Invalid game date", record))?,
            ),
            _ => Self::Other {
                key: key.to_string(),
                value: value.to_string(),
            },
        };
        Ok(info)
    }
}
