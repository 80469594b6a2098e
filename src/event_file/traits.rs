use std::str::FromStr;

use csv::StringRecord;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::event_file::error::ParseError;
use crate::util::parse_positive_int;

pub type RetrosheetEventRecord = StringRecord;

pub type Inning = u8;
pub type PlayerId = String;
pub type Team = String;

pub trait FromRetrosheetRecord {
    fn new(record: &RetrosheetEventRecord) -> Result<Self, ParseError>
    where
        Self: Sized;

    fn error(msg: &str, record: &RetrosheetEventRecord) -> ParseError {
        ParseError::malformed(msg, record_text(record))
    }
}

/// The record as it appeared in the file, for error messages.
pub fn record_text(record: &RetrosheetEventRecord) -> String {
    record.iter().collect::<Vec<&str>>().join(",")
}

pub(crate) fn parse_inning(value: &str, record: &str) -> Result<Inning, ParseError> {
    parse_positive_int::<Inning>(value)
        .ok_or_else(|| ParseError::malformed(format!("invalid inning `{value}`"), record))
}

pub(crate) fn parse_side(value: &str, record: &str) -> Result<Side, ParseError> {
    Side::from_str(value.trim())
        .map_err(|_| ParseError::malformed(format!("invalid side `{value}`"), record))
}

#[derive(
    Debug, Eq, PartialEq, Ord, PartialOrd, EnumString, Display, Hash, Copy, Clone, Serialize, Deserialize,
)]
pub enum Side {
    #[strum(serialize = "0")]
    Away,
    #[strum(serialize = "1")]
    Home,
}

#[derive(Debug, Default, Eq, PartialEq, Clone, Serialize, Deserialize)]
pub struct Matchup<T> {
    pub away: T,
    pub home: T,
}

impl<T> Matchup<T> {
    pub const fn new(away: T, home: T) -> Self {
        Self { away, home }
    }

    pub const fn get(&self, side: Side) -> &T {
        match side {
            Side::Away => &self.away,
            Side::Home => &self.home,
        }
    }
}

impl<T: PartialEq> Matchup<T> {
    /// Which side `value` is on, if either.
    pub fn side_of(&self, value: &T) -> Option<Side> {
        if &self.away == value {
            Some(Side::Away)
        } else if &self.home == value {
            Some(Side::Home)
        } else {
            None
        }
    }
}

/// One team's turn at bat within an inning. Conditional statistics never
/// carry state across a boundary between two of these.
#[derive(Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Copy, Clone, Serialize, Deserialize)]
pub struct HalfInning {
    pub inning: Inning,
    pub batting_side: Side,
}
