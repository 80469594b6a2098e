use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use csv::{Reader, ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use crate::event_file::error::ParseError;
use crate::event_file::info::InfoRecord;
use crate::event_file::misc::{Comment, GameId, StartRecord, SubstitutionRecord};
use crate::event_file::play::PlateAppearance;
use crate::event_file::traits::{FromRetrosheetRecord, RetrosheetEventRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappedRecord {
    GameId(GameId),
    Version,
    Info(InfoRecord),
    Start(StartRecord),
    Substitution(SubstitutionRecord),
    Play(PlateAppearance),
    Comment(Comment),
    /// `data`, `badj`, `padj`, `ladj`, `radj` and `presadj` lines, which
    /// don't change how a plate appearance is classified.
    Adjustment,
}

impl FromRetrosheetRecord for MappedRecord {
    fn new(record: &RetrosheetEventRecord) -> Result<Self, ParseError> {
        let line_type = record
            .get(0)
            .ok_or_else(|| Self::error("No record", record))?;
        let mapped = match line_type {
            "id" => Self::GameId(GameId::new(record)?),
            "version" => Self::Version,
            "info" => Self::Info(InfoRecord::new(record)?),
            "start" => Self::Start(StartRecord::new(record)?),
            "sub" => Self::Substitution(SubstitutionRecord::new(record)?),
            "play" => Self::Play(<PlateAppearance as FromRetrosheetRecord>::new(record)?),
            "com" => Self::Comment(record.get(1).unwrap_or_default().to_string()),
            "data" | "badj" | "padj" | "ladj" | "radj" | "presadj" => Self::Adjustment,
            _ => return Err(Self::error("Unrecognized record type", record)),
        };
        Ok(mapped)
    }
}

/// A record as read from the file, tagged with its 1-based line number.
#[derive(Debug, Clone)]
pub struct PositionedRecord {
    pub line: u64,
    pub record: StringRecord,
}

/// Every raw record belonging to one game, starting with its `id` line.
#[derive(Debug, Clone, Default)]
pub struct GameRecords {
    pub records: Vec<PositionedRecord>,
}

impl GameRecords {
    pub fn game_id(&self) -> Option<&str> {
        self.records.first().and_then(|r| r.record.get(1))
    }

    pub fn line_offset(&self) -> u64 {
        self.records.first().map_or(0, |r| r.line)
    }
}

/// Splits an event file into games without interpreting records, so one bad
/// game never stops the next from being read.
pub struct RetrosheetReader<R: Read> {
    reader: Reader<R>,
    pending: Option<PositionedRecord>,
    pub filename: String,
}

impl RetrosheetReader<BufReader<File>> {
    pub fn new(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Could not open {}", path.display()))?;
        debug!("Opened event file {}", path.display());
        Ok(Self::from_reader(
            BufReader::new(file),
            path.display().to_string(),
        ))
    }
}

impl<R: Read> RetrosheetReader<R> {
    pub fn from_reader(reader: R, filename: String) -> Self {
        let reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);
        Self {
            reader,
            pending: None,
            filename,
        }
    }

    fn read_positioned(&mut self) -> Result<Option<PositionedRecord>> {
        let mut record = StringRecord::new();
        let more = self
            .reader
            .read_record(&mut record)
            .with_context(|| format!("Failed to read record from {}", self.filename))?;
        if !more {
            return Ok(None);
        }
        let line = record.position().map_or(0, csv::Position::line);
        Ok(Some(PositionedRecord { line, record }))
    }

    fn next_game(&mut self) -> Result<Option<GameRecords>> {
        let mut game = GameRecords::default();
        if let Some(first) = self.pending.take() {
            game.records.push(first);
        }
        while let Some(positioned) = self.read_positioned()? {
            let is_id = positioned.record.get(0) == Some("id");
            if is_id && !game.records.is_empty() {
                self.pending = Some(positioned);
                break;
            }
            if !is_id && game.records.is_empty() {
                // Anything before the first `id` line (usually nothing) has no game
                debug!(
                    "Skipping line {} of {} outside of any game",
                    positioned.line, self.filename
                );
                continue;
            }
            game.records.push(positioned);
        }
        Ok((!game.records.is_empty()).then_some(game))
    }
}

impl<R: Read> Iterator for RetrosheetReader<R> {
    type Item = Result<GameRecords>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_game().transpose()
    }
}
