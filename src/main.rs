#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::cargo)]
#![warn(
    clippy::nursery,
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::module_name_repetitions)]

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use chrono::Datelike;
use clap::{Parser, ValueEnum};
use glob::GlobError;
use itertools::Itertools;
use rayon::prelude::*;
use strum_macros::Display;
use tracing::{debug, error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use obp_rs::event_file::parser::RetrosheetReader;
use obp_rs::event_file::traits::Side;
use obp_rs::{player_to_stats, stat_rows, Game, StatRow};

const ABOUT: &str =
    "Computes on-base percentage and conditional on-base statistics from raw Retrosheet files.";

#[derive(Debug, Eq, PartialEq, Copy, Clone, Display, ValueEnum)]
#[strum(serialize_all = "lowercase")]
enum OutputFormat {
    Table,
    Csv,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "obp-rs", about = ABOUT)]
struct Opt {
    /// Directory of Retrosheet event files (`*.EVA`, `*.EVN`, ...)
    #[arg(short, long)]
    input: PathBuf,

    /// Only count the half-innings this team batted in
    #[arg(short, long)]
    team: Option<String>,

    #[arg(short, long)]
    year: Option<i32>,

    /// A single game ID, e.g. ANA202007240
    #[arg(short, long)]
    game: Option<String>,

    /// Only report this player, by name or Retrosheet ID
    #[arg(short, long)]
    player: Option<String>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Defaults to stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Abort on the first game that fails to parse instead of skipping it
    #[arg(long)]
    strict: bool,

    /// Print the selected games instead of statistics
    #[arg(long, conflicts_with = "plays")]
    list_games: bool,

    /// Print every selected plate appearance and how it counts toward OBP
    #[arg(long)]
    plays: bool,
}

impl Opt {
    fn file_pattern(&self) -> Result<String> {
        let prefix = self.year.map(|y| y.to_string()).unwrap_or_default();
        let pattern = self.input.join(format!("{prefix}*.EV*"));
        pattern
            .to_str()
            .map(String::from)
            .with_context(|| format!("Input path {} is not valid UTF-8", pattern.display()))
    }

    fn event_files(&self) -> Result<Vec<PathBuf>> {
        let pattern = self.file_pattern()?;
        let mut files = glob::glob(&pattern)?.collect::<Result<Vec<PathBuf>, GlobError>>()?;
        files.par_sort();
        if files.is_empty() {
            bail!("No event files match {pattern}");
        }
        debug!("Found {} event files", files.len());
        Ok(files)
    }

    fn selects(&self, game: &Game) -> bool {
        self.year.map_or(true, |y| game.date.year() == y)
            && self.game.as_ref().map_or(true, |id| &game.id.id == id)
            && self.team.as_ref().map_or(true, |t| game.involves(t))
    }
}

struct GameLoader {
    strict: bool,
}

impl GameLoader {
    fn games_in_file(&self, path: &Path) -> Result<Vec<Game>> {
        let reader = RetrosheetReader::new(path)?;
        debug!("Processing file {}", reader.filename);
        let mut games = Vec::with_capacity(81);
        for game_records in reader {
            match game_records.and_then(|records| Game::from_records(&records)) {
                Ok(game) => games.push(game),
                Err(e) if self.strict => return Err(e),
                Err(e) => error!("{:?}", e),
            }
        }
        Ok(games)
    }

    fn load(&self, files: &[PathBuf]) -> Result<Vec<Game>> {
        let per_file = files
            .par_iter()
            .map(|f| {
                self.games_in_file(f)
                    .with_context(|| format!("Failed to process {}", f.display()))
            })
            .collect::<Vec<Result<Vec<Game>>>>();

        let mut seen = HashSet::new();
        let mut games = Vec::new();
        for result in per_file {
            let file_games = match result {
                Ok(g) => g,
                Err(e) if self.strict => return Err(e),
                Err(e) => {
                    error!("{:?}", e);
                    continue;
                }
            };
            for game in file_games {
                if seen.insert(game.id.clone()) {
                    games.push(game);
                } else {
                    warn!("Game {} appears more than once, ignoring", game.id.id);
                }
            }
        }
        games.par_sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
        Ok(games)
    }
}

fn select_games(opt: &Opt, games: Vec<Game>) -> Vec<Game> {
    let selected = games.into_iter().filter(|g| opt.selects(g));
    match &opt.team {
        Some(team) => selected.filter_map(|g| g.batting_view(team)).collect(),
        None => selected.collect(),
    }
}

fn format_value(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.3}"))
}

fn write_table(rows: &[StatRow], out: &mut dyn Write) -> Result<()> {
    let width = rows
        .iter()
        .map(|r| r.player.len())
        .max()
        .unwrap_or_default()
        .max("Player".len());
    let columns = ["OBP", "COBP", "SOBP", "BA", "SP", "OPS", "COPS"];
    writeln!(
        out,
        "{:<width$}  {}",
        "Player",
        columns.iter().map(|c| format!("{c:>6}")).join(" ")
    )?;
    for row in rows {
        let values = [
            row.obp, row.cobp, row.sobp, row.ba, row.sp, row.ops, row.cops,
        ];
        writeln!(
            out,
            "{:<width$}  {}",
            row.player,
            values
                .iter()
                .map(|v| format!("{:>6}", format_value(*v)))
                .join(" ")
        )?;
    }
    Ok(())
}

fn write_game_list(games: &[Game], out: &mut dyn Write) -> Result<()> {
    for game in games {
        writeln!(out, "{}", game.pretty_id())?;
    }
    Ok(())
}

fn write_plays(games: &[Game], player: Option<&str>, out: &mut dyn Write) -> Result<()> {
    for game in games {
        let batter_ids = player.map(|query| {
            game.players()
                .into_iter()
                .filter(|p| p.id.eq_ignore_ascii_case(query) || p.name.eq_ignore_ascii_case(query))
                .map(|p| p.id)
                .collect::<HashSet<_>>()
        });
        let plays = game
            .plate_appearances()
            .iter()
            .filter(|pa| batter_ids.as_ref().map_or(true, |ids| ids.contains(&pa.batter)))
            .collect_vec();
        if plays.is_empty() {
            continue;
        }
        writeln!(out, "{}", game.pretty_id())?;
        for pa in plays {
            writeln!(
                out,
                "  {} {:>2}  {:<8}  {}  [{}]",
                match pa.batting_side {
                    Side::Away => "top",
                    Side::Home => "bot",
                },
                pa.inning,
                pa.batter,
                pa.pretty_description(),
                pa.obp_class()
            )?;
        }
    }
    Ok(())
}

fn write_rows(rows: &[StatRow], format: OutputFormat, out: &mut dyn Write) -> Result<()> {
    match format {
        OutputFormat::Table => write_table(rows, out)?,
        OutputFormat::Csv => {
            let mut csv = csv::Writer::from_writer(out);
            for row in rows {
                csv.serialize(row)?;
            }
            csv.flush()?;
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, rows)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn run(opt: &Opt) -> Result<()> {
    let files = opt.event_files()?;
    info!("Parsing {} event files", files.len());
    let games = GameLoader { strict: opt.strict }.load(&files)?;
    info!("Parsed {} games", games.len());

    let games = select_games(opt, games);
    if games.is_empty() {
        warn!("No games match the selection");
    }

    let mut out: Box<dyn Write> = match &opt.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Could not create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    if opt.list_games {
        write_game_list(&games, &mut out)?;
        out.flush()?;
        return Ok(());
    }
    if opt.plays {
        write_plays(&games, opt.player.as_deref(), &mut out)?;
        out.flush()?;
        return Ok(());
    }

    let stats = player_to_stats(&games);
    let mut rows = stat_rows(&games, &stats);
    if let Some(query) = &opt.player {
        rows.retain(|r| r.matches_player(query));
        if rows.is_empty() {
            bail!("No player named {query} in the selected games");
        }
    }

    debug!("Writing {} rows as {}", rows.len(), opt.format);
    write_rows(&rows, opt.format, &mut out)?;
    out.flush()?;
    Ok(())
}

#[allow(clippy::expect_used)]
fn main() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to initialize trace");

    let start = Instant::now();
    let opt: Opt = Opt::parse();

    run(&opt).expect("Error occurred while computing statistics");

    let end = start.elapsed();
    info!("Elapsed: {:?}", end);
}
