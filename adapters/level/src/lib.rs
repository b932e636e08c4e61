#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Flat text level files.
//!
//! A level starts with a `<columns> <rows>` header followed by one
//! `<kind> <column> <row>` line per entity. Blank lines are ignored. Saves use
//! the same format, so anything written by [`save`] loads back unchanged.

use std::{
    fmt::Write as _,
    fs, io,
    ops::RangeInclusive,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use thiserror::Error;
use wordgrid_core::{EntityKind, Grid, GridSize, OutOfBounds, Position};

/// Largest number of columns or rows a level may declare.
pub const MAX_SIDE: u32 = 1024;

/// Invalid level data.
#[derive(Debug, Error)]
pub enum LevelError {
    /// The level file could not be read.
    #[error("invalid level data: cannot read {path}")]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: io::Error,
    },
    /// The file holds no header line.
    #[error("invalid level data: missing `<columns> <rows>` header")]
    MissingHeader,
    /// The header is not two integers between 1 and [`MAX_SIDE`].
    #[error("invalid level data: line {line}: malformed header `{text}`")]
    InvalidHeader {
        /// 1-based line number.
        line: usize,
        /// Offending text.
        text: String,
    },
    /// An entity line names no known kind.
    #[error("invalid level data: line {line}: unknown entity `{name}`")]
    UnknownKind {
        /// 1-based line number.
        line: usize,
        /// Unrecognised name.
        name: String,
    },
    /// An entity line lacks a well-formed `<column> <row>` pair.
    #[error("invalid level data: line {line}: malformed entity `{text}`")]
    InvalidPosition {
        /// 1-based line number.
        line: usize,
        /// Offending text.
        text: String,
    },
    /// An entity lies outside the declared grid.
    #[error("invalid level data: line {line}: {source}")]
    OutOfBounds {
        /// 1-based line number.
        line: usize,
        /// Rejected placement.
        #[source]
        source: OutOfBounds,
    },
    /// A save could not be written.
    #[error("cannot write save {path}")]
    Write {
        /// File or directory that failed.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: io::Error,
    },
}

/// Loads the level stored at `path`, naming it after the path.
pub fn load(path: impl AsRef<Path>) -> Result<Grid, LevelError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| LevelError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let grid = parse(path.display().to_string(), &contents)?;
    log::info!(
        "loaded {} ({}, {} entities)",
        path.display(),
        grid.size(),
        grid.entities().len()
    );
    Ok(grid)
}

/// Parses level text into a grid.
pub fn parse(level_name: impl Into<String>, contents: &str) -> Result<Grid, LevelError> {
    let mut lines = contents
        .lines()
        .enumerate()
        .map(|(index, text)| (index + 1, text.trim()))
        .filter(|(_, text)| !text.is_empty());

    let (line, header) = lines.next().ok_or(LevelError::MissingHeader)?;
    let size = parse_header(header).ok_or_else(|| LevelError::InvalidHeader {
        line,
        text: header.to_owned(),
    })?;

    let mut grid = Grid::new(level_name, size);
    for (line, text) in lines {
        let mut fields = text.split_whitespace();
        let name = fields.next().unwrap_or_default();
        let kind = EntityKind::from_name(name).ok_or_else(|| LevelError::UnknownKind {
            line,
            name: name.to_owned(),
        })?;
        let position = parse_position(fields).ok_or_else(|| LevelError::InvalidPosition {
            line,
            text: text.to_owned(),
        })?;
        grid.place(kind, position)
            .map_err(|source| LevelError::OutOfBounds { line, source })?;
    }
    Ok(grid)
}

const SIDES: RangeInclusive<u32> = 1..=MAX_SIDE;

fn parse_header(text: &str) -> Option<GridSize> {
    let mut fields = text.split_whitespace();
    let columns: u32 = fields.next()?.parse().ok()?;
    let rows: u32 = fields.next()?.parse().ok()?;
    if fields.next().is_some() || !SIDES.contains(&columns) || !SIDES.contains(&rows) {
        return None;
    }
    Some(GridSize::new(rows, columns))
}

fn parse_position<'a>(mut fields: impl Iterator<Item = &'a str>) -> Option<Position> {
    let column = fields.next()?.parse().ok()?;
    let row = fields.next()?.parse().ok()?;
    if fields.next().is_some() {
        return None;
    }
    Some(Position::new(row, column))
}

/// Renders a grid in the level file format.
#[must_use]
pub fn encode(grid: &Grid) -> String {
    let size = grid.size();
    let mut out = format!("{} {}\n", size.columns(), size.rows());
    for entity in grid.entities() {
        let position = entity.position();
        let _ = writeln!(
            out,
            "{} {} {}",
            entity.kind(),
            position.column(),
            position.row()
        );
    }
    out
}

/// Writes `grid` to `path`, replacing any existing file.
pub fn save_to(grid: &Grid, path: impl AsRef<Path>) -> Result<(), LevelError> {
    let path = path.as_ref();
    fs::write(path, encode(grid)).map_err(|source| LevelError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes a timestamped save of `grid` into `dir`, creating it when missing.
///
/// Saves are named `save_<unix-seconds>.txt`; a numeric suffix keeps saves
/// made within the same second apart.
pub fn save(grid: &Grid, dir: impl AsRef<Path>) -> Result<PathBuf, LevelError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|source| LevelError::Write {
        path: dir.to_path_buf(),
        source,
    })?;

    let seconds = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs());
    let mut path = dir.join(format!("save_{seconds}.txt"));
    let mut attempt = 1;
    while path.exists() {
        path = dir.join(format!("save_{seconds}_{attempt}.txt"));
        attempt += 1;
    }

    save_to(grid, &path)?;
    log::info!("saved {} to {}", grid.level_name(), path.display());
    Ok(path)
}
