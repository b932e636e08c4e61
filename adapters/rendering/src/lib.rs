#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Text presentation of word grid levels.
//!
//! Every grid cell is drawn as a block of [`CELL_WIDTH`] by [`CELL_HEIGHT`]
//! characters taken from a [`SpriteSheet`]; the resulting [`Frame`] is boxed
//! and carries a palette style per character so adapters can colour it.

use std::{collections::HashMap, fmt, fs, path::Path};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use wordgrid_core::{EntityKind, Grid};

/// Characters per cell, horizontally.
pub const CELL_WIDTH: usize = 3;
/// Characters per cell, vertically.
pub const CELL_HEIGHT: usize = 2;

const SUPPORTED_MANIFEST_VERSION: u32 = 1;

/// Terminal palette colours available to sprites.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Palette {
    /// Black.
    Black,
    /// Red.
    Red,
    /// Green.
    Green,
    /// Yellow.
    Yellow,
    /// Blue.
    Blue,
    /// Magenta.
    Magenta,
    /// Cyan.
    Cyan,
    /// White.
    White,
    /// Dark grey.
    Grey,
}

/// Foreground and background colours of a character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Style {
    /// Colour of the glyph itself.
    pub foreground: Palette,
    /// Colour behind the glyph.
    pub background: Palette,
}

impl Style {
    /// Creates a style from its colours.
    #[must_use]
    pub const fn new(foreground: Palette, background: Palette) -> Self {
        Self {
            foreground,
            background,
        }
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::new(Palette::White, Palette::Black)
    }
}

/// Appearance of one entity kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sprite {
    glyphs: [String; CELL_HEIGHT],
    style: Style,
}

impl Sprite {
    /// Creates a sprite, rejecting rows that are not exactly [`CELL_WIDTH`] wide.
    pub fn new(glyphs: [String; CELL_HEIGHT], style: Style) -> Result<Self> {
        for row in &glyphs {
            let width = row.chars().count();
            if width != CELL_WIDTH {
                bail!("sprite row `{row}` is {width} characters wide; expected {CELL_WIDTH}");
            }
        }
        Ok(Self { glyphs, style })
    }

    /// Rows of the sprite, top first.
    #[must_use]
    pub fn glyphs(&self) -> &[String; CELL_HEIGHT] {
        &self.glyphs
    }

    /// Colours the sprite is drawn with.
    #[must_use]
    pub const fn style(&self) -> Style {
        self.style
    }
}

/// Sprites for every entity kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpriteSheet {
    sprites: HashMap<EntityKind, Sprite>,
}

impl SpriteSheet {
    /// Built-in console sprites.
    #[must_use]
    pub fn console() -> Self {
        let sprites = CONSOLE_SPRITES
            .iter()
            .map(|&(kind, top, bottom, foreground, background)| {
                let sprite = Sprite {
                    glyphs: [top.to_owned(), bottom.to_owned()],
                    style: Style::new(foreground, background),
                };
                (kind, sprite)
            })
            .collect();
        Self { sprites }
    }

    /// Console sprites with the overrides listed in the manifest at `path`.
    pub fn from_manifest_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read sprite manifest at {}", path.display()))?;
        Self::from_manifest_str(&contents)
            .with_context(|| format!("invalid sprite manifest {}", path.display()))
    }

    /// Console sprites with the overrides listed in a TOML manifest.
    pub fn from_manifest_str(contents: &str) -> Result<Self> {
        let manifest: Manifest =
            toml::from_str(contents).context("failed to parse sprite manifest toml contents")?;
        if manifest.version != SUPPORTED_MANIFEST_VERSION {
            bail!(
                "unsupported sprite manifest version {}; expected {}",
                manifest.version,
                SUPPORTED_MANIFEST_VERSION
            );
        }

        let mut sheet = Self::console();
        for (name, entry) in manifest.sprites {
            let Some(kind) = EntityKind::from_name(&name) else {
                bail!("unknown entity kind `{name}` in sprite manifest");
            };
            let fallback = sheet.sprite(kind).map(Sprite::style).unwrap_or_default();
            let style = Style::new(
                entry.foreground.unwrap_or(fallback.foreground),
                entry.background.unwrap_or(fallback.background),
            );
            let sprite = Sprite::new(entry.glyphs, style)
                .with_context(|| format!("invalid sprite for `{name}`"))?;
            let _ = sheet.sprites.insert(kind, sprite);
        }
        Ok(sheet)
    }

    /// Sprite drawn for `kind`.
    #[must_use]
    pub fn sprite(&self, kind: EntityKind) -> Option<&Sprite> {
        self.sprites.get(&kind)
    }
}

impl Default for SpriteSheet {
    fn default() -> Self {
        Self::console()
    }
}

#[derive(Debug, Deserialize)]
struct Manifest {
    version: u32,
    #[serde(default)]
    sprites: HashMap<String, ManifestSprite>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestSprite {
    glyphs: [String; CELL_HEIGHT],
    foreground: Option<Palette>,
    background: Option<Palette>,
}

/// A single styled character of a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    /// Character shown.
    pub glyph: char,
    /// Colours it is shown with.
    pub style: Style,
}

impl Cell {
    const fn blank(glyph: char) -> Self {
        Self {
            glyph,
            style: Style::new(Palette::White, Palette::Black),
        }
    }
}

/// A fully composed, boxed picture of a grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    width: usize,
    cells: Vec<Cell>,
}

impl Frame {
    fn boxed(width: usize, height: usize) -> Self {
        let mut cells = vec![Cell::blank(' '); width * height];
        for row in 0..height {
            for column in 0..width {
                let top_or_bottom = row == 0 || row + 1 == height;
                let side = column == 0 || column + 1 == width;
                let glyph = match (top_or_bottom, side) {
                    (true, true) => '+',
                    (true, false) => '-',
                    (false, true) => '|',
                    (false, false) => continue,
                };
                cells[row * width + column] = Cell::blank(glyph);
            }
        }
        Self { width, cells }
    }

    /// Characters per line, border included.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of lines, border included.
    #[must_use]
    pub fn height(&self) -> usize {
        self.cells.len() / self.width
    }

    /// Styled characters of every line, top first.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width)
    }

    /// Plain text of every line, top first.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.rows()
            .map(|row| row.iter().map(|cell| cell.glyph).collect())
            .collect()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Draws every entity of `grid` in load order, later entities on top.
#[must_use]
pub fn render(grid: &Grid, sheet: &SpriteSheet) -> Frame {
    let size = grid.size();
    let width = size.columns() as usize * CELL_WIDTH + 2;
    let height = size.rows() as usize * CELL_HEIGHT + 2;
    let mut frame = Frame::boxed(width, height);

    for entity in grid.entities() {
        let Some(sprite) = sheet.sprite(entity.kind()) else {
            continue;
        };
        let position = entity.position();
        let top = position.row() as usize * CELL_HEIGHT + 1;
        let left = position.column() as usize * CELL_WIDTH + 1;
        for (offset, row) in sprite.glyphs().iter().enumerate() {
            let start = (top + offset) * width + left;
            for (cell, glyph) in frame.cells[start..start + CELL_WIDTH]
                .iter_mut()
                .zip(row.chars())
            {
                *cell = Cell {
                    glyph,
                    style: sprite.style(),
                };
            }
        }
    }
    frame
}

const CONSOLE_SPRITES: [(EntityKind, &str, &str, Palette, Palette); 24] = [
    (EntityKind::Wall, "###", "###", Palette::Black, Palette::Grey),
    (EntityKind::TextWall, "WA ", " LL", Palette::Grey, Palette::Black),
    (EntityKind::Rock, " R ", "R R", Palette::Black, Palette::Yellow),
    (EntityKind::TextRock, "RO ", " CK", Palette::Yellow, Palette::Black),
    (EntityKind::Flag, "<#|", "  |", Palette::Yellow, Palette::Black),
    (EntityKind::TextFlag, "FL ", " AG", Palette::Yellow, Palette::Black),
    (EntityKind::Metal, "###", "###", Palette::Grey, Palette::Black),
    (EntityKind::TextMetal, "MET", " AL", Palette::Grey, Palette::Black),
    (EntityKind::Grass, " , ", "\" \"", Palette::Green, Palette::Black),
    (EntityKind::TextGrass, "GRA", " SS", Palette::Green, Palette::Black),
    (EntityKind::Water, "~ ~", " ~ ", Palette::White, Palette::Blue),
    (EntityKind::TextWater, "WAT", " ER", Palette::Blue, Palette::Black),
    (EntityKind::Lava, " ~ ", "~ ~", Palette::Yellow, Palette::Red),
    (EntityKind::TextLava, "LA ", " VA", Palette::Red, Palette::Black),
    (EntityKind::Baba, " @ ", " T ", Palette::White, Palette::Black),
    (EntityKind::TextBaba, "BA ", " BA", Palette::White, Palette::Black),
    (EntityKind::You, "YOU", "   ", Palette::Black, Palette::Magenta),
    (EntityKind::Stop, "ST ", " OP", Palette::Black, Palette::Magenta),
    (EntityKind::Push, "PU ", " SH", Palette::Black, Palette::Green),
    (EntityKind::Win, "WIN", "   ", Palette::Black, Palette::Yellow),
    (EntityKind::Kill, "KI ", " LL", Palette::Black, Palette::Red),
    (EntityKind::Sink, "SI ", " NK", Palette::Black, Palette::Blue),
    (EntityKind::Is, " I ", " S ", Palette::White, Palette::Black),
    (EntityKind::Best, "BE ", " ST", Palette::Black, Palette::Yellow),
];
