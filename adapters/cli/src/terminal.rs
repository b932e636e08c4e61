//! Observers that draw the settled grid.

use std::io::{self, Write};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use wordgrid_rendering::{render, Palette, SpriteSheet};
use wordgrid_system_session::Observer;
use wordgrid_world::{query, World};

/// Keeps the terminal in raw mode on the alternate screen until dropped.
pub(crate) struct RawTerminal;

impl RawTerminal {
    pub(crate) fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        if let Err(error) = execute!(io::stdout(), EnterAlternateScreen, Hide) {
            let _ = terminal::disable_raw_mode();
            return Err(error);
        }
        Ok(Self)
    }
}

impl Drop for RawTerminal {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Draws coloured frames in place on a raw terminal.
pub(crate) struct TerminalView {
    sheet: SpriteSheet,
}

impl TerminalView {
    pub(crate) fn new(sheet: SpriteSheet) -> Self {
        Self { sheet }
    }

    fn draw(&self, world: &World) -> io::Result<()> {
        let frame = render(query::grid(world), &self.sheet);
        let mut out = io::stdout().lock();
        queue!(out, Clear(ClearType::All))?;
        for (index, row) in frame.rows().enumerate() {
            queue!(out, MoveTo(0, screen_row(index)))?;
            for cell in row {
                queue!(
                    out,
                    SetForegroundColor(color(cell.style.foreground)),
                    SetBackgroundColor(color(cell.style.background)),
                    Print(cell.glyph)
                )?;
            }
            queue!(out, ResetColor)?;
        }
        queue!(
            out,
            MoveTo(0, screen_row(frame.height())),
            Print(status_line(world))
        )?;
        out.flush()
    }
}

impl Observer for TerminalView {
    fn settled(&mut self, world: &World) {
        if let Err(error) = self.draw(world) {
            log::warn!("failed to draw frame: {error}");
        }
    }
}

/// Prints plain frames one after another, for scripted play.
pub(crate) struct LineView {
    sheet: SpriteSheet,
}

impl LineView {
    pub(crate) fn new(sheet: SpriteSheet) -> Self {
        Self { sheet }
    }
}

impl Observer for LineView {
    fn settled(&mut self, world: &World) {
        let frame = render(query::grid(world), &self.sheet);
        let mut out = io::stdout().lock();
        if let Err(error) = write!(out, "{frame}{}\n\n", status_line(world)) {
            log::warn!("failed to print frame: {error}");
        }
    }
}

fn status_line(world: &World) -> String {
    let player = match query::player(world) {
        Some(kind) => format!("{kind} is you"),
        None => "nothing is you".to_owned(),
    };
    if query::is_game_over(world) {
        format!("{player} | game over")
    } else {
        format!("{player} | arrows move, r reset, s save, q quit")
    }
}

fn screen_row(index: usize) -> u16 {
    u16::try_from(index).unwrap_or(u16::MAX)
}

fn color(palette: Palette) -> Color {
    match palette {
        Palette::Black => Color::Black,
        Palette::Red => Color::DarkRed,
        Palette::Green => Color::DarkGreen,
        Palette::Yellow => Color::DarkYellow,
        Palette::Blue => Color::DarkBlue,
        Palette::Magenta => Color::DarkMagenta,
        Palette::Cyan => Color::DarkCyan,
        Palette::White => Color::Grey,
        Palette::Grey => Color::DarkGrey,
    }
}
