//! Translation of key presses and typed lines into commands.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use wordgrid_core::Command;

/// Maps a raw-mode key press to a command; unknown keys map to [`Command::None`].
pub(crate) fn command_for_key(key: KeyEvent) -> Command {
    match key.code {
        KeyCode::Up => Command::Up,
        KeyCode::Down => Command::Down,
        KeyCode::Left => Command::Left,
        KeyCode::Right => Command::Right,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Command::Quit,
        KeyCode::Char('r') => Command::Reset,
        KeyCode::Char('s') => Command::Save,
        KeyCode::Char('q') | KeyCode::Esc => Command::Quit,
        _ => Command::None,
    }
}

/// Maps one line of scripted input to a command.
pub(crate) fn command_for_line(line: &str) -> Command {
    match line.trim().to_ascii_lowercase().as_str() {
        "up" | "u" => Command::Up,
        "down" | "d" => Command::Down,
        "left" | "l" => Command::Left,
        "right" | "r" => Command::Right,
        "reset" => Command::Reset,
        "save" => Command::Save,
        "quit" => Command::Quit,
        _ => Command::None,
    }
}
