use std::str::FromStr;

use sweeper_core::{Coord, Coord2};
use thiserror::Error;

use crate::settings::{BoardParams, ParamsError};

/// Side length of a tile in pointer units.
pub const TILE_SIZE: Coord = 30;

/// Maps a pointer position to the tile under it. Positions left of or above the board map to negative cells.
pub const fn pointer_to_cell(px: Coord, py: Coord) -> Coord2 {
    (px.div_euclid(TILE_SIZE), py.div_euclid(TILE_SIZE))
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Button {
    Left,
    Right,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Dig(Coord2),
    Flag(Coord2),
    Hover(Coord2),
    Click { cell: Coord2, button: Button },
    New(Option<BoardParams>),
    Restart,
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command {0:?}, expected dig, flag, hover, click, move, new, restart or quit")]
    Unknown(String),
    #[error("Missing {0}")]
    MissingArgument(&'static str),
    #[error("Expected an integer, got {0:?}")]
    InvalidNumber(String),
    #[error("Unknown button {0:?}, expected left or right")]
    InvalidButton(String),
    #[error("Unexpected trailing input {0:?}")]
    TrailingInput(String),
    #[error(transparent)]
    Params(#[from] ParamsError),
}

struct Words<'a>(std::str::SplitWhitespace<'a>);

impl Words<'_> {
    fn next_number(&mut self, name: &'static str) -> Result<Coord, CommandError> {
        let word = self.0.next().ok_or(CommandError::MissingArgument(name))?;
        word.parse().map_err(|_| CommandError::InvalidNumber(word.to_string()))
    }

    fn next_pair(&mut self, x: &'static str, y: &'static str) -> Result<Coord2, CommandError> {
        Ok((self.next_number(x)?, self.next_number(y)?))
    }

    fn finish<T>(mut self, value: T) -> Result<T, CommandError> {
        match self.0.next() {
            Some(word) => Err(CommandError::TrailingInput(word.to_string())),
            None => Ok(value),
        }
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = Words(line.split_whitespace());
        let Some(name) = words.0.next() else {
            return Err(CommandError::MissingArgument("command"));
        };

        let command = match name.to_ascii_lowercase().as_str() {
            "dig" | "d" => Command::Dig(words.next_pair("column", "row")?),
            "flag" | "f" => Command::Flag(words.next_pair("column", "row")?),
            "hover" | "h" => Command::Hover(words.next_pair("column", "row")?),
            "move" | "m" => {
                let (px, py) = words.next_pair("pointer x", "pointer y")?;
                Command::Hover(pointer_to_cell(px, py))
            }
            "click" | "c" => {
                let (px, py) = words.next_pair("pointer x", "pointer y")?;
                let button = match words.0.next() {
                    None => Button::Left,
                    Some(word) if word.eq_ignore_ascii_case("left") => Button::Left,
                    Some(word) if word.eq_ignore_ascii_case("right") => Button::Right,
                    Some(word) => return Err(CommandError::InvalidButton(word.to_string())),
                };
                Command::Click {
                    cell: pointer_to_cell(px, py),
                    button,
                }
            }
            "new" | "n" => match words.0.clone().next() {
                None => Command::New(None),
                Some(_) => {
                    let width = words.next_number("width")?;
                    let height = words.next_number("height")?;
                    let bombs = words.next_number("mine count")?;
                    Command::New(Some(BoardParams::validate(width, height, bombs)?))
                }
            },
            "restart" | "r" => Command::Restart,
            "quit" | "q" | "exit" => Command::Quit,
            _ => return Err(CommandError::Unknown(name.to_string())),
        };

        words.finish(command)
    }
}
