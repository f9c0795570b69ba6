use sweeper_core::{CellCount, Coord, GameConfig};
use thiserror::Error;

/// Largest board side the shell accepts.
pub const MAX_DIMENSION: Coord = 100;

pub const DEFAULT_PARAMS: BoardParams = BoardParams {
    width: 10,
    height: 10,
    bombs: 10,
};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ParamsError {
    #[error("Width must be an integer between 1 and {}", MAX_DIMENSION)]
    Width,
    #[error("Height must be an integer between 1 and {}", MAX_DIMENSION)]
    Height,
    #[error("Mine count must be an integer between 0 and {max}")]
    Bombs { max: CellCount },
    #[error("Width, height and mine count must be given together")]
    Incomplete,
}

/// New-game parameters as entered by the player.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BoardParams {
    pub width: Coord,
    pub height: Coord,
    pub bombs: CellCount,
}

impl BoardParams {
    pub fn validate(width: Coord, height: Coord, bombs: CellCount) -> Result<Self, ParamsError> {
        if !(1..=MAX_DIMENSION).contains(&width) {
            return Err(ParamsError::Width);
        }
        if !(1..=MAX_DIMENSION).contains(&height) {
            return Err(ParamsError::Height);
        }
        let cells = width * height;
        if !(0..cells).contains(&bombs) {
            return Err(ParamsError::Bombs { max: cells - 1 });
        }
        Ok(Self {
            width,
            height,
            bombs,
        })
    }

    /// Parameters from the command line, falling back to the defaults when absent or invalid.
    pub fn from_args(width: Option<Coord>, height: Option<Coord>, bombs: Option<CellCount>) -> Self {
        let params = match (width, height, bombs) {
            (None, None, None) => return DEFAULT_PARAMS,
            (Some(width), Some(height), Some(bombs)) => Self::validate(width, height, bombs),
            _ => Err(ParamsError::Incomplete),
        };

        params.unwrap_or_else(|err| {
            log::warn!("{}, using {}", err, DEFAULT_PARAMS);
            DEFAULT_PARAMS
        })
    }

    pub fn config(&self) -> sweeper_core::Result<GameConfig> {
        GameConfig::new((self.width, self.height), self.bombs)
    }
}

impl Default for BoardParams {
    fn default() -> Self {
        DEFAULT_PARAMS
    }
}

impl std::fmt::Display for BoardParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{} with {} mines", self.width, self.height, self.bombs)
    }
}
