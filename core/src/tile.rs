use serde::{Deserialize, Serialize};

/// What a tile hides: a mine, or the number of mines among its neighbors.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileValue {
    Mine,
    Adjacent(u8),
}

impl TileValue {
    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }
}

impl Default for TileValue {
    fn default() -> Self {
        Self::Adjacent(0)
    }
}

/// A single grid cell as tracked by the game state.
///
/// `revealed` and `flagged` are never both set.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    value: TileValue,
    revealed: bool,
    flagged: bool,
}

impl Tile {
    pub const fn new(value: TileValue) -> Self {
        Self {
            value,
            revealed: false,
            flagged: false,
        }
    }

    pub const fn value(self) -> TileValue {
        self.value
    }

    pub const fn is_mine(self) -> bool {
        self.value.is_mine()
    }

    pub const fn is_revealed(self) -> bool {
        self.revealed
    }

    pub const fn is_flagged(self) -> bool {
        self.flagged
    }

    /// Covered and unflagged, the only state the player can dig.
    pub const fn is_diggable(self) -> bool {
        !self.revealed && !self.flagged
    }

    pub(crate) fn reveal(&mut self) {
        self.revealed = true;
        self.flagged = false;
    }

    pub(crate) fn set_flagged(&mut self, flagged: bool) {
        debug_assert!(!self.revealed, "flagging a revealed tile");
        self.flagged = flagged;
    }
}
