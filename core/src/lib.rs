use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use engine::*;
pub use error::*;
pub use generator::*;
pub use tile::*;
pub use types::*;
pub use view::*;

mod engine;
mod error;
mod generator;
mod tile;
mod types;
mod view;

/// Board dimensions and mine count, validated so that `0 <= bombs < width * height`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGameConfig")]
pub struct GameConfig {
    size: Coord2,
    bombs: CellCount,
}

#[derive(Deserialize)]
struct RawGameConfig {
    size: Coord2,
    bombs: CellCount,
}

impl TryFrom<RawGameConfig> for GameConfig {
    type Error = GameError;

    fn try_from(raw: RawGameConfig) -> Result<Self> {
        Self::new(raw.size, raw.bombs)
    }
}

impl GameConfig {
    pub(crate) const fn new_unchecked(size: Coord2, bombs: CellCount) -> Self {
        Self { size, bombs }
    }

    pub fn new((width, height): Coord2, bombs: CellCount) -> Result<Self> {
        let invalid = GameError::InvalidParameters {
            width,
            height,
            bombs,
        };
        if width <= 0 || height <= 0 {
            return Err(invalid);
        }
        let total = mult(width, height).ok_or(invalid)?;
        if !(0..total).contains(&bombs) {
            return Err(invalid);
        }
        Ok(Self::new_unchecked((width, height), bombs))
    }

    /// `(width, height)`.
    pub const fn size(&self) -> Coord2 {
        self.size
    }

    pub const fn width(&self) -> Coord {
        self.size.0
    }

    pub const fn height(&self) -> Coord {
        self.size.1
    }

    pub const fn bombs(&self) -> CellCount {
        self.bombs
    }

    pub const fn total_cells(&self) -> CellCount {
        self.size.0 * self.size.1
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new_unchecked((10, 10), 10)
    }
}

/// The hidden layout of a game: a mine or adjacency count for every tile.
///
/// Always leaves at least one safe tile.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Board {
    values: Array2<TileValue>,
    bombs: CellCount,
}

impl Board {
    /// Builds a board from a row-major `[row, col]` mine mask, deriving every adjacency count.
    ///
    /// Fails with [`GameError::InvalidParameters`] for an empty mask or one without a safe tile.
    pub fn from_mine_mask(mine_mask: &Array2<bool>) -> Result<Self> {
        let (rows, cols) = mine_mask.dim();
        let bombs = mine_mask.iter().filter(|&&mine| mine).count();
        if bombs >= mine_mask.len() {
            return Err(GameError::InvalidParameters {
                width: cols.try_into().unwrap_or(Coord::MAX),
                height: rows.try_into().unwrap_or(Coord::MAX),
                bombs: bombs.try_into().unwrap_or(CellCount::MAX),
            });
        }
        Ok(Self::from_mine_mask_unchecked(mine_mask))
    }

    /// Caller guarantees the mask is non-empty and has a safe tile.
    pub(crate) fn from_mine_mask_unchecked(mine_mask: &Array2<bool>) -> Self {
        let mut bombs = 0;
        let values = Array2::from_shape_fn(mine_mask.dim(), |(row, col)| {
            if mine_mask[(row, col)] {
                bombs += 1;
                TileValue::Mine
            } else {
                let coords = (col as Coord, row as Coord);
                let count = mine_mask
                    .iter_neighbors(coords)
                    .filter(|&pos| mine_mask[pos.to_nd_index()])
                    .count();
                TileValue::Adjacent(count.try_into().unwrap())
            }
        });

        Self { values, bombs }
    }

    /// Duplicate coordinates count once.
    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        if size.0 <= 0 || size.1 <= 0 {
            return Err(GameError::InvalidParameters {
                width: size.0,
                height: size.1,
                bombs: mine_coords.len().try_into().unwrap_or(CellCount::MAX),
            });
        }
        let mut mine_mask: Array2<bool> = Array2::default((size.1 as usize, size.0 as usize));

        for &coords in mine_coords {
            if !in_bounds(coords, size) {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Self::from_mine_mask(&mine_mask)
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.size(), self.bombs)
    }

    /// `(width, height)`.
    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.values.dim();
        (cols.try_into().unwrap(), rows.try_into().unwrap())
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        in_bounds(coords, self.size())
    }

    pub fn value_at(&self, coords: Coord2) -> Option<TileValue> {
        self.contains(coords).then(|| self[coords])
    }

    pub fn bomb_count(&self) -> CellCount {
        self.bombs
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.bombs
    }

    pub fn total_cells(&self) -> CellCount {
        self.values.len().try_into().unwrap()
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.values.iter_neighbors(coords)
    }

    /// All tile values in row-major order together with their `(col, row)` coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (Coord2, TileValue)> + '_ {
        self.values
            .indexed_iter()
            .map(|((row, col), &value)| ((col as Coord, row as Coord), value))
    }

    pub(crate) fn values(&self) -> &Array2<TileValue> {
        &self.values
    }
}

impl Index<Coord2> for Board {
    type Output = TileValue;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.values[coords.to_nd_index()]
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Flagged,
    Unflagged,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }

    /// The loss flag: whether this reveal dug a mine and ended the game.
    pub const fn hit_mine(self) -> bool {
        matches!(self, Self::HitMine)
    }
}
