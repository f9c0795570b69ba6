use serde::{Deserialize, Serialize};

use crate::*;

/// How a renderer should draw a single tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileView {
    Hidden,
    Hovered,
    Flagged,
    Revealed(u8),
    /// A mine exposed when the game was lost.
    Mine,
    /// The mine the player dug.
    TriggeredMine,
}

/// Player-visible snapshot of a game, rows top to bottom.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardView {
    pub size: Coord2,
    pub remaining_flags: CellCount,
    pub status: GameStatus,
    pub rows: Vec<Vec<TileView>>,
}

impl GameState {
    pub fn view_at(&self, coords: Coord2) -> Option<TileView> {
        let tile = self.tile_at(coords)?;

        Some(match (tile.is_revealed(), tile.value()) {
            (true, TileValue::Mine) if self.triggered_mine() == Some(coords) => {
                TileView::TriggeredMine
            }
            (true, TileValue::Mine) => TileView::Mine,
            (true, TileValue::Adjacent(count)) => TileView::Revealed(count),
            (false, _) if tile.is_flagged() => TileView::Flagged,
            (false, _) if self.hovered() == Some(coords) => TileView::Hovered,
            (false, _) => TileView::Hidden,
        })
    }

    pub fn view(&self) -> BoardView {
        let (width, height) = self.size();
        let rows = (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| self.view_at((x, y)).unwrap_or(TileView::Hidden))
                    .collect()
            })
            .collect();

        BoardView {
            size: (width, height),
            remaining_flags: self.remaining_flags(),
            status: self.status(),
            rows,
        }
    }
}
