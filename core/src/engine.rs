use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - Playing -> Won
/// - Playing -> Lost
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Playing,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_game_over(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for GameStatus {
    fn default() -> Self {
        Self::Playing
    }
}

/// One game session: the tiles, the flag budget, and whether play has ended.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    tiles: Array2<Tile>,
    bombs: CellCount,
    remaining_flags: CellCount,
    status: GameStatus,
    hovered: Option<Coord2>,
    triggered_mine: Option<Coord2>,
}

impl GameState {
    /// Starts a game on a freshly generated board.
    pub fn new(width: Coord, height: Coord, bombs: CellCount) -> Result<Self> {
        let board = generate(width, height, bombs, &mut rand::rng())?;
        Ok(Self::from_board(board))
    }

    pub fn with_generator(config: GameConfig, generator: &mut impl BoardGenerator) -> Self {
        Self::from_board(generator.generate(config))
    }

    pub fn from_board(board: Board) -> Self {
        let bombs = board.bomb_count();
        log::debug!("New game: {:?}", board.game_config());
        Self {
            tiles: board.values().map(|&value| Tile::new(value)),
            bombs,
            remaining_flags: bombs,
            status: Default::default(),
            hovered: None,
            triggered_mine: None,
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_game_over(&self) -> bool {
        self.status.is_game_over()
    }

    /// `(width, height)`.
    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.tiles.dim();
        (cols.try_into().unwrap(), rows.try_into().unwrap())
    }

    pub fn total_bombs(&self) -> CellCount {
        self.bombs
    }

    pub fn remaining_flags(&self) -> CellCount {
        self.remaining_flags
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        in_bounds(coords, self.size())
    }

    pub fn tile_at(&self, coords: Coord2) -> Option<&Tile> {
        self.contains(coords).then(|| &self.tiles[coords.to_nd_index()])
    }

    pub fn hovered(&self) -> Option<Coord2> {
        self.hovered
    }

    pub fn hovered_tile(&self) -> Option<&Tile> {
        self.hovered.and_then(|coords| self.tile_at(coords))
    }

    /// The mine the player dug, set once the game is lost.
    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    /// Digs the tile at `coords`, returning [`RevealOutcome::HitMine`] when it was a mine.
    ///
    /// Out-of-bounds coordinates, finished games, and revealed or flagged tiles are ignored. Digging a tile with no
    /// adjacent mines opens its whole zero region along with the numbered tiles bordering it.
    pub fn reveal(&mut self, coords: Coord2) -> RevealOutcome {
        if self.is_game_over() {
            return RevealOutcome::NoChange;
        }
        let Some(&tile) = self.tile_at(coords) else {
            return RevealOutcome::NoChange;
        };
        if !tile.is_diggable() {
            return RevealOutcome::NoChange;
        }

        if tile.is_mine() {
            self.tiles[coords.to_nd_index()].reveal();
            self.triggered_mine = Some(coords);
            self.end_game(GameStatus::Lost);
            self.tiles.iter_mut().for_each(Tile::reveal);
            return RevealOutcome::HitMine;
        }

        let opened = self.flood_reveal(coords);
        log::debug!("Revealed {} tiles from {:?}", opened, coords);
        RevealOutcome::Revealed
    }

    /// Opens `start` and cascades through zero tiles. A tile that is already revealed (or flagged) stops the cascade,
    /// so each tile is pushed at most a few times and opened at most once.
    fn flood_reveal(&mut self, start: Coord2) -> usize {
        let mut opened = 0;
        let mut to_visit = vec![start];

        while let Some(coords) = to_visit.pop() {
            let tile = &mut self.tiles[coords.to_nd_index()];
            if !tile.is_diggable() {
                continue;
            }

            tile.reveal();
            opened += 1;
            log::trace!("Opened tile at {:?}: {:?}", coords, tile.value());

            if tile.value() == TileValue::Adjacent(0) {
                to_visit.extend(
                    self.tiles
                        .iter_neighbors(coords)
                        .filter(|&pos| self.tiles[pos.to_nd_index()].is_diggable()),
                );
            }
        }

        opened
    }

    /// Toggles the flag on a covered tile, spending or refunding one unit of the flag budget.
    ///
    /// Placing a flag with an empty budget does nothing; removing one always succeeds.
    pub fn flag(&mut self, coords: Coord2) -> MarkOutcome {
        if self.is_game_over() || !self.contains(coords) {
            return MarkOutcome::NoChange;
        }

        let tile = &mut self.tiles[coords.to_nd_index()];
        if tile.is_revealed() {
            MarkOutcome::NoChange
        } else if tile.is_flagged() {
            tile.set_flagged(false);
            self.remaining_flags += 1;
            MarkOutcome::Unflagged
        } else if self.remaining_flags > 0 {
            tile.set_flagged(true);
            self.remaining_flags -= 1;
            MarkOutcome::Flagged
        } else {
            MarkOutcome::NoChange
        }
    }

    /// Ends the game as won once every safe tile has been dug, regardless of where the flags are.
    ///
    /// A lost game stays lost even though the loss exposed every tile.
    pub fn check_for_win(&mut self) -> bool {
        match self.status {
            GameStatus::Won => return true,
            GameStatus::Lost => return false,
            GameStatus::Playing => {}
        }

        let covered_safe = self
            .tiles
            .iter()
            .filter(|tile| !tile.is_mine() && !tile.is_revealed())
            .count();

        if covered_safe == 0 {
            self.end_game(GameStatus::Won);
            true
        } else {
            false
        }
    }

    /// Tracks the tile under the pointer for rendering; cleared when out of bounds or after the game ended.
    pub fn hover(&mut self, coords: Coord2) {
        self.hovered = (!self.is_game_over() && self.contains(coords)).then_some(coords);
    }

    fn end_game(&mut self, status: GameStatus) {
        debug_assert!(status.is_game_over());
        if self.status.is_game_over() {
            return;
        }

        self.status = status;
        self.hovered = None;
        log::debug!("Game ended: {:?}", status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn game(size: Coord2, mines: &[Coord2]) -> GameState {
        GameState::from_board(Board::from_mine_coords(size, mines).unwrap())
    }

    fn revealed(game: &GameState) -> Vec<Coord2> {
        let (width, height) = game.size();
        (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .filter(|&pos| game.tile_at(pos).unwrap().is_revealed())
            .collect()
    }

    #[test]
    fn new_game_starts_covered_with_full_flag_budget() {
        let game = GameState::new(8, 6, 10).unwrap();

        assert_eq!(game.size(), (8, 6));
        assert_eq!(game.remaining_flags(), 10);
        assert_eq!(game.total_bombs(), 10);
        assert_eq!(game.status(), GameStatus::Playing);
        assert!(revealed(&game).is_empty());
    }

    #[test]
    fn new_game_rejects_invalid_parameters() {
        assert!(matches!(
            GameState::new(3, 3, 9),
            Err(GameError::InvalidParameters { .. })
        ));
        assert!(GameState::new(0, 3, 0).is_err());
    }

    #[test]
    fn single_tile_without_mines_is_won_after_one_reveal() {
        let mut game = GameState::new(1, 1, 0).unwrap();

        assert_eq!(game.tile_at((0, 0)).unwrap().value(), TileValue::Adjacent(0));
        assert_eq!(game.reveal((0, 0)), RevealOutcome::Revealed);
        assert!(game.tile_at((0, 0)).unwrap().is_revealed());
        assert!(game.check_for_win());
        assert!(game.is_game_over());
        assert_eq!(game.status(), GameStatus::Won);
    }

    #[test]
    fn numbered_tile_reveals_only_itself() {
        let mut game = game((3, 3), &[(0, 0)]);

        assert_eq!(game.tile_at((1, 1)).unwrap().value(), TileValue::Adjacent(1));
        assert!(!game.reveal((1, 1)).hit_mine());
        assert_eq!(revealed(&game), vec![(1, 1)]);
        assert!(!game.check_for_win());
    }

    #[test]
    fn zero_tile_cascades_but_never_opens_the_mine() {
        let mut game = game((3, 3), &[(0, 0)]);

        assert_eq!(game.reveal((2, 2)), RevealOutcome::Revealed);

        let opened = revealed(&game);
        assert_eq!(opened.len(), 8);
        for pos in [(1, 2), (2, 1), (1, 1)] {
            assert!(opened.contains(&pos));
        }
        assert!(!game.tile_at((0, 0)).unwrap().is_revealed());
        assert!(game.check_for_win());
    }

    #[test]
    fn cascade_stops_at_numbered_ring() {
        // 5x1 strip with a mine in the middle: left region stays closed off
        let mut game = game((5, 1), &[(2, 0)]);

        game.reveal((4, 0));

        assert_eq!(revealed(&game), vec![(3, 0), (4, 0)]);
        assert_eq!(game.status(), GameStatus::Playing);
    }

    #[test]
    fn cascade_opens_connected_zero_region_and_border_only() {
        // Wall of mines in column 2 separates the board into two regions.
        let mines = [(2, 0), (2, 1), (2, 2), (2, 3)];
        let mut game = game((5, 4), &mines);

        game.reveal((0, 0));

        let opened = revealed(&game);
        let expected: Vec<Coord2> = (0..4).flat_map(|y| [(0, y), (1, y)]).collect();
        assert_eq!(opened.len(), expected.len());
        assert!(expected.iter().all(|pos| opened.contains(pos)));
        assert!(!opened.iter().any(|&(x, _)| x >= 2));
    }

    #[test]
    fn cascade_skips_flagged_tiles() {
        let mut game = game((6, 1), &[(5, 0)]);

        assert_eq!(game.flag((2, 0)), MarkOutcome::Flagged);
        game.reveal((0, 0));

        assert_eq!(revealed(&game), vec![(0, 0), (1, 0)]);
        assert!(game.tile_at((2, 0)).unwrap().is_flagged());
        assert!(!game.check_for_win());
    }

    #[test]
    fn hitting_mine_exposes_board_and_ends_game() {
        let mut game = game((3, 3), &[(0, 0), (2, 2)]);
        game.flag((1, 1));

        assert!(game.reveal((0, 0)).hit_mine());
        assert!(game.is_game_over());
        assert_eq!(game.status(), GameStatus::Lost);
        assert_eq!(game.triggered_mine(), Some((0, 0)));
        assert_eq!(revealed(&game).len(), 9);
        assert!(!game.tile_at((1, 1)).unwrap().is_flagged());
    }

    #[test]
    fn moves_after_loss_are_ignored() {
        let mut game = game((3, 3), &[(0, 0)]);
        game.reveal((0, 0));

        assert_eq!(game.reveal((2, 2)), RevealOutcome::NoChange);
        assert!(!game.reveal((0, 0)).hit_mine());
        assert_eq!(game.flag((1, 1)), MarkOutcome::NoChange);
        assert!(!game.check_for_win());
        assert_eq!(game.status(), GameStatus::Lost);
    }

    #[test]
    fn moves_after_win_are_ignored() {
        let mut game = game((2, 1), &[(0, 0)]);
        game.reveal((1, 0));
        assert!(game.check_for_win());

        assert_eq!(game.reveal((0, 0)), RevealOutcome::NoChange);
        assert_eq!(game.flag((0, 0)), MarkOutcome::NoChange);
        assert!(game.check_for_win());
    }

    #[test]
    fn reveal_ignores_out_of_bounds_and_repeated_digs() {
        let mut game = game((3, 3), &[(0, 0)]);

        assert_eq!(game.reveal((-1, 0)), RevealOutcome::NoChange);
        assert_eq!(game.reveal((0, 3)), RevealOutcome::NoChange);
        assert_eq!(game.reveal((3, 0)), RevealOutcome::NoChange);
        assert_eq!(game.reveal((1, 1)), RevealOutcome::Revealed);
        assert_eq!(game.reveal((1, 1)), RevealOutcome::NoChange);
        assert_eq!(revealed(&game), vec![(1, 1)]);
    }

    #[test]
    fn flagged_tile_cannot_be_dug() {
        let mut game = game((2, 2), &[(0, 0)]);

        assert_eq!(game.flag((0, 0)), MarkOutcome::Flagged);
        assert_eq!(game.reveal((0, 0)), RevealOutcome::NoChange);
        assert_eq!(game.status(), GameStatus::Playing);
    }

    #[test]
    fn flag_budget_is_spent_and_refunded() {
        let mut game = game((3, 3), &[(0, 0)]);

        assert_eq!(game.flag((2, 2)), MarkOutcome::Flagged);
        assert_eq!(game.remaining_flags(), 0);
        assert_eq!(game.flag((1, 1)), MarkOutcome::NoChange);
        assert!(!game.tile_at((1, 1)).unwrap().is_flagged());

        assert_eq!(game.flag((2, 2)), MarkOutcome::Unflagged);
        assert_eq!(game.remaining_flags(), 1);
        assert_eq!(game.flag((1, 1)), MarkOutcome::Flagged);
        assert_eq!(game.remaining_flags(), 0);
    }

    #[test]
    fn flag_ignores_revealed_and_out_of_bounds_tiles() {
        let mut game = game((3, 3), &[(0, 0)]);
        game.reveal((1, 1));

        assert_eq!(game.flag((1, 1)), MarkOutcome::NoChange);
        assert_eq!(game.flag((-1, 2)), MarkOutcome::NoChange);
        assert_eq!(game.flag((3, 3)), MarkOutcome::NoChange);
        assert_eq!(game.remaining_flags(), 1);
    }

    #[test]
    fn flag_and_hover_accept_column_and_row_zero() {
        let mut game = game((3, 3), &[(2, 2)]);

        assert_eq!(game.flag((0, 0)), MarkOutcome::Flagged);
        game.hover((0, 0));
        assert_eq!(game.hovered(), Some((0, 0)));
    }

    #[test]
    fn win_does_not_depend_on_flags() {
        let mut game = game((2, 2), &[(0, 0)]);
        game.flag((1, 1));
        game.reveal((1, 0));
        game.reveal((0, 1));
        assert!(!game.check_for_win());

        game.flag((1, 1));
        game.reveal((1, 1));
        assert!(game.check_for_win());
        assert_eq!(game.status(), GameStatus::Won);
    }

    #[test]
    fn hover_tracks_tile_without_changing_it() {
        let mut game = game((3, 3), &[(0, 0)]);

        game.hover((1, 2));
        assert_eq!(game.hovered(), Some((1, 2)));
        let tile = game.hovered_tile().unwrap();
        assert!(!tile.is_revealed() && !tile.is_flagged());

        game.hover((5, 1));
        assert_eq!(game.hovered(), None);
        game.hover((1, -1));
        assert_eq!(game.hovered_tile(), None);
    }

    #[test]
    fn hover_is_cleared_after_game_over() {
        let mut game = game((2, 2), &[(0, 0)]);
        game.hover((1, 1));
        game.reveal((0, 0));

        assert_eq!(game.hovered(), None);
        game.hover((1, 1));
        assert_eq!(game.hovered(), None);
    }

    #[test]
    fn generated_game_can_be_won_by_digging_every_safe_tile() {
        let config = GameConfig::new((12, 9), 15).unwrap();
        let mut generator = ShuffleGenerator::new(StdRng::seed_from_u64(42));
        let mut game = GameState::with_generator(config, &mut generator);
        let (width, height) = game.size();

        for y in 0..height {
            for x in 0..width {
                if !game.tile_at((x, y)).unwrap().is_mine() {
                    assert!(!game.reveal((x, y)).hit_mine());
                }
            }
        }

        assert!(game.check_for_win());
        assert_eq!(
            revealed(&game).len(),
            usize::try_from(config.total_cells() - config.bombs()).unwrap()
        );
    }

    #[test]
    fn large_open_board_floods_completely() {
        let mut game = game((200, 200), &[]);

        assert_eq!(game.reveal((100, 100)), RevealOutcome::Revealed);
        assert_eq!(revealed(&game).len(), 200 * 200);
        assert!(game.check_for_win());
    }
}
