use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::*;

/// Generation strategy that fills the first `bombs` cells of the row-major tile sequence and then applies a uniform
/// permutation, so every arrangement of mines is equally likely.
#[derive(Clone, Debug)]
pub struct ShuffleGenerator<R> {
    rng: R,
}

impl<R: Rng> ShuffleGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl ShuffleGenerator<StdRng> {
    /// Reproducible generator, same seed gives the same sequence of boards.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Freshly seeded from the operating system.
    pub fn from_os_rng() -> Self {
        Self::new(StdRng::from_os_rng())
    }
}

impl<R: Rng> BoardGenerator for ShuffleGenerator<R> {
    fn generate(&mut self, config: GameConfig) -> Board {
        shuffled_board(config, &mut self.rng)
    }
}

pub(crate) fn shuffled_board<R: Rng + ?Sized>(config: GameConfig, rng: &mut R) -> Board {
    let (width, height) = config.size();

    let mut mines: Array2<bool> = Array2::default((height as usize, width as usize));
    {
        let cells = mines.as_slice_mut().expect("layout should be standard");
        cells[..config.bombs() as usize].fill(true);
        cells.shuffle(rng);
    }

    let board = Board::from_mine_mask_unchecked(&mines);
    log::debug!(
        "Generated {}x{} board with {} mines",
        width,
        height,
        board.bomb_count()
    );
    board
}
