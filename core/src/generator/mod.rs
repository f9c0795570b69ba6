use crate::*;
use rand::Rng;
pub use shuffle::*;

mod shuffle;

pub trait BoardGenerator {
    fn generate(&mut self, config: GameConfig) -> Board;
}

/// Validates the parameters and generates a board with mines shuffled by `rng`.
pub fn generate<R: Rng + ?Sized>(
    width: Coord,
    height: Coord,
    bombs: CellCount,
    rng: &mut R,
) -> Result<Board> {
    let config = GameConfig::new((width, height), bombs)?;
    Ok(shuffled_board(config, rng))
}
