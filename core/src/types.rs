use ndarray::Array2;

/// Single coordinate axis used for board width, height, and positions.
///
/// Signed so that positions derived from pointer input can land outside the board (including left of or above it)
/// and still be handed to the engine, which ignores them.
pub type Coord = i32;

/// Count type used for mine counts, flag budgets, and total-cell counts.
pub type CellCount = i32;

/// Two-dimensional coordinates `(col, row)`.
pub type Coord2 = (Coord, Coord);

/// Maps in-bounds `(col, row)` coordinates to a row-major `[row, col]` array index.
pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        debug_assert!(self.0 >= 0 && self.1 >= 0, "negative coords {self:?}");
        [self.1 as usize, self.0 as usize]
    }
}

/// Total cell count of a `width × height` board, `None` on overflow.
pub const fn mult(a: Coord, b: Coord) -> Option<CellCount> {
    a.checked_mul(b)
}

/// Whether `coords` lies within `[0, size.0) × [0, size.1)`.
pub const fn in_bounds(coords: Coord2, size: Coord2) -> bool {
    coords.0 >= 0 && coords.0 < size.0 && coords.1 >= 0 && coords.1 < size.1
}

pub trait NeighborIterExt {
    fn iter_neighbors(&self, index: Coord2) -> NeighborIter;
}

impl<T> NeighborIterExt for Array2<T> {
    fn iter_neighbors(&self, index: Coord2) -> NeighborIter {
        let (rows, cols) = self.dim();
        let size = (cols.try_into().unwrap(), rows.try_into().unwrap());
        NeighborIter::new(index, size)
    }
}

const DISPLACEMENTS: [(Coord, Coord); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Applies `delta` to `coords`, returning a value only when it remains in bounds.
fn apply_delta(coords: Coord2, delta: (Coord, Coord), bounds: Coord2) -> Option<Coord2> {
    let next = (
        coords.0.checked_add(delta.0)?,
        coords.1.checked_add(delta.1)?,
    );
    in_bounds(next, bounds).then_some(next)
}

/// Iterates the up to 8 in-bounds neighbors (Chebyshev distance 1) of a coordinate.
#[derive(Debug)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Coord2,
    index: u8,
}

impl NeighborIter {
    pub fn new(center: Coord2, bounds: Coord2) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if usize::from(self.index) >= DISPLACEMENTS.len() {
                return None;
            }

            let next_item =
                apply_delta(self.center, DISPLACEMENTS[self.index as usize], self.bounds);
            self.index += 1;

            if next_item.is_some() {
                return next_item;
            }
        }
    }
}
