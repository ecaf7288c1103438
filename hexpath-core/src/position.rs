//! Board geometry: linear cell ids and hex adjacency on the rhombus

/// Smallest playable side length
pub const MIN_SIZE: usize = 3;

/// Largest playable side length
pub const MAX_SIZE: usize = 11;

/// A cell on the board, row-major
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardPosition {
    pub row: usize,
    pub col: usize,
}

/// Neighbor offsets (drow, dcol) on the sheared hex grid
/// Index: 0=E, 1=SE, 2=SW, 3=W, 4=NW, 5=NE
pub const NEIGHBOR_OFFSETS: [(i32, i32); 6] = [
    (0, 1),   // E
    (1, 0),   // SE
    (1, -1),  // SW
    (0, -1),  // W
    (-1, 0),  // NW
    (-1, 1),  // NE
];

impl BoardPosition {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Position of a linear cell id on a board `size` cells wide
    pub fn from_id(id: usize, size: usize) -> Self {
        Self {
            row: id / size,
            col: id % size,
        }
    }

    /// Linear cell id on a board `size` cells wide
    pub fn id(&self, size: usize) -> usize {
        self.row * size + self.col
    }

    /// Check if this position is on a `size` x `size` board
    pub fn is_valid(&self, size: usize) -> bool {
        self.row < size && self.col < size
    }

    /// In-bounds hex neighbors on a `size` x `size` board
    pub fn neighbors(&self, size: usize) -> impl Iterator<Item = BoardPosition> {
        let row = self.row as i32;
        let col = self.col as i32;
        let side = size as i32;
        NEIGHBOR_OFFSETS.iter().filter_map(move |&(drow, dcol)| {
            let r = row + drow;
            let c = col + dcol;
            if r >= 0 && r < side && c >= 0 && c < side {
                Some(BoardPosition::new(r as usize, c as usize))
            } else {
                None
            }
        })
    }
}
