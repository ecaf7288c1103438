//! Pluggable move suppliers for non-human players

use rand::seq::IteratorRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::board::{GameBoard, GameResult};

/// Something that can pick the next cell for the player to move
pub trait MoveSource {
    /// Linear id of the cell to play, or None when no move is available
    fn next_move(&mut self, board: &GameBoard) -> Option<usize>;
}

/// Uniform choice over the empty cells
pub struct RandomSource {
    rng: ChaCha8Rng,
}

impl RandomSource {
    /// Seeded for reproducibility, or from entropy
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self { rng }
    }
}

impl MoveSource for RandomSource {
    fn next_move(&mut self, board: &GameBoard) -> Option<usize> {
        if board.check_result() != GameResult::Undecided {
            return None;
        }
        (0..board.cells().len())
            .filter(|&id| board.cell(id).is_none())
            .choose(&mut self.rng)
    }
}
