//! Versioned wire form of a board
//!
//! The encoding is a small JSON object with the grid packed into one
//! digit string, one character per cell in row-major order:
//!
//! ```json
//! {"v":1,"size":3,"cells":"102000000","turn":2,"sound":true,"music":true}
//! ```
//!
//! Decoding is strict: wrong version, impossible size, wrong cell-string
//! length, stray characters or a bad turn number all reject the whole
//! snapshot. Callers treat a rejected snapshot like a missing one.

use serde::{Deserialize, Serialize};

use crate::board::{GameBoard, Player};
use crate::position::{MAX_SIZE, MIN_SIZE};

/// Bump when the encoding changes shape
pub const SNAPSHOT_VERSION: u32 = 1;

/// Everything needed to reconstruct a `GameBoard` exactly
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Format version
    pub v: u32,
    /// Side length
    pub size: usize,
    /// Row-major digits: '0' empty, '1' red, '2' blue
    pub cells: String,
    /// Player to move, 1 or 2
    pub turn: u8,
    pub sound: bool,
    pub music: bool,
}

impl Snapshot {
    /// Snapshot of a live board
    pub fn capture(board: &GameBoard) -> Self {
        let cells = board
            .cells()
            .iter()
            .map(|cell| match cell {
                None => '0',
                Some(Player::Red) => '1',
                Some(Player::Blue) => '2',
            })
            .collect();
        Self {
            v: SNAPSHOT_VERSION,
            size: board.size(),
            cells,
            turn: board.turn().number(),
            sound: board.sound_on(),
            music: board.music_on(),
        }
    }

    /// Compact JSON bytes
    pub fn encode(&self) -> Vec<u8> {
        // Plain data with string keys; serialization cannot fail
        serde_json::to_vec(self).unwrap_or_default()
    }

    /// Parse and validate; anything off returns None
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        let snapshot: Snapshot = serde_json::from_slice(bytes).ok()?;
        if snapshot.v != SNAPSHOT_VERSION {
            return None;
        }
        if snapshot.size < MIN_SIZE || snapshot.size > MAX_SIZE {
            return None;
        }
        if snapshot.cells.len() != snapshot.size * snapshot.size {
            return None;
        }
        if !snapshot.cells.bytes().all(|b| matches!(b, b'0'..=b'2')) {
            return None;
        }
        if snapshot.turn != 1 && snapshot.turn != 2 {
            return None;
        }
        Some(snapshot)
    }
}
