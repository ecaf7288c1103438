//! Game state: stones, turn order, win detection, snapshots

use crate::connect::{Edge, Links};
use crate::position::{BoardPosition, MAX_SIZE, MIN_SIZE};
use crate::snapshot::Snapshot;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Stone color; Red moves first
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    Red,
    Blue,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::Red => Player::Blue,
            Player::Blue => Player::Red,
        }
    }

    /// Player number as shown to users and stored on disk: Red 1, Blue 2
    pub fn number(self) -> u8 {
        match self {
            Player::Red => 1,
            Player::Blue => 2,
        }
    }
}

/// Game result; once decided it never reverts
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameResult {
    Undecided,
    RedWins,
    BlueWins,
}

/// One cell of the grid
pub type Cell = Option<Player>;

// ============================================================================
// GAME BOARD
// ============================================================================

/// Hex board state (dense row-major grid)
///
/// Red tries to connect the top row to the bottom row, Blue the left
/// column to the right column. Connectivity is tracked incrementally,
/// so win checks stay cheap no matter how full the board is.
#[derive(Clone, Debug)]
pub struct GameBoard {
    /// Cells in row-major order, `size * size` of them
    cells: Vec<Cell>,

    /// Side length
    size: usize,

    /// Player to move
    turn: Player,

    /// Audio preferences; carried along but never consulted by game logic
    sound_on: bool,
    music_on: bool,

    /// Stone connectivity including the four edge terminals
    links: Links,
}

impl GameBoard {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Fresh empty board; `size` is clamped to the playable range
    pub fn new(size: usize, sound_on: bool, music_on: bool) -> Self {
        let size = size.clamp(MIN_SIZE, MAX_SIZE);
        Self {
            cells: vec![None; size * size],
            size,
            turn: Player::Red,
            sound_on,
            music_on,
            links: Links::new(size),
        }
    }

    /// The board handed out when nothing can be restored
    pub fn default_sized(sound_on: bool, music_on: bool) -> Self {
        Self::new(MAX_SIZE, sound_on, music_on)
    }

    /// Fresh board at `new_size`, audio flags carried over
    pub fn resize(&self, new_size: usize) -> Self {
        Self::new(new_size, self.sound_on, self.music_on)
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    /// Side length
    pub fn size(&self) -> usize {
        self.size
    }

    /// Player to move
    pub fn turn(&self) -> Player {
        self.turn
    }

    /// Cell contents by linear id; out-of-range reads as empty
    pub fn cell(&self, id: usize) -> Cell {
        self.cells.get(id).copied().flatten()
    }

    /// All cells in row-major order
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn sound_on(&self) -> bool {
        self.sound_on
    }

    pub fn music_on(&self) -> bool {
        self.music_on
    }

    /// Current result; query only, never mutates
    pub fn check_result(&self) -> GameResult {
        if self.links.edges_linked(Edge::Top, Edge::Bottom) {
            GameResult::RedWins
        } else if self.links.edges_linked(Edge::Left, Edge::Right) {
            GameResult::BlueWins
        } else {
            GameResult::Undecided
        }
    }

    // ========================================================================
    // APPLY MOVE
    // ========================================================================

    /// Place a stone for the player to move.
    ///
    /// Moves on decided games, occupied cells or off-board positions are
    /// silently ignored; the return value reports whether the board changed.
    /// An accepted move records the stone, links it to same-color neighbors
    /// and any goal edge it sits on, then passes the turn - even when the
    /// move just won the game.
    pub fn play(&mut self, pos: BoardPosition) -> bool {
        if self.check_result() != GameResult::Undecided {
            return false;
        }
        if !pos.is_valid(self.size) {
            return false;
        }
        let id = pos.id(self.size);
        if self.cells[id].is_some() {
            return false;
        }

        let player = self.turn;
        self.cells[id] = Some(player);

        for neighbor in pos.neighbors(self.size) {
            let neighbor_id = neighbor.id(self.size);
            if self.cells[neighbor_id] == Some(player) {
                self.links.join_cells(id, neighbor_id);
            }
        }
        self.join_goal_edges(pos, player);

        self.turn = player.opponent();
        true
    }

    /// Attach a stone on a goal boundary to its owner's terminal
    fn join_goal_edges(&mut self, pos: BoardPosition, player: Player) {
        let id = pos.id(self.size);
        let last = self.size - 1;
        match player {
            Player::Red => {
                if pos.row == 0 {
                    self.links.join_edge(id, Edge::Top);
                }
                if pos.row == last {
                    self.links.join_edge(id, Edge::Bottom);
                }
            }
            Player::Blue => {
                if pos.col == 0 {
                    self.links.join_edge(id, Edge::Left);
                }
                if pos.col == last {
                    self.links.join_edge(id, Edge::Right);
                }
            }
        }
    }

    // ========================================================================
    // AUDIO TOGGLES
    // ========================================================================

    pub fn toggle_sound(&mut self) {
        self.sound_on = !self.sound_on;
    }

    pub fn toggle_music(&mut self) {
        self.music_on = !self.music_on;
    }

    // ========================================================================
    // SNAPSHOTS
    // ========================================================================

    /// Compact versioned encoding of the full board state
    pub fn serialize(&self) -> Vec<u8> {
        Snapshot::capture(self).encode()
    }

    /// Rebuild a board from `serialize` output.
    ///
    /// `None` or anything malformed falls back to a fresh default board
    /// carrying the supplied audio flags.
    pub fn restore(bytes: Option<&[u8]>, sound_on: bool, music_on: bool) -> Self {
        let bytes = match bytes {
            Some(bytes) => bytes,
            None => return Self::default_sized(sound_on, music_on),
        };
        match Snapshot::decode(bytes) {
            Some(snapshot) => Self::from_snapshot(&snapshot),
            None => {
                tracing::warn!(
                    "discarding unreadable board snapshot ({} bytes)",
                    bytes.len()
                );
                Self::default_sized(sound_on, music_on)
            }
        }
    }

    /// Reconstruct board and connectivity from validated snapshot data
    pub(crate) fn from_snapshot(snapshot: &Snapshot) -> Self {
        let mut board = Self::new(snapshot.size, snapshot.sound, snapshot.music);
        board.turn = if snapshot.turn == 2 {
            Player::Blue
        } else {
            Player::Red
        };
        for (id, digit) in snapshot.cells.bytes().enumerate() {
            board.cells[id] = match digit {
                b'1' => Some(Player::Red),
                b'2' => Some(Player::Blue),
                _ => None,
            };
        }
        board.relink_all();
        board
    }

    /// Recompute connectivity from the grid alone
    fn relink_all(&mut self) {
        for id in 0..self.cells.len() {
            let player = match self.cells[id] {
                Some(player) => player,
                None => continue,
            };
            let pos = BoardPosition::from_id(id, self.size);
            for neighbor in pos.neighbors(self.size) {
                let neighbor_id = neighbor.id(self.size);
                // Each pair is visited twice; join once
                if neighbor_id < id && self.cells[neighbor_id] == Some(player) {
                    self.links.join_cells(id, neighbor_id);
                }
            }
            self.join_goal_edges(pos, player);
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
