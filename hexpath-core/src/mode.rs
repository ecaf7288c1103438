//! Game sessions: derived views, intents, autosave
//!
//! `GameMode` owns one board and one saved-game slot. Every accepted
//! mutation is written to the store first and announced to subscribers
//! second, so listeners only ever observe states that are already
//! persisted.

use crate::board::{GameBoard, GameResult, Player};
use crate::position::{BoardPosition, MAX_SIZE, MIN_SIZE};
use crate::store::SnapshotStore;

/// Saved-game slot a session belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeKind {
    TwoPlayers,
    SinglePlayer,
    Online,
}

impl ModeKind {
    /// Storage key for this slot
    pub fn save_key(self) -> &'static str {
        match self {
            ModeKind::TwoPlayers => "GameMode.two_players",
            ModeKind::SinglePlayer => "GameMode.single_player",
            ModeKind::Online => "GameMode.online",
        }
    }
}

/// One cell of the derived board view
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellValue {
    /// Linear cell id
    pub id: usize,
    /// 0 empty, 1 red, 2 blue
    pub color_code: u8,
}

type Listener = Box<dyn FnMut(&GameBoard)>;

/// A running game session
pub struct GameMode {
    board: GameBoard,
    kind: ModeKind,
    store: Box<dyn SnapshotStore>,
    listeners: Vec<Listener>,
}

impl GameMode {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Start a fresh default-size game, ignoring any saved snapshot
    pub fn new(
        kind: ModeKind,
        store: Box<dyn SnapshotStore>,
        sound_on: bool,
        music_on: bool,
    ) -> Self {
        Self {
            board: GameBoard::default_sized(sound_on, music_on),
            kind,
            store,
            listeners: Vec::new(),
        }
    }

    /// Continue from the slot's saved snapshot, or fall back to a fresh
    /// default-size game carrying the supplied audio flags
    pub fn resume(
        kind: ModeKind,
        store: Box<dyn SnapshotStore>,
        sound_on: bool,
        music_on: bool,
    ) -> Self {
        let saved = store.get(kind.save_key());
        let board = GameBoard::restore(saved.as_deref(), sound_on, music_on);
        Self {
            board,
            kind,
            store,
            listeners: Vec::new(),
        }
    }

    // ========================================================================
    // VIEWS
    // ========================================================================

    pub fn kind(&self) -> ModeKind {
        self.kind
    }

    /// The underlying board, for rendering and move suppliers
    pub fn board(&self) -> &GameBoard {
        &self.board
    }

    /// Side length
    pub fn size(&self) -> usize {
        self.board.size()
    }

    pub fn sound_on(&self) -> bool {
        self.board.sound_on()
    }

    pub fn music_on(&self) -> bool {
        self.board.music_on()
    }

    /// Row-major view of every cell, rebuilt on each call
    pub fn cell_values(&self) -> Vec<CellValue> {
        self.board
            .cells()
            .iter()
            .enumerate()
            .map(|(id, cell)| CellValue {
                id,
                color_code: match cell {
                    None => 0,
                    Some(player) => player.number(),
                },
            })
            .collect()
    }

    /// Number of the player to move, 1 or 2
    pub fn player_turn(&self) -> u8 {
        self.board.turn().number()
    }

    pub fn result(&self) -> GameResult {
        self.board.check_result()
    }

    pub fn game_ended(&self) -> bool {
        self.result() != GameResult::Undecided
    }

    /// Presentation label for the current result
    pub fn result_label(&self) -> &'static str {
        match self.result() {
            GameResult::RedWins => "Red player wins",
            GameResult::BlueWins => "Blue player wins",
            GameResult::Undecided => "Game in progress",
        }
    }

    /// Presentation label for whose turn it is
    pub fn turn_label(&self) -> &'static str {
        match self.board.turn() {
            Player::Red => "Red player",
            Player::Blue => "Blue player",
        }
    }

    // ========================================================================
    // INTENTS
    // ========================================================================

    /// Play the cell with linear id `cell_id`.
    ///
    /// Ids past the grid, occupied cells and decided games are silently
    /// ignored; the return value reports whether a stone was placed.
    pub fn play(&mut self, cell_id: usize) -> bool {
        if cell_id >= self.board.cells().len() {
            return false;
        }
        let pos = BoardPosition::from_id(cell_id, self.board.size());
        let applied = self.board.play(pos);
        if applied {
            self.publish();
        }
        applied
    }

    /// Replace the board with a fresh one at `size`.
    ///
    /// Sizes outside the playable range leave the session untouched.
    pub fn new_game(&mut self, size: usize) {
        if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
            return;
        }
        self.board = self.board.resize(size);
        self.publish();
    }

    /// Grow the board by one, capped at the largest size
    pub fn increment_size(&mut self) {
        if self.board.size() < MAX_SIZE {
            self.new_game(self.board.size() + 1);
        }
    }

    /// Shrink the board by one, capped at the smallest size
    pub fn decrement_size(&mut self) {
        if self.board.size() > MIN_SIZE {
            self.new_game(self.board.size() - 1);
        }
    }

    pub fn toggle_sound(&mut self) {
        self.board.toggle_sound();
        self.publish();
    }

    pub fn toggle_music(&mut self) {
        self.board.toggle_music();
        self.publish();
    }

    // ========================================================================
    // CHANGE NOTIFICATION
    // ========================================================================

    /// Run `listener` after every accepted mutation
    pub fn subscribe(&mut self, listener: impl FnMut(&GameBoard) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Persist the current board, then fan out to listeners
    fn publish(&mut self) {
        let bytes = self.board.serialize();
        match self.store.put(self.kind.save_key(), &bytes) {
            Ok(()) => tracing::debug!("autosaved {}", self.kind.save_key()),
            Err(err) => {
                // A failed save must not interrupt play
                tracing::warn!("autosave failed for {}: {}", self.kind.save_key(), err);
            }
        }
        for listener in &mut self.listeners {
            listener(&self.board);
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, StoreError};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn fresh_mode() -> GameMode {
        GameMode::new(ModeKind::TwoPlayers, Box::new(MemoryStore::new()), true, true)
    }

    #[test]
    fn test_save_keys() {
        assert_eq!(ModeKind::TwoPlayers.save_key(), "GameMode.two_players");
        assert_eq!(ModeKind::SinglePlayer.save_key(), "GameMode.single_player");
        assert_eq!(ModeKind::Online.save_key(), "GameMode.online");
    }

    #[test]
    fn test_new_mode_defaults() {
        let mode = fresh_mode();
        assert_eq!(mode.size(), MAX_SIZE);
        assert_eq!(mode.player_turn(), 1);
        assert_eq!(mode.result(), GameResult::Undecided);
        assert!(!mode.game_ended());
        assert_eq!(mode.turn_label(), "Red player");
        assert_eq!(mode.result_label(), "Game in progress");
    }

    #[test]
    fn test_cell_values_shape() {
        let mut mode = fresh_mode();
        mode.new_game(4);
        mode.play(0);
        mode.play(5);
        let values = mode.cell_values();
        assert_eq!(values.len(), 16);
        assert_eq!(values[0], CellValue { id: 0, color_code: 1 });
        assert_eq!(values[5], CellValue { id: 5, color_code: 2 });
        assert_eq!(values[9], CellValue { id: 9, color_code: 0 });
        // Ids always count 0..n*n in order
        for (i, value) in values.iter().enumerate() {
            assert_eq!(value.id, i);
        }
    }

    #[test]
    fn test_play_out_of_range_is_ignored() {
        let mut mode = fresh_mode();
        mode.new_game(3);
        assert!(!mode.play(9));
        assert!(!mode.play(usize::MAX));
        assert_eq!(mode.player_turn(), 1);
    }

    #[test]
    fn test_full_game_to_red_win() {
        let mut mode = fresh_mode();
        mode.new_game(3);
        // Red takes the first column, blue dawdles on the right
        assert!(mode.play(0)); // red (0,0)
        assert!(mode.play(2)); // blue (0,2)
        assert!(mode.play(3)); // red (1,0)
        assert!(mode.play(5)); // blue (1,2)
        assert!(!mode.game_ended());
        assert!(mode.play(6)); // red (2,0)
        assert!(mode.game_ended());
        assert_eq!(mode.result(), GameResult::RedWins);
        assert_eq!(mode.result_label(), "Red player wins");
        // Fourth red move bounces off the finished game
        assert!(!mode.play(8));
        assert_eq!(mode.result(), GameResult::RedWins);
    }

    #[test]
    fn test_new_game_rejects_out_of_range_sizes() {
        let mut mode = fresh_mode();
        mode.new_game(5);
        mode.play(0);
        mode.new_game(2);
        mode.new_game(12);
        // Board untouched, stone still there
        assert_eq!(mode.size(), 5);
        assert_eq!(mode.cell_values()[0].color_code, 1);
    }

    #[test]
    fn test_size_stepping_saturates() {
        let mut mode = fresh_mode();
        assert_eq!(mode.size(), MAX_SIZE);
        mode.increment_size();
        assert_eq!(mode.size(), MAX_SIZE);
        for _ in 0..20 {
            mode.decrement_size();
        }
        assert_eq!(mode.size(), MIN_SIZE);
        mode.decrement_size();
        assert_eq!(mode.size(), MIN_SIZE);
        mode.increment_size();
        assert_eq!(mode.size(), MIN_SIZE + 1);
    }

    #[test]
    fn test_mutations_autosave() {
        let mut mode = GameMode::new(
            ModeKind::TwoPlayers,
            Box::new(MemoryStore::new()),
            true,
            true,
        );
        mode.new_game(3);
        mode.play(0);
        mode.play(4);
        mode.toggle_music();

        // A second session over a copy of the stored bytes sees the state
        let bytes = mode.store.get(ModeKind::TwoPlayers.save_key()).unwrap();
        let restored = GameBoard::restore(Some(&bytes), true, true);
        assert_eq!(restored.size(), 3);
        assert_eq!(restored.cells(), mode.board().cells());
        assert!(!restored.music_on());
    }

    #[test]
    fn test_resume_round_trip() {
        let mut store = MemoryStore::new();
        {
            let mut mode = GameMode::new(
                ModeKind::SinglePlayer,
                Box::new(store.clone()),
                true,
                true,
            );
            mode.new_game(4);
            mode.play(0);
            mode.play(7);
            // MemoryStore clones share nothing; copy the bytes across
            store = match mode.store.get(ModeKind::SinglePlayer.save_key()) {
                Some(bytes) => {
                    let mut fresh = MemoryStore::new();
                    fresh
                        .put(ModeKind::SinglePlayer.save_key(), &bytes)
                        .unwrap();
                    fresh
                }
                None => panic!("autosave never ran"),
            };
        }

        let mode = GameMode::resume(ModeKind::SinglePlayer, Box::new(store), false, false);
        assert_eq!(mode.size(), 4);
        assert_eq!(mode.player_turn(), 1);
        assert_eq!(mode.cell_values()[0].color_code, 1);
        assert_eq!(mode.cell_values()[7].color_code, 2);
    }

    #[test]
    fn test_resume_with_empty_store_gives_default() {
        let mode = GameMode::resume(
            ModeKind::TwoPlayers,
            Box::new(MemoryStore::new()),
            false,
            true,
        );
        assert_eq!(mode.size(), MAX_SIZE);
        assert_eq!(mode.player_turn(), 1);
        assert!(!mode.sound_on());
        assert!(mode.music_on());
    }

    #[test]
    fn test_resume_with_corrupt_save_gives_default() {
        let mut store = MemoryStore::new();
        store
            .put(ModeKind::TwoPlayers.save_key(), b"{\"v\":1,\"garbage")
            .unwrap();
        let mode = GameMode::resume(ModeKind::TwoPlayers, Box::new(store), true, true);
        assert_eq!(mode.size(), MAX_SIZE);
        assert!(mode.cell_values().iter().all(|v| v.color_code == 0));
    }

    #[test]
    fn test_modes_do_not_share_slots() {
        let mut store = MemoryStore::new();
        {
            let mut mode = GameMode::new(ModeKind::TwoPlayers, Box::new(store.clone()), true, true);
            mode.new_game(3);
            mode.play(0);
            if let Some(bytes) = mode.store.get(ModeKind::TwoPlayers.save_key()) {
                store.put(ModeKind::TwoPlayers.save_key(), &bytes).unwrap();
            }
        }
        // The single-player slot is still empty
        let mode = GameMode::resume(ModeKind::SinglePlayer, Box::new(store), true, true);
        assert_eq!(mode.size(), MAX_SIZE);
    }

    #[test]
    fn test_listeners_fire_per_accepted_mutation() {
        let calls = Rc::new(RefCell::new(0usize));
        let seen = Rc::clone(&calls);

        let mut mode = fresh_mode();
        mode.subscribe(move |_| *seen.borrow_mut() += 1);

        mode.new_game(3); // 1
        mode.play(0); // 2
        mode.play(0); // rejected, no callback
        mode.play(99); // rejected, no callback
        mode.toggle_sound(); // 3
        mode.new_game(99); // rejected, no callback
        assert_eq!(*calls.borrow(), 3);
    }

    #[test]
    fn test_listeners_observe_current_board() {
        let sizes = Rc::new(RefCell::new(Vec::new()));
        let seen = Rc::clone(&sizes);

        let mut mode = fresh_mode();
        mode.subscribe(move |board: &GameBoard| seen.borrow_mut().push(board.size()));

        mode.new_game(3);
        mode.new_game(7);
        assert_eq!(*sizes.borrow(), vec![3, 7]);
    }

    #[test]
    fn test_failed_autosave_does_not_block_play() {
        struct BrokenStore;
        impl SnapshotStore for BrokenStore {
            fn get(&self, _key: &str) -> Option<Vec<u8>> {
                None
            }
            fn put(&mut self, key: &str, _bytes: &[u8]) -> Result<(), StoreError> {
                Err(StoreError::Write {
                    path: std::path::PathBuf::from(key),
                    source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
                })
            }
        }

        let mut mode = GameMode::new(ModeKind::TwoPlayers, Box::new(BrokenStore), true, true);
        mode.new_game(3);
        assert!(mode.play(0));
        assert_eq!(mode.player_turn(), 2);
    }
}
