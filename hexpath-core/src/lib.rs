//! Hexpath Core - Hex game-state engine
//!
//! This crate provides the core game logic for Hexpath:
//! - Board geometry (row-major rhombus of hex cells)
//! - Move legality, turn order and win detection (incremental union-find)
//! - Versioned board snapshots with silent fallback on bad data
//! - Game sessions with autosave through a pluggable key-value store
//! - Pluggable move sources for non-human players

pub mod position;
pub mod connect;
pub mod board;
pub mod snapshot;
pub mod store;
pub mod source;
pub mod mode;

// Re-exports for convenient access
pub use position::{BoardPosition, NEIGHBOR_OFFSETS, MIN_SIZE, MAX_SIZE};
pub use connect::{UnionFind, Edge, Links};
pub use board::{GameBoard, Player, GameResult, Cell};
pub use snapshot::{Snapshot, SNAPSHOT_VERSION};
pub use store::{SnapshotStore, MemoryStore, FileStore, StoreError};
pub use source::{MoveSource, RandomSource};
pub use mode::{GameMode, ModeKind, CellValue};
