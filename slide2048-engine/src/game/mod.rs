//! Game Logic Module
//!
//! All game simulation code. 100% deterministic.
//!
//! ## Module Structure
//!
//! - `tile`: Tiles, cells and tile identity
//! - `direction`: Directions and the per-direction movement rule
//! - `board`: Cell → tile mapping, spawning, legal-move check
//! - `resolver`: Pass-by-pass movement and merging
//! - `state`: Game state and move lifecycle
//! - `tick`: Frame loop, synchronous moves and replay
//! - `input`: Input events and buffering
//! - `events`: Game events for front ends and tests
//! - `palette`: Tile and board colours
//! - `snapshot`: Per-frame render view

pub mod tile;
pub mod direction;
pub mod board;
pub mod resolver;
pub mod state;
pub mod tick;
pub mod input;
pub mod events;
pub mod palette;
pub mod snapshot;

// Re-export key types
pub use tile::{Cell, Tile, TileId};
pub use direction::{Direction, MoveRule};
pub use board::{Board, BoardError};
pub use resolver::{Merge, PassReport, Resolution};
pub use state::{GameError, GamePhase, GameState, MoveOutcome, MoveReport};
pub use tick::{replay_game, resolve_move, tick, TickResult};
pub use input::InputEvent;
pub use events::{GameEvent, GameEventData};
pub use snapshot::BoardSnapshot;
