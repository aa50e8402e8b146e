//! # Slide 2048 Engine
//!
//! Deterministic engine for the 2048 sliding-tile puzzle: board state,
//! the animated move resolver, tile spawning and the loss check.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     SLIDE 2048 ENGINE                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/            - Deterministic primitives                 │
//! │  ├── rng.rs       - Deterministic Xorshift128+ PRNG          │
//! │  └── hash.rs      - State hashing for verification           │
//! │                                                              │
//! │  config.rs        - Geometry, speed, spawn & loss rules      │
//! │                                                              │
//! │  game/            - Game logic (deterministic)               │
//! │  ├── tile.rs      - Tiles and grid cells                     │
//! │  ├── direction.rs - Per-direction movement rule              │
//! │  ├── board.rs     - Board state and spawning                 │
//! │  ├── resolver.rs  - Pass-by-pass slide and merge             │
//! │  ├── state.rs     - Game state and move lifecycle            │
//! │  ├── tick.rs      - Frame loop and replay                    │
//! │  ├── input.rs     - Input buffering                          │
//! │  ├── events.rs    - Game events                              │
//! │  ├── palette.rs   - Colours                                  │
//! │  └── snapshot.rs  - Render view                              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! The `core/` and `game/` modules are deterministic:
//! - Integer pixel positions, no floating-point in game logic
//! - No HashMap (uses BTreeMap/BTreeSet for sorted iteration)
//! - No system time dependencies
//! - All randomness from seeded Xorshift128+
//!
//! Given the same seed and the same move list, a game produces the same
//! boards and the same state hash on any platform.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod config;
pub mod game;

// Re-export commonly used types
pub use core::rng::DeterministicRng;
pub use config::{ConfigError, GameConfig, Geometry, LossRule, SpawnDistribution};
pub use game::direction::Direction;
pub use game::state::{GameError, GameState, MoveOutcome};
pub use game::board::Board;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum moves the headless simulator plays before stopping
pub const SIM_MOVE_LIMIT: u32 = 2000;
