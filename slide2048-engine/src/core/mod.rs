//! Core deterministic primitives.
//!
//! Everything the game logic draws randomness or identity from lives here,
//! so a seed plus a move list fully determines a game.

pub mod rng;
pub mod hash;

// Re-export core types
pub use rng::DeterministicRng;
pub use hash::{compute_state_hash, StateHash, StateHasher};
