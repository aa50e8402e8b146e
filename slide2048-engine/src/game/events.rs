//! Game Events
//!
//! Emitted by the tick loop so front ends can animate, log, or assert on
//! what happened without diffing boards.

use serde::{Serialize, Deserialize};

use crate::game::direction::Direction;
use crate::game::resolver::Merge;
use crate::game::tile::{Cell, Tile, TileId};

/// Game event data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEventData {
    /// A tile appeared on an empty cell
    TileSpawned {
        /// New tile
        tile_id: TileId,
        /// Where it landed
        cell: Cell,
        /// 2 or 4
        value: u32,
        /// One of the two tiles a new game starts with
        opening: bool,
    },

    /// A move started resolving
    MoveStarted {
        /// Direction pressed
        direction: Direction,
    },

    /// Two tiles combined
    TilesMerged {
        /// Tile that stayed
        survivor: TileId,
        /// Tile that disappeared
        absorbed: TileId,
        /// Cell of the survivor
        cell: Cell,
        /// Doubled value
        value: u32,
    },

    /// A move finished resolving
    MoveSettled {
        /// Direction played
        direction: Direction,
        /// Passes run, including the final still pass
        passes: u32,
        /// Anything moved
        moved: bool,
        /// Merges completed
        merges: u32,
    },

    /// A move arrived after the game was lost
    MoveRefused {
        /// Direction pressed
        direction: Direction,
    },

    /// No further moves are accepted
    GameLost {
        /// Moves resolved
        moves: u32,
        /// Largest tile reached
        max_value: u32,
    },
}

/// A game event stamped with the tick it happened on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Tick when event occurred
    pub tick: u32,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(tick: u32, data: GameEventData) -> Self {
        Self { tick, data }
    }

    /// Spawn event for a freshly placed tile.
    pub fn tile_spawned(tick: u32, tile: &Tile, opening: bool) -> Self {
        Self::new(tick, GameEventData::TileSpawned {
            tile_id: tile.id,
            cell: tile.cell,
            value: tile.value,
            opening,
        })
    }

    /// Merge event.
    pub fn merged(tick: u32, merge: &Merge) -> Self {
        Self::new(tick, GameEventData::TilesMerged {
            survivor: merge.survivor,
            absorbed: merge.absorbed,
            cell: merge.cell,
            value: merge.value,
        })
    }
}
