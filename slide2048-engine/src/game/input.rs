//! Input Events and Buffering
//!
//! Key presses arriving while a move is still animating wait in a FIFO
//! queue and are resolved one at a time, in order.

use std::collections::VecDeque;
use serde::{Serialize, Deserialize};

use crate::game::direction::Direction;

/// Input the engine reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Directional key press
    Move(Direction),
    /// Window closed or quit key pressed
    Quit,
}

/// Pending input.
#[derive(Clone, Debug, Default)]
pub struct InputQueue {
    moves: VecDeque<Direction>,
    quit: bool,
}

impl InputQueue {
    /// Empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer an event. Moves after a quit request are dropped.
    pub fn push(&mut self, event: InputEvent) {
        match event {
            InputEvent::Move(direction) if !self.quit => self.moves.push_back(direction),
            InputEvent::Move(_) => {}
            InputEvent::Quit => self.quit = true,
        }
    }

    /// Next buffered move.
    #[inline]
    pub fn pop_move(&mut self) -> Option<Direction> {
        self.moves.pop_front()
    }

    /// Drop all buffered moves, returning them in arrival order.
    pub fn drain_moves(&mut self) -> Vec<Direction> {
        self.moves.drain(..).collect()
    }

    /// Quit was requested.
    #[inline]
    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Number of buffered moves.
    #[inline]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// No buffered moves.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}
