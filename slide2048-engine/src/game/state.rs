//! Game State
//!
//! Board, RNG, pending input and the per-move state machine:
//!
//! ```text
//! Idle ──move──▶ Resolving ──still pass──▶ settled ──▶ Idle (continuing)
//!                                                  └──▶ Lost (terminal)
//! ```

use serde::{Serialize, Deserialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, GameConfig, LossRule};
use crate::core::hash::{compute_state_hash, StateHash};
use crate::core::rng::DeterministicRng;
use crate::game::board::{Board, BoardError, SpawnKind};
use crate::game::direction::Direction;
use crate::game::events::{GameEvent, GameEventData};
use crate::game::input::{InputEvent, InputQueue};
use crate::game::resolver::Resolution;
use crate::game::tile::Tile;

/// Game errors.
#[derive(Debug, Error)]
pub enum GameError {
    /// The game is lost; moves are no longer accepted.
    #[error("game over")]
    GameOver,

    /// Another move is still resolving.
    #[error("a move is already resolving")]
    MoveInProgress,

    /// Board precondition violated.
    #[error("board error: {0}")]
    Board(#[from] BoardError),

    /// Invalid configuration.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Where the game is in its move cycle.
#[derive(Clone, Debug)]
pub enum GamePhase {
    /// Waiting for a move
    Idle,
    /// A move is animating
    Resolving(Resolution),
    /// Terminal
    Lost,
}

/// How a settled move left the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveOutcome {
    /// More moves accepted
    Continuing,
    /// Game over
    Lost,
}

/// Summary of one resolved move.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveReport {
    /// Direction played
    pub direction: Direction,
    /// Result of the move
    pub outcome: MoveOutcome,
    /// Any tile moved or merged
    pub moved: bool,
    /// Resolution passes, including the final still pass
    pub passes: u32,
    /// Merges completed
    pub merges: u32,
    /// Tile added after the move, if any
    pub spawned: Option<Tile>,
}

/// Complete state of one game.
#[derive(Clone, Debug)]
pub struct GameState {
    config: GameConfig,
    board: Board,
    rng: DeterministicRng,
    seed: u64,
    phase: GamePhase,
    move_count: u32,
    tick: u32,
    inputs: InputQueue,
    events: Vec<GameEvent>,
}

impl GameState {
    /// New game: empty board plus two opening tiles of value 2.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, GameError> {
        config.validate()?;
        let board = Board::new(config.geometry());
        let mut state = Self::from_parts(config, seed, board);

        for _ in 0..2 {
            let tile = state.board.spawn_tile(&mut state.rng, SpawnKind::Opening)?;
            state.push_event(GameEvent::tile_spawned(0, &tile, true));
        }

        info!(seed, "new game");
        Ok(state)
    }

    /// Game continuing from an existing board, without opening tiles.
    pub fn with_board(config: GameConfig, seed: u64, board: Board) -> Result<Self, GameError> {
        config.validate()?;
        Ok(Self::from_parts(config, seed, board))
    }

    fn from_parts(config: GameConfig, seed: u64, board: Board) -> Self {
        Self {
            config,
            board,
            rng: DeterministicRng::new(seed),
            seed,
            phase: GamePhase::Idle,
            move_count: 0,
            tick: 0,
            inputs: InputQueue::new(),
            events: Vec::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Configuration the game runs with.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// RNG seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Current phase.
    pub fn phase(&self) -> &GamePhase {
        &self.phase
    }

    /// Moves resolved so far.
    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    /// Game is over.
    pub fn is_lost(&self) -> bool {
        matches!(self.phase, GamePhase::Lost)
    }

    /// No move is animating.
    pub fn is_idle(&self) -> bool {
        matches!(self.phase, GamePhase::Idle)
    }

    /// Moves waiting behind the one resolving.
    pub fn pending_moves(&self) -> usize {
        self.inputs.len()
    }

    // -------------------------------------------------------------------------
    // Input & events
    // -------------------------------------------------------------------------

    /// Queue an input event for the tick loop.
    pub fn push_input(&mut self, event: InputEvent) {
        self.inputs.push(event);
    }

    /// Record an event.
    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all recorded events.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn inputs_mut(&mut self) -> &mut InputQueue {
        &mut self.inputs
    }

    pub(crate) fn advance_tick(&mut self) -> u32 {
        self.tick += 1;
        self.tick
    }

    // -------------------------------------------------------------------------
    // Move lifecycle
    // -------------------------------------------------------------------------

    /// Leave `Idle` and start resolving a move.
    pub(crate) fn begin_move(&mut self, direction: Direction) -> Result<(), GameError> {
        match self.phase {
            GamePhase::Idle => {}
            GamePhase::Resolving(_) => return Err(GameError::MoveInProgress),
            GamePhase::Lost => {
                self.refuse_move(direction);
                return Err(GameError::GameOver);
            }
        }

        self.push_event(GameEvent::new(self.tick, GameEventData::MoveStarted { direction }));
        self.phase = GamePhase::Resolving(Resolution::new(direction));
        Ok(())
    }

    /// Record a move that arrived after the game ended.
    pub(crate) fn refuse_move(&mut self, direction: Direction) {
        warn!(%direction, "move refused: game is over");
        self.push_event(GameEvent::new(self.tick, GameEventData::MoveRefused { direction }));
    }

    /// Run one resolution pass. Returns the report once the move settles.
    pub(crate) fn step_resolution(&mut self) -> Result<Option<MoveReport>, GameError> {
        let GamePhase::Resolving(resolution) = &mut self.phase else {
            return Ok(None);
        };

        let pass = resolution.run_pass(&mut self.board)?;
        if !resolution.is_settled() {
            let tick = self.tick;
            self.events.extend(pass.merges.iter().map(|merge| GameEvent::merged(tick, merge)));
            return Ok(None);
        }

        let resolution = resolution.clone();
        self.finish_move(&resolution).map(Some)
    }

    /// Commit a settled move: decide the outcome and spawn the next tile.
    fn finish_move(&mut self, resolution: &Resolution) -> Result<MoveReport, GameError> {
        self.move_count += 1;

        let mut spawned = None;
        let mut outcome = if loss_reached(self.config.loss_rule, &self.board) {
            MoveOutcome::Lost
        } else {
            MoveOutcome::Continuing
        };

        // Nothing moved: the board is unchanged and no tile is added.
        if outcome == MoveOutcome::Continuing && resolution.moved() {
            let tile = self
                .board
                .spawn_tile(&mut self.rng, SpawnKind::AfterMove(self.config.spawn))?;
            self.push_event(GameEvent::tile_spawned(self.tick, &tile, false));
            spawned = Some(tile);

            if self.config.loss_rule == LossRule::NoMovesLeft && !self.board.has_legal_move() {
                outcome = MoveOutcome::Lost;
            }
        }

        let direction = resolution.direction();
        self.push_event(GameEvent::new(self.tick, GameEventData::MoveSettled {
            direction,
            passes: resolution.passes(),
            moved: resolution.moved(),
            merges: resolution.merges(),
        }));

        debug!(
            %direction,
            passes = resolution.passes(),
            merges = resolution.merges(),
            tiles = self.board.len(),
            ?outcome,
            "move settled"
        );

        match outcome {
            MoveOutcome::Continuing => self.phase = GamePhase::Idle,
            MoveOutcome::Lost => {
                self.phase = GamePhase::Lost;
                let max_value = self.board.max_value();
                self.push_event(GameEvent::new(self.tick, GameEventData::GameLost {
                    moves: self.move_count,
                    max_value,
                }));
                info!(moves = self.move_count, max_value, "game lost");
            }
        }

        Ok(MoveReport {
            direction,
            outcome,
            moved: resolution.moved(),
            passes: resolution.passes(),
            merges: resolution.merges(),
            spawned,
        })
    }

    /// Deterministic hash of seed, move counter and board contents.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.move_count, self.seed, |hasher| {
            hasher.update_bool(self.is_lost());
            for tile in self.board.tiles() {
                hasher.update_u32(tile.cell.row as u32);
                hasher.update_u32(tile.cell.col as u32);
                hasher.update_u32(tile.value);
            }
        })
    }
}

/// Whether a settled board ends the game under the given rule.
pub fn loss_reached(rule: LossRule, board: &Board) -> bool {
    match rule {
        LossRule::BoardFull => board.is_full(),
        LossRule::NoMovesLeft => !board.has_legal_move(),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::tile::Cell;

    fn config() -> GameConfig {
        GameConfig::default()
    }

    #[test]
    fn test_new_game_has_two_twos() {
        let state = GameState::new(config(), 42).unwrap();
        assert_eq!(state.board().len(), 2);
        assert!(state.board().tiles().all(|tile| tile.value == 2));
        assert!(state.is_idle());
    }

    #[test]
    fn test_new_game_is_seeded() {
        let a = GameState::new(config(), 7).unwrap();
        let b = GameState::new(config(), 7).unwrap();
        assert_eq!(a.board().to_rows(), b.board().to_rows());
        assert_eq!(a.compute_hash(), b.compute_hash());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let bad = GameConfig { move_step: 7, ..config() };
        assert!(matches!(GameState::new(bad, 1), Err(GameError::Config(_))));
    }

    #[test]
    fn test_opening_events_recorded() {
        let mut state = GameState::new(config(), 3).unwrap();
        let events = state.take_events();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|event| matches!(
            event.data,
            GameEventData::TileSpawned { opening: true, value: 2, .. }
        )));
        assert!(state.take_events().is_empty());
    }

    #[test]
    fn test_begin_move_guards_phase() {
        let mut state = GameState::new(config(), 1).unwrap();
        state.begin_move(Direction::Left).unwrap();
        assert!(matches!(state.begin_move(Direction::Up), Err(GameError::MoveInProgress)));
    }

    #[test]
    fn test_loss_rules() {
        let geometry = config().geometry();
        let full_with_pair = Board::from_rows(geometry, &[
            [2, 2, 4, 8],
            [4, 8, 16, 32],
            [8, 16, 32, 64],
            [16, 32, 64, 128],
        ]).unwrap();

        assert!(loss_reached(LossRule::BoardFull, &full_with_pair));
        assert!(!loss_reached(LossRule::NoMovesLeft, &full_with_pair));
    }

    #[test]
    fn test_hash_tracks_board() {
        let geometry = config().geometry();
        let a = GameState::with_board(config(), 5, Board::from_rows(geometry, &[[2, 0, 0, 0]]).unwrap()).unwrap();
        let b = GameState::with_board(config(), 5, Board::from_rows(geometry, &[[0, 2, 0, 0]]).unwrap()).unwrap();
        assert_ne!(a.compute_hash(), b.compute_hash());
    }

    #[test]
    fn test_hash_separates_rows_past_255() {
        let tall = GameConfig { rows: 257, cols: 2, width: 40, height: 257 * 20, ..config() };
        let state_with = |row: usize| {
            let mut board = Board::new(tall.geometry());
            board.place(Cell::new(row, 0), 2).unwrap();
            GameState::with_board(tall.clone(), 5, board).unwrap()
        };
        assert_ne!(state_with(0).compute_hash(), state_with(256).compute_hash());
    }
}
