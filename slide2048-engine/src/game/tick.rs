//! Tick Loop
//!
//! One call to [`tick`] is one animation frame: it runs at most one
//! resolution pass. A front end calls it at the configured frame rate and
//! renders between calls. [`resolve_move`] runs a whole move at once for
//! callers that do not animate.

use tracing::debug;

use crate::config::GameConfig;
use crate::core::hash::{StateHash, StateHasher};
use crate::game::direction::Direction;
use crate::game::events::GameEvent;
use crate::game::state::{GameError, GamePhase, GameState, MoveOutcome, MoveReport};

/// Result of a tick.
#[derive(Debug, Default)]
pub struct TickResult {
    /// Events generated this tick
    pub events: Vec<GameEvent>,
    /// Report of a move that settled this tick
    pub settled: Option<MoveReport>,
    /// Game is lost
    pub lost: bool,
    /// Quit was requested and no move is resolving
    pub quit: bool,
}

/// Run one frame.
///
/// - Lost: every queued move is refused.
/// - Idle: the next queued move (if any) starts and runs its first pass.
/// - Resolving: the move runs its next pass.
///
/// A quit request is honored only once no move is resolving.
pub fn tick(state: &mut GameState) -> Result<TickResult, GameError> {
    let mut result = TickResult::default();
    state.advance_tick();

    if state.is_lost() {
        for direction in state.inputs_mut().drain_moves() {
            state.refuse_move(direction);
        }
    } else if state.is_idle() {
        if let Some(direction) = state.inputs_mut().pop_move() {
            state.begin_move(direction)?;
        }
    }

    if !state.is_idle() && !state.is_lost() {
        result.settled = state.step_resolution()?;
    }

    result.lost = state.is_lost();
    result.quit = state.inputs_mut().quit_requested()
        && !matches!(state.phase(), GamePhase::Resolving(_));
    result.events = state.take_events();
    Ok(result)
}

/// Resolve a move to completion without animating.
///
/// Fails with `GameOver` after a loss and `MoveInProgress` while the tick
/// loop is animating another move.
pub fn resolve_move(state: &mut GameState, direction: Direction) -> Result<MoveReport, GameError> {
    state.begin_move(direction)?;
    loop {
        if let Some(report) = state.step_resolution()? {
            return Ok(report);
        }
    }
}

/// Replay a recorded game.
///
/// Stops early if the game is lost before the move list runs out.
pub fn replay_game(
    config: GameConfig,
    seed: u64,
    moves: &[Direction],
) -> Result<(GameState, Vec<MoveReport>), GameError> {
    let mut state = GameState::new(config, seed)?;
    let mut reports = Vec::with_capacity(moves.len());

    for &direction in moves {
        let report = resolve_move(&mut state, direction)?;
        let lost = report.outcome == MoveOutcome::Lost;
        reports.push(report);
        if lost {
            break;
        }
    }

    debug!(moves = reports.len(), lost = state.is_lost(), "replay finished");
    Ok((state, reports))
}

/// Hash of a move list, for labelling recordings.
pub fn move_log_hash(moves: &[Direction]) -> StateHash {
    let mut hasher = StateHasher::for_move_log();
    hasher.update_u32(moves.len() as u32);
    for &direction in moves {
        hasher.update_u8(direction as u8);
    }
    hasher.finalize()
}

// =============================================================================
// TESTS
// =============================================================================
