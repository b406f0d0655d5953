//! Time-boxed game-tree search.
//!
//! Two strategies share the same cancellation discipline: every node entry
//! checks the [`SearchClock`](crate::timer::SearchClock) and a failed check
//! unwinds the whole search as [`SearchTimeout`]. Only the top-level
//! `choose_move` of each strategy catches it, substituting the best move it
//! already had on record.

pub mod alphabeta;
pub mod minimax;

use thiserror::Error;

use crate::game::{GameState, Move};
use crate::timer::Timer;

pub use alphabeta::AlphaBetaSearch;
pub use minimax::MinimaxSearch;

/// Remaining time dropped below the threshold mid-search.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("search timed out")]
pub struct SearchTimeout;

/// Move-decision entry point.
pub trait Strategy<G> {
    /// Picks a move for the player to move in `state`, returning
    /// [`Move::NONE`] only when there is no legal move.
    fn choose_move(&self, state: &G, timer: &dyn Timer) -> Move;
}

/// Running best move at the root.
///
/// Starts at the first enumerated move and is replaced only by a strictly
/// better value, so ties go to the earliest move.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BestMove {
    pub mv: Move,
    pub value: f64,
}

impl BestMove {
    pub fn new(first: Move) -> Self {
        Self {
            mv: first,
            value: f64::NEG_INFINITY,
        }
    }

    pub fn offer(&mut self, mv: Move, value: f64) {
        if value > self.value {
            self.mv = mv;
            self.value = value;
        }
    }
}

/// First legal move, used when a search is cut short before it has
/// anything better.
pub(crate) fn fallback_move<G: GameState>(state: &G) -> Option<Move> {
    state.legal_moves().first().copied()
}
