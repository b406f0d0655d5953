use std::time::Duration;

use log::debug;

use super::{fallback_move, BestMove, SearchTimeout, Strategy};
use crate::evaluation::Evaluator;
use crate::game::{GameState, Move, Player};
use crate::timer::{SearchClock, Timer};

/// Depth-limited minimax, run once per move at a fixed depth.
#[derive(Debug, Clone)]
pub struct MinimaxSearch<E> {
    evaluator: E,
    depth: u32,
    threshold: Duration,
}

impl<E> MinimaxSearch<E> {
    /// `depth` is in plies and should be at least 1.
    pub fn new(evaluator: E, depth: u32, threshold: Duration) -> Self {
        Self {
            evaluator,
            depth,
            threshold,
        }
    }

    /// Best move for the player to move, searching `depth` plies.
    /// Returns [`Move::NONE`] when there are no legal moves.
    pub fn minimax<G>(
        &self,
        state: &G,
        depth: u32,
        clock: &SearchClock,
    ) -> Result<Move, SearchTimeout>
    where
        G: GameState,
        E: Evaluator<G>,
    {
        clock.check()?;
        let moves = state.legal_moves();
        let Some(&first) = moves.first() else {
            return Ok(Move::NONE);
        };

        let player = state.active_player();
        let mut best = BestMove::new(first);
        for mv in moves {
            clock.check()?;
            let child = state.forecast(mv);
            let value = self.min_value(&child, depth.saturating_sub(1), player, clock)?;
            best.offer(mv, value);
        }
        Ok(best.mv)
    }

    /// Value of `state` for `player` when `player` is to move.
    pub fn max_value<G>(
        &self,
        state: &G,
        depth: u32,
        player: Player,
        clock: &SearchClock,
    ) -> Result<f64, SearchTimeout>
    where
        G: GameState,
        E: Evaluator<G>,
    {
        clock.enter()?;
        let moves = state.legal_moves();
        if moves.is_empty() || depth == 0 {
            return Ok(self.evaluator.score(state, player));
        }

        let mut value = f64::NEG_INFINITY;
        for mv in moves {
            value = value.max(self.min_value(&state.forecast(mv), depth - 1, player, clock)?);
        }
        Ok(value)
    }

    /// Value of `state` for `player` when the opponent is to move.
    pub fn min_value<G>(
        &self,
        state: &G,
        depth: u32,
        player: Player,
        clock: &SearchClock,
    ) -> Result<f64, SearchTimeout>
    where
        G: GameState,
        E: Evaluator<G>,
    {
        clock.enter()?;
        let moves = state.legal_moves();
        if moves.is_empty() || depth == 0 {
            return Ok(self.evaluator.score(state, player));
        }

        let mut value = f64::INFINITY;
        for mv in moves {
            value = value.min(self.max_value(&state.forecast(mv), depth - 1, player, clock)?);
        }
        Ok(value)
    }
}

impl<G, E> Strategy<G> for MinimaxSearch<E>
where
    G: GameState,
    E: Evaluator<G>,
{
    fn choose_move(&self, state: &G, timer: &dyn Timer) -> Move {
        let Some(fallback) = fallback_move(state) else {
            return Move::NONE;
        };

        let clock = SearchClock::new(timer, self.threshold);
        match self.minimax(state, self.depth, &clock) {
            Ok(mv) => {
                debug!("minimax depth {} chose {} ({} nodes)", self.depth, mv, clock.nodes());
                mv
            }
            Err(SearchTimeout) => {
                debug!("minimax timed out after {} nodes, playing {}", clock.nodes(), fallback);
                fallback
            }
        }
    }
}
