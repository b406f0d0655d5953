use std::time::Duration;

use log::debug;

use super::{fallback_move, BestMove, SearchTimeout, Strategy};
use crate::evaluation::Evaluator;
use crate::game::{GameState, Move, Player};
use crate::timer::{SearchClock, Timer};

/// Iterative-deepening minimax with alpha-beta pruning.
///
/// `choose_move` searches depth 1, 2, 3, ... from scratch until the clock
/// runs out (or `max_depth` is completed) and plays the result of the
/// deepest finished iteration.
#[derive(Debug, Clone)]
pub struct AlphaBetaSearch<E> {
    evaluator: E,
    threshold: Duration,
    max_depth: Option<u32>,
}

impl<E> AlphaBetaSearch<E> {
    pub fn new(evaluator: E, threshold: Duration) -> Self {
        Self {
            evaluator,
            threshold,
            max_depth: None,
        }
    }

    /// Stop deepening once this depth has been completed.
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Best move at a single depth within the `(alpha, beta)` window.
    ///
    /// Root moves are never cut off, but `alpha` is raised to the best value
    /// seen so far before the next sibling is searched.
    pub fn alphabeta<G>(
        &self,
        state: &G,
        depth: u32,
        mut alpha: f64,
        beta: f64,
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
            let value = self.min_value(
                &state.forecast(mv),
                depth.saturating_sub(1),
                alpha,
                beta,
                player,
                clock,
            )?;
            best.offer(mv, value);
            alpha = alpha.max(value);
        }
        Ok(best.mv)
    }

    pub fn max_value<G>(
        &self,
        state: &G,
        depth: u32,
        mut alpha: f64,
        beta: f64,
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
            let child = state.forecast(mv);
            value = value.max(self.min_value(&child, depth - 1, alpha, beta, player, clock)?);
            if value >= beta {
                return Ok(value);
            }
            alpha = alpha.max(value);
        }
        Ok(value)
    }

    pub fn min_value<G>(
        &self,
        state: &G,
        depth: u32,
        alpha: f64,
        mut beta: f64,
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
            let child = state.forecast(mv);
            value = value.min(self.max_value(&child, depth - 1, alpha, beta, player, clock)?);
            if value <= alpha {
                return Ok(value);
            }
            beta = beta.min(value);
        }
        Ok(value)
    }
}

impl<G, E> Strategy<G> for AlphaBetaSearch<E>
where
    G: GameState,
    E: Evaluator<G>,
{
    fn choose_move(&self, state: &G, timer: &dyn Timer) -> Move {
        let Some(mut best_move) = fallback_move(state) else {
            return Move::NONE;
        };

        let clock = SearchClock::new(timer, self.threshold);
        let mut depth = 1;
        while self.max_depth.map_or(true, |max| depth <= max) {
            // every iteration starts from a full window
            match self.alphabeta(state, depth, f64::NEG_INFINITY, f64::INFINITY, &clock) {
                Ok(mv) => {
                    debug!("alphabeta depth {} chose {} ({} nodes)", depth, mv, clock.nodes());
                    best_move = mv;
                    depth += 1;
                }
                Err(SearchTimeout) => {
                    debug!("alphabeta timed out at depth {}, playing {}", depth, best_move);
                    break;
                }
            }
        }
        best_move
    }
}
