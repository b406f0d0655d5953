use std::time::Duration;

use crate::board::Board;
use crate::config::{SearchConfig, StrategyKind};
use crate::game::Move;
use crate::search::{AlphaBetaSearch, MinimaxSearch, Strategy};
use crate::timer::{Countdown, Timer};

/// A configured search strategy with its own per-move time limit.
pub struct Engine {
    strategy: Box<dyn Strategy<Board> + Send + Sync>,
    move_time: Duration,
}

impl Engine {
    pub fn from_config(config: &SearchConfig) -> Self {
        let threshold = config.threshold();
        let strategy: Box<dyn Strategy<Board> + Send + Sync> = match config.strategy {
            StrategyKind::Minimax => {
                Box::new(MinimaxSearch::new(config.heuristic, config.depth, threshold))
            }
            StrategyKind::AlphaBeta => {
                let search = AlphaBetaSearch::new(config.heuristic, threshold);
                match config.max_depth {
                    Some(max_depth) => Box::new(search.with_max_depth(max_depth)),
                    None => Box::new(search),
                }
            }
        };
        Self {
            strategy,
            move_time: config.move_time(),
        }
    }

    pub fn move_time(&self) -> Duration {
        self.move_time
    }

    /// Searches `board` under a fresh countdown of `move_time`.
    /// Returns `None` when the player to move has no legal moves.
    pub fn best_move(&self, board: &Board) -> Option<Move> {
        let countdown = Countdown::new(self.move_time);
        let mv = self.strategy.choose_move(board, &countdown);
        (!mv.is_none()).then_some(mv)
    }
}

impl Strategy<Board> for Engine {
    fn choose_move(&self, state: &Board, timer: &dyn Timer) -> Move {
        self.strategy.choose_move(state, timer)
    }
}
