//! Engine-vs-engine matches.

use std::time::Duration;

use log::debug;

use crate::board::Board;
use crate::game::{GameState, Move, Player};
use crate::search::Strategy;
use crate::timer::Countdown;

/// Why the losing side lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    NoMoves,
    Timeout,
    IllegalMove,
}

#[derive(Debug, Clone)]
pub struct MatchRecord {
    pub winner: Player,
    pub outcome: Outcome,
    pub history: Vec<Move>,
    pub board: Board,
}

pub struct Match<'a> {
    players: [&'a dyn Strategy<Board>; 2],
    time_limit: Duration,
}

impl<'a> Match<'a> {
    pub fn new(
        first: &'a dyn Strategy<Board>,
        second: &'a dyn Strategy<Board>,
        time_limit: Duration,
    ) -> Self {
        Self {
            players: [first, second],
            time_limit,
        }
    }

    /// Plays `board` out to the end. Each turn gets a fresh countdown; a
    /// player loses by being stuck, by overrunning its countdown or by
    /// returning an illegal move.
    pub fn play(&self, mut board: Board) -> MatchRecord {
        let mut history = Vec::new();
        loop {
            let active = board.active_player();
            let legal_moves = board.legal_moves();
            let finish = |outcome, history, board| MatchRecord {
                winner: active.opponent(),
                outcome,
                history,
                board,
            };

            if legal_moves.is_empty() {
                return finish(Outcome::NoMoves, history, board);
            }

            let countdown = Countdown::new(self.time_limit);
            let mv = self.players[active.index()].choose_move(&board, &countdown);
            if countdown.expired() {
                return finish(Outcome::Timeout, history, board);
            }
            if !legal_moves.contains(&mv) {
                return finish(Outcome::IllegalMove, history, board);
            }

            debug!("{:?} plays {}", active, mv);
            history.push(mv);
            board = board.forecast(mv);
        }
    }
}
