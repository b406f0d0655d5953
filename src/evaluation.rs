//! Static evaluation of positions.
//!
//! Scores are always from the point of view of the `player` argument, not
//! the player to move: `+inf` once that player has won, `-inf` once it has
//! lost, and a finite heuristic value otherwise.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::game::{GameState, Player};

pub trait Evaluator<G> {
    fn score(&self, state: &G, player: Player) -> f64;
}

impl<G, F> Evaluator<G> for F
where
    F: Fn(&G, Player) -> f64,
{
    fn score(&self, state: &G, player: Player) -> f64 {
        self(state, player)
    }
}

/// Heuristics for Isolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Heuristic {
    /// Own mobility minus twice the opponent's.
    #[default]
    Aggressive,
    /// Distance from the center plus own mobility.
    CenterDistance,
    /// Distance from the center plus the aggressive mobility score.
    Blended,
}

impl Evaluator<Board> for Heuristic {
    fn score(&self, board: &Board, player: Player) -> f64 {
        if board.is_loser(player) {
            return f64::NEG_INFINITY;
        }
        if board.is_winner(player) {
            return f64::INFINITY;
        }

        match self {
            Heuristic::Aggressive => mobility_difference(board, player),
            Heuristic::CenterDistance => {
                center_distance(board, player) + board.legal_moves_for(player).len() as f64
            }
            Heuristic::Blended => {
                center_distance(board, player) + mobility_difference(board, player)
            }
        }
    }
}

fn mobility_difference(board: &Board, player: Player) -> f64 {
    let own_moves = board.legal_moves_for(player).len() as f64;
    let opp_moves = board.legal_moves_for(player.opponent()).len() as f64;
    own_moves - 2.0 * opp_moves
}

// an unplaced player sits nowhere, so it contributes nothing
fn center_distance(board: &Board, player: Player) -> f64 {
    let center = board.center();
    board.player_location(player).map_or(0.0, |loc| {
        let dr = f64::from(loc.row() - center.row());
        let dc = f64::from(loc.col() - center.col());
        (dr * dr + dc * dc).sqrt()
    })
}
