use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    First,
    Second,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Player::First => 0,
            Player::Second => 1,
        }
    }
}

/// Board coordinates `(row, col)`. Serialized as `[row, col]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move(pub i32, pub i32);

impl Move {
    /// Returned when the player to move has no legal moves.
    pub const NONE: Move = Move(-1, -1);

    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }

    pub fn row(&self) -> i32 {
        self.0
    }

    pub fn col(&self) -> i32 {
        self.1
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}

/// A two-player, zero-sum, perfect-information game position.
///
/// Positions are values: `forecast` builds a successor and leaves `self`
/// untouched, so the search can explore siblings without undo logic.
pub trait GameState: Sized {
    fn active_player(&self) -> Player;

    /// Legal moves for the active player, empty when the game is over.
    fn legal_moves(&self) -> Vec<Move>;

    /// Successor position after `mv`, which must come from `legal_moves`.
    fn forecast(&self, mv: Move) -> Self;

    fn is_winner(&self, player: Player) -> bool;

    fn is_loser(&self, player: Player) -> bool;
}
