use std::fmt;

use bitvec::prelude::*;
use lazy_static::lazy_static;

use crate::error::{Error, Result};
use crate::game::{GameState, Move, Player};

pub const WIDTH: usize = 7;
pub const HEIGHT: usize = 7;
const B: usize = WIDTH * HEIGHT;
pub type BitBoard = BitArr!(for B, in u64, Lsb0);
// squares are indexed row-major: idx = row * WIDTH + col

const KNIGHT_DIRECTIONS: [(i32, i32); 8] = [
    (-2, -1), (-2, 1), (-1, -2), (-1, 2),
    (1, -2), (1, 2), (2, -1), (2, 1),
];

lazy_static! {
    static ref KNIGHT_JUMPS: Vec<Vec<usize>> = (0..B)
        .map(|idx| {
            let (row, col) = ((idx / WIDTH) as i32, (idx % WIDTH) as i32);
            KNIGHT_DIRECTIONS
                .iter()
                .filter_map(|(dr, dc)| square_index(row + dr, col + dc))
                .collect()
        })
        .collect();
}

fn square_index(row: i32, col: i32) -> Option<usize> {
    if (0..HEIGHT as i32).contains(&row) && (0..WIDTH as i32).contains(&col) {
        Some(row as usize * WIDTH + col as usize)
    } else {
        None
    }
}

fn square_move(idx: usize) -> Move {
    Move((idx / WIDTH) as i32, (idx % WIDTH) as i32)
}

/// Isolation position. Each player jumps like a chess knight and every
/// square ever occupied stays blocked; whoever cannot move loses.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Board {
    blocked: BitBoard,
    locations: [Option<usize>; 2],
    active: Player,
    move_count: u32,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            blocked: BitArray::ZERO,
            locations: [None, None],
            active: Player::First,
            move_count: 0,
        }
    }

    /// Replays `moves` from the empty board, rejecting the first illegal one.
    pub fn from_moves(moves: &[Move]) -> Result<Self> {
        moves.iter().try_fold(Self::new(), |board, &mv| board.apply_move(mv))
    }

    pub fn inactive_player(&self) -> Player {
        self.active.opponent()
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn center(&self) -> Move {
        Move((HEIGHT / 2) as i32, (WIDTH / 2) as i32)
    }

    pub fn player_location(&self, player: Player) -> Option<Move> {
        self.locations[player.index()].map(square_move)
    }

    fn blank_squares(&self) -> impl Iterator<Item = usize> + '_ {
        self.blocked[..B].iter_zeros()
    }

    pub fn blank_spaces(&self) -> Vec<Move> {
        self.blank_squares().map(square_move).collect()
    }

    /// An unplaced player may go to any blank square; afterwards only
    /// knight jumps onto blank squares are allowed.
    pub fn legal_moves_for(&self, player: Player) -> Vec<Move> {
        match self.locations[player.index()] {
            None => self.blank_spaces(),
            Some(from) => KNIGHT_JUMPS[from]
                .iter()
                .copied()
                .filter(|&sq| !self.blocked[sq])
                .map(square_move)
                .collect(),
        }
    }

    pub fn apply_move(&self, mv: Move) -> Result<Self> {
        if !self.legal_moves().contains(&mv) {
            return Err(Error::IllegalMove(mv));
        }
        Ok(self.forecast(mv))
    }

    fn square_char(&self, idx: usize) -> char {
        if self.locations[0] == Some(idx) {
            '1'
        } else if self.locations[1] == Some(idx) {
            '2'
        } else if self.blocked[idx] {
            '-'
        } else {
            ' '
        }
    }
}

impl GameState for Board {
    fn active_player(&self) -> Player {
        self.active
    }

    fn legal_moves(&self) -> Vec<Move> {
        self.legal_moves_for(self.active)
    }

    // off-board moves (the sentinel) just pass the turn
    fn forecast(&self, mv: Move) -> Self {
        let mut board = self.clone();
        if let Some(idx) = square_index(mv.row(), mv.col()) {
            board.blocked.set(idx, true);
            board.locations[self.active.index()] = Some(idx);
        }
        board.active = self.active.opponent();
        board.move_count += 1;
        board
    }

    fn is_winner(&self, player: Player) -> bool {
        player == self.inactive_player() && self.legal_moves().is_empty()
    }

    fn is_loser(&self, player: Player) -> bool {
        player == self.active && self.legal_moves().is_empty()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..HEIGHT {
            write!(f, "|")?;
            for col in 0..WIDTH {
                write!(f, " {} |", self.square_char(row * WIDTH + col))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
