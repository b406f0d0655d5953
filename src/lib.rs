//! Time-boxed adversarial search for two-player, zero-sum,
//! perfect-information games, with an Isolation board to play it on.

pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod evaluation;
pub mod game;
pub mod play;
pub mod search;
pub mod server;
pub mod timer;

pub use board::Board;
pub use engine::Engine;
pub use error::{Error, Result};
pub use evaluation::{Evaluator, Heuristic};
pub use game::{GameState, Move, Player};
pub use search::{AlphaBetaSearch, MinimaxSearch, SearchTimeout, Strategy};
pub use timer::{Countdown, SearchClock, Timer, Unlimited};
