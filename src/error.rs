use thiserror::Error;

use crate::game::Move;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("illegal move {0}")]
    IllegalMove(Move),

    #[error("game has not started yet")]
    GameNotStarted,

    #[error("invalid message: {0}")]
    InvalidMessage(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
