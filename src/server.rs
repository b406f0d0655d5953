//! WebSocket server for playing against the engine.
//!
//! Client messages: `{"start": bool}` (true when the client moves first) and
//! `{"move": [row, col]}`. Isolation has no pass move, so `null` is rejected.
//! Server messages: `{"legal_moves": [...]}`, `{"move": [row, col],
//! "legal_moves": [...]}`, `{"end": bool}` (true when the client won, with
//! the engine's last `"move"` if it made one) and `{"error": "..."}`.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use log::{error, info};
use serde_json::{json, Value};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::protocol::Message;

use crate::board::Board;
use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::game::{GameState, Move, Player};

pub async fn run(address: &str, engine: Arc<Engine>) -> Result<()> {
    let listener = TcpListener::bind(address).await?;
    info!("Listening on: {}", address);

    while let Ok((stream, _)) = listener.accept().await {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move {
            if let Err(e) = accept_connection(stream, engine).await {
                error!("Connection closed with error: {}", e);
            }
        });
    }

    Ok(())
}

struct Session {
    started: bool,
    client: Player,
    board: Board,
}

impl Session {
    fn new() -> Self {
        Self {
            started: false,
            client: Player::First,
            board: Board::new(),
        }
    }
}

async fn accept_connection(stream: TcpStream, engine: Arc<Engine>) -> Result<()> {
    let addr = stream.peer_addr()?;
    info!("Peer address: {}", addr);

    let ws_stream = tokio_tungstenite::accept_async(stream).await?;
    info!("New WebSocket connection: {}", addr);

    let (mut write, mut read) = ws_stream.split();
    let mut session = Session::new();

    while let Some(raw_message) = read.next().await {
        let message = match raw_message {
            Ok(message) => message,
            Err(e) => {
                error!("Error reading websocket message: {}", e);
                continue;
            }
        };
        if !message.is_text() && !message.is_binary() {
            continue;
        }

        let response = match serde_json::from_slice::<Value>(&message.into_data()) {
            Ok(data) => {
                info!("Received: {}", data);
                // the search is synchronous and may take the whole move time
                tokio::task::block_in_place(|| handle_message(&mut session, &engine, data))
                    .unwrap_or_else(|e| {
                        error!("Error handling message: {}", e);
                        json!({ "error": e.to_string() })
                    })
            }
            Err(e) => {
                error!("Error parsing JSON: {}", e);
                json!({ "error": e.to_string() })
            }
        };

        let response_str = response.to_string();
        write.send(Message::text(response_str.clone())).await?;
        info!("Sent: {}", response_str);
    }

    info!("Connection closed: {}", addr);
    Ok(())
}

fn handle_message(session: &mut Session, engine: &Engine, data: Value) -> Result<Value> {
    let map = data
        .as_object()
        .ok_or_else(|| Error::InvalidMessage("expected an object".into()))?;

    if let Some(start) = map.get("start") {
        let client_first = start
            .as_bool()
            .ok_or_else(|| Error::InvalidMessage("expected boolean field: start".into()))?;
        handle_start(session, engine, client_first)
    } else if let Some(mv) = map.get("move") {
        if !session.started {
            return Err(Error::GameNotStarted);
        }
        let mv: Option<Move> = serde_json::from_value(mv.clone())?;
        let mv = mv.ok_or_else(|| Error::InvalidMessage("isolation has no pass move".into()))?;
        handle_move(session, engine, mv)
    } else {
        Err(Error::InvalidMessage(data.to_string()))
    }
}

fn handle_start(session: &mut Session, engine: &Engine, client_first: bool) -> Result<Value> {
    session.started = true;
    session.board = Board::new();
    session.client = if client_first { Player::First } else { Player::Second };
    if client_first {
        Ok(json!({ "legal_moves": session.board.legal_moves() }))
    } else {
        make_engine_move(session, engine)
    }
}

fn handle_move(session: &mut Session, engine: &Engine, mv: Move) -> Result<Value> {
    if session.board.active_player() != session.client {
        return Err(Error::InvalidMessage("not the client's turn".into()));
    }
    session.board = session.board.apply_move(mv)?;
    match game_over(session) {
        Some(game_over) => Ok(game_over),
        None => make_engine_move(session, engine),
    }
}

fn make_engine_move(session: &mut Session, engine: &Engine) -> Result<Value> {
    let Some(mv) = engine.best_move(&session.board) else {
        return Ok(json!({ "end": true }));
    };
    session.board = session.board.apply_move(mv)?;
    match game_over(session) {
        Some(_) => Ok(json!({ "move": mv, "end": false })),
        None => Ok(json!({ "move": mv, "legal_moves": session.board.legal_moves() })),
    }
}

fn game_over(session: &Session) -> Option<Value> {
    if session.board.is_winner(session.client) {
        Some(json!({ "end": true }))
    } else if session.board.is_loser(session.client) {
        Some(json!({ "end": false }))
    } else {
        None
    }
}
