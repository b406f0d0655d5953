use std::sync::Arc;

use clap::{Parser, Subcommand};
use log::info;

use isolation_engine::config::{EngineArgs, StrategyKind};
use isolation_engine::play::Match;
use isolation_engine::{server, Board, Engine, Player, Result};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log every search iteration and move
    #[arg(long, short)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Accept WebSocket clients that play against the engine
    Serve {
        #[arg(long, default_value = "localhost")]
        host: String,
        #[arg(long, default_value_t = 9000)]
        port: u16,
        #[command(flatten)]
        engine: EngineArgs,
    },
    /// Play engine-vs-engine games
    Play {
        #[arg(long, default_value_t = 1)]
        games: u32,
        #[arg(long, value_enum, default_value = "alphabeta")]
        first: StrategyKind,
        #[arg(long, value_enum, default_value = "minimax")]
        second: StrategyKind,
        #[command(flatten)]
        engine: EngineArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let level = if args.verbose { log::Level::Debug } else { log::Level::Info };
    simple_logger::init_with_level(level).map_err(std::io::Error::other)?;

    match args.command {
        Command::Serve { host, port, engine } => {
            let config = engine.resolve()?;
            info!("Engine settings: {:?}", config);
            let address = format!("{}:{}", host, port);
            server::run(&address, Arc::new(Engine::from_config(&config))).await
        }
        Command::Play { games, first, second, engine } => {
            let config = engine.resolve()?;
            let first = Engine::from_config(&config.with_strategy(first));
            let second = Engine::from_config(&config.with_strategy(second));
            let arena = Match::new(&first, &second, first.move_time());

            let mut wins = [0u32; 2];
            for game in 1..=games {
                let record = arena.play(Board::new());
                wins[usize::from(record.winner == Player::Second)] += 1;
                info!(
                    "Game {}: {:?} wins ({:?}) after {} moves\n{}",
                    game,
                    record.winner,
                    record.outcome,
                    record.history.len(),
                    record.board
                );
            }
            info!("First player won {} of {} games, second player {}", wins[0], games, wins[1]);
            Ok(())
        }
    }
}
