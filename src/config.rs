use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::evaluation::Heuristic;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum StrategyKind {
    /// Fixed-depth minimax
    #[serde(rename = "minimax")]
    #[value(name = "minimax")]
    Minimax,
    /// Iterative-deepening alpha-beta
    #[default]
    #[serde(rename = "alphabeta")]
    #[value(name = "alphabeta")]
    AlphaBeta,
}

/// Settings for one engine, constant for every move decision it makes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub strategy: StrategyKind,
    /// Plies searched by the fixed-depth strategy.
    pub depth: u32,
    /// Deepest iteration of the iterative strategy, unbounded when absent.
    pub max_depth: Option<u32>,
    pub heuristic: Heuristic,
    /// Search aborts once less than this much time is left.
    pub timeout_threshold_ms: u64,
    pub move_time_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::AlphaBeta,
            depth: 3,
            max_depth: None,
            heuristic: Heuristic::Aggressive,
            timeout_threshold_ms: 10,
            move_time_ms: 150,
        }
    }
}

impl SearchConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn with_strategy(&self, strategy: StrategyKind) -> Self {
        Self {
            strategy,
            ..self.clone()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.depth == 0 {
            return Err(Error::InvalidConfig("depth must be at least 1".into()));
        }
        if self.max_depth == Some(0) {
            return Err(Error::InvalidConfig("max_depth must be at least 1".into()));
        }
        if self.timeout_threshold_ms >= self.move_time_ms {
            return Err(Error::InvalidConfig(format!(
                "timeout threshold ({} ms) must be below the move time ({} ms)",
                self.timeout_threshold_ms, self.move_time_ms
            )));
        }
        Ok(())
    }

    pub fn threshold(&self) -> Duration {
        Duration::from_millis(self.timeout_threshold_ms)
    }

    pub fn move_time(&self) -> Duration {
        Duration::from_millis(self.move_time_ms)
    }
}

/// Engine flags shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct EngineArgs {
    /// JSON file with engine settings; the flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyKind>,
    /// Search depth for the minimax strategy
    #[arg(long)]
    pub depth: Option<u32>,
    /// Deepest iteration for the alphabeta strategy
    #[arg(long)]
    pub max_depth: Option<u32>,
    #[arg(long, value_enum)]
    pub heuristic: Option<Heuristic>,
    #[arg(long)]
    pub timeout_threshold_ms: Option<u64>,
    #[arg(long)]
    pub move_time_ms: Option<u64>,
}

impl EngineArgs {
    pub fn resolve(&self) -> Result<SearchConfig> {
        let mut config = match &self.config {
            Some(path) => SearchConfig::from_file(path)?,
            None => SearchConfig::default(),
        };
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
        if let Some(depth) = self.depth {
            config.depth = depth;
        }
        if self.max_depth.is_some() {
            config.max_depth = self.max_depth;
        }
        if let Some(heuristic) = self.heuristic {
            config.heuristic = heuristic;
        }
        if let Some(threshold) = self.timeout_threshold_ms {
            config.timeout_threshold_ms = threshold;
        }
        if let Some(move_time) = self.move_time_ms {
            config.move_time_ms = move_time;
        }
        config.validate()?;
        Ok(config)
    }
}
