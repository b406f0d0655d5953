use std::cell::Cell;
use std::time::{Duration, Instant};

use crate::search::SearchTimeout;

/// Source of remaining time for one move decision.
pub trait Timer {
    fn time_left(&self) -> Duration;
}

impl<F> Timer for F
where
    F: Fn() -> Duration,
{
    fn time_left(&self) -> Duration {
        self()
    }
}

/// Wall-clock budget for a single move, started on construction.
#[derive(Debug, Clone, Copy)]
pub struct Countdown {
    deadline: Instant,
}

impl Countdown {
    pub fn new(limit: Duration) -> Self {
        Self {
            deadline: Instant::now() + limit,
        }
    }

    pub fn expired(&self) -> bool {
        Instant::now() > self.deadline
    }
}

impl Timer for Countdown {
    fn time_left(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Unlimited;

impl Timer for Unlimited {
    fn time_left(&self) -> Duration {
        Duration::MAX
    }
}

/// Cooperative cancellation for one search invocation.
///
/// Every node calls [`SearchClock::enter`] before doing any work, and the root
/// move loop calls [`SearchClock::check`] once per move; once the remaining
/// time falls below the threshold the call fails and the `?` chain unwinds the
/// whole search without producing a value.
pub struct SearchClock<'a> {
    timer: &'a dyn Timer,
    threshold: Duration,
    nodes: Cell<u64>,
}

impl<'a> SearchClock<'a> {
    pub fn new(timer: &'a dyn Timer, threshold: Duration) -> Self {
        Self {
            timer,
            threshold,
            nodes: Cell::new(0),
        }
    }

    pub fn check(&self) -> Result<(), SearchTimeout> {
        if self.timer.time_left() < self.threshold {
            return Err(SearchTimeout);
        }
        Ok(())
    }

    /// [`check`](Self::check) on entry to a node below the root, counting it.
    pub fn enter(&self) -> Result<(), SearchTimeout> {
        self.check()?;
        self.nodes.set(self.nodes.get() + 1);
        Ok(())
    }

    /// Nodes entered so far.
    pub fn nodes(&self) -> u64 {
        self.nodes.get()
    }
}
