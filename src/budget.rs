//! Per-request time budget and cooperative cancellation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::error::{MisError, Result, Stage};

/// Deadline plus an optional cancellation flag shared with the caller.
///
/// Long loops call [`Budget::check`] (or [`Budget::tick`] in hot loops) and
/// bail out with `Timeout` / `Cancelled` as soon as either trips.
#[derive(Debug, Clone, Default)]
pub struct Budget {
    deadline: Option<(Instant, Duration)>,
    cancel: Option<Arc<AtomicBool>>,
}

/// `tick` only looks at the clock once per this many calls.
const TICK_INTERVAL: u64 = 4096;

impl Budget {
    /// No deadline, no cancellation.
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Starts the clock now.
    pub fn new(limit: Option<Duration>) -> Self {
        Self {
            deadline: limit.map(|l| (Instant::now() + l, l)),
            cancel: None,
        }
    }

    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn check(&self, stage: Stage) -> Result<()> {
        if let Some(flag) = &self.cancel {
            if flag.load(Ordering::Relaxed) {
                return Err(MisError::Cancelled { stage });
            }
        }
        if let Some((deadline, limit)) = self.deadline {
            if Instant::now() >= deadline {
                return Err(MisError::Timeout { stage, limit });
            }
        }
        Ok(())
    }

    /// Cheap variant of [`Budget::check`] for tight enumeration loops.
    pub fn tick(&self, counter: &mut u64, stage: Stage) -> Result<()> {
        *counter += 1;
        if *counter % TICK_INTERVAL == 0 {
            self.check(stage)
        } else {
            Ok(())
        }
    }
}
