// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Wall-clock budget for a solve.

use std::time::{Duration, Instant};

/// A time limit measured from construction.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    start: Instant,
    limit: Duration,
}

impl Deadline {
    /// A deadline `limit_ms` milliseconds from now.
    pub fn new(limit_ms: u64) -> Self {
        Self::from_duration(Duration::from_millis(limit_ms))
    }

    pub fn from_duration(limit: Duration) -> Self {
        Self {
            start: Instant::now(),
            limit,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed().as_millis() as u64
    }

    /// Strictly past the limit.
    pub fn is_expired(&self) -> bool {
        self.elapsed() > self.limit
    }
}

/// Elapsed milliseconds, 0 without a deadline.
pub fn elapsed_ms(deadline: Option<&Deadline>) -> u64 {
    deadline.map_or(0, Deadline::elapsed_ms)
}

/// Whether the deadline has passed; never without a deadline.
pub fn is_expired(deadline: Option<&Deadline>) -> bool {
    deadline.is_some_and(Deadline::is_expired)
}
