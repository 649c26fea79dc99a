// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Time sources for default timestamps and duration fields.

use std::sync::Mutex;
use std::time::{Duration, Instant, SystemTime};

/// Source of wall-clock and monotonic time.
pub trait Clock: Send + Sync {
    /// Current wall-clock time, used for default measurement timestamps.
    fn now_system(&self) -> SystemTime;

    /// Current monotonic time, used for `duration_since` fields.
    fn now_instant(&self) -> Instant;
}

/// The real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_system(&self) -> SystemTime {
        SystemTime::now()
    }

    fn now_instant(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
///
/// Both readings advance together through [`ManualClock::advance`].
#[derive(Debug)]
pub struct ManualClock {
    state: Mutex<(SystemTime, Instant)>,
}

impl ManualClock {
    /// Create a clock frozen at `system`, with its monotonic reading taken now.
    pub fn new(system: SystemTime) -> Self {
        Self::with_instant(system, Instant::now())
    }

    /// Create a clock frozen at the given readings.
    pub fn with_instant(system: SystemTime, instant: Instant) -> Self {
        Self {
            state: Mutex::new((system, instant)),
        }
    }

    /// Move both readings forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.0 += by;
        state.1 += by;
    }
}

impl Clock for ManualClock {
    fn now_system(&self) -> SystemTime {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).0
    }

    fn now_instant(&self) -> Instant {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).1
    }
}
