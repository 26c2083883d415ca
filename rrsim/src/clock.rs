/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Monotonic step counter.
//!
//! One [`Clock`] lives inside the [`SchedulerService`] and measures global
//! simulation time: it advances by exactly one for every unit of work any
//! process completes.  A second, short-lived `Clock` is created for every
//! execution burst and counts the ticks that burst has consumed so far, which
//! is how the quantum is enforced independently of global time.
//!
//! [`SchedulerService`]: crate::service::SchedulerService

/// Simulation time, in executed work units.
pub type Tick = u64;

/// Plain incrementing counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Clock {
    now: Tick,
}

impl Clock {
    /// Creates a clock reading `0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments the counter and returns the new value.
    ///
    /// The first call on a fresh clock returns `1`.
    pub fn advance(&mut self) -> Tick {
        self.now += 1;
        self.now
    }

    /// Returns the last advanced value without advancing.
    pub fn current(&self) -> Tick {
        self.now
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
