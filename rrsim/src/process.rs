/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Simulated process data structures.
//!
//! ```text
//!            ReadyRunning               RunningFinished
//!   READY ─────────────────► RUNNING ─────────────────► FINISHED
//!     ▲  ◄─────────────────     │
//!     │      RunningReady       │ RunningBlocked
//!     │                         ▼
//!     └──────────────────── BLOCKED
//!            BlockedReady
//! ```
//!
//! # Ownership model
//! Every [`Process`] is **owned** by the
//! [`SchedulerService`](crate::service::SchedulerService) process table.  The
//! scheduler's queues only ever hold [`ProcessId`]s, so a process can never be
//! aliased by two queues at once through a shared reference; the queue
//! invariant reduces to "an id appears at most once".
//!
//! The remaining-work counter and the per-unit demand are private: the
//! scheduler observes a process exclusively through its [`ProcessState`].

use std::fmt;

use serde::Serialize;

use crate::inventory::{Inventory, ResourceExhausted};

// ── ProcessState ──────────────────────────────────────────────────────────────

/// Lifecycle state of a simulated process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessState {
    /// Waiting in the runnable queue.
    #[default]
    Ready,
    /// Currently executing a burst.  At most one process is in this state.
    Running,
    /// Waiting in the blocked queue for the inventory to be replenished.
    Blocked,
    /// All work done.  Terminal.
    Finished,
}

impl ProcessState {
    pub fn is_terminal(self) -> bool {
        self == ProcessState::Finished
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProcessState::Ready => "READY",
            ProcessState::Running => "RUNNING",
            ProcessState::Blocked => "BLOCKED",
            ProcessState::Finished => "FINISHED",
        };
        f.write_str(s)
    }
}

// ── ProcessId ─────────────────────────────────────────────────────────────────

/// Identity of a process inside one simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ProcessId(pub u32);

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ── Process ───────────────────────────────────────────────────────────────────

/// A unit of simulated work contending for the shared inventory.
///
/// # Lifecycle
/// Created in [`ProcessState::Ready`] before the simulation starts, handed to
/// the service, driven through its states by the scheduler, and left in the
/// process table once [`ProcessState::Finished`] so the final report can still
/// see it.
#[derive(Debug, Clone)]
pub struct Process {
    id: ProcessId,
    name: String,
    state: ProcessState,

    /// Units of work still to execute.  Reaching zero finishes the process.
    remaining: u32,

    /// Inventory units consumed by each unit of work.  Zero means the process
    /// never touches the inventory and can never block.
    demand: u64,

    /// Units executed so far, across all bursts.
    executed: u32,
}

impl Process {
    /// Creates a READY process with `work` units to execute, each consuming
    /// `demand` units of inventory.
    pub fn new(id: ProcessId, name: impl Into<String>, work: u32, demand: u64) -> Self {
        Self {
            id,
            name: name.into(),
            state: ProcessState::Ready,
            remaining: work,
            demand,
            executed: 0,
        }
    }

    pub fn id(&self) -> ProcessId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    /// Units of work still outstanding.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Units of work executed so far.
    pub fn executed(&self) -> u32 {
        self.executed
    }

    pub fn demand(&self) -> u64 {
        self.demand
    }

    /// Overwrites the lifecycle state.  Only the service calls this, while
    /// applying a validated transition.
    pub(crate) fn set_state(&mut self, state: ProcessState) {
        self.state = state;
    }

    /// Performs one unit of work.
    ///
    /// Takes `demand` units from `inventory` and decrements the remaining
    /// work.  When the last unit completes the process moves itself to
    /// [`ProcessState::Finished`]; the scheduler observes that after the call.
    ///
    /// # Errors
    /// [`ResourceExhausted`] when the inventory cannot cover `demand`.  No
    /// stock is taken and no progress is made in that case.
    pub fn execute_one_unit(&mut self, inventory: &mut Inventory) -> Result<(), ResourceExhausted> {
        debug_assert_eq!(
            self.state,
            ProcessState::Running,
            "process '{}' executed while {}",
            self.name,
            self.state
        );

        inventory.take(self.demand)?;

        self.remaining = self.remaining.saturating_sub(1);
        self.executed += 1;
        if self.remaining == 0 {
            self.state = ProcessState::Finished;
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
