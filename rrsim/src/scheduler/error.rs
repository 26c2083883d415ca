/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Structured error types for the round-robin scheduler.
//!
//! Only construction can fail.  Once a [`RoundRobinScheduler`] exists its
//! queues satisfy the membership invariant, and every later inconsistency is
//! a programming error that panics instead of surfacing here.
//!
//! Resource exhaustion is deliberately absent: it is recovered inside the
//! scheduling step and never reaches a caller.
//!
//! [`RoundRobinScheduler`]: super::RoundRobinScheduler

use thiserror::Error;

use crate::process::{ProcessId, ProcessState};

/// Which of the two scheduler queues an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueKind {
    Runnable,
    Blocked,
}

impl std::fmt::Display for QueueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueueKind::Runnable => f.write_str("runnable"),
            QueueKind::Blocked => f.write_str("blocked"),
        }
    }
}

/// Error returned by [`RoundRobinScheduler::new`](super::RoundRobinScheduler::new).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchedulerError {
    /// A quantum of zero would never let any process run.
    #[error("quantum must be a positive number of ticks")]
    ZeroQuantum,

    /// A queued id has no process in the service's table.
    #[error("process {process} in the {queue} queue is not known to the service")]
    UnknownProcess { process: ProcessId, queue: QueueKind },

    /// The same id was queued twice (in one queue or across both).
    #[error("process {process} appears more than once across the scheduler queues")]
    DuplicateProcess { process: ProcessId },

    /// A queued process is not in the state its queue implies
    /// (READY for runnable, BLOCKED for blocked).
    #[error("process {process} is {actual} but sits in the {queue} queue (expected {expected})")]
    StateMismatch {
        process: ProcessId,
        queue: QueueKind,
        expected: ProcessState,
        actual: ProcessState,
    },

    /// An unfinished process is in neither queue and would never be
    /// scheduled.
    #[error("process {process} is {state} but is in neither queue")]
    Unqueued {
        process: ProcessId,
        state: ProcessState,
    },

    /// An unfinished process has zero units of work left.  Dispatching it
    /// would execute a unit that does not exist.
    #[error("process {process} is not finished but has no work left")]
    NoWork { process: ProcessId },
}
