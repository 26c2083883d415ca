/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! The five legal state transitions.
//!
//! | Variant | From | To | Cause |
//! |---|---|---|---|
//! | `RunningBlocked` | RUNNING | BLOCKED | resource exhausted |
//! | `RunningReady` | RUNNING | READY | quantum expired |
//! | `ReadyRunning` | READY | RUNNING | scheduled to run |
//! | `BlockedReady` | BLOCKED | READY | resource replenished |
//! | `RunningFinished` | RUNNING | FINISHED | work completed |
//!
//! Any other `(from, to)` pair is unrepresentable as a [`Transition`];
//! [`Transition::lookup`] is the only way to get from a raw pair to a variant.

use std::fmt;

use serde::Serialize;

use crate::process::ProcessState;

/// A legal `(from, to, cause)` triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    RunningBlocked,
    RunningReady,
    ReadyRunning,
    BlockedReady,
    RunningFinished,
}

impl Transition {
    /// Every variant, in declaration order.
    pub const ALL: [Transition; 5] = [
        Transition::RunningBlocked,
        Transition::RunningReady,
        Transition::ReadyRunning,
        Transition::BlockedReady,
        Transition::RunningFinished,
    ];

    pub fn from(self) -> ProcessState {
        self.pair().0
    }

    pub fn to(self) -> ProcessState {
        self.pair().1
    }

    /// Human-readable reason for the transition.
    pub fn cause(self) -> &'static str {
        match self {
            Transition::RunningBlocked => "resource exhausted",
            Transition::RunningReady => "quantum expired",
            Transition::ReadyRunning => "scheduled to run",
            Transition::BlockedReady => "resource replenished",
            Transition::RunningFinished => "work completed",
        }
    }

    fn pair(self) -> (ProcessState, ProcessState) {
        use crate::process::ProcessState::*;
        match self {
            Transition::RunningBlocked => (Running, Blocked),
            Transition::RunningReady => (Running, Ready),
            Transition::ReadyRunning => (Ready, Running),
            Transition::BlockedReady => (Blocked, Ready),
            Transition::RunningFinished => (Running, Finished),
        }
    }

    /// Maps a `(from, to)` pair onto its transition, or `None` if the pair is
    /// not one of the five legal ones.
    pub fn lookup(from: ProcessState, to: ProcessState) -> Option<Transition> {
        Self::ALL.into_iter().find(|t| t.pair() == (from, to))
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({})", self.from(), self.to(), self.cause())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
