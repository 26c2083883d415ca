/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Append-only record of committed transitions.

use std::slice;

use serde::Serialize;

use crate::clock::Tick;
use crate::process::ProcessId;
use crate::transition::Transition;

/// One committed transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    /// Shared clock value at the moment the transition was logged.
    pub timestamp: Tick,
    pub transition: Transition,
    pub process: ProcessId,
}

/// Ordered, append-only transition history.
///
/// Entries are only ever pushed; insertion order is the order transitions
/// were committed and timestamps are non-decreasing along it.
#[derive(Debug, Clone, Default)]
pub struct TransitionLog {
    entries: Vec<LogEntry>,
}

impl TransitionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry.
    pub fn record(&mut self, timestamp: Tick, transition: Transition, process: ProcessId) {
        debug_assert!(
            self.entries.last().map_or(true, |e| e.timestamp <= timestamp),
            "log timestamps must be non-decreasing"
        );
        self.entries.push(LogEntry {
            timestamp,
            transition,
            process,
        });
    }

    /// All entries, oldest first.  Can be called any number of times.
    pub fn entries(&self) -> slice::Iter<'_, LogEntry> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a TransitionLog {
    type Item = &'a LogEntry;
    type IntoIter = slice::Iter<'a, LogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
