/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Human-readable rendering of a finished run.
//!
//! The transition log is the only output of the core; this module turns it
//! into text lines (English or Chinese labels), a YAML document, and a
//! per-process summary.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::log::LogEntry;
use crate::process::{Process, ProcessState};
use crate::service::SchedulerService;
use crate::transition::Transition;

/// Language used for state and cause labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    En,
    Zh,
}

impl Locale {
    pub fn state(self, state: ProcessState) -> &'static str {
        match self {
            Locale::En => match state {
                ProcessState::Ready => "READY",
                ProcessState::Running => "RUNNING",
                ProcessState::Blocked => "BLOCKED",
                ProcessState::Finished => "FINISHED",
            },
            Locale::Zh => match state {
                ProcessState::Ready => "就绪",
                ProcessState::Running => "运行",
                ProcessState::Blocked => "等待",
                ProcessState::Finished => "完成",
            },
        }
    }

    pub fn cause(self, transition: Transition) -> &'static str {
        match self {
            Locale::En => transition.cause(),
            Locale::Zh => match transition {
                Transition::RunningBlocked => "库存不足",
                Transition::RunningReady => "时间片到",
                Transition::ReadyRunning => "调度运行",
                Transition::BlockedReady => "库存变化",
                Transition::RunningFinished => "任务完成",
            },
        }
    }
}

/// Renders one log entry as a single line.
///
/// `name` is the display name of the entry's process.
pub fn render_entry(entry: &LogEntry, name: &str, locale: Locale) -> String {
    let t = entry.transition;
    let (from, to) = (locale.state(t.from()), locale.state(t.to()));
    match locale {
        Locale::En => format!(
            "t={:<4} {:<8} {} -> {} ({})",
            entry.timestamp,
            name,
            from,
            to,
            locale.cause(t)
        ),
        Locale::Zh => format!(
            "{}时 {} 由“{}”到“{}”, {}",
            entry.timestamp,
            name,
            from,
            to,
            locale.cause(t)
        ),
    }
}

/// Renders the whole transition log of `service`, one line per entry.
pub fn render_log(service: &SchedulerService, locale: Locale) -> Vec<String> {
    service
        .log()
        .entries()
        .map(|e| render_entry(e, display_name(service, e), locale))
        .collect()
}

fn display_name<'a>(service: &'a SchedulerService, entry: &LogEntry) -> &'a str {
    service.process(entry.process).map_or("?", Process::name)
}

#[derive(Serialize)]
struct NamedEntry<'a> {
    name: &'a str,
    #[serde(flatten)]
    entry: &'a LogEntry,
}

/// Serialises the transition log as a YAML sequence, each entry carrying the
/// process name next to its id.
pub fn log_to_yaml(service: &SchedulerService) -> Result<String> {
    let entries: Vec<NamedEntry<'_>> = service
        .log()
        .entries()
        .map(|entry| NamedEntry {
            name: display_name(service, entry),
            entry,
        })
        .collect();
    serde_yaml::to_string(&entries).context("Failed to serialise transition log")
}

/// One line per process: final state and progress.
pub fn summary(service: &SchedulerService, locale: Locale) -> Vec<String> {
    service
        .processes()
        .map(|p| {
            format!(
                "{:<8} {:<8} executed={} remaining={} demand/unit={}",
                p.name(),
                locale.state(p.state()),
                p.executed(),
                p.remaining(),
                p.demand()
            )
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
