/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! rrsim – single-core round-robin process scheduler simulation
//!
//! Module layout (leaves first):
//!
//! ```text
//! lib.rs
//! ├── clock         – monotonic step counter (global time + per-burst ticks)
//! ├── inventory     – shared depletable stock, ResourceExhausted
//! ├── process       – ProcessState, ProcessId, Process
//! ├── transition    – the five legal state transitions
//! ├── log           – append-only TransitionLog
//! ├── service       – SchedulerService mediator (clock, inventory, log)
//! ├── scheduler/    – RoundRobinScheduler and its error types
//! ├── config/       – YAML workload description
//! ├── simulation    – step driver: restocks, stop conditions
//! └── report        – text / YAML rendering of the transition log
//! ```

pub mod clock;
pub mod config;
pub mod inventory;
pub mod log;
pub mod process;
pub mod report;
pub mod scheduler;
pub mod service;
pub mod simulation;
pub mod transition;
