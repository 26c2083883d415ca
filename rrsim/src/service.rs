/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Mediator between the scheduler and the simulated world.
//!
//! [`SchedulerService`] owns everything the scheduler must not mutate
//! directly: the process table, the shared inventory, the global clock and
//! the transition log.  The scheduler drives it through a narrow contract:
//!
//! * [`resource_available`](SchedulerService::resource_available): query only.
//! * [`log_transition`](SchedulerService::log_transition) then
//!   [`perform_transition`](SchedulerService::perform_transition), always in
//!   that order, so the log timestamp is the clock value *before* the state
//!   change takes effect.
//! * [`execute_unit`](SchedulerService::execute_unit) then
//!   [`tick`](SchedulerService::tick): one unit of work, then one tick of
//!   global time.
//!
//! Queue placement is deliberately not the service's concern:
//! `perform_transition` hands the process id back to a caller-supplied
//! continuation once the state is updated.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::clock::{Clock, Tick};
use crate::inventory::{Inventory, ResourceExhausted};
use crate::log::TransitionLog;
use crate::process::{Process, ProcessId, ProcessState};
use crate::transition::Transition;

#[derive(Debug)]
pub struct SchedulerService {
    /// `BTreeMap` so summaries iterate in id order.
    processes: BTreeMap<ProcessId, Process>,
    inventory: Inventory,
    clock: Clock,
    log: TransitionLog,
}

impl SchedulerService {
    /// Builds a service around `processes` and the shared `inventory`.
    ///
    /// # Panics
    /// If two processes share an id.
    pub fn new(processes: impl IntoIterator<Item = Process>, inventory: Inventory) -> Self {
        let mut table = BTreeMap::new();
        for p in processes {
            let id = p.id();
            let prev = table.insert(id, p);
            assert!(prev.is_none(), "duplicate process id {id}");
        }
        Self {
            processes: table,
            inventory,
            clock: Clock::new(),
            log: TransitionLog::new(),
        }
    }

    // ── Queries ───────────────────────────────────────────────────────────────

    /// `true` iff the inventory holds any stock at all.
    ///
    /// Does not consider any particular process's demand: a blocked process
    /// needing more than what is in stock is still unblocked, and simply
    /// blocks again on its first unit.
    pub fn resource_available(&self) -> bool {
        !self.inventory.is_empty()
    }

    /// Current global simulation time.
    pub fn now(&self) -> Tick {
        self.clock.current()
    }

    pub fn process(&self, id: ProcessId) -> Option<&Process> {
        self.processes.get(&id)
    }

    /// All processes, in id order.
    pub fn processes(&self) -> impl Iterator<Item = &Process> {
        self.processes.values()
    }

    /// # Panics
    /// If `id` is not in the process table.
    pub fn state_of(&self, id: ProcessId) -> ProcessState {
        self.known(id).state()
    }

    pub fn all_finished(&self) -> bool {
        self.processes.values().all(|p| p.state().is_terminal())
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn log(&self) -> &TransitionLog {
        &self.log
    }

    // ── Transitions ───────────────────────────────────────────────────────────

    /// Records `transition` for `id` at the current clock value.
    ///
    /// Advances no clock and does not touch the process.
    pub fn log_transition(&mut self, transition: Transition, id: ProcessId) {
        let now = self.clock.current();
        self.log.record(now, transition, id);
        debug!(time = now, process = %id, %transition, "transition logged");
    }

    /// Moves process `id` to `transition.to()`, then calls `after_effect(id)`.
    ///
    /// The continuation is where the caller puts the process into its
    /// destination queue; pass a no-op for transitions that leave every queue.
    ///
    /// # Panics
    /// If the process's current state is not `transition.from()`.  The only
    /// accepted exception is [`Transition::RunningFinished`] applied to a
    /// process that marked itself finished during its last unit of work and
    /// whose finish has not been logged before (the entry logged just ahead
    /// of this call is the only one allowed).
    pub fn perform_transition<F>(&mut self, transition: Transition, id: ProcessId, after_effect: F)
    where
        F: FnOnce(ProcessId),
    {
        let finishes_logged = self
            .log
            .entries()
            .filter(|e| e.process == id && e.transition == Transition::RunningFinished)
            .count();
        let process = self.known_mut(id);
        let current = process.state();
        let self_finished = transition == Transition::RunningFinished
            && current == ProcessState::Finished
            && process.remaining() == 0
            && finishes_logged <= 1;
        assert!(
            current == transition.from() || self_finished,
            "illegal transition {:?} for process '{}' in state {}",
            transition,
            process.name(),
            current,
        );

        process.set_state(transition.to());
        after_effect(id);
    }

    // ── Execution ─────────────────────────────────────────────────────────────

    /// Runs one unit of work of process `id` against the shared inventory.
    ///
    /// # Errors
    /// Surfaces [`ResourceExhausted`] from the process unchanged.
    pub fn execute_unit(&mut self, id: ProcessId) -> Result<(), ResourceExhausted> {
        let process = self
            .processes
            .get_mut(&id)
            .unwrap_or_else(|| panic!("unknown process {id}"));
        process.execute_one_unit(&mut self.inventory)
    }

    /// Advances global simulation time by one tick.
    pub fn tick(&mut self) -> Tick {
        self.clock.advance()
    }

    /// Adds `amount` units to the shared inventory.
    pub fn restock(&mut self, amount: u64) {
        self.inventory.restock(amount);
        info!(
            time = self.clock.current(),
            amount = amount,
            stock = self.inventory.stock(),
            "inventory restocked"
        );
    }

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn known(&self, id: ProcessId) -> &Process {
        self.processes
            .get(&id)
            .unwrap_or_else(|| panic!("unknown process {id}"))
    }

    fn known_mut(&mut self, id: ProcessId) -> &mut Process {
        self.processes
            .get_mut(&id)
            .unwrap_or_else(|| panic!("unknown process {id}"))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
