/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Simulation control loop.
//!
//! [`Simulation`] decides how many scheduling steps to run and when to stop,
//! and it is the only place the inventory grows: restock events from the
//! configuration are applied right before the step they are scheduled for.
//!
//! A run ends in one of three ways:
//!
//! | Outcome | Condition |
//! |---|---|
//! | [`Outcome::Completed`] | every process is FINISHED |
//! | [`Outcome::Stalled`] | nothing runnable, no restock left, every blocked demand above stock |
//! | [`Outcome::StepLimit`] | `max_steps` steps ran without either of the above |

use tracing::{debug, info, warn};

use crate::config::{RestockEvent, SimulationConfig};
use crate::inventory::Inventory;
use crate::process::{Process, ProcessId};
use crate::scheduler::{RoundRobinScheduler, SchedulerError, StepReport, UnblockPlacement};
use crate::service::SchedulerService;

/// How a [`Simulation::run`] ended.  Each variant carries the number of steps
/// executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed { steps: u64 },
    Stalled { steps: u64 },
    StepLimit { steps: u64 },
}

impl Outcome {
    pub fn steps(&self) -> u64 {
        match *self {
            Outcome::Completed { steps }
            | Outcome::Stalled { steps }
            | Outcome::StepLimit { steps } => steps,
        }
    }
}

pub struct Simulation {
    scheduler: RoundRobinScheduler,
    /// Sorted by step; consumed from the front.
    restock: Vec<RestockEvent>,
    next_restock: usize,
    steps: u64,
    max_steps: u64,
}

impl Simulation {
    pub fn new(
        scheduler: RoundRobinScheduler,
        mut restock: Vec<RestockEvent>,
        max_steps: u64,
    ) -> Self {
        restock.sort_by_key(|r| r.at_step);
        Self {
            scheduler,
            restock,
            next_restock: 0,
            steps: 0,
            max_steps,
        }
    }

    /// Builds the processes, inventory, service and scheduler described by
    /// `config`.
    pub fn from_config(config: &SimulationConfig) -> Result<Self, SchedulerError> {
        let processes = config.processes.iter().zip(1u32..).map(|(entry, id)| {
            Process::new(ProcessId(id), entry.name.clone(), entry.work, entry.demand)
        });
        let service = SchedulerService::new(processes, Inventory::new(config.initial_stock));

        let placement = if config.unblock_to_front {
            UnblockPlacement::Front
        } else {
            UnblockPlacement::Back
        };
        let scheduler = RoundRobinScheduler::with_all_ready(service, config.quantum)?
            .with_unblock_placement(placement);

        Ok(Self::new(scheduler, config.restock.clone(), config.max_steps))
    }

    pub fn scheduler(&self) -> &RoundRobinScheduler {
        &self.scheduler
    }

    pub fn service(&self) -> &SchedulerService {
        self.scheduler.service()
    }

    pub fn into_service(self) -> SchedulerService {
        self.scheduler.into_service()
    }

    /// Steps executed so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// `true` if a restock event is still to come.
    pub fn restock_pending(&self) -> bool {
        self.next_restock < self.restock.len()
    }

    /// `true` when no later step can make progress.
    ///
    /// A blocked process whose per-unit demand exceeds the stock is still
    /// unblocked whenever the stock is non-zero, but it blocks again on its
    /// first unit without consuming anything.  Without a pending restock that
    /// cycle never ends.
    pub fn stalled(&self) -> bool {
        let stock = self.service().inventory().stock();
        let blocked = self.scheduler.blocked();
        !self.restock_pending()
            && self.scheduler.runnable().is_empty()
            && !blocked.is_empty()
            && blocked.iter().all(|&id| {
                self.service()
                    .process(id)
                    .map_or(true, |p| p.demand() > stock)
            })
    }

    /// Applies restocks due at the current step index, then runs one
    /// scheduling step.
    pub fn step(&mut self) -> StepReport {
        while let Some(event) = self.restock.get(self.next_restock) {
            if event.at_step > self.steps {
                break;
            }
            self.scheduler.service_mut().restock(event.amount);
            self.next_restock += 1;
        }

        let report = self.scheduler.scheduling();
        self.steps += 1;
        report
    }

    /// Runs steps until completion, a stall, or the step budget.
    pub fn run(&mut self) -> Outcome {
        info!(
            quantum = self.scheduler.quantum(),
            processes = self.service().processes().count(),
            stock = self.service().inventory().stock(),
            max_steps = self.max_steps,
            "simulation starting"
        );

        let outcome = loop {
            if self.service().all_finished() {
                break Outcome::Completed { steps: self.steps };
            }
            if self.steps >= self.max_steps {
                warn!(steps = self.steps, "step limit reached before all processes finished");
                break Outcome::StepLimit { steps: self.steps };
            }

            let report = self.step();
            if self.stalled() {
                warn!(
                    steps = self.steps,
                    blocked = self.scheduler.blocked().len(),
                    stock = self.service().inventory().stock(),
                    "every remaining process is blocked on stock that no restock will provide"
                );
                break Outcome::Stalled { steps: self.steps };
            }
            debug!(step = self.steps, transitions = report.transitions(), "step done");
        };

        info!(
            outcome = ?outcome,
            time = self.service().now(),
            transitions = self.service().log().len(),
            "simulation finished"
        );
        outcome
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
