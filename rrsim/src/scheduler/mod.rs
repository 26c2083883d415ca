//! Round-robin scheduler for the simulated single core.
//!
//! [`RoundRobinScheduler`] owns two FIFO queues of [`ProcessId`]s and is the
//! only driver of process state transitions.  Each call to
//! [`scheduling`](RoundRobinScheduler::scheduling) is one step:
//!
//! ```text
//!  1. unblock check   blocked non-empty && resource available
//!                       └─► BlockedReady, requeue on runnable (once per step)
//!  2. dispatch        pop runnable front ─► ReadyRunning
//!  3. burst           up to `quantum` units, one shared tick per unit
//!                       ├─ ResourceExhausted ─► RunningBlocked, push blocked
//!                       ├─ finished          ─► RunningFinished
//!                       └─ quantum expired   ─► RunningReady, push runnable
//! ```
//!
//! Every transition goes through [`SchedulerService::log_transition`] first
//! and [`SchedulerService::perform_transition`] second.
//!
//! # Queue invariant
//! Between steps every process id is in exactly one of:
//! `runnable` (state READY), `blocked` (state BLOCKED), or neither (state
//! FINISHED).  [`RoundRobinScheduler::new`] checks this once; each step
//! preserves it because a dispatched id is popped before it runs and pushed
//! back at most once when its burst ends.
//!
//! # Example
//! ```rust
//! use rrsim::inventory::Inventory;
//! use rrsim::process::{Process, ProcessId};
//! use rrsim::scheduler::{RoundRobinScheduler, DEFAULT_QUANTUM};
//! use rrsim::service::SchedulerService;
//!
//! let service = SchedulerService::new(
//!     vec![Process::new(ProcessId(1), "P1", 5, 1)],
//!     Inventory::new(10),
//! );
//! let mut sched = RoundRobinScheduler::with_all_ready(service, DEFAULT_QUANTUM).unwrap();
//! while sched.has_work() {
//!     sched.scheduling();
//! }
//! assert_eq!(sched.service().now(), 5);
//! assert_eq!(sched.service().log().len(), 4);
//! ```

pub mod error;

pub use error::{QueueKind, SchedulerError};

use std::collections::{HashSet, VecDeque};

use tracing::{debug, trace};

use crate::clock::{Clock, Tick};
use crate::process::{ProcessId, ProcessState};
use crate::service::SchedulerService;
use crate::transition::Transition;

// ── Constants ─────────────────────────────────────────────────────────────────

/// Quantum used when none is configured.
pub const DEFAULT_QUANTUM: u32 = 3;

// ── Types ─────────────────────────────────────────────────────────────────────

/// FIFO of process ids.
pub type ProcessQueue = VecDeque<ProcessId>;

/// Where a process that was just unblocked rejoins the runnable queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnblockPlacement {
    /// Strict FIFO: behind every process already waiting.
    #[default]
    Back,
    /// Ahead of every waiting process, so it is dispatched in the same step.
    Front,
}

/// Queue placement applied after a transition's state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Nowhere,
    RunnableBack,
    RunnableFront,
    BlockedBack,
}

/// Why a burst ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BurstEnd {
    /// Ran the full quantum and still has work; back on the runnable queue.
    QuantumExpired,
    /// A unit of work hit an empty inventory; now on the blocked queue.
    Blocked,
    /// Ran out of work; left every queue for good.
    Finished,
}

/// One contiguous RUNNING period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Burst {
    pub process: ProcessId,
    /// Units of work completed during the burst (== ticks of global time).
    pub units: Tick,
    pub end: BurstEnd,
}

/// What a single [`RoundRobinScheduler::scheduling`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepReport {
    /// Process moved BLOCKED → READY at the start of the step, if any.
    pub unblocked: Option<ProcessId>,
    /// The burst run this step; `None` when nothing was runnable.
    pub burst: Option<Burst>,
}

impl StepReport {
    /// `true` if the step dispatched nothing.
    pub fn is_idle(&self) -> bool {
        self.burst.is_none()
    }

    /// Number of transitions the step committed to the log.
    pub fn transitions(&self) -> usize {
        // a burst is always one dispatch plus one exit transition
        usize::from(self.unblocked.is_some()) + self.burst.map_or(0, |_| 2)
    }
}

// ── RoundRobinScheduler ───────────────────────────────────────────────────────

#[derive(Debug)]
pub struct RoundRobinScheduler {
    runnable: ProcessQueue,
    blocked: ProcessQueue,
    service: SchedulerService,
    quantum: u32,
    unblock_placement: UnblockPlacement,
}

impl RoundRobinScheduler {
    /// Creates a scheduler over pre-populated queues.
    ///
    /// # Errors
    /// * [`SchedulerError::ZeroQuantum`] if `quantum == 0`.
    /// * [`SchedulerError::UnknownProcess`] if a queued id is not in the
    ///   service's table.
    /// * [`SchedulerError::DuplicateProcess`] if an id is queued twice.
    /// * [`SchedulerError::StateMismatch`] if a queued process is not READY
    ///   (runnable) / BLOCKED (blocked).
    /// * [`SchedulerError::Unqueued`] if an unfinished process is in neither
    ///   queue.
    /// * [`SchedulerError::NoWork`] if an unfinished process has no work left.
    pub fn new(
        runnable: ProcessQueue,
        blocked: ProcessQueue,
        service: SchedulerService,
        quantum: u32,
    ) -> Result<Self, SchedulerError> {
        if quantum == 0 {
            return Err(SchedulerError::ZeroQuantum);
        }

        let mut seen = HashSet::new();
        for (queue, ids, expected) in [
            (QueueKind::Runnable, &runnable, ProcessState::Ready),
            (QueueKind::Blocked, &blocked, ProcessState::Blocked),
        ] {
            for &id in ids {
                let process = service
                    .process(id)
                    .ok_or(SchedulerError::UnknownProcess { process: id, queue })?;
                if !seen.insert(id) {
                    return Err(SchedulerError::DuplicateProcess { process: id });
                }
                if process.remaining() == 0 {
                    return Err(SchedulerError::NoWork { process: id });
                }
                if process.state() != expected {
                    return Err(SchedulerError::StateMismatch {
                        process: id,
                        queue,
                        expected,
                        actual: process.state(),
                    });
                }
            }
        }

        if let Some(p) = service
            .processes()
            .find(|p| !p.state().is_terminal() && !seen.contains(&p.id()))
        {
            return Err(SchedulerError::Unqueued {
                process: p.id(),
                state: p.state(),
            });
        }

        debug!(
            quantum = quantum,
            runnable = runnable.len(),
            blocked = blocked.len(),
            "round-robin scheduler created"
        );

        Ok(Self {
            runnable,
            blocked,
            service,
            quantum,
            unblock_placement: UnblockPlacement::default(),
        })
    }

    /// Creates a scheduler with every process of `service` on the runnable
    /// queue, in id order, and an empty blocked queue.
    pub fn with_all_ready(service: SchedulerService, quantum: u32) -> Result<Self, SchedulerError> {
        let runnable = service.processes().map(|p| p.id()).collect();
        Self::new(runnable, ProcessQueue::new(), service, quantum)
    }

    /// Sets where unblocked processes rejoin the runnable queue.
    pub fn with_unblock_placement(mut self, placement: UnblockPlacement) -> Self {
        self.unblock_placement = placement;
        self
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn quantum(&self) -> u32 {
        self.quantum
    }

    pub fn runnable(&self) -> &ProcessQueue {
        &self.runnable
    }

    pub fn blocked(&self) -> &ProcessQueue {
        &self.blocked
    }

    pub fn service(&self) -> &SchedulerService {
        &self.service
    }

    /// Mutable access for the simulation driver (restocking between steps).
    pub fn service_mut(&mut self) -> &mut SchedulerService {
        &mut self.service
    }

    pub fn into_service(self) -> SchedulerService {
        self.service
    }

    /// `true` while any process is still queued.
    pub fn has_work(&self) -> bool {
        !self.runnable.is_empty() || !self.blocked.is_empty()
    }

    // ── Scheduling step ───────────────────────────────────────────────────────

    /// Runs one scheduling step: optional unblock, dispatch, burst.
    pub fn scheduling(&mut self) -> StepReport {
        let unblocked =
            self.unblock_if(!self.blocked.is_empty() && self.service.resource_available());

        let Some(id) = self.runnable.pop_front() else {
            debug!(
                time = self.service.now(),
                blocked = self.blocked.len(),
                "nothing runnable, idle step"
            );
            return StepReport {
                unblocked,
                burst: None,
            };
        };

        self.log_and_transition(Transition::ReadyRunning, id, Placement::Nowhere);
        let burst = self.run(id);

        debug!(
            time = self.service.now(),
            process = %id,
            units = burst.units,
            end = ?burst.end,
            runnable = self.runnable.len(),
            blocked = self.blocked.len(),
            "step complete"
        );

        StepReport {
            unblocked,
            burst: Some(burst),
        }
    }

    /// Moves the longest-waiting blocked process back to the runnable queue
    /// when `condition` holds.  At most one process per call.
    fn unblock_if(&mut self, condition: bool) -> Option<ProcessId> {
        if !condition {
            return None;
        }
        let id = self.blocked.pop_front()?;
        let placement = match self.unblock_placement {
            UnblockPlacement::Back => Placement::RunnableBack,
            UnblockPlacement::Front => Placement::RunnableFront,
        };
        self.log_and_transition(Transition::BlockedReady, id, placement);
        Some(id)
    }

    /// Executes the burst of a process that was just moved to RUNNING.
    fn run(&mut self, id: ProcessId) -> Burst {
        let quantum = Tick::from(self.quantum);
        let mut ticks = Clock::new();

        while self.service.state_of(id) == ProcessState::Running && ticks.current() < quantum {
            if let Err(exhausted) = self.service.execute_unit(id) {
                trace!(process = %id, error = %exhausted, "unit of work aborted");
                self.log_and_transition(Transition::RunningBlocked, id, Placement::BlockedBack);
                return Burst {
                    process: id,
                    units: ticks.current(),
                    end: BurstEnd::Blocked,
                };
            }
            self.service.tick();
            ticks.advance();
        }

        let end = if self.service.state_of(id) == ProcessState::Finished {
            self.log_and_transition(Transition::RunningFinished, id, Placement::Nowhere);
            BurstEnd::Finished
        } else {
            self.log_and_transition(Transition::RunningReady, id, Placement::RunnableBack);
            BurstEnd::QuantumExpired
        };

        Burst {
            process: id,
            units: ticks.current(),
            end,
        }
    }

    fn log_and_transition(&mut self, transition: Transition, id: ProcessId, placement: Placement) {
        self.service.log_transition(transition, id);

        let runnable = &mut self.runnable;
        let blocked = &mut self.blocked;
        self.service
            .perform_transition(transition, id, |id| match placement {
                Placement::Nowhere => {}
                Placement::RunnableBack => runnable.push_back(id),
                Placement::RunnableFront => runnable.push_front(id),
                Placement::BlockedBack => blocked.push_back(id),
            });
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::Inventory;
    use crate::log::LogEntry;
    use crate::process::Process;

    use crate::transition::Transition::*;

    // ── Test helpers ──────────────────────────────────────────────────────────

    /// Builds a scheduler with processes `#1..=#n` from `(work, demand)` pairs.
    fn scheduler(stock: u64, procs: &[(u32, u64)], quantum: u32) -> RoundRobinScheduler {
        let service = SchedulerService::new(
            procs
                .iter()
                .enumerate()
                .map(|(i, &(work, demand))| {
                    Process::new(ProcessId(i as u32 + 1), format!("P{}", i + 1), work, demand)
                }),
            Inventory::new(stock),
        );
        RoundRobinScheduler::with_all_ready(service, quantum).unwrap()
    }

    fn log_of(sched: &RoundRobinScheduler) -> Vec<(Tick, Transition, u32)> {
        sched
            .service()
            .log()
            .entries()
            .map(|e: &LogEntry| (e.timestamp, e.transition, e.process.0))
            .collect()
    }

    /// Checks the queue-membership invariant between steps.
    fn assert_queue_invariant(sched: &RoundRobinScheduler) {
        let mut seen = HashSet::new();
        for &id in sched.runnable() {
            assert!(seen.insert(id), "{id} queued twice");
            assert_eq!(sched.service().state_of(id), ProcessState::Ready);
        }
        for &id in sched.blocked() {
            assert!(seen.insert(id), "{id} queued twice");
            assert_eq!(sched.service().state_of(id), ProcessState::Blocked);
        }
        for p in sched.service().processes() {
            if !seen.contains(&p.id()) {
                assert_eq!(p.state(), ProcessState::Finished, "{} lost", p.name());
            }
        }
    }

    // ── Scenarios ─────────────────────────────────────────────────────────────

    #[test]
    fn five_units_with_quantum_three_takes_two_bursts() {
        let mut sched = scheduler(100, &[(5, 1)], 3);

        let first = sched.scheduling();
        assert_eq!(
            first.burst,
            Some(Burst {
                process: ProcessId(1),
                units: 3,
                end: BurstEnd::QuantumExpired
            })
        );
        assert_eq!(sched.runnable(), &[ProcessId(1)]);

        let second = sched.scheduling();
        assert_eq!(second.burst.unwrap().units, 2);
        assert_eq!(second.burst.unwrap().end, BurstEnd::Finished);
        assert!(!sched.has_work());

        assert_eq!(
            log_of(&sched),
            vec![
                (0, ReadyRunning, 1),
                (3, RunningReady, 1),
                (3, ReadyRunning, 1),
                (5, RunningFinished, 1),
            ]
        );
        assert_eq!(sched.service().now(), 5);
    }

    #[test]
    fn exhaustion_after_one_unit_blocks_immediately() {
        let mut sched = scheduler(1, &[(5, 1)], 3);

        let report = sched.scheduling();
        assert_eq!(
            report.burst,
            Some(Burst {
                process: ProcessId(1),
                units: 1,
                end: BurstEnd::Blocked
            })
        );
        assert_eq!(log_of(&sched), vec![(0, ReadyRunning, 1), (1, RunningBlocked, 1)]);
        assert_eq!(sched.service().now(), 1);
        assert_eq!(sched.blocked(), &[ProcessId(1)]);
        assert!(sched.runnable().is_empty());
    }

    #[test]
    fn replenished_process_is_unblocked_before_dispatch() {
        // P1 consumes stock, P2 never does.
        let mut sched = scheduler(1, &[(5, 1), (5, 0)], 3);

        sched.scheduling(); // P1 runs one unit, then blocks at t=1
        let second = sched.scheduling(); // stock is 0: no unblock, P2 runs
        assert_eq!(second.unblocked, None);
        assert_eq!(sched.blocked(), &[ProcessId(1)]);

        sched.service_mut().restock(2);
        let before = sched.service().log().len();
        let third = sched.scheduling();

        assert_eq!(third.unblocked, Some(ProcessId(1)));
        let step: Vec<_> = log_of(&sched).into_iter().skip(before).collect();
        assert_eq!(step[0], (4, BlockedReady, 1));
        assert_eq!(step[1], (4, ReadyRunning, 2));
        // P1 rejoined at the back, behind P2
        assert_eq!(sched.runnable().front(), Some(&ProcessId(1)));
    }

    #[test]
    fn front_placement_dispatches_unblocked_process_first() {
        let mut sched = scheduler(1, &[(5, 1), (5, 0)], 3)
            .with_unblock_placement(UnblockPlacement::Front);

        sched.scheduling();
        sched.scheduling();
        sched.service_mut().restock(2);
        let third = sched.scheduling();

        assert_eq!(third.unblocked, Some(ProcessId(1)));
        assert_eq!(third.burst.unwrap().process, ProcessId(1));
        assert_eq!(sched.runnable().front(), Some(&ProcessId(2)));
    }

    #[test]
    fn blocking_is_stamped_with_the_clock_after_the_last_completed_unit() {
        let mut sched = scheduler(2, &[(5, 1)], 3);

        let report = sched.scheduling();

        assert_eq!(report.burst.unwrap().units, 2);
        assert_eq!(log_of(&sched), vec![(0, ReadyRunning, 1), (2, RunningBlocked, 1)]);
        assert_eq!(sched.service().now(), 2);
    }

    #[test]
    fn dispatch_is_stamped_before_the_burst_and_exit_after_it() {
        let mut sched = scheduler(3, &[(4, 1), (2, 0)], 3);

        for _ in 0..4 {
            let clock_before = sched.service().now();
            let first = sched.service().log().len();
            let report = sched.scheduling();
            let Some(burst) = report.burst else { break };

            let log = log_of(&sched);
            let step = &log[first..];
            let (dispatch, exit) = (step[step.len() - 2], step[step.len() - 1]);
            assert_eq!(dispatch, (clock_before, ReadyRunning, burst.process.0));
            assert_eq!(exit.0, clock_before + burst.units);
            assert_eq!(exit.0, sched.service().now());
        }
    }

    // ── Properties ────────────────────────────────────────────────────────────

    #[test]
    fn only_one_blocked_process_is_reconsidered_per_step() {
        let mut sched = scheduler(0, &[(2, 1), (2, 1), (9, 0)], 3);
        sched.scheduling(); // P1 blocks with 0 units
        sched.scheduling(); // P2 blocks with 0 units
        assert_eq!(sched.blocked(), &[ProcessId(1), ProcessId(2)]);

        sched.service_mut().restock(10);
        let report = sched.scheduling();

        assert_eq!(report.unblocked, Some(ProcessId(1)));
        assert_eq!(sched.blocked(), &[ProcessId(2)]);
    }

    #[test]
    fn no_unblock_without_stock() {
        let mut sched = scheduler(0, &[(2, 1), (9, 0)], 3);
        sched.scheduling();
        let report = sched.scheduling();
        assert_eq!(report.unblocked, None);
        assert_eq!(sched.blocked(), &[ProcessId(1)]);
    }

    #[test]
    fn idle_step_changes_nothing() {
        let mut sched = scheduler(0, &[(2, 1)], 3);
        sched.scheduling();
        let clock = sched.service().now();
        let entries = sched.service().log().len();

        let report = sched.scheduling();

        assert!(report.is_idle());
        assert_eq!(report.transitions(), 0);
        assert_eq!(sched.service().now(), clock);
        assert_eq!(sched.service().log().len(), entries);
        assert_eq!(sched.blocked(), &[ProcessId(1)]);
    }

    #[test]
    fn stepping_after_completion_is_idle() {
        let mut sched = scheduler(5, &[(1, 1)], 3);
        sched.scheduling();
        assert!(!sched.has_work());
        assert!(sched.scheduling().is_idle());
        assert!(sched.service().all_finished());
    }

    #[test]
    fn quantum_of_one_alternates_processes() {
        let mut sched = scheduler(10, &[(2, 1), (2, 1)], 1);
        let order: Vec<u32> = (0..4)
            .map(|_| sched.scheduling().burst.unwrap().process.0)
            .collect();
        assert_eq!(order, vec![1, 2, 1, 2]);
        assert!(sched.service().all_finished());
    }

    #[test]
    fn long_run_preserves_invariants() {
        let mut sched = scheduler(4, &[(7, 1), (3, 2), (5, 0), (4, 1)], 3);
        let quantum = Tick::from(sched.quantum());
        let mut expected_log = 0;

        for step in 0..200 {
            if step % 5 == 4 {
                sched.service_mut().restock(3);
            }
            let clock_before = sched.service().now();
            let report = sched.scheduling();

            if let Some(burst) = report.burst {
                assert!(burst.units <= quantum);
                assert_eq!(sched.service().now(), clock_before + burst.units);
            } else {
                assert_eq!(sched.service().now(), clock_before);
            }
            expected_log += report.transitions();
            assert_eq!(sched.service().log().len(), expected_log);
            assert_queue_invariant(&sched);

            if sched.service().all_finished() {
                break;
            }
        }

        assert!(sched.service().all_finished());
        // total ticks == total work
        assert_eq!(sched.service().now(), 7 + 3 + 5 + 4);

        let stamps: Vec<Tick> = sched.service().log().entries().map(|e| e.timestamp).collect();
        assert!(stamps.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn finished_process_never_reenters_a_queue() {
        let mut sched = scheduler(10, &[(2, 1), (6, 1)], 3);
        sched.scheduling(); // P1 finishes after 2 units
        assert!(!sched.runnable().contains(&ProcessId(1)));
        assert!(!sched.blocked().contains(&ProcessId(1)));
        assert_eq!(sched.service().state_of(ProcessId(1)), ProcessState::Finished);
    }

    // ── Construction ──────────────────────────────────────────────────────────

    fn two_process_service() -> SchedulerService {
        SchedulerService::new(
            vec![
                Process::new(ProcessId(1), "a", 1, 1),
                Process::new(ProcessId(2), "b", 1, 1),
            ],
            Inventory::new(1),
        )
    }

    #[test]
    fn zero_quantum_is_rejected() {
        let err = RoundRobinScheduler::with_all_ready(two_process_service(), 0).unwrap_err();
        assert_eq!(err, SchedulerError::ZeroQuantum);
    }

    #[test]
    fn unknown_process_is_rejected() {
        let runnable = ProcessQueue::from(vec![ProcessId(1), ProcessId(2), ProcessId(3)]);
        let err = RoundRobinScheduler::new(runnable, ProcessQueue::new(), two_process_service(), 3)
            .unwrap_err();
        assert!(matches!(
            err,
            SchedulerError::UnknownProcess {
                process: ProcessId(3),
                queue: QueueKind::Runnable
            }
        ));
    }

    #[test]
    fn duplicate_across_queues_is_rejected() {
        let runnable = ProcessQueue::from(vec![ProcessId(1), ProcessId(2)]);
        let blocked = ProcessQueue::from(vec![ProcessId(1)]);
        let err =
            RoundRobinScheduler::new(runnable, blocked, two_process_service(), 3).unwrap_err();
        assert_eq!(
            err,
            SchedulerError::DuplicateProcess {
                process: ProcessId(1)
            }
        );
    }

    #[test]
    fn ready_process_in_blocked_queue_is_rejected() {
        let runnable = ProcessQueue::from(vec![ProcessId(1)]);
        let blocked = ProcessQueue::from(vec![ProcessId(2)]);
        let err =
            RoundRobinScheduler::new(runnable, blocked, two_process_service(), 3).unwrap_err();
        assert!(matches!(
            err,
            SchedulerError::StateMismatch {
                queue: QueueKind::Blocked,
                actual: ProcessState::Ready,
                ..
            }
        ));
    }

    #[test]
    fn unqueued_process_is_rejected() {
        let runnable = ProcessQueue::from(vec![ProcessId(1)]);
        let err = RoundRobinScheduler::new(runnable, ProcessQueue::new(), two_process_service(), 3)
            .unwrap_err();
        assert_eq!(
            err,
            SchedulerError::Unqueued {
                process: ProcessId(2),
                state: ProcessState::Ready
            }
        );
    }

    #[test]
    fn process_without_work_is_rejected() {
        let service = SchedulerService::new(
            vec![
                Process::new(ProcessId(1), "a", 1, 1),
                Process::new(ProcessId(2), "empty", 0, 1),
            ],
            Inventory::new(5),
        );
        let err = RoundRobinScheduler::with_all_ready(service, 3).unwrap_err();
        assert_eq!(
            err,
            SchedulerError::NoWork {
                process: ProcessId(2)
            }
        );
    }

    #[test]
    fn blocked_queue_can_be_seeded() {
        let mut blocked_proc = Process::new(ProcessId(2), "b", 1, 1);
        blocked_proc.set_state(ProcessState::Blocked);
        let service = SchedulerService::new(
            vec![Process::new(ProcessId(1), "a", 1, 1), blocked_proc],
            Inventory::new(5),
        );
        let mut sched = RoundRobinScheduler::new(
            ProcessQueue::from(vec![ProcessId(1)]),
            ProcessQueue::from(vec![ProcessId(2)]),
            service,
            3,
        )
        .unwrap();

        let report = sched.scheduling();
        assert_eq!(report.unblocked, Some(ProcessId(2)));
        assert_eq!(report.transitions(), 3);
        assert_eq!(
            log_of(&sched)[..2],
            [(0, BlockedReady, 2), (0, ReadyRunning, 1)]
        );
    }
}
