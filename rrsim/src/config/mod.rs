//! Workload configuration loading.
//!
//! A simulation is described by one YAML file:
//! ```yaml
//! quantum: 3
//! max_steps: 10000
//! unblock_to_front: false
//! inventory:
//!   initial_stock: 8
//!   restock:
//!     - at_step: 6
//!       amount: 4
//! processes:
//!   - name: P1
//!     work: 5
//!     demand: 1
//!   - name: P2
//!     work: 3
//! ```
//!
//! Processes receive ids `1..=n` in file order, which is also the initial
//! order of the runnable queue.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

use crate::scheduler::DEFAULT_QUANTUM;

/// Step budget used when the file does not set one.
pub const DEFAULT_MAX_STEPS: u64 = 10_000;

// ── Private YAML deserialization types ────────────────────────────────────────

/// Top-level wrapper that maps directly onto the YAML file layout.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default = "default_quantum")]
    quantum: u32,
    #[serde(default = "default_max_steps")]
    max_steps: u64,
    #[serde(default)]
    unblock_to_front: bool,
    #[serde(default)]
    inventory: InventoryEntry,
    processes: Vec<ProcessEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct InventoryEntry {
    #[serde(default)]
    initial_stock: u64,
    #[serde(default)]
    restock: Vec<RestockEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RestockEntry {
    at_step: u64,
    amount: u64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProcessEntry {
    name: String,
    work: u32,
    /// Inventory units per unit of work.  Defaults to `1`.
    #[serde(default = "default_demand")]
    demand: u64,
}

fn default_quantum() -> u32 {
    DEFAULT_QUANTUM
}

fn default_max_steps() -> u64 {
    DEFAULT_MAX_STEPS
}

fn default_demand() -> u64 {
    1
}

// ── Public data structures ────────────────────────────────────────────────────

/// One process to create before the simulation starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSpec {
    pub name: String,
    /// Units of work; always positive after validation.
    pub work: u32,
    pub demand: u64,
}

/// Stock added to the inventory right before step `at_step` (0-based) runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestockEvent {
    pub at_step: u64,
    pub amount: u64,
}

/// A validated simulation description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationConfig {
    pub quantum: u32,
    pub max_steps: u64,
    /// Return unblocked processes to the front of the runnable queue instead
    /// of the back.
    pub unblock_to_front: bool,
    pub initial_stock: u64,
    /// Sorted by `at_step`.
    pub restock: Vec<RestockEvent>,
    pub processes: Vec<ProcessSpec>,
}

impl SimulationConfig {
    /// The workload used when no configuration file is supplied.
    ///
    /// Three processes share a stock of 6 units that is topped up by 4 before
    /// step 6, enough for every process to finish after some blocking.
    pub fn default_config() -> Self {
        Self {
            quantum: DEFAULT_QUANTUM,
            max_steps: DEFAULT_MAX_STEPS,
            unblock_to_front: false,
            initial_stock: 6,
            restock: vec![RestockEvent {
                at_step: 6,
                amount: 4,
            }],
            processes: vec![
                ProcessSpec {
                    name: "P1".into(),
                    work: 5,
                    demand: 1,
                },
                ProcessSpec {
                    name: "P2".into(),
                    work: 3,
                    demand: 1,
                },
                ProcessSpec {
                    name: "P3".into(),
                    work: 4,
                    demand: 0,
                },
            ],
        }
    }

    /// Parses and validates the YAML file at `path`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, the YAML is structurally
    /// invalid, or [`validate`](Self::validate) fails.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading simulation configuration from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open configuration file: {}", path.display()))?;

        Self::from_yaml_str(&content)
            .with_context(|| format!("Invalid configuration file: {}", path.display()))
    }

    /// Parses and validates an in-memory YAML document.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let file: ConfigFile = serde_yaml::from_str(content).context("Failed to parse YAML")?;

        let mut restock: Vec<RestockEvent> = file
            .inventory
            .restock
            .into_iter()
            .map(|r| RestockEvent {
                at_step: r.at_step,
                amount: r.amount,
            })
            .collect();
        // stable: events on the same step keep file order
        restock.sort_by_key(|r| r.at_step);

        let config = Self {
            quantum: file.quantum,
            max_steps: file.max_steps,
            unblock_to_front: file.unblock_to_front,
            initial_stock: file.inventory.initial_stock,
            restock,
            processes: file
                .processes
                .into_iter()
                .map(|p| ProcessSpec {
                    name: p.name,
                    work: p.work,
                    demand: p.demand,
                })
                .collect(),
        };
        config.validate()?;

        for p in &config.processes {
            debug!(
                "  Process: {} | work: {} | demand/unit: {}",
                p.name, p.work, p.demand
            );
        }
        info!(
            quantum = config.quantum,
            processes = config.processes.len(),
            initial_stock = config.initial_stock,
            restock_events = config.restock.len(),
            "configuration loaded"
        );

        Ok(config)
    }

    /// Checks the constraints serde cannot express.
    ///
    /// # Errors
    /// * `quantum` is zero.
    /// * `max_steps` is zero.
    /// * No processes.
    /// * A process has an empty name, a duplicate name, or zero work.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.quantum > 0, "quantum must be positive");
        ensure!(self.max_steps > 0, "max_steps must be positive");
        ensure!(!self.processes.is_empty(), "at least one process is required");

        let mut names = HashSet::new();
        for p in &self.processes {
            ensure!(!p.name.trim().is_empty(), "process names must not be empty");
            ensure!(names.insert(p.name.as_str()), "duplicate process name '{}'", p.name);
            ensure!(p.work > 0, "process '{}' has no work to do", p.name);
        }
        Ok(())
    }

    /// Total inventory the workload needs to finish.
    pub fn total_demand(&self) -> u64 {
        self.processes
            .iter()
            .map(|p| u64::from(p.work).saturating_mul(p.demand))
            .fold(0, u64::saturating_add)
    }

    /// Total inventory available over the whole run.
    pub fn total_supply(&self) -> u64 {
        self.restock
            .iter()
            .map(|r| r.amount)
            .fold(self.initial_stock, u64::saturating_add)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
