/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! The shared, depletable stock every process draws from.
//!
//! Stock is only ever taken inside
//! [`Process::execute_one_unit`](crate::process::Process::execute_one_unit)
//! and only ever added by restock events applied between scheduling steps.
//! The scheduler itself never touches it; it asks
//! [`SchedulerService::resource_available`](crate::service::SchedulerService::resource_available).

use thiserror::Error;

/// Raised when a unit of work needs more stock than the inventory holds.
///
/// The scheduler recovers from it locally by moving the running process to
/// BLOCKED; it never escapes a scheduling step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("inventory exhausted: unit of work needs {required} but only {available} in stock")]
pub struct ResourceExhausted {
    pub required: u64,
    pub available: u64,
}

/// Single pool of interchangeable stock.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    stock: u64,
}

impl Inventory {
    pub fn new(stock: u64) -> Self {
        Self { stock }
    }

    /// Units currently in stock.
    pub fn stock(&self) -> u64 {
        self.stock
    }

    pub fn is_empty(&self) -> bool {
        self.stock == 0
    }

    /// Removes `amount` units, or fails without touching the stock.
    pub fn take(&mut self, amount: u64) -> Result<(), ResourceExhausted> {
        if amount > self.stock {
            return Err(ResourceExhausted {
                required: amount,
                available: self.stock,
            });
        }
        self.stock -= amount;
        Ok(())
    }

    /// Adds `amount` units.  Saturates at `u64::MAX`.
    pub fn restock(&mut self, amount: u64) {
        self.stock = self.stock.saturating_add(amount);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_decrements_stock() {
        let mut inv = Inventory::new(3);
        inv.take(2).unwrap();
        assert_eq!(inv.stock(), 1);
        assert!(!inv.is_empty());
    }

    #[test]
    fn take_more_than_stock_fails_and_leaves_stock_untouched() {
        let mut inv = Inventory::new(1);
        let err = inv.take(2).unwrap_err();
        assert_eq!(
            err,
            ResourceExhausted {
                required: 2,
                available: 1
            }
        );
        assert_eq!(inv.stock(), 1);
    }

    #[test]
    fn take_zero_always_succeeds() {
        let mut inv = Inventory::new(0);
        assert!(inv.take(0).is_ok());
        assert!(inv.is_empty());
    }

    #[test]
    fn restock_saturates() {
        let mut inv = Inventory::new(u64::MAX - 1);
        inv.restock(10);
        assert_eq!(inv.stock(), u64::MAX);
    }

    #[test]
    fn error_message_carries_both_values() {
        let msg = ResourceExhausted {
            required: 4,
            available: 0,
        }
        .to_string();
        assert!(msg.contains('4') && msg.contains('0'), "got: {msg}");
    }
}
