// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Simulation session: multiple banks driven by one address stream
//!
//! The [`Simulator`] owns one [`CacheBank`] per configured associativity and
//! runs every recorded access through all of them, so the same stream can be
//! compared across 1-way, 2-way, 4-way, and 8-way organizations side by
//! side. Banks never share sets or entries; each simulates an independent
//! cache.
//!
//! Processing is single-threaded and synchronous: one
//! [`record_access`](Simulator::record_access) call probes and commits every
//! bank to completion before returning, so the call is one atomic unit. A
//! server embedding the simulator for concurrent callers should wrap the
//! whole `Simulator` value in a single lock; there is no meaningful
//! finer-grained concurrency over a working set this small.

use super::bank::{CacheBank, LineData, Lookup};
use super::config::SimulatorConfig;
use super::error::Result;

/// Marker payload installed for every line
const LINE_DATA: LineData = 1;

/// One bank plus its running counters
#[derive(Debug)]
struct BankSlot {
    /// Derived bank name, `"{ways}-way"`
    name: String,
    bank: CacheBank,
    hits: u64,
    misses: u64,
}

/// Cumulative statistics for one bank
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BankStats {
    /// Accesses that found the address resident
    pub hits: u64,
    /// Accesses that had to install the address
    pub misses: u64,
    /// `hits / (hits + misses)`, or `None` before the first recorded access
    /// (reported as "no data" rather than a bogus zero)
    pub hit_ratio: Option<f64>,
}

/// Outcome of one access against one bank
#[derive(Debug, Clone)]
pub struct BankAccess {
    /// Bank name, `"{ways}-way"`
    pub bank: String,
    /// Associativity of the bank
    pub ways: usize,
    /// Hit or miss verdict
    pub outcome: Lookup,
    /// Set index the address decoded to
    pub set_index: usize,
    /// Tag bits of the address, as a binary string
    pub tag: String,
    /// Full address in base 2, unpadded
    pub binary: String,
    /// Address displaced by the install, if any
    pub evicted: Option<u64>,
    /// Post-commit residents of the affected set, MRU first
    pub occupants: Vec<u64>,
}

/// Outcome of one access across every configured bank
#[derive(Debug, Clone)]
pub struct SimulationResult {
    /// The address that was accessed
    pub address: u64,
    /// Per-bank outcomes, in increasing-associativity order
    pub banks: Vec<BankAccess>,
}

impl SimulationResult {
    /// Verdict for the named bank, if it exists
    pub fn outcome(&self, bank: &str) -> Option<Lookup> {
        self.banks
            .iter()
            .find(|access| access.bank == bank)
            .map(|access| access.outcome)
    }
}

/// Simulation session state
///
/// # Example
///
/// ```
/// use waysim::core::config::SimulatorConfig;
/// use waysim::core::simulator::Simulator;
///
/// let mut sim = Simulator::new(SimulatorConfig::default()).unwrap();
/// let result = sim.record_access(42);
/// assert_eq!(result.banks.len(), 4);
///
/// let stats = sim.stats("1-way").unwrap();
/// assert_eq!(stats.hits + stats.misses, 1);
/// ```
#[derive(Debug)]
pub struct Simulator {
    banks: Vec<BankSlot>,
    /// Total addresses processed since construction or the last reset
    accesses: u64,
}

impl Simulator {
    /// Build a simulator from a validated configuration
    ///
    /// Banks are ordered by increasing associativity regardless of their
    /// order in the configuration, so per-access results and statistics are
    /// deterministic.
    ///
    /// # Errors
    ///
    /// Any validation error from [`SimulatorConfig::validate`].
    pub fn new(config: SimulatorConfig) -> Result<Self> {
        config.validate()?;

        let mut bank_configs = config.banks.clone();
        bank_configs.sort_by_key(|bank| bank.ways);

        let mut banks = Vec::with_capacity(bank_configs.len());
        for bank_config in &bank_configs {
            banks.push(BankSlot {
                name: format!("{}-way", bank_config.ways),
                bank: CacheBank::new(bank_config.ways, bank_config.set_count, config.word_size)?,
                hits: 0,
                misses: 0,
            });
        }

        log::info!(
            "Simulator: {} bank(s) configured ({}), word_size {}",
            banks.len(),
            banks
                .iter()
                .map(|slot| slot.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            config.word_size
        );

        Ok(Self { banks, accesses: 0 })
    }

    /// Run one address through every bank
    ///
    /// For each bank, in increasing-associativity order: probe, update that
    /// bank's counters, then commit the placeholder line (a hit still
    /// refreshes recency; a miss installs the new line and may evict).
    pub fn record_access(&mut self, address: u64) -> SimulationResult {
        let mut outcomes = Vec::with_capacity(self.banks.len());

        for slot in &mut self.banks {
            let outcome = slot.bank.probe(address);
            match outcome {
                Lookup::Hit => slot.hits += 1,
                Lookup::Miss => slot.misses += 1,
            }
            let evicted = slot.bank.commit(address, LINE_DATA);

            let decoded = slot.bank.decode(address);
            log::trace!(
                "address {address} -> {}: {} (set {}, tag '{}')",
                slot.name,
                outcome,
                decoded.index,
                decoded.tag
            );

            outcomes.push(BankAccess {
                bank: slot.name.clone(),
                ways: slot.bank.ways(),
                outcome,
                set_index: decoded.index,
                tag: decoded.tag,
                binary: decoded.binary,
                evicted,
                occupants: slot.bank.occupants(decoded.index),
            });
        }

        self.accesses += 1;
        SimulationResult {
            address,
            banks: outcomes,
        }
    }

    /// Cumulative statistics for the named bank
    ///
    /// Returns `None` for an unknown bank name. A known bank with no
    /// recorded accesses reports a `None` hit ratio instead of dividing by
    /// zero.
    pub fn stats(&self, bank: &str) -> Option<BankStats> {
        self.banks
            .iter()
            .find(|slot| slot.name == bank)
            .map(BankSlot::stats)
    }

    /// Statistics for every bank, in bank order
    pub fn all_stats(&self) -> Vec<(&str, BankStats)> {
        self.banks
            .iter()
            .map(|slot| (slot.name.as_str(), slot.stats()))
            .collect()
    }

    /// Names of the configured banks, in increasing-associativity order
    pub fn bank_names(&self) -> Vec<&str> {
        self.banks.iter().map(|slot| slot.name.as_str()).collect()
    }

    /// The configured banks, in increasing-associativity order
    ///
    /// Read-only inspection for reporting (set tables and geometry).
    pub fn banks(&self) -> impl Iterator<Item = &CacheBank> {
        self.banks.iter().map(|slot| &slot.bank)
    }

    /// Total addresses processed since construction or the last reset
    pub fn accesses(&self) -> u64 {
        self.accesses
    }

    /// Clear every bank and zero all counters
    pub fn reset(&mut self) {
        for slot in &mut self.banks {
            slot.bank.clear();
            slot.hits = 0;
            slot.misses = 0;
        }
        self.accesses = 0;
        log::info!("Simulator: reset");
    }
}

impl BankSlot {
    fn stats(&self) -> BankStats {
        let total = self.hits + self.misses;
        BankStats {
            hits: self.hits,
            misses: self.misses,
            hit_ratio: if total == 0 {
                None
            } else {
                Some(self.hits as f64 / total as f64)
            },
        }
    }
}
