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

//! Text rendering of simulation output
//!
//! Renders the three views the simulator exposes: the per-access verdict
//! list (one line per bank), the per-bank set table (index, valid bit, and
//! resident addresses MRU-to-LRU), and the cumulative statistics table.
//! Index columns are shown in binary, left-padded to the bank's index width
//! with a minimum of 3 characters so small geometries still line up.

use crate::core::bank::CacheBank;
use crate::core::decode::index_bits;
use crate::core::simulator::{SimulationResult, Simulator};
use std::fmt::Write;

/// Minimum index column width, in binary digits
const MIN_INDEX_WIDTH: usize = 3;

/// `value` in base 2, left-padded with zeros to at least `width` characters
fn padded_binary(value: u64, width: usize) -> String {
    format!("{value:0>width$b}")
}

/// One verdict line per bank for a single access
///
/// ```text
/// address 8:
///   1-way cache: Miss
///   2-way cache: Hit
/// ```
pub fn render_access(result: &SimulationResult) -> String {
    let mut out = format!("address {}:\n", result.address);
    for access in &result.banks {
        let _ = writeln!(out, "  {} cache: {}", access.bank, access.outcome);
    }
    out
}

/// The full set table of one bank
///
/// One row per set: binary index, valid bit (1 once the set holds at least
/// one line), and the resident addresses MRU first, padded with `-` up to
/// the way count.
pub fn render_bank_table(bank: &CacheBank) -> String {
    let width = index_bits(bank.set_count()).max(MIN_INDEX_WIDTH);
    // The index column is at least as wide as its header
    let col = width.max("index".len());

    let mut out = format!(
        "{}-way cache ({} sets, word size {})\n",
        bank.ways(),
        bank.set_count(),
        bank.word_size()
    );
    let _ = writeln!(out, "{:>col$}  valid  contents (MRU -> LRU)", "index");

    for index in 0..bank.set_count() {
        let occupants = bank.occupants(index);
        let valid = if occupants.is_empty() { 0 } else { 1 };
        let mut cells: Vec<String> = occupants.iter().map(u64::to_string).collect();
        cells.resize(bank.ways(), "-".to_string());
        let _ = writeln!(
            out,
            "{:>col$}  {valid:>5}  {}",
            padded_binary(index as u64, width),
            cells.join(" ")
        );
    }
    out
}

/// The cumulative statistics table across all banks
///
/// The hit ratio column shows `-` for a bank with no recorded accesses.
pub fn render_stats_table(sim: &Simulator) -> String {
    let mut out = String::from("bank    hits  misses  hit ratio\n");
    for (name, stats) in sim.all_stats() {
        let ratio = match stats.hit_ratio {
            Some(ratio) => format!("{:.2}%", ratio * 100.0),
            None => "-".to_string(),
        };
        let _ = writeln!(
            out,
            "{name:<6}  {:>4}  {:>6}  {ratio:>9}",
            stats.hits, stats.misses
        );
    }
    out
}
