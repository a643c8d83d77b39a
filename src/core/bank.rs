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

//! Cache bank: one simulated cache of a single associativity
//!
//! A [`CacheBank`] owns `set_count` [`LruSet`]s, each with capacity equal to
//! the bank's associativity. An access decodes the address to a set index,
//! then delegates to that set.
//!
//! Probing and installing are deliberately split into [`probe`] and
//! [`commit`]: a probe reports hit or miss without changing occupancy (a hit
//! still refreshes recency inside the set), and the commit that follows
//! installs or refreshes the line. Callers can therefore observe the verdict
//! and report on it before the write mutates the set they are reporting on.
//!
//! [`probe`]: CacheBank::probe
//! [`commit`]: CacheBank::commit

use super::decode::{self, Decoded};
use super::error::{Result, SimulatorError};
use super::lru::LruSet;

/// Placeholder line payload
///
/// No real memory contents are simulated; every installed line carries a
/// constant marker value.
pub type LineData = u64;

/// Verdict of a cache probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// The address was resident in its set
    Hit,
    /// The address was not resident and must be installed
    Miss,
}

impl Lookup {
    /// True for [`Lookup::Hit`]
    pub fn is_hit(self) -> bool {
        matches!(self, Lookup::Hit)
    }
}

impl std::fmt::Display for Lookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lookup::Hit => write!(f, "Hit"),
            Lookup::Miss => write!(f, "Miss"),
        }
    }
}

/// A set-associative cache of fixed geometry
///
/// # Example
///
/// ```
/// use waysim::core::bank::{CacheBank, Lookup};
///
/// let mut bank = CacheBank::new(2, 8, 1).unwrap();
/// assert_eq!(bank.probe(12), Lookup::Miss);
/// bank.commit(12, 1);
/// assert_eq!(bank.probe(12), Lookup::Hit);
/// ```
#[derive(Debug)]
pub struct CacheBank {
    /// Associativity: capacity of every set
    ways: usize,
    /// Number of index slots
    set_count: usize,
    /// Address units per cache word
    word_size: u64,
    /// One LRU set per index value
    sets: Vec<LruSet<LineData>>,
}

impl CacheBank {
    /// Create a bank with the given geometry
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `ways`, `set_count`, or `word_size`
    /// is 0. These are startup-time contract violations, never recoverable
    /// mid-session.
    pub fn new(ways: usize, set_count: usize, word_size: u64) -> Result<Self> {
        if ways == 0 {
            return Err(SimulatorError::InvalidWays { ways });
        }
        if set_count == 0 {
            return Err(SimulatorError::InvalidSetCount { set_count });
        }
        if word_size == 0 {
            return Err(SimulatorError::InvalidWordSize { word_size });
        }

        let sets = (0..set_count).map(|_| LruSet::new(ways)).collect();
        log::debug!("CacheBank: {ways} way(s) x {set_count} set(s), word_size {word_size}");

        Ok(Self {
            ways,
            set_count,
            word_size,
            sets,
        })
    }

    /// Probe for `address`, recording the access in its set's recency order
    ///
    /// On a hit the matching entry is promoted to MRU; on a miss nothing is
    /// mutated. The line is *not* installed here — call
    /// [`commit`](Self::commit) afterwards, whatever the verdict.
    pub fn probe(&mut self, address: u64) -> Lookup {
        let index = decode::set_index(address, self.set_count, self.word_size);
        if self.sets[index].access(address).is_some() {
            Lookup::Hit
        } else {
            Lookup::Miss
        }
    }

    /// Install or refresh the line for `address`
    ///
    /// Always called after [`probe`](Self::probe): a hit refreshes the
    /// payload and recency of the resident line, a miss installs a new line,
    /// evicting the set's LRU entry when the set is full.
    ///
    /// # Returns
    ///
    /// The evicted address, if the install displaced one
    pub fn commit(&mut self, address: u64, data: LineData) -> Option<u64> {
        let index = decode::set_index(address, self.set_count, self.word_size);
        let evicted = self.sets[index].insert(address, data);
        if let Some(victim) = evicted {
            log::debug!(
                "{}-way bank: set {index} evicted address {victim} for {address}",
                self.ways
            );
        }
        evicted
    }

    /// Resident addresses of the set at `index`, MRU first
    ///
    /// Read-only; does not affect recency.
    ///
    /// # Panics
    ///
    /// Panics if `index >= set_count`. Decode guarantees in-range indices
    /// for any address, so an out-of-range index is a programmer error.
    pub fn occupants(&self, index: usize) -> Vec<u64> {
        assert!(
            index < self.set_count,
            "set index {index} out of range (set_count {})",
            self.set_count
        );
        self.sets[index].keys().collect()
    }

    /// Decompose `address` under this bank's geometry
    pub fn decode(&self, address: u64) -> Decoded {
        decode::decode(address, self.set_count, self.word_size)
    }

    /// Remove every line from every set
    pub fn clear(&mut self) {
        for set in &mut self.sets {
            set.clear();
        }
    }

    /// Associativity of this bank
    pub fn ways(&self) -> usize {
        self.ways
    }

    /// Number of index slots
    pub fn set_count(&self) -> usize {
        self.set_count
    }

    /// Address units per cache word
    pub fn word_size(&self) -> u64 {
        self.word_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bank_construction_rejects_zero_geometry() {
        assert!(matches!(
            CacheBank::new(0, 8, 1),
            Err(SimulatorError::InvalidWays { ways: 0 })
        ));
        assert!(matches!(
            CacheBank::new(1, 0, 1),
            Err(SimulatorError::InvalidSetCount { set_count: 0 })
        ));
        assert!(matches!(
            CacheBank::new(1, 8, 0),
            Err(SimulatorError::InvalidWordSize { word_size: 0 })
        ));
    }

    #[test]
    fn test_probe_miss_then_commit_then_hit() {
        let mut bank = CacheBank::new(2, 8, 1).unwrap();

        assert_eq!(bank.probe(12), Lookup::Miss);
        bank.commit(12, 1);
        assert_eq!(bank.probe(12), Lookup::Hit);
    }

    #[test]
    fn test_probe_alone_does_not_install() {
        let mut bank = CacheBank::new(2, 8, 1).unwrap();

        // Probing twice without a commit must miss twice
        assert_eq!(bank.probe(12), Lookup::Miss);
        assert_eq!(bank.probe(12), Lookup::Miss);
        assert!(bank.occupants(4).is_empty()); // 12 % 8 = 4
    }

    #[test]
    fn test_direct_mapped_conflict() {
        // 1-way, 8 sets: addresses 0 and 8 collide on set 0
        let mut bank = CacheBank::new(1, 8, 1).unwrap();

        assert_eq!(bank.probe(0), Lookup::Miss);
        bank.commit(0, 1);
        assert_eq!(bank.probe(8), Lookup::Miss);
        assert_eq!(bank.commit(8, 1), Some(0));
        assert_eq!(bank.probe(0), Lookup::Miss);
        assert_eq!(bank.occupants(0), vec![8]);
    }

    #[test]
    fn test_occupants_mru_first() {
        let mut bank = CacheBank::new(4, 1, 1).unwrap();
        for addr in [1, 2, 3] {
            bank.probe(addr);
            bank.commit(addr, 1);
        }
        assert_eq!(bank.occupants(0), vec![3, 2, 1]);

        // A hit moves the address to the front without reordering the rest
        assert_eq!(bank.probe(1), Lookup::Hit);
        bank.commit(1, 1);
        assert_eq!(bank.occupants(0), vec![1, 3, 2]);
    }

    #[test]
    fn test_word_size_groups_addresses() {
        // word_size 4: addresses 0..=3 share one word, all map to set 0
        let mut bank = CacheBank::new(1, 8, 4).unwrap();
        bank.probe(0);
        bank.commit(0, 1);

        // Address 1 is in the same word unit but is a distinct key
        assert_eq!(bank.probe(1), Lookup::Miss);
        // Address 32 maps back to set 0 (32 / 4 = 8, 8 % 8 = 0)
        bank.commit(32, 1);
        assert_eq!(bank.occupants(0), vec![32]);
    }

    #[test]
    fn test_clear_empties_all_sets() {
        let mut bank = CacheBank::new(2, 4, 1).unwrap();
        for addr in 0..8 {
            bank.probe(addr);
            bank.commit(addr, 1);
        }

        bank.clear();
        for index in 0..4 {
            assert!(bank.occupants(index).is_empty());
        }
        assert_eq!(bank.probe(0), Lookup::Miss);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_occupants_out_of_range_panics() {
        let bank = CacheBank::new(1, 8, 1).unwrap();
        let _ = bank.occupants(8);
    }

    #[test]
    fn test_decode_matches_geometry() {
        let bank = CacheBank::new(2, 8, 1).unwrap();
        let d = bank.decode(11);
        assert_eq!(d.index, 3);
        assert_eq!(d.tag, "1");
    }
}
