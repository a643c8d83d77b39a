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

//! Simulator configuration
//!
//! All geometry is fixed at construction time: which associativities to
//! simulate, how many sets each bank has, and the word granularity of
//! addresses. None of it is runtime-mutable.
//!
//! Set counts are an explicit per-bank parameter because two reasonable
//! conventions exist and both are in real use:
//!
//! - **Fixed sets** ([`SimulatorConfig::fixed_sets`]): every bank keeps the
//!   same number of index slots regardless of associativity, so total
//!   capacity grows with the way count.
//! - **Fixed capacity** ([`SimulatorConfig::fixed_capacity`]): the total
//!   line count is constant and the set count shrinks as ways grow
//!   (`set_count = total_lines / ways`).
//!
//! Configurations can also be loaded from TOML files:
//!
//! ```toml
//! word_size = 1
//!
//! [[banks]]
//! ways = 1
//! set_count = 8
//!
//! [[banks]]
//! ways = 2
//! set_count = 8
//! ```

use super::error::{Result, SimulatorError};
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_word_size() -> u64 {
    1
}

/// Geometry of one cache bank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankConfig {
    /// Associativity: lines per set
    pub ways: usize,
    /// Number of index slots
    pub set_count: usize,
}

/// Full simulator configuration: word granularity plus one entry per bank
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Address units per cache word (1 = word-granular addresses)
    #[serde(default = "default_word_size")]
    pub word_size: u64,
    /// Banks to simulate in parallel against the same address stream
    pub banks: Vec<BankConfig>,
}

impl Default for SimulatorConfig {
    /// The classic teaching configuration: 1/2/4/8-way banks with 8 sets
    /// each, word-granular addresses
    fn default() -> Self {
        Self::fixed_sets(&[1, 2, 4, 8], 8, 1)
    }
}

impl SimulatorConfig {
    /// Build a configuration where every bank has the same `set_count`
    ///
    /// Total capacity grows with associativity: an 8-set bank holds 8 lines
    /// at 1 way but 32 lines at 4 ways.
    pub fn fixed_sets(ways: &[usize], set_count: usize, word_size: u64) -> Self {
        Self {
            word_size,
            banks: ways
                .iter()
                .map(|&ways| BankConfig { ways, set_count })
                .collect(),
        }
    }

    /// Build a configuration that preserves total capacity across banks
    ///
    /// Every bank holds `total_lines` lines; the set count is derived as
    /// `total_lines / ways`.
    ///
    /// # Errors
    ///
    /// Returns [`SimulatorError::IndivisibleCapacity`] if `total_lines` is
    /// not a multiple of some entry in `ways`.
    pub fn fixed_capacity(total_lines: usize, ways: &[usize], word_size: u64) -> Result<Self> {
        let banks = ways
            .iter()
            .map(|&ways| {
                if ways == 0 {
                    return Err(SimulatorError::InvalidWays { ways });
                }
                if total_lines % ways != 0 {
                    return Err(SimulatorError::IndivisibleCapacity { total_lines, ways });
                }
                Ok(BankConfig {
                    ways,
                    set_count: total_lines / ways,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { word_size, banks })
    }

    /// Load and validate a configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns [`SimulatorError::ConfigIo`] if the file cannot be read,
    /// [`SimulatorError::ConfigParse`] if it is not a valid configuration
    /// document, or any validation error from [`validate`](Self::validate).
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SimulatorError::ConfigIo {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self =
            toml::from_str(&text).map_err(|source| SimulatorError::ConfigParse {
                path: path.display().to_string(),
                source,
            })?;
        config.validate()?;
        log::debug!(
            "Loaded configuration from '{}': {} bank(s), word_size {}",
            path.display(),
            config.banks.len(),
            config.word_size
        );
        Ok(config)
    }

    /// Check every construction-time contract
    ///
    /// # Errors
    ///
    /// - [`SimulatorError::EmptyConfig`] when no banks are configured
    /// - [`SimulatorError::InvalidWordSize`] when `word_size` is 0
    /// - [`SimulatorError::InvalidWays`] / [`SimulatorError::InvalidSetCount`]
    ///   when a bank parameter is 0
    /// - [`SimulatorError::DuplicateBank`] when two banks share the same
    ///   associativity (bank names are derived from it and must be unique)
    pub fn validate(&self) -> Result<()> {
        if self.word_size == 0 {
            return Err(SimulatorError::InvalidWordSize { word_size: 0 });
        }
        if self.banks.is_empty() {
            return Err(SimulatorError::EmptyConfig);
        }
        let mut seen = Vec::with_capacity(self.banks.len());
        for bank in &self.banks {
            if bank.ways == 0 {
                return Err(SimulatorError::InvalidWays { ways: 0 });
            }
            if bank.set_count == 0 {
                return Err(SimulatorError::InvalidSetCount { set_count: 0 });
            }
            if seen.contains(&bank.ways) {
                return Err(SimulatorError::DuplicateBank { ways: bank.ways });
            }
            seen.push(bank.ways);
        }
        Ok(())
    }
}
