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

//! Error types for the cache simulator
//!
//! Two classes of failure exist:
//!
//! - **Boundary errors**: malformed textual input rejected before it reaches
//!   the core ([`SimulatorError::InvalidAddress`]). The core itself only ever
//!   sees validated non-negative integers.
//! - **Configuration errors**: invalid construction parameters (associativity,
//!   set count, or word size below 1, empty or duplicate bank lists, unreadable
//!   configuration files). These are fatal at startup and never recoverable
//!   mid-session.
//!
//! A statistics query against a bank with no recorded accesses is *not* an
//! error; it yields a `None` hit ratio (see
//! [`BankStats`](crate::core::simulator::BankStats)).

use thiserror::Error;

/// Simulator error types
#[derive(Error, Debug)]
pub enum SimulatorError {
    /// Address input that is not a non-negative integer
    #[error("Invalid address input: '{input}'")]
    InvalidAddress {
        /// The rejected raw input text
        input: String,
    },

    /// Associativity below the minimum of 1
    #[error("Associativity must be at least 1 (got {ways})")]
    InvalidWays {
        /// The rejected way count
        ways: usize,
    },

    /// Set count below the minimum of 1
    #[error("Set count must be at least 1 (got {set_count})")]
    InvalidSetCount {
        /// The rejected set count
        set_count: usize,
    },

    /// Word size below the minimum of 1
    #[error("Word size must be at least 1 (got {word_size})")]
    InvalidWordSize {
        /// The rejected word size
        word_size: u64,
    },

    /// Configuration with no cache banks at all
    #[error("Configuration declares no cache banks")]
    EmptyConfig,

    /// Two banks configured with the same associativity
    #[error("Duplicate {ways}-way bank in configuration")]
    DuplicateBank {
        /// The duplicated way count
        ways: usize,
    },

    /// Total line count that cannot be split evenly into sets
    #[error("Cache capacity of {total_lines} lines is not divisible by {ways} ways")]
    IndivisibleCapacity {
        /// Total number of cache lines requested
        total_lines: usize,
        /// Way count that does not divide it
        ways: usize,
    },

    /// Configuration file could not be read
    #[error("Failed to read config file '{path}': {source}")]
    ConfigIo {
        /// Path of the file that failed to load
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML for a simulator configuration
    #[error("Failed to parse config file '{path}': {source}")]
    ConfigParse {
        /// Path of the file that failed to parse
        path: String,
        /// Underlying TOML error
        #[source]
        source: toml::de::Error,
    },
}

/// Result type alias for simulator operations
pub type Result<T> = std::result::Result<T, SimulatorError>;
