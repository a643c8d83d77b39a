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

//! Core simulation components
//!
//! Dependency order, leaves first:
//!
//! - [`lru`]: bounded recency-ordered set, the replacement engine
//! - [`decode`]: pure address -> (index, tag) decomposition
//! - [`bank`]: one cache of fixed geometry, composed of LRU sets
//! - [`simulator`]: parallel banks plus cumulative statistics
//!
//! [`config`] carries the construction-time geometry and [`error`] the
//! shared error taxonomy.

pub mod bank;
pub mod config;
pub mod decode;
pub mod error;
pub mod lru;
pub mod simulator;

#[cfg(test)]
mod tests;

// Re-exports
pub use bank::{CacheBank, LineData, Lookup};
pub use config::{BankConfig, SimulatorConfig};
pub use decode::{decode, Decoded};
pub use error::{Result, SimulatorError};
pub use lru::LruSet;
pub use simulator::{BankAccess, BankStats, SimulationResult, Simulator};
