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

//! waysim: a set-associative LRU cache simulator
//!
//! This crate simulates how a stream of memory addresses behaves against
//! set-associative caches of different associativities (1-way through 8-way)
//! under least-recently-used replacement, tracking hit/miss verdicts and
//! cumulative statistics per cache.
//!
//! # Architecture
//!
//! - [`core`]: the simulation engine (LRU sets, address decoding, cache
//!   banks, the multi-bank simulator)
//! - [`frontend`]: text presentation layer (input validation, table and
//!   statistics rendering)
//!
//! # Example
//!
//! ```
//! use waysim::core::config::SimulatorConfig;
//! use waysim::core::simulator::Simulator;
//!
//! let mut sim = Simulator::new(SimulatorConfig::default())?;
//! let result = sim.record_access(42);
//! for access in &result.banks {
//!     println!("{}: {}", access.bank, access.outcome);
//! }
//! # Ok::<(), waysim::SimulatorError>(())
//! ```
//!
//! # Error Handling
//!
//! All fallible operations return [`core::error::Result<T>`] which is an
//! alias for `Result<T, SimulatorError>`. Querying statistics before any
//! access is not an error; it yields a `None` hit ratio.

pub mod core;
pub mod frontend;

// Re-export commonly used types
pub use core::error::{Result, SimulatorError};
