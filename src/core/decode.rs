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

//! Address decomposition
//!
//! Maps a raw address onto the set index and tag of a bank with a given set
//! count and word granularity. For the word-granular configuration with 8
//! sets the split looks like:
//!
//! ```text
//! Address format (binary):
//! [ ...  tag  ... | index (3 bits) ]
//! ```
//!
//! With a word size above 1 (byte-granular addresses, multi-word lines) a
//! word-offset field sits below the index:
//!
//! ```text
//! [ ...  tag  ... | index | offset ]
//! ```
//!
//! Everything here is pure: identical `(address, set_count, word_size)`
//! inputs always yield identical outputs, and nothing is cached or mutated.
//! The set index is computed arithmetically (`(address / word_size) %
//! set_count`) so it stays exact for set counts that are not powers of two;
//! the tag is the address's binary form with the low index and offset
//! characters stripped, mirroring how the tag columns of the original
//! hardware tables are labelled.

/// Result of decomposing an address for one bank geometry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    /// Set index within the bank, `0..set_count`
    pub index: usize,
    /// High-order bits of the address, as a binary string; empty when the
    /// whole address fits in the index/offset fields
    pub tag: String,
    /// The full address in base 2, unpadded (display padding is a
    /// presentation concern, see [`frontend::report`](crate::frontend::report))
    pub binary: String,
}

/// Number of low-order bits needed to hold any index in `0..set_count`
///
/// `set_count` of 1 needs no index bits; 8 sets need 3.
pub fn index_bits(set_count: usize) -> usize {
    (usize::BITS - (set_count - 1).leading_zeros()) as usize
}

/// Number of low-order bits needed to hold any word offset in `0..word_size`
pub fn offset_bits(word_size: u64) -> usize {
    (u64::BITS - (word_size - 1).leading_zeros()) as usize
}

/// Set index for `address` under the given geometry, without string work
///
/// The fast path used on every probe/commit; [`decode`] builds on it.
pub fn set_index(address: u64, set_count: usize, word_size: u64) -> usize {
    let word_unit = address / word_size;
    (word_unit % set_count as u64) as usize
}

/// Decompose `address` into set index, tag, and binary form
///
/// # Arguments
///
/// * `address` - Raw non-negative address
/// * `set_count` - Number of sets in the bank (must be >= 1, validated at
///   configuration time)
/// * `word_size` - Address units per cache word (must be >= 1; 1 for
///   word-granular addresses, 4 for byte-granular addresses on 4-byte lines)
///
/// # Example
///
/// ```
/// use waysim::core::decode::decode;
///
/// let d = decode(11, 8, 1);
/// assert_eq!(d.index, 3);
/// assert_eq!(d.binary, "1011");
/// assert_eq!(d.tag, "1");
/// ```
pub fn decode(address: u64, set_count: usize, word_size: u64) -> Decoded {
    let index = set_index(address, set_count, word_size);
    let binary = format!("{address:b}");
    let low_bits = index_bits(set_count) + offset_bits(word_size);
    let tag = if binary.len() > low_bits {
        binary[..binary.len() - low_bits].to_string()
    } else {
        String::new()
    };

    Decoded { index, tag, binary }
}
