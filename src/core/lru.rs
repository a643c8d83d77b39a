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

//! Bounded LRU set: the building block of every cache bank
//!
//! An [`LruSet`] is a fixed-capacity associative container that keeps its
//! entries in strict most-recently-used to least-recently-used order and
//! evicts the LRU entry when a new key is inserted into a full set. It knows
//! nothing about caching semantics beyond capacity-bounded recency tracking;
//! index/tag decomposition lives in [`decode`](crate::core::decode) and
//! hit/miss bookkeeping in [`bank`](crate::core::bank).
//!
//! # Representation
//!
//! The recency order is a doubly-linked list threaded through an arena:
//! nodes live in a `Vec`, links are plain indices with a sentinel for "none",
//! and freed slots are recycled through a free list. A side map from key to
//! slot gives O(1) lookup. Compared to heap-allocated nodes with pointer
//! links this keeps all entries in one allocation and needs no unsafe code,
//! while move-to-front, insert, and evict all remain O(1).
//!
//! ```text
//! nodes:  [ {8, prev: NIL, next: 2} | (free) | {16, prev: 0, next: NIL} ]
//!            ^ head (MRU)                      ^ tail (LRU)
//! map:    { 8 -> slot 0, 16 -> slot 2 }
//! free:   [ 1 ]
//! ```
//!
//! # Example
//!
//! ```
//! use waysim::core::lru::LruSet;
//!
//! let mut set: LruSet<u64> = LruSet::new(2);
//! set.insert(10, 1);
//! set.insert(20, 1);
//! assert_eq!(set.insert(30, 1), Some(10)); // full: LRU key 10 evicted
//! assert_eq!(set.keys().collect::<Vec<_>>(), vec![30, 20]);
//! ```

use std::collections::HashMap;

/// Sentinel slot index meaning "no node"
const NIL: usize = usize::MAX;

/// One resident entry plus its recency links
#[derive(Debug, Clone)]
struct Node<V> {
    /// Key used for matching (the simulated address)
    key: u64,
    /// Opaque payload carried with the entry
    value: V,
    /// Slot of the next-more-recently-used node, or NIL at the head
    prev: usize,
    /// Slot of the next-less-recently-used node, or NIL at the tail
    next: usize,
}

/// Fixed-capacity recency-ordered associative container
///
/// Keys are `u64` addresses; the payload type is opaque to the set. The
/// most recently accessed or inserted key is always first in recency order,
/// keys are unique, and occupancy never exceeds `capacity`.
#[derive(Debug, Clone)]
pub struct LruSet<V> {
    /// Maximum number of entries (the associativity of the owning bank)
    capacity: usize,
    /// Node arena; freed slots are kept in `free` for reuse
    nodes: Vec<Option<Node<V>>>,
    /// Key to arena slot
    map: HashMap<u64, usize>,
    /// Slot of the MRU node, or NIL when empty
    head: usize,
    /// Slot of the LRU node, or NIL when empty
    tail: usize,
    /// Recycled arena slots
    free: Vec<usize>,
}

impl<V> LruSet<V> {
    /// Create an empty set with the given capacity
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0. A zero-capacity set could never retain an
    /// entry; callers validate this at configuration time, so reaching here
    /// with 0 is a contract violation rather than a recoverable error.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 1, "LruSet capacity must be at least 1");
        Self {
            capacity,
            nodes: Vec::with_capacity(capacity),
            map: HashMap::with_capacity(capacity),
            head: NIL,
            tail: NIL,
            free: Vec::new(),
        }
    }

    /// Look up `key`, promoting it to MRU on a hit
    ///
    /// Returns a reference to the payload if the key is resident. On a miss
    /// nothing is mutated (a pure probe): occupancy and recency order are
    /// untouched.
    ///
    /// # Example
    ///
    /// ```
    /// use waysim::core::lru::LruSet;
    ///
    /// let mut set: LruSet<u64> = LruSet::new(2);
    /// assert_eq!(set.access(7), None);
    /// set.insert(7, 99);
    /// assert_eq!(set.access(7), Some(&99));
    /// ```
    pub fn access(&mut self, key: u64) -> Option<&V> {
        let slot = *self.map.get(&key)?;
        self.move_to_front(slot);
        Some(&self.node(slot).value)
    }

    /// Look up `key` without touching recency order
    ///
    /// The non-mutating counterpart of [`access`](Self::access); reporting
    /// code uses it to inspect payloads without disturbing replacement state.
    pub fn peek(&self, key: u64) -> Option<&V> {
        let slot = *self.map.get(&key)?;
        Some(&self.node(slot).value)
    }

    /// Insert `key` as the new MRU entry, evicting the LRU entry if full
    ///
    /// If `key` is already present its payload is refreshed and the entry is
    /// promoted to MRU; occupancy is unchanged. If `key` is absent and the
    /// set is full, the least-recently-used entry is evicted first and its
    /// key returned. Otherwise the entry simply takes a spare slot.
    ///
    /// # Returns
    ///
    /// The evicted key, or `None` when no eviction was necessary
    pub fn insert(&mut self, key: u64, value: V) -> Option<u64> {
        if let Some(&slot) = self.map.get(&key) {
            self.node_mut(slot).value = value;
            self.move_to_front(slot);
            return None;
        }

        let evicted = if self.map.len() == self.capacity {
            Some(self.evict_lru())
        } else {
            None
        };

        let slot = self.alloc(Node {
            key,
            value,
            prev: NIL,
            next: self.head,
        });
        if self.head != NIL {
            self.node_mut(self.head).prev = slot;
        } else {
            self.tail = slot;
        }
        self.head = slot;
        self.map.insert(key, slot);

        evicted
    }

    /// Remove all entries; occupancy resets to 0, capacity is unchanged
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.map.clear();
        self.free.clear();
        self.head = NIL;
        self.tail = NIL;
    }

    /// Iterate over resident keys, MRU first
    ///
    /// Read-only: iteration does not affect recency order.
    pub fn keys(&self) -> Keys<'_, V> {
        Keys {
            set: self,
            cursor: self.head,
        }
    }

    /// Current number of resident entries
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True when no entries are resident
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Maximum number of entries this set can hold
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Unlink the tail node, forget its key, and recycle its slot
    fn evict_lru(&mut self) -> u64 {
        let slot = self.tail;
        debug_assert_ne!(slot, NIL, "evict_lru called on an empty set");
        let key = self.node(slot).key;
        self.unlink(slot);
        self.map.remove(&key);
        self.nodes[slot] = None;
        self.free.push(slot);
        key
    }

    /// Detach `slot` from the recency chain and re-attach it at the head
    fn move_to_front(&mut self, slot: usize) {
        if self.head == slot {
            return;
        }
        self.unlink(slot);
        let head = self.head;
        let node = self.node_mut(slot);
        node.prev = NIL;
        node.next = head;
        // The set holds at least two entries here (slot was not the head),
        // so the chain is never empty after the unlink
        self.node_mut(head).prev = slot;
        self.head = slot;
    }

    /// Detach `slot` from the chain, fixing head/tail as needed
    fn unlink(&mut self, slot: usize) {
        let (prev, next) = {
            let node = self.node(slot);
            (node.prev, node.next)
        };
        if prev != NIL {
            self.node_mut(prev).next = next;
        } else {
            self.head = next;
        }
        if next != NIL {
            self.node_mut(next).prev = prev;
        } else {
            self.tail = prev;
        }
    }

    /// Place a node into a recycled slot, or grow the arena
    fn alloc(&mut self, node: Node<V>) -> usize {
        match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = Some(node);
                slot
            }
            None => {
                self.nodes.push(Some(node));
                self.nodes.len() - 1
            }
        }
    }

    fn node(&self, slot: usize) -> &Node<V> {
        self.nodes[slot]
            .as_ref()
            .expect("recency chain references a freed slot")
    }

    fn node_mut(&mut self, slot: usize) -> &mut Node<V> {
        self.nodes[slot]
            .as_mut()
            .expect("recency chain references a freed slot")
    }
}

/// Iterator over resident keys in MRU-to-LRU order
///
/// Created by [`LruSet::keys`].
#[derive(Debug)]
pub struct Keys<'a, V> {
    set: &'a LruSet<V>,
    cursor: usize,
}

impl<V> Iterator for Keys<'_, V> {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.cursor == NIL {
            return None;
        }
        let node = self.set.node(self.cursor);
        self.cursor = node.next;
        Some(node.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn keys_of(set: &LruSet<u64>) -> Vec<u64> {
        set.keys().collect()
    }

    #[test]
    fn test_new_set_is_empty() {
        let set: LruSet<u64> = LruSet::new(4);
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert_eq!(set.capacity(), 4);
        assert_eq!(keys_of(&set), Vec::<u64>::new());
    }

    #[test]
    #[should_panic(expected = "capacity must be at least 1")]
    fn test_zero_capacity_panics() {
        let _set: LruSet<u64> = LruSet::new(0);
    }

    #[test]
    fn test_access_miss_mutates_nothing() {
        let mut set: LruSet<u64> = LruSet::new(2);
        set.insert(1, 10);
        set.insert(2, 20);

        assert_eq!(set.access(3), None);
        assert_eq!(set.len(), 2);
        assert_eq!(keys_of(&set), vec![2, 1]);
    }

    #[test]
    fn test_access_hit_promotes_to_mru() {
        let mut set: LruSet<u64> = LruSet::new(3);
        set.insert(1, 10);
        set.insert(2, 20);
        set.insert(3, 30);
        assert_eq!(keys_of(&set), vec![3, 2, 1]);

        assert_eq!(set.access(1), Some(&10));
        assert_eq!(keys_of(&set), vec![1, 3, 2]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_insert_fills_then_evicts_lru() {
        let mut set: LruSet<u64> = LruSet::new(2);
        assert_eq!(set.insert(1, 10), None);
        assert_eq!(set.insert(2, 20), None);
        assert_eq!(set.len(), 2);

        // 1 is the LRU entry and must be the one evicted
        assert_eq!(set.insert(3, 30), Some(1));
        assert_eq!(set.len(), 2);
        assert_eq!(keys_of(&set), vec![3, 2]);
        assert_eq!(set.access(1), None);
    }

    #[test]
    fn test_eviction_preserves_survivor_order() {
        let mut set: LruSet<u64> = LruSet::new(3);
        set.insert(1, 0);
        set.insert(2, 0);
        set.insert(3, 0);

        assert_eq!(set.insert(4, 0), Some(1));
        // 3 and 2 keep their relative order
        assert_eq!(keys_of(&set), vec![4, 3, 2]);
    }

    #[test]
    fn test_reinsert_present_key_refreshes_payload() {
        let mut set: LruSet<u64> = LruSet::new(2);
        set.insert(1, 10);
        set.insert(2, 20);

        // Re-inserting an existing key must not evict or grow the set
        assert_eq!(set.insert(1, 11), None);
        assert_eq!(set.len(), 2);
        assert_eq!(keys_of(&set), vec![1, 2]);
        assert_eq!(set.peek(1), Some(&11));
    }

    #[test]
    fn test_reaccess_mru_is_idempotent() {
        let mut set: LruSet<u64> = LruSet::new(2);
        set.insert(1, 10);
        set.insert(2, 20);

        for _ in 0..5 {
            assert_eq!(set.access(2), Some(&20));
        }
        assert_eq!(set.len(), 2);
        assert_eq!(keys_of(&set), vec![2, 1]);

        // Eviction target is unaffected by the repeated re-access
        assert_eq!(set.insert(3, 30), Some(1));
    }

    #[test]
    fn test_peek_does_not_promote() {
        let mut set: LruSet<u64> = LruSet::new(2);
        set.insert(1, 10);
        set.insert(2, 20);

        assert_eq!(set.peek(1), Some(&10));
        assert_eq!(keys_of(&set), vec![2, 1]);
    }

    #[test]
    fn test_clear_resets_occupancy() {
        let mut set: LruSet<u64> = LruSet::new(2);
        set.insert(1, 10);
        set.insert(2, 20);

        set.clear();
        assert!(set.is_empty());
        assert_eq!(keys_of(&set), Vec::<u64>::new());

        // The set is fully usable again after a clear
        assert_eq!(set.insert(3, 30), None);
        assert_eq!(keys_of(&set), vec![3]);
    }

    #[test]
    fn test_single_way_behaves_direct_mapped() {
        let mut set: LruSet<u64> = LruSet::new(1);
        assert_eq!(set.insert(0, 1), None);
        assert_eq!(set.insert(8, 1), Some(0));
        assert_eq!(set.insert(0, 1), Some(8));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_slot_reuse_after_eviction() {
        let mut set: LruSet<u64> = LruSet::new(2);
        // Churn well past capacity; the arena must recycle slots rather
        // than grow beyond the capacity bound
        for key in 0..100 {
            set.insert(key, key);
        }
        assert_eq!(set.len(), 2);
        assert!(set.nodes.len() <= 3);
        assert_eq!(keys_of(&set), vec![99, 98]);
    }

    /// Operations driven against a naive ordered-Vec reference model
    #[derive(Debug, Clone)]
    enum Op {
        Access(u64),
        Insert(u64),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        // A small key space keeps hit/evict paths well exercised
        prop_oneof![
            (0u64..16).prop_map(Op::Access),
            (0u64..16).prop_map(Op::Insert),
        ]
    }

    proptest! {
        #[test]
        fn prop_matches_reference_model(
            capacity in 1usize..9,
            ops in prop::collection::vec(op_strategy(), 0..200),
        ) {
            let mut set: LruSet<u64> = LruSet::new(capacity);
            // Reference model: MRU-first vector of keys
            let mut model: Vec<u64> = Vec::new();

            for op in ops {
                match op {
                    Op::Access(key) => {
                        let hit = set.access(key).is_some();
                        let model_hit = model.contains(&key);
                        prop_assert_eq!(hit, model_hit);
                        if model_hit {
                            model.retain(|&k| k != key);
                            model.insert(0, key);
                        }
                    }
                    Op::Insert(key) => {
                        let evicted = set.insert(key, key);
                        let expected_evicted = if model.contains(&key) {
                            model.retain(|&k| k != key);
                            None
                        } else if model.len() == capacity {
                            model.pop()
                        } else {
                            None
                        };
                        model.insert(0, key);
                        prop_assert_eq!(evicted, expected_evicted);
                    }
                }

                // Capacity and order invariants hold after every operation
                prop_assert!(set.len() <= capacity);
                prop_assert_eq!(set.keys().collect::<Vec<_>>(), model.clone());
            }
        }

        #[test]
        fn prop_touched_key_is_mru(
            capacity in 1usize..9,
            keys in prop::collection::vec(0u64..16, 1..100),
        ) {
            let mut set: LruSet<u64> = LruSet::new(capacity);
            for key in keys {
                set.insert(key, key);
                prop_assert_eq!(set.keys().next(), Some(key));
            }
        }
    }
}
