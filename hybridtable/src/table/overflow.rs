// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Sorted singly linked list holding the keys the array region does not cover.
//!
//! Nodes live in an arena and link to each other by slot index. Slots freed by
//! a migration are recycled by later inserts, so the arena only grows when the
//! list reaches a new high-water mark.

/// A list node. Only reachable through [`OverflowList`].
#[derive(Debug, Clone, Copy)]
struct Node {
    key: i64,
    value: i64,
    next: Option<usize>,
}

/// Overflow entries kept in strictly ascending key order.
#[derive(Debug, Clone, Default)]
pub(crate) struct OverflowList {
    nodes: Vec<Node>,
    free_slots: Vec<usize>,
    head: Option<usize>,
    len: usize,
}

impl PartialEq for OverflowList {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl Eq for OverflowList {}

impl OverflowList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from entries already sorted by strictly ascending key.
    pub fn from_sorted(entries: Vec<(i64, i64)>) -> Self {
        debug_assert!(entries.windows(2).all(|w| w[0].0 < w[1].0));

        let len = entries.len();
        let nodes = entries
            .into_iter()
            .enumerate()
            .map(|(slot, (key, value))| Node {
                key,
                value,
                next: (slot + 1 < len).then_some(slot + 1),
            })
            .collect();
        Self {
            nodes,
            free_slots: vec![],
            head: (len > 0).then_some(0),
            len,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Slot holding `key`, if any. The scan stops at the first larger key.
    fn position(&self, key: i64) -> Option<usize> {
        let mut cursor = self.head;
        while let Some(slot) = cursor {
            let node = &self.nodes[slot];
            if node.key == key {
                return Some(slot);
            }
            if node.key > key {
                return None;
            }
            cursor = node.next;
        }
        None
    }

    pub fn get(&self, key: i64) -> Option<i64> {
        self.position(key).map(|slot| self.nodes[slot].value)
    }

    pub fn get_mut(&mut self, key: i64) -> Option<&mut i64> {
        self.position(key).map(|slot| &mut self.nodes[slot].value)
    }

    /// Link a new entry for `key`, which must not be present yet.
    ///
    /// The entry goes to the head when the list is empty or `key` is below the
    /// head key. Otherwise it is linked after the last node whose key is
    /// `<= key`.
    pub fn insert(&mut self, key: i64, value: i64) {
        debug_assert!(self.position(key).is_none(), "duplicate overflow key {key}");

        match self.head {
            Some(head) if self.nodes[head].key <= key => {
                let mut at = head;
                while let Some(next) = self.nodes[at].next {
                    if self.nodes[next].key > key {
                        break;
                    }
                    at = next;
                }
                let next = self.nodes[at].next;
                let slot = self.alloc(Node { key, value, next });
                self.nodes[at].next = Some(slot);
            }
            _ => {
                let next = self.head;
                let slot = self.alloc(Node { key, value, next });
                self.head = Some(slot);
            }
        }
        self.len += 1;
    }

    /// Move every entry whose key indexes into `array` out of the list.
    ///
    /// Negative keys stay in the list. The walk ends at the first key that is
    /// `>= array.len()`. Returns the number of migrated entries.
    pub fn migrate_into(&mut self, array: &mut [i64]) -> usize {
        let mut migrated = 0;
        let mut prev: Option<usize> = None;
        let mut cursor = self.head;
        while let Some(slot) = cursor {
            let node = self.nodes[slot];
            cursor = node.next;

            let Ok(index) = usize::try_from(node.key) else {
                prev = Some(slot);
                continue;
            };
            if index >= array.len() {
                break;
            }

            array[index] = node.value;
            match prev {
                None => self.head = node.next,
                Some(p) => self.nodes[p].next = node.next,
            }
            self.free_slots.push(slot);
            self.len -= 1;
            migrated += 1;
        }
        migrated
    }

    /// Entries in ascending key order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            nodes: &self.nodes,
            cursor: self.head,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = i64> + '_ {
        self.iter().map(|(key, _)| key)
    }

    fn alloc(&mut self, node: Node) -> usize {
        match self.free_slots.pop() {
            Some(slot) => {
                self.nodes[slot] = node;
                slot
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }
}

/// Iterator over `(key, value)` pairs of an [`OverflowList`].
pub(crate) struct Iter<'a> {
    nodes: &'a [Node],
    cursor: Option<usize>,
}

impl Iterator for Iter<'_> {
    type Item = (i64, i64);

    fn next(&mut self) -> Option<Self::Item> {
        let node = &self.nodes[self.cursor?];
        self.cursor = node.next;
        Some((node.key, node.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(list: &OverflowList) -> Vec<(i64, i64)> {
        list.iter().collect()
    }

    #[test]
    fn test_insert_keeps_keys_sorted() {
        let mut list = OverflowList::new();
        assert!(list.is_empty());

        list.insert(20, 2);
        list.insert(10, 1); // new head
        list.insert(30, 3); // tail
        list.insert(15, 4); // middle
        list.insert(-5, 5); // negative keys sort before zero

        assert_eq!(list.len(), 5);
        assert_eq!(
            entries(&list),
            vec![(-5, 5), (10, 1), (15, 4), (20, 2), (30, 3)]
        );
    }

    #[test]
    fn test_get_and_get_mut() {
        let mut list = OverflowList::new();
        list.insert(7, 70);
        list.insert(3, 30);

        assert_eq!(list.get(7), Some(70));
        assert_eq!(list.get(3), Some(30));
        assert_eq!(list.get(5), None);
        assert_eq!(list.get(100), None);

        *list.get_mut(7).unwrap() = 77;
        assert_eq!(list.get(7), Some(77));
        assert!(list.get_mut(4).is_none());
    }

    #[test]
    fn test_migrate_into_respects_exclusive_bound() {
        let mut list = OverflowList::new();
        for key in [-1, 0, 3, 7, 8, 12] {
            list.insert(key, key * 10);
        }

        let mut array = vec![0; 8];
        let migrated = list.migrate_into(&mut array);

        assert_eq!(migrated, 3);
        assert_eq!(array, vec![0, 0, 0, 30, 0, 0, 0, 70]);
        // key == array.len() stays in the list, and so do negative keys
        assert_eq!(entries(&list), vec![(-1, -10), (8, 80), (12, 120)]);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_migrate_everything_empties_list() {
        let mut list = OverflowList::new();
        list.insert(5, 1);
        list.insert(4, 2);

        let mut array = vec![0; 8];
        assert_eq!(list.migrate_into(&mut array), 2);
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
        assert_eq!(list.iter().next(), None);
    }

    #[test]
    fn test_freed_slots_are_reused() {
        let mut list = OverflowList::new();
        list.insert(1, 1);
        list.insert(2, 2);
        list.insert(9, 9);

        let mut array = vec![0; 4];
        list.migrate_into(&mut array);
        assert_eq!(list.nodes.len(), 3);

        list.insert(6, 6);
        list.insert(5, 5);
        assert_eq!(list.nodes.len(), 3);
        assert_eq!(entries(&list), vec![(5, 5), (6, 6), (9, 9)]);
    }

    #[test]
    fn test_from_sorted_and_equality() {
        let built = OverflowList::from_sorted(vec![(1, 10), (4, 40), (9, 90)]);

        // same entries reached through a different slot layout
        let mut inserted = OverflowList::new();
        inserted.insert(9, 90);
        inserted.insert(4, 40);
        inserted.insert(1, 10);

        assert_eq!(built, inserted);
        assert_eq!(built.keys().collect::<Vec<_>>(), vec![1, 4, 9]);

        inserted.insert(10, 100);
        assert_ne!(built, inserted);
        assert!(OverflowList::from_sorted(vec![]).is_empty());
    }

    #[test]
    fn test_clone_is_independent() {
        let mut original = OverflowList::new();
        original.insert(10, 1);

        let mut copy = original.clone();
        *copy.get_mut(10).unwrap() = 2;
        copy.insert(11, 3);

        assert_eq!(entries(&original), vec![(10, 1)]);
        assert_eq!(entries(&copy), vec![(10, 2), (11, 3)]);
    }
}
