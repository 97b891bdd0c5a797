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

use std::collections::BTreeMap;

use googletest::assert_that;
use googletest::prelude::contains_substring;
use googletest::prelude::eq;
use googletest::prelude::ge;
use hybridtable::HybridTable;

/// Overflow keys in the order `Display` renders them.
fn overflow_keys(table: &HybridTable) -> Vec<i64> {
    let rendered = table.to_string();
    let Some((_, list)) = rendered.split_once("---\n") else {
        return vec![];
    };
    list.split(" --> ")
        .map(|entry| {
            let (key, _) = entry.split_once(" : ").unwrap();
            key.parse().unwrap()
        })
        .collect()
}

#[test]
fn test_default_table_is_zeroed() {
    let table = HybridTable::new();
    assert_eq!(table.array_size(), 4);
    assert_eq!(table.total_size(), 4);
    assert_eq!(table.overflow_len(), 0);
    assert_eq!(table.grow_threshold(), 75);
    for key in -10..10 {
        assert_eq!(table.get(key), 0);
    }
    assert_eq!(table.to_string(), "0 : 0\n1 : 0\n2 : 0\n3 : 0");
    assert_eq!(table, HybridTable::default());
}

#[test]
fn test_sparse_key_stays_in_overflow() {
    let mut table = HybridTable::new();
    table.set(10, 99);

    assert_eq!(overflow_keys(&table), vec![10]);
    assert_that!(table.total_size(), eq(5));
    assert_eq!(table.get(10), 99);
    assert_eq!(table.get(2), 0);
}

#[test_log::test]
fn test_dense_keys_grow_array() {
    let mut table = HybridTable::new();
    for (key, value) in [(4, 40), (5, 50), (6, 60), (7, 70)] {
        table.set(key, value);
    }

    assert_that!(table.array_size(), eq(8));
    assert!(overflow_keys(&table).is_empty());
    assert_that!(table.to_string().as_str(), contains_substring("7 : 70"));
    assert_eq!(table.total_size(), 8);
    assert_eq!(table.get(5), 50);
    assert_eq!(table.get(7), 70);
}

#[test]
fn test_display_with_overflow() {
    let mut table = HybridTable::from_values(&[0, 0]);
    table.set(5, 7);
    assert_eq!(table.array_size(), 2);
    assert_eq!(table.to_string(), "0 : 0\n1 : 0\n---\n5 : 7");

    table.set(9, 1);
    table.set(-3, 2);
    assert_eq!(
        table.to_string(),
        "0 : 0\n1 : 0\n---\n-3 : 2 --> 5 : 7 --> 9 : 1"
    );
}

#[test]
fn test_from_values() {
    let values = vec![3, 1, 4, 1, 5, 9];
    let table = HybridTable::from(values.clone());
    assert_eq!(table.array_size(), 6);
    assert_eq!(table.total_size(), 6);
    for (key, value) in values.iter().enumerate() {
        assert_eq!(table.get(key as i64), *value);
    }
    assert_eq!(table, HybridTable::from(values.as_slice()));
}

#[test_log::test]
fn test_sequential_keys_follow_candidate_sizes() {
    let mut table = HybridTable::new();
    let mut sizes = vec![table.array_size()];
    for key in 4..1000 {
        table.set(key, key * 2);
        if sizes.last() != Some(&table.array_size()) {
            sizes.push(table.array_size());
        }
    }

    assert_eq!(sizes, vec![4, 8, 16, 32, 64, 256]);
    assert_eq!(table.overflow_len(), 744);
    assert_eq!(table.total_size(), 1000);
    for key in 0..1000 {
        let expected = if key < 4 { 0 } else { key * 2 };
        assert_eq!(table.get(key), expected);
    }
}

#[test]
fn test_growth_boundary_is_exclusive() {
    let mut table = HybridTable::new();
    table.set(8, 80);
    table.set(4, 40);
    table.set(5, 50);

    assert_eq!(table.array_size(), 8);
    assert_eq!(overflow_keys(&table), vec![8]);
    assert_eq!(table.get(8), 80);
}

#[test]
fn test_matches_btree_model() {
    let mut table = HybridTable::new();
    let mut model = BTreeMap::new();

    // deterministic mix of dense, sparse, repeated and negative keys
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    for step in 0..600i64 {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let bits = (state >> 8) as i64;
        let key = match state % 4 {
            0 => bits % 64,
            1 => bits % 4096,
            2 => -(bits % 32),
            _ => bits % 300,
        };

        let size_before = table.array_size();
        table.set(key, step);
        model.insert(key, step);

        // growing never loses or changes a stored value
        assert_that!(table.array_size(), ge(size_before));
        for (k, v) in &model {
            assert_eq!(table.get(*k), *v, "key {k} after step {step}");
        }

        let keys = overflow_keys(&table);
        assert!(keys.windows(2).all(|w| w[0] < w[1]), "unsorted: {keys:?}");
        for k in &keys {
            assert!(*k < 0 || *k as usize >= table.array_size());
        }
        assert_eq!(table.overflow_len(), keys.len());
        assert_eq!(table.total_size(), table.array_size() + keys.len());
    }

    for key in [-1000, -33, 4096, 1 << 40] {
        assert_eq!(table.get(key), 0);
    }
}

#[test]
fn test_clone_is_deep() {
    let mut original = HybridTable::new();
    original.set(1, 10);
    original.set(100, 1000);

    let mut copy = original.clone();
    copy.set(1, 11);
    copy.set(100, 1001);
    copy.set(200, 2);
    for key in 4..8 {
        copy.set(key, key);
    }

    assert_eq!(original.get(1), 10);
    assert_eq!(original.get(100), 1000);
    assert_eq!(original.get(200), 0);
    assert_eq!(original.array_size(), 4);
    assert_eq!(original.total_size(), 5);
    assert_ne!(original, copy);
}

#[test]
fn test_clone_from_overwrites_target() {
    let mut source = HybridTable::new();
    source.set(3, 3);
    source.set(40, 4);

    let mut target = HybridTable::builder().capacity(32).grow_threshold(90).build();
    target.set(500, 5);
    target.clone_from(&source);

    assert_eq!(target, source);
    assert_eq!(target.to_string(), source.to_string());
    assert_eq!(target.get(500), 0);
    assert_eq!(target.grow_threshold(), 75);

    target.set(40, 0);
    assert_eq!(source.get(40), 4);
}

#[test]
fn test_assigning_own_copy_is_noop() {
    let mut table = HybridTable::new();
    table.set(2, 2);
    table.set(77, 7);
    let rendered = table.to_string();

    let snapshot = table.clone();
    table.clone_from(&snapshot);

    assert_eq!(table.to_string(), rendered);
    assert_eq!(table.total_size(), 5);
}

#[test]
fn test_builder_threshold_controls_growth() {
    let mut eager = HybridTable::builder().grow_threshold(50).build();
    let mut lazy = HybridTable::builder().grow_threshold(100).build();
    for key in [4, 5, 6] {
        eager.set(key, 1);
        lazy.set(key, 1);
    }

    assert_eq!(eager.array_size(), 8);
    assert_eq!(lazy.array_size(), 4);
    assert_eq!(lazy.overflow_len(), 3);

    lazy.set(7, 1);
    assert_eq!(lazy.array_size(), 8);
    assert_eq!(lazy.overflow_len(), 0);
}
