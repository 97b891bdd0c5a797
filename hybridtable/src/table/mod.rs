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

//! Hybrid array/list table for integer keys.
//!
//! A [`HybridTable`] answers reads for small keys straight from a dense array
//! and keeps every other key in a sorted singly linked overflow list. Each
//! insertion of a new key re-evaluates whether the array should grow:
//!
//! - Candidate array sizes are powers of two (`2^ceil(sqrt(size))`, bumped
//!   once more if that does not exceed the current size).
//! - Overflow keys are walked in ascending order, counting how many cells of
//!   each candidate would be in use.
//! - A candidate is taken once that share reaches the grow threshold (75% by
//!   default), and the overflow entries it covers move into the array.
//!
//! # Usage
//!
//! ```rust
//! # use hybridtable::table::HybridTable;
//! let mut table = HybridTable::new();
//! table.set(10, 99);
//! assert_eq!(table.get(10), 99);
//! assert_eq!(table.total_size(), 5);
//! assert_eq!(table.to_string(), "0 : 0\n1 : 0\n2 : 0\n3 : 0\n---\n10 : 99");
//! ```
//!
//! # Serialization
//!
//! ```rust
//! # use hybridtable::table::HybridTable;
//! let mut table = HybridTable::from_values(&[1, 2, 3]);
//! table.set(-4, 4);
//!
//! let bytes = table.serialize();
//! let decoded = HybridTable::deserialize(&bytes).unwrap();
//! assert_eq!(decoded.get(-4), 4);
//! assert_eq!(decoded, table);
//! ```

mod growth;
mod hybrid;
mod overflow;
mod serialization;

pub use self::hybrid::DEFAULT_CAPACITY;
pub use self::hybrid::HybridTable;
pub use self::hybrid::HybridTableBuilder;
