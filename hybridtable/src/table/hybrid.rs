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

//! HybridTable implementation
//!
//! Keys in `[0, array_size)` live in a dense array. All other keys live in a
//! sorted overflow list until the growth policy decides the array should
//! absorb them.

use std::fmt;

use crate::codec::TableBytes;
use crate::codec::TableSlice;
use crate::error::Error;
use crate::error::ErrorKind;
use crate::table::growth::DEFAULT_GROW_THRESHOLD;
use crate::table::growth::GrowthPolicy;
use crate::table::overflow::OverflowList;
use crate::table::serialization::CELL_SIZE_BYTES;
use crate::table::serialization::ENTRY_SIZE_BYTES;
use crate::table::serialization::FLAG_OVERFLOW_EMPTY;
use crate::table::serialization::HYBRID_TABLE_FAMILY_ID;
use crate::table::serialization::PREAMBLE_BYTES;
use crate::table::serialization::SERIAL_VERSION;

/// Default number of array cells of a new table.
pub const DEFAULT_CAPACITY: usize = 4;

/// Integer table backed by a dense array and a sorted overflow list.
///
/// Reading a key that was never written returns 0.
///
/// # Examples
///
/// ```
/// # use hybridtable::HybridTable;
/// let mut table = HybridTable::new();
/// table.set(1, 10);
/// table.set(100, 20);
///
/// assert_eq!(table.get(1), 10);
/// assert_eq!(table.get(100), 20);
/// assert_eq!(table.get(50), 0);
/// assert_eq!(table.array_size(), 4);
/// assert_eq!(table.total_size(), 5);
/// ```
#[derive(Debug, PartialEq, Eq)]
pub struct HybridTable {
    array: Vec<i64>,
    overflow: OverflowList,
    policy: GrowthPolicy,
}

impl Default for HybridTable {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for HybridTable {
    fn clone(&self) -> Self {
        Self {
            array: self.array.clone(),
            overflow: self.overflow.clone(),
            policy: self.policy,
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.array.clone_from(&source.array);
        self.overflow.clone_from(&source.overflow);
        self.policy = source.policy;
    }
}

impl From<Vec<i64>> for HybridTable {
    fn from(values: Vec<i64>) -> Self {
        Self {
            array: values,
            overflow: OverflowList::new(),
            policy: GrowthPolicy::default(),
        }
    }
}

impl From<&[i64]> for HybridTable {
    fn from(values: &[i64]) -> Self {
        Self::from_values(values)
    }
}

impl HybridTable {
    /// Create an empty table with [`DEFAULT_CAPACITY`] zeroed array cells.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a new builder for HybridTable
    ///
    /// # Examples
    ///
    /// ```
    /// # use hybridtable::HybridTable;
    /// let table = HybridTable::builder().capacity(16).grow_threshold(50).build();
    /// assert_eq!(table.array_size(), 16);
    /// assert_eq!(table.grow_threshold(), 50);
    /// ```
    pub fn builder() -> HybridTableBuilder {
        HybridTableBuilder::default()
    }

    /// Create a table whose array region is a copy of `values`.
    ///
    /// The array size is `values.len()` and the overflow list starts empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use hybridtable::HybridTable;
    /// let table = HybridTable::from_values(&[5, 6]);
    /// assert_eq!(table.array_size(), 2);
    /// assert_eq!(table.get(1), 6);
    /// ```
    pub fn from_values(values: &[i64]) -> Self {
        Self::from(values.to_vec())
    }

    /// Return the value stored for `key`, or 0 if the key is absent.
    ///
    /// Keys inside the array range are read directly. Every other key,
    /// including negative ones, is looked up in the overflow list.
    pub fn get(&self, key: i64) -> i64 {
        if let Some(index) = self.array_index(key) {
            return self.array[index];
        }
        self.overflow.get(key).unwrap_or(0)
    }

    /// Store `value` for `key`.
    ///
    /// An existing key is overwritten in place. A new key goes into the
    /// overflow list, after which the array may grow and absorb every
    /// overflow entry that falls inside its new range.
    ///
    /// # Examples
    ///
    /// ```
    /// # use hybridtable::HybridTable;
    /// let mut table = HybridTable::new();
    /// for key in 4..8 {
    ///     table.set(key, key * 10);
    /// }
    /// assert_eq!(table.array_size(), 8);
    /// assert_eq!(table.total_size(), 8);
    /// assert_eq!(table.get(5), 50);
    /// ```
    pub fn set(&mut self, key: i64, value: i64) {
        if let Some(index) = self.array_index(key) {
            self.array[index] = value;
            return;
        }
        if let Some(existing) = self.overflow.get_mut(key) {
            *existing = value;
            return;
        }

        self.overflow.insert(key, value);
        let target = self
            .policy
            .target_capacity(self.array.len(), self.overflow.keys());
        if target > self.array.len() {
            self.grow(target);
        }
    }

    /// Return the number of array cells.
    pub fn array_size(&self) -> usize {
        self.array.len()
    }

    /// Return the number of array cells plus the number of overflow entries.
    pub fn total_size(&self) -> usize {
        self.array.len() + self.overflow.len()
    }

    /// Return the number of overflow entries.
    pub fn overflow_len(&self) -> usize {
        self.overflow.len()
    }

    /// Return the occupancy percentage at which the array grows.
    pub fn grow_threshold(&self) -> u8 {
        self.policy.threshold_percent()
    }

    fn array_index(&self, key: i64) -> Option<usize> {
        usize::try_from(key)
            .ok()
            .filter(|&index| index < self.array.len())
    }

    /// Replace the array with a zeroed one of `new_size` cells holding the old
    /// cells as a prefix, then migrate overflow entries that now fit.
    fn grow(&mut self, new_size: usize) {
        debug_assert!(new_size > self.array.len());

        let old_size = self.array.len();
        let mut array = vec![0; new_size];
        array[..old_size].copy_from_slice(&self.array);
        let migrated = self.overflow.migrate_into(&mut array);
        self.array = array;

        log::debug!(
            "grew array from {old_size} to {new_size} cells, migrated {migrated} overflow entries, {} remain",
            self.overflow.len()
        );
    }

    /// Serialize the table to bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// # use hybridtable::HybridTable;
    /// let mut table = HybridTable::new();
    /// table.set(42, 7);
    /// let bytes = table.serialize();
    /// let restored = HybridTable::deserialize(&bytes).unwrap();
    /// assert_eq!(table, restored);
    /// ```
    pub fn serialize(&self) -> Vec<u8> {
        let total_bytes = PREAMBLE_BYTES
            + self.array.len() * CELL_SIZE_BYTES
            + self.overflow.len() * ENTRY_SIZE_BYTES;
        let mut bytes = TableBytes::with_capacity(total_bytes);

        let mut flags = 0u8;
        if self.overflow.is_empty() {
            flags |= FLAG_OVERFLOW_EMPTY;
        }

        bytes.write_u8(SERIAL_VERSION);
        bytes.write_u8(HYBRID_TABLE_FAMILY_ID);
        bytes.write_u8(flags);
        bytes.write_u8(self.policy.threshold_percent());
        bytes.write_u32_le(0); // reserved
        bytes.write_u64_le(self.array.len() as u64);
        bytes.write_u64_le(self.overflow.len() as u64);

        for &cell in &self.array {
            bytes.write_i64_le(cell);
        }
        for (key, value) in self.overflow.iter() {
            bytes.write_i64_le(key);
            bytes.write_i64_le(value);
        }

        bytes.into_bytes()
    }

    /// Deserialize a table from bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The bytes are too short for the sizes recorded in the preamble
    /// - The family id or serial version is not recognized
    /// - The grow threshold is outside `1..=100`
    /// - The overflow keys are not strictly ascending, or one of them lies
    ///   inside the array range
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        fn make_error(tag: &'static str) -> impl FnOnce(std::io::Error) -> Error {
            move |err| Error::insufficient_data(tag).set_source(err)
        }

        if bytes.len() < PREAMBLE_BYTES {
            return Err(Error::insufficient_data("preamble"));
        }

        let mut cursor = TableSlice::new(bytes);
        let serial_version = cursor.read_u8().map_err(make_error("serial_version"))?;
        let family_id = cursor.read_u8().map_err(make_error("family_id"))?;
        let flags = cursor.read_u8().map_err(make_error("flags"))?;
        let grow_threshold = cursor.read_u8().map_err(make_error("grow_threshold"))?;
        let _reserved = cursor.read_u32_le().map_err(make_error("reserved"))?;
        let array_size = cursor.read_u64_le().map_err(make_error("array_size"))?;
        let overflow_len = cursor.read_u64_le().map_err(make_error("overflow_len"))?;

        if family_id != HYBRID_TABLE_FAMILY_ID {
            return Err(Error::invalid_family(HYBRID_TABLE_FAMILY_ID, family_id));
        }
        if serial_version != SERIAL_VERSION {
            return Err(Error::unsupported_serial_version(
                SERIAL_VERSION,
                serial_version,
            ));
        }
        if !(1..=100).contains(&grow_threshold) {
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!("grow threshold {grow_threshold} is out of range [1, 100]"),
            ));
        }
        let overflow_empty = (flags & FLAG_OVERFLOW_EMPTY) != 0;
        if overflow_empty != (overflow_len == 0) {
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!("overflow empty flag disagrees with overflow length {overflow_len}"),
            ));
        }

        // Check recorded sizes against the remaining bytes before allocating.
        let array_size = usize::try_from(array_size)
            .ok()
            .filter(|&n| n <= cursor.remaining() / CELL_SIZE_BYTES)
            .ok_or_else(|| {
                Error::insufficient_data("array_cells").with_context("array_size", array_size)
            })?;
        let mut array = Vec::with_capacity(array_size);
        for _ in 0..array_size {
            array.push(cursor.read_i64_le().map_err(make_error("array_cell"))?);
        }

        let overflow_len = usize::try_from(overflow_len)
            .ok()
            .filter(|&n| n <= cursor.remaining() / ENTRY_SIZE_BYTES)
            .ok_or_else(|| {
                Error::insufficient_data("overflow_entries")
                    .with_context("overflow_len", overflow_len)
            })?;
        let mut entries: Vec<(i64, i64)> = Vec::with_capacity(overflow_len);
        for _ in 0..overflow_len {
            let key = cursor.read_i64_le().map_err(make_error("overflow_key"))?;
            let value = cursor.read_i64_le().map_err(make_error("overflow_value"))?;

            if let Some(&(prev, _)) = entries.last() {
                if key <= prev {
                    return Err(Error::new(
                        ErrorKind::InvalidData,
                        format!("overflow keys are not strictly ascending: {key} after {prev}"),
                    ));
                }
            }
            if usize::try_from(key).is_ok_and(|index| index < array_size) {
                return Err(Error::new(
                    ErrorKind::InvalidData,
                    format!("overflow key {key} lies inside the array range [0, {array_size})"),
                ));
            }
            entries.push((key, value));
        }

        Ok(Self {
            array,
            overflow: OverflowList::from_sorted(entries),
            policy: GrowthPolicy::new(grow_threshold),
        })
    }
}

/// Renders one `"<index> : <value>"` line per array cell. A non-empty overflow
/// list follows after a `---` line, as `"<key> : <value>"` entries joined by
/// `" --> "`.
///
/// # Examples
///
/// ```
/// # use hybridtable::HybridTable;
/// let mut table = HybridTable::from_values(&[0, 0]);
/// table.set(5, 7);
/// assert_eq!(table.to_string(), "0 : 0\n1 : 0\n---\n5 : 7");
/// ```
impl fmt::Display for HybridTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, value) in self.array.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{index} : {value}")?;
        }

        if !self.overflow.is_empty() {
            write!(f, "\n---\n")?;
            for (i, (key, value)) in self.overflow.iter().enumerate() {
                if i > 0 {
                    f.write_str(" --> ")?;
                }
                write!(f, "{key} : {value}")?;
            }
        }

        Ok(())
    }
}

/// Builder for HybridTable
#[derive(Debug)]
pub struct HybridTableBuilder {
    capacity: usize,
    grow_threshold: u8,
}

impl Default for HybridTableBuilder {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            grow_threshold: DEFAULT_GROW_THRESHOLD,
        }
    }
}

impl HybridTableBuilder {
    /// Set the initial number of array cells.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the occupancy percentage at which a candidate array size is taken.
    ///
    /// # Panics
    ///
    /// If `percent` is not in range [1, 100]
    ///
    /// # Examples
    ///
    /// ```
    /// # use hybridtable::HybridTable;
    /// let mut table = HybridTable::builder().grow_threshold(50).build();
    /// table.set(6, 1);
    /// // 5 of the 8 cells of the next candidate size would be in use
    /// assert_eq!(table.array_size(), 8);
    /// ```
    pub fn grow_threshold(mut self, percent: u8) -> Self {
        assert!(
            (1..=100).contains(&percent),
            "grow_threshold must be in [1, 100], got {percent}"
        );
        self.grow_threshold = percent;
        self
    }

    /// Build the HybridTable.
    pub fn build(self) -> HybridTable {
        HybridTable {
            array: vec![0; self.capacity],
            overflow: OverflowList::new(),
            policy: GrowthPolicy::new(self.grow_threshold),
        }
    }
}
