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

//! Binary snapshot format constants for HybridTable
//!
//! ## Preamble Layout (Little Endian)
//!
//! | Byte | Field | Description |
//! |------|-------|-------------|
//! | 0 | serial_version | Snapshot version (currently 1) |
//! | 1 | family_id | Always 0x48 |
//! | 2 | flags | Bit flags (see below) |
//! | 3 | grow_threshold | Occupancy percentage, 1 to 100 |
//! | 4-7 | reserved | Always 0 |
//! | 8-15 | array_size | Number of array cells |
//! | 16-23 | overflow_len | Number of overflow entries |
//!
//! The preamble is followed by `array_size` cells (i64 each), then
//! `overflow_len` pairs of key (i64) and value (i64) in ascending key order.
//!
//! ## Flags (Byte 2)
//!
//! | Bit | Name | Description |
//! |-----|------|-------------|
//! | 0 | OVERFLOW_EMPTY | The overflow list has no entries |

pub const SERIAL_VERSION: u8 = 1;
pub const HYBRID_TABLE_FAMILY_ID: u8 = 0x48;

pub const FLAG_OVERFLOW_EMPTY: u8 = 1 << 0;

pub const PREAMBLE_BYTES: usize = 24;
pub const CELL_SIZE_BYTES: usize = 8;
pub const ENTRY_SIZE_BYTES: usize = 16;
