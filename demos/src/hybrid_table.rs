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

//! Example demonstrating hybrid table usage
//!
//! Run with `RUST_LOG=debug` to see the array grow.

use hybridtable::HybridTable;

fn main() {
    env_logger::init();

    println!("=== Hybrid Table Example ===\n");

    // Example 1: Sparse keys stay in the overflow list
    println!("1. Sparse keys:");
    let mut table = HybridTable::new();
    table.set(10, 99);
    table.set(1000, 7);
    println!("   Array size: {}", table.array_size());
    println!("   Total size: {}", table.total_size());
    println!("   get(10) = {}, get(2) = {}", table.get(10), table.get(2));
    println!("{table}");
    println!();

    // Example 2: Dense keys make the array grow
    println!("2. Dense keys:");
    for key in 4..40 {
        table.set(key, key * key);
        log::info!("set {key}: array size {}", table.array_size());
    }
    println!("   Array size: {}", table.array_size());
    println!("   Overflow entries: {}", table.overflow_len());
    println!("   get(20) = {}", table.get(20));
    println!();

    // Example 3: Copies are independent
    println!("3. Copies:");
    let mut copy = table.clone();
    copy.set(10, -1);
    println!("   original get(10) = {}", table.get(10));
    println!("   copy get(10) = {}", copy.get(10));
    println!();

    // Example 4: Snapshot to bytes and back
    println!("4. Serialization:");
    let bytes = table.serialize();
    println!("   Serialized size: {} bytes", bytes.len());
    match HybridTable::deserialize(&bytes) {
        Ok(restored) => println!("   Restored equals original: {}", restored == table),
        Err(err) => println!("   Failed to restore table: {err}"),
    }
}
