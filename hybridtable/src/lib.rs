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

//! # hybridtable
//!
//! An integer-keyed table that stores small keys in a dense array and every
//! other key in a sorted overflow list. The array grows by powers of two once
//! the overflow keys would fill enough of a larger array.
//!
//! Diagnostics are emitted through the [`log`] facade; install any logger in
//! the binary to see when and how far the array grows.

mod codec;
pub mod error;
pub mod table;

pub use self::table::HybridTable;
