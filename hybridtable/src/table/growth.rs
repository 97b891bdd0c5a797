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

//! Array growth policy
//!
//! The array region only grows when a larger power-of-two window would be
//! densely used. Candidate windows come from [`next_capacity`]; the overflow
//! keys are walked in ascending order and a candidate is committed once the
//! share of the window it would fill reaches the grow threshold.

/// Default occupancy percentage at which a candidate size is committed.
pub(crate) const DEFAULT_GROW_THRESHOLD: u8 = 75;

/// Next candidate array size after `size`.
///
/// The candidate is `2^ceil(sqrt(size))`, using one more power of two when that
/// value does not exceed `size`. This gives 0→1, 1→2, 2→4, 4→8, 8→16, 16→32,
/// 32→64, 64→256, 256→65536. Returns `None` once the candidate no longer fits
/// in a `usize`.
pub(crate) fn next_capacity(size: usize) -> Option<usize> {
    let root = size.isqrt();
    let mut exp = if root * root < size { root + 1 } else { root };

    let mut candidate = shl_one(exp)?;
    if candidate <= size {
        exp += 1;
        candidate = shl_one(exp)?;
    }
    Some(candidate)
}

fn shl_one(exp: usize) -> Option<usize> {
    u32::try_from(exp)
        .ok()
        .and_then(|exp| 1usize.checked_shl(exp))
}

/// Decides the array size a table should have for its overflow keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct GrowthPolicy {
    threshold_percent: u8,
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_GROW_THRESHOLD)
    }
}

impl GrowthPolicy {
    pub fn new(threshold_percent: u8) -> Self {
        debug_assert!((1..=100).contains(&threshold_percent));
        Self { threshold_percent }
    }

    pub fn threshold_percent(&self) -> u8 {
        self.threshold_percent
    }

    /// Array size to grow to, given the current `capacity` and the overflow
    /// keys in ascending order. Returns `capacity` when no candidate qualifies.
    pub fn target_capacity(&self, capacity: usize, keys: impl IntoIterator<Item = i64>) -> usize {
        let Some(mut candidate) = next_capacity(capacity) else {
            return capacity;
        };
        let mut target = capacity;
        let mut used = capacity;

        for key in keys {
            // negative keys never index the array
            let index = usize::try_from(key).ok();
            if index.is_some_and(|index| index < candidate) {
                used += 1;
            }

            if self.reaches_threshold(used, candidate) {
                log::trace!("committing array size {candidate} ({used} of {candidate} in use)");
                target = candidate;
                used = candidate;
            }

            if index.is_some_and(|index| index >= candidate) {
                match next_capacity(candidate) {
                    Some(next) => {
                        candidate = next;
                        used += 1;
                    }
                    None => break,
                }
            }
        }

        target
    }

    fn reaches_threshold(&self, used: usize, candidate: usize) -> bool {
        used as u128 * 100 >= candidate as u128 * self.threshold_percent as u128
    }
}
