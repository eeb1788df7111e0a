// Copyright 2025 eraflo
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

//! Tick counters for the current retention window.

use timings_core::TickCounters;

/// Counts ticks and host activity since the last reset.
///
/// The timed tick count spans a whole history window; the other counters
/// are cleared at every minute boundary.
#[derive(Debug, Clone, Default)]
pub struct TicksTracker {
    counters: TickCounters,
    last_minute_time: u64,
    timing_start: u64,
    history_start: u64,
}

impl TicksTracker {
    /// Creates a tracker whose windows start at the given times.
    pub fn new(now_nanos: u64, now_unix_millis: u64) -> Self {
        Self {
            counters: TickCounters::default(),
            last_minute_time: now_nanos,
            timing_start: now_unix_millis,
            history_start: now_unix_millis,
        }
    }

    /// Clears the minute counters; a `full` reset clears the timed ticks too.
    pub fn reset_ticks(&mut self, full: bool, now_nanos: u64) {
        let timed = if full { 0 } else { self.counters.timed };
        self.counters = TickCounters {
            timed,
            ..TickCounters::default()
        };
        self.last_minute_time = now_nanos;
    }

    /// Ticks timed since the window started.
    pub fn timed_ticks(&self) -> u64 {
        self.counters.timed
    }

    pub(crate) fn increment_timed(&mut self) {
        self.counters.timed += 1;
    }

    /// Adds to the player tick counter.
    pub fn add_players(&mut self, count: u64) {
        self.counters.players += count;
    }

    /// Adds to the entity tick counter.
    pub fn add_entities(&mut self, count: u64) {
        self.counters.entities += count;
    }

    /// Adds to the block entity tick counter.
    pub fn add_block_entities(&mut self, count: u64) {
        self.counters.block_entities += count;
    }

    /// Adds to the activated entity tick counter.
    pub fn add_activated_entities(&mut self, count: u64) {
        self.counters.activated_entities += count;
    }

    /// A copy of the current counters.
    pub fn counters(&self) -> TickCounters {
        self.counters
    }

    /// Monotonic time at which the current minute started.
    pub fn last_minute_time(&self) -> u64 {
        self.last_minute_time
    }

    /// Wall-clock start of the session, in Unix milliseconds.
    pub fn timing_start(&self) -> u64 {
        self.timing_start
    }

    pub(crate) fn set_timing_start(&mut self, unix_millis: u64) {
        self.timing_start = unix_millis;
    }

    /// Wall-clock start of the history window, in Unix milliseconds.
    pub fn history_start(&self) -> u64 {
        self.history_start
    }

    pub(crate) fn set_history_start(&mut self, unix_millis: u64) {
        self.history_start = unix_millis;
    }
}
