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

//! Snapshots retained by the engine and the bounded queue that holds them.
//!
//! Everything in here is a copy: once a snapshot is built, mutating the live
//! timers cannot change it.

use crate::data::TimingData;
use std::collections::VecDeque;

/// Tick counters accumulated over one minute window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickCounters {
    /// Ticks that were timed.
    pub timed: u64,
    /// Sum over ticks of the connected player count.
    pub players: u64,
    /// Entities ticked.
    pub entities: u64,
    /// Block entities ticked.
    pub block_entities: u64,
    /// Entities ticked while activated.
    pub activated_entities: u64,
}

/// Summary of one minute of ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct MinuteReport {
    /// Creation time, in seconds since the Unix epoch.
    pub time: u64,
    /// Tick counters for the minute.
    pub ticks: TickCounters,
    /// Ticks per second measured over the minute.
    pub tps: f64,
    /// Average host ping in milliseconds.
    pub avg_ping: f64,
    /// The root timer's minute-scoped totals.
    pub data: TimingData,
    /// Moving average of process memory in use, if sampled yet.
    pub used_memory: Option<f64>,
    /// Moving average of free memory, if sampled yet.
    pub free_memory: Option<f64>,
    /// System load average.
    pub load_avg: f64,
}

/// Copy of a timer's totals and of its per-child breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct TimingHistoryEntry {
    /// The timer's own totals.
    pub data: TimingData,
    /// Totals of every child measured inside the timer.
    pub children: Vec<TimingData>,
}

/// Everything recorded during one history interval.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRecord {
    /// Start of the interval, in seconds since the Unix epoch.
    pub start_time: u64,
    /// End of the interval, in seconds since the Unix epoch.
    pub end_time: u64,
    /// Ticks timed during the interval.
    pub total_ticks: u64,
    /// Time spent in the root tick timer, in nanoseconds.
    pub total_time: u64,
    /// Minute reports of the interval, oldest first.
    pub minute_reports: Vec<MinuteReport>,
    /// One entry per timer that recorded data during the interval.
    pub entries: Vec<TimingHistoryEntry>,
}

impl HistoryRecord {
    /// Builds a record; the tick total is summed from the minute reports.
    pub fn new(
        start_time: u64,
        end_time: u64,
        total_time: u64,
        minute_reports: Vec<MinuteReport>,
        entries: Vec<TimingHistoryEntry>,
    ) -> Self {
        let total_ticks = minute_reports.iter().map(|m| m.ticks.timed).sum();
        Self {
            start_time,
            end_time,
            total_ticks,
            total_time,
            minute_reports,
            entries,
        }
    }
}

/// A FIFO queue that drops its oldest element once full.
#[derive(Debug, Clone)]
pub struct BoundedHistory<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedHistory<T> {
    /// Creates an empty queue holding at most `capacity` elements.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends an element, returning the evicted oldest one if the queue was full.
    pub fn push(&mut self, item: T) -> Option<T> {
        let evicted = if self.items.len() == self.capacity {
            self.items.pop_front()
        } else {
            None
        };
        self.items.push_back(item);
        evicted
    }

    /// Removes every element.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Number of elements held.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true when empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Maximum number of elements.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterates oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    /// The most recently pushed element.
    pub fn last(&self) -> Option<&T> {
        self.items.back()
    }
}
