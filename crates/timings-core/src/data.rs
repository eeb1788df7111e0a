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

//! The aggregate record kept for every timer and every parent/child edge.

use crate::identity::TimerId;

/// Accumulated cost of a timer (or of one child inside a parent).
///
/// Samples first land in the current-tick scratch counters and are moved
/// into the lifetime totals (and, for lag ticks, the lag totals) when the
/// tick is committed. Lag samples are always a subset of lifetime samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingData {
    id: TimerId,
    lifetime_count: u64,
    lifetime_total: u64,
    lag_count: u64,
    lag_total: u64,
    current_tick_count: u64,
    current_tick_total: u64,
}

impl TimingData {
    /// Creates an empty record for the given timer.
    pub fn new(id: TimerId) -> Self {
        Self {
            id,
            lifetime_count: 0,
            lifetime_total: 0,
            lag_count: 0,
            lag_total: 0,
            current_tick_count: 0,
            current_tick_total: 0,
        }
    }

    /// The timer this record belongs to.
    pub fn id(&self) -> TimerId {
        self.id
    }

    /// Number of committed samples.
    pub fn lifetime_count(&self) -> u64 {
        self.lifetime_count
    }

    /// Committed time in nanoseconds.
    pub fn lifetime_total(&self) -> u64 {
        self.lifetime_total
    }

    /// Number of committed samples that happened during lag ticks.
    pub fn lag_count(&self) -> u64 {
        self.lag_count
    }

    /// Committed time during lag ticks, in nanoseconds.
    pub fn lag_total(&self) -> u64 {
        self.lag_total
    }

    /// Samples recorded during the tick that has not been committed yet.
    pub fn current_tick_count(&self) -> u64 {
        self.current_tick_count
    }

    /// Time recorded during the tick that has not been committed yet.
    pub fn current_tick_total(&self) -> u64 {
        self.current_tick_total
    }

    /// Records one sample of `diff` nanoseconds in the scratch counters.
    pub fn add(&mut self, diff: u64) {
        self.current_tick_count += 1;
        self.current_tick_total = self.current_tick_total.saturating_add(diff);
    }

    /// Adds time to the scratch total without counting a sample.
    pub fn add_time(&mut self, diff: u64) {
        self.current_tick_total = self.current_tick_total.saturating_add(diff);
    }

    /// Overwrites the scratch counters.
    pub fn set_current(&mut self, count: u64, total: u64) {
        self.current_tick_count = count;
        self.current_tick_total = total;
    }

    /// Moves the scratch counters into the lifetime totals, and into the lag
    /// totals as well when the tick was `violated`.
    pub fn process_tick(&mut self, violated: bool) {
        self.lifetime_total = self.lifetime_total.saturating_add(self.current_tick_total);
        self.lifetime_count += self.current_tick_count;
        if violated {
            self.lag_total = self.lag_total.saturating_add(self.current_tick_total);
            self.lag_count += self.current_tick_count;
        }
        self.current_tick_count = 0;
        self.current_tick_total = 0;
    }

    /// Zeroes every counter.
    pub fn reset(&mut self) {
        *self = Self::new(self.id);
    }

    /// Copies the committed totals; the scratch counters of the copy are zero.
    pub fn snapshot(&self) -> Self {
        Self {
            current_tick_count: 0,
            current_tick_total: 0,
            ..self.clone()
        }
    }

    /// Returns true once at least one sample has been committed.
    pub fn has_data(&self) -> bool {
        self.lifetime_count > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> TimingData {
        TimingData::new(TimerId::from_index(0))
    }

    #[test]
    fn test_add_accumulates_in_scratch_only() {
        let mut d = data();
        d.add(10);
        d.add(32);

        assert_eq!(d.current_tick_count(), 2);
        assert_eq!(d.current_tick_total(), 42);
        assert_eq!(d.lifetime_count(), 0);
        assert!(!d.has_data());
    }

    #[test]
    fn test_commit_without_lag() {
        let mut d = data();
        d.add(5);
        d.add(7);
        d.process_tick(false);

        assert_eq!(d.lifetime_count(), 2);
        assert_eq!(d.lifetime_total(), 12);
        assert_eq!(d.lag_count(), 0);
        assert_eq!(d.lag_total(), 0);
        assert_eq!(d.current_tick_count(), 0);
        assert_eq!(d.current_tick_total(), 0);
    }

    #[test]
    fn test_commit_with_lag_keeps_lag_a_subset() {
        let mut d = data();
        d.add(100);
        d.process_tick(true);
        d.add(3);
        d.add(4);
        d.process_tick(false);

        assert_eq!(d.lag_count(), 1);
        assert_eq!(d.lag_total(), 100);
        assert_eq!(d.lifetime_count(), 3);
        assert_eq!(d.lifetime_total(), 107);
        assert!(d.lifetime_count() >= d.lag_count());
        assert!(d.lifetime_total() >= d.lag_total());
    }

    #[test]
    fn test_add_time_does_not_count() {
        let mut d = data();
        d.add(10);
        d.add_time(5);
        assert_eq!(d.current_tick_count(), 1);
        assert_eq!(d.current_tick_total(), 15);
    }

    #[test]
    fn test_snapshot_drops_scratch() {
        let mut d = data();
        d.add(9);
        d.process_tick(false);
        d.add(1);

        let copy = d.snapshot();
        assert_eq!(copy.lifetime_total(), 9);
        assert_eq!(copy.current_tick_total(), 0);

        // Later mutation of the original does not reach the copy.
        d.process_tick(true);
        assert_eq!(copy.lifetime_count(), 1);
        assert_eq!(d.lifetime_count(), 2);
    }

    #[test]
    fn test_reset_keeps_id() {
        let id = TimerId::from_index(4);
        let mut d = TimingData::new(id);
        d.add(1);
        d.process_tick(true);
        d.reset();
        assert_eq!(d, TimingData::new(id));
    }
}
