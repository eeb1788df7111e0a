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

//! Time sources used by the engine.

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// A source of monotonic and wall-clock time.
pub trait Clock: Send + Sync + Debug + 'static {
    /// Monotonic nanoseconds since an arbitrary origin.
    fn now_nanos(&self) -> u64;

    /// Wall-clock milliseconds since the Unix epoch.
    fn unix_millis(&self) -> u64;
}

/// The real clock: `Instant` for durations, `SystemTime` for timestamps.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Creates a clock whose monotonic origin is now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_nanos(&self) -> u64 {
        self.origin.elapsed().as_nanos() as u64
    }

    fn unix_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// A clock that only moves when told to.
///
/// Wall-clock time follows the monotonic time from a fixed base, so both
/// views stay consistent.
#[derive(Debug)]
pub struct ManualClock {
    nanos: AtomicU64,
    unix_base_millis: u64,
}

impl ManualClock {
    /// Creates a clock at monotonic zero and the given wall-clock time.
    pub fn new(unix_base_millis: u64) -> Self {
        Self {
            nanos: AtomicU64::new(0),
            unix_base_millis,
        }
    }

    /// Moves the clock forward.
    pub fn advance(&self, nanos: u64) {
        self.nanos.fetch_add(nanos, Ordering::SeqCst);
    }

    /// Moves the clock forward by whole milliseconds.
    pub fn advance_millis(&self, millis: u64) {
        self.advance(millis * 1_000_000);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(1_700_000_000_000)
    }
}

impl Clock for ManualClock {
    fn now_nanos(&self) -> u64 {
        self.nanos.load(Ordering::SeqCst)
    }

    fn unix_millis(&self) -> u64 {
        self.unix_base_millis + self.now_nanos() / 1_000_000
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotonic_clock_never_goes_back() {
        let clock = MonotonicClock::new();
        let a = clock.now_nanos();
        let b = clock.now_nanos();
        assert!(b >= a);
        assert!(clock.unix_millis() > 0);
    }

    #[test]
    fn test_manual_clock_moves_both_views() {
        let clock = ManualClock::new(1_000);
        assert_eq!(clock.now_nanos(), 0);
        assert_eq!(clock.unix_millis(), 1_000);

        clock.advance(1_500);
        clock.advance_millis(2);
        assert_eq!(clock.now_nanos(), 2_001_500);
        assert_eq!(clock.unix_millis(), 1_002);
    }
}
