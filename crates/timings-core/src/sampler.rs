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

//! Contracts for the data the engine pulls from outside the timed code.
//!
//! "Sampling" is distinct from timing in that it polls the process or the
//! host for a snapshot of its state, whereas timers measure regions of code.

use std::fmt::Debug;

/// Memory usage at one point in time, in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MemorySample {
    /// Memory used by the process.
    pub used_bytes: f64,
    /// Memory still available to the process.
    pub free_bytes: f64,
}

/// Polls the operating system for memory and load figures.
pub trait SystemSampler: Send + Debug + 'static {
    /// Returns the current memory usage.
    fn sample_memory(&mut self) -> MemorySample;

    /// Returns the one-minute system load average, or a negative value when
    /// the platform does not report one.
    fn load_average(&mut self) -> f64;
}

/// A sampler that always reports the same figures.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedSampler {
    /// Reported memory sample.
    pub memory: MemorySample,
    /// Reported load average.
    pub load_average: f64,
}

impl SystemSampler for FixedSampler {
    fn sample_memory(&mut self) -> MemorySample {
        self.memory
    }

    fn load_average(&mut self) -> f64 {
        self.load_average
    }
}

/// Host-specific figures gathered once per tick.
pub trait HostProbe: Send + Debug + 'static {
    /// Number of connected players, added to the tick counters every tick.
    fn online_players(&self) -> u64 {
        0
    }

    /// Average player ping in milliseconds, reported per minute.
    fn average_ping_ms(&self) -> f64 {
        0.0
    }
}

/// A host with nothing to report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHost;

impl HostProbe for NoHost {}
