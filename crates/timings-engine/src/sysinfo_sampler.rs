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

//! sysinfo-based implementation of the SystemSampler trait.

use std::fmt;
use sysinfo::{Pid, ProcessesToUpdate, System};
use timings_core::{MemorySample, SystemSampler};

/// Weight of the history in the memory moving average.
const MEMORY_AVERAGE_WINDOW: f64 = 60.0;

/// Folds a new sample into an exponentially weighted moving average.
///
/// The first sample initializes the average.
pub fn moving_average(average: Option<f64>, sample: f64) -> f64 {
    match average {
        None => sample,
        Some(average) => {
            average * ((MEMORY_AVERAGE_WINDOW - 1.0) / MEMORY_AVERAGE_WINDOW)
                + sample * (1.0 / MEMORY_AVERAGE_WINDOW)
        }
    }
}

/// A system sampler that uses the `sysinfo` crate.
///
/// Used memory is the resident memory of the current process; when the
/// process cannot be inspected, the system-wide usage is reported instead.
pub struct SysinfoSampler {
    system: System,
    pid: Option<Pid>,
}

impl SysinfoSampler {
    /// Creates a new SysinfoSampler.
    pub fn new() -> Self {
        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => Some(pid),
            Err(e) => {
                log::warn!("Cannot resolve the current process id: {e}");
                None
            }
        };
        Self {
            system: System::new(),
            pid,
        }
    }
}

impl SystemSampler for SysinfoSampler {
    fn sample_memory(&mut self) -> MemorySample {
        self.system.refresh_memory();
        let process_memory = self.pid.and_then(|pid| {
            self.system
                .refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
            self.system.process(pid).map(|process| process.memory())
        });
        let used = process_memory.unwrap_or_else(|| {
            self.system
                .total_memory()
                .saturating_sub(self.system.available_memory())
        });
        MemorySample {
            used_bytes: used as f64,
            free_bytes: self.system.available_memory() as f64,
        }
    }

    fn load_average(&mut self) -> f64 {
        System::load_average().one
    }
}

impl fmt::Debug for SysinfoSampler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SysinfoSampler")
            .field("pid", &self.pid)
            .finish_non_exhaustive()
    }
}

impl Default for SysinfoSampler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moving_average_first_sample_initializes() {
        assert_eq!(moving_average(None, 600.0), 600.0);
    }

    #[test]
    fn test_moving_average_weights() {
        let average = moving_average(Some(600.0), 1200.0);
        assert!((average - 610.0).abs() < 1e-9);
    }

    #[test]
    fn test_sysinfo_sampler_reports_memory() {
        let mut sampler = SysinfoSampler::new();
        let sample = sampler.sample_memory();
        assert!(sample.used_bytes >= 0.0);
        assert!(sample.free_bytes >= 0.0);
    }
}
