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

//! Configuration of the timings engine and the shared runtime switches.

use crate::error::TimingsResult;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};

/// Static configuration for a timings engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingsConfig {
    /// Whether timings are collected at all.
    pub enabled: bool,
    /// Whether timers marked verbose are collected.
    pub verbose_enabled: bool,
    /// Hides host-identifying details from exported reports.
    pub privacy_mode: bool,
    /// Number of timed ticks between two history records.
    pub history_interval_ticks: u32,
    /// Length of history the exporter is expected to keep, in minutes.
    pub history_length: u32,
    /// A tick costing strictly more than this many nanoseconds is a lag tick.
    pub lag_threshold_nanos: u64,
    /// Number of timed ticks covered by one minute report.
    pub minute_ticks: u32,
    /// Maximum number of history records retained.
    pub history_capacity: usize,
    /// Memory is sampled once every this many ticks.
    pub memory_sample_interval: u32,
    /// Group used when a timer is acquired without one.
    pub default_group: String,
    /// Name of the root timer wrapping each host tick.
    pub tick_timer_name: String,
}

impl Default for TimingsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            verbose_enabled: true,
            privacy_mode: false,
            history_interval_ticks: 60,
            history_length: 60,
            lag_threshold_nanos: 50_000_000,
            minute_ticks: 1200,
            history_capacity: 12,
            memory_sample_interval: 20,
            default_group: "Engine".to_string(),
            tick_timer_name: "Engine Tick".to_string(),
        }
    }
}

impl TimingsConfig {
    /// Parses a configuration from JSON. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> TimingsResult<Self> {
        let mut config: Self = serde_json::from_str(json)?;
        config.sanitize();
        Ok(config)
    }

    /// Clamps cadence values that would otherwise divide by zero.
    pub fn sanitize(&mut self) {
        if self.history_interval_ticks == 0 {
            log::warn!("history_interval_ticks must be positive, using 1");
            self.history_interval_ticks = 1;
        }
        if self.minute_ticks == 0 {
            log::warn!("minute_ticks must be positive, using 1");
            self.minute_ticks = 1;
        }
        if self.memory_sample_interval == 0 {
            self.memory_sample_interval = 1;
        }
        if self.history_capacity == 0 {
            self.history_capacity = 1;
        }
    }
}

/// Runtime switches shared between the tick thread and command handlers.
///
/// Writes may come from any thread; the engine only re-reads them when it
/// services a pending recheck at the top of a tick.
#[derive(Debug)]
pub struct TimingsEnvironment {
    enabled: AtomicBool,
    verbose_enabled: AtomicBool,
    privacy_mode: AtomicBool,
    history_interval_ticks: u32,
    history_length: u32,
}

impl TimingsEnvironment {
    /// Builds the environment from a configuration.
    pub fn new(config: &TimingsConfig) -> Self {
        Self {
            enabled: AtomicBool::new(config.enabled),
            verbose_enabled: AtomicBool::new(config.verbose_enabled),
            privacy_mode: AtomicBool::new(config.privacy_mode),
            history_interval_ticks: config.history_interval_ticks.max(1),
            history_length: config.history_length,
        }
    }

    /// Whether timings are collected.
    pub fn enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Turns collection on or off.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
    }

    /// Whether verbose timers are collected.
    pub fn verbose_enabled(&self) -> bool {
        self.verbose_enabled.load(Ordering::Acquire)
    }

    /// Turns verbose collection on or off.
    pub fn set_verbose_enabled(&self, verbose_enabled: bool) {
        self.verbose_enabled.store(verbose_enabled, Ordering::Release);
    }

    /// Whether exports hide host-identifying details.
    pub fn privacy_mode(&self) -> bool {
        self.privacy_mode.load(Ordering::Acquire)
    }

    /// Changes the privacy mode.
    pub fn set_privacy_mode(&self, privacy_mode: bool) {
        self.privacy_mode.store(privacy_mode, Ordering::Release);
    }

    /// Number of timed ticks between two history records.
    pub fn history_interval(&self) -> u32 {
        self.history_interval_ticks
    }

    /// Configured history length.
    pub fn history_length(&self) -> u32 {
        self.history_length
    }

    /// Effective enablement of a timer with the given verbose flag.
    pub fn is_timer_enabled(&self, verbose: bool) -> bool {
        self.enabled() && (!verbose || self.verbose_enabled())
    }
}

impl Default for TimingsEnvironment {
    fn default() -> Self {
        Self::new(&TimingsConfig::default())
    }
}
