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

//! Assembles a complete, serializable timings report from an engine.

use crate::engine::TimingsEngine;
use serde::Serialize;
use std::collections::BTreeMap;
use sysinfo::System;
use timings_core::{HistoryExport, TimingsError, TimingsResult};

/// Host and process description attached to a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemReport {
    /// Cost of one start/stop pair, in nanoseconds.
    pub timing_cost: u64,
    /// Operating system name.
    pub name: Option<String>,
    /// Operating system version.
    pub version: Option<String>,
    /// CPU architecture.
    pub arch: String,
    /// Available hardware threads.
    pub cpu: usize,
    /// Total memory, in bytes.
    pub maxmem: u64,
    /// Time since the engine started, in milliseconds.
    pub runtime: u64,
}

/// Names behind the numeric ids used in the report data.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IdMap {
    /// Group id to group name.
    pub groups: BTreeMap<u32, String>,
    /// Timer id to `(group id, timer name)`.
    pub handlers: BTreeMap<u32, (u32, String)>,
}

/// Collection settings in effect when the report was built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportConfig {
    /// Ticks between two history records.
    pub history_interval: u32,
    /// Configured history length.
    pub history_length: u32,
    /// Whether verbose timers were collected.
    pub verbose: bool,
}

/// A complete report: every retained history record plus the current window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimingsReport {
    /// Version of the producing crate.
    pub version: String,
    /// Session start, in seconds since the Unix epoch.
    pub start: u64,
    /// Report time, in seconds since the Unix epoch.
    pub end: u64,
    /// Seconds covered by the session.
    pub sampletime: u64,
    /// Server name; absent in privacy mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
    /// Host description.
    pub system: SystemReport,
    /// Id to name mappings.
    pub idmap: IdMap,
    /// Collection settings.
    pub config: ReportConfig,
    /// History records, oldest first, ending with the current window.
    pub data: Vec<HistoryExport>,
}

impl TimingsReport {
    /// Serializes the report to compact JSON.
    pub fn to_json(&self) -> TimingsResult<String> {
        serde_json::to_string(self).map_err(TimingsError::Export)
    }

    /// Serializes the report to indented JSON.
    pub fn to_json_pretty(&self) -> TimingsResult<String> {
        serde_json::to_string_pretty(self).map_err(TimingsError::Export)
    }
}

/// Builds a [`TimingsReport`] from a live engine.
pub struct ReportBuilder<'a> {
    engine: &'a mut TimingsEngine,
    server_name: Option<String>,
}

impl<'a> ReportBuilder<'a> {
    /// Starts a report for `engine`.
    pub fn new(engine: &'a mut TimingsEngine) -> Self {
        Self {
            engine,
            server_name: None,
        }
    }

    /// Overrides the server name; defaults to the host name.
    pub fn server_name(mut self, name: impl Into<String>) -> Self {
        self.server_name = Some(name.into());
        self
    }

    /// Measures the timing cost, snapshots the current window and assembles the report.
    pub fn build(self) -> TimingsReport {
        let engine = self.engine;
        let timing_cost = engine.measure_timing_cost();
        let current = engine.snapshot();

        let now = engine.clock().unix_millis();
        let timing_start = engine.ticks().timing_start();
        let environment = engine.environment();
        let server = if environment.privacy_mode() {
            None
        } else {
            self.server_name.or_else(System::host_name)
        };
        let config = ReportConfig {
            history_interval: environment.history_interval(),
            history_length: environment.history_length(),
            verbose: environment.verbose_enabled(),
        };

        let mut data: Vec<HistoryExport> = engine.history().iter().map(HistoryExport::from).collect();
        data.push(HistoryExport::from(&current));

        let report = TimingsReport {
            version: env!("CARGO_PKG_VERSION").to_owned(),
            start: timing_start / 1000,
            end: now / 1000,
            sampletime: now.saturating_sub(timing_start) / 1000,
            server,
            system: system_report(timing_cost, now.saturating_sub(engine.started_at())),
            idmap: id_map(engine),
            config,
            data,
        };
        log::debug!(
            "Built timings report with {} history records",
            report.data.len()
        );
        report
    }
}

fn system_report(timing_cost: u64, runtime: u64) -> SystemReport {
    let mut system = System::new();
    system.refresh_memory();
    SystemReport {
        timing_cost,
        name: System::name(),
        version: System::os_version(),
        arch: std::env::consts::ARCH.to_owned(),
        cpu: std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1),
        maxmem: system.total_memory(),
        runtime,
    }
}

/// Lists every group, and every timer that was ever timed plus the engine's own timers.
fn id_map(engine: &TimingsEngine) -> IdMap {
    let mut map = IdMap::default();
    for group in engine.groups() {
        map.groups.insert(group.id, group.name.to_string());
        for id in group.members() {
            let Some(timing) = engine.timing(*id) else {
                continue;
            };
            let builtin = *id == engine.tick_timer() || *id == engine.bookkeeping_timer();
            if timing.timed_ever() || builtin {
                map.handlers
                    .insert(id.get(), (group.id, timing.name().to_owned()));
            }
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use timings_core::{FixedSampler, ManualClock, NoHost, TimingsConfig};

    fn engine(privacy_mode: bool) -> (TimingsEngine, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        let config = TimingsConfig {
            privacy_mode,
            ..TimingsConfig::default()
        };
        let engine = TimingsEngine::with_parts(
            config,
            clock.clone(),
            Box::new(FixedSampler::default()),
            Box::new(NoHost),
        );
        (engine, clock)
    }

    #[test]
    fn test_report_lists_timed_handlers() {
        let (mut engine, clock) = engine(false);
        let world = engine.acquire("World", "Entities", None);
        let _unused = engine.acquire("World", "Never Run", None);
        for _ in 0..3 {
            engine.tick(|engine| {
                engine.timed(world, |_| clock.advance(1_000));
            });
        }
        clock.advance_millis(2_000);

        let report = ReportBuilder::new(&mut engine).server_name("Lobby").build();
        assert_eq!(report.server.as_deref(), Some("Lobby"));
        assert_eq!(report.sampletime, 2);
        assert_eq!(report.data.len(), 1);
        assert_eq!(report.data[0].entries.len(), 3);

        let world_group = report
            .idmap
            .groups
            .iter()
            .find(|(_, name)| name.as_str() == "World")
            .map(|(id, _)| *id)
            .unwrap();
        assert_eq!(
            report.idmap.handlers[&world.get()],
            (world_group, "Entities".to_owned())
        );
        assert_eq!(report.idmap.handlers.len(), 3);
    }

    #[test]
    fn test_privacy_mode_hides_server() {
        let (mut engine, _) = engine(true);
        let report = ReportBuilder::new(&mut engine).server_name("Lobby").build();
        assert_eq!(report.server, None);

        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert!(json.get("server").is_none());
        assert_eq!(json["config"]["historyInterval"], 60);
        assert!(json["idmap"]["handlers"]["1"].is_array());
    }
}
