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

//! Serializable views of retained snapshots, handed to exporters.
//!
//! These are read-only copies: transport and upload are the exporter's
//! business and cannot affect in-process aggregation.

use crate::data::TimingData;
use crate::error::{TimingsError, TimingsResult};
use crate::history::{HistoryRecord, MinuteReport, TickCounters, TimingHistoryEntry};
use serde::Serialize;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Exported totals of one timer or child edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingDataExport {
    /// Timer id.
    pub id: u32,
    /// Committed samples.
    pub lifetime_count: u64,
    /// Committed nanoseconds.
    pub lifetime_total: u64,
    /// Samples during lag ticks.
    pub lag_count: u64,
    /// Nanoseconds during lag ticks.
    pub lag_total: u64,
}

impl From<&TimingData> for TimingDataExport {
    fn from(data: &TimingData) -> Self {
        Self {
            id: data.id().get(),
            lifetime_count: data.lifetime_count(),
            lifetime_total: data.lifetime_total(),
            lag_count: data.lag_count(),
            lag_total: data.lag_total(),
        }
    }
}

/// Exported history entry: a timer's totals plus its children, if any.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimingEntryExport {
    /// The timer's own totals.
    #[serde(flatten)]
    pub data: TimingDataExport,
    /// Per-child breakdown; omitted when the timer had no children.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TimingDataExport>>,
}

impl From<&TimingHistoryEntry> for TimingEntryExport {
    fn from(entry: &TimingHistoryEntry) -> Self {
        let children = if entry.children.is_empty() {
            None
        } else {
            Some(entry.children.iter().map(TimingDataExport::from).collect())
        };
        Self {
            data: TimingDataExport::from(&entry.data),
            children,
        }
    }
}

/// Exported tick counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TickCountersExport {
    /// Ticks timed.
    pub timed: u64,
    /// Player ticks.
    pub players: u64,
    /// Entity ticks.
    pub entities: u64,
    /// Activated entity ticks.
    pub activated_entities: u64,
    /// Block entity ticks.
    pub block_entities: u64,
}

impl From<&TickCounters> for TickCountersExport {
    fn from(ticks: &TickCounters) -> Self {
        Self {
            timed: ticks.timed,
            players: ticks.players,
            entities: ticks.entities,
            activated_entities: ticks.activated_entities,
            block_entities: ticks.block_entities,
        }
    }
}

/// Exported minute report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MinuteReportExport {
    /// Seconds since the Unix epoch.
    pub time: u64,
    /// Ticks per second, two decimals.
    pub tps: f64,
    /// Average ping, two decimals.
    pub avg_ping: f64,
    /// Root timer totals for the minute.
    pub data: TimingDataExport,
    /// Tick counters for the minute.
    pub tick_counters: TickCountersExport,
    /// Average used memory in bytes.
    pub used_mem: Option<f64>,
    /// Average free memory in bytes.
    pub free_mem: Option<f64>,
    /// System load average.
    pub load_avg: f64,
}

impl From<&MinuteReport> for MinuteReportExport {
    fn from(report: &MinuteReport) -> Self {
        Self {
            time: report.time,
            tps: round2(report.tps),
            avg_ping: round2(report.avg_ping),
            data: TimingDataExport::from(&report.data),
            tick_counters: TickCountersExport::from(&report.ticks),
            used_mem: report.used_memory,
            free_mem: report.free_memory,
            load_avg: report.load_avg,
        }
    }
}

/// Exported history record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryExport {
    /// Seconds since the Unix epoch.
    pub start_time: u64,
    /// Seconds since the Unix epoch.
    pub end_time: u64,
    /// Ticks covered.
    pub total_ticks: u64,
    /// Root timer nanoseconds covered.
    pub total_time: u64,
    /// Timers with at least one committed sample.
    pub entries: Vec<TimingEntryExport>,
    /// Minute reports, oldest first.
    pub minute_reports: Vec<MinuteReportExport>,
}

impl From<&HistoryRecord> for HistoryExport {
    fn from(record: &HistoryRecord) -> Self {
        Self {
            start_time: record.start_time,
            end_time: record.end_time,
            total_ticks: record.total_ticks,
            total_time: record.total_time,
            entries: record
                .entries
                .iter()
                .filter(|entry| entry.data.lifetime_count() > 0)
                .map(TimingEntryExport::from)
                .collect(),
            minute_reports: record
                .minute_reports
                .iter()
                .map(MinuteReportExport::from)
                .collect(),
        }
    }
}

impl HistoryExport {
    /// Serializes the record to compact JSON.
    pub fn to_json(&self) -> TimingsResult<String> {
        serde_json::to_string(self).map_err(TimingsError::Export)
    }

    /// Serializes the record to indented JSON.
    pub fn to_json_pretty(&self) -> TimingsResult<String> {
        serde_json::to_string_pretty(self).map_err(TimingsError::Export)
    }
}
