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

//! # Timings Core
//!
//! Foundational crate containing the data types and contracts shared by the
//! timings engine and its exporters.
//!
//! This crate defines the abstract "what" of tick timings: the aggregate
//! record kept per timer, how timers are identified, how snapshots are
//! retained and what an exported snapshot looks like. `timings-engine`
//! provides the registry and the tick driver that fill these structures.

#![warn(missing_docs)]

pub mod clock;
pub mod data;
pub mod environment;
pub mod error;
pub mod export;
pub mod history;
pub mod identity;
pub mod loading_map;
pub mod sampler;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use data::TimingData;
pub use environment::{TimingsConfig, TimingsEnvironment};
pub use error::{TimingsError, TimingsResult};
pub use export::{HistoryExport, MinuteReportExport, TimingDataExport, TimingEntryExport};
pub use history::{BoundedHistory, HistoryRecord, MinuteReport, TickCounters, TimingHistoryEntry};
pub use identity::{Interner, Symbol, TimerGroup, TimerId, TimingIdentifier};
pub use loading_map::LoadingMap;
pub use sampler::{FixedSampler, HostProbe, MemorySample, NoHost, SystemSampler};
