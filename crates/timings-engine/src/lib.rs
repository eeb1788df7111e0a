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

//! # Timings Engine
//!
//! The concrete timings implementation built on `timings-core`.
//!
//! The engine times nested regions of a host's main loop, commits the
//! measurements once per tick and keeps a bounded history of per-minute and
//! per-interval summaries. Host code registers timers through the shared
//! [`Timings`] handle and measures regions on the [`TimingsEngine`] owned by
//! its tick thread.

#![warn(missing_docs)]

pub mod engine;
pub mod guard;
pub mod registry;
pub mod report;
pub mod sysinfo_sampler;
pub mod ticks;
pub mod timing;

pub use engine::{TimingsEngine, BOOKKEEPING_TIMER_NAME};
pub use guard::TimingGuard;
pub use registry::Timings;
pub use report::{IdMap, ReportBuilder, ReportConfig, SystemReport, TimingsReport};
pub use sysinfo_sampler::SysinfoSampler;
pub use ticks::TicksTracker;
pub use timing::Timing;
