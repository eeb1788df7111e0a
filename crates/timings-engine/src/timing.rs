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

//! A single timer node as stored in the engine arena.

use crate::registry::TimerSpec;
use std::collections::BTreeMap;
use std::sync::Arc;
use timings_core::{LoadingMap, TimerId, TimingData, TimingHistoryEntry, TimingsEnvironment};

/// A named, measurable region of code.
///
/// Parent and group links are ids into the same arena. The parent link is
/// only meaningful while the timer runs.
#[derive(Debug)]
pub struct Timing {
    id: TimerId,
    name: Arc<str>,
    group_id: u32,
    verbose: bool,
    protect: bool,
    pub(crate) enabled: bool,
    pub(crate) data: TimingData,
    pub(crate) children: BTreeMap<TimerId, TimingData>,
    pub(crate) group: Option<TimerId>,
    pub(crate) parent: Option<TimerId>,
    pub(crate) start: Option<u64>,
    pub(crate) depth: u32,
    pub(crate) added: bool,
    pub(crate) timed: bool,
}

impl Timing {
    pub(crate) fn new(spec: &TimerSpec, environment: &TimingsEnvironment) -> Self {
        Self {
            id: spec.id,
            name: Arc::clone(&spec.name),
            group_id: spec.group_id,
            verbose: spec.verbose,
            protect: spec.protect,
            enabled: environment.is_timer_enabled(spec.verbose),
            data: TimingData::new(spec.id),
            children: BTreeMap::new(),
            group: spec.group_timer,
            parent: None,
            start: None,
            depth: 0,
            added: false,
            timed: false,
        }
    }

    pub(crate) fn check_enabled(&mut self, environment: &TimingsEnvironment) {
        self.enabled = environment.is_timer_enabled(self.verbose);
    }

    /// Breakdown entry for `child`, created on first use.
    pub(crate) fn child_mut(&mut self, child: TimerId) -> &mut TimingData {
        self.children.get_or_insert_with(child, |id| TimingData::new(*id))
    }

    /// Commits the tick's scratch counters of the timer and of its children.
    ///
    /// A timer still running, or one that never stopped this tick, is forced
    /// back to an idle state instead.
    pub(crate) fn process_tick(&mut self, violated: bool) {
        if self.depth != 0 || self.data.current_tick_count() == 0 {
            self.depth = 0;
            self.start = None;
            return;
        }
        self.data.process_tick(violated);
        for child in self.children.values_mut() {
            child.process_tick(violated);
        }
    }

    /// Zeroes the timer. A `full` reset also forgets that it was ever timed.
    pub(crate) fn reset(&mut self, full: bool) {
        self.data.reset();
        self.children.clear();
        self.start = None;
        self.depth = 0;
        self.added = false;
        if full {
            self.timed = false;
        }
    }

    /// Deep copy of the committed totals and of the child breakdown.
    pub fn history_entry(&self) -> TimingHistoryEntry {
        TimingHistoryEntry {
            data: self.data.snapshot(),
            children: self.children.values().map(TimingData::snapshot).collect(),
        }
    }

    /// Timer id.
    pub fn id(&self) -> TimerId {
        self.id
    }

    /// Display name, without the verbose marker.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Id of the group the timer is listed under.
    pub fn group_id(&self) -> u32 {
        self.group_id
    }

    /// Whether the timer only runs while verbose collection is on.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Whether the timer belongs to the engine itself.
    pub fn is_protected(&self) -> bool {
        self.protect
    }

    /// Current effective enablement.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the timer is between a start and its matching stop.
    pub fn is_running(&self) -> bool {
        self.depth > 0
    }

    /// Reentrancy depth.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Lifetime totals plus the scratch counters of the running tick.
    pub fn data(&self) -> &TimingData {
        &self.data
    }

    /// Breakdown of the time spent in timers started inside this one.
    pub fn children(&self) -> &BTreeMap<TimerId, TimingData> {
        &self.children
    }

    /// Timer this one rolls its cost into.
    pub fn group_timer(&self) -> Option<TimerId> {
        self.group
    }

    /// Whether the timer recorded a sample since the last reset.
    pub fn added_this_session(&self) -> bool {
        self.added
    }

    /// Whether the timer recorded a sample since the last full reset.
    pub fn timed_ever(&self) -> bool {
        self.timed
    }
}
