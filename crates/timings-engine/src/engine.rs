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

//! The tick-thread side of the timings system.
//!
//! A [`TimingsEngine`] owns every timer node, drives the per-tick commit from
//! its root tick timer and retains minute reports and history records.
//! Timers are registered through the shared [`Timings`] handle and become
//! nodes in the engine arena the first time the engine sees their id.

use crate::guard::TimingGuard;
use crate::registry::{Registry, Shared, Timings};
use crate::sysinfo_sampler::{moving_average, SysinfoSampler};
use crate::ticks::TicksTracker;
use crate::timing::Timing;
use std::collections::VecDeque;
use std::sync::Arc;
use timings_core::{
    BoundedHistory, Clock, HistoryRecord, HostProbe, MinuteReport, MonotonicClock, NoHost,
    SystemSampler, TimerGroup, TimerId, TimingData, TimingsConfig, TimingsEnvironment,
};

/// Name of the timer that measures the engine's own per-tick work.
pub const BOOKKEEPING_TIMER_NAME: &str = "Timings Tick";

const COST_SAMPLERS: usize = 6;
const COST_PASSES: u64 = 200;

/// Appends a node for every registered timer the arena does not hold yet.
fn materialize(timings: &mut Vec<Timing>, registry: &Registry, environment: &TimingsEnvironment) {
    let known = timings.len();
    for spec in registry.specs.iter().skip(known) {
        timings.push(Timing::new(spec, environment));
    }
}

/// Hierarchical, tick-synchronized timings for one host loop.
///
/// The engine is owned by the tick thread; other threads interact with it
/// through [`TimingsEngine::handle`].
#[derive(Debug)]
pub struct TimingsEngine {
    shared: Arc<Shared>,
    config: TimingsConfig,
    clock: Arc<dyn Clock>,
    sampler: Box<dyn SystemSampler>,
    host: Box<dyn HostProbe>,
    timings: Vec<Timing>,
    session: Vec<TimerId>,
    running: Vec<TimerId>,
    current: Option<TimerId>,
    tick_timer: TimerId,
    bookkeeping_timer: TimerId,
    minute_data: TimingData,
    minute_reports: VecDeque<MinuteReport>,
    history: BoundedHistory<HistoryRecord>,
    ticks: TicksTracker,
    avg_used_memory: Option<f64>,
    avg_free_memory: Option<f64>,
    started_at: u64,
}

impl TimingsEngine {
    /// Creates an engine on the monotonic clock, sampling the system through sysinfo.
    pub fn new(config: TimingsConfig) -> Self {
        Self::with_parts(
            config,
            Arc::new(MonotonicClock::new()),
            Box::new(SysinfoSampler::new()),
            Box::new(NoHost),
        )
    }

    /// Creates an engine from explicit time, system and host sources.
    pub fn with_parts(
        mut config: TimingsConfig,
        clock: Arc<dyn Clock>,
        sampler: Box<dyn SystemSampler>,
        host: Box<dyn HostProbe>,
    ) -> Self {
        config.sanitize();
        let shared = Arc::new(Shared::new(
            TimingsEnvironment::new(&config),
            config.default_group.clone(),
        ));
        let tick_timer = shared.acquire(&config.default_group, &config.tick_timer_name, None, true);
        let bookkeeping_timer =
            shared.acquire(&config.default_group, BOOKKEEPING_TIMER_NAME, None, true);

        let now = clock.now_nanos();
        let started_at = clock.unix_millis();
        let mut engine = Self {
            shared,
            history: BoundedHistory::new(config.history_capacity),
            config,
            clock,
            sampler,
            host,
            timings: Vec::new(),
            session: Vec::new(),
            running: Vec::new(),
            current: None,
            tick_timer,
            bookkeeping_timer,
            minute_data: TimingData::new(tick_timer),
            minute_reports: VecDeque::new(),
            ticks: TicksTracker::new(now, started_at),
            avg_used_memory: None,
            avg_free_memory: None,
            started_at,
        };
        engine.sync_timers();
        log::info!(
            "Timings engine started (enabled: {}, history every {} ticks)",
            engine.shared.environment.enabled(),
            engine.shared.environment.history_interval()
        );
        engine
    }

    /// A handle for registering timers and toggling collection from any thread.
    pub fn handle(&self) -> Timings {
        Timings::from_shared(Arc::clone(&self.shared))
    }

    /// Looks up or creates the timer `name` in `group`.
    pub fn acquire(&self, group: &str, name: &str, group_timer: Option<TimerId>) -> TimerId {
        self.shared.acquire(group, name, group_timer, false)
    }

    /// Looks up or creates `name` in the default group.
    pub fn of(&self, name: &str) -> TimerId {
        self.acquire(&self.config.default_group, name, None)
    }

    fn sync_timers(&mut self) {
        if self.timings.len() >= self.shared.timer_count() {
            return;
        }
        let registry = self.shared.lock();
        materialize(&mut self.timings, &registry, &self.shared.environment);
    }

    fn slot(&mut self, id: TimerId) -> Option<usize> {
        let index = id.index();
        if index >= self.timings.len() {
            self.sync_timers();
        }
        if index < self.timings.len() {
            Some(index)
        } else {
            log::warn!("Ignoring unknown timer {id}");
            None
        }
    }

    // --- Timer operations ---

    /// Starts a timer. Starting the root tick timer begins a tick.
    pub fn start(&mut self, id: TimerId) {
        if id == self.tick_timer {
            self.begin_tick();
        } else {
            self.start_timing(id);
        }
    }

    /// Stops a timer. Stopping the root tick timer ends and commits the tick.
    pub fn stop(&mut self, id: TimerId) {
        if id == self.tick_timer {
            self.end_tick();
        } else {
            self.stop_timing(id);
        }
    }

    /// Discards the running sample of a timer; a matching stop is still expected.
    pub fn abort(&mut self, id: TimerId) {
        let Some(index) = self.slot(id) else {
            return;
        };
        let timing = &mut self.timings[index];
        if timing.enabled && timing.depth > 0 {
            timing.start = None;
        }
    }

    /// Starts `id` and returns a guard that stops it when dropped.
    pub fn time(&mut self, id: TimerId) -> TimingGuard<'_> {
        self.start(id);
        TimingGuard::new(self, id)
    }

    /// Runs `f` inside the timer `id`.
    pub fn timed<R>(&mut self, id: TimerId, f: impl FnOnce(&mut TimingsEngine) -> R) -> R {
        let mut guard = self.time(id);
        f(&mut *guard)
    }

    /// Runs one host tick inside the root tick timer.
    pub fn tick<R>(&mut self, f: impl FnOnce(&mut TimingsEngine) -> R) -> R {
        let tick_timer = self.tick_timer;
        self.timed(tick_timer, f)
    }

    fn start_timing(&mut self, id: TimerId) {
        let Some(index) = self.slot(id) else {
            return;
        };
        let timing = &mut self.timings[index];
        if !timing.enabled {
            return;
        }
        timing.depth += 1;
        if timing.depth == 1 {
            timing.start = Some(self.clock.now_nanos());
            timing.parent = self.current;
            self.current = Some(id);
            self.running.push(id);
        }
    }

    /// Returns true when the stop recorded a sample: the outermost start of an
    /// enabled timer that was not aborted.
    fn stop_timing(&mut self, id: TimerId) -> bool {
        let Some(index) = self.slot(id) else {
            return false;
        };
        let timing = &mut self.timings[index];
        if !timing.enabled {
            timing.start = None;
            return false;
        }
        if timing.depth == 0 {
            return false;
        }
        timing.depth -= 1;
        if timing.depth > 0 {
            return false;
        }
        let parent = timing.parent;
        let start = timing.start.take();
        if let Some(pos) = self.running.iter().rposition(|r| *r == id) {
            self.running.swap_remove(pos);
        }
        let Some(start) = start else {
            // Aborted: nothing to record, but later timers must not keep
            // reporting this one as their parent.
            if self.current == Some(id) {
                self.current = parent;
            }
            return false;
        };
        let diff = self.clock.now_nanos().saturating_sub(start);
        self.add_diff(id, diff);
        true
    }

    fn add_diff(&mut self, id: TimerId, diff: u64) {
        let mut node = id;
        loop {
            let index = node.index();
            if self.current == Some(node) {
                let parent = self.timings[index].parent;
                self.current = parent;
                if let Some(parent) = parent.and_then(|p| self.timings.get_mut(p.index())) {
                    parent.child_mut(node).add(diff);
                }
            }

            let Some(timing) = self.timings.get_mut(index) else {
                break;
            };
            timing.data.add(diff);
            if !timing.added {
                timing.added = true;
                timing.timed = true;
                self.session.push(node);
            }

            let Some(group) = timing.group else {
                break;
            };
            let Some(group_timing) = self.timings.get_mut(group.index()) else {
                log::warn!("Timer {node} rolls into unknown group timer {group}");
                break;
            };
            group_timing.child_mut(node).add(diff);
            node = group;
        }
    }

    // --- Tick driver ---

    fn begin_tick(&mut self) {
        if self.shared.full_reset_requested() {
            self.reset(true);
        } else if self.shared.take_recheck_request() {
            self.recheck_enabled();
        }
        self.start_timing(self.tick_timer);
    }

    fn end_tick(&mut self) {
        let tick_timer = self.tick_timer;
        if !self.stop_timing(tick_timer) || !self.timings[tick_timer.index()].enabled {
            return;
        }

        if self.ticks.timed_ticks() % u64::from(self.config.memory_sample_interval) == 0 {
            self.sample_memory();
        }

        let sweep_start = self.clock.now_nanos();
        let counted = self.commit_registry();
        let cost = self.clock.now_nanos().saturating_sub(sweep_start);
        self.record_bookkeeping(cost);

        let violated = self.violated();
        let root_total = self.timings[tick_timer.index()].data.current_tick_total();
        self.minute_data.set_current(1, root_total);
        self.minute_data.process_tick(violated);
        self.timings[self.bookkeeping_timer.index()].process_tick(violated);
        self.timings[tick_timer.index()].process_tick(violated);

        if !counted {
            return;
        }
        let timed = self.ticks.timed_ticks();
        if timed % u64::from(self.config.minute_ticks) == 0 {
            self.push_minute_report();
        }
        if timed % u64::from(self.shared.environment.history_interval()) == 0 {
            self.push_history_record();
            self.reset(self.shared.full_reset_requested());
        }
    }

    /// Commits every session-active timer except the two the tick driver
    /// commits itself. Returns false when collection is globally off.
    fn commit_registry(&mut self) -> bool {
        if !self.shared.environment.enabled() {
            return false;
        }
        let violated = self.violated();
        let (tick_timer, bookkeeping_timer) = (self.tick_timer, self.bookkeeping_timer);
        for id in &self.session {
            if *id == tick_timer || *id == bookkeeping_timer {
                continue;
            }
            self.timings[id.index()].process_tick(violated);
        }
        self.repair_running(violated);
        self.ticks.add_players(self.host.online_players());
        self.ticks.increment_timed();
        log::trace!(
            "Committed {} timers for tick {}",
            self.session.len(),
            self.ticks.timed_ticks()
        );
        true
    }

    /// Forces every region still running at the end of a tick back to idle.
    ///
    /// The root has already stopped here, so anything left in `running` was
    /// started and never stopped. Its open sample is dropped and the current
    /// pointer no longer attributes later ticks to it.
    fn repair_running(&mut self, violated: bool) {
        if self.running.is_empty() {
            return;
        }
        for id in std::mem::take(&mut self.running) {
            if let Some(timing) = self.timings.get_mut(id.index()) {
                if timing.depth > 0 {
                    log::debug!("Timer {id} left running at tick end, forcing it idle");
                    timing.process_tick(violated);
                }
            }
        }
        self.current = None;
    }

    /// Charges the engine's own per-tick work to the bookkeeping timer.
    ///
    /// The bookkeeping timer records a full sample. The root only gains the
    /// time and a child entry, so it still counts exactly one sample per tick.
    pub fn record_bookkeeping(&mut self, cost: u64) {
        let bookkeeping_timer = self.bookkeeping_timer;
        let bookkeeping = &mut self.timings[bookkeeping_timer.index()];
        if !bookkeeping.enabled {
            return;
        }
        bookkeeping.data.add(cost);
        if !bookkeeping.added {
            bookkeeping.added = true;
            bookkeeping.timed = true;
            self.session.push(bookkeeping_timer);
        }
        let root = &mut self.timings[self.tick_timer.index()];
        root.child_mut(bookkeeping_timer).add(cost);
        root.data.add_time(cost);
    }

    /// Whether the running tick exceeded the lag threshold.
    pub fn violated(&self) -> bool {
        self.exceeds_lag_threshold(self.timings[self.tick_timer.index()].data.current_tick_total())
    }

    /// Whether a tick of `total_nanos` counts as a lag tick.
    pub fn exceeds_lag_threshold(&self, total_nanos: u64) -> bool {
        total_nanos > self.config.lag_threshold_nanos
    }

    fn sample_memory(&mut self) {
        let sample = self.sampler.sample_memory();
        self.avg_used_memory = Some(moving_average(self.avg_used_memory, sample.used_bytes));
        self.avg_free_memory = Some(moving_average(self.avg_free_memory, sample.free_bytes));
    }

    fn minute_report(&mut self) -> MinuteReport {
        let minute_ticks = u64::from(self.config.minute_ticks);
        let mut ticks = self.ticks.counters();
        ticks.timed = ticks
            .timed
            .saturating_sub(self.minute_reports.len() as u64 * minute_ticks);
        let elapsed = self
            .clock
            .now_nanos()
            .saturating_sub(self.ticks.last_minute_time());
        let tps = if elapsed == 0 {
            0.0
        } else {
            1e9 / elapsed as f64 * ticks.timed as f64
        };
        MinuteReport {
            time: self.clock.unix_millis() / 1000,
            ticks,
            tps,
            avg_ping: self.host.average_ping_ms(),
            data: self.minute_data.snapshot(),
            used_memory: self.avg_used_memory,
            free_memory: self.avg_free_memory,
            load_avg: self.sampler.load_average(),
        }
    }

    fn push_minute_report(&mut self) {
        let report = self.minute_report();
        log::debug!(
            "Minute report: {} ticks at {:.2} tps",
            report.ticks.timed,
            report.tps
        );
        self.minute_reports.push_back(report);
        self.ticks.reset_ticks(false, self.clock.now_nanos());
        self.minute_data.reset();
    }

    /// Builds a history record of the window so far without retaining it.
    pub fn snapshot(&mut self) -> HistoryRecord {
        let mut minute_reports: Vec<MinuteReport> = self.minute_reports.iter().cloned().collect();
        let rolled = self.ticks.timed_ticks() % u64::from(self.config.minute_ticks) == 0;
        if !rolled || minute_reports.is_empty() {
            minute_reports.push(self.minute_report());
        }
        let entries = self
            .session
            .iter()
            .map(|id| self.timings[id.index()].history_entry())
            .collect();
        HistoryRecord::new(
            self.ticks.history_start() / 1000,
            self.clock.unix_millis() / 1000,
            self.timings[self.tick_timer.index()].data.lifetime_total(),
            minute_reports,
            entries,
        )
    }

    fn push_history_record(&mut self) {
        let record = self.snapshot();
        log::debug!(
            "History record: {} ticks, {} timers",
            record.total_ticks,
            record.entries.len()
        );
        if self.history.push(record).is_some() {
            log::debug!("Evicted the oldest history record");
        }
    }

    // --- Gating and reset ---

    /// Re-derives the enabled flag of every timer from the environment.
    pub fn recheck_enabled(&mut self) {
        let shared = Arc::clone(&self.shared);
        let registry = shared.lock();
        materialize(&mut self.timings, &registry, &shared.environment);
        for timing in &mut self.timings {
            timing.check_enabled(&shared.environment);
        }
        drop(registry);
        shared.take_recheck_request();
    }

    /// Resets collected data.
    ///
    /// A full reset zeroes every timer, re-derives enablement and clears the
    /// stored history. A soft reset only zeroes the timers that recorded data
    /// since the last reset.
    pub fn reset(&mut self, full: bool) {
        let had_session = self.has_session_data();
        if full {
            let shared = Arc::clone(&self.shared);
            let registry = shared.lock();
            materialize(&mut self.timings, &registry, &shared.environment);
            for timing in &mut self.timings {
                timing.reset(true);
                timing.check_enabled(&shared.environment);
            }
            drop(registry);
            shared.clear_requests();
            self.history.clear();
            self.current = None;
            self.running.clear();
            self.ticks.set_timing_start(self.clock.unix_millis());
            if had_session {
                log::info!("Timings reset");
            }
        } else {
            for id in &self.session {
                self.timings[id.index()].reset(false);
            }
            self.running
                .retain(|id| self.timings.get(id.index()).is_some_and(|t| t.depth > 0));
        }
        self.session.clear();
        self.minute_reports.clear();
        self.minute_data.reset();
        self.ticks.reset_ticks(true, self.clock.now_nanos());
        self.ticks.set_history_start(self.clock.unix_millis());
    }

    /// Whether anything was collected since the engine started or last reset.
    fn has_session_data(&self) -> bool {
        !self.session.is_empty() || !self.history.is_empty() || self.ticks.timed_ticks() > 0
    }

    /// Measures the average cost of one start/stop pair, in nanoseconds.
    ///
    /// The sampler timers leave no trace in the collected data.
    pub fn measure_timing_cost(&mut self) -> u64 {
        let samplers: Vec<TimerId> = (1..=COST_SAMPLERS)
            .map(|i| {
                self.shared.acquire(
                    &self.config.default_group,
                    &format!("Timings Sampler {i}"),
                    None,
                    true,
                )
            })
            .collect();
        let outer = self.current;

        let start = self.clock.now_nanos();
        for _ in 0..COST_PASSES {
            for id in &samplers {
                self.start_timing(*id);
            }
            for id in samplers.iter().rev() {
                self.stop_timing(*id);
            }
        }
        let elapsed = self.clock.now_nanos().saturating_sub(start);

        for id in &samplers {
            if let Some(timing) = self.timings.get_mut(id.index()) {
                timing.reset(true);
            }
        }
        if let Some(outer) = outer.and_then(|o| self.timings.get_mut(o.index())) {
            for id in &samplers {
                outer.children.remove(id);
            }
        }
        self.session.retain(|id| !samplers.contains(id));

        let cost = elapsed / COST_PASSES / COST_SAMPLERS as u64;
        log::debug!("Measured timing cost: {cost} ns");
        cost
    }

    // --- Accessors ---

    /// The node of a timer, if the engine knows it.
    pub fn timing(&self, id: TimerId) -> Option<&Timing> {
        self.timings.get(id.index())
    }

    /// Every node known to the engine, by id.
    pub fn timings(&self) -> impl Iterator<Item = &Timing> {
        self.timings.iter()
    }

    /// Timers that recorded data since the last reset, in first-sample order.
    pub fn session_timings(&self) -> &[TimerId] {
        &self.session
    }

    /// The innermost running timer.
    pub fn current(&self) -> Option<TimerId> {
        self.current
    }

    /// The root timer wrapping each tick.
    pub fn tick_timer(&self) -> TimerId {
        self.tick_timer
    }

    /// The timer charged with the engine's own per-tick work.
    pub fn bookkeeping_timer(&self) -> TimerId {
        self.bookkeeping_timer
    }

    /// Minute reports of the current history window, oldest first.
    pub fn minute_reports(&self) -> impl Iterator<Item = &MinuteReport> {
        self.minute_reports.iter()
    }

    /// Retained history records, oldest first.
    pub fn history(&self) -> &BoundedHistory<HistoryRecord> {
        &self.history
    }

    /// The root timer's totals for the current minute.
    pub fn minute_data(&self) -> &TimingData {
        &self.minute_data
    }

    /// Tick counters of the current window.
    pub fn ticks(&self) -> &TicksTracker {
        &self.ticks
    }

    /// Tick counters, for the host to add entity counts to.
    pub fn ticks_mut(&mut self) -> &mut TicksTracker {
        &mut self.ticks
    }

    /// Moving average of used memory, once sampled.
    pub fn avg_used_memory(&self) -> Option<f64> {
        self.avg_used_memory
    }

    /// Moving average of free memory, once sampled.
    pub fn avg_free_memory(&self) -> Option<f64> {
        self.avg_free_memory
    }

    /// Copies of every timer group in creation order.
    pub fn groups(&self) -> Vec<TimerGroup> {
        self.shared.lock().groups().cloned().collect()
    }

    /// The sanitized configuration the engine runs with.
    pub fn config(&self) -> &TimingsConfig {
        &self.config
    }

    /// The shared environment flags.
    pub fn environment(&self) -> &TimingsEnvironment {
        &self.shared.environment
    }

    /// The engine's time source.
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Wall-clock creation time, in Unix milliseconds.
    pub fn started_at(&self) -> u64 {
        self.started_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use timings_core::{FixedSampler, ManualClock};

    fn engine() -> (TimingsEngine, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        let engine = TimingsEngine::with_parts(
            TimingsConfig::default(),
            clock.clone(),
            Box::new(FixedSampler::default()),
            Box::new(NoHost),
        );
        (engine, clock)
    }

    #[test]
    fn test_engine_timers_are_registered_first() {
        let (engine, _) = engine();
        assert_eq!(engine.tick_timer(), TimerId::from_index(0));
        assert_eq!(engine.bookkeeping_timer(), TimerId::from_index(1));
        assert!(engine.timing(engine.tick_timer()).unwrap().is_protected());
        assert_eq!(
            engine.timing(engine.bookkeeping_timer()).unwrap().name(),
            BOOKKEEPING_TIMER_NAME
        );
    }

    #[test]
    fn test_lazy_materialization() {
        let (mut engine, clock) = engine();
        let id = engine.handle().of("Late Timer");
        assert!(engine.timing(id).is_none());

        engine.start(id);
        clock.advance(10);
        engine.stop(id);
        assert_eq!(engine.timing(id).unwrap().data().current_tick_total(), 10);
    }

    #[test]
    fn test_reset_notices_only_collected_sessions() {
        let (mut engine, clock) = engine();
        assert!(!engine.has_session_data());
        engine.reset(true);
        assert!(!engine.has_session_data());

        let id = engine.of("World");
        engine.tick(|engine| engine.timed(id, |_| clock.advance(10)));
        assert!(engine.has_session_data());
        engine.reset(true);
        assert!(!engine.has_session_data());
    }

    #[test]
    fn test_running_list_tracks_open_regions() {
        let (mut engine, _) = engine();
        let outer = engine.of("Outer");
        let inner = engine.of("Inner");
        engine.start(outer);
        engine.start(inner);
        engine.start(inner);
        assert_eq!(engine.running, vec![outer, inner]);

        engine.stop(inner);
        engine.stop(inner);
        engine.abort(outer);
        engine.stop(outer);
        assert!(engine.running.is_empty());
    }

    #[test]
    fn test_stop_without_start_is_noop() {
        let (mut engine, _) = engine();
        let id = engine.of("Idle");
        engine.stop(id);
        let timing = engine.timing(id).unwrap();
        assert_eq!(timing.depth(), 0);
        assert_eq!(timing.data().current_tick_count(), 0);
        assert!(engine.session_timings().is_empty());
    }

    #[test]
    fn test_bookkeeping_does_not_double_count_root() {
        let (mut engine, clock) = engine();
        engine.start(engine.tick_timer());
        clock.advance(1_000);
        let tick_timer = engine.tick_timer();
        engine.stop_timing(tick_timer);
        engine.record_bookkeeping(50);

        let root = engine.timing(tick_timer).unwrap();
        assert_eq!(root.data().current_tick_count(), 1);
        assert_eq!(root.data().current_tick_total(), 1_050);
        assert_eq!(root.children()[&engine.bookkeeping_timer()].current_tick_total(), 50);
        let bookkeeping = engine.timing(engine.bookkeeping_timer()).unwrap();
        assert_eq!(bookkeeping.data().current_tick_count(), 1);
    }

    #[test]
    fn test_measure_timing_cost_leaves_no_trace() {
        let (mut engine, _) = engine();
        let outer = engine.of("Outer");
        engine.start(outer);
        let cost = engine.measure_timing_cost();
        engine.stop(outer);

        // The manual clock does not move on its own.
        assert_eq!(cost, 0);
        assert_eq!(engine.session_timings(), &[outer]);
        assert!(engine.timing(outer).unwrap().children().is_empty());
        assert!(engine
            .timings()
            .filter(|t| t.name().starts_with("Timings Sampler"))
            .all(|t| !t.timed_ever() && t.data().current_tick_count() == 0));
    }
}
