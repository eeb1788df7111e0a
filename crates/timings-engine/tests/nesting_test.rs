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

//! Integration tests for start/stop/abort, nesting and group rollup.

use std::sync::Arc;
use timings_core::{FixedSampler, ManualClock, NoHost, TimingsConfig};
use timings_engine::TimingsEngine;

/// Helper: an engine on a manual clock with fixed system figures.
fn engine_with(config: TimingsConfig) -> (TimingsEngine, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::default());
    let engine = TimingsEngine::with_parts(
        config,
        clock.clone(),
        Box::new(FixedSampler::default()),
        Box::new(NoHost),
    );
    (engine, clock)
}

fn engine() -> (TimingsEngine, Arc<ManualClock>) {
    engine_with(TimingsConfig::default())
}

// ─────────────────────────────────────────────────────────────────────────────
// start / stop
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_balanced_pairs_accumulate_in_scratch() {
    let (mut engine, clock) = engine();
    let id = engine.of("Chunk Save");

    let durations = [10, 20, 30, 40, 50];
    for d in durations {
        engine.start(id);
        clock.advance(d);
        engine.stop(id);
    }

    let data = engine.timing(id).unwrap().data();
    assert_eq!(data.current_tick_count(), 5);
    assert_eq!(data.current_tick_total(), 150);
    assert_eq!(data.lifetime_count(), 0, "Nothing is committed outside a tick");
    assert_eq!(engine.session_timings(), &[id]);
}

#[test]
fn test_reentrant_start_records_one_sample() {
    let (mut engine, clock) = engine();
    let id = engine.of("Recursive Task");

    for _ in 0..3 {
        engine.start(id);
        clock.advance(5);
    }
    for _ in 0..3 {
        engine.stop(id);
    }
    assert_eq!(engine.timing(id).unwrap().data().current_tick_count(), 1);
    assert_eq!(engine.timing(id).unwrap().data().current_tick_total(), 15);

    // A fourth stop has nothing to close.
    clock.advance(5);
    engine.stop(id);
    let timing = engine.timing(id).unwrap();
    assert_eq!(timing.depth(), 0);
    assert_eq!(timing.data().current_tick_count(), 1);
    assert_eq!(timing.data().current_tick_total(), 15);
}

#[test]
fn test_disabled_timer_never_mutates_data() {
    let (mut engine, clock) = engine_with(TimingsConfig {
        verbose_enabled: false,
        ..TimingsConfig::default()
    });
    let id = engine.of("## Pathfinding");

    engine.start(id);
    clock.advance(100);
    engine.stop(id);
    engine.abort(id);

    let timing = engine.timing(id).unwrap();
    assert_eq!(timing.name(), "Pathfinding");
    assert!(timing.is_verbose());
    assert!(!timing.is_enabled());
    assert_eq!(timing.depth(), 0);
    assert!(!timing.data().has_data());
    assert_eq!(timing.data().current_tick_count(), 0);
    assert!(engine.session_timings().is_empty());
    assert_eq!(engine.current(), None);
}

#[test]
fn test_abort_discards_the_running_sample() {
    let (mut engine, clock) = engine();
    let outer = engine.of("Outer");
    let inner = engine.of("Inner");

    engine.start(outer);
    engine.start(inner);
    clock.advance(70);
    engine.abort(inner);
    engine.stop(inner);
    assert_eq!(engine.current(), Some(outer));
    engine.stop(outer);

    assert_eq!(engine.timing(inner).unwrap().data().current_tick_count(), 0);
    assert!(engine.timing(outer).unwrap().children().is_empty());
    assert_eq!(engine.timing(outer).unwrap().data().current_tick_total(), 70);
    assert_eq!(engine.current(), None);
}

// ─────────────────────────────────────────────────────────────────────────────
// Nesting
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_nested_timer_feeds_parent_breakdown() {
    let (mut engine, clock) = engine();
    let outer = engine.of("World Tick");
    let inner = engine.of("Entity Tick");

    engine.start(outer);
    clock.advance(10);
    engine.start(inner);
    assert_eq!(engine.current(), Some(inner));
    clock.advance(25);
    engine.stop(inner);
    assert_eq!(engine.current(), Some(outer));
    engine.stop(outer);

    let outer_timing = engine.timing(outer).unwrap();
    assert_eq!(outer_timing.data().current_tick_total(), 35);
    assert_eq!(outer_timing.children()[&inner].current_tick_total(), 25);
    assert_eq!(outer_timing.children()[&inner].current_tick_count(), 1);
    // Session order follows the first recorded sample.
    assert_eq!(engine.session_timings(), &[inner, outer]);
}

#[test]
fn test_guard_stops_on_drop() {
    let (mut engine, clock) = engine();
    let outer = engine.of("Outer");
    let inner = engine.of("Inner");

    {
        let mut guard = engine.time(outer);
        clock.advance(5);
        {
            let _inner = guard.time(inner);
            clock.advance(5);
        }
        assert_eq!(guard.current(), Some(outer));
    }

    assert_eq!(engine.timing(outer).unwrap().data().current_tick_total(), 10);
    assert_eq!(engine.timing(inner).unwrap().data().current_tick_total(), 5);
    assert!(!engine.timing(outer).unwrap().is_running());
}

#[test]
fn test_guard_abort_still_balances_depth() {
    let (mut engine, clock) = engine();
    let id = engine.of("Cancelled");

    {
        let mut guard = engine.time(id);
        clock.advance(5);
        guard.abort();
    }

    let timing = engine.timing(id).unwrap();
    assert_eq!(timing.depth(), 0);
    assert_eq!(timing.data().current_tick_count(), 0);
    assert_eq!(engine.current(), None);
}

#[test]
fn test_timed_returns_closure_value() {
    let (mut engine, clock) = engine();
    let id = engine.of("Compute");
    let value = engine.timed(id, |_| {
        clock.advance(3);
        42
    });
    assert_eq!(value, 42);
    assert_eq!(engine.timing(id).unwrap().data().current_tick_total(), 3);
}

// ─────────────────────────────────────────────────────────────────────────────
// Group rollup
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_group_timer_rolls_up_member_cost() {
    let (mut engine, clock) = engine();
    let plugins = engine.of("Plugins");
    let plugin = engine.acquire("Plugins", "## Plugin A", Some(plugins));

    engine.tick(|engine| {
        engine.timed(plugin, |_| clock.advance(100));
    });

    let group = engine.timing(plugins).unwrap();
    assert_eq!(group.data().lifetime_count(), 1);
    assert_eq!(group.data().lifetime_total(), 100);
    assert_eq!(group.children()[&plugin].lifetime_total(), 100);
    let root = engine.timing(engine.tick_timer()).unwrap();
    assert_eq!(root.children()[&plugin].lifetime_total(), 100);

    // Disabling the member later leaves committed group totals alone.
    engine.handle().set_verbose_enabled(false);
    for _ in 0..3 {
        engine.tick(|engine| {
            engine.timed(plugin, |_| clock.advance(100));
        });
    }
    assert!(!engine.timing(plugin).unwrap().is_enabled());
    let group = engine.timing(plugins).unwrap();
    assert_eq!(group.data().lifetime_count(), 1);
    assert_eq!(group.data().lifetime_total(), 100);
    assert_eq!(group.children()[&plugin].lifetime_total(), 100);
}

#[test]
fn test_group_chain_propagates_to_every_ancestor() {
    let (mut engine, clock) = engine();
    let all = engine.of("All Plugins");
    let vendor = engine.handle().of_grouped("Vendor", all);
    let plugin = engine.acquire("Vendor", "Plugin", Some(vendor));

    engine.timed(plugin, |_| clock.advance(40));

    assert_eq!(engine.timing(vendor).unwrap().data().current_tick_total(), 40);
    assert_eq!(engine.timing(all).unwrap().data().current_tick_total(), 40);
    assert_eq!(
        engine.timing(all).unwrap().children()[&vendor].current_tick_total(),
        40
    );
}

#[test]
fn test_group_timer_from_another_engine_is_ignored() {
    let (other, _) = engine();
    let foreign = (0..11)
        .map(|i| other.of(&format!("Timer {i}")))
        .last()
        .unwrap();

    let (mut engine, clock) = engine();
    let member = engine.acquire("G", "Member", Some(foreign));
    engine.start(member);
    clock.advance(30);
    engine.stop(member);

    let timing = engine.timing(member).unwrap();
    assert_eq!(timing.group_timer(), None);
    assert_eq!(timing.data().current_tick_total(), 30);
    assert_eq!(engine.session_timings(), &[member]);
}
