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

//! The shared timer registry and the thread-safe handle in front of it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use timings_core::{
    Interner, LoadingMap, Symbol, TimerGroup, TimerId, TimingIdentifier, TimingsEnvironment,
};

/// Marks a timer that only runs while verbose collection is on.
const VERBOSE_MARKER: &str = "##";

/// Splits a raw timer name into its display name and verbose flag.
fn parse_name(raw: &str) -> (&str, bool) {
    match raw.strip_prefix(VERBOSE_MARKER) {
        Some(rest) => (rest.strip_prefix(' ').unwrap_or(rest), true),
        None => (raw, false),
    }
}

/// Everything the engine needs to materialize a timer node.
#[derive(Debug, Clone)]
pub(crate) struct TimerSpec {
    pub id: TimerId,
    pub name: Arc<str>,
    pub verbose: bool,
    pub group_id: u32,
    pub group_timer: Option<TimerId>,
    pub protect: bool,
}

#[derive(Debug, Default)]
pub(crate) struct Registry {
    interner: Interner,
    by_identity: HashMap<TimingIdentifier, TimerId>,
    pub(crate) specs: Vec<TimerSpec>,
    groups: HashMap<Symbol, TimerGroup>,
    group_order: Vec<Symbol>,
    next_group_id: u32,
}

impl Registry {
    fn acquire(
        &mut self,
        group: &str,
        name: &str,
        group_timer: Option<TimerId>,
        protect: bool,
    ) -> TimerId {
        let group_timer = match group_timer {
            Some(gt) if gt.index() >= self.specs.len() => {
                log::warn!(
                    "Timer '{name}' names unknown group timer {gt}, registering it ungrouped"
                );
                None
            }
            gt => gt,
        };
        let identity = TimingIdentifier::new(&mut self.interner, group, name, group_timer, protect);
        if let Some(id) = self.by_identity.get(&identity) {
            return *id;
        }

        let id = TimerId::from_index(self.specs.len());
        let (display, verbose) = parse_name(&identity.name);
        let next_group_id = &mut self.next_group_id;
        let group_order = &mut self.group_order;
        let group = self.groups.get_or_insert_with(identity.group.clone(), |name| {
            *next_group_id += 1;
            group_order.push(name.clone());
            TimerGroup::new(*next_group_id, name.clone())
        });
        group.push(id);

        self.specs.push(TimerSpec {
            id,
            name: Arc::from(display),
            verbose,
            group_id: group.id,
            group_timer: identity.group_timer,
            protect: identity.protect,
        });
        log::trace!("Registered timer {id} '{name}' in group '{}'", identity.group);
        self.by_identity.insert(identity, id);
        id
    }

    /// Groups in creation order.
    pub(crate) fn groups(&self) -> impl Iterator<Item = &TimerGroup> {
        self.group_order
            .iter()
            .filter_map(|name| self.groups.get(name))
    }
}

/// State shared between the tick thread and every [`Timings`] handle.
#[derive(Debug)]
pub(crate) struct Shared {
    pub environment: TimingsEnvironment,
    registry: Mutex<Registry>,
    timer_count: AtomicUsize,
    needs_full_reset: AtomicBool,
    needs_recheck_enabled: AtomicBool,
    default_group: String,
}

impl Shared {
    pub(crate) fn new(environment: TimingsEnvironment, default_group: String) -> Self {
        Self {
            environment,
            registry: Mutex::new(Registry::default()),
            timer_count: AtomicUsize::new(0),
            needs_full_reset: AtomicBool::new(false),
            needs_recheck_enabled: AtomicBool::new(false),
            default_group,
        }
    }

    /// Locks the registry. A poisoned lock still holds a consistent registry,
    /// since every mutation completes before any call that could panic.
    pub(crate) fn lock(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn acquire(
        &self,
        group: &str,
        name: &str,
        group_timer: Option<TimerId>,
        protect: bool,
    ) -> TimerId {
        let mut registry = self.lock();
        let id = registry.acquire(group, name, group_timer, protect);
        self.timer_count.store(registry.specs.len(), Ordering::Release);
        id
    }

    pub(crate) fn timer_count(&self) -> usize {
        self.timer_count.load(Ordering::Acquire)
    }

    pub(crate) fn full_reset_requested(&self) -> bool {
        self.needs_full_reset.load(Ordering::Acquire)
    }

    pub(crate) fn take_recheck_request(&self) -> bool {
        self.needs_recheck_enabled.swap(false, Ordering::AcqRel)
    }

    pub(crate) fn clear_requests(&self) {
        self.needs_full_reset.store(false, Ordering::Release);
        self.needs_recheck_enabled.store(false, Ordering::Release);
    }
}

/// A cloneable, thread-safe handle to an engine's registry and switches.
///
/// Timers can be acquired from any thread; resets and enablement changes are
/// only requested here and applied by the engine at the top of its next tick.
#[derive(Debug, Clone)]
pub struct Timings {
    shared: Arc<Shared>,
}

impl Timings {
    pub(crate) fn from_shared(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    /// Looks up or creates the timer `name` in `group`.
    ///
    /// A name starting with `##` marks a verbose timer. When the identity
    /// already exists its original group timer is kept.
    pub fn acquire(&self, group: &str, name: &str, group_timer: Option<TimerId>) -> TimerId {
        self.shared.acquire(group, name, group_timer, false)
    }

    /// Looks up or creates `name` in the default group.
    pub fn of(&self, name: &str) -> TimerId {
        self.acquire(&self.shared.default_group, name, None)
    }

    /// Looks up or creates `name` in the default group, rolling into `group_timer`.
    pub fn of_grouped(&self, name: &str, group_timer: TimerId) -> TimerId {
        self.acquire(&self.shared.default_group, name, Some(group_timer))
    }

    /// Requests a full reset at the start of the next tick.
    pub fn reset(&self) {
        self.shared.needs_full_reset.store(true, Ordering::Release);
    }

    /// Turns collection on or off from the next tick.
    pub fn set_enabled(&self, enabled: bool) {
        self.shared.environment.set_enabled(enabled);
        self.request_recheck();
    }

    /// Turns verbose collection on or off from the next tick.
    pub fn set_verbose_enabled(&self, verbose_enabled: bool) {
        self.shared.environment.set_verbose_enabled(verbose_enabled);
        self.request_recheck();
    }

    /// Disables collection.
    pub fn stop(&self) {
        self.set_enabled(false);
    }

    fn request_recheck(&self) {
        self.shared
            .needs_recheck_enabled
            .store(true, Ordering::Release);
    }

    /// The shared environment flags.
    pub fn environment(&self) -> &TimingsEnvironment {
        &self.shared.environment
    }

    /// Number of timers registered so far.
    pub fn timer_count(&self) -> usize {
        self.shared.timer_count()
    }

    /// Display name of a registered timer.
    pub fn name_of(&self, id: TimerId) -> Option<Arc<str>> {
        let registry = self.shared.lock();
        registry
            .specs
            .get(id.index())
            .map(|spec| Arc::clone(&spec.name))
    }

    /// Copies of every group in creation order.
    pub fn groups(&self) -> Vec<TimerGroup> {
        self.shared.lock().groups().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn handle() -> Timings {
        Timings::from_shared(Arc::new(Shared::new(
            TimingsEnvironment::default(),
            "Engine".to_owned(),
        )))
    }

    #[test]
    fn test_parse_name() {
        assert_eq!(parse_name("Tick"), ("Tick", false));
        assert_eq!(parse_name("## Pathfinding"), ("Pathfinding", true));
        assert_eq!(parse_name("##Pathfinding"), ("Pathfinding", true));
        assert_eq!(parse_name("##  Two"), (" Two", true));
    }

    #[test]
    fn test_acquire_is_idempotent() {
        let timings = handle();
        let first = timings.acquire("World", "Entities", None);
        let second = timings.acquire("World", "Entities", None);
        let other_group = timings.acquire("Plugins", "Entities", None);

        assert_eq!(first, second);
        assert_ne!(first, other_group);
        assert_eq!(timings.timer_count(), 2);
    }

    #[test]
    fn test_first_group_timer_wins() {
        let timings = handle();
        let group = timings.of("Plugins");
        let id = timings.of_grouped("Plugin A", group);
        assert_eq!(timings.of("Plugin A"), id);

        let registry = timings.shared.lock();
        assert_eq!(registry.specs[id.index()].group_timer, Some(group));
    }

    #[test]
    fn test_unknown_group_timer_is_dropped() {
        let timings = handle();
        timings.of("Tick");
        let id = timings.of_grouped("Member", TimerId::from_index(40));

        let registry = timings.shared.lock();
        assert_eq!(registry.specs[id.index()].group_timer, None);
        drop(registry);
        assert_eq!(timings.of("Member"), id);
    }

    #[test]
    fn test_groups_keep_member_order() {
        let timings = handle();
        let a = timings.acquire("World", "A", None);
        let tick = timings.of("Tick");
        let b = timings.acquire("World", "## B", None);

        let groups = timings.groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name.as_str(), "World");
        assert_eq!(groups[0].id, 1);
        assert_eq!(groups[0].members(), &[a, b]);
        assert_eq!(groups[1].members(), &[tick]);
        assert_eq!(timings.name_of(b).as_deref(), Some("B"));
    }

    #[test]
    fn test_concurrent_acquire_yields_one_id() {
        let timings = handle();
        let workers: Vec<_> = (0..8)
            .map(|_| {
                let timings = timings.clone();
                thread::spawn(move || timings.acquire("Async", "Chunk Load", None))
            })
            .collect();

        let ids: Vec<TimerId> = workers.into_iter().map(|w| w.join().unwrap()).collect();
        assert!(ids.windows(2).all(|pair| pair[0] == pair[1]));
        assert_eq!(timings.timer_count(), 1);
    }

    #[test]
    fn test_requests_are_flags() {
        let timings = handle();
        timings.reset();
        timings.set_verbose_enabled(false);

        assert!(timings.shared.full_reset_requested());
        assert!(timings.shared.take_recheck_request());
        assert!(!timings.shared.take_recheck_request());
        assert!(!timings.environment().verbose_enabled());

        timings.shared.clear_requests();
        assert!(!timings.shared.full_reset_requested());
    }
}
