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

//! Timer identities, interned names and timer groups.
//!
//! Identities are compared on every lookup, so names are interned once and
//! compared by pointer afterwards.

use serde::Serialize;
use std::collections::HashSet;
use std::fmt::{Debug, Display};
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

/// A stable handle to a timer.
///
/// Ids start at 1, are handed out in creation order and are never reused
/// for the lifetime of the engine that created them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TimerId(u32);

impl TimerId {
    /// Builds the id of the timer stored at `index` in the engine's table.
    pub fn from_index(index: usize) -> Self {
        Self(index as u32 + 1)
    }

    /// Position of the timer in the engine's table.
    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    /// The raw id value, as exported.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl Display for TimerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An interned string. Two symbols from the same [`Interner`] are equal iff
/// they point at the same allocation.
#[derive(Clone)]
pub struct Symbol(Arc<str>);

impl Symbol {
    /// Returns the string contents.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.0) as *const u8 as usize).hash(state);
    }
}

impl Deref for Symbol {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl Debug for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(&*self.0, f)
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Deduplicating string table backing [`Symbol`].
#[derive(Debug, Default)]
pub struct Interner {
    strings: HashSet<Arc<str>>,
}

impl Interner {
    /// Creates an empty interner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the canonical symbol for `value`, allocating it on first use.
    pub fn intern(&mut self, value: &str) -> Symbol {
        if let Some(existing) = self.strings.get(value) {
            return Symbol(Arc::clone(existing));
        }
        let interned: Arc<str> = Arc::from(value);
        self.strings.insert(Arc::clone(&interned));
        Symbol(interned)
    }

    /// Number of distinct strings held.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Returns true if nothing was interned yet.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

/// The key a timer is looked up by.
///
/// Only the group name and the local name take part in equality: the first
/// lookup of an identity decides its group timer and `protect` flag.
#[derive(Debug, Clone)]
pub struct TimingIdentifier {
    /// Name of the group the timer is listed under.
    pub group: Symbol,
    /// Local name, including a possible verbose marker.
    pub name: Symbol,
    /// Timer this one rolls its cost into, independently of nesting.
    pub group_timer: Option<TimerId>,
    /// Marks timers owned by the engine itself rather than by host code.
    pub protect: bool,
}

impl TimingIdentifier {
    /// Interns both names and builds the identifier.
    pub fn new(
        interner: &mut Interner,
        group: &str,
        name: &str,
        group_timer: Option<TimerId>,
        protect: bool,
    ) -> Self {
        Self {
            group: interner.intern(group),
            name: interner.intern(name),
            group_timer,
            protect,
        }
    }
}

impl PartialEq for TimingIdentifier {
    fn eq(&self, other: &Self) -> bool {
        self.group == other.group && self.name == other.name
    }
}

impl Eq for TimingIdentifier {}

impl Hash for TimingIdentifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.group.hash(state);
        self.name.hash(state);
    }
}

/// A named category timers are listed under in exports.
#[derive(Debug, Clone)]
pub struct TimerGroup {
    /// Group id, unique per engine, starting at 1.
    pub id: u32,
    /// Group name.
    pub name: Symbol,
    timings: Vec<TimerId>,
}

impl TimerGroup {
    /// Creates an empty group.
    pub fn new(id: u32, name: Symbol) -> Self {
        Self {
            id,
            name,
            timings: Vec::with_capacity(64),
        }
    }

    /// Appends a member timer.
    pub fn push(&mut self, timer: TimerId) {
        self.timings.push(timer);
    }

    /// Member timers in creation order.
    pub fn members(&self) -> &[TimerId] {
        &self.timings
    }
}
