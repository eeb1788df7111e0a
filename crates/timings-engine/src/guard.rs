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

//! Provides an RAII guard that times a scope on a [`TimingsEngine`].

use crate::engine::TimingsEngine;
use std::ops::{Deref, DerefMut};
use timings_core::TimerId;

/// Stops its timer when dropped.
///
/// The guard derefs to the engine, so nested regions are timed by calling
/// [`TimingsEngine::time`] on the guard itself. The stop happens on every
/// exit path, including early returns and unwinding.
pub struct TimingGuard<'a> {
    engine: &'a mut TimingsEngine,
    id: TimerId,
}

impl<'a> TimingGuard<'a> {
    pub(crate) fn new(engine: &'a mut TimingsEngine, id: TimerId) -> Self {
        Self { engine, id }
    }

    /// The timer being measured.
    pub fn id(&self) -> TimerId {
        self.id
    }

    /// Discards the running sample. The drop still balances the start.
    pub fn abort(&mut self) {
        self.engine.abort(self.id);
    }
}

impl Deref for TimingGuard<'_> {
    type Target = TimingsEngine;

    fn deref(&self) -> &TimingsEngine {
        self.engine
    }
}

impl DerefMut for TimingGuard<'_> {
    fn deref_mut(&mut self) -> &mut TimingsEngine {
        self.engine
    }
}

impl Drop for TimingGuard<'_> {
    fn drop(&mut self) {
        self.engine.stop(self.id);
    }
}
