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

//! Memoizing lookup for maps whose entries are created on first access.

use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

/// A map that creates missing entries with a factory on lookup.
///
/// Not synchronized: wrap the whole map in a lock when it is shared.
pub trait LoadingMap<K, V> {
    /// Returns the entry for `key`, inserting `factory(&key)` first if absent.
    fn get_or_insert_with<F>(&mut self, key: K, factory: F) -> &mut V
    where
        F: FnOnce(&K) -> V;
}

impl<K, V, S> LoadingMap<K, V> for HashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn get_or_insert_with<F>(&mut self, key: K, factory: F) -> &mut V
    where
        F: FnOnce(&K) -> V,
    {
        self.entry(key).or_insert_with_key(factory)
    }
}

impl<K, V> LoadingMap<K, V> for BTreeMap<K, V>
where
    K: Ord,
{
    fn get_or_insert_with<F>(&mut self, key: K, factory: F) -> &mut V
    where
        F: FnOnce(&K) -> V,
    {
        self.entry(key).or_insert_with_key(factory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_runs_once_per_key() {
        let mut map: HashMap<u32, Vec<u32>> = HashMap::new();
        let mut calls = 0;

        map.get_or_insert_with(1, |_| {
            calls += 1;
            Vec::new()
        })
        .push(10);
        map.get_or_insert_with(1, |_| {
            calls += 1;
            Vec::new()
        })
        .push(20);

        assert_eq!(calls, 1);
        assert_eq!(map[&1], vec![10, 20]);
    }

    #[test]
    fn test_factory_receives_key() {
        let mut map: BTreeMap<u32, u32> = BTreeMap::new();
        assert_eq!(*map.get_or_insert_with(7, |k| k * 2), 14);
        *map.get_or_insert_with(7, |_| 0) += 1;
        assert_eq!(map[&7], 15);
    }
}
