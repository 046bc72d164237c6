use std::fmt;

use oorandom::Rand32;
use tracing::Level as LogLevel;

use crate::{
    error::ConstructError,
    level_list::LevelList,
    level_rng::random_target_level,
    node::{Link, NodeId, NodeStore},
};


/// An in-memory ordered map backed by a probabilistic [skiplist].
///
/// Keys are kept sorted across a fixed number of levels: level 0 is a
/// singly-linked list of every entry, and each level above it holds a
/// probabilistic subset of the one below, so that lookups, inserts, and
/// erases run in expected `O(log n)` without any rebalancing.
///
/// The number of levels is fixed at construction and acts as a capacity and
/// performance tuning knob: a node's height is capped at `max_level` no
/// matter how the coin flips land. Around `2^max_level` entries the expected
/// cost starts degrading towards that of a plain sorted list.
///
/// All operations run to completion on the calling thread; the structure has
/// no internal locking, and shared access must be synchronized externally.
///
/// [skiplist]: https://en.wikipedia.org/wiki/Skip_list
pub struct SkipList<K, V> {
    store:     NodeStore<K, V>,
    levels:    Vec<LevelList>,
    prng:      Rand32,
    max_level: usize,
    len:       usize,
}

// ================================
//  Construction
// ================================

impl<K, V> SkipList<K, V> {
    /// Create an empty skiplist with the given level bound, seeding the
    /// level-draw PRNG from OS entropy.
    pub fn new(max_level: usize) -> Result<Self, ConstructError> {
        // Level draws only need statistical quality. If OS entropy is
        // somehow unavailable, a fixed seed degrades balance, not
        // correctness.
        let seed = getrandom::u64().unwrap_or(0x_5DEE_CE66_D1CE_5EED);
        Self::new_seeded(max_level, seed)
    }

    /// Create an empty skiplist whose level draws are fully determined by
    /// `seed`.
    pub fn new_seeded(max_level: usize, seed: u64) -> Result<Self, ConstructError> {
        if max_level == 0 {
            return Err(ConstructError::ZeroMaxLevel);
        }

        Ok(Self {
            store:     NodeStore::new(max_level),
            levels:    (0..max_level).map(LevelList::new).collect(),
            prng:      Rand32::new(seed),
            max_level,
            len:       0,
        })
    }
}

// ================================
//  Queries
// ================================

impl<K, V> SkipList<K, V> {
    /// Number of live keys; equals the length of level 0's list.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The fixed level bound configured at construction.
    #[inline]
    #[must_use]
    pub fn max_level(&self) -> usize {
        self.max_level
    }

    /// Every level's key sequence in order, level 0 (the dense list) first.
    ///
    /// This is a diagnostic dump; level 0 enumerates every key, and the
    /// levels above it show how the probabilistic balancing turned out.
    #[must_use]
    pub fn level_keys(&self) -> Vec<Vec<&K>> {
        self.levels
            .iter()
            .map(|list| list.keys(&self.store))
            .collect()
    }
}

impl<K: Ord, V> SkipList<K, V> {
    /// Look up `key`, returning the stored value if it is present.
    ///
    /// The descent returns as soon as any level scans directly onto the key.
    #[must_use]
    pub fn find(&self, key: &K) -> Option<&V> {
        let node = self.find_node(key)?;
        self.store.node(node).value()
    }

    /// Whether `key` is present.
    #[inline]
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.find_node(key).is_some()
    }
}

// ================================
//  Mutation
// ================================

impl<K: Ord, V> SkipList<K, V> {
    /// Insert `key` with `value`, or overwrite the value in place when the
    /// key is already present.
    ///
    /// A fresh key gets a random target level drawn by fair coin flips
    /// (capped at [`max_level`]) and is spliced into every level below that
    /// height, at the position the downward search recorded per level.
    ///
    /// [`max_level`]: SkipList::max_level
    pub fn update(&mut self, key: K, value: V) {
        let mut history = vec![None; self.max_level];

        if let Some(node) = self.locate_with_history(&key, &mut history) {
            self.store.node_mut(node).set_value(value);
            return;
        }

        let target_level = random_target_level(&mut self.prng, self.max_level);
        tracing::event!(LogLevel::TRACE, "splicing a new node across {target_level} levels");

        let node = self.store.alloc(key, value, target_level);

        for level in 0..target_level {
            // Without a recorded predecessor the node becomes the level's
            // first element, splicing in directly after the head sentinel.
            let after = history[level].unwrap_or_else(|| self.store.head());
            self.levels[level].insert_after(&mut self.store, after, node);
        }

        self.len += 1;
        debug_assert_eq!(
            self.levels[0].len(&self.store),
            self.len,
            "the live-key count is the length of level 0's list",
        );
    }

    /// Remove `key` and release its node. Erasing an absent key is a no-op.
    ///
    /// The node is unlinked from every level it occupies using the
    /// predecessors captured by the same traversal that located it; no level
    /// is re-scanned.
    pub fn erase(&mut self, key: &K) {
        let mut history = vec![None; self.max_level];

        let Some(node) = self.locate_with_history(key, &mut history) else {
            return;
        };

        let height = self.store.node(node).height();
        tracing::event!(LogLevel::TRACE, "unlinking an erased node from {height} levels");

        for level in 0..height {
            let predecessor = history[level].unwrap_or_else(|| self.store.head());
            self.levels[level].remove_after(&mut self.store, predecessor, node);
        }

        let _entry = self.store.free(node);
        self.len -= 1;
        debug_assert_eq!(
            self.levels[0].len(&self.store),
            self.len,
            "the live-key count is the length of level 0's list",
        );
    }
}

// ================================
//  Downward search
// ================================

impl<K: Ord, V> SkipList<K, V> {
    /// Top-down descent for the read path: scan each level forward while the
    /// next key is less than `key`, and return immediately on an exact match.
    fn find_node(&self, key: &K) -> Option<NodeId> {
        let mut current = self.store.head();

        for level in (0..self.max_level).rev() {
            let search = self.levels[level].search_from(&self.store, current, key);
            if search.hit.is_some() {
                return search.hit;
            }
            // Levels below resume from this predecessor instead of the head;
            // predecessors only ever move forward.
            current = search.predecessor;
        }

        None
    }

    /// Top-down descent for the mutating paths.
    ///
    /// Unlike [`find_node`], this always completes the full descent, so
    /// `history` receives the true predecessor at *every* level even when
    /// the match is first seen high up. Erase needs that: the early-exit
    /// search would leave the levels below the match without a predecessor.
    ///
    /// [`find_node`]: SkipList::find_node
    fn locate_with_history(&self, key: &K, history: &mut [Link]) -> Option<NodeId> {
        debug_assert_eq!(history.len(), self.max_level);

        let mut found = None;
        let mut current = self.store.head();

        for level in (0..self.max_level).rev() {
            let search = self.levels[level].search_from(&self.store, current, key);

            if found.is_none() {
                found = search.hit;
            }

            history[level] = Some(search.predecessor);
            current = search.predecessor;
        }

        found
    }
}

impl<K: fmt::Debug, V> fmt::Debug for SkipList<K, V> {
    /// Renders each level's key sequence, topmost (sparsest) level first.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut dump = f.debug_map();
        for list in self.levels.iter().rev() {
            dump.entry(&list.index(), &list.keys(&self.store));
        }
        dump.finish()
    }
}


#[cfg(test)]
mod tests {
    use super::*;


    #[test]
    fn history_covers_every_level_despite_a_match() {
        let mut list = SkipList::new_seeded(8, 0x_BEEF).unwrap();

        for key in [10_u32, 20, 30, 40, 50] {
            list.update(key, key);
        }

        let mut history = vec![None; list.max_level()];
        let found = list.locate_with_history(&30, &mut history);
        let found = found.expect("30 was inserted");

        for (level, recorded) in history.iter().copied().enumerate() {
            let predecessor = recorded.expect("the full descent records every level");

            // The recorded node must be the true predecessor: strictly less
            // than the key, with its successor at that level not less.
            let node = list.store.node(predecessor);
            if let Some(key) = node.key() {
                assert!(*key < 30);
            }

            if level < list.store.node(found).height() {
                assert_eq!(node.next(level), Some(found));
            }
        }
    }

    #[test]
    fn erased_nodes_leave_no_link_behind() {
        let mut list = SkipList::new_seeded(8, 0x_F00D).unwrap();

        for key in 0_u32..64 {
            list.update(key, key);
        }
        for key in (0_u32..64).step_by(2) {
            list.erase(&key);
        }

        for keys in list.level_keys() {
            assert!(keys.iter().all(|key| **key % 2 == 1));
        }
    }
}
