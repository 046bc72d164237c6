use std::cmp::Ordering;

use crate::node::{Link, NodeId, NodeStore};


/// Result of scanning one level for a key: the last node whose key was
/// strictly less than the target (possibly the head sentinel), and the
/// matching node directly after it, when the target is present on the level.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LevelSearch {
    pub(crate) predecessor: NodeId,
    pub(crate) hit:         Link,
}

/// One horizontal sorted sub-list of the skiplist.
///
/// A `LevelList` owns no nodes; it is a view over the shared [`NodeStore`],
/// bounded by the store's head and tail sentinels. Within a level, keys are
/// strictly increasing from the head's successor to the tail.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LevelList {
    index: usize,
}

impl LevelList {
    #[inline]
    #[must_use]
    pub(crate) const fn new(index: usize) -> Self {
        Self { index }
    }

    #[inline]
    #[must_use]
    pub(crate) const fn index(self) -> usize {
        self.index
    }

    /// Scan forward from `start` while the next key is less than `key`.
    ///
    /// `start` must occupy this level; the skiplist's descent guarantees that,
    /// since a predecessor found on some level occupies every level below it.
    pub(crate) fn search_from<K: Ord, V>(
        self,
        store: &NodeStore<K, V>,
        start: NodeId,
        key:   &K,
    ) -> LevelSearch {
        let mut current = start;
        let mut hit = None;

        while let Some(next) = store.node(current).next(self.index) {
            let Some(next_key) = store.node(next).key() else {
                // Only the tail sentinel lacks a key; it sorts after every key.
                break;
            };

            match next_key.cmp(key) {
                Ordering::Less => current = next,
                Ordering::Equal => {
                    hit = Some(next);
                    break;
                }
                Ordering::Greater => break,
            }
        }

        LevelSearch { predecessor: current, hit }
    }

    /// Splice `new` directly after `after` on this level by rewriting one
    /// forward link. O(1) given the anchor.
    pub(crate) fn insert_after<K, V>(
        self,
        store: &mut NodeStore<K, V>,
        after: NodeId,
        new:   NodeId,
    ) {
        let next = store.node(after).next(self.index);
        store.node_mut(new).set_next(self.index, next);
        store.node_mut(after).set_next(self.index, Some(new));
    }

    /// Unlink `node` from this level by relinking its `predecessor` past it.
    ///
    /// The predecessor must come from the same traversal that located `node`;
    /// this never re-scans the level.
    pub(crate) fn remove_after<K, V>(
        self,
        store:       &mut NodeStore<K, V>,
        predecessor: NodeId,
        node:        NodeId,
    ) {
        debug_assert_eq!(
            store.node(predecessor).next(self.index),
            Some(node),
            "caller must supply the true predecessor on this level",
        );

        let next = store.node(node).next(self.index);
        store.node_mut(predecessor).set_next(self.index, next);
    }

    /// Number of nodes strictly between the sentinels on this level.
    #[must_use]
    pub(crate) fn len<K, V>(self, store: &NodeStore<K, V>) -> usize {
        let mut count = 0;
        let mut current = store.head();

        while let Some(next) = store.node(current).next(self.index) {
            if store.node(next).key().is_none() {
                break;
            }
            count += 1;
            current = next;
        }

        count
    }

    /// The level's key sequence in order, sentinels excluded.
    #[must_use]
    pub(crate) fn keys<'s, K, V>(self, store: &'s NodeStore<K, V>) -> Vec<&'s K> {
        let mut keys = Vec::new();
        let mut current = store.head();

        while let Some(next) = store.node(current).next(self.index) {
            let Some(key) = store.node(next).key() else {
                break;
            };
            keys.push(key);
            current = next;
        }

        keys
    }
}
