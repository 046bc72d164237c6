use std::mem;


/// Index of a node inside a [`NodeStore`].
///
/// Ids are only meaningful for the store that handed them out, and only while
/// the node is live; [`NodeStore::free`] invalidates the id it is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NodeId(usize);

/// A successor slot at one level. `None` means "no successor here", which for
/// a node that occupies the level can only be the tail sentinel's own slot.
pub(crate) type Link = Option<NodeId>;


// ================================
//  Node
// ================================

/// A single key/value record, plus one forward link per level it occupies.
///
/// The two sentinels are the only nodes without an entry. A node's height is
/// the length of its forward table, fixed at creation: the node is linked
/// into level `i` iff `i < height`.
#[derive(Debug)]
pub(crate) struct Node<K, V> {
    entry:   Option<(K, V)>,
    forward: Vec<Link>,
}

impl<K, V> Node<K, V> {
    #[must_use]
    fn new(key: K, value: V, height: usize) -> Self {
        Self {
            entry:   Some((key, value)),
            forward: vec![None; height],
        }
    }

    #[must_use]
    fn sentinel(forward: Vec<Link>) -> Self {
        Self { entry: None, forward }
    }

    #[inline]
    #[must_use]
    pub(crate) fn height(&self) -> usize {
        self.forward.len()
    }

    /// `None` exactly for the sentinels.
    #[inline]
    #[must_use]
    pub(crate) fn key(&self) -> Option<&K> {
        self.entry.as_ref().map(|(key, _)| key)
    }

    #[inline]
    #[must_use]
    pub(crate) fn value(&self) -> Option<&V> {
        self.entry.as_ref().map(|(_, value)| value)
    }

    /// Overwrite the value in place. The key, height, and links are untouched.
    pub(crate) fn set_value(&mut self, value: V) {
        match &mut self.entry {
            Some((_, slot)) => *slot = value,
            None => unreachable!("sentinels never receive a value"),
        }
    }

    /// The successor at `level`, or `None` when `level` is at or above this
    /// node's height. Asking above the height is still useful to searches.
    #[inline]
    #[must_use]
    pub(crate) fn next(&self, level: usize) -> Link {
        self.forward.get(level).copied().flatten()
    }

    /// # Panics
    /// May or may not panic if `level >= self.height()`.
    pub(crate) fn set_next(&mut self, level: usize, link: Link) {
        debug_assert!(
            level < self.height(),
            "should not try to set a nonexistent forward link of a node",
        );

        if let Some(slot) = self.forward.get_mut(level) {
            *slot = link;
        }
    }

    #[must_use]
    fn into_entry(self) -> (K, V) {
        match self.entry {
            Some(entry) => entry,
            None => unreachable!("sentinels are never freed while the store lives"),
        }
    }
}

// ================================
//  Store
// ================================

#[derive(Debug)]
enum Slot<K, V> {
    Occupied(Node<K, V>),
    /// Holds the next entry of the free list.
    Vacant(Link),
}

/// Slab that exclusively owns every node of a skiplist, the two shared
/// sentinels included.
///
/// The head sentinel sorts before every key and the tail sentinel after every
/// key; both are sized to `max_level` forward slots, and every level starts
/// out in the empty state `head -> tail`. Freed slots are chained into a free
/// list and reused by later allocations.
#[derive(Debug)]
pub(crate) struct NodeStore<K, V> {
    slots:     Vec<Slot<K, V>>,
    free_head: Link,
    head:      NodeId,
    tail:      NodeId,
}

impl<K, V> NodeStore<K, V> {
    #[must_use]
    pub(crate) fn new(max_level: usize) -> Self {
        let head = NodeId(0);
        let tail = NodeId(1);

        let slots = vec![
            Slot::Occupied(Node::sentinel(vec![Some(tail); max_level])),
            Slot::Occupied(Node::sentinel(vec![None; max_level])),
        ];

        Self {
            slots,
            free_head: None,
            head,
            tail,
        }
    }

    #[inline]
    #[must_use]
    pub(crate) fn head(&self) -> NodeId {
        self.head
    }

    #[inline]
    #[must_use]
    pub(crate) fn is_sentinel(&self, id: NodeId) -> bool {
        id == self.head || id == self.tail
    }

    /// # Panics
    /// Panics if `id` does not refer to a live node of this store.
    #[must_use]
    pub(crate) fn node(&self, id: NodeId) -> &Node<K, V> {
        match &self.slots[id.0] {
            Slot::Occupied(node) => node,
            Slot::Vacant(_) => unreachable!("live node ids never point at vacant slots"),
        }
    }

    /// # Panics
    /// Panics if `id` does not refer to a live node of this store.
    #[must_use]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        match &mut self.slots[id.0] {
            Slot::Occupied(node) => node,
            Slot::Vacant(_) => unreachable!("live node ids never point at vacant slots"),
        }
    }

    /// Allocate a node of the given height, with all of its links empty.
    /// Reuses a vacant slot when one is available.
    pub(crate) fn alloc(&mut self, key: K, value: V, height: usize) -> NodeId {
        let node = Node::new(key, value, height);

        if let Some(id) = self.free_head {
            let slot = &mut self.slots[id.0];
            let Slot::Vacant(next_free) = *slot else {
                unreachable!("the free list only ever references vacant slots");
            };

            self.free_head = next_free;
            *slot = Slot::Occupied(node);
            id
        } else {
            let id = NodeId(self.slots.len());
            self.slots.push(Slot::Occupied(node));
            id
        }
    }

    /// Release a node, returning its entry. The caller must already have
    /// unlinked the node from every level it occupied.
    pub(crate) fn free(&mut self, id: NodeId) -> (K, V) {
        debug_assert!(!self.is_sentinel(id), "sentinels live as long as the store");

        let slot = mem::replace(&mut self.slots[id.0], Slot::Vacant(self.free_head));
        self.free_head = Some(id);

        match slot {
            Slot::Occupied(node) => node.into_entry(),
            Slot::Vacant(_) => unreachable!("live node ids never point at vacant slots"),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;


    #[test]
    fn sentinels_bound_every_level() {
        let store: NodeStore<u32, u32> = NodeStore::new(4);
        let head = store.node(store.head());

        assert_eq!(head.height(), 4);
        assert!(head.key().is_none());

        for level in 0..4 {
            let tail = head.next(level).unwrap();
            assert!(store.is_sentinel(tail));
            assert!(store.node(tail).key().is_none());
            assert!(store.node(tail).next(level).is_none());
        }

        // Above the configured bound there is nothing, even for sentinels.
        assert!(head.next(4).is_none());
    }

    #[test]
    fn alloc_links_and_heights() {
        let mut store: NodeStore<u32, &str> = NodeStore::new(3);

        let short = store.alloc(1, "one", 1);
        let tall = store.alloc(2, "two", 3);

        assert_eq!(store.node(short).height(), 1);
        assert_eq!(store.node(tall).height(), 3);
        assert_eq!(store.node(short).key(), Some(&1));
        assert_eq!(store.node(tall).value(), Some(&"two"));

        store.node_mut(short).set_next(0, Some(tall));
        assert_eq!(store.node(short).next(0), Some(tall));
        // The short node has no slot at level 1 at all.
        assert!(store.node(short).next(1).is_none());

        store.node_mut(tall).set_value("zwei");
        assert_eq!(store.node(tall).value(), Some(&"zwei"));
    }

    #[test]
    fn freed_slots_are_recycled() {
        let mut store: NodeStore<u32, u32> = NodeStore::new(2);

        let first = store.alloc(1, 10, 1);
        let second = store.alloc(2, 20, 2);

        assert_eq!(store.free(first), (1, 10));
        assert_eq!(store.free(second), (2, 20));

        // Most recently freed slot comes back first.
        let reused = store.alloc(3, 30, 1);
        assert_eq!(reused, second);
        let reused = store.alloc(4, 40, 1);
        assert_eq!(reused, first);

        assert_eq!(store.node(reused).key(), Some(&4));
    }
}
