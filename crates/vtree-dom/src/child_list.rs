//! Compact Child List
//!
//! Append-friendly slot array with swap-on-delete removal. Logical order
//! lives in per-node prev/next links, so it survives slot relocation.
//! Physical slot order only matches logical order again after
//! [`ChildList::sort_list`].
//!
//! # Invariants
//! - A live node's `index` link equals its slot position, across swaps.
//! - Walking `next` links from `head` yields insertion-minus-removal order.
//! - A clean (not dirty) list has no holes and slot order == logical order.

use std::sync::atomic::{AtomicBool, AtomicIsize, Ordering};

use crate::{DomError, DomResult, NodeId};

/// Sentinel for "no such link"
pub const NO_LINK: isize = -1;

/// Expand when free capacity drops to this many slots
const EXPAND_THRESHOLD: usize = 2;

/// Smallest expansion step
const MIN_EXPANSION: usize = 4;

/// Positional links of one node inside its parent's child list.
///
/// Atomics only give readers a consistent view of individual index values
/// while one writer mutates the list. Structural operations still need a
/// single writer.
#[derive(Debug)]
pub struct Links {
    index: AtomicIsize,
    prev: AtomicIsize,
    next: AtomicIsize,
}

impl Links {
    /// Unlinked
    pub const fn new() -> Self {
        Self {
            index: AtomicIsize::new(NO_LINK),
            prev: AtomicIsize::new(NO_LINK),
            next: AtomicIsize::new(NO_LINK),
        }
    }

    /// Slot position in the parent's list
    #[inline]
    pub fn index(&self) -> isize {
        self.index.load(Ordering::Acquire)
    }

    /// Slot position of the previous sibling
    #[inline]
    pub fn prev(&self) -> isize {
        self.prev.load(Ordering::Acquire)
    }

    /// Slot position of the next sibling
    #[inline]
    pub fn next(&self) -> isize {
        self.next.load(Ordering::Acquire)
    }

    #[inline]
    pub fn set_index(&self, value: isize) {
        self.index.store(value, Ordering::Release);
    }

    #[inline]
    pub fn set_prev(&self, value: isize) {
        self.prev.store(value, Ordering::Release);
    }

    #[inline]
    pub fn set_next(&self, value: isize) {
        self.next.store(value, Ordering::Release);
    }

    /// Copy all three positions from another node
    pub fn copy_from(&self, other: &Links) {
        self.set_index(other.index());
        self.set_prev(other.prev());
        self.set_next(other.next());
    }

    /// Drop all positions
    pub fn reset(&self) {
        self.set_index(NO_LINK);
        self.set_prev(NO_LINK);
        self.set_next(NO_LINK);
    }

    /// Check if the node currently sits in a list
    pub fn is_linked(&self) -> bool {
        self.index() != NO_LINK
    }
}

impl Default for Links {
    fn default() -> Self {
        Self::new()
    }
}

/// Lookup of a node's [`Links`]
pub trait LinkTable {
    fn links(&self, node: NodeId) -> &Links;
}

impl LinkTable for [Links] {
    #[inline]
    fn links(&self, node: NodeId) -> &Links {
        &self[node.index()]
    }
}

impl LinkTable for Vec<Links> {
    #[inline]
    fn links(&self, node: NodeId) -> &Links {
        &self[node.index()]
    }
}

/// Compact, order-preserving list of child handles
#[derive(Debug)]
pub struct ChildList {
    /// Backing slots; `None` is a hole left by a removal
    slots: Vec<Option<NodeId>>,
    /// Slot of the logically first node
    head: isize,
    /// Slot of the logically last node
    tail: isize,
    /// Number of live nodes
    live: usize,
    /// Physical order diverges from logical order
    dirty: AtomicBool,
    /// Step of the previous expansion
    velocity: usize,
}

impl ChildList {
    /// Create an empty list
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            head: NO_LINK,
            tail: NO_LINK,
            live: 0,
            dirty: AtomicBool::new(false),
            velocity: 0,
        }
    }

    /// Number of live nodes
    #[inline]
    pub fn len(&self) -> usize {
        self.live
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Number of slots including holes
    #[inline]
    pub fn physical_len(&self) -> usize {
        self.slots.len()
    }

    /// Slot capacity of the backing storage
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Whether slot order has diverged from logical order
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    /// Logically first node
    pub fn first(&self) -> Option<NodeId> {
        self.slot(self.head)
    }

    /// Logically last node
    pub fn last(&self) -> Option<NodeId> {
        self.slot(self.tail)
    }

    /// Node in a slot addressed by a link value
    #[inline]
    pub fn slot(&self, index: isize) -> Option<NodeId> {
        if index < 0 {
            return None;
        }
        self.slots.get(index as usize).copied().flatten()
    }

    /// Append a node at the logical and physical tail
    pub fn add<T: LinkTable + ?Sized>(&mut self, node: NodeId, table: &T) -> usize {
        if self.slots.capacity() - self.slots.len() <= EXPAND_THRESHOLD {
            self.expand();
        }

        let index = self.slots.len();
        self.slots.push(Some(node));

        let links = table.links(node);
        links.set_index(index as isize);
        links.set_prev(self.tail);
        links.set_next(NO_LINK);

        match self.slot(self.tail) {
            Some(prev) => table.links(prev).set_next(index as isize),
            None => self.head = index as isize,
        }
        self.tail = index as isize;
        self.live += 1;
        index
    }

    /// Geometric growth from capacity, load and last velocity
    fn expand(&mut self) {
        let capacity = self.slots.capacity();
        let load = if capacity == 0 {
            1.0
        } else {
            self.slots.len() as f64 / capacity as f64
        };
        let step = ((capacity as f64 * load) as usize + self.velocity).max(MIN_EXPANSION);
        self.slots.reserve_exact(step);
        self.velocity = step / 2;
    }

    /// Direct slot access
    pub fn get(&self, index: usize) -> DomResult<NodeId> {
        match self.slots.get(index) {
            None => Err(DomError::InvalidIndex(index)),
            Some(None) => Err(DomError::EmptyIndex(index)),
            Some(Some(node)) => Ok(*node),
        }
    }

    /// Vacate a slot and unlink its node from the logical order.
    ///
    /// A vacated last slot is truncated; interior holes stay until
    /// [`swap_index`](Self::swap_index) or [`sort_list`](Self::sort_list).
    pub fn remove_index<T: LinkTable + ?Sized>(
        &mut self,
        index: usize,
        table: &T,
    ) -> DomResult<NodeId> {
        if self.live == 0 {
            return Err(DomError::EmptyList);
        }
        let node = self.get(index)?;

        let links = table.links(node);
        let (prev, next) = (links.prev(), links.next());
        match self.slot(prev) {
            Some(p) => table.links(p).set_next(next),
            None => self.head = next,
        }
        match self.slot(next) {
            Some(n) => table.links(n).set_prev(prev),
            None => self.tail = prev,
        }
        links.reset();

        self.slots[index] = None;
        self.live -= 1;
        if index + 1 == self.slots.len() {
            self.slots.pop();
        } else {
            self.dirty.store(true, Ordering::Release);
        }
        Ok(node)
    }

    /// Fill the hole at `index` with the last physical node
    pub fn swap_index<T: LinkTable + ?Sized>(&mut self, index: usize, table: &T) -> DomResult<()> {
        loop {
            let len = self.slots.len();
            if index >= len {
                // hole already truncated away
                return Ok(());
            }
            if self.slots[index].is_some() {
                return Err(DomError::OccupiedIndex(index));
            }
            if index + 1 == len {
                self.slots.pop();
                return Ok(());
            }

            // a hole at the physical tail is dropped and the next one tried
            let Some(node) = self.slots.pop().flatten() else {
                continue;
            };

            let at = index as isize;
            self.slots[index] = Some(node);
            let links = table.links(node);
            links.set_index(at);
            match self.slot(links.prev()) {
                Some(p) => table.links(p).set_next(at),
                None => self.head = at,
            }
            match self.slot(links.next()) {
                Some(n) => table.links(n).set_prev(at),
                None => self.tail = at,
            }
            self.dirty.store(true, Ordering::Release);
            return Ok(());
        }
    }

    /// Standard deletion path: O(1), positional indices move
    pub fn remove_and_swap<T: LinkTable + ?Sized>(
        &mut self,
        index: usize,
        table: &T,
    ) -> DomResult<NodeId> {
        let node = self.remove_index(index, table)?;
        self.swap_index(index, table)?;
        Ok(node)
    }

    /// Put `node` into the slot at `index`, handing it the old node's links.
    /// Returns the node that was replaced.
    pub fn swap_node<T: LinkTable + ?Sized>(
        &mut self,
        index: usize,
        node: NodeId,
        table: &T,
    ) -> DomResult<NodeId> {
        let old = self.get(index)?;
        let from = table.links(old);
        table.links(node).copy_from(from);
        from.reset();
        self.slots[index] = Some(node);
        Ok(old)
    }

    /// Compaction: rewrite slots into logical order. No-op when clean.
    pub fn sort_list<T: LinkTable + ?Sized>(&mut self, table: &T) {
        if !self.is_dirty() {
            return;
        }

        let ordered: Vec<NodeId> = self.iter(table).collect();
        let count = ordered.len();
        self.slots.clear();
        for (position, node) in ordered.into_iter().enumerate() {
            let at = position as isize;
            let links = table.links(node);
            links.set_index(at);
            links.set_prev(if position == 0 { NO_LINK } else { at - 1 });
            links.set_next(if position + 1 == count { NO_LINK } else { at + 1 });
            self.slots.push(Some(node));
        }

        self.head = if count == 0 { NO_LINK } else { 0 };
        self.tail = count as isize - 1;
        self.live = count;
        self.dirty.store(false, Ordering::Release);
    }

    /// Visit nodes in logical order until `visit` returns false
    pub fn each<T, F>(&self, table: &T, mut visit: F)
    where
        T: LinkTable + ?Sized,
        F: FnMut(NodeId, usize) -> bool,
    {
        for (position, node) in self.iter(table).enumerate() {
            if !visit(node, position) {
                break;
            }
        }
    }

    /// Iterate in logical order; correct whether or not the list is dirty
    pub fn iter<'a, T: LinkTable + ?Sized>(&'a self, table: &'a T) -> Iter<'a, T> {
        Iter {
            list: self,
            table,
            cursor: self.head,
        }
    }

    /// Unlink every node and empty the list
    pub fn clear<T: LinkTable + ?Sized>(&mut self, table: &T) {
        for node in self.slots.iter().flatten() {
            table.links(*node).reset();
        }
        self.slots.clear();
        self.head = NO_LINK;
        self.tail = NO_LINK;
        self.live = 0;
        self.dirty.store(false, Ordering::Release);
    }
}

impl Default for ChildList {
    fn default() -> Self {
        Self::new()
    }
}

/// Logical-order iterator over a [`ChildList`]
pub struct Iter<'a, T: ?Sized> {
    list: &'a ChildList,
    table: &'a T,
    cursor: isize,
}

impl<T: LinkTable + ?Sized> Iterator for Iter<'_, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        // a dead link ends the walk
        let node = self.list.slot(self.cursor)?;
        self.cursor = self.table.links(node).next();
        Some(node)
    }
}
