//! Node identity
//!
//! Transient ids are handed out by an [`IdSource`]. The default source is a
//! process-wide counter, so trees built one after another never collide and
//! reconciliation can tell adopted ids from fresh ones.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::{DomError, DomResult, NodeId};

/// Per-construction unique node identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct TransientId(u64);

impl TransientId {
    #[inline]
    pub const fn new(value: u64) -> Self {
        TransientId(value)
    }

    /// Get the raw value
    #[inline]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TransientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.0)
    }
}

/// Source of transient ids
pub trait IdSource: Send + Sync {
    fn next_id(&self) -> TransientId;
}

static NEXT_TRANSIENT: AtomicU64 = AtomicU64::new(1);

/// Process-wide monotonic ids
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalIds;

impl IdSource for GlobalIds {
    fn next_id(&self) -> TransientId {
        TransientId(NEXT_TRANSIENT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Id-keyed registry of nodes
#[derive(Debug, Clone, Default)]
pub struct IdRegistry {
    entries: HashMap<String, NodeId>,
}

impl IdRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `node` under `id`; fails while the id is taken
    pub fn register(&mut self, id: &str, node: NodeId) -> DomResult<()> {
        if self.entries.contains_key(id) {
            return Err(DomError::DuplicateId(id.to_string()));
        }
        self.entries.insert(id.to_string(), node);
        Ok(())
    }

    /// Register `node` under `id`.
    ///
    /// # Panics
    /// If `id` is already registered. Ids are assigned by the program
    /// building the tree, so a collision is a bug in that program.
    pub fn insert(&mut self, id: &str, node: NodeId) {
        if let Err(err) = self.register(id, node) {
            panic!("{err}");
        }
    }

    /// Free an id
    pub fn unregister(&mut self, id: &str) -> Option<NodeId> {
        self.entries.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<NodeId> {
        self.entries.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_ids_are_unique() {
        let a = GlobalIds.next_id();
        let b = GlobalIds.next_id();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn test_display_is_hex() {
        assert_eq!(TransientId::new(255).to_string(), "ff");
    }

    #[test]
    fn test_register_rejects_duplicate() {
        let mut registry = IdRegistry::new();
        registry.register("nav", NodeId(1)).unwrap();

        assert_eq!(
            registry.register("nav", NodeId(2)),
            Err(DomError::DuplicateId("nav".to_string()))
        );
        assert_eq!(registry.get("nav"), Some(NodeId(1)));
    }

    #[test]
    fn test_register_after_unregister() {
        let mut registry = IdRegistry::new();
        registry.insert("nav", NodeId(1));
        assert_eq!(registry.unregister("nav"), Some(NodeId(1)));
        registry.insert("nav", NodeId(2));
        assert_eq!(registry.get("nav"), Some(NodeId(2)));
    }

    #[test]
    #[should_panic(expected = "duplicate id")]
    fn test_insert_panics_on_duplicate() {
        let mut registry = IdRegistry::new();
        registry.insert("nav", NodeId(1));
        registry.insert("nav", NodeId(2));
    }
}
