//! DOM Events
//!
//! Event descriptors bound to nodes and the minimal dispatch contract:
//! a responder is either a bare signal or a handler that sees the event.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::NodeId;

/// Event being delivered
#[derive(Debug, Clone)]
pub struct Event {
    pub name: String,
    pub target: Option<NodeId>,
    pub current_target: Option<NodeId>,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl Event {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: None,
            current_target: None,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Prevent default action
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Stop propagation
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// Responds to a bare signal
pub trait SignalResponder: Send + Sync {
    fn respond(&self);
}

impl<F: Fn() + Send + Sync> SignalResponder for F {
    fn respond(&self) {
        self()
    }
}

/// Responds to an event with access to it
pub trait EventResponder: Send + Sync {
    fn respond_event(&self, event: &mut Event);
}

impl<F: Fn(&mut Event) + Send + Sync> EventResponder for F {
    fn respond_event(&self, event: &mut Event) {
        self(event)
    }
}

/// Handler kind, fixed when the descriptor is built
#[derive(Clone)]
pub enum Responder {
    Signal(Arc<dyn SignalResponder>),
    Event(Arc<dyn EventResponder>),
}

impl Responder {
    pub fn signal(responder: impl SignalResponder + 'static) -> Self {
        Self::Signal(Arc::new(responder))
    }

    pub fn event(responder: impl EventResponder + 'static) -> Self {
        Self::Event(Arc::new(responder))
    }

    /// Deliver an event
    pub fn invoke(&self, event: &mut Event) {
        match self {
            Self::Signal(signal) => signal.respond(),
            Self::Event(handler) => handler.respond_event(event),
        }
    }
}

impl fmt::Debug for Responder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Signal(_) => f.write_str("Responder::Signal"),
            Self::Event(_) => f.write_str("Responder::Event"),
        }
    }
}

/// Event binding stored on a node
#[derive(Debug, Clone)]
pub struct EventDescriptor {
    pub name: String,
    pub prevent_default: bool,
    pub stop_propagation: bool,
    pub responder: Responder,
}

impl EventDescriptor {
    pub fn new(name: impl Into<String>, responder: Responder) -> Self {
        Self {
            name: name.into(),
            prevent_default: false,
            stop_propagation: false,
            responder,
        }
    }

    pub fn with_prevent_default(mut self) -> Self {
        self.prevent_default = true;
        self
    }

    pub fn with_stop_propagation(mut self) -> Self {
        self.stop_propagation = true;
        self
    }

    /// Apply flags, then run the responder
    pub fn fire(&self, event: &mut Event) {
        if self.prevent_default {
            event.prevent_default();
        }
        if self.stop_propagation {
            event.stop_propagation();
        }
        self.responder.invoke(event);
    }
}

/// Event multimap: name -> descriptors in registration order
#[derive(Debug, Clone, Default)]
pub struct Events {
    map: IndexMap<String, Vec<EventDescriptor>>,
}

impl Events {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor under its name
    pub fn add(&mut self, descriptor: EventDescriptor) {
        self.map
            .entry(descriptor.name.clone())
            .or_default()
            .push(descriptor);
    }

    /// Descriptors bound to `name`
    pub fn get(&self, name: &str) -> &[EventDescriptor] {
        self.map.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Drop every descriptor bound to `name`
    pub fn remove(&mut self, name: &str) -> Vec<EventDescriptor> {
        self.map.shift_remove(name).unwrap_or_default()
    }

    /// Bound event names in first-registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }

    /// All descriptors, grouped by name
    pub fn iter(&self) -> impl Iterator<Item = &EventDescriptor> {
        self.map.values().flatten()
    }

    /// Number of descriptors
    pub fn len(&self) -> usize {
        self.map.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }
}

/// Subscription a node receives on behalf of an ancestor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delegate {
    pub event: String,
    pub listener: NodeId,
}
