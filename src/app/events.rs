//! Change notifications from the application state.
//!
//! Views register a listener and get called for every event; they
//! decide for themselves which events concern what they display.

use std::fmt;

/// Something changed in the application state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    ItemChanged { item_id: String },
    VaultChanged { vault_id: String },
    Lock,
    Unlock,
}

/// Handle returned by `EventHub::subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type Listener = Box<dyn FnMut(&AppEvent)>;

/// A list of listeners keyed by subscription id.
#[derive(Default)]
pub struct EventHub {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: Listener) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.listeners.push((id, listener));
        id
    }

    /// Remove a listener. Unknown ids are ignored.
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.listeners.retain(|(sub, _)| *sub != id);
    }

    pub fn emit(&mut self, event: &AppEvent) {
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl fmt::Debug for EventHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHub")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
