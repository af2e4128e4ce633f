//! Synchronous publish/subscribe channel for world [`Event`] values.

use std::fmt;

use crate::Event;

/// Handle returned by [`EventBus::subscribe`] used to detach a listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u32);

type Listener<'a> = Box<dyn FnMut(&Event) + 'a>;

/// Listener registry that dispatches events in subscription order.
///
/// Dispatch is synchronous: every listener runs to completion before
/// [`EventBus::publish`] returns.
#[derive(Default)]
pub struct EventBus<'a> {
    listeners: Vec<(ListenerId, Listener<'a>)>,
    next_id: u32,
}

impl<'a> EventBus<'a> {
    /// Creates an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener` to receive every subsequently published event.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&Event) + 'a,
    {
        let id = ListenerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Detaches the listener registered under `id`.
    ///
    /// Returns `false` when no such listener exists.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Delivers `event` to every registered listener.
    pub fn publish(&mut self, event: &Event) {
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }

    /// Delivers each event of `events` in order.
    pub fn publish_all(&mut self, events: &[Event]) {
        for event in events {
            self.publish(event);
        }
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl fmt::Debug for EventBus<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}
