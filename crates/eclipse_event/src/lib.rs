//! # eclipse_event - Observer Lists and Observable State
//!
//! Notification plumbing with explicit lifetimes:
//! - [`Signal`]: an observer list owned by the publisher, with priority
//!   ordering and explicit subscribe/unsubscribe
//! - [`EventChannel`]: a buffered queue drained by the host once per tick
//! - [`ObservableState`]: a shared value that notifies `(old, new)` on change
//!
//! Subscribers hold on to their [`SubscriberId`] and unsubscribe when they are
//! dropped. Nothing is cleaned up implicitly.

pub mod state;

use parking_lot::Mutex;
use std::collections::VecDeque;

pub use state::{ObservableState, StateChange, StateSource};

/// Delivery priority
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Low = 0,
    Normal = 1,
    High = 2,
    Critical = 3,
}

impl Default for Priority {
    fn default() -> Self {
        Self::Normal
    }
}

/// Subscriber ID
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(pub u64);

/// Event handler function type
pub type Handler<E> = Box<dyn Fn(&E) + Send + Sync>;

/// Observer list for a single event type
pub struct Signal<E> {
    handlers: Vec<(SubscriberId, Priority, Handler<E>)>,
    next_subscriber_id: u64,
}

impl<E> Signal<E> {
    /// Create an empty signal
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
            next_subscriber_id: 1,
        }
    }

    /// Subscribe with normal priority
    pub fn subscribe<F>(&mut self, handler: F) -> SubscriberId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.subscribe_with_priority(handler, Priority::Normal)
    }

    /// Subscribe with priority. Higher priorities are notified first; equal
    /// priorities keep subscription order.
    pub fn subscribe_with_priority<F>(&mut self, handler: F, priority: Priority) -> SubscriberId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.subscribe_boxed(Box::new(handler), priority)
    }

    /// Subscribe an already boxed handler
    pub fn subscribe_boxed(&mut self, handler: Handler<E>, priority: Priority) -> SubscriberId {
        let id = SubscriberId(self.next_subscriber_id);
        self.next_subscriber_id += 1;

        self.handlers.push((id, priority, handler));
        // Stable sort keeps registration order within a priority
        self.handlers.sort_by(|a, b| b.1.cmp(&a.1));

        id
    }

    /// Unsubscribe. Returns false if the id was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(sub_id, _, _)| *sub_id != id);
        self.handlers.len() != before
    }

    /// Notify every subscriber
    pub fn emit(&self, event: &E) {
        for (_, _, handler) in &self.handlers {
            handler(event);
        }
    }

    /// Number of subscribers
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Check if nobody is subscribed
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Remove all subscribers
    pub fn clear(&mut self) {
        self.handlers.clear();
    }
}

impl<E> Default for Signal<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for Signal<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("subscribers", &self.handlers.len())
            .finish()
    }
}

/// Buffered channel for single-type events
pub struct EventChannel<E> {
    queue: Mutex<VecDeque<E>>,
}

impl<E> EventChannel<E> {
    /// Create a new channel
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
        }
    }

    /// Send an event
    pub fn send(&self, event: E) {
        self.queue.lock().push_back(event);
    }

    /// Receive the oldest event
    pub fn receive(&self) -> Option<E> {
        self.queue.lock().pop_front()
    }

    /// Drain all events in send order
    pub fn drain(&self) -> Vec<E> {
        self.queue.lock().drain(..).collect()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }

    /// Get pending count
    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }
}

impl<E> Default for EventChannel<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Prelude
pub mod prelude {
    pub use crate::state::{ObservableState, StateChange, StateSource};
    pub use crate::{EventChannel, Handler, Priority, Signal, SubscriberId};
}
