//! Observable shared state

use crate::{Handler, Priority, Signal, SubscriberId};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

/// Payload delivered when an observed value changes
#[derive(Debug, Clone, PartialEq)]
pub struct StateChange<T> {
    pub old: T,
    pub new: T,
}

/// A readable value with change notifications
pub trait StateSource<T>: Send + Sync {
    /// Human readable name for diagnostics
    fn name(&self) -> &str;

    /// Current value
    fn current(&self) -> T;

    /// Subscribe to `(old, new)` change notifications
    fn subscribe(&self, handler: Handler<StateChange<T>>) -> SubscriberId;

    /// Unsubscribe. Returns false if the id was unknown.
    fn unsubscribe(&self, id: SubscriberId) -> bool;
}

struct StateInner<T> {
    name: String,
    value: RwLock<T>,
    signal: Mutex<Signal<StateChange<T>>>,
}

/// Shared value that notifies subscribers when it changes.
///
/// Cloning yields another handle to the same value. Handlers run
/// synchronously inside [`ObservableState::set`]; they may read the value but
/// must not subscribe, unsubscribe or set on the same source.
pub struct ObservableState<T> {
    inner: Arc<StateInner<T>>,
}

impl<T> Clone for ObservableState<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> ObservableState<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Create a new observable value
    pub fn new(name: impl Into<String>, initial: T) -> Self {
        Self {
            inner: Arc::new(StateInner {
                name: name.into(),
                value: RwLock::new(initial),
                signal: Mutex::new(Signal::new()),
            }),
        }
    }

    /// Name of this source
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Current value
    pub fn get(&self) -> T {
        self.inner.value.read().clone()
    }

    /// Replace the value. Subscribers are notified only when the value
    /// actually changes; returns whether it did.
    pub fn set(&self, value: T) -> bool {
        let old = {
            let mut current = self.inner.value.write();
            if *current == value {
                return false;
            }
            std::mem::replace(&mut *current, value.clone())
        };

        let change = StateChange { old, new: value };
        self.inner.signal.lock().emit(&change);
        true
    }

    /// Subscribe to changes
    pub fn on_change<F>(&self, handler: F) -> SubscriberId
    where
        F: Fn(&StateChange<T>) + Send + Sync + 'static,
    {
        self.inner.signal.lock().subscribe(handler)
    }

    /// Remove a subscription
    pub fn remove_subscriber(&self, id: SubscriberId) -> bool {
        self.inner.signal.lock().unsubscribe(id)
    }

    /// Number of active subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.inner.signal.lock().len()
    }

    /// Whether both handles point at the same value
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T> StateSource<T> for ObservableState<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.inner.name
    }

    fn current(&self) -> T {
        self.get()
    }

    fn subscribe(&self, handler: Handler<StateChange<T>>) -> SubscriberId {
        self.inner
            .signal
            .lock()
            .subscribe_boxed(handler, Priority::Normal)
    }

    fn unsubscribe(&self, id: SubscriberId) -> bool {
        self.remove_subscriber(id)
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for ObservableState<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObservableState")
            .field("name", &self.inner.name)
            .field("value", &*self.inner.value.read())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_notifies_old_and_new() {
        let state = ObservableState::new("door", 0u32);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();

        state.on_change(move |change: &StateChange<u32>| {
            seen_clone.lock().push((change.old, change.new));
        });

        assert!(state.set(1));
        assert!(state.set(5));

        assert_eq!(*seen.lock(), vec![(0, 1), (1, 5)]);
        assert_eq!(state.get(), 5);
    }

    #[test]
    fn test_set_same_value_is_silent() {
        let state = ObservableState::new("door", 3u32);
        let seen = Arc::new(Mutex::new(0u32));
        let seen_clone = seen.clone();

        state.on_change(move |_| *seen_clone.lock() += 1);

        assert!(!state.set(3));
        assert_eq!(*seen.lock(), 0);
    }

    #[test]
    fn test_handler_can_read_value() {
        let state = ObservableState::new("lamp", false);
        let reader = state.clone();
        let observed = Arc::new(Mutex::new(None));
        let observed_clone = observed.clone();

        state.on_change(move |_| *observed_clone.lock() = Some(reader.get()));
        state.set(true);

        assert_eq!(*observed.lock(), Some(true));
    }

    #[test]
    fn test_trait_subscribe_unsubscribe() {
        let state = ObservableState::new("lamp", 0i32);
        let source: &dyn StateSource<i32> = &state;

        let id = source.subscribe(Box::new(|_| {}));
        assert_eq!(state.subscriber_count(), 1);
        assert!(source.unsubscribe(id));
        assert_eq!(state.subscriber_count(), 0);
        assert_eq!(source.name(), "lamp");
    }

    #[test]
    fn test_clones_share_value() {
        let a = ObservableState::new("shared", 1u8);
        let b = a.clone();
        b.set(2);
        assert_eq!(a.get(), 2);
        assert!(a.ptr_eq(&b));
    }
}
