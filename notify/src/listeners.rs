//! Callback registries with scoped subscriptions.
//!
//! `subscribe` hands back a [`Subscription`]; dropping it removes the
//! callback. Callbacks run outside the map's shard locks, so a callback may
//! subscribe or drop subscriptions itself.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// A set of callbacks for events of type `T`.
pub struct Listeners<T> {
    next_id: AtomicU64,
    callbacks: Arc<DashMap<u64, Callback<T>>>,
}

impl<T: 'static> Listeners<T> {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(0),
            callbacks: Arc::new(DashMap::new()),
        }
    }

    /// Register a callback. It stays registered until the returned
    /// subscription is dropped or the registry itself goes away.
    pub fn subscribe(&self, callback: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.callbacks.insert(id, Arc::new(callback));

        let callbacks = Arc::downgrade(&self.callbacks);
        Subscription {
            dispose: Some(Box::new(move || {
                if let Some(callbacks) = callbacks.upgrade() {
                    callbacks.remove(&id);
                }
            })),
        }
    }

    /// Invoke every callback in subscription order.
    pub fn emit(&self, event: &T) {
        let mut snapshot: Vec<(u64, Callback<T>)> = self
            .callbacks
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        snapshot.sort_by_key(|(id, _)| *id);

        for (_, callback) in snapshot {
            callback(event);
        }
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl<T: 'static> Default for Listeners<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle that keeps a callback registered. Drop it to unsubscribe.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    dispose: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Unsubscribe now. Same as dropping, but reads better at call sites.
    pub fn unsubscribe(mut self) {
        self.dispose_now();
    }

    fn dispose_now(&mut self) {
        if let Some(dispose) = self.dispose.take() {
            dispose();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.dispose_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.dispose.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn emits_in_subscription_order() {
        let listeners = Listeners::<u32>::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let a = {
            let seen = seen.clone();
            listeners.subscribe(move |v| seen.lock().unwrap().push(("a", *v)))
        };
        let b = {
            let seen = seen.clone();
            listeners.subscribe(move |v| seen.lock().unwrap().push(("b", *v)))
        };

        listeners.emit(&7);
        assert_eq!(*seen.lock().unwrap(), vec![("a", 7), ("b", 7)]);
        drop((a, b));
    }

    #[test]
    fn drop_unsubscribes() {
        let listeners = Listeners::<()>::new();
        let sub = listeners.subscribe(|_| {});
        assert_eq!(listeners.len(), 1);
        drop(sub);
        assert!(listeners.is_empty());
    }

    #[test]
    fn explicit_unsubscribe() {
        let listeners = Listeners::<()>::new();
        let sub = listeners.subscribe(|_| {});
        sub.unsubscribe();
        assert!(listeners.is_empty());
    }

    #[test]
    fn subscription_outliving_registry_is_harmless() {
        let listeners = Listeners::<()>::new();
        let sub = listeners.subscribe(|_| {});
        drop(listeners);
        drop(sub);
    }
}
