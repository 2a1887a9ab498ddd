//! A value holder that notifies registered listeners on every change.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Handle returned by [`Observable::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// A mutable slot with change listeners.
///
/// Listeners run on the thread that calls [`Observable::set`], after the new
/// value is in place and outside any internal lock, so a listener may read
/// the slot again.
pub struct Observable<T> {
    value: Mutex<T>,
    listeners: Mutex<Vec<(ListenerId, Listener<T>)>>,
    next_id: AtomicU64,
}

impl<T: std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observable")
            .field("value", &*lock(&self.value))
            .field("listeners", &lock(&self.listeners).len())
            .finish()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<T: Clone> Observable<T> {
    /// Creates a slot holding `initial`.
    pub fn new(initial: T) -> Self {
        Self {
            value: Mutex::new(initial),
            listeners: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// The current value.
    pub fn get(&self) -> T {
        lock(&self.value).clone()
    }

    /// Replaces the value and notifies every listener.
    pub fn set(&self, value: T) {
        *lock(&self.value) = value.clone();
        self.notify(&value);
    }

    /// Applies `change` to the value in place and notifies every listener.
    pub fn update(&self, change: impl FnOnce(&mut T)) {
        let value = {
            let mut guard = lock(&self.value);
            change(&mut guard);
            guard.clone()
        };
        self.notify(&value);
    }

    /// Registers `listener` for future changes.
    pub fn subscribe(&self, listener: impl Fn(&T) + Send + Sync + 'static) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        lock(&self.listeners).push((id, Arc::new(listener)));
        id
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = lock(&self.listeners);
        let before = listeners.len();
        listeners.retain(|(registered, _)| *registered != id);
        listeners.len() != before
    }

    fn notify(&self, value: &T) {
        let listeners: Vec<Listener<T>> = lock(&self.listeners)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener(value);
        }
    }
}

impl<T: Clone + Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::Observable;

    #[test]
    fn test_set_notifies_listeners_with_new_value() {
        let slot = Observable::new(0);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        slot.subscribe(move |v: &i32| sink.lock().unwrap().push(*v));

        slot.set(1);
        slot.update(|v| *v += 10);

        assert_eq!(*seen.lock().unwrap(), vec![1, 11]);
        assert_eq!(slot.get(), 11);
    }

    #[test]
    fn test_unsubscribed_listener_is_not_called() {
        let slot = Observable::new(String::new());
        let calls = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&calls);
        let id = slot.subscribe(move |_| *counter.lock().unwrap() += 1);

        assert!(slot.unsubscribe(id));
        assert!(!slot.unsubscribe(id));
        slot.set("changed".to_owned());

        assert_eq!(*calls.lock().unwrap(), 0);
    }

    #[test]
    fn test_listener_may_read_the_slot() {
        let slot = Arc::new(Observable::new(false));
        let reader = Arc::clone(&slot);
        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);
        slot.subscribe(move |_| *sink.lock().unwrap() = Some(reader.get()));

        slot.set(true);

        assert_eq!(*seen.lock().unwrap(), Some(true));
    }
}
