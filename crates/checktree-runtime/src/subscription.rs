#![forbid(unsafe_code)]

//! Change subscribers for the checked collection.
//!
//! Subscribers are stored as weak references; the caller holds the strong
//! side inside a [`Subscription`] guard. Dropping the guard detaches the
//! callback, and dead entries are pruned on the next notification.
//!
//! Callbacks only ever see a settled collection: the engine calls
//! [`Subscribers::notify`] after reconciliation has finished, never from
//! inside a pass.
//!
//! # Invariants
//!
//! 1. Live subscribers are notified in registration order.
//! 2. A dropped guard's callback is never invoked afterwards.
//! 3. Callbacks attached with [`Subscribers::attach`] live as long as the
//!    owning engine.

use std::rc::{Rc, Weak};

use tracing::debug;

type CallbackRc<T> = Rc<dyn Fn(&[T])>;
type CallbackWeak<T> = Weak<dyn Fn(&[T])>;

/// Registered change callbacks.
pub(crate) struct Subscribers<T> {
    subscribers: Vec<CallbackWeak<T>>,
    /// Strong refs for callbacks owned by the engine itself.
    owned: Vec<CallbackRc<T>>,
}

impl<T> Default for Subscribers<T> {
    fn default() -> Self {
        Self {
            subscribers: Vec::new(),
            owned: Vec::new(),
        }
    }
}

impl<T: 'static> Subscribers<T> {
    /// Register a callback detached when the returned guard drops.
    pub(crate) fn subscribe(&mut self, callback: impl Fn(&[T]) + 'static) -> Subscription {
        let strong: CallbackRc<T> = Rc::new(callback);
        self.subscribers.push(Rc::downgrade(&strong));
        Subscription {
            _guard: Box::new(strong),
        }
    }

    /// Register a callback that lives as long as `self`.
    pub(crate) fn attach(&mut self, callback: CallbackRc<T>) {
        self.subscribers.push(Rc::downgrade(&callback));
        self.owned.push(callback);
    }
}

impl<T> Subscribers<T> {
    /// Call every live subscriber with `items`, pruning dead ones.
    pub(crate) fn notify(&mut self, items: &[T]) {
        self.subscribers.retain(|w| w.strong_count() > 0);
        let callbacks: Vec<CallbackRc<T>> =
            self.subscribers.iter().filter_map(Weak::upgrade).collect();
        if callbacks.is_empty() {
            return;
        }

        debug!(
            subscribers = callbacks.len() as u64,
            checked = items.len() as u64,
            "checkbox tree change notified"
        );
        for callback in &callbacks {
            callback(items);
        }
    }

    /// Registered subscribers, including dead ones not yet pruned.
    pub(crate) fn len(&self) -> usize {
        self.subscribers.len()
    }
}

/// RAII guard for a change subscriber.
///
/// Dropping the `Subscription` drops the only strong reference to the
/// callback, so the engine's weak entry fails to upgrade from then on.
#[must_use = "dropping the subscription immediately detaches the callback"]
pub struct Subscription {
    _guard: Box<dyn std::any::Any>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
