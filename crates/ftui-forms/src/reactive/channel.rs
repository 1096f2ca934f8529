#![forbid(unsafe_code)]

//! Single-value broadcast channel.
//!
//! [`Channel<T>`] holds the most recently pushed value and delivers every new
//! value to its subscribers synchronously, on the caller's stack.
//!
//! # Invariants
//!
//! 1. Subscribers are invoked in registration order.
//! 2. `subscribe()` never replays the current value.
//! 3. A push delivers to a snapshot of the subscriber list taken before the
//!    first callback runs: subscribers added during delivery wait for the
//!    next push.
//! 4. A subscriber whose [`Subscription`] is dropped during delivery is not
//!    invoked for the remainder of that delivery.
//! 5. No internal borrow is held while callbacks run, so callbacks may push,
//!    subscribe, or unsubscribe re-entrantly.
//!
//! # Failure Modes
//!
//! - Callback panic: propagates to the caller of `push()`. Callbacks later
//!   in the snapshot are skipped for that push; the channel stays usable.
//! - Subscription dropped immediately (`let _ = ch.subscribe(..)`): the
//!   callback is never invoked.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

type Callback<T> = dyn Fn(&T);

struct ChannelInner<T> {
    current: Option<Rc<T>>,
    version: u64,
    subscribers: Vec<Weak<Callback<T>>>,
}

/// Shared broadcast channel. Clones share the same subscriber list.
pub struct Channel<T> {
    inner: Rc<RefCell<ChannelInner<T>>>,
}

impl<T> Clone for Channel<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: 'static> Default for Channel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Channel<T> {
    /// Create a channel with no current value.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(ChannelInner {
                current: None,
                version: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Create a channel seeded with `value`. Seeding does not count as a push.
    #[must_use]
    pub fn with_value(value: T) -> Self {
        let channel = Self::new();
        channel.inner.borrow_mut().current = Some(Rc::new(value));
        channel
    }

    /// Most recently pushed (or seeded) value.
    #[must_use]
    pub fn current(&self) -> Option<T>
    where
        T: Clone,
    {
        self.inner.borrow().current.as_deref().cloned()
    }

    /// Number of pushes so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .borrow()
            .subscribers
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
    }

    /// Register `callback`. It stays registered while the returned
    /// [`Subscription`] is alive.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let callback: Rc<Callback<T>> = Rc::new(callback);
        let mut inner = self.inner.borrow_mut();
        inner.subscribers.retain(|w| w.strong_count() > 0);
        inner.subscribers.push(Rc::downgrade(&callback));
        Subscription {
            guard: Some(Box::new(callback)),
        }
    }

    /// Store `value` as current and deliver it to every subscriber.
    pub fn push(&self, value: T) {
        let value = Rc::new(value);
        let snapshot = {
            let mut inner = self.inner.borrow_mut();
            inner.current = Some(Rc::clone(&value));
            inner.version += 1;
            inner.subscribers.retain(|w| w.strong_count() > 0);
            inner.subscribers.clone()
        };
        for weak in snapshot {
            if let Some(callback) = weak.upgrade() {
                callback(&value);
            }
        }
    }
}

impl<T> fmt::Debug for Channel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(inner) => f
                .debug_struct("Channel")
                .field("version", &inner.version)
                .field("subscribers", &inner.subscribers.len())
                .finish(),
            Err(_) => f.debug_struct("Channel").finish_non_exhaustive(),
        }
    }
}

/// RAII handle for a channel subscriber. Dropping it unsubscribes.
#[must_use = "dropping the subscription unsubscribes immediately"]
pub struct Subscription {
    guard: Option<Box<dyn Any>>,
}

impl Subscription {
    /// Unsubscribe now. Equivalent to dropping the handle.
    pub fn unsubscribe(mut self) {
        self.guard.take();
    }

    /// Whether the callback is still registered.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.guard.is_some()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
