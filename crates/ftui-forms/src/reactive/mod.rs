#![forbid(unsafe_code)]

//! Reactive plumbing under the form model.
//!
//! - [`Channel`]: a single-value broadcast channel with synchronous,
//!   snapshot-ordered delivery. Every control owns one for its events.
//! - [`Subscription`]: RAII guard that unsubscribes on drop.
//! - [`Binding`]: lazily evaluated display value derived from a control.
//! - [`SubscriptionScope`]: releases a widget's subscriptions together.
//!
//! # Architecture
//!
//! `Channel<T>` uses `Rc<RefCell<..>>` for single-threaded shared ownership.
//! Subscribers are stored as `Weak` function pointers; the `Subscription`
//! holds the only strong reference, so dropping it is enough to detach.
//! Dead entries are pruned lazily on the next subscribe or push.

pub mod binding;
pub mod channel;

pub use binding::{
    Binding, SubscriptionScope, bind_control, bind_error, bind_mapped, bind_value,
};
pub use channel::{Channel, Subscription};
