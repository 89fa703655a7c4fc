//! Subscription records and the callback/context handle types.
//!
//! Callbacks and contexts are held behind `Arc` so that a registration can be
//! matched again later by pointer identity — the same role function-reference
//! equality plays in conventional emitter APIs. Cloning a handle preserves its
//! identity, so the one handle can be registered under several names and
//! removed from all of them with a single `off`.

use crate::EventError;
use serde_json::Value;
use smallvec::SmallVec;
use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Positional arguments delivered to every subscriber of a dispatch.
pub type Args = [Value];

/// A subscriber callback.
///
/// Returning `Err` aborts delivery to the remaining subscribers of the same
/// list and propagates out of the triggering call.
pub type Callback = Arc<dyn Fn(&Args) -> Result<(), EventError> + Send + Sync>;

/// An opaque context token attached to a subscription.
///
/// Contexts are matched by pointer identity only; they exist so a group of
/// subscriptions can be removed together (`off` by context, `stop_listening`).
pub type ContextHandle = Arc<dyn Any + Send + Sync>;

/// Wraps a closure into a reusable [`Callback`] handle.
///
/// # Examples
///
/// ```rust
/// use structured_events::{callback, StructuredEvents};
///
/// let events = StructuredEvents::new();
/// let log = callback(|args| {
///     println!("fired with {} args", args.len());
///     Ok(())
/// });
/// events.on("user.login", log.clone());
/// events.off(Some("user.login"), Some(&log), None);
/// ```
pub fn callback<F>(f: F) -> Callback
where
    F: Fn(&Args) -> Result<(), EventError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wraps a value into a [`ContextHandle`] token.
pub fn context<T: Any + Send + Sync>(value: T) -> ContextHandle {
    Arc::new(value)
}

/// One registered subscriber at one namespace node.
#[derive(Clone)]
pub(crate) struct Subscription {
    /// What dispatch invokes. For `once` registrations this is the guard
    /// wrapper, not the user's function.
    pub callback: Callback,
    /// The unwrapped user callback of a `once` registration, kept so `off`
    /// can match either the wrapper or the function the caller still holds.
    pub origin: Option<Callback>,
    /// Identity token for selective removal.
    pub context: Option<ContextHandle>,
    /// Run-once guard of a `once` registration. Set by the wrapper on first
    /// invocation; a set guard marks the subscription as spent.
    pub fired: Option<Arc<AtomicBool>>,
}

/// An ordered subscriber list owned by one tree node. Insertion order is
/// dispatch order.
pub(crate) type SubscriberList = SmallVec<[Subscription; 4]>;

impl Subscription {
    /// Plain subscription created by `on`.
    pub fn new(callback: Callback, context: Option<ContextHandle>) -> Self {
        Self {
            callback,
            origin: None,
            context,
            fired: None,
        }
    }

    /// Whether this subscription is selected by an `off` filter.
    ///
    /// An absent filter argument always matches. The callback filter matches
    /// the stored callback or, for `once` registrations, the stored original.
    pub fn matches(&self, callback: Option<&Callback>, context: Option<&ContextHandle>) -> bool {
        let callback_matches = match callback {
            None => true,
            Some(filter) => {
                Arc::ptr_eq(filter, &self.callback)
                    || self
                        .origin
                        .as_ref()
                        .is_some_and(|origin| Arc::ptr_eq(filter, origin))
            }
        };
        let context_matches = match context {
            None => true,
            Some(filter) => self
                .context
                .as_ref()
                .is_some_and(|held| Arc::ptr_eq(filter, held)),
        };
        callback_matches && context_matches
    }

    /// Whether a `once` registration has already fired.
    pub fn is_spent(&self) -> bool {
        self.fired
            .as_ref()
            .is_some_and(|guard| guard.load(Ordering::SeqCst))
    }
}

/// Removes every subscription selected by the filter, preserving the order of
/// the survivors.
pub(crate) fn scrub_list(
    list: &mut SubscriberList,
    callback: Option<&Callback>,
    context: Option<&ContextHandle>,
) {
    list.retain(|subscription| !subscription.matches(callback, context));
}
