/// Subscription registration methods
use super::core::StructuredEvents;
use crate::path;
use crate::subscription::{Callback, ContextHandle, Subscription};
use compact_str::CompactString;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

impl StructuredEvents {
    /// Subscribes a callback to one or more event names.
    ///
    /// The name may carry several whitespace-separated paths; each expands to
    /// its own registration. Registering on the reserved `"all"` channel
    /// subscribes to every trigger on this registry. An empty name is a
    /// silent no-op.
    ///
    /// # Arguments
    ///
    /// * `name` - Path(s) such as `"user.login"` or `"change blur"`
    /// * `callback` - Handle created with [`crate::callback`]
    ///
    /// # Examples
    ///
    /// ```rust
    /// use structured_events::{callback, StructuredEvents};
    ///
    /// let events = StructuredEvents::new();
    /// events.on("doc.save doc.load", callback(|_| Ok(())));
    /// ```
    pub fn on(&self, name: &str, callback: Callback) -> &Self {
        self.on_with_context(name, callback, None)
    }

    /// Subscribes a callback together with a context token.
    ///
    /// The context does not change how the callback runs; it tags the
    /// subscription so it can later be removed selectively with
    /// [`StructuredEvents::off`] by context.
    pub fn on_with_context(
        &self,
        name: &str,
        callback: Callback,
        context: Option<ContextHandle>,
    ) -> &Self {
        let mut inner = self.inner.write();
        let separator = inner.separator.clone();
        let mut registered = 0usize;
        for single in path::expand(name) {
            let segments = path::split(single, &separator);
            if segments.is_empty() {
                continue;
            }
            inner
                .root
                .get_or_create(&segments)
                .subscribers
                .push(Subscription::new(callback.clone(), context.clone()));
            registered += 1;
            debug!("📝 Subscribed to {}", single);
        }
        if registered > 0 {
            self.recount(&inner);
        }
        self
    }

    /// Subscribes a callback that fires at most once per registered name.
    ///
    /// The registration removes itself on its first invocation. A run-once
    /// guard independent of that removal means even a reentrant trigger fired
    /// from inside the callback cannot invoke it a second time. `off` with
    /// the original callback still matches the registration.
    pub fn once(&self, name: &str, callback: Callback) -> &Self {
        self.once_with_context(name, callback, None)
    }

    /// Context-tagged variant of [`StructuredEvents::once`].
    pub fn once_with_context(
        &self,
        name: &str,
        callback: Callback,
        context: Option<ContextHandle>,
    ) -> &Self {
        let mut inner = self.inner.write();
        let separator = inner.separator.clone();
        let mut registered = 0usize;
        for single in path::expand(name) {
            let segments = path::split(single, &separator);
            if segments.is_empty() {
                continue;
            }
            // Each expanded name gets its own guard, so "a b" fires once per
            // name, not once overall.
            let fired = Arc::new(AtomicBool::new(false));
            let guard = fired.clone();
            let origin = callback.clone();
            let wrapper: Callback = Arc::new(move |args| {
                if guard.swap(true, Ordering::SeqCst) {
                    return Ok(());
                }
                (origin)(args)
            });
            inner.root.get_or_create(&segments).subscribers.push(Subscription {
                callback: wrapper,
                origin: Some(callback.clone()),
                context: context.clone(),
                fired: Some(fired),
            });
            registered += 1;
            debug!("📝 Subscribed once to {}", single);
        }
        if registered > 0 {
            self.recount(&inner);
        }
        self
    }

    /// Subscribes a whole event map: each `(name, callback)` pair expands to
    /// its own [`StructuredEvents::on_with_context`] call under the one
    /// shared context.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use structured_events::{callback, StructuredEvents};
    ///
    /// let events = StructuredEvents::new();
    /// events.on_map(
    ///     [
    ///         ("doc.save", callback(|_| Ok(()))),
    ///         ("doc.load", callback(|_| Ok(()))),
    ///     ],
    ///     None,
    /// );
    /// ```
    pub fn on_map<S, I>(&self, map: I, context: Option<ContextHandle>) -> &Self
    where
        S: AsRef<str>,
        I: IntoIterator<Item = (S, Callback)>,
    {
        for (name, callback) in map {
            self.on_with_context(name.as_ref(), callback, context.clone());
        }
        self
    }

    /// Changes the path separator used by all subsequent name parsing on this
    /// registry.
    ///
    /// Existing tree keys are not rewritten: a path registered under the old
    /// separator stays addressable only by names that still split to the same
    /// segments. An empty separator is ignored and keeps the current one.
    pub fn set_separator(&self, separator: &str) -> &Self {
        if !separator.is_empty() {
            self.inner.write().separator = CompactString::new(separator);
            debug!("🔧 Separator set to {:?}", separator);
        }
        self
    }
}
