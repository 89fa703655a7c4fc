/// Event emission methods
use super::core::StructuredEvents;
use crate::dispatch::dispatch;
use crate::path;
use crate::subscription::{Args, SubscriberList};
use crate::EventError;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Reserved top-level channel that receives every trigger as a catch-all
/// broadcast, with the fired name prepended to the arguments.
pub const ALL_CHANNEL: &str = "all";

impl StructuredEvents {
    /// Fires the subscribers registered exactly at `name`.
    ///
    /// The name may carry several whitespace-separated paths; each fires
    /// independently with the same arguments. No wildcard expansion happens
    /// here: only the exact node's list runs, plus the reserved `"all"`
    /// channel, which receives `(name, args...)` for every trigger.
    ///
    /// Dispatch runs on a snapshot; a subscriber erroring aborts the rest of
    /// its list and propagates, and the `"all"` channel is not reached if the
    /// named list errored first.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use structured_events::{callback, StructuredEvents};
    /// use serde_json::json;
    ///
    /// let events = StructuredEvents::new();
    /// events.on("doc.save", callback(|args| {
    ///     println!("saving {:?}", args[0]);
    ///     Ok(())
    /// }));
    /// events.trigger("doc.save", &[json!("draft.md")])?;
    /// # Ok::<(), structured_events::EventError>(())
    /// ```
    pub fn trigger(&self, name: &str, args: &Args) -> Result<(), EventError> {
        for single in path::expand(name) {
            self.trigger_single(single, args)?;
        }
        Ok(())
    }

    /// Serializes an event struct and triggers it as a single argument.
    ///
    /// Convenience over [`StructuredEvents::trigger`] for typed payloads.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use structured_events::StructuredEvents;
    /// use serde::Serialize;
    ///
    /// #[derive(Serialize)]
    /// struct SaveEvent { path: String }
    ///
    /// let events = StructuredEvents::new();
    /// events.emit("doc.save", &SaveEvent { path: "draft.md".into() })?;
    /// # Ok::<(), structured_events::EventError>(())
    /// ```
    pub fn emit<T: Serialize>(&self, name: &str, event: &T) -> Result<(), EventError> {
        let value = serde_json::to_value(event)?;
        self.trigger(name, &[value])
    }

    /// Fires a whole namespace hierarchy.
    ///
    /// Resolves the node for `name` and dispatches its own subscriber list
    /// plus the list of every descendant node, each independently with the
    /// same arguments. A trailing `"*"` excludes the resolved node itself, so
    /// `deep_trigger("a.*")` fires `a.b` and `a.b.c` but not `a`. Ordering
    /// across the collected lists is unspecified beyond insertion order
    /// within each list. The `"all"` channel does not participate.
    pub fn deep_trigger(&self, name: &str, args: &Args) -> Result<(), EventError> {
        for single in path::expand(name) {
            self.deep_trigger_single(single, args)?;
        }
        Ok(())
    }

    fn trigger_single(&self, name: &str, args: &Args) -> Result<(), EventError> {
        // Snapshot the resolved lists, then dispatch outside the lock so
        // callbacks can reenter the registry.
        let (named, all) = {
            let inner = self.inner.read();
            let segments = path::split(name, &inner.separator);
            let named = inner
                .root
                .get(&segments)
                .map(|node| node.subscribers.clone())
                .filter(|list| !list.is_empty());
            let all = inner
                .root
                .children
                .get(ALL_CHANNEL)
                .map(|node| node.subscribers.clone())
                .filter(|list| !list.is_empty());
            (named, all)
        };
        if named.is_none() && all.is_none() {
            return Ok(());
        }

        self.stats.write().events_dispatched += 1;
        debug!(
            "📤 Triggering {} ({} named, {} catch-all subscriber(s))",
            name,
            named.as_ref().map_or(0, SubscriberList::len),
            all.as_ref().map_or(0, SubscriberList::len),
        );

        let result = (|| {
            if let Some(list) = &named {
                dispatch(list, args)?;
            }
            if let Some(list) = &all {
                let mut full = Vec::with_capacity(args.len() + 1);
                full.push(Value::String(name.to_string()));
                full.extend_from_slice(args);
                dispatch(list, &full)?;
            }
            Ok(())
        })();

        // Spent once registrations are removed even when a subscriber errored.
        self.sweep_spent(named.iter().chain(all.iter()));
        result
    }

    fn deep_trigger_single(&self, name: &str, args: &Args) -> Result<(), EventError> {
        let lists = {
            let inner = self.inner.read();
            let mut segments = path::split(name, &inner.separator);
            let wildcard = path::strip_wildcard(&mut segments);
            let mut lists = Vec::new();
            if let Some(node) = inner.root.get(&segments) {
                node.collect_lists(!wildcard, &mut lists);
            }
            lists
        };
        if lists.is_empty() {
            return Ok(());
        }

        self.stats.write().events_dispatched += 1;
        debug!("📤 Deep triggering {} across {} list(s)", name, lists.len());

        let result = lists.iter().try_for_each(|list| dispatch(list, args));
        self.sweep_spent(lists.iter());
        result
    }

    /// Removes once registrations whose guard fired during this dispatch.
    fn sweep_spent<'a>(&self, dispatched: impl IntoIterator<Item = &'a SubscriberList>) {
        let any_spent = dispatched
            .into_iter()
            .flat_map(|list| list.iter())
            .any(|subscription| subscription.is_spent());
        if !any_spent {
            return;
        }
        let mut inner = self.inner.write();
        inner.root.scrub_spent();
        inner.root.prune();
        self.recount(&inner);
    }
}
