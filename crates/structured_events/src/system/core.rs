/// Core StructuredEvents registry definition and construction.
use super::stats::RegistryStats;
use crate::listeners::{Emitter, EmitterId};
use crate::subscription::ContextHandle;
use crate::tree::Node;
use compact_str::CompactString;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::{Arc, Weak};

/// Default path delimiter for event names.
pub const DEFAULT_SEPARATOR: &str = ".";

/// Tree and path configuration guarded by one coarse lock.
///
/// The separator lives with the tree so a lookup always parses names with the
/// same delimiter the tree was navigated with.
pub(crate) struct RegistryInner {
    pub root: Node,
    pub separator: CompactString,
}

/// A hierarchical publish/subscribe registry.
///
/// Event names are separator-delimited paths (`"user.profile.update"`)
/// resolved against a tree of subscriber lists. The registry is a standalone
/// capability: host objects own one by composition and delegate their
/// `on`/`off`/`trigger` surface to it.
///
/// # Thread Safety
///
/// The registry is `Send + Sync` and can be shared as `Arc<StructuredEvents>`.
/// All tree access goes through one coarse read-write lock; dispatch clones a
/// snapshot of the resolved subscriber lists and releases the lock before
/// invoking callbacks, so a callback may freely call back into the same
/// registry. A mutation made mid-dispatch becomes visible to the *next*
/// trigger, never to deliveries already in flight.
///
/// # Examples
///
/// ```rust
/// use structured_events::{callback, StructuredEvents};
/// use serde_json::json;
///
/// let events = StructuredEvents::new();
/// events.on("user.login", callback(|args| {
///     println!("logged in: {:?}", args);
///     Ok(())
/// }));
/// events.trigger("user.login", &[json!("alice")])?;
/// # Ok::<(), structured_events::EventError>(())
/// ```
pub struct StructuredEvents {
    /// Stable identity of this registry when tracked as an emitter.
    pub(crate) id: EmitterId,
    /// Namespace tree plus separator configuration.
    pub(crate) inner: RwLock<RegistryInner>,
    /// Emitters this registry is listening to, tracked weakly by identity.
    pub(crate) tracked: DashMap<EmitterId, Weak<dyn Emitter>>,
    /// Context token identifying this registry's own `listen_to` registrations.
    pub(crate) listener_context: ContextHandle,
    /// Registry statistics for monitoring.
    pub(crate) stats: RwLock<RegistryStats>,
}

impl std::fmt::Debug for StructuredEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("StructuredEvents")
            .field("id", &self.id)
            .field("separator", &inner.separator)
            .field("subscriptions", &inner.root.subscription_count())
            .field("tracked_emitters", &self.tracked.len())
            .finish()
    }
}

impl StructuredEvents {
    /// Creates an empty registry with the default `"."` separator.
    pub fn new() -> Self {
        Self::with_separator(DEFAULT_SEPARATOR)
    }

    /// Creates an empty registry with a custom path separator.
    ///
    /// An empty separator falls back to the default.
    pub fn with_separator(separator: &str) -> Self {
        let separator = if separator.is_empty() {
            DEFAULT_SEPARATOR
        } else {
            separator
        };
        let id = EmitterId::new();
        Self {
            id,
            inner: RwLock::new(RegistryInner {
                root: Node::default(),
                separator: CompactString::new(separator),
            }),
            tracked: DashMap::new(),
            listener_context: Arc::new(id),
            stats: RwLock::new(RegistryStats::default()),
        }
    }

    /// The stable identity of this registry as an emitter.
    pub fn id(&self) -> EmitterId {
        self.id
    }

    /// The path separator currently in effect.
    pub fn separator(&self) -> String {
        self.inner.read().separator.to_string()
    }

    /// Gets the current registry statistics.
    pub fn stats(&self) -> RegistryStats {
        self.stats.read().clone()
    }

    /// Re-derives the live subscription total after a mutation.
    pub(crate) fn recount(&self, inner: &RegistryInner) {
        self.stats.write().total_subscriptions = inner.root.subscription_count();
    }
}

impl Default for StructuredEvents {
    fn default() -> Self {
        Self::new()
    }
}
