/// Subscription removal and registry introspection methods
use super::core::StructuredEvents;
use crate::path;
use crate::subscription::{scrub_list, Callback, ContextHandle};
use crate::tree::{Node, TreeEntry};
use tracing::debug;

impl StructuredEvents {
    /// Removes subscriptions selected by the filter arguments.
    ///
    /// The removal matrix:
    ///
    /// - no name, no callback, no context — clears the entire tree;
    /// - name only — deletes the whole subtree the path resolves to, so
    ///   former descendants of that namespace stop firing too;
    /// - name plus callback and/or context — scrubs matching subscriptions
    ///   from that exact node's list only, not its descendants;
    /// - callback and/or context without a name — scrubs matching
    ///   subscriptions from every list in the tree.
    ///
    /// The callback filter matches a subscription's stored callback or, for
    /// `once` registrations, the original the caller still holds. The context
    /// filter matches by token identity. An absent filter always matches.
    /// Emptied nodes are pruned afterwards, so re-registration starts from a
    /// clean path.
    pub fn off(
        &self,
        name: Option<&str>,
        callback: Option<&Callback>,
        context: Option<&ContextHandle>,
    ) -> &Self {
        let mut inner = self.inner.write();
        match name {
            None if callback.is_none() && context.is_none() => {
                inner.root = Node::default();
                debug!("🗑️ Cleared every subscription");
            }
            None => {
                inner.root.scrub_all(callback, context);
                inner.root.prune();
                debug!("🗑️ Scrubbed matching subscriptions from every namespace");
            }
            Some(name) => {
                let separator = inner.separator.clone();
                for single in path::expand(name) {
                    let segments = path::split(single, &separator);
                    if segments.is_empty() {
                        continue;
                    }
                    if callback.is_none() && context.is_none() {
                        if inner.root.remove_subtree(&segments) {
                            debug!("🗑️ Removed subtree at {}", single);
                        }
                    } else if let Some(node) = inner.root.get_mut(&segments) {
                        scrub_list(&mut node.subscribers, callback, context);
                        debug!("🗑️ Scrubbed matching subscriptions at {}", single);
                    }
                }
                inner.root.prune();
            }
        }
        self.recount(&inner);
        self
    }

    /// Deep removal of a namespace and everything under it.
    ///
    /// Without a name the whole tree is cleared. With a name, matching is by
    /// the bare terminal segment, not the full dotted path: `destroy("a.b")`
    /// removes any direct child key `"b"` anywhere in the tree, however
    /// deeply nested. This is deliberately preserved from the behavior this
    /// registry reimplements, despite being looser than `deep_trigger`'s
    /// full-path resolution. With a trailing `"*"` the matching node itself
    /// survives (its own subscribers keep firing) but all of its children are
    /// deleted.
    pub fn destroy(&self, name: Option<&str>) -> &Self {
        let mut inner = self.inner.write();
        match name {
            None => {
                inner.root = Node::default();
                debug!("🗑️ Destroyed every namespace");
            }
            Some(name) => {
                let separator = inner.separator.clone();
                for single in path::expand(name) {
                    let mut segments = path::split(single, &separator);
                    let wildcard = path::strip_wildcard(&mut segments);
                    let Some(target) = segments.last().cloned() else {
                        continue;
                    };
                    if wildcard {
                        // Keep nodes keyed by the target, drop their children.
                        inner.root.remap(
                            &mut |entry, parent| {
                                !(matches!(entry, TreeEntry::Child { .. })
                                    && parent == Some(target.as_str()))
                            },
                            None,
                        );
                    } else {
                        inner.root.remap(
                            &mut |entry, _parent| {
                                !matches!(&entry, TreeEntry::Child { name, .. }
                                    if *name == target.as_str())
                            },
                            None,
                        );
                    }
                    debug!("🗑️ Destroyed namespace {}", single);
                }
                inner.root.prune();
            }
        }
        self.recount(&inner);
        self
    }

    /// Checks whether subscribers are registered exactly at this path.
    pub fn has_subscriptions(&self, name: &str) -> bool {
        let inner = self.inner.read();
        let segments = path::split(name, &inner.separator);
        inner
            .root
            .get(&segments)
            .is_some_and(|node| !node.subscribers.is_empty())
    }

    /// Total live subscriptions across every namespace.
    pub fn subscription_count(&self) -> usize {
        self.inner.read().root.subscription_count()
    }

    /// Gets the separator-joined path of every node holding subscribers.
    pub fn registered_paths(&self) -> Vec<String> {
        let inner = self.inner.read();
        let mut out = Vec::new();
        inner.root.collect_paths(&inner.separator, "", &mut out);
        out
    }
}
