//! The namespace tree: nested nodes addressed by path segments.
//!
//! Each node owns its children by segment name plus its own subscriber list,
//! as a discriminated struct rather than a magic reserved key, so a segment
//! name can never collide with the node's own data. Every node is reachable
//! from the root by exactly one path; an empty subscriber list stands in for
//! an absent one, and pruning removes nodes that hold neither subscribers nor
//! children, so an empty node is observationally equivalent to a missing one.

use crate::path::Segments;
use crate::subscription::{scrub_list, Callback, ContextHandle, SubscriberList};
use compact_str::CompactString;
use std::collections::HashMap;

/// One vertex of the namespace tree.
#[derive(Default)]
pub(crate) struct Node {
    /// Child nodes keyed by segment name.
    pub children: HashMap<CompactString, Node>,
    /// Subscribers registered exactly at this node.
    pub subscribers: SubscriberList,
}

/// An entry visited by [`Node::remap`]: either a node's own subscriber list
/// or one of its named children.
pub(crate) enum TreeEntry<'a> {
    Subscribers { list: &'a mut SubscriberList },
    Child { name: &'a str, node: &'a mut Node },
}

impl Node {
    /// Walks the path from this node, creating missing segments, and returns
    /// the terminal node.
    pub fn get_or_create(&mut self, segments: &[CompactString]) -> &mut Node {
        let mut node = self;
        for segment in segments {
            node = node.children.entry(segment.clone()).or_default();
        }
        node
    }

    /// Walks the path from this node, returning `None` the moment any
    /// segment is missing.
    pub fn get(&self, segments: &[CompactString]) -> Option<&Node> {
        let mut node = self;
        for segment in segments {
            node = node.children.get(segment.as_str())?;
        }
        Some(node)
    }

    /// Mutable counterpart of [`Node::get`].
    pub fn get_mut(&mut self, segments: &[CompactString]) -> Option<&mut Node> {
        let mut node = self;
        for segment in segments {
            node = node.children.get_mut(segment.as_str())?;
        }
        Some(node)
    }

    /// Removes the node at the full path, together with its whole subtree.
    ///
    /// Returns `true` if a node was removed. An empty path removes nothing;
    /// clearing the entire tree is the caller's decision, not a path removal.
    pub fn remove_subtree(&mut self, segments: &Segments) -> bool {
        let Some((last, prefix)) = segments.split_last() else {
            return false;
        };
        match self.get_mut(prefix) {
            Some(parent) => parent.children.remove(last.as_str()).is_some(),
            None => false,
        }
    }

    /// Generic filtered rebuild over this subtree.
    ///
    /// Visits the node's own subscriber list (when non-empty) and then each
    /// child entry, handing the filter the entry plus the key of the node
    /// being visited (`parent_key`, `None` at the root). Returning `false`
    /// drops the entry: a dropped subscriber entry empties the list, a
    /// dropped child entry deletes that whole subtree. Kept children are
    /// rebuilt recursively. The filter may also mutate a subscriber list in
    /// place and keep it, which is how selective scrubbing works.
    ///
    /// Iteration order over a node's entries is unspecified; only subscriber
    /// list order is meaningful, and `remap` never reorders a kept list.
    pub fn remap<F>(&mut self, filter: &mut F, parent_key: Option<&str>)
    where
        F: FnMut(TreeEntry<'_>, Option<&str>) -> bool,
    {
        if !self.subscribers.is_empty() {
            let entry = TreeEntry::Subscribers {
                list: &mut self.subscribers,
            };
            if !filter(entry, parent_key) {
                self.subscribers.clear();
            }
        }
        self.children.retain(|name, child| {
            let keep = filter(
                TreeEntry::Child {
                    name: name.as_str(),
                    node: child,
                },
                parent_key,
            );
            if keep {
                child.remap(&mut *filter, Some(name.as_str()));
            }
            keep
        });
    }

    /// Scrubs matching subscriptions from every list in this subtree.
    pub fn scrub_all(&mut self, callback: Option<&Callback>, context: Option<&ContextHandle>) {
        self.remap(
            &mut |entry, _parent| {
                if let TreeEntry::Subscribers { list } = entry {
                    scrub_list(list, callback, context);
                }
                true
            },
            None,
        );
    }

    /// Removes spent `once` subscriptions everywhere in this subtree.
    pub fn scrub_spent(&mut self) {
        self.remap(
            &mut |entry, _parent| {
                if let TreeEntry::Subscribers { list } = entry {
                    list.retain(|subscription| !subscription.is_spent());
                }
                true
            },
            None,
        );
    }

    /// Drops every child that ends up with no subscribers and no children.
    ///
    /// Bottom-up, so a chain emptied at its leaf collapses in one pass.
    pub fn prune(&mut self) {
        self.children.retain(|_, child| {
            child.prune();
            !child.is_empty()
        });
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty() && self.subscribers.is_empty()
    }

    /// Total live subscriptions in this subtree.
    pub fn subscription_count(&self) -> usize {
        self.subscribers.len()
            + self
                .children
                .values()
                .map(Node::subscription_count)
                .sum::<usize>()
    }

    /// Clones the subscriber lists of this subtree into `out` as a dispatch
    /// snapshot: this node's own list first (when included), then every
    /// descendant list.
    pub fn collect_lists(&self, include_self: bool, out: &mut Vec<SubscriberList>) {
        if include_self && !self.subscribers.is_empty() {
            out.push(self.subscribers.clone());
        }
        for child in self.children.values() {
            child.collect_lists(true, out);
        }
    }

    /// Collects the separator-joined path of every node holding subscribers.
    pub fn collect_paths(&self, separator: &str, prefix: &str, out: &mut Vec<String>) {
        for (name, child) in &self.children {
            let path = if prefix.is_empty() {
                name.to_string()
            } else {
                format!("{prefix}{separator}{name}")
            };
            if !child.subscribers.is_empty() {
                out.push(path.clone());
            }
            child.collect_paths(separator, &path, out);
        }
    }
}
