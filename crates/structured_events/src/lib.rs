//! # Structured Events
//!
//! A hierarchical publish/subscribe registry for namespaced events. Event
//! names are separator-delimited paths (`"user.profile.update"`) resolved
//! against a tree of subscriber lists, which buys capabilities a flat event
//! map cannot express:
//!
//! - **Namespace subtrees**: `deep_trigger("user")` fires `user`,
//!   `user.profile`, and everything below; `deep_trigger("user.*")` fires the
//!   descendants but not `user` itself.
//! - **Bulk destruction**: `destroy` deletes whole namespace subtrees;
//!   `destroy("user.*")` clears a namespace while the node's own subscribers
//!   survive.
//! - **Selective unsubscription**: `off` filters by name, callback identity,
//!   context token, or any combination.
//! - **Catch-all channel**: subscribers on the reserved `"all"` channel
//!   receive every trigger, with the fired name as their first argument.
//! - **Listener tracking**: `listen_to`/`stop_listening` record which foreign
//!   emitters an object subscribed to, enabling one-call detachment.
//!
//! ## Design
//!
//! The registry is a standalone capability, not a mixin: host objects own a
//! [`StructuredEvents`] (usually inside an `Arc`) and delegate their event
//! surface to it. Dispatch is synchronous and runs on a snapshot of the
//! resolved subscriber lists, so callbacks may reenter the registry freely;
//! mutations made mid-dispatch take effect from the next trigger. A callback
//! returning `Err` aborts delivery to the rest of its list and propagates to
//! the trigger caller — subscriber failures are never swallowed.
//!
//! Callbacks and context tokens are matched by `Arc` pointer identity: clone
//! the handle returned by [`callback`] and the one registration can be
//! removed from every namespace with a single `off`.
//!
//! ## Quick Start Example
//!
//! ```rust
//! use structured_events::{callback, create_structured_events, EventError};
//! use serde_json::json;
//!
//! fn main() -> Result<(), EventError> {
//!     let events = create_structured_events();
//!
//!     events.on("user.profile.update", callback(|args| {
//!         println!("profile updated: {:?}", args);
//!         Ok(())
//!     }));
//!
//!     // Catch-all audit channel sees every trigger, name first.
//!     events.on("all", callback(|args| {
//!         println!("audit: {:?}", args);
//!         Ok(())
//!     }));
//!
//!     events.trigger("user.profile.update", &[json!({"id": 7})])?;
//!
//!     // Fire the whole "user" namespace at once.
//!     events.deep_trigger("user", &[json!("sweep")])?;
//!
//!     // Tear the namespace down; the tree prunes itself.
//!     events.destroy(Some("user"));
//!     Ok(())
//! }
//! ```

mod dispatch;
mod listeners;
mod path;
mod subscription;
mod system;
mod tree;

#[cfg(test)]
mod system_tests;

pub use listeners::{Emitter, EmitterId};
pub use subscription::{callback, context, Args, Callback, ContextHandle};
pub use system::{RegistryStats, StructuredEvents, ALL_CHANNEL, DEFAULT_SEPARATOR};

use std::sync::Arc;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during registry operations.
///
/// Misuse — unknown names, absent subscribers, empty trees — is not an
/// error; those cases degrade to silent no-ops so the chainable surface
/// stays ergonomic. Errors come from payload serialization or from the
/// subscribers themselves.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    /// Serializing an event payload for `emit` failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// A subscriber callback failed during dispatch
    #[error("Handler execution error: {0}")]
    HandlerExecution(String),
}

// ============================================================================
// Factory Functions
// ============================================================================

/// Creates a new shared registry instance.
///
/// This is the primary factory function. It returns an
/// `Arc<StructuredEvents>` that can be shared across threads, handed to
/// callbacks for reentrant use, and tracked by other registries via
/// [`StructuredEvents::listen_to`].
///
/// # Examples
///
/// ```rust
/// use structured_events::{callback, create_structured_events};
///
/// let events = create_structured_events();
/// events.on("ready", callback(|_| Ok(())));
/// events.trigger("ready", &[]).unwrap();
/// ```
pub fn create_structured_events() -> Arc<StructuredEvents> {
    Arc::new(StructuredEvents::new())
}
