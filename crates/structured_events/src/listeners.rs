//! Inversion-of-control listener tracking.
//!
//! `listen_to` tells a registry to subscribe to an event on another emitter
//! while keeping a record of that emitter, so `stop_listening` can later
//! detach from one or all of them at once. Tracking is by stable identity and
//! holds only weak references: it records interest, not lifetime, and never
//! keeps an emitter alive.
//!
//! Every `listen_to` registration carries the listening registry's own
//! context token, which is what lets `stop_listening` remove exactly the
//! subscriptions this registry created on the remote emitter and no others.

use crate::subscription::{Callback, ContextHandle};
use crate::StructuredEvents;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Weak};
use tracing::debug;
use uuid::Uuid;

/// Stable identity of an emitter for listener tracking.
///
/// A wrapper around UUID that keeps emitter identities from being confused
/// with other kinds of IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmitterId(pub Uuid);

impl EmitterId {
    /// Creates a new random emitter ID using UUID v4.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EmitterId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EmitterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The seam `listen_to` needs from a foreign emitter: identity plus the
/// conventional subscribe/unsubscribe pair.
///
/// [`StructuredEvents`] implements this by delegating to its own
/// registration surface; any host type owning a registry can do the same.
pub trait Emitter: Send + Sync + 'static {
    /// Stable identity used as the tracking key.
    fn emitter_id(&self) -> EmitterId;

    /// Registers a callback under a context token.
    fn subscribe(&self, name: &str, callback: Callback, context: Option<ContextHandle>);

    /// Removes subscriptions per the `off` removal matrix.
    fn unsubscribe(
        &self,
        name: Option<&str>,
        callback: Option<&Callback>,
        context: Option<&ContextHandle>,
    );
}

impl Emitter for StructuredEvents {
    fn emitter_id(&self) -> EmitterId {
        self.id
    }

    fn subscribe(&self, name: &str, callback: Callback, context: Option<ContextHandle>) {
        self.on_with_context(name, callback, context);
    }

    fn unsubscribe(
        &self,
        name: Option<&str>,
        callback: Option<&Callback>,
        context: Option<&ContextHandle>,
    ) {
        self.off(name, callback, context);
    }
}

impl StructuredEvents {
    /// Tells this registry to listen to an event on another emitter,
    /// tracking that emitter for bulk detachment later.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use structured_events::{callback, create_structured_events};
    ///
    /// let view = create_structured_events();
    /// let model = create_structured_events();
    /// view.listen_to(&model, "change", callback(|_| Ok(())));
    /// model.trigger("change", &[])?;
    /// view.stop_listening(&*model, None, None);
    /// # Ok::<(), structured_events::EventError>(())
    /// ```
    pub fn listen_to<E: Emitter>(&self, emitter: &Arc<E>, name: &str, callback: Callback) -> &Self {
        let weak = Arc::downgrade(emitter);
        let weak: Weak<dyn Emitter> = weak;
        self.tracked.insert(emitter.emitter_id(), weak);
        emitter.subscribe(name, callback, Some(self.listener_context.clone()));
        debug!("👂 {} listening to {:?} on {}", self.id, name, emitter.emitter_id());
        self
    }

    /// Event-map form of [`StructuredEvents::listen_to`]: each
    /// `(name, callback)` pair becomes its own tracked registration.
    pub fn listen_to_map<E, S, I>(&self, emitter: &Arc<E>, map: I) -> &Self
    where
        E: Emitter,
        S: AsRef<str>,
        I: IntoIterator<Item = (S, Callback)>,
    {
        for (name, callback) in map {
            self.listen_to(emitter, name.as_ref(), callback);
        }
        self
    }

    /// Stops listening to one emitter.
    ///
    /// Removal is restricted to subscriptions this registry created there,
    /// optionally narrowed further by name and callback. When both name and
    /// callback are absent the detachment is total and the emitter is also
    /// dropped from the tracking map.
    pub fn stop_listening<E: Emitter + ?Sized>(
        &self,
        emitter: &E,
        name: Option<&str>,
        callback: Option<&Callback>,
    ) -> &Self {
        emitter.unsubscribe(name, callback, Some(&self.listener_context));
        if name.is_none() && callback.is_none() {
            self.tracked.remove(&emitter.emitter_id());
            debug!("🔇 {} stopped listening to {}", self.id, emitter.emitter_id());
        }
        self
    }

    /// Stops listening across every tracked emitter.
    ///
    /// Emitters that have since been dropped are skipped; a full detach
    /// (no name, no callback) also clears the tracking map.
    pub fn stop_listening_all(&self, name: Option<&str>, callback: Option<&Callback>) -> &Self {
        let full_detach = name.is_none() && callback.is_none();
        let tracked: Vec<(EmitterId, Weak<dyn Emitter>)> = self
            .tracked
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        for (id, weak) in tracked {
            if let Some(emitter) = weak.upgrade() {
                emitter.unsubscribe(name, callback, Some(&self.listener_context));
            }
            if full_detach {
                self.tracked.remove(&id);
            }
        }
        if full_detach {
            debug!("🔇 {} detached from every tracked emitter", self.id);
        }
        self
    }

    /// Number of emitters currently tracked by `listen_to`.
    pub fn tracked_emitter_count(&self) -> usize {
        self.tracked.len()
    }
}
