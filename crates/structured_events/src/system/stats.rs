/// Statistics about a registry's usage, useful for monitoring and debugging.
///
/// # Examples
///
/// ```rust
/// use structured_events::{callback, StructuredEvents};
///
/// let events = StructuredEvents::new();
/// events.on("user.login", callback(|_| Ok(())));
/// let stats = events.stats();
/// assert_eq!(stats.total_subscriptions, 1);
/// ```
#[derive(Debug, Default, Clone)]
pub struct RegistryStats {
    /// Number of live subscriptions across every namespace.
    pub total_subscriptions: usize,
    /// Number of trigger/deep-trigger calls that reached at least one
    /// subscriber list since the registry was created.
    pub events_dispatched: u64,
}
