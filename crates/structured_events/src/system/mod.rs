/// Registry module - broken down into manageable components
mod core;
mod emitters;
mod handlers;
mod management;
mod stats;

// Re-export all public items from submodules
pub use self::core::{StructuredEvents, DEFAULT_SEPARATOR};
pub use emitters::ALL_CHANNEL;
pub use stats::RegistryStats;
