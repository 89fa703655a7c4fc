//! Example demonstrating namespaced chat channels.
//!
//! Shows hierarchical subscription (`chat.room.general`), the catch-all
//! `"all"` audit channel, firing a whole namespace with `deep_trigger`, and
//! tearing a namespace down with `destroy`.

use serde_json::json;
use structured_events::{callback, create_structured_events, EventError};

fn main() -> Result<(), EventError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("🚀 Starting chat channel example");

    let events = create_structured_events();

    // Per-room subscribers.
    events.on(
        "chat.room.general",
        callback(|args| {
            println!("💬 #general: {:?}", args);
            Ok(())
        }),
    );
    events.on(
        "chat.room.ops",
        callback(|args| {
            println!("🔧 #ops: {:?}", args);
            Ok(())
        }),
    );

    // One subscriber for the whole chat namespace.
    events.on(
        "chat",
        callback(|args| {
            println!("📣 chat-wide notice: {:?}", args);
            Ok(())
        }),
    );

    // Audit log: sees every trigger, name first.
    events.on(
        "all",
        callback(|args| {
            println!("📋 audit: {:?}", args);
            Ok(())
        }),
    );

    println!("✅ Registered {} subscription(s)", events.stats().total_subscriptions);

    // Exact dispatch reaches one room plus the audit channel.
    events.trigger("chat.room.general", &[json!("hello there")])?;

    // Broadcast to every room without touching the "chat" subscriber itself.
    events.deep_trigger("chat.room.*", &[json!("server restarting in 5m")])?;

    // Fire the whole namespace, parent included.
    events.deep_trigger("chat", &[json!("sweep")])?;

    // Tear the rooms down; the chat-wide subscriber survives.
    events.destroy(Some("chat.room"));
    events.trigger("chat.room.general", &[json!("anyone home?")])?;
    events.deep_trigger("chat", &[json!("after teardown")])?;

    let stats = events.stats();
    println!(
        "🏁 Done: {} live subscription(s), {} dispatch(es)",
        stats.total_subscriptions, stats.events_dispatched
    );
    Ok(())
}
