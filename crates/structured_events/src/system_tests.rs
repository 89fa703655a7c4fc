//! Tests for the namespaced registry surface: registration, the removal
//! matrix, wildcard and deep dispatch, the catch-all channel, and listener
//! tracking.

use crate::{callback, context, create_structured_events, Callback, EventError, StructuredEvents};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

/// Capture cell shared between a test and its callbacks.
type Cell<T> = Arc<Mutex<T>>;

fn cell<T>(value: T) -> Cell<T> {
    Arc::new(Mutex::new(value))
}

fn counting(counter: &Cell<u32>) -> Callback {
    let counter = counter.clone();
    callback(move |_| {
        *counter.lock().unwrap() += 1;
        Ok(())
    })
}

#[test]
fn trigger_invokes_exactly_once_with_args() {
    let events = StructuredEvents::new();
    let seen = cell(Vec::new());
    let seen_probe = seen.clone();
    events.on(
        "user.login",
        callback(move |args| {
            seen_probe.lock().unwrap().push(args.to_vec());
            Ok(())
        }),
    );

    events
        .trigger("user.login", &[json!("alice"), json!(42), json!(true)])
        .unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0], vec![json!("alice"), json!(42), json!(true)]);
}

#[test]
fn trigger_on_unknown_name_is_a_silent_noop() {
    let events = StructuredEvents::new();
    events.trigger("nobody.home", &[json!(1)]).unwrap();
    assert_eq!(events.stats().events_dispatched, 0);
}

#[test]
fn multi_name_registration_fires_each_name() {
    let events = StructuredEvents::new();
    let count = cell(0);
    events.on("change blur", counting(&count));

    events.trigger("change", &[]).unwrap();
    events.trigger("blur", &[]).unwrap();
    assert_eq!(*count.lock().unwrap(), 2);
    assert_eq!(events.stats().total_subscriptions, 2);
}

#[test]
fn event_map_registers_each_pair() {
    let events = StructuredEvents::new();
    let saves = cell(0);
    let loads = cell(0);
    events.on_map(
        [("doc.save", counting(&saves)), ("doc.load", counting(&loads))],
        None,
    );

    events.trigger("doc.save doc.load", &[]).unwrap();
    assert_eq!(*saves.lock().unwrap(), 1);
    assert_eq!(*loads.lock().unwrap(), 1);
}

#[test]
fn once_fires_at_most_once() {
    let events = StructuredEvents::new();
    let count = cell(0);
    events.once("tick", counting(&count));

    for _ in 0..3 {
        events.trigger("tick", &[]).unwrap();
    }
    assert_eq!(*count.lock().unwrap(), 1);
    // The spent registration is gone from the tree as well.
    assert_eq!(events.stats().total_subscriptions, 0);
}

#[test]
fn once_guard_survives_reentrant_trigger() {
    let events = create_structured_events();
    let count = cell(0);
    let count_probe = count.clone();
    let reentrant = events.clone();
    events.once(
        "tick",
        callback(move |_| {
            *count_probe.lock().unwrap() += 1;
            // Re-trigger before the unsubscribe sweep has run.
            reentrant.trigger("tick", &[])?;
            Ok(())
        }),
    );

    events.trigger("tick", &[]).unwrap();
    assert_eq!(*count.lock().unwrap(), 1);
}

#[test]
fn off_can_match_the_original_callback_of_a_once() {
    let events = StructuredEvents::new();
    let count = cell(0);
    let original = counting(&count);
    events.once("tick", original.clone());

    events.off(Some("tick"), Some(&original), None);
    events.trigger("tick", &[]).unwrap();
    assert_eq!(*count.lock().unwrap(), 0);
}

#[test]
fn off_by_name_removes_the_whole_subtree() {
    let events = StructuredEvents::new();
    let count = cell(0);
    events.on("a.b", counting(&count));
    events.on("a.b.c", counting(&count));
    events.on("a.d", counting(&count));

    events.off(Some("a.b"), None, None);

    events.trigger("a.b", &[]).unwrap();
    events.trigger("a.b.c", &[]).unwrap();
    assert_eq!(*count.lock().unwrap(), 0);
    // Siblings are untouched.
    events.trigger("a.d", &[]).unwrap();
    assert_eq!(*count.lock().unwrap(), 1);
}

#[test]
fn off_by_callback_scrubs_every_namespace() {
    let events = StructuredEvents::new();
    let removed = cell(0);
    let kept = cell(0);
    let target = counting(&removed);
    events.on("a.b", target.clone());
    events.on("x.y.z", target.clone());
    events.on("a.b", counting(&kept));

    events.off(None, Some(&target), None);

    events.trigger("a.b", &[]).unwrap();
    events.trigger("x.y.z", &[]).unwrap();
    assert_eq!(*removed.lock().unwrap(), 0);
    assert_eq!(*kept.lock().unwrap(), 1);
}

#[test]
fn off_by_context_removes_only_that_context() {
    let events = StructuredEvents::new();
    let owned = cell(0);
    let other = cell(0);
    let owner = context("owner");
    events.on_with_context("evt", counting(&owned), Some(owner.clone()));
    events.on("evt", counting(&other));

    events.off(Some("evt"), None, Some(&owner));

    events.trigger("evt", &[]).unwrap();
    assert_eq!(*owned.lock().unwrap(), 0);
    assert_eq!(*other.lock().unwrap(), 1);
}

#[test]
fn off_with_no_arguments_clears_everything() {
    let events = StructuredEvents::new();
    let count = cell(0);
    events.on("a.b", counting(&count));
    events.on("c", counting(&count));

    events.off(None, None, None);

    events.trigger("a.b c", &[]).unwrap();
    assert_eq!(*count.lock().unwrap(), 0);
    assert_eq!(events.stats().total_subscriptions, 0);
}

#[test]
fn full_removal_then_reregistration_fires_once() {
    let events = StructuredEvents::new();
    let count = cell(0);
    let cb = counting(&count);
    events.on("x", cb.clone());
    events.off(Some("x"), Some(&cb), None);
    events.on("x", cb.clone());

    events.trigger("x", &[]).unwrap();
    assert_eq!(*count.lock().unwrap(), 1);
}

#[test]
fn off_prunes_emptied_paths() {
    let events = StructuredEvents::new();
    let cb = callback(|_| Ok(()));
    events.on("a.b.c", cb.clone());
    events.off(Some("a.b.c"), Some(&cb), None);

    assert_eq!(events.stats().total_subscriptions, 0);
    assert!(events.registered_paths().is_empty());
}

#[test]
fn destroy_wildcard_keeps_the_node_itself() {
    let events = StructuredEvents::new();
    let on_a = cell(0);
    let below_a = cell(0);
    events.on("a", counting(&on_a));
    events.on("a.b", counting(&below_a));
    events.on("a.b.c", counting(&below_a));

    events.destroy(Some("a.*"));

    events.trigger("a", &[]).unwrap();
    events.trigger("a.b", &[]).unwrap();
    events.trigger("a.b.c", &[]).unwrap();
    assert_eq!(*on_a.lock().unwrap(), 1);
    assert_eq!(*below_a.lock().unwrap(), 0);
}

#[test]
fn destroy_matches_the_bare_terminal_segment_anywhere() {
    // Deliberate: destroy("a.b") deletes any child key "b", not only the
    // node at path a.b.
    let events = StructuredEvents::new();
    let count = cell(0);
    events.on("a.b", counting(&count));
    events.on("x.b.c", counting(&count));
    events.on("x.keep", counting(&count));

    events.destroy(Some("a.b"));

    events.trigger("a.b", &[]).unwrap();
    events.trigger("x.b.c", &[]).unwrap();
    assert_eq!(*count.lock().unwrap(), 0);
    events.trigger("x.keep", &[]).unwrap();
    assert_eq!(*count.lock().unwrap(), 1);
}

#[test]
fn destroy_without_a_name_clears_the_tree() {
    let events = StructuredEvents::new();
    events.on("a.b", callback(|_| Ok(())));
    events.destroy(None);
    assert_eq!(events.stats().total_subscriptions, 0);
}

#[test]
fn deep_trigger_fires_the_node_and_all_descendants() {
    let events = StructuredEvents::new();
    let fired = cell(Vec::new());
    for name in ["a", "a.b", "a.b.c"] {
        let fired = fired.clone();
        events.on(
            name,
            callback(move |_| {
                fired.lock().unwrap().push(name);
                Ok(())
            }),
        );
    }

    events.deep_trigger("a", &[json!("sweep")]).unwrap();
    let mut got = fired.lock().unwrap().clone();
    got.sort();
    assert_eq!(got, ["a", "a.b", "a.b.c"]);
}

#[test]
fn deep_trigger_wildcard_excludes_the_node_itself() {
    let events = StructuredEvents::new();
    let fired = cell(Vec::new());
    for name in ["a", "a.b", "a.b.c"] {
        let fired = fired.clone();
        events.on(
            name,
            callback(move |_| {
                fired.lock().unwrap().push(name);
                Ok(())
            }),
        );
    }

    events.deep_trigger("a.*", &[]).unwrap();
    let mut got = fired.lock().unwrap().clone();
    got.sort();
    assert_eq!(got, ["a.b", "a.b.c"]);
}

#[test]
fn all_channel_receives_every_trigger_with_the_name_first() {
    let events = StructuredEvents::new();
    let seen = cell(Vec::new());
    let seen_probe = seen.clone();
    events.on(
        "all",
        callback(move |args| {
            seen_probe.lock().unwrap().push(args.to_vec());
            Ok(())
        }),
    );
    events.on("user.login", callback(|_| Ok(())));

    events.trigger("user.login", &[json!(7)]).unwrap();
    // Fires even for names with no subscribers of their own.
    events.trigger("user.logout", &[]).unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], vec![json!("user.login"), json!(7)]);
    assert_eq!(seen[1], vec![Value::String("user.logout".to_string())]);
}

#[test]
fn custom_separator_changes_path_resolution() {
    let events = StructuredEvents::new();
    let count = cell(0);
    events.set_separator(":");
    events.on("a:b", counting(&count));

    events.trigger("a:b", &[]).unwrap();
    assert_eq!(*count.lock().unwrap(), 1);
    // The old separator no longer splits, so "a.b" is one unknown segment.
    events.trigger("a.b", &[]).unwrap();
    assert_eq!(*count.lock().unwrap(), 1);
}

#[test]
fn an_erroring_subscriber_aborts_its_list_and_the_all_channel() {
    let events = StructuredEvents::new();
    let later = cell(0);
    let audit = cell(0);
    events.on(
        "evt",
        callback(|_| Err(EventError::HandlerExecution("boom".to_string()))),
    );
    events.on("evt", counting(&later));
    events.on("all", counting(&audit));

    let result = events.trigger("evt", &[]);
    assert!(matches!(result, Err(EventError::HandlerExecution(_))));
    assert_eq!(*later.lock().unwrap(), 0);
    assert_eq!(*audit.lock().unwrap(), 0);
}

#[test]
fn reentrant_off_does_not_affect_the_in_flight_dispatch() {
    // Snapshot semantics: the second subscriber still runs in the trigger
    // that removed it, and is gone from the next one.
    let events = create_structured_events();
    let second_runs = cell(0);
    let second = counting(&second_runs);
    let registry = events.clone();
    let second_handle = second.clone();
    events.on(
        "x",
        callback(move |_| {
            registry.off(Some("x"), Some(&second_handle), None);
            Ok(())
        }),
    );
    events.on("x", second.clone());

    events.trigger("x", &[]).unwrap();
    assert_eq!(*second_runs.lock().unwrap(), 1);
    events.trigger("x", &[]).unwrap();
    assert_eq!(*second_runs.lock().unwrap(), 1);
}

#[test]
fn reentrant_on_takes_effect_from_the_next_trigger() {
    let events = create_structured_events();
    let added_runs = cell(0);
    let added = counting(&added_runs);
    let registry = events.clone();
    events.on(
        "x",
        callback(move |_| {
            registry.on("x", added.clone());
            Ok(())
        }),
    );

    events.trigger("x", &[]).unwrap();
    assert_eq!(*added_runs.lock().unwrap(), 0);
    events.trigger("x", &[]).unwrap();
    assert_eq!(*added_runs.lock().unwrap(), 1);
}

#[test]
fn emit_serializes_the_event_into_one_argument() {
    #[derive(serde::Serialize)]
    struct SaveEvent {
        path: String,
        dirty: bool,
    }

    let events = StructuredEvents::new();
    let seen = cell(Vec::new());
    let seen_probe = seen.clone();
    events.on(
        "doc.save",
        callback(move |args| {
            seen_probe.lock().unwrap().push(args.to_vec());
            Ok(())
        }),
    );

    events
        .emit(
            "doc.save",
            &SaveEvent {
                path: "draft.md".to_string(),
                dirty: true,
            },
        )
        .unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0], vec![json!({"path": "draft.md", "dirty": true})]);
}

#[test]
fn stats_track_subscriptions_and_dispatches() {
    let events = StructuredEvents::new();
    let cb = callback(|_| Ok(()));
    events.on("a.b", cb.clone());
    events.on("c", cb.clone());
    assert_eq!(events.stats().total_subscriptions, 2);

    events.trigger("a.b", &[]).unwrap();
    events.trigger("missing", &[]).unwrap();
    assert_eq!(events.stats().events_dispatched, 1);

    events.off(None, None, None);
    assert_eq!(events.stats().total_subscriptions, 0);
}

#[test]
fn listen_to_then_stop_listening_detaches_and_untracks() {
    let view = create_structured_events();
    let model = create_structured_events();
    let count = cell(0);
    view.listen_to(&model, "change", counting(&count));

    model.trigger("change", &[]).unwrap();
    assert_eq!(*count.lock().unwrap(), 1);
    assert_eq!(view.tracked_emitter_count(), 1);

    view.stop_listening(&*model, None, None);
    model.trigger("change", &[]).unwrap();
    assert_eq!(*count.lock().unwrap(), 1);
    assert_eq!(view.tracked_emitter_count(), 0);
}

#[test]
fn stop_listening_leaves_other_subscribers_alone() {
    let view = create_structured_events();
    let model = create_structured_events();
    let viewed = cell(0);
    let direct = cell(0);
    view.listen_to(&model, "change", counting(&viewed));
    model.on("change", counting(&direct));

    view.stop_listening(&*model, None, None);
    model.trigger("change", &[]).unwrap();
    assert_eq!(*viewed.lock().unwrap(), 0);
    assert_eq!(*direct.lock().unwrap(), 1);
}

#[test]
fn stop_listening_all_detaches_from_every_tracked_emitter() {
    let view = create_structured_events();
    let model_a = create_structured_events();
    let model_b = create_structured_events();
    let count = cell(0);
    view.listen_to(&model_a, "change", counting(&count));
    view.listen_to(&model_b, "sync", counting(&count));

    view.stop_listening_all(None, None);

    model_a.trigger("change", &[]).unwrap();
    model_b.trigger("sync", &[]).unwrap();
    assert_eq!(*count.lock().unwrap(), 0);
    assert_eq!(view.tracked_emitter_count(), 0);
}

#[test]
fn stop_listening_all_skips_dropped_emitters() {
    let view = create_structured_events();
    let model = create_structured_events();
    view.listen_to(&model, "change", callback(|_| Ok(())));
    drop(model);

    // Tracking is weak, so this must not fail or leak.
    view.stop_listening_all(None, None);
    assert_eq!(view.tracked_emitter_count(), 0);
}

#[test]
fn listen_to_map_tracks_each_registration() {
    let view = create_structured_events();
    let model = create_structured_events();
    let changes = cell(0);
    let syncs = cell(0);
    view.listen_to_map(
        &model,
        [("change", counting(&changes)), ("sync", counting(&syncs))],
    );

    model.trigger("change sync", &[]).unwrap();
    assert_eq!(*changes.lock().unwrap(), 1);
    assert_eq!(*syncs.lock().unwrap(), 1);

    view.stop_listening(&*model, None, None);
    model.trigger("change sync", &[]).unwrap();
    assert_eq!(*changes.lock().unwrap(), 1);
    assert_eq!(*syncs.lock().unwrap(), 1);
}
