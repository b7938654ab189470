use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use unpipe::mock::{LegacyStream, NativeStream, Registry};
use unpipe::{unpipe, Error, Listener, ListenerFn, StreamLike};

fn recorder(order: &Arc<Mutex<Vec<&'static str>>>, label: &'static str) -> ListenerFn {
    let order = Arc::clone(order);
    Arc::new(move |_| order.lock().unwrap().push(label))
}

#[test]
fn absent_stream_is_rejected() {
    assert_eq!(unpipe(None), Err(Error::InvalidArgument));
}

#[test]
fn native_stream_delegates_without_inspection() {
    let mut stream = NativeStream::new();

    unpipe(Some(&mut stream)).unwrap();
    unpipe(Some(&mut stream)).unwrap();

    assert_eq!(stream.unpipe_calls(), 2);
    assert_eq!(stream.listener_queries(), 0);
}

/// The worked example: a piped stream whose close listeners are
/// `cleanup`, `other`, `onclose`. The two recognized names run once each,
/// in registration order; the unrecognized one never runs.
#[test]
fn recognized_cleanup_listeners_run_in_order() {
    let mut stream = LegacyStream::new();
    let order = Arc::new(Mutex::new(Vec::new()));

    stream.on("data", Listener::new("ondata", recorder(&order, "data")));
    stream.on("close", Listener::new("cleanup", recorder(&order, "f1")));
    stream.on("close", Listener::new("other", recorder(&order, "f2")));
    stream.on("close", Listener::new("onclose", recorder(&order, "f3")));

    unpipe(Some(&mut stream)).unwrap();

    assert_eq!(*order.lock().unwrap(), vec!["f1", "f3"]);
}

#[test]
fn close_listeners_are_not_queried_without_a_pipe() {
    let mut stream = LegacyStream::new();
    let order = Arc::new(Mutex::new(Vec::new()));
    stream.on("data", Listener::new("inspect", recorder(&order, "data")));
    stream.on("close", Listener::new("onclose", recorder(&order, "close")));

    unpipe(Some(&mut stream)).unwrap();

    assert!(order.lock().unwrap().is_empty());
    assert_eq!(stream.queries_for("data"), 1);
    assert_eq!(stream.queries_for("close"), 0);
}

/// A cleanup callback that tears down the whole pipe makes a second unpipe
/// a no-op, without the shim doing anything to ensure it.
#[test]
fn unpipe_composes_to_a_noop_after_full_teardown() {
    let mut stream = LegacyStream::new();
    let cleanups = Arc::new(AtomicUsize::new(0));

    let teardown = {
        let cleanups = Arc::clone(&cleanups);
        let registry = stream.registry();
        Arc::new(move |_: &mut dyn StreamLike| {
            cleanups.fetch_add(1, Ordering::SeqCst);
            let mut registry = registry.lock().unwrap();
            registry.remove("data", "ondata");
            registry.remove("close", "cleanup");
            registry.remove("close", "onclose");
        })
    };

    let noop: ListenerFn = Arc::new(|_| {});
    stream.on("data", Listener::new("ondata", noop.clone()));
    stream.on("close", Listener::new("cleanup", teardown));
    stream.on("close", Listener::new("onclose", noop));

    unpipe(Some(&mut stream)).unwrap();
    assert_eq!(cleanups.load(Ordering::SeqCst), 1);

    unpipe(Some(&mut stream)).unwrap();
    assert_eq!(cleanups.load(Ordering::SeqCst), 1);
    // the second call saw no pipe and stopped at the data query
    assert_eq!(stream.queries_for("close"), 1);
}

#[test]
fn registry_handle_reflects_callback_mutation() {
    let stream = LegacyStream::new();
    let noop: ListenerFn = Arc::new(|_| {});
    stream
        .registry()
        .lock()
        .unwrap()
        .add("close", Listener::new("onclose", noop));

    assert_eq!(stream.listeners("close").len(), 1);
    stream.registry().lock().unwrap().remove("close", "onclose");
    assert!(stream.listeners("close").is_empty());
}

#[test]
fn registry_counts_queries_per_event() {
    let stream = LegacyStream::new();
    stream.listeners("data");
    stream.listeners("data");

    assert_eq!(stream.queries_for("data"), 2);
    assert_eq!(stream.queries_for("close"), 0);
}

#[test]
fn unregistered_events_snapshot_empty() {
    let registry = Registry::default();
    assert!(registry.snapshot("data").is_empty());
    assert_eq!(registry.queries_for("data"), 0);
}
