//! Mock streams for testing.
//!
//! Mock streams carry no data; they exist to observe how the unpipe shim
//! interacts with the two stream generations: [`LegacyStream`] keeps a
//! listener registry and no native detach, [`NativeStream`] exposes the
//! native detach and counts how it is used.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tracing::trace;

use crate::stream::{Listener, StreamLike};

/// An event-keyed listener registry with per-event query counters.
///
/// Listener lists keep registration order. The registry is shared behind
/// [`LegacyStream::registry`] so that cleanup callbacks can deregister
/// themselves while the stream is borrowed by the shim.
#[derive(Debug, Default)]
pub struct Registry {
    events: Vec<(String, Vec<Listener>)>,
    queries: Vec<(String, usize)>,
}

impl Registry {
    /// Register a listener for an event, after any already registered.
    pub fn add(&mut self, event: &str, listener: Listener) {
        if let Some((_, listeners)) = self.events.iter_mut().find(|(name, _)| name == event) {
            listeners.push(listener);
        } else {
            self.events.push((event.to_owned(), vec![listener]));
        }
    }

    /// Remove every listener registered for `event` under `name`.
    pub fn remove(&mut self, event: &str, name: &str) {
        if let Some((_, listeners)) = self.events.iter_mut().find(|(e, _)| e == event) {
            listeners.retain(|listener| listener.name() != name);
        }
    }

    /// Copy of the listeners registered for `event`, in registration order.
    pub fn snapshot(&self, event: &str) -> Vec<Listener> {
        self.events
            .iter()
            .find(|(name, _)| name == event)
            .map(|(_, listeners)| listeners.clone())
            .unwrap_or_default()
    }

    fn record_query(&mut self, event: &str) {
        if let Some((_, count)) = self.queries.iter_mut().find(|(name, _)| name == event) {
            *count += 1;
        } else {
            self.queries.push((event.to_owned(), 1));
        }
    }

    /// How many times the listeners for `event` have been queried.
    pub fn queries_for(&self, event: &str) -> usize {
        self.queries
            .iter()
            .find(|(name, _)| name == event)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }
}

/// A stream from the generation before the native detach operation existed.
///
/// It can only be unpiped by invoking the cleanup callbacks registered on
/// its `close` event.
#[derive(Debug, Default)]
pub struct LegacyStream {
    registry: Arc<Mutex<Registry>>,
}

impl LegacyStream {
    /// Create a stream with an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for an event.
    pub fn on(&mut self, event: &str, listener: Listener) {
        trace!(event, name = listener.name(), "registering listener");
        self.registry.lock().unwrap().add(event, listener);
    }

    /// Shared handle to the registry, for callbacks that deregister
    /// themselves during teardown.
    pub fn registry(&self) -> Arc<Mutex<Registry>> {
        Arc::clone(&self.registry)
    }

    /// How many times the listeners for `event` have been queried.
    pub fn queries_for(&self, event: &str) -> usize {
        self.registry.lock().unwrap().queries_for(event)
    }
}

impl StreamLike for LegacyStream {
    fn listeners(&self, event: &str) -> Vec<Listener> {
        let mut registry = self.registry.lock().unwrap();
        registry.record_query(event);
        registry.snapshot(event)
    }
}

/// A stream from the generation that carries the native detach operation.
#[derive(Debug, Default)]
pub struct NativeStream {
    unpipe_calls: AtomicUsize,
    listener_queries: AtomicUsize,
}

impl NativeStream {
    /// Create a stream with zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times the native detach operation has run.
    pub fn unpipe_calls(&self) -> usize {
        self.unpipe_calls.load(Ordering::SeqCst)
    }

    /// How many times the listener registry has been queried.
    pub fn listener_queries(&self) -> usize {
        self.listener_queries.load(Ordering::SeqCst)
    }
}

impl StreamLike for NativeStream {
    fn native_unpipe(&mut self) -> Option<()> {
        self.unpipe_calls.fetch_add(1, Ordering::SeqCst);
        trace!("native unpipe invoked");
        Some(())
    }

    fn listeners(&self, _event: &str) -> Vec<Listener> {
        self.listener_queries.fetch_add(1, Ordering::SeqCst);
        Vec::new()
    }
}
