//! The duck-typed surface that [`unpipe`][crate::unpipe()] needs from a
//! stream, and the name-tagged listener record it inspects.
//!
//! Streams are external collaborators: this crate never creates or owns
//! them, it only queries their listener registry and invokes callbacks the
//! registry hands back.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// The callable half of a [`Listener`].
///
/// Callbacks receive the stream they were registered on, the ownership-safe
/// equivalent of the legacy convention of binding `this` to the stream.
pub type ListenerFn = Arc<dyn Fn(&mut dyn StreamLike) + Send + Sync>;

/// A stream-like object, as seen by [`unpipe`][crate::unpipe()].
///
/// This is a capability surface, not a full stream interface: it covers
/// exactly the two things the unpipe shim can make use of. Newer stream
/// generations implement [`native_unpipe`][StreamLike::native_unpipe] and
/// are detached by delegation; older generations implement only
/// [`listeners`][StreamLike::listeners] and are detached by invoking their
/// registered cleanup callbacks.
pub trait StreamLike {
    /// Perform this stream's own detach operation, if it has one.
    ///
    /// Returns `Some(())` when the stream carried the native operation and
    /// it ran. Returns `None`, with no side effects, when the stream
    /// generation predates the operation; the default implementation does
    /// exactly that, so legacy streams only need to provide
    /// [`listeners`][StreamLike::listeners].
    fn native_unpipe(&mut self) -> Option<()> {
        None
    }

    /// Snapshot of the listeners registered for `event`, in registration
    /// order.
    ///
    /// The returned sequence is a point-in-time copy: a callback that
    /// deregisters itself while being invoked does not shorten a snapshot
    /// already taken.
    fn listeners(&self, event: &str) -> Vec<Listener>;
}

/// A registered listener: a callback tagged with the name it was registered
/// under.
///
/// The legacy streaming convention signals a callback's role through its
/// name rather than any structural marker, and this crate preserves that
/// convention verbatim for compatibility. A callback registered without a
/// recognized name will never be selected, even if it performs teardown.
#[derive(Clone)]
pub struct Listener {
    name: Cow<'static, str>,
    callback: ListenerFn,
}

impl Listener {
    /// Create a listener from a name tag and a callback.
    pub fn new<N>(name: N, callback: ListenerFn) -> Self
    where
        N: Into<Cow<'static, str>>,
    {
        Self {
            name: name.into(),
            callback,
        }
    }

    /// The name this listener was registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the callback with the stream it belongs to.
    pub fn invoke(&self, stream: &mut dyn StreamLike) {
        (self.callback)(stream)
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
