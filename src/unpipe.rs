//! Detach a stream from all of its piped destinations, whichever stream
//! generation it belongs to.

use std::collections::HashSet;
use std::sync::LazyLock;

use thiserror::Error;
use tracing::trace;

use crate::stream::StreamLike;

/// Listener names that indicate an active legacy pipe.
static PIPE_LISTENER_NAMES: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| HashSet::from(["ondata"]));

/// Listener names the legacy pipe machinery registers for teardown.
static CLEANUP_LISTENER_NAMES: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| HashSet::from(["cleanup", "onclose"]));

/// Error returned by [`unpipe`].
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The stream argument was absent.
    #[error("argument stream is required")]
    InvalidArgument,
}

/// Whether the stream has a `data` listener registered by the legacy pipe
/// machinery. Fast-exits before any name comparison when there are no
/// `data` listeners at all.
fn has_pipe_data_listeners(stream: &dyn StreamLike) -> bool {
    let listeners = stream.listeners("data");

    if listeners.is_empty() {
        return false;
    }

    listeners
        .iter()
        .any(|listener| PIPE_LISTENER_NAMES.contains(listener.name()))
}

/// Unpipe a stream from all of its destinations.
///
/// Newer stream generations expose a native detach operation, and `unpipe`
/// delegates to it outright. Older generations have no such operation: the
/// pipe machinery instead registers cleanup callbacks on the `close` event,
/// and `unpipe` finds those by their conventional names and invokes them in
/// registration order.
///
/// A stream with no pipe-indicating `data` listeners is left untouched.
/// Panics from invoked callbacks propagate to the caller.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] when `stream` is `None`. No other
/// input validation is performed.
pub fn unpipe(stream: Option<&mut dyn StreamLike>) -> Result<(), Error> {
    let stream = stream.ok_or(Error::InvalidArgument)?;

    if stream.native_unpipe().is_some() {
        trace!("detached via native unpipe");
        return Ok(());
    }

    // Checking for pipe listeners first avoids snapshotting the close
    // listeners of a stream that was never piped.
    if !has_pipe_data_listeners(&*stream) {
        trace!("no pipe data listeners, nothing to do");
        return Ok(());
    }

    let listeners = stream.listeners("close");

    if listeners.is_empty() {
        trace!("no close listeners, nothing to do");
        return Ok(());
    }

    for listener in &listeners {
        if CLEANUP_LISTENER_NAMES.contains(listener.name()) {
            trace!(name = listener.name(), "invoking cleanup listener");
            listener.invoke(&mut *stream);
        }
    }

    Ok(())
}
