//! Unpipe a stream from all of its destinations.
//!
//! Two generations of the streaming abstraction are in circulation. The
//! newer one exposes a native detach operation; the older one has none, and
//! undoing a pipe means invoking the cleanup callbacks the pipe machinery
//! registered on the stream's `close` event, found by their conventional
//! names. [`unpipe`] papers over the difference: it delegates to the native
//! operation when the stream has one and falls back to listener inspection
//! when it does not.
//!
//! ```
//! use unpipe::{unpipe, Listener, StreamLike};
//!
//! struct Modern {
//!     detached: bool,
//! }
//!
//! impl StreamLike for Modern {
//!     fn native_unpipe(&mut self) -> Option<()> {
//!         self.detached = true;
//!         Some(())
//!     }
//!
//!     fn listeners(&self, _event: &str) -> Vec<Listener> {
//!         Vec::new()
//!     }
//! }
//!
//! let mut stream = Modern { detached: false };
//! unpipe(Some(&mut stream))?;
//! assert!(stream.detached);
//! # Ok::<_, unpipe::Error>(())
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

#[cfg(any(test, feature = "mocks"))]
pub mod mock;
pub mod stream;
mod unpipe;

pub use crate::stream::{Listener, ListenerFn, StreamLike};
pub use crate::unpipe::{unpipe, Error};
