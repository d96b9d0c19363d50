//! Cooperative cancellation for a gallery build.
//!
//! A [`CancelToken`] is created by the caller and passed into
//! [`Gallery::build`](crate::gallery::Gallery::build). Clones share one flag,
//! so the CLI can hand a clone to its Ctrl+C handler. Two galleries built with
//! separate tokens never affect each other.
//!
//! Workers check the token once per record, before the record is touched.
//! A record that has already started decoding or encoding runs to completion.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every worker holding a clone of this token to stop.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
