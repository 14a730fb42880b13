//! Request tokens for chat placeholders.
//!
//! Each chat submission gets a token from a per-flow monotonic counter. The
//! token names the placeholder region (`ai-msg-{n}`) that the reply replaces.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Identifies one in-flight chat submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Issues strictly increasing tokens, starting at 1.
#[derive(Debug, Default)]
pub struct RequestTokens {
    last: AtomicU64,
}

impl RequestTokens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> RequestToken {
        RequestToken(self.last.fetch_add(1, Ordering::Relaxed) + 1)
    }
}
