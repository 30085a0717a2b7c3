//! Action identifiers and the allocator that mints them.
//!
//! Every action declared during a build gets a distinct, human-traceable
//! identifier. Callers may supply one explicitly; otherwise the
//! [`IdAllocator`] composes `"Action{n}_{name}"` from a monotonically
//! increasing counter and the caller's logical name. Sharing one allocator
//! across everything a process builds is what keeps repeated builds from
//! colliding.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// A unique identifier for a declared custom action.
///
/// Either supplied explicitly by the caller or minted by an
/// [`IdAllocator`]. Serializes as a plain string.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionId(String);

impl ActionId {
    /// Wrap a caller-supplied identifier verbatim.
    ///
    /// No validation is performed; uniqueness is the caller's problem until
    /// the sequence resolver checks the full action set.
    pub fn explicit(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Return the inner string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ActionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<ActionId> for String {
    fn from(id: ActionId) -> Self {
        id.0
    }
}

impl PartialEq<str> for ActionId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ActionId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Mints unique action identifiers from an atomic counter.
///
/// An explicit value threaded through the build rather than a process
/// global, so tests can seed it deterministically. One allocator shared for
/// the lifetime of a process never hands out the same counter value twice,
/// even across separate build runs — that is the only mechanism keeping two
/// actions with the same logical name apart.
#[derive(Debug)]
pub struct IdAllocator {
    next: AtomicU64,
}

impl IdAllocator {
    /// Allocator whose first generated identifier uses counter value 1.
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Allocator seeded at an arbitrary counter value.
    #[must_use]
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    /// Mint the next identifier for `logical_name`.
    ///
    /// Atomic fetch-and-increment, so concurrent builds sharing one
    /// allocator still get distinct values. The logical name is embedded
    /// verbatim — empty or duplicate names are accepted and distinguished
    /// only by the counter.
    pub fn allocate(&self, logical_name: &str) -> ActionId {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        ActionId(format!("Action{n}_{logical_name}"))
    }

    /// Counter value the next allocation will use.
    #[must_use]
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
