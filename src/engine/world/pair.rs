use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::body::{BodyHandle, ShapeCode};
use super::BodyEntry;

/// Order-independent key for two bodies.
///
/// The bodies are sorted by shape code, then by materialization ordinal, so
/// `(a, b)` and `(b, a)` produce the same key and an edge is always `first`.
/// Build one with [`World::pair`](super::World::pair).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyPair {
    first_code: ShapeCode,
    first_ordinal: u64,
    first: BodyHandle,
    second_code: ShapeCode,
    second_ordinal: u64,
    second: BodyHandle,
}

impl BodyPair {
    pub(crate) fn new(a: BodyHandle, a_entry: &BodyEntry, b: BodyHandle, b_entry: &BodyEntry) -> Self {
        debug_assert_ne!(a, b, "a body cannot pair with itself");

        let a_key = (a_entry.body.code(), a_entry.ordinal);
        let b_key = (b_entry.body.code(), b_entry.ordinal);
        let ((first_code, first_ordinal), first, (second_code, second_ordinal), second) =
            if a_key <= b_key { (a_key, a, b_key, b) } else { (b_key, b, a_key, a) };

        Self { first_code, first_ordinal, first, second_code, second_ordinal, second }
    }

    pub fn first(&self) -> BodyHandle {
        self.first
    }

    pub fn second(&self) -> BodyHandle {
        self.second
    }

    pub fn codes(&self) -> (ShapeCode, ShapeCode) {
        (self.first_code, self.second_code)
    }

    /// The handle paired with `handle`, if `handle` is part of this pair.
    pub fn other(&self, handle: BodyHandle) -> Option<BodyHandle> {
        if handle == self.first {
            Some(self.second)
        } else if handle == self.second {
            Some(self.first)
        } else {
            None
        }
    }
}

impl fmt::Debug for BodyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:?} {:?}, {:?} {:?})", self.first_code, self.first, self.second_code, self.second)
    }
}
