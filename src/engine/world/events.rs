/// Events a world reports to the embedding application.
///
/// A world produces two streams:
/// - [`Impact`]: one per contact lifetime, emitted on the tick the contact ends
/// - [`Removal`]: one per body leaving the world, explicitly or by leaving bounds
///
/// Both are delivered through an [`EventQueue`], a cloneable handle that other
/// threads may drain while the simulation keeps producing.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::engine::body::BodyHandle;
use crate::engine::fixed_math::{FixedNum, FixedVec2};
use super::BodyPair;

// ============================================================================
// Impacts
// ============================================================================

/// State of a contact that is still going on, captured on its first tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactRecord {
    /// Movement of each body projected onto `axis`, in pair order.
    pub approach_speeds: [FixedNum; 2],
    /// Unit vector from the pair's first body toward its second.
    pub axis: FixedVec2,
    pub started_tick: u64,
}

impl ImpactRecord {
    pub(crate) fn complete(self, pair: BodyPair, ended_tick: u64) -> Impact {
        Impact {
            pair,
            approach_speeds: self.approach_speeds,
            axis: self.axis,
            started_tick: self.started_tick,
            ended_tick,
        }
    }
}

/// A completed contact between two bodies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Impact {
    pub pair: BodyPair,
    pub approach_speeds: [FixedNum; 2],
    pub axis: FixedVec2,
    /// Tick on which the bodies first touched.
    pub started_tick: u64,
    /// First tick on which they no longer touched.
    pub ended_tick: u64,
}

// ============================================================================
// Removals
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemovalCause {
    /// Removed by the application.
    Annihilated,
    /// Left the occupiable bounds during integration.
    OutOfBounds,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Removal {
    pub body: BodyHandle,
    pub cause: RemovalCause,
    /// Last position of the body.
    pub position: FixedVec2,
    pub tick: u64,
}

// ============================================================================
// Queue
// ============================================================================

/// Unbounded FIFO shared between the simulation and its consumers.
///
/// Cloning yields another handle to the same queue. Consumers must not treat
/// an empty drain as final; the next tick may enqueue more.
#[derive(Debug)]
pub struct EventQueue<T> {
    inner: Arc<Mutex<VecDeque<T>>>,
}

impl<T> Clone for EventQueue<T> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self { inner: Arc::new(Mutex::new(VecDeque::new())) }
    }
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: T) {
        self.lock().push_back(event);
    }

    pub fn pop(&self) -> Option<T> {
        self.lock().pop_front()
    }

    /// Take every queued event, oldest first.
    pub fn drain(&self) -> Vec<T> {
        self.lock().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A consumer that panicked mid-drain leaves a plain VecDeque behind, still valid
    fn lock(&self) -> MutexGuard<'_, VecDeque<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
