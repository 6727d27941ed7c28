//! The simulated world: bodies, the broad-phase grid and the tick pipeline.
//!
//! A [`World`] covers `cols × rows` square cells. The outermost ring of cells
//! holds the boundary edges seeded at construction; round bodies live strictly
//! inside it. Each call to [`World::observe`] runs one tick:
//!
//! 1. **Elastic forces** ([`collision`]): overlapping pairs push each other apart
//!    and contacts are tracked so each one is reported once.
//! 2. **Friction** ([`physics`]): moving bodies slow down.
//! 3. **Integration** ([`physics`]): bodies move, change grid cells, and are
//!    removed once they leave the bounds.
//!
//! # Example
//!
//! ```rust
//! use kestrel::engine::body::Body;
//! use kestrel::engine::fixed_math::{FixedNum, FixedVec2};
//! use kestrel::engine::world::World;
//!
//! let mut world = World::new(FixedNum::from_int(10), 12, 12).unwrap();
//! let ball = Body::round(
//!     FixedNum::ONE,
//!     FixedVec2::new(FixedNum::from_int(50), FixedNum::from_int(50)),
//!     FixedNum::from_int(100),
//!     FixedNum::ONE,
//! );
//! let handle = world.materialize(ball).unwrap();
//!
//! world.observe(FixedNum::from_raw(50_000));
//! assert!(world.body(handle).is_some());
//! assert!(world.impacts().drain().is_empty());
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use kestrel_macros::profile;
use slotmap::SlotMap;

use crate::engine::body::{Body, BodyHandle};
use crate::engine::config::SimConfig;
use crate::engine::fixed_math::{FixedNum, FixedVec2};
use crate::engine::spatial_hash::{GridCell, SpatialHash};

pub use events::{EventQueue, Impact, ImpactRecord, Removal, RemovalCause};
pub use pair::BodyPair;
pub use snapshot::{Snapshot, SnapshotError, SNAPSHOT_VERSION};

pub mod collision;
pub mod events;
mod pair;
pub mod physics;
mod snapshot;

/// Smallest grid that leaves at least one interior cell.
pub const MIN_GRID_CELLS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WorldError {
    #[error("invalid grid {cols}x{rows} with cell size {cell_size}: need at least 3x3 cells of positive size")]
    InvalidGrid {
        cell_size: FixedNum,
        cols: usize,
        rows: usize,
    },
}

/// Occupiable area for round bodies, inclusive on both ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: FixedVec2,
    pub max: FixedVec2,
}

impl Bounds {
    pub fn contains(&self, pos: FixedVec2) -> bool {
        !(pos.x < self.min.x || pos.y < self.min.y || pos.x > self.max.x || pos.y > self.max.y)
    }
}

/// A live body, the grid cell it is registered in, and its place in the
/// materialization sequence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct BodyEntry {
    pub(crate) body: Body,
    pub(crate) cell: GridCell,
    pub(crate) ordinal: u64,
}

pub struct World {
    pub(crate) bodies: SlotMap<BodyHandle, BodyEntry>,
    /// Live bodies by ordinal. Every pass walks bodies in this order, so
    /// results never depend on which slot a body was given.
    pub(crate) order: BTreeMap<u64, BodyHandle>,
    pub(crate) next_ordinal: u64,
    pub(crate) grid: SpatialHash,
    /// Contacts still going on, keyed by pair. Ordered so completions are emitted deterministically.
    pub(crate) live_impacts: BTreeMap<BodyPair, ImpactRecord>,
    impact_events: EventQueue<Impact>,
    removal_events: EventQueue<Removal>,
    bounds: Bounds,
    config: SimConfig,
    /// Number of completed ticks.
    pub(crate) tick: u64,
}

impl World {
    /// Build a world with default constants and seed its boundary edges.
    pub fn new(cell_size: FixedNum, cols: usize, rows: usize) -> Result<Self, WorldError> {
        Self::with_config(cell_size, cols, rows, SimConfig::default())
    }

    pub fn with_config(
        cell_size: FixedNum,
        cols: usize,
        rows: usize,
        config: SimConfig,
    ) -> Result<Self, WorldError> {
        let mut world = Self::empty(cell_size, cols, rows, config)?;
        world.seed_edges();
        Ok(world)
    }

    /// A world with the grid and bounds set up but no bodies.
    pub(crate) fn empty(
        cell_size: FixedNum,
        cols: usize,
        rows: usize,
        config: SimConfig,
    ) -> Result<Self, WorldError> {
        if cell_size <= FixedNum::ZERO || cols < MIN_GRID_CELLS || rows < MIN_GRID_CELLS {
            return Err(WorldError::InvalidGrid { cell_size, cols, rows });
        }
        let (Ok(last_col), Ok(last_row)) = (i64::try_from(cols - 1), i64::try_from(rows - 1)) else {
            return Err(WorldError::InvalidGrid { cell_size, cols, rows });
        };

        let bounds = Bounds {
            min: FixedVec2::splat(cell_size),
            max: FixedVec2::new(
                FixedNum::from_int(last_col) * cell_size,
                FixedNum::from_int(last_row) * cell_size,
            ),
        };

        Ok(Self {
            bodies: SlotMap::with_capacity_and_key(2 * (cols + rows)),
            order: BTreeMap::new(),
            next_ordinal: 0,
            grid: SpatialHash::new(cell_size, cols, rows),
            live_impacts: BTreeMap::new(),
            impact_events: EventQueue::new(),
            removal_events: EventQueue::new(),
            bounds,
            config,
            tick: 0,
        })
    }

    /// One inward-facing edge per perimeter cell. Corner cells belong to the
    /// vertical walls.
    fn seed_edges(&mut self) {
        let cell_size = self.grid.cell_size();
        let (cols, rows) = (self.grid.cols(), self.grid.rows());
        let one = FixedNum::ONE;

        for col in 0..cols {
            for row in 0..rows {
                let x = FixedNum::from_int(col as i64) * cell_size;
                let y = FixedNum::from_int(row as i64) * cell_size;

                let (normal, edge) = if col == 0 {
                    (FixedVec2::new(one, FixedNum::ZERO), cell_size)
                } else if col == cols - 1 {
                    (FixedVec2::new(-one, FixedNum::ZERO), x)
                } else if row == 0 {
                    (FixedVec2::new(FixedNum::ZERO, one), cell_size)
                } else if row == rows - 1 {
                    (FixedVec2::new(FixedNum::ZERO, -one), y)
                } else {
                    continue;
                };

                let half = cell_size.halve();
                let center = FixedVec2::new(x + half, y + half);
                self.insert(Body::edge(center, normal, edge), GridCell::new(col, row));
            }
        }
    }

    fn insert(&mut self, body: Body, cell: GridCell) -> BodyHandle {
        let ordinal = self.next_ordinal;
        self.next_ordinal += 1;

        let handle = self.bodies.insert(BodyEntry { body, cell, ordinal });
        self.order.insert(ordinal, handle);
        self.grid.insert(handle, cell);
        handle
    }

    // ========================================================================
    // Bodies
    // ========================================================================

    /// Add a body to the world.
    ///
    /// Round bodies outside [`bounds`](Self::bounds) are rejected and `None` is
    /// returned. Edges are accepted anywhere on the grid. The body's normal
    /// reaction is recomputed from this world's gravitation.
    pub fn materialize(&mut self, mut body: Body) -> Option<BodyHandle> {
        let position = body.position();
        if !body.is_edge() && !self.bounds.contains(position) {
            debug!("Rejected body at {:?}: outside bounds {:?}", position, self.bounds);
            return None;
        }
        let Some(cell) = self.grid.cell_of(position) else {
            debug!("Rejected edge at {:?}: outside the grid", position);
            return None;
        };

        body.apply_gravitation(self.config.gravitation);
        Some(self.insert(body, cell))
    }

    /// Remove a body and report it with [`RemovalCause::Annihilated`].
    ///
    /// Returns the body, or `None` for a stale handle. Contacts involving it
    /// are completed on the next tick.
    pub fn annihilate(&mut self, handle: BodyHandle) -> Option<Body> {
        self.remove(handle, RemovalCause::Annihilated)
    }

    pub(crate) fn remove(&mut self, handle: BodyHandle, cause: RemovalCause) -> Option<Body> {
        let entry = self.bodies.remove(handle)?;
        self.order.remove(&entry.ordinal);
        self.grid.remove(handle, entry.cell);
        self.removal_events.push(Removal {
            body: handle,
            cause,
            position: entry.body.position(),
            tick: self.tick,
        });
        Some(entry.body)
    }

    /// Teleport a round body, migrating its grid cell.
    ///
    /// A position outside the bounds is accepted; the body takes no part in
    /// collisions and is culled by the next tick. Returns `false` for edges and
    /// stale handles.
    pub fn relocate(&mut self, handle: BodyHandle, position: FixedVec2) -> bool {
        let Some(entry) = self.bodies.get_mut(handle) else {
            return false;
        };
        if entry.body.is_edge() {
            return false;
        }

        entry.body.relocate(position);
        if let Some(cell) = self.grid.cell_of(position) {
            self.grid.relocate(handle, entry.cell, cell);
            entry.cell = cell;
        }
        true
    }

    /// Replace a body's movement. Returns `false` for edges and stale handles.
    pub fn redirect(&mut self, handle: BodyHandle, movement: FixedVec2) -> bool {
        match self.bodies.get_mut(handle) {
            Some(entry) if !entry.body.is_edge() => {
                entry.body.redirect(movement);
                true
            }
            _ => false,
        }
    }

    // ========================================================================
    // Tick
    // ========================================================================

    /// Advance the simulation by one tick of `delta_time` seconds.
    #[profile(16, tick)]
    pub fn observe(&mut self, delta_time: FixedNum) {
        self.tick += 1;

        self.apply_elastic_forces(delta_time);
        self.apply_friction(delta_time);
        self.integrate(delta_time);

        crate::profile_log!(
            self.tick,
            "[OBSERVE] tick {} | bodies: {} | live impacts: {} | grid entries: {}",
            self.tick,
            self.bodies.len(),
            self.live_impacts.len(),
            self.grid.total_entries()
        );
    }

    /// Advance by the configured tick delta.
    pub fn step(&mut self) {
        self.observe(self.config.tick_delta);
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn body(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies.get(handle).map(|entry| &entry.body)
    }

    /// Every live body, edges included, in the order they were materialized.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &Body)> + '_ {
        self.order
            .values()
            .filter_map(|&handle| self.bodies.get(handle).map(|entry| (handle, &entry.body)))
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Grid cell a body is registered in.
    pub fn cell_of(&self, handle: BodyHandle) -> Option<GridCell> {
        self.bodies.get(handle).map(|entry| entry.cell)
    }

    /// Contact key for two distinct live bodies, as carried by [`Impact`]s.
    pub fn pair(&self, a: BodyHandle, b: BodyHandle) -> Option<BodyPair> {
        if a == b {
            return None;
        }
        Some(BodyPair::new(a, self.bodies.get(a)?, b, self.bodies.get(b)?))
    }

    pub fn grid(&self) -> &SpatialHash {
        &self.grid
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Contacts that have started and not yet ended, in pair order.
    pub fn live_impacts(&self) -> impl Iterator<Item = (BodyPair, &ImpactRecord)> {
        self.live_impacts.iter().map(|(pair, record)| (*pair, record))
    }

    /// Completed contacts. Clone the queue to drain it from another thread.
    pub fn impacts(&self) -> &EventQueue<Impact> {
        &self.impact_events
    }

    /// Bodies that left the world. Clone the queue to drain it from another thread.
    pub fn removals(&self) -> &EventQueue<Removal> {
        &self.removal_events
    }
}
