/// Friction and integration passes.
///
/// This module handles:
/// - Sliding friction on moving bodies
/// - Position integration and grid cell migration
/// - Culling bodies that left the occupiable bounds

use tracing::debug;

use crate::engine::fixed_math::FixedNum;
use super::{RemovalCause, World};

impl World {
    /// Slow down every moving body by `friction_multiplier * normal_reaction`.
    pub(crate) fn apply_friction(&mut self, delta_time: FixedNum) {
        let friction_multiplier = self.config.friction_multiplier;

        for &handle in self.order.values() {
            let Some(entry) = self.bodies.get_mut(handle) else {
                continue;
            };
            if entry.body.is_edge() || entry.body.is_static() {
                continue;
            }
            entry.body.add_friction_force(friction_multiplier, delta_time);
        }
    }

    /// Move bodies, migrate their grid cells and remove those out of bounds.
    ///
    /// A body is culled when it ends the tick outside the bounds or started it
    /// there, so a body relocated outside the world is removed on the next tick
    /// even if it is static. Removal is deferred until the scan is done.
    pub(crate) fn integrate(&mut self, delta_time: FixedNum) {
        let mut out_of_bounds = Vec::new();

        for &handle in self.order.values() {
            let Some(entry) = self.bodies.get_mut(handle) else {
                continue;
            };
            if entry.body.is_edge() {
                continue;
            }
            let started_inside = self.bounds.contains(entry.body.position());
            entry.body.advance(delta_time);

            let position = entry.body.position();
            if !started_inside || !self.bounds.contains(position) {
                out_of_bounds.push(handle);
                continue;
            }

            if let Some(cell) = self.grid.cell_of(position) {
                if cell != entry.cell {
                    self.grid.relocate(handle, entry.cell, cell);
                    entry.cell = cell;
                }
            }
        }

        for handle in out_of_bounds {
            if let Some(body) = self.remove(handle, RemovalCause::OutOfBounds) {
                debug!("Body {:?} left the world at {:?}", handle, body.position());
            }
        }
    }
}
