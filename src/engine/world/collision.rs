/// Collision detection and resolution.
///
/// This module handles:
/// - The broad-phase scan over each body's 3×3 cell neighborhood
/// - Narrow-phase tests for circle-circle and circle-edge pairs
/// - Spring-like elastic forces proportional to penetration
/// - Contact bookkeeping that reports each contact once, when it ends

use rustc_hash::FxHashSet;
use tracing::{error, trace};

use crate::engine::body::{Body, BodyHandle, Shape};
use crate::engine::fixed_math::{FixedNum, FixedVec2};
use crate::engine::spatial_hash::GridCell;
use super::{BodyPair, ImpactRecord, World};

/// Result of a narrow-phase test on an overlapping pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Contact {
    /// Unit vector from the pair's first body toward its second.
    pub axis: FixedVec2,
    /// Overlap depth along `axis`.
    pub penetration: FixedNum,
    /// Elastic force on each body, in pair order.
    pub forces: [FixedVec2; 2],
}

/// Narrow-phase test for two bodies given in pair order.
///
/// Returns `None` when they do not overlap. Coincident circles have no
/// defined axis and are treated as not overlapping.
pub fn detect_contact(first: &Body, second: &Body) -> Option<Contact> {
    match (first.shape(), second.shape()) {
        (Shape::Round { radius: first_radius }, Shape::Round { radius: second_radius }) => {
            circle_circle(first, first_radius, second, second_radius)
        }
        (Shape::Edge { normal, edge }, Shape::Round { radius }) => {
            circle_edge(second, radius, normal, edge)
        }
        (Shape::Round { radius }, Shape::Edge { normal, edge }) => {
            // Pairs put edges first; flip back if called the other way round
            circle_edge(first, radius, normal, edge).map(|contact| Contact {
                axis: -contact.axis,
                penetration: contact.penetration,
                forces: [contact.forces[1], contact.forces[0]],
            })
        }
        (Shape::Edge { .. }, Shape::Edge { .. }) => {
            error!("Edge-edge pair reached the narrow phase");
            debug_assert!(false, "edges never collide with edges");
            None
        }
    }
}

fn circle_circle(
    first: &Body,
    first_radius: FixedNum,
    second: &Body,
    second_radius: FixedNum,
) -> Option<Contact> {
    let separation = second.position() - first.position();
    let distance_squared = separation.length_squared();
    let min_distance = first_radius + second_radius;

    if distance_squared == FixedNum::ZERO || distance_squared >= min_distance * min_distance {
        return None;
    }

    let distance = distance_squared.sqrt();
    let axis = separation / distance;
    let penetration = min_distance - distance;

    // Each body takes the share of the penetration proportional to the other's elasticity
    let first_elasticity = first.elasticity();
    let second_elasticity = second.elasticity();
    let total_elasticity = first_elasticity + second_elasticity;
    if total_elasticity == FixedNum::ZERO {
        return Some(Contact { axis, penetration, forces: [FixedVec2::ZERO; 2] });
    }

    let first_share = penetration * second_elasticity / total_elasticity;
    let second_share = penetration * first_elasticity / total_elasticity;

    Some(Contact {
        axis,
        penetration,
        forces: [
            -(axis * (first_elasticity * first_share)),
            axis * (second_elasticity * second_share),
        ],
    })
}

/// `normal` points into the world; `edge` is the wall coordinate along its axis.
fn circle_edge(
    round: &Body,
    radius: FixedNum,
    normal: FixedVec2,
    edge: FixedNum,
) -> Option<Contact> {
    let distance = round.position().dot(normal) - edge * (normal.x + normal.y);
    let penetration = radius - distance;

    if penetration <= FixedNum::ZERO {
        return None;
    }

    Some(Contact {
        axis: normal,
        penetration,
        forces: [FixedVec2::ZERO, normal * (round.elasticity() * penetration)],
    })
}

// ============================================================================
// Elastic-force pass
// ============================================================================

impl World {
    /// Apply elastic forces to every overlapping pair and complete contacts
    /// that ended.
    ///
    /// Bodies are scanned in materialization order. A round body with a lower
    /// ordinal has already scanned its own neighborhood, so it is skipped as a
    /// candidate and each pair is resolved at most once per tick.
    pub(crate) fn apply_elastic_forces(&mut self, delta_time: FixedNum) {
        let mut touching: FxHashSet<BodyPair> = FxHashSet::default();
        let mut candidates: Vec<(BodyHandle, GridCell)> = Vec::new();
        let scan: Vec<BodyHandle> = self.order.values().copied().collect();

        for handle in scan {
            let Some(entry) = self.bodies.get(handle) else {
                continue;
            };
            // Bodies relocated outside the bounds only wait to be culled
            if entry.body.is_edge() || !self.bounds.contains(entry.body.position()) {
                continue;
            }
            let (cell, ordinal) = (entry.cell, entry.ordinal);

            self.grid.query_neighbors(handle, cell, &mut candidates);
            // Cell contents are in insertion order; resolve in ordinal order so
            // the outcome depends only on the bodies themselves
            let bodies = &self.bodies;
            candidates.sort_unstable_by_key(|&(other, _)| bodies.get(other).map(|e| e.ordinal));

            for &(other, other_cell) in &candidates {
                let Some(other_entry) = self.bodies.get(other) else {
                    continue;
                };
                if other_entry.body.is_edge() {
                    // Diagonal walls are only reachable through an axis-aligned one
                    if !other_cell.is_axis_aligned_with(cell) {
                        continue;
                    }
                } else if other_entry.ordinal < ordinal || !self.bounds.contains(other_entry.body.position()) {
                    continue;
                }

                let Some(pair) = self.pair(handle, other) else {
                    continue;
                };
                if self.resolve_pair(pair, delta_time) {
                    touching.insert(pair);
                }
            }
        }

        self.complete_impacts(&touching);
    }

    /// Narrow phase plus force application for one pair. Returns whether the
    /// bodies are in contact.
    fn resolve_pair(&mut self, pair: BodyPair, delta_time: FixedNum) -> bool {
        let (Some(first), Some(second)) = (self.bodies.get(pair.first()), self.bodies.get(pair.second()))
        else {
            return false;
        };
        let Some(contact) = detect_contact(&first.body, &second.body) else {
            return false;
        };

        if !self.live_impacts.contains_key(&pair) {
            let approach_speeds = [
                first.body.movement().project_onto_normal(contact.axis),
                second.body.movement().project_onto_normal(contact.axis),
            ];
            trace!("Contact {:?} started on tick {}", pair, self.tick);
            self.live_impacts.insert(
                pair,
                ImpactRecord { approach_speeds, axis: contact.axis, started_tick: self.tick },
            );
        }

        for (handle, force) in [pair.first(), pair.second()].into_iter().zip(contact.forces) {
            if force == FixedVec2::ZERO {
                continue;
            }
            if let Some(entry) = self.bodies.get_mut(handle) {
                entry.body.add_force(force, delta_time);
            }
        }
        true
    }

    /// Move every live contact not seen this tick to the impact queue, in pair order.
    fn complete_impacts(&mut self, touching: &FxHashSet<BodyPair>) {
        let tick = self.tick;
        let events = &self.impact_events;

        self.live_impacts.retain(|pair, record| {
            if touching.contains(pair) {
                return true;
            }
            trace!("Contact {:?} ended on tick {}", pair, tick);
            events.push(record.complete(*pair, tick));
            false
        });
    }
}
