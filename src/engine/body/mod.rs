//! Simulation bodies.
//!
//! A [`Body`] holds the state every body shares (position, movement, mass,
//! elasticity) plus a [`Shape`] carrying the shape-specific fields. Collision
//! code dispatches by matching on the shape.
//!
//! Bodies are values; their identity inside a world is the [`BodyHandle`]
//! returned when they are materialized.

use serde::{Deserialize, Serialize};

use slotmap::new_key_type;

use crate::engine::fixed_math::{FixedNum, FixedVec2};

pub use shape::{Shape, ShapeCode};

mod shape;
#[cfg(test)]
mod tests;

new_key_type! {
    /// Identity of a body inside a [`World`](crate::engine::world::World).
    ///
    /// A generational slot key: once its body is removed the handle never
    /// resolves again, even after the slot is reused.
    pub struct BodyHandle;
}

/// Speed at or below which a body is brought to a full stop.
///
/// Suppresses endless near-zero drift. Tuned by hand; it has no physical derivation.
pub const STOP_SPEED: FixedNum = FixedNum::from_raw(1_000);

/// Standard gravity, used for the normal reaction until a world supplies its own.
pub const STANDARD_GRAVITY: FixedNum = FixedNum::from_raw(9_806_650);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Body {
    position: FixedVec2,
    movement: FixedVec2,
    direction: FixedVec2,
    speed: FixedNum,
    mass: FixedNum,
    inverse_mass: FixedNum,
    /// `mass * gravitation`, the normal force friction scales with.
    normal_reaction: FixedNum,
    elasticity: FixedNum,
    shape: Shape,
}

impl Body {
    /// A circle of `radius` centered at `position`, at rest.
    ///
    /// # Panics
    ///
    /// Panics unless `mass > 0`, `radius > 0` and `elasticity >= 0`.
    pub fn round(
        mass: FixedNum,
        position: FixedVec2,
        elasticity: FixedNum,
        radius: FixedNum,
    ) -> Self {
        assert!(mass > FixedNum::ZERO, "body mass must be positive, got {mass}");
        assert!(radius > FixedNum::ZERO, "body radius must be positive, got {radius}");
        assert!(
            elasticity >= FixedNum::ZERO,
            "body elasticity must not be negative, got {elasticity}"
        );

        Self {
            position,
            movement: FixedVec2::ZERO,
            direction: FixedVec2::ZERO,
            speed: FixedNum::ZERO,
            mass,
            inverse_mass: FixedNum::ONE / mass,
            normal_reaction: mass * STANDARD_GRAVITY,
            elasticity,
            shape: Shape::Round { radius },
        }
    }

    /// One of the world walls: immovable, with an inward unit `normal` and the
    /// wall's coordinate `edge` along that normal's axis.
    pub fn edge(position: FixedVec2, normal: FixedVec2, edge: FixedNum) -> Self {
        Self {
            position,
            movement: FixedVec2::ZERO,
            direction: FixedVec2::ZERO,
            speed: FixedNum::ZERO,
            mass: FixedNum::MAX,
            inverse_mass: FixedNum::ZERO,
            normal_reaction: FixedNum::ZERO,
            elasticity: FixedNum::ZERO,
            shape: Shape::Edge { normal, edge },
        }
    }

    pub fn position(&self) -> FixedVec2 { self.position }
    pub fn movement(&self) -> FixedVec2 { self.movement }
    pub fn direction(&self) -> FixedVec2 { self.direction }
    pub fn speed(&self) -> FixedNum { self.speed }
    pub fn mass(&self) -> FixedNum { self.mass }
    pub fn inverse_mass(&self) -> FixedNum { self.inverse_mass }
    pub fn normal_reaction(&self) -> FixedNum { self.normal_reaction }
    pub fn elasticity(&self) -> FixedNum { self.elasticity }
    pub fn shape(&self) -> Shape { self.shape }

    pub fn code(&self) -> ShapeCode {
        self.shape.code()
    }

    pub fn is_edge(&self) -> bool {
        matches!(self.shape, Shape::Edge { .. })
    }

    pub fn radius(&self) -> Option<FixedNum> {
        match self.shape {
            Shape::Round { radius } => Some(radius),
            Shape::Edge { .. } => None,
        }
    }

    /// A body is static when its movement is exactly zero. Edges always are.
    pub fn is_static(&self) -> bool {
        self.movement == FixedVec2::ZERO
    }

    /// Recompute the normal reaction for a world's gravitation. Edges keep zero.
    pub(crate) fn apply_gravitation(&mut self, gravitation: FixedNum) {
        if !self.is_edge() {
            self.normal_reaction = self.mass * gravitation;
        }
    }

    /// Replace the movement vector and derive speed and direction from it.
    ///
    /// Movement at or below [`STOP_SPEED`] stops the body completely. Otherwise
    /// `movement` is stored as given; `direction` is its unit vector, so
    /// `direction * speed` matches it only to within a few raw units.
    pub fn redirect(&mut self, movement: FixedVec2) {
        if movement == FixedVec2::ZERO {
            self.halt();
            return;
        }

        let speed = movement.length();
        if speed <= STOP_SPEED {
            self.halt();
            return;
        }

        self.speed = speed;
        self.direction = movement / speed;
        self.movement = movement;
    }

    /// Apply `force` for `delta_time`: `dv = F * dt / m`.
    pub fn add_force(&mut self, force: FixedVec2, delta_time: FixedNum) {
        let delta_speed = force * (delta_time * self.inverse_mass);
        self.redirect(self.movement + delta_speed);
    }

    /// Apply sliding friction `-mu * N` against the current direction.
    ///
    /// Friction only ever slows a body down: when the velocity change would
    /// exceed the current movement the body stops instead of reversing.
    pub fn add_friction_force(&mut self, friction_multiplier: FixedNum, delta_time: FixedNum) {
        if self.is_static() {
            return;
        }

        let friction = -(friction_multiplier * self.normal_reaction);
        let delta_speed = self.direction * (friction * delta_time * self.inverse_mass);

        if self.movement.length_squared() < delta_speed.length_squared() {
            self.stop();
            return;
        }

        self.redirect(self.movement + delta_speed);
    }

    /// Integrate position over `delta_time`. Static bodies are skipped.
    pub fn advance(&mut self, delta_time: FixedNum) {
        if self.is_static() {
            return;
        }
        self.position += self.movement * delta_time;
    }

    pub fn relocate(&mut self, position: FixedVec2) {
        self.position = position;
    }

    pub fn stop(&mut self) {
        self.redirect(FixedVec2::ZERO);
    }

    fn halt(&mut self) {
        self.speed = FixedNum::ZERO;
        self.direction = FixedVec2::ZERO;
        self.movement = FixedVec2::ZERO;
    }
}
