#![allow(dead_code)]

use kestrel::engine::{Body, BodyHandle, FixedNum, FixedVec2, SimConfig, World};
use tracing_subscriber::EnvFilter;

/// Route engine logs to the test harness. Filter with `RUST_LOG=kestrel=trace`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn fx(s: &str) -> FixedNum {
    s.parse().expect("valid literal")
}

pub fn vec(x: &str, y: &str) -> FixedVec2 {
    FixedVec2::new(fx(x), fx(y))
}

pub fn frictionless() -> SimConfig {
    SimConfig { friction_multiplier: FixedNum::ZERO, ..SimConfig::default() }
}

/// Unit-mass, unit-radius ball with elasticity 100.
pub fn ball_at(x: &str, y: &str) -> Body {
    Body::round(FixedNum::ONE, vec(x, y), fx("100"), FixedNum::ONE)
}

/// A random round body inside a `cols × rows` world of cell size 10, clear of the walls.
pub fn random_body(rng: &mut fastrand::Rng, cols: usize, rows: usize) -> Body {
    let max_x = (cols as i64 - 2) * 10_000_000;
    let max_y = (rows as i64 - 2) * 10_000_000;

    Body::round(
        FixedNum::from_raw(rng.i64(500_000..=3_000_000)),
        FixedVec2::new(
            FixedNum::from_raw(rng.i64(15_000_000..=max_x)),
            FixedNum::from_raw(rng.i64(15_000_000..=max_y)),
        ),
        FixedNum::from_raw(rng.i64(10_000_000..=200_000_000)),
        FixedNum::from_raw(rng.i64(500_000..=2_000_000)),
    )
}

pub fn random_movement(rng: &mut fastrand::Rng) -> FixedVec2 {
    FixedVec2::new(
        FixedNum::from_raw(rng.i64(-20_000_000..=20_000_000)),
        FixedNum::from_raw(rng.i64(-20_000_000..=20_000_000)),
    )
}

/// Fill a `cols × rows` world of cell size 10 with `count` random moving bodies.
pub fn random_world(rng: &mut fastrand::Rng, cols: usize, rows: usize, count: usize) -> (World, Vec<BodyHandle>) {
    let mut world = World::new(FixedNum::from_int(10), cols, rows).expect("valid grid");
    let mut handles = Vec::with_capacity(count);

    for _ in 0..count {
        let handle = world.materialize(random_body(rng, cols, rows)).expect("inside bounds");
        world.redirect(handle, random_movement(rng));
        handles.push(handle);
    }

    (world, handles)
}
