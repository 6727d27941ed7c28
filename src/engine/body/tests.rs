use super::*;

fn fx(s: &str) -> FixedNum {
    s.parse().expect("valid literal")
}

fn vec(x: &str, y: &str) -> FixedVec2 {
    FixedVec2::new(fx(x), fx(y))
}

fn ball(mass: &str) -> Body {
    Body::round(fx(mass), vec("10", "10"), fx("100"), fx("1"))
}

#[test]
fn test_round_body_precomputes_mass_terms() {
    let body = ball("2");

    assert_eq!(body.inverse_mass(), fx("0.5"));
    assert_eq!(body.normal_reaction(), fx("19.6133"));
    assert_eq!(body.code(), ShapeCode::Round);
    assert_eq!(body.radius(), Some(fx("1")));
    assert!(body.is_static());
    assert!(!body.is_edge());
}

#[test]
#[should_panic(expected = "body mass must be positive")]
fn test_round_body_rejects_zero_mass() {
    let _ = Body::round(FixedNum::ZERO, FixedVec2::ZERO, FixedNum::ZERO, FixedNum::ONE);
}

#[test]
fn test_edge_is_immovable() {
    let mut edge = Body::edge(vec("5", "5"), FixedVec2::X, fx("10"));

    edge.add_force(vec("1000", "1000"), fx("1"));

    assert!(edge.is_static());
    assert!(edge.is_edge());
    assert_eq!(edge.inverse_mass(), FixedNum::ZERO);
    assert_eq!(edge.radius(), None);
    assert_eq!(edge.code(), ShapeCode::Edge);
    assert!(ShapeCode::Edge < ShapeCode::Round);
}

#[test]
fn test_redirect_sets_speed_and_direction() {
    let mut body = ball("1");
    body.redirect(vec("3", "4"));

    assert_eq!(body.speed(), fx("5"));
    assert_eq!(body.direction(), vec("0.6", "0.8"));
    assert_eq!(body.movement(), vec("3", "4"));
}

#[test]
fn test_redirect_to_zero_stops_body() {
    let mut body = ball("1");
    body.redirect(vec("3", "4"));
    body.redirect(FixedVec2::ZERO);

    assert!(body.is_static());
    assert_eq!(body.speed(), FixedNum::ZERO);
    assert_eq!(body.direction(), FixedVec2::ZERO);
}

#[test]
fn test_redirect_below_deadband_is_exactly_static() {
    let mut rng = fastrand::Rng::with_seed(11);

    for _ in 0..1_000 {
        let limit = 700;
        let movement = FixedVec2::new(
            FixedNum::from_raw(rng.i64(-limit..=limit)),
            FixedNum::from_raw(rng.i64(-limit..=limit)),
        );
        let mut body = ball("1");
        body.redirect(vec("1", "0"));
        body.redirect(movement);

        assert_eq!(body.speed(), FixedNum::ZERO, "movement {movement:?}");
        assert_eq!(body.direction(), FixedVec2::ZERO);
        assert_eq!(body.movement(), FixedVec2::ZERO);
    }

    let mut body = ball("1");
    body.redirect(FixedVec2::new(STOP_SPEED, FixedNum::ZERO));
    assert!(body.is_static(), "a speed equal to the deadband also stops");
}

#[test]
fn test_redirect_keeps_unit_direction() {
    let mut rng = fastrand::Rng::with_seed(12);
    let one = FixedNum::ONE.raw();

    for _ in 0..1_000 {
        let movement = FixedVec2::new(
            FixedNum::from_raw(rng.i64(-50 * one..=50 * one)),
            FixedNum::from_raw(rng.i64(-50 * one..=50 * one)),
        );
        if movement.length() <= FixedNum::ONE {
            continue;
        }

        let mut body = ball("1");
        body.redirect(movement);

        let unit_error = (body.direction().length() - FixedNum::ONE).abs();
        assert!(unit_error <= FixedNum::from_raw(10), "direction {:?}", body.direction());
        let rebuilt = body.direction() * body.speed();
        let drift = (rebuilt - body.movement()).abs();
        assert!(drift.x <= FixedNum::from_raw(10) && drift.y <= FixedNum::from_raw(10), "{rebuilt:?}");
        assert!(body.speed() > FixedNum::ZERO);
    }
}

#[test]
fn test_redirect_stores_movement_unchanged() {
    let mut body = ball("1");
    let movement = vec("2", "-1");

    body.redirect(movement);
    assert_eq!(body.movement(), movement);

    for _ in 0..1_000 {
        body.redirect(body.movement());
    }
    assert_eq!(body.movement(), movement, "re-deriving speed and direction must not shrink movement");
    assert_eq!(body.speed(), movement.length());
}

#[test]
fn test_zero_friction_keeps_movement() {
    let mut body = ball("1");
    body.redirect(vec("1.234567", "-7.654321"));

    for _ in 0..500 {
        body.add_friction_force(FixedNum::ZERO, fx("0.05"));
    }

    assert_eq!(body.movement(), vec("1.234567", "-7.654321"));
}

#[test]
fn test_add_force_scales_by_inverse_mass() {
    let mut body = ball("2");
    body.add_force(vec("10", "0"), fx("0.5"));

    assert_eq!(body.movement(), vec("2.5", "0"));
}

#[test]
fn test_friction_slows_without_turning() {
    let mut body = ball("1");
    body.redirect(vec("1", "0"));

    body.add_friction_force(fx("0.5"), fx("0.1"));

    assert!(body.speed() < fx("0.52") && body.speed() > fx("0.5"), "speed {}", body.speed());
    assert_eq!(body.movement().y, FixedNum::ZERO);
    assert!(body.movement().x > FixedNum::ZERO);
}

#[test]
fn test_friction_stops_instead_of_reversing() {
    let mut body = ball("1");
    body.redirect(vec("0.1", "0"));

    body.add_friction_force(fx("0.5"), fx("0.1"));

    assert!(body.is_static());
}

#[test]
fn test_friction_never_reverses_direction() {
    let mut rng = fastrand::Rng::with_seed(13);
    let one = FixedNum::ONE.raw();

    for _ in 0..1_000 {
        let mut body = ball("1");
        body.redirect(FixedVec2::new(
            FixedNum::from_raw(rng.i64(-20 * one..=20 * one)),
            FixedNum::from_raw(rng.i64(-20 * one..=20 * one)),
        ));
        let before_speed = body.speed();
        let before_direction = body.direction();

        let mu = FixedNum::from_raw(rng.i64(0..=one));
        let dt = FixedNum::from_raw(rng.i64(1..=one / 10));
        body.add_friction_force(mu, dt);

        assert!(body.speed() <= before_speed);
        assert!(body.movement().dot(before_direction) >= FixedNum::ZERO);
    }
}

#[test]
fn test_advance_integrates_position() {
    let mut body = ball("1");
    body.redirect(vec("2", "-1"));

    body.advance(fx("0.5"));

    assert_eq!(body.position(), vec("11", "9.5"));
}

#[test]
fn test_static_body_does_not_advance() {
    let mut body = ball("1");
    body.advance(fx("1"));
    assert_eq!(body.position(), vec("10", "10"));

    body.relocate(vec("3", "3"));
    assert_eq!(body.position(), vec("3", "3"));
}

#[test]
fn test_gravitation_override_skips_edges() {
    let mut body = ball("2");
    body.apply_gravitation(fx("10"));
    assert_eq!(body.normal_reaction(), fx("20"));

    let mut edge = Body::edge(FixedVec2::ZERO, FixedVec2::Y, fx("1"));
    edge.apply_gravitation(fx("10"));
    assert_eq!(edge.normal_reaction(), FixedNum::ZERO);
}
