mod common;

use common::{fx, init_tracing, random_world};
use kestrel::engine::world::{Impact, Removal, World};

fn run(world: &mut World, ticks: usize) -> (Vec<Impact>, Vec<Removal>) {
    let mut impacts = Vec::new();
    let mut removals = Vec::new();
    for _ in 0..ticks {
        world.observe(fx("0.05"));
        impacts.extend(world.impacts().drain());
        removals.extend(world.removals().drain());
    }
    (impacts, removals)
}

#[test]
fn test_identical_worlds_stay_identical() {
    init_tracing();
    let (mut world1, _) = random_world(&mut fastrand::Rng::with_seed(42), 20, 20, 80);
    let (mut world2, _) = random_world(&mut fastrand::Rng::with_seed(42), 20, 20, 80);

    for round in 0..10 {
        let events1 = run(&mut world1, 20);
        let events2 = run(&mut world2, 20);

        assert_eq!(events1, events2, "event streams diverged in round {round}");
        assert_eq!(world1.snapshot(), world2.snapshot(), "state diverged in round {round}");
    }

    assert_eq!(world1.tick(), 200);
}

#[test]
fn test_scenario_produces_contacts() {
    let (mut world, _) = random_world(&mut fastrand::Rng::with_seed(7), 20, 20, 80);
    let (impacts, _) = run(&mut world, 100);

    assert!(!impacts.is_empty(), "dense random scenario should produce contacts");
    for impact in &impacts {
        assert!(impact.started_tick < impact.ended_tick);
    }
}

#[test]
fn test_restored_snapshot_continues_identically() {
    init_tracing();
    let (mut original, _) = random_world(&mut fastrand::Rng::with_seed(99), 16, 16, 50);
    run(&mut original, 30);

    let path = std::env::temp_dir().join(format!("kestrel_snapshot_{}.bin", std::process::id()));
    original.save_snapshot(&path).expect("save snapshot");
    let mut restored = World::load_snapshot(&path).expect("load snapshot");
    let _ = std::fs::remove_file(&path);

    assert_eq!(restored.tick(), original.tick());
    assert_eq!(restored.body_count(), original.body_count());
    assert_eq!(
        restored.live_impacts().collect::<Vec<_>>(),
        original.live_impacts().collect::<Vec<_>>()
    );

    let continued = run(&mut original, 50);
    let replayed = run(&mut restored, 50);

    assert_eq!(continued, replayed);
    assert_eq!(original.snapshot(), restored.snapshot());
}

#[test]
fn test_missing_snapshot_file_is_an_io_error() {
    let result = World::load_snapshot("no/such/snapshot.bin");
    assert!(matches!(result, Err(kestrel::engine::world::SnapshotError::Io(_))));
}
