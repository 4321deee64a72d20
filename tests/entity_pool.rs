use archegraph::engine::entity::{make_entity, Entity, EntityPool};
use archegraph::engine::types::{FLAG_COMPONENT, FLAG_SINGLETON};

#[test]
fn allocation_starts_after_the_sentinel() {
    let mut pool = EntityPool::with_capacity(10);

    let entity = pool.spawn();

    assert_eq!(entity.index(), 1, "expected spawn() to return index 1");
    assert_eq!(entity.generation(), 0, "expected spawn() to return generation 0");

    assert!(pool.is_alive(entity));
    assert!(pool.recycle(entity));

    assert!(!pool.is_alive(entity), "recycled entity must not be alive");
    assert!(!pool.recycle(entity), "second recycle must fail");
}

#[test]
fn sentinel_slot_is_never_alive() {
    let mut pool = EntityPool::with_capacity(4);
    let zero = make_entity(0, 0);

    assert!(!pool.is_alive(zero));
    assert!(!pool.recycle(zero));

    pool.spawn();
    assert!(!pool.is_alive(zero));
}

#[test]
fn liveness_ignores_flags() {
    let mut pool = EntityPool::with_capacity(2);
    let entity = pool.spawn();

    assert!(pool.is_alive(entity));
    assert!(pool.is_alive(entity.disable()));
    assert!(pool.is_alive(entity.instance_of(true)));
    assert!(pool.is_alive(entity.child_of(true)));
    assert!(!pool.is_alive(entity.with_index(1000)));
}

#[test]
fn recycling_is_lifo_and_bumps_generations() {
    let count = 1000u64;
    let mut pool = EntityPool::with_capacity(0);

    let mut entities = Vec::new();
    for _ in 0..count {
        entities.push(pool.spawn());
    }

    for entity in &entities {
        assert!(pool.recycle(*entity), "expected recycle to accept live entities");
    }

    // IDs come back from last to first recycled.
    for expected in entities.iter().rev() {
        let entity = pool.spawn();
        assert_eq!(entity.index(), expected.index());
        assert_eq!(entity.generation(), expected.generation() + 1);
    }
}

#[test]
fn component_handles_allocate_like_plain_entities() {
    let mut pool = EntityPool::with_capacity(8);

    let entity = pool.spawn_component();
    assert!(entity.is_component());
    assert_eq!(entity.flags(), FLAG_COMPONENT);
    assert_eq!(entity.index(), 1);

    // The pool stores the canonical, flag-free value.
    assert!(pool.is_alive(entity));
    assert!(pool.is_alive(entity.without_flags()));
    assert!(pool.recycle(entity));
    assert!(!pool.is_alive(entity));
}

#[test]
fn flag_accessors_roundtrip() {
    let entity = make_entity(42, 3);

    assert!(entity.child_of(true).is_child());
    assert!(!entity.child_of(true).child_of(false).is_child());
    assert!(entity.instance_of(true).is_instance());
    assert!(entity.disable().is_disabled());
    assert!(!entity.disable().enable().is_disabled());

    let component = entity.as_component();
    assert!(component.is_component());
    assert_eq!(component.index(), 42);
    assert_eq!(component.generation(), 0);

    let singleton = entity.as_singleton();
    assert!(singleton.is_component());
    assert!(singleton.is_singleton());
    assert_eq!(singleton.flags(), FLAG_COMPONENT | FLAG_SINGLETON);

    assert_eq!(entity.child_of(true).disable().without_flags(), entity);
}

#[test]
fn stale_handles_never_match_reused_slots() {
    let mut pool = EntityPool::with_capacity(4);

    let first = pool.spawn();
    assert!(pool.recycle(first));

    let second = pool.spawn();
    assert_eq!(second.index(), first.index());
    assert_ne!(second, first);

    assert!(pool.is_alive(second));
    assert!(!pool.is_alive(first), "stale generation must not match");
}

#[test]
fn stats_track_usage() {
    let mut pool = EntityPool::with_capacity(16);

    let stats = pool.stats();
    assert_eq!((stats.total, stats.in_use, stats.recycled), (0, 0, 0));

    let a = pool.spawn();
    let b = pool.spawn();
    pool.spawn();

    let stats = pool.stats();
    assert_eq!((stats.total, stats.in_use, stats.recycled), (3, 3, 0));

    pool.recycle(b);
    let stats = pool.stats();
    assert_eq!((stats.total, stats.in_use, stats.recycled), (3, 2, 1));

    // Unknown handles do not disturb the counters.
    pool.recycle(Entity(a.0).with_index(999));
    let stats = pool.stats();
    assert_eq!((stats.total, stats.in_use, stats.recycled), (3, 2, 1));
}
