#![allow(dead_code)]

use bytemuck::{Pod, Zeroable};

use archegraph::engine::registry::ComponentEntry;
use archegraph::engine::types::ComponentID;
use archegraph::engine::world::World;

pub const POSITION: ComponentID = 0;
pub const VELOCITY: ComponentID = 1;
pub const TAG: ComponentID = 2;

pub const AGENTS_SMALL: usize = 10_000;
pub const AGENTS_MED: usize = 100_000;

#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Velocity {
    pub dx: f32,
    pub dy: f32,
    pub dz: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Tag {
    pub id: u32,
}

pub fn make_world(capacity: usize) -> World {
    let _ = env_logger::try_init();

    let mut world = World::new(capacity);
    world.register(ComponentEntry::of::<Position>(POSITION));
    world.register(ComponentEntry::of::<Velocity>(VELOCITY));
    world.register(ComponentEntry::of::<Tag>(TAG));
    world
}

/// Populates `count` entities, half with velocity, and seeds their
/// positions.
pub fn populate(world: &mut World, count: usize) -> Vec<archegraph::engine::entity::Entity> {
    let mut entities = Vec::with_capacity(count);
    for i in 0..count {
        let entity = if i % 2 == 0 {
            world.new_entity(&[POSITION, VELOCITY])
        } else {
            world.new_entity(&[POSITION])
        };
        unsafe {
            *(world.component(entity, POSITION) as *mut Position) =
                Position { x: i as f32, y: 0.0, z: 0.0 };
        }
        entities.push(entity);
    }
    entities
}
