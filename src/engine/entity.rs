//! # Entity Identity and Pooling
//!
//! This module defines the entity identifier layout and the generational
//! free-list pool that issues and recycles identifiers.
//!
//! ## Purpose
//! Entities are lightweight, opaque identifiers that name a row in archetype
//! storage. This module is responsible for:
//!
//! - Packing identifier, generation, and flag bits into one 64-bit value
//! - Issuing fresh identifiers and recycling released ones
//! - Detecting stale identifiers via generation counters
//!
//! ## Entity Model
//! An [`Entity`] packs three fields into a single integer:
//!
//! - An **identifier**, indexing the slot in the pool
//! - A **generation**, incremented on recycling to invalidate stale handles
//! - **Flags**, reserved relationship and lifecycle bits with no behavior in
//!   the archetype graph
//!
//! Liveness comparison always strips the flags: two handles naming the same
//! slot and generation are the same entity regardless of flag decoration.
//!
//! ## Free-List Encoding
//! The pool keeps recycled slots in an implicit linked list threaded through
//! the identifier field of the slots themselves, so no side buffer is
//! needed:
//!
//! - A *live* slot stores its own index plus the current generation.
//! - A *free* slot stores the index of the next free slot in its identifier
//!   field, and the already-incremented generation to hand out on reuse.
//!
//! ## Invariants
//! - Slot 0 is a sentinel and never issued.
//! - Every identifier observed outside the pool has a slot whose stored
//!   value equals the identifier with flags stripped.
//! - The free chain starting at `next_free` has exactly `available` links.

use crate::engine::types::{
    EntityID, GenerationID, ENTITY_POOL_INITIAL_CAPACITY, FLAGS_MASK, FLAG_CHILD_OF,
    FLAG_COMPONENT, FLAG_DISABLED, FLAG_INSTANCE_OF, FLAG_SINGLETON, GENERATION_MASK,
    GENERATION_SHIFT, IDENTIFIER_MASK,
};

/// Opaque, versioned identifier for an ECS entity.
///
/// ## Representation
/// Internally, an `Entity` packs three values into a single 64-bit integer:
///
/// - **Identifier**: slot index within the pool
/// - **Generation**: incremented on recycling to invalidate stale handles
/// - **Flags**: reserved bits carried on the identifier
///
/// ## Invariants
/// - Two entities with the same identifier but different generations are
///   distinct.
/// - Flags never participate in liveness comparison.
///
/// ## Notes
/// `Entity` values are cheap to copy and compare.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Entity(pub EntityID);

#[inline]
const fn make_id(index: u64, generation: GenerationID) -> EntityID {
    (index & IDENTIFIER_MASK) | ((generation << GENERATION_SHIFT) & GENERATION_MASK)
}

/// Builds an entity from an identifier index and a generation.
#[inline]
pub const fn make_entity(index: u64, generation: GenerationID) -> Entity {
    Entity(make_id(index, generation))
}

/// Builds an entity with the given flag bits already set.
#[inline]
pub const fn make_entity_with_flags(index: u64, generation: GenerationID, flags: EntityID) -> Entity {
    Entity(make_id(index, generation) | (flags & FLAGS_MASK))
}

impl Entity {
    /// Returns the identifier (slot index) portion of this entity.
    #[inline]
    pub const fn index(self) -> u64 {
        self.0 & IDENTIFIER_MASK
    }

    /// Returns the generation portion of this entity.
    #[inline]
    pub const fn generation(self) -> GenerationID {
        (self.0 & GENERATION_MASK) >> GENERATION_SHIFT
    }

    /// Returns only the flag bits of this entity.
    #[inline]
    pub const fn flags(self) -> EntityID {
        self.0 & FLAGS_MASK
    }

    /// Returns this entity with the flag bits stripped.
    #[inline]
    pub const fn without_flags(self) -> Entity {
        Entity(self.0 & !FLAGS_MASK)
    }

    /// Returns this entity with the identifier replaced, keeping generation
    /// and flags.
    #[inline]
    pub const fn with_index(self, index: u64) -> Entity {
        Entity((self.0 & !IDENTIFIER_MASK) | (index & IDENTIFIER_MASK))
    }

    /// Reports the `CHILD_OF` flag.
    #[inline]
    pub const fn is_child(self) -> bool {
        self.0 & FLAG_CHILD_OF != 0
    }

    /// Reports the `INSTANCE_OF` flag.
    #[inline]
    pub const fn is_instance(self) -> bool {
        self.0 & FLAG_INSTANCE_OF != 0
    }

    /// Reports the `DISABLED` flag.
    #[inline]
    pub const fn is_disabled(self) -> bool {
        self.0 & FLAG_DISABLED != 0
    }

    /// Reports the `COMPONENT` flag.
    #[inline]
    pub const fn is_component(self) -> bool {
        self.0 & FLAG_COMPONENT != 0
    }

    /// Reports the `SINGLETON` flag.
    #[inline]
    pub const fn is_singleton(self) -> bool {
        self.0 & FLAG_SINGLETON != 0
    }

    /// Returns this entity with the `CHILD_OF` flag set or cleared.
    #[inline]
    pub const fn child_of(self, enable: bool) -> Entity {
        if enable {
            Entity(self.0 | FLAG_CHILD_OF)
        } else {
            Entity(self.0 & !FLAG_CHILD_OF)
        }
    }

    /// Returns this entity with the `INSTANCE_OF` flag set or cleared.
    #[inline]
    pub const fn instance_of(self, enable: bool) -> Entity {
        if enable {
            Entity(self.0 | FLAG_INSTANCE_OF)
        } else {
            Entity(self.0 & !FLAG_INSTANCE_OF)
        }
    }

    /// Returns this entity with the `DISABLED` flag set.
    #[inline]
    pub const fn disable(self) -> Entity {
        Entity(self.0 | FLAG_DISABLED)
    }

    /// Returns this entity with the `DISABLED` flag cleared.
    #[inline]
    pub const fn enable(self) -> Entity {
        Entity(self.0 & !FLAG_DISABLED)
    }

    /// Returns a component-kind handle derived from this entity, keeping
    /// only the identifier.
    #[inline]
    pub const fn as_component(self) -> Entity {
        make_entity_with_flags(self.index(), 0, FLAG_COMPONENT)
    }

    /// Returns a singleton component-kind handle derived from this entity.
    #[inline]
    pub const fn as_singleton(self) -> Entity {
        Entity(self.as_component().0 | FLAG_SINGLETON)
    }
}

/// Pool counters for diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EntityPoolStats {
    /// Total identifier slots ever issued, live or recycled.
    pub total: u64,
    /// Slots currently waiting on the free list.
    pub recycled: u64,
    /// Slots currently live.
    pub in_use: u64,
}

/// Generational entity identifier allocator with free-list recycling.
///
/// ## Design
/// - Identifiers are recycled last-in, first-out.
/// - Generations are incremented when a slot is recycled, so an identifier
///   issued before the recycle never matches the slot again.
/// - Slot 0 is a sentinel so a zeroed `Entity` is never alive.
///
/// ## Concurrency
/// The pool is not thread-safe; it belongs to the single mutating caller.
pub struct EntityPool {
    entities: Vec<Entity>,
    next_free: u64,
    available: u64,
}

impl Default for EntityPool {
    fn default() -> Self {
        Self::with_capacity(ENTITY_POOL_INITIAL_CAPACITY)
    }
}

impl EntityPool {
    /// Creates a pool with room reserved for `initial_capacity` identifiers.
    ///
    /// A zero capacity falls back to
    /// [`ENTITY_POOL_INITIAL_CAPACITY`].
    pub fn with_capacity(initial_capacity: usize) -> Self {
        let initial_capacity = if initial_capacity == 0 {
            ENTITY_POOL_INITIAL_CAPACITY
        } else {
            initial_capacity
        };

        let mut entities = Vec::with_capacity(initial_capacity + 1);
        entities.push(make_entity(0, 0));

        Self { entities, next_free: 0, available: 0 }
    }

    /// Issues a new entity identifier.
    ///
    /// ## Behavior
    /// - Pops the most recently recycled slot if one is available; the
    ///   returned identifier carries the generation stored at recycle time.
    /// - Otherwise appends a fresh slot with generation zero.
    ///
    /// ## Invariants
    /// The returned entity is alive and flag-free.
    pub fn spawn(&mut self) -> Entity {
        if self.available > 0 {
            self.available -= 1;
            let index = self.next_free;
            let slot = self.entities[index as usize];
            self.next_free = slot.index();
            self.entities[index as usize] = slot.with_index(index);
            return self.entities[index as usize];
        }

        let entity = make_entity(self.entities.len() as u64, 0);
        self.entities.push(entity);
        entity
    }

    /// Issues a new identifier carrying the `COMPONENT` flag.
    ///
    /// Allocation is identical to [`spawn`](EntityPool::spawn); only the
    /// returned handle differs. The pool keeps the canonical, flag-free
    /// value.
    pub fn spawn_component(&mut self) -> Entity {
        Entity(self.spawn().0 | FLAG_COMPONENT)
    }

    /// Releases an identifier back to the pool for reuse.
    ///
    /// ## Behavior
    /// - Returns `false` and does nothing when the entity is not alive
    ///   (unknown, stale, or already recycled).
    /// - Otherwise pushes the slot onto the free list and increments the
    ///   stored generation, invalidating every outstanding handle.
    pub fn recycle(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        let index = entity.index();

        self.available += 1;
        self.entities[index as usize] = make_entity(self.next_free, entity.generation() + 1);
        self.next_free = index;

        true
    }

    /// Returns `true` if the identifier is alive in the pool.
    ///
    /// Flags on the queried handle are ignored.
    pub fn is_alive(&self, entity: Entity) -> bool {
        let index = entity.index();
        if index == 0 || index >= self.entities.len() as u64 {
            return false;
        }
        self.entities[index as usize] == entity.without_flags()
    }

    /// Reports pool usage counters.
    pub fn stats(&self) -> EntityPoolStats {
        let total = self.entities.len() as u64 - 1;
        EntityPoolStats {
            total,
            recycled: self.available,
            in_use: total - self.available,
        }
    }
}
