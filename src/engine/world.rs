//! # World Façade
//!
//! The aggregated front of the engine: a `World` owns an entity pool, a
//! component registry, and an archetype graph, and forwards every operation
//! to the owning subsystem.
//!
//! ## Design
//! Worlds are plain values. Nothing in the engine is process-global, so
//! multiple independent worlds with independent component sets can coexist.
//!
//! ## Error Model
//! - Programmer errors (duplicate registration, adding an entity twice,
//!   using an unregistered component) panic with a diagnostic.
//! - Common caller errors during bulk operations (removing an unknown
//!   entity, re-adding an owned component, removing an absent one) are
//!   silent no-ops.
//! - [`component`](World::component) returns a null pointer when the entity
//!   lacks the component; the caller must check.

use crate::engine::archetype::{ArchetypeGraph, EntityLocation};
use crate::engine::entity::{Entity, EntityPool, EntityPoolStats};
use crate::engine::mask::Mask;
use crate::engine::query::QueryCursor;
use crate::engine::registry::{ComponentEntry, ComponentRegistry};
use crate::engine::types::ComponentID;

/// Aggregated ECS façade owning the pool, the registry, and the graph.
pub struct World {
    entity_pool: EntityPool,
    registry: ComponentRegistry,
    graph: ArchetypeGraph,
}

impl Default for World {
    fn default() -> Self {
        Self::new(0)
    }
}

impl World {
    /// Creates a world with room reserved for `entity_pool_capacity`
    /// identifiers (zero selects the default capacity).
    pub fn new(entity_pool_capacity: usize) -> Self {
        let registry = ComponentRegistry::new();
        let graph = ArchetypeGraph::new(&registry);
        log::debug!("created world (pool capacity {entity_pool_capacity})");
        Self {
            entity_pool: EntityPool::with_capacity(entity_pool_capacity),
            registry,
            graph,
        }
    }

    /// Registers a component definition.
    ///
    /// ## Panics
    /// Panics when the entry's identifier is out of range or already in
    /// use.
    pub fn register(&mut self, entry: ComponentEntry) {
        self.registry.register(entry);
    }

    /// Creates an entity carrying the given component set and returns its
    /// identifier.
    ///
    /// The entity lands in the archetype matching the set; an empty set
    /// places it in the root archetype.
    ///
    /// ## Panics
    /// Panics when an in-range component ID is unregistered.
    pub fn new_entity(&mut self, components: &[ComponentID]) -> Entity {
        let entity = self.entity_pool.spawn();
        self.graph.add(&self.registry, entity, components);
        entity
    }

    /// Removes an entity from the graph and recycles its identifier.
    ///
    /// Unknown or stale entities are ignored.
    pub fn rem_entity(&mut self, entity: Entity) {
        self.graph.rem(entity);
        self.entity_pool.recycle(entity);
    }

    /// Returns `true` if the entity identifier is alive.
    #[inline]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entity_pool.is_alive(entity)
    }

    /// Adds a component to an entity; no-op if already present.
    pub fn add_component(&mut self, entity: Entity, component_id: ComponentID) {
        self.graph.add_component(&self.registry, entity, component_id);
    }

    /// Removes a component from an entity; no-op if absent.
    pub fn rem_component(&mut self, entity: Entity, component_id: ComponentID) {
        self.graph.rem_component(&self.registry, entity, component_id);
    }

    /// Raw pointer to an entity's component value, or null when the entity
    /// is unknown or lacks the component.
    ///
    /// The pointer stays valid until the next mutation of the entity's
    /// archetype.
    #[inline]
    pub fn component(&self, entity: Entity, component_id: ComponentID) -> *mut u8 {
        self.graph.component_ptr(entity, component_id)
    }

    /// Returns a cursor over every entity whose archetype contains `mask`.
    ///
    /// Use [`build_mask`](crate::engine::mask::build_mask) to construct the
    /// mask. An empty mask visits every entity that has a row in a
    /// non-empty archetype.
    pub fn query(&self, mask: Mask) -> QueryCursor<'_> {
        self.graph.query(mask)
    }

    /// Returns the `(archetype, row)` location of an entity, if present.
    #[inline]
    pub fn location(&self, entity: Entity) -> Option<EntityLocation> {
        self.graph.get(entity)
    }

    /// Read access to the archetype graph, for inspection and statistics.
    #[inline]
    pub fn graph(&self) -> &ArchetypeGraph {
        &self.graph
    }

    /// Read access to the component registry.
    #[inline]
    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// Reports entity pool usage counters.
    #[inline]
    pub fn entity_stats(&self) -> EntityPoolStats {
        self.entity_pool.stats()
    }
}
