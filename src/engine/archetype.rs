//! # Archetype Graph
//!
//! This module defines the central data structure of the engine: archetypes,
//! the graph that owns them, and the algorithms that move entities between
//! them.
//!
//! ## Purpose
//! An archetype groups every entity that carries exactly the same set of
//! component kinds. The graph is responsible for:
//!
//! - owning archetypes and their columnar storage,
//! - mapping every live entity to its `(archetype, row)` location,
//! - creating archetypes on first demand, keyed by component mask,
//! - transitioning entities when components are added or removed,
//! - caching transition edges so repeated transitions skip the mask lookup.
//!
//! ## Storage Model
//! - Component data is stored column-major: one column per component kind
//!   per archetype, addressed by dense row index.
//! - Row `r` of every column of an archetype holds the data of
//!   `entities[r]`.
//! - Rows are removed by swap-with-last-and-pop (*compress*), which keeps
//!   all columns dense and relocates exactly one other entity.
//!
//! ## Invariants
//! - `archetype_map` holds exactly one archetype per mask; the root
//!   archetype with the empty mask always exists at index 0.
//! - The entity map holds exactly one entry per live entity, and
//!   `entities[row]` of the recorded archetype is that entity.
//! - A column exists for component `c` iff bit `c` of the mask is set, and
//!   every column addresses at least `entities.len()` rows.
//! - A cached edge `a --c--> b` implies `b.mask == a.mask` with bit `c`
//!   flipped, and the reverse edge, once cached, points back at `a`.
//!
//! ## Concurrency
//! Single-threaded cooperative: every mutation takes `&mut self`, and
//! cursors borrow the archetype list shared, so the borrow checker excludes
//! structural mutation during iteration.

use std::collections::HashMap;
use std::ptr;

use crate::engine::entity::Entity;
use crate::engine::mask::{build_mask, Mask};
use crate::engine::query::QueryCursor;
use crate::engine::registry::ComponentRegistry;
use crate::engine::storage::ColumnStorage;
use crate::engine::types::{ArchetypeID, ComponentID, RowID, COMPONENT_CAP, MASK_WORDS};

/// Cached pair of transition targets for one component.
///
/// An unset side means the transition has not been taken from here yet;
/// edges are hints filled in lazily and always agree with the mask map.
#[derive(Clone, Copy, Debug, Default)]
struct ArchetypeEdge {
    add: Option<ArchetypeID>,
    rem: Option<ArchetypeID>,
}

/// Location of an entity within the graph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EntityLocation {
    /// Archetype containing the entity.
    pub archetype: ArchetypeID,
    /// Row index within that archetype.
    pub row: RowID,
}

/// Stores entities that share an identical component mask.
///
/// ## Design
/// - `columns[c]` is populated iff bit `c` of the mask is set.
/// - `entities` is the dense row order; every column is parallel to it.
/// - `edges[c]` caches the archetypes reached by adding or removing
///   component `c`.
///
/// ## Invariants
/// - The mask is immutable after creation.
/// - Logical column length equals `entities.len()`; physical capacity may
///   exceed it and never shrinks on row removal.
pub struct Archetype {
    mask: Mask,
    entities: Vec<Entity>,
    columns: Vec<Option<Box<dyn ColumnStorage>>>,
    edges: Vec<ArchetypeEdge>,
}

impl Archetype {
    /// Creates an empty archetype for `mask`, instantiating one column per
    /// set bit via the registry.
    ///
    /// ## Panics
    /// Panics when a mask bit names an unregistered component.
    fn new(mask: Mask, registry: &ComponentRegistry) -> Self {
        let mut columns: Vec<Option<Box<dyn ColumnStorage>>> =
            (0..COMPONENT_CAP).map(|_| None).collect();

        for component_id in mask.iterate_over_components() {
            columns[component_id as usize] = Some(registry.new_column(component_id));
        }

        Self {
            mask,
            entities: Vec::new(),
            columns,
            edges: vec![ArchetypeEdge::default(); COMPONENT_CAP],
        }
    }

    /// Returns the defining component mask.
    #[inline]
    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    /// Returns the number of entities stored in this archetype.
    #[inline]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if this archetype holds no entities.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Returns the dense entity row order.
    #[inline]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Returns `true` if the archetype contains the component.
    #[inline]
    pub fn has(&self, component_id: ComponentID) -> bool {
        self.mask.is_set(component_id)
    }

    /// Returns the column storing `component_id`, if present.
    #[inline]
    pub fn column(&self, component_id: ComponentID) -> Option<&dyn ColumnStorage> {
        self.columns
            .get(component_id as usize)
            .and_then(|column| column.as_deref())
    }

    /// Raw pointer to the component value at `row`, or null when the
    /// archetype lacks the component or the row is out of range.
    #[inline]
    pub fn component_ptr(&self, component_id: ComponentID, row: RowID) -> *mut u8 {
        match self.column(component_id) {
            Some(column) => column.get(row),
            None => ptr::null_mut(),
        }
    }

    /// Appends an entity row, expanding every column so the row is
    /// addressable, and zeroing it so recycled rows read fresh.
    fn push_row(&mut self, entity: Entity) -> RowID {
        self.entities.push(entity);
        let length = self.entities.len();
        let row = (length - 1) as RowID;

        for column in self.columns.iter_mut().flatten() {
            column.expand(length);
            column.clear_row(row);
        }
        row
    }

    /// Removes the row by swap-with-last-and-pop.
    ///
    /// ## Behavior
    /// - Copies row `last` onto `row` in every column, moves the last
    ///   entity into the vacated slot, and truncates by one.
    /// - Returns the relocated entity so the caller can fix its index
    ///   entry, or `None` when the removed row was the last one.
    fn compress_row(&mut self, row: RowID) -> Option<Entity> {
        let last = self.entities.len() - 1;
        let row_index = row as usize;

        if row_index < last {
            for column in self.columns.iter_mut().flatten() {
                let source = column.get(last as RowID) as *const u8;
                // Safety: both rows are addressable and hold the column's
                // element type.
                unsafe { column.copy(row, source) };
            }
            self.entities[row_index] = self.entities[last];
            self.entities.truncate(last);
            Some(self.entities[row_index])
        } else {
            self.entities.truncate(last);
            None
        }
    }

    /// Copies every component present in both archetypes from `row` of
    /// `self` into `destination_row` of `destination`.
    fn copy_common_row(&self, destination: &mut Archetype, row: RowID, destination_row: RowID) {
        let mut shared = Mask::default();
        for i in 0..MASK_WORDS {
            shared.words[i] = self.mask.words[i] & destination.mask.words[i];
        }

        for component_id in shared.iterate_over_components() {
            let source = self.columns[component_id as usize]
                .as_ref()
                .expect("mask and columns out of sync")
                .get(row) as *const u8;
            let column = destination.columns[component_id as usize]
                .as_mut()
                .expect("mask and columns out of sync");
            // Safety: both rows are addressable; the columns share one
            // element type because they share one component ID.
            unsafe { column.copy(destination_row, source) };
        }
    }
}

/// The collection of archetypes, their mask index, and the entity index.
///
/// ## Lifecycle
/// - Archetypes are created on first demand and never destroyed; the arena
///   only appends, so archetype IDs are stable for the life of the graph.
/// - Entity rows are created on [`add`](ArchetypeGraph::add) or on
///   transition, and destroyed by compress.
/// - Identifier recycling is not the graph's concern; the pool owns it.
pub struct ArchetypeGraph {
    archetypes: Vec<Archetype>,
    archetype_map: HashMap<[u64; MASK_WORDS], ArchetypeID>,
    entity_map: HashMap<Entity, EntityLocation>,
}

impl ArchetypeGraph {
    /// Creates a graph holding only the root archetype (empty mask, index
    /// 0).
    pub fn new(registry: &ComponentRegistry) -> Self {
        let mut graph = Self {
            archetypes: Vec::new(),
            archetype_map: HashMap::new(),
            entity_map: HashMap::new(),
        };
        let root = graph.find_or_create_archetype(registry, &Mask::default());
        debug_assert_eq!(root, 0);
        graph
    }

    /// Returns the archetype stored under `archetype_id`.
    #[inline]
    pub fn archetype(&self, archetype_id: ArchetypeID) -> &Archetype {
        &self.archetypes[archetype_id as usize]
    }

    /// Returns every archetype in insertion order.
    #[inline]
    pub fn archetypes(&self) -> &[Archetype] {
        &self.archetypes
    }

    /// Returns how many live entities the graph indexes.
    #[inline]
    pub fn entity_count(&self) -> usize {
        self.entity_map.len()
    }

    fn find_or_create_archetype(
        &mut self,
        registry: &ComponentRegistry,
        mask: &Mask,
    ) -> ArchetypeID {
        if let Some(&archetype_id) = self.archetype_map.get(&mask.words) {
            return archetype_id;
        }

        let archetype_id = self.archetypes.len() as ArchetypeID;
        log::debug!(
            "creating archetype {archetype_id} ({} components)",
            mask.total_bits_set()
        );
        self.archetype_map.insert(mask.words, archetype_id);
        self.archetypes.push(Archetype::new(*mask, registry));
        archetype_id
    }

    /// Splits two distinct archetype slots into simultaneous mutable
    /// references.
    #[inline]
    fn archetype_pair_mut(
        &mut self,
        archetype_a: ArchetypeID,
        archetype_b: ArchetypeID,
    ) -> (&mut Archetype, &mut Archetype) {
        assert!(
            archetype_a != archetype_b,
            "source and destination archetype must differ"
        );
        let (left, right) = if archetype_a < archetype_b {
            (archetype_a, archetype_b)
        } else {
            (archetype_b, archetype_a)
        };

        let (head, tail) = self.archetypes.split_at_mut(right as usize);
        let left_reference = &mut head[left as usize];
        let right_reference = &mut tail[0];
        if archetype_a < archetype_b {
            (left_reference, right_reference)
        } else {
            (right_reference, left_reference)
        }
    }

    /// Places an entity in the archetype matching the given component set.
    ///
    /// ## Behavior
    /// - Computes the mask union of `components` (duplicates harmless; IDs
    ///   at or beyond [`COMPONENT_CAP`] are dropped by the mask).
    /// - Looks up or prepares the archetype, appends a zeroed row, and
    ///   indexes the entity.
    ///
    /// ## Panics
    /// - If the entity is already present in the graph.
    /// - If any in-range component ID is unregistered.
    pub fn add(&mut self, registry: &ComponentRegistry, entity: Entity, components: &[ComponentID]) {
        let entity = entity.without_flags();
        assert!(
            !self.entity_map.contains_key(&entity),
            "trying to add the same entity twice (did you mean add_component instead?)"
        );
        for &component_id in components {
            if (component_id as usize) < COMPONENT_CAP {
                assert!(
                    registry.get_by_id(component_id).is_some(),
                    "component id {component_id} is not registered (register it before first use)"
                );
            }
        }

        let mask = build_mask(components);
        let archetype_id = self.find_or_create_archetype(registry, &mask);
        let row = self.archetypes[archetype_id as usize].push_row(entity);
        self.entity_map.insert(entity, EntityLocation { archetype: archetype_id, row });
    }

    /// Removes an entity and its component row from the graph.
    ///
    /// Unknown entities are ignored. The identifier itself is not recycled;
    /// that is the pool's concern.
    pub fn rem(&mut self, entity: Entity) {
        let entity = entity.without_flags();
        let Some(location) = self.entity_map.remove(&entity) else {
            return;
        };

        let archetype = &mut self.archetypes[location.archetype as usize];
        if let Some(relocated) = archetype.compress_row(location.row) {
            self.entity_map.insert(
                relocated,
                EntityLocation { archetype: location.archetype, row: location.row },
            );
        }
    }

    /// Returns the `(archetype, row)` location of an entity, if indexed.
    #[inline]
    pub fn get(&self, entity: Entity) -> Option<EntityLocation> {
        self.entity_map.get(&entity.without_flags()).copied()
    }

    /// Adds a component to an entity, transitioning its archetype.
    ///
    /// No-op when the entity is unknown, the component is already present,
    /// or the ID is at or beyond [`COMPONENT_CAP`]. The new component's slot
    /// in the destination reads zero.
    pub fn add_component(
        &mut self,
        registry: &ComponentRegistry,
        entity: Entity,
        component_id: ComponentID,
    ) {
        self.update_entity_relation(registry, entity, component_id, true);
    }

    /// Removes a component from an entity, transitioning its archetype.
    ///
    /// No-op when the entity is unknown or does not carry the component.
    /// The entity keeps its row in the graph even when no component
    /// remains.
    pub fn rem_component(
        &mut self,
        registry: &ComponentRegistry,
        entity: Entity,
        component_id: ComponentID,
    ) {
        self.update_entity_relation(registry, entity, component_id, false);
    }

    fn update_entity_relation(
        &mut self,
        registry: &ComponentRegistry,
        entity: Entity,
        component_id: ComponentID,
        to_add: bool,
    ) {
        if component_id as usize >= COMPONENT_CAP {
            return;
        }

        let entity = entity.without_flags();
        let Some(location) = self.entity_map.get(&entity).copied() else {
            return;
        };

        let present = self.archetypes[location.archetype as usize].has(component_id);
        if present == to_add {
            return;
        }

        let destination_id =
            self.find_or_create_connection(registry, location.archetype, component_id, to_add);
        self.move_entity(entity, location.archetype, destination_id, location.row);
    }

    /// Resolves the archetype reached by flipping one component bit,
    /// caching the edge in both directions.
    fn find_or_create_connection(
        &mut self,
        registry: &ComponentRegistry,
        source_id: ArchetypeID,
        component_id: ComponentID,
        to_add: bool,
    ) -> ArchetypeID {
        let edge = self.archetypes[source_id as usize].edges[component_id as usize];
        let cached = if to_add { edge.add } else { edge.rem };
        if let Some(destination_id) = cached {
            return destination_id;
        }

        let mut mask = *self.archetypes[source_id as usize].mask();
        if to_add {
            mask.set(component_id);
        } else {
            mask.clear(component_id);
        }

        let destination_id = self.find_or_create_archetype(registry, &mask);

        let index = component_id as usize;
        if to_add {
            self.archetypes[source_id as usize].edges[index].add = Some(destination_id);
            self.archetypes[destination_id as usize].edges[index].rem = Some(source_id);
        } else {
            self.archetypes[source_id as usize].edges[index].rem = Some(destination_id);
            self.archetypes[destination_id as usize].edges[index].add = Some(source_id);
        }

        destination_id
    }

    /// Moves an entity's row between archetypes.
    ///
    /// ## Behavior
    /// Effects are applied in a fixed order: the destination row is
    /// appended and zeroed, components present in both masks are copied,
    /// the source row is compressed out, and finally the index entries of
    /// the moved entity (and of the entity relocated by the compress, if
    /// any) are updated.
    fn move_entity(
        &mut self,
        entity: Entity,
        source_id: ArchetypeID,
        destination_id: ArchetypeID,
        row: RowID,
    ) {
        let relocated;
        let destination_row;
        {
            let (source, destination) = self.archetype_pair_mut(source_id, destination_id);
            destination_row = destination.push_row(entity);
            source.copy_common_row(destination, row, destination_row);
            relocated = source.compress_row(row);
        }

        if let Some(relocated) = relocated {
            self.entity_map
                .insert(relocated, EntityLocation { archetype: source_id, row });
        }
        self.entity_map.insert(
            entity,
            EntityLocation { archetype: destination_id, row: destination_row },
        );
    }

    /// Raw pointer to the component value of an entity, or null when the
    /// entity is unknown or lacks the component.
    pub fn component_ptr(&self, entity: Entity, component_id: ComponentID) -> *mut u8 {
        match self.get(entity) {
            Some(location) => self.archetypes[location.archetype as usize]
                .component_ptr(component_id, location.row),
            None => ptr::null_mut(),
        }
    }

    /// Returns a cursor over every archetype whose mask contains `mask`.
    ///
    /// The cursor borrows the archetype list, so the graph cannot be
    /// mutated while it is alive. An empty mask matches every non-empty
    /// archetype in insertion order.
    pub fn query(&self, mask: Mask) -> QueryCursor<'_> {
        QueryCursor::prepare(&self.archetypes, mask)
    }
}
