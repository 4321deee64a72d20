//! # Component Registry
//!
//! This module provides the per-world catalog that associates caller-assigned
//! `ComponentID` values with runtime type descriptors and column storage
//! factories.
//!
//! ## Purpose
//! The registry decouples component type information (`TypeId`, name, size,
//! alignment) from runtime storage, enabling archetypes to instantiate
//! heterogeneous columns behind [`ColumnStorage`] without knowing concrete
//! element types.
//!
//! ## Design
//! - Component IDs are assigned by the caller at registration time and must
//!   lie in `[0, COMPONENT_CAP)`.
//! - Each entry stores a factory function producing an empty column for its
//!   component; singleton entries hand out clones of one shared column.
//! - The registry is an owned value of the world, so independent worlds with
//!   independent component sets can coexist in one process.
//!
//! ## Invariants
//! - At most one entry per `ComponentID`; registering an ID twice is a
//!   programmer error and panics.
//! - Every registered entry has a corresponding storage factory.
//!
//! ## Concurrency
//! Registration is a setup-time action of the single mutating caller; no
//! internal synchronization is provided or needed.

use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::mem::{align_of, size_of};

use bytemuck::Pod;

use crate::engine::storage::{ColumnStorage, DenseColumn, SingletonColumn};
use crate::engine::types::{ComponentID, COMPONENT_CAP};

/// Factory producing a new empty column for a component kind.
type ColumnFactory = Box<dyn Fn() -> Box<dyn ColumnStorage>>;

/// Describes a registered component type.
///
/// ## Purpose
/// Provides metadata about a component type for debugging, validation, and
/// tooling.
///
/// ## Notes
/// `ComponentDesc` is `Copy` and safe to clone freely for reporting and
/// diagnostics.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ComponentDesc {
    /// Identifier assigned to this component type at registration.
    pub component_id: ComponentID,

    /// Rust type name for diagnostics.
    pub name: &'static str,

    /// Runtime `TypeId` of the component.
    pub type_id: TypeId,

    /// Size of the component type in bytes.
    pub size: usize,

    /// Alignment of the component type in bytes.
    pub align: usize,
}

impl ComponentDesc {
    /// Constructs a descriptor for type `T` with the given identifier.
    #[inline]
    pub fn of<T: 'static>(component_id: ComponentID) -> Self {
        Self {
            component_id,
            name: type_name::<T>(),
            type_id: TypeId::of::<T>(),
            size: size_of::<T>(),
            align: align_of::<T>(),
        }
    }

    /// Returns `true` if this descriptor refers to type `T`.
    #[inline]
    pub fn matches_type<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }
}

impl std::fmt::Display for ComponentDesc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ComponentDesc {{ id: {}, name: {}, size: {}, align: {} }}",
            self.component_id, self.name, self.size, self.align
        )
    }
}

/// A registrable component definition: identifier, type descriptor, and
/// column storage factory.
pub struct ComponentEntry {
    desc: ComponentDesc,
    factory: ColumnFactory,
}

impl ComponentEntry {
    /// Creates a registration entry for component type `T` under
    /// `component_id`, backed by dense per-archetype columns.
    pub fn of<T: Pod>(component_id: ComponentID) -> Self {
        Self {
            desc: ComponentDesc::of::<T>(component_id),
            factory: Box::new(|| Box::new(DenseColumn::<T>::new())),
        }
    }

    /// Creates a singleton registration entry for component type `T`.
    ///
    /// ## Behavior
    /// Every archetype that includes this component receives a clone of one
    /// shared column, so `get` reports the same element address for every
    /// row of every archetype: exactly one logical value per world.
    pub fn singleton<T: Pod>(component_id: ComponentID) -> Self {
        let shared = SingletonColumn::<T>::new();
        Self {
            desc: ComponentDesc::of::<T>(component_id),
            factory: Box::new(move || Box::new(shared.clone())),
        }
    }

    /// Returns the identifier this entry registers.
    #[inline]
    pub fn id(&self) -> ComponentID {
        self.desc.component_id
    }

    /// Returns the type descriptor of this entry.
    #[inline]
    pub fn desc(&self) -> &ComponentDesc {
        &self.desc
    }

    /// Produces a new empty column for this component.
    #[inline]
    pub fn new_column(&self) -> Box<dyn ColumnStorage> {
        (self.factory)()
    }
}

/// Per-world catalog of component registrations keyed by `ComponentID`.
///
/// ## Invariants
/// - `entries[id]` is `Some` iff component `id` is registered.
/// - Every entry in `by_type` has a matching `entries[id]`.
pub struct ComponentRegistry {
    by_type: HashMap<TypeId, ComponentID>,
    entries: Vec<Option<ComponentEntry>>,
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            by_type: HashMap::new(),
            entries: (0..COMPONENT_CAP).map(|_| None).collect(),
        }
    }

    /// Registers a component entry under its assigned identifier.
    ///
    /// ## Panics
    /// - If the identifier is at or beyond [`COMPONENT_CAP`].
    /// - If the identifier is already registered.
    pub fn register(&mut self, entry: ComponentEntry) {
        let id = entry.id();
        let index = id as usize;
        assert!(
            index < COMPONENT_CAP,
            "component id {id} out of range (limit {COMPONENT_CAP})"
        );
        assert!(
            self.entries[index].is_none(),
            "component id {id} already registered"
        );

        log::debug!("registering component {} as id {id}", entry.desc().name);
        self.by_type.insert(entry.desc().type_id, id);
        self.entries[index] = Some(entry);
    }

    /// Returns the entry registered under `component_id`, if any.
    #[inline]
    pub fn get_by_id(&self, component_id: ComponentID) -> Option<&ComponentEntry> {
        self.entries
            .get(component_id as usize)
            .and_then(|entry| entry.as_ref())
    }

    /// Returns the entry registered for the runtime type `type_id`, if any.
    #[inline]
    pub fn get_by_type(&self, type_id: TypeId) -> Option<&ComponentEntry> {
        self.by_type
            .get(&type_id)
            .and_then(|&id| self.get_by_id(id))
    }

    /// Returns the identifier registered for component type `T`, if any.
    #[inline]
    pub fn id_of<T: 'static>(&self) -> Option<ComponentID> {
        self.by_type.get(&TypeId::of::<T>()).copied()
    }

    /// Returns how many component kinds are registered.
    pub fn registered_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_some()).count()
    }

    /// Creates an empty column for `component_id`.
    ///
    /// ## Panics
    /// Panics when the identifier has no registration; using an unregistered
    /// component is a programmer error.
    pub fn new_column(&self, component_id: ComponentID) -> Box<dyn ColumnStorage> {
        match self.get_by_id(component_id) {
            Some(entry) => entry.new_column(),
            None => panic!(
                "component id {component_id} is not registered (register it before first use)"
            ),
        }
    }
}
