//! # archegraph
//!
//! High-performance archetype-graph Entity-Component-System (ECS) data
//! engine.
//!
//! ## Design Goals
//! - Archetype-based columnar storage for cache efficiency
//! - Stable in-archetype row addressing during controlled windows
//! - Bitmask archetype identity and superset query matching
//! - Generational entity identifiers with free-list recycling
//!
//! The engine is a strictly single-threaded data structure: one caller at a
//! time mutates or reads the graph. Queries borrow the archetype list for
//! their whole lifetime, so the borrow checker rejects structural mutation
//! while a cursor is live.

#![forbid(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]
#![allow(clippy::module_inception)]

pub mod engine;

// ─────────────────────────────────────────────────────────────────────────────
// Re-exports (Public API)
// ─────────────────────────────────────────────────────────────────────────────

// Core ECS types

pub use engine::world::World;

pub use engine::entity::{Entity, EntityPool, EntityPoolStats};

pub use engine::mask::{build_mask, Mask};

pub use engine::registry::{ComponentDesc, ComponentEntry, ComponentRegistry};

pub use engine::storage::{ColumnStats, ColumnStorage, DenseColumn, SingletonColumn};

pub use engine::archetype::{Archetype, ArchetypeGraph, EntityLocation};

pub use engine::query::QueryCursor;

pub use engine::types::{ArchetypeID, ComponentID, EntityID, RowID, COMPONENT_CAP};

// ─────────────────────────────────────────────────────────────────────────────
// Prelude (Optional but recommended)
// ─────────────────────────────────────────────────────────────────────────────

/// Commonly used ECS types.
///
/// Import with:
/// ```rust
/// use archegraph::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        build_mask, ComponentEntry, ComponentID, Entity, EntityID, Mask, QueryCursor, World,
    };
}
