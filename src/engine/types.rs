//! Core ECS Types, Identifiers, and Bit-Level Layouts
//!
//! This module defines the **fundamental types, identifiers, bit layouts, and
//! capacity constants** used throughout the ECS engine. These definitions are
//! shared across all subsystems, including entity pooling, archetypes,
//! columnar storage, and queries.
//!
//! ## Design Philosophy
//!
//! The engine is designed around:
//!
//! - **Dense columnar storage**
//! - **Bitmask archetype identity**
//! - **Stable numeric identifiers**
//!
//! To support these goals efficiently, this module:
//!
//! - Encodes entities into a single 64-bit value,
//! - Uses small, copyable numeric IDs for all ECS concepts,
//! - Avoids heap allocation in hot paths.
//!
//! ## Entity Representation
//!
//! Entities are encoded as a packed 64-bit integer with the following layout:
//!
//! ```text
//! | flags | generation | identifier |
//! ```
//!
//! - **Identifier** indexes the slot in the entity pool.
//! - **Generation** enables stale-entity detection after recycling.
//! - **Flags** are reserved relationship and lifecycle bits carried on the
//!   identifier; the archetype graph never consults them.
//!
//! The exact bit widths are controlled by compile-time constants and validated
//! using static assertions.
//!
//! ## Archetypes and Components
//!
//! Components are identified by compact [`ComponentID`] values assigned by the
//! caller at registration time. Archetypes are identified by fixed-width
//! bitmasks with one bit per possible component ID; see
//! [`Mask`](crate::engine::mask::Mask).
//!
//! ## Intended Audience
//!
//! This module is primarily intended for:
//!
//! - ECS internals,
//! - archetype and storage layers,
//! - query matching.

/// Bit-width type used for compile-time layout calculations.
pub type Bits = u8;

/// Globally unique entity identifier encoded as a packed 64-bit value.
pub type EntityID = u64;
/// Generation counter used to detect stale entities.
pub type GenerationID = u64;

/// Unique identifier for a component kind, assigned at registration time.
pub type ComponentID = u16;
/// Unique identifier for an archetype; index into the graph's arena.
pub type ArchetypeID = u32;
/// Row index within an archetype.
pub type RowID = u32;

/// Total number of bits in an [`EntityID`].
pub const ENTITY_BITS: Bits = 64;
/// Number of bits reserved for the pool slot identifier.
pub const IDENTIFIER_BITS: Bits = 32;
/// Number of bits reserved for entity generations.
pub const GENERATION_BITS: Bits = 24;
/// Number of bits reserved for entity flags.
pub const FLAG_BITS: Bits = ENTITY_BITS - IDENTIFIER_BITS - GENERATION_BITS;

/// Shift of the generation field within an [`EntityID`].
pub const GENERATION_SHIFT: Bits = IDENTIFIER_BITS;
/// Shift of the flags field within an [`EntityID`].
pub const FLAGS_SHIFT: Bits = IDENTIFIER_BITS + GENERATION_BITS;

const _: [(); 1] = [(); (IDENTIFIER_BITS + GENERATION_BITS < ENTITY_BITS) as usize];
const _: [(); 1] = [(); (FLAG_BITS > 0) as usize];
const _: [(); 1] = [(); (IDENTIFIER_BITS > 0 && IDENTIFIER_BITS < ENTITY_BITS) as usize];

const fn mask(bits: Bits) -> EntityID {
    if bits == 0 { 0 } else { ((1 as EntityID) << bits) - 1 }
}

/// Mask selecting the identifier portion of an [`EntityID`].
pub const IDENTIFIER_MASK: EntityID = mask(IDENTIFIER_BITS);
/// Mask selecting the generation portion of an [`EntityID`].
pub const GENERATION_MASK: EntityID = mask(GENERATION_BITS) << GENERATION_SHIFT;
/// Mask selecting the flags portion of an [`EntityID`].
pub const FLAGS_MASK: EntityID = mask(FLAG_BITS) << FLAGS_SHIFT;

/// Reserved flag: the entity is a child of another entity.
pub const FLAG_CHILD_OF: EntityID = 1 << FLAGS_SHIFT;
/// Reserved flag: the entity is an instance of a prefab.
pub const FLAG_INSTANCE_OF: EntityID = 1 << (FLAGS_SHIFT + 1);
/// Reserved flag: the entity is disabled.
pub const FLAG_DISABLED: EntityID = 1 << (FLAGS_SHIFT + 2);
/// Reserved flag: the entity names a component kind.
pub const FLAG_COMPONENT: EntityID = 1 << (FLAGS_SHIFT + 3);
/// Reserved flag: the entity names a singleton component kind.
pub const FLAG_SINGLETON: EntityID = 1 << (FLAGS_SHIFT + 4);

/// Maximum number of registrable component kinds.
///
/// Component IDs live in `[0, COMPONENT_CAP)` and map one-to-one onto mask
/// bits; mask operations reject anything at or beyond this bound.
pub const COMPONENT_CAP: usize = 256;
/// Number of `u64` words required to represent a full component mask.
pub const MASK_WORDS: usize = (COMPONENT_CAP + 63) / 64;

const _: [(); 1] = [(); (COMPONENT_CAP % 64 == 0) as usize];
const _: [(); 1] = [(); (COMPONENT_CAP <= ComponentID::MAX as usize + 1) as usize];

/// Default initial slot count of a fresh entity pool.
pub const ENTITY_POOL_INITIAL_CAPACITY: usize = 1024 * 10;
/// Number of zero-initialized elements a fresh column allocates.
pub const COLUMN_INITIAL_CAPACITY: usize = 1024;
/// Fixed element increment applied when a column must grow.
pub const COLUMN_GROWTH_INCREMENT: usize = 2048;
