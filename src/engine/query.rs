//! Query cursor over archetypes matching a component mask.
//!
//! A cursor visits every `(archetype, row)` pair whose archetype mask is a
//! superset of the target mask. Archetypes are scanned in insertion order,
//! rows in order `0, 1, ..., len - 1`; no sort is performed, so two queries
//! with the same mask over an unchanged graph iterate identical entity
//! sequences.
//!
//! The cursor borrows the archetype list immutably for its whole lifetime.
//! Pointers obtained through [`component`](QueryCursor::component) stay
//! valid as long as the loop body does not mutate the graph; a caller that
//! must mutate mid-iteration collects entities first and mutates after the
//! cursor is dropped.

use crate::engine::archetype::Archetype;
use crate::engine::entity::Entity;
use crate::engine::mask::Mask;
use crate::engine::types::{ComponentID, RowID};

/// Stateful iterator over the entities matching a component mask.
///
/// ## Protocol
/// Call [`next`](QueryCursor::next) repeatedly; each `true` return leaves
/// the cursor positioned on an entity whose archetype contains the target
/// mask. [`entity`](QueryCursor::entity) and
/// [`component`](QueryCursor::component) read the current position.
///
/// An empty target mask matches every non-empty archetype.
pub struct QueryCursor<'a> {
    archetypes: &'a [Archetype],
    mask: Mask,
    archetype_index: usize,
    current: usize,
    entity_index: usize,
    entity_total: usize,
}

impl<'a> QueryCursor<'a> {
    pub(crate) fn prepare(archetypes: &'a [Archetype], mask: Mask) -> Self {
        Self {
            archetypes,
            mask,
            archetype_index: 0,
            current: usize::MAX,
            entity_index: 0,
            entity_total: 0,
        }
    }

    /// Advances to the next matching entity.
    ///
    /// Returns `false` once no match remains; the cursor is exhausted and
    /// further calls keep returning `false`.
    pub fn next(&mut self) -> bool {
        if self.entity_index < self.entity_total {
            self.entity_index += 1;
            return true;
        }

        while self.archetype_index < self.archetypes.len() {
            let archetype = &self.archetypes[self.archetype_index];
            self.archetype_index += 1;
            if !archetype.is_empty() && archetype.mask().contains(&self.mask) {
                self.current = self.archetype_index - 1;
                self.entity_index = 0;
                self.entity_total = archetype.len() - 1;
                return true;
            }
        }
        false
    }

    /// Returns the entity at the current position.
    ///
    /// ## Panics
    /// Panics when the cursor is not positioned on a match.
    #[inline]
    pub fn entity(&self) -> Entity {
        self.archetypes[self.current].entities()[self.entity_index]
    }

    /// Raw pointer to the current entity's value of `component_id`.
    ///
    /// The caller must know the component's type. Returns null when the
    /// current archetype does not contain the component.
    ///
    /// ## Panics
    /// Panics when the cursor is not positioned on a match.
    #[inline]
    pub fn component(&self, component_id: ComponentID) -> *mut u8 {
        self.archetypes[self.current].component_ptr(component_id, self.entity_index as RowID)
    }

    /// Resets the cursor to its initial state without re-reading the
    /// archetype list.
    pub fn restart(&mut self) {
        self.archetype_index = 0;
        self.current = usize::MAX;
        self.entity_index = 0;
        self.entity_total = 0;
    }
}
