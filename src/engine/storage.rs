//! Columnar component storage.
//!
//! One column holds the values of one component kind for every entity of one
//! archetype, addressed by dense row index. Columns are monomorphized per
//! component type and accessed through the type-erased [`ColumnStorage`]
//! trait so archetypes can own heterogeneous columns uniformly.
//!
//! Element types are bounded by [`bytemuck::Pod`]: expansion zero-initializes
//! new rows and row transfers are element-sized byte copies, both of which
//! require plain-old-data layout to be sound.

use std::any::{type_name, Any, TypeId};
use std::cell::UnsafeCell;
use std::mem::size_of;
use std::ptr;
use std::rc::Rc;

use bytemuck::{Pod, Zeroable};

use crate::engine::types::{RowID, COLUMN_GROWTH_INCREMENT, COLUMN_INITIAL_CAPACITY};

/// Runtime information reported by a column.
#[derive(Clone, Copy, Debug)]
pub struct ColumnStats {
    /// Runtime `TypeId` of the element type.
    pub type_id: TypeId,
    /// Rust type name of the element type, for diagnostics.
    pub type_name: &'static str,
    /// Size in bytes of one element.
    pub element_size: usize,
    /// Number of currently addressable rows.
    pub capacity: usize,
}

/// Type-erased contract of a component column.
///
/// Pointers returned by [`get`](ColumnStorage::get) stay valid until the next
/// operation that can reallocate the underlying buffer (`expand`, `shrink`,
/// `reset`).
pub trait ColumnStorage: Any {
    /// Raw pointer to the element at `row`, or null when `row` is not
    /// addressable.
    fn get(&self, row: RowID) -> *mut u8;

    /// Overwrites the slot at `row` with a typed value.
    ///
    /// Returns `false` without writing when `row` is out of range or the
    /// value is not of the column's element type.
    fn set_any(&mut self, row: RowID, value: &dyn Any) -> bool;

    /// Byte-copies one element-sized block from `src` into `row`.
    ///
    /// `row` must already be addressable; out-of-range rows are ignored.
    ///
    /// # Safety
    /// `src` must point to a valid element of this column's type.
    unsafe fn copy(&mut self, row: RowID, src: *const u8);

    /// Ensures at least `len` rows are addressable, zero-initializing any
    /// new rows. Growth is by a fixed increment, so pointers survive most
    /// calls.
    fn expand(&mut self, len: usize);

    /// Zeroes the element at `row`, so a recycled row reads as freshly
    /// allocated. Singleton columns keep their one value and ignore this.
    fn clear_row(&mut self, row: RowID);

    /// Truncates to `len` rows. Pointers into the truncated region are
    /// invalidated.
    fn shrink(&mut self, len: usize);

    /// Truncates to zero rows and releases the buffer.
    fn reset(&mut self);

    /// Reports the element type and current capacity.
    fn stats(&self) -> ColumnStats;

    /// Upcast for typed inspection.
    fn as_any(&self) -> &dyn Any;
    /// Mutable upcast for typed inspection.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Dense growable column of component values.
///
/// Invariant:
/// - Every allocated element is initialized (zeroed on growth), so any
///   row below the buffer length is addressable.
/// - The buffer sits behind an `UnsafeCell` and is only ever touched through
///   this type's methods; callers holding pointers from `get` may write
///   through them between reallocating operations.
pub struct DenseColumn<T: Pod> {
    buffer: UnsafeCell<Vec<T>>,
    increment: usize,
}

impl<T: Pod> DenseColumn<T> {
    /// Creates a column with the default initial capacity and growth
    /// increment.
    pub fn new() -> Self {
        Self::with_capacity(COLUMN_INITIAL_CAPACITY, COLUMN_GROWTH_INCREMENT)
    }

    /// Creates a column with `initial` zeroed rows, growing by `increment`
    /// rows at a time.
    ///
    /// A zero `increment` falls back to the default growth increment.
    pub fn with_capacity(initial: usize, increment: usize) -> Self {
        let increment = if increment == 0 { COLUMN_GROWTH_INCREMENT } else { increment };
        Self {
            buffer: UnsafeCell::new(vec![T::zeroed(); initial]),
            increment,
        }
    }

    #[inline]
    fn len(&self) -> usize {
        // No references to the Vec escape this module, so a momentary
        // borrow through the cell is exclusive.
        unsafe { (*self.buffer.get()).len() }
    }
}

impl<T: Pod> Default for DenseColumn<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Pod> ColumnStorage for DenseColumn<T> {
    fn get(&self, row: RowID) -> *mut u8 {
        let row = row as usize;
        if row >= self.len() {
            return ptr::null_mut();
        }
        unsafe { (*self.buffer.get()).as_mut_ptr().add(row) as *mut u8 }
    }

    fn set_any(&mut self, row: RowID, value: &dyn Any) -> bool {
        let buffer = self.buffer.get_mut();
        let Some(slot) = buffer.get_mut(row as usize) else {
            return false;
        };
        match value.downcast_ref::<T>() {
            Some(typed) => {
                *slot = *typed;
                true
            }
            None => false,
        }
    }

    unsafe fn copy(&mut self, row: RowID, src: *const u8) {
        let buffer = self.buffer.get_mut();
        let row = row as usize;
        debug_assert!(row < buffer.len(), "copy into unaddressable row {row}");
        if row < buffer.len() {
            // ptr::copy tolerates overlap; compress may copy within one
            // buffer and singleton sources can alias the destination.
            unsafe { ptr::copy(src as *const T, buffer.as_mut_ptr().add(row), 1) };
        }
    }

    fn expand(&mut self, len: usize) {
        let increment = self.increment;
        let buffer = self.buffer.get_mut();
        if len > buffer.len() {
            buffer.resize(len + increment, T::zeroed());
        }
    }

    fn clear_row(&mut self, row: RowID) {
        let buffer = self.buffer.get_mut();
        if let Some(slot) = buffer.get_mut(row as usize) {
            *slot = T::zeroed();
        }
    }

    fn shrink(&mut self, len: usize) {
        let buffer = self.buffer.get_mut();
        if len < buffer.len() {
            buffer.truncate(len);
            buffer.shrink_to_fit();
        }
    }

    fn reset(&mut self) {
        *self.buffer.get_mut() = Vec::new();
    }

    fn stats(&self) -> ColumnStats {
        ColumnStats {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            element_size: size_of::<T>(),
            capacity: self.len(),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Column with a single shared slot.
///
/// Every clone produced by a singleton registration shares one value, and
/// [`get`](ColumnStorage::get) returns the same element address for every
/// row. Supports one-value-per-archetype components such as a global input
/// snapshot.
pub struct SingletonColumn<T: Pod> {
    slot: Rc<UnsafeCell<T>>,
}

impl<T: Pod> SingletonColumn<T> {
    /// Creates a singleton column holding a zeroed value.
    pub fn new() -> Self {
        Self { slot: Rc::new(UnsafeCell::new(T::zeroed())) }
    }
}

impl<T: Pod> Default for SingletonColumn<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Pod> Clone for SingletonColumn<T> {
    fn clone(&self) -> Self {
        Self { slot: Rc::clone(&self.slot) }
    }
}

impl<T: Pod> ColumnStorage for SingletonColumn<T> {
    fn get(&self, _row: RowID) -> *mut u8 {
        self.slot.get() as *mut u8
    }

    fn set_any(&mut self, _row: RowID, value: &dyn Any) -> bool {
        match value.downcast_ref::<T>() {
            Some(typed) => {
                unsafe { *self.slot.get() = *typed };
                true
            }
            None => false,
        }
    }

    unsafe fn copy(&mut self, _row: RowID, src: *const u8) {
        // The source of an archetype transition can be this very slot.
        unsafe { ptr::copy(src as *const T, self.slot.get(), 1) };
    }

    fn expand(&mut self, _len: usize) {}

    fn clear_row(&mut self, _row: RowID) {}

    fn shrink(&mut self, _len: usize) {}

    fn reset(&mut self) {}

    fn stats(&self) -> ColumnStats {
        ColumnStats {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            element_size: size_of::<T>(),
            capacity: 1,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
