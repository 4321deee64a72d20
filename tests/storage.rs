use std::any::TypeId;

use bytemuck::{Pod, Zeroable};

use archegraph::engine::storage::{ColumnStorage, DenseColumn, SingletonColumn};

#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
struct Position {
    x: f32,
    y: f32,
    z: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
struct Velocity {
    dx: f32,
    dy: f32,
}

unsafe fn read<T: Copy>(ptr: *mut u8) -> T {
    assert!(!ptr.is_null());
    unsafe { *(ptr as *const T) }
}

#[test]
fn dense_column_zero_initializes_and_grows() {
    let mut column = DenseColumn::<Position>::with_capacity(4, 8);

    assert_eq!(unsafe { read::<Position>(column.get(0)) }, Position::zeroed());
    assert_eq!(unsafe { read::<Position>(column.get(3)) }, Position::zeroed());
    assert!(column.get(4).is_null(), "row beyond capacity must be null");

    column.expand(5);
    assert!(!column.get(4).is_null());
    assert_eq!(unsafe { read::<Position>(column.get(4)) }, Position::zeroed());
    assert!(column.stats().capacity >= 5);
}

#[test]
fn dense_column_expand_below_capacity_keeps_pointers() {
    let mut column = DenseColumn::<Velocity>::with_capacity(16, 16);
    let before = column.get(3);
    column.expand(10);
    assert_eq!(column.get(3), before);
    assert_eq!(column.stats().capacity, 16);
}

#[test]
fn set_any_checks_row_and_type() {
    let mut column = DenseColumn::<Position>::with_capacity(2, 2);
    let value = Position { x: 1.0, y: 2.0, z: 3.0 };

    assert!(column.set_any(0, &value));
    assert_eq!(unsafe { read::<Position>(column.get(0)) }, value);

    assert!(!column.set_any(10, &value), "out-of-range row must fail silently");
    assert!(
        !column.set_any(0, &Velocity { dx: 1.0, dy: 1.0 }),
        "wrong element type must fail silently"
    );
    assert_eq!(unsafe { read::<Position>(column.get(0)) }, value);
}

#[test]
fn copy_transfers_one_element() {
    let mut source = DenseColumn::<Position>::with_capacity(4, 4);
    let mut destination = DenseColumn::<Position>::with_capacity(4, 4);
    let value = Position { x: 9.0, y: 8.0, z: 7.0 };

    source.set_any(2, &value);
    unsafe { destination.copy(1, source.get(2) as *const u8) };
    assert_eq!(unsafe { read::<Position>(destination.get(1)) }, value);
    assert_eq!(unsafe { read::<Position>(destination.get(0)) }, Position::zeroed());
}

#[test]
fn clear_row_zeroes_one_slot() {
    let mut column = DenseColumn::<Position>::with_capacity(2, 2);
    let value = Position { x: 5.0, y: 5.0, z: 5.0 };

    column.set_any(0, &value);
    column.set_any(1, &value);
    column.clear_row(0);

    assert_eq!(unsafe { read::<Position>(column.get(0)) }, Position::zeroed());
    assert_eq!(unsafe { read::<Position>(column.get(1)) }, value);
}

#[test]
fn shrink_and_reset_release_rows() {
    let mut column = DenseColumn::<Velocity>::with_capacity(8, 8);
    column.set_any(7, &Velocity { dx: 1.0, dy: 2.0 });

    column.shrink(4);
    assert_eq!(column.stats().capacity, 4);
    assert!(column.get(7).is_null());
    assert!(!column.get(3).is_null());

    column.reset();
    assert_eq!(column.stats().capacity, 0);
    assert!(column.get(0).is_null());
}

#[test]
fn stats_report_the_element_type() {
    let column = DenseColumn::<Position>::with_capacity(3, 1);
    let stats = column.stats();

    assert_eq!(stats.type_id, TypeId::of::<Position>());
    assert!(stats.type_name.contains("Position"));
    assert_eq!(stats.element_size, std::mem::size_of::<Position>());
    assert_eq!(stats.capacity, 3);
}

#[test]
fn singleton_column_shares_one_slot() {
    let shared = SingletonColumn::<Velocity>::new();
    let mut clone_a: Box<dyn ColumnStorage> = Box::new(shared.clone());
    let clone_b: Box<dyn ColumnStorage> = Box::new(shared);

    // Every row of every clone resolves to the same element address.
    let address = clone_a.get(0);
    assert_eq!(clone_a.get(99), address);
    assert_eq!(clone_b.get(0), address);
    assert_eq!(clone_b.get(12345), address);

    clone_a.set_any(7, &Velocity { dx: 4.0, dy: -1.0 });
    assert_eq!(
        unsafe { read::<Velocity>(clone_b.get(0)) },
        Velocity { dx: 4.0, dy: -1.0 }
    );
}

#[test]
fn singleton_column_ignores_sizing_operations() {
    let mut column: Box<dyn ColumnStorage> = Box::new(SingletonColumn::<Position>::new());
    let value = Position { x: 1.0, y: 1.0, z: 1.0 };
    column.set_any(0, &value);
    let address = column.get(0);

    column.expand(10_000);
    column.clear_row(0);
    column.shrink(0);
    column.reset();

    assert_eq!(column.get(0), address);
    assert_eq!(unsafe { read::<Position>(column.get(0)) }, value);
    assert_eq!(column.stats().capacity, 1);
}

#[test]
fn singleton_copy_tolerates_aliasing_sources() {
    let mut column: Box<dyn ColumnStorage> = Box::new(SingletonColumn::<Position>::new());
    let value = Position { x: 3.0, y: 2.0, z: 1.0 };
    column.set_any(0, &value);

    // A transition can feed the slot its own address.
    let address = column.get(0) as *const u8;
    unsafe { column.copy(0, address) };
    assert_eq!(unsafe { read::<Position>(column.get(0)) }, value);
}
