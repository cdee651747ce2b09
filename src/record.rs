//! The capability a type needs to be read from and written to rows.
//!
//! [`Record`] supplies the declared shape, [`Fields`] gives positional access
//! to each declared field so the assembler and projector can follow a
//! descriptor path without knowing the concrete type.

use crate::codec::CellValue;
use crate::shape::TypeShape;

pub trait Record: Fields + Default + 'static {
    fn shape() -> TypeShape;
}

/// Positional field access, indexed by declaration order.
///
/// Indices must agree with the field list of the type's [`TypeShape`],
/// including private fields, which keep their slot but are never visited.
pub trait Fields {
    fn slot(&self, index: usize) -> Option<Slot<'_>>;
    fn slot_mut(&mut self, index: usize) -> Option<SlotMut<'_>>;
}

pub enum Slot<'a> {
    Value(&'a dyn CellValue),
    Nested(&'a dyn Fields),
    Optional(Option<&'a dyn Fields>),
}

pub enum SlotMut<'a> {
    Value(&'a mut dyn CellValue),
    Nested(&'a mut dyn Fields),
    Optional(&'a mut dyn OptionalFields),
}

/// An optional sub-record slot that can be allocated in place.
pub trait OptionalFields {
    fn present(&self) -> Option<&dyn Fields>;
    fn instantiate(&mut self) -> &mut dyn Fields;
}

pub trait OptionalRecord: OptionalFields {
    type Inner: Record;
}

impl<T: Record> OptionalFields for Option<T> {
    fn present(&self) -> Option<&dyn Fields> {
        self.as_ref().map(|inner| inner as &dyn Fields)
    }

    fn instantiate(&mut self) -> &mut dyn Fields {
        self.get_or_insert_with(T::default)
    }
}

impl<T: Record> OptionalRecord for Option<T> {
    type Inner = T;
}

impl<T: Fields + ?Sized> Fields for Box<T> {
    fn slot(&self, index: usize) -> Option<Slot<'_>> {
        (**self).slot(index)
    }

    fn slot_mut(&mut self, index: usize) -> Option<SlotMut<'_>> {
        (**self).slot_mut(index)
    }
}

/// A boxed record is a pointer-shaped root: each row allocates a fresh box.
impl<T: Record> Record for Box<T> {
    fn shape() -> TypeShape {
        T::shape()
    }
}
