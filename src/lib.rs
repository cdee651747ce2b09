//! Bind CSV rows to statically declared record types.
//!
//! A record type describes its fields once (usually through
//! [`tabular_record!`]); the engine derives a cached [`Schema`] from that
//! description, reconciles it with a concrete header row into a
//! [`ValidatedSchema`], and then converts every row with no further
//! validation.
//!
//! - Reading: [`Unmarshaller`] pulls rows from a [`RowSource`] and assembles records.
//! - Writing: [`Marshaller`] projects records into rows for a [`RowSink`].
//! - Tokenizing is delegated to the `csv` crate through [`io_utils`].

#[macro_use]
mod macros;

pub mod assemble;
pub mod codec;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod introspect;
pub mod io_utils;
pub mod marshal;
pub mod matcher;
pub mod mismatch;
pub mod project;
pub mod record;
pub mod rows;
pub mod shape;
pub mod unmarshal;
pub mod validated;

pub use codec::{CellCodec, CellValue};
pub use config::{Config, HeaderStyle};
pub use descriptor::{FieldDescriptor, PathStep};
pub use error::{Error, Result};
pub use introspect::{Schema, introspect, schema_of};
pub use io_utils::{CsvRowSink, CsvRowSource};
pub use marshal::Marshaller;
pub use matcher::{MatchTable, match_headers};
pub use mismatch::MismatchReport;
pub use record::{Fields, OptionalFields, OptionalRecord, Record, Slot, SlotMut};
pub use rows::{RowSink, RowSource};
pub use shape::{FieldKind, FieldShape, Layout, TypeShape};
pub use unmarshal::{Unmarshaller, log_and_continue, stop_on_error};
pub use validated::ValidatedSchema;
