//! Record assembly: one row of cells into a freshly allocated record.

use crate::{
    descriptor::{FieldDescriptor, PathStep},
    error::{Error, Result},
    introspect::Schema,
    matcher::MatchTable,
    record::{Fields, Record, SlotMut},
};

/// Builds a `T` from `row`, writing each matched cell into its field.
///
/// Columns past the end of the match table, or matched to nothing, are
/// skipped. The first conversion failure aborts the row.
pub fn assemble<T: Record>(schema: &Schema, table: &MatchTable, row: &[String]) -> Result<T> {
    let mut record = T::default();
    for (column, cell) in row.iter().enumerate() {
        let Some(field_index) = table.field_index(column) else {
            continue;
        };
        let field = &schema.fields()[field_index];
        let target = Target {
            type_name: schema.type_name(),
            field,
            column,
            cell,
        };
        target.store(&mut record, field.path())?;
    }
    Ok(record)
}

struct Target<'a> {
    type_name: &'static str,
    field: &'a FieldDescriptor,
    column: usize,
    cell: &'a str,
}

impl Target<'_> {
    fn store(&self, record: &mut dyn Fields, path: &[PathStep]) -> Result<()> {
        let Some((step, rest)) = path.split_first() else {
            return Err(self.shape_mismatch());
        };
        let Some(slot) = record.slot_mut(step.index) else {
            return Err(self.shape_mismatch());
        };
        match slot {
            SlotMut::Value(value) if rest.is_empty() => {
                if self.field.omit_empty() && self.cell.is_empty() {
                    return Ok(());
                }
                value
                    .read_cell(self.cell)
                    .map_err(|source| Error::FieldConversion {
                        column: self.column,
                        path: self.field.path_display(),
                        source,
                    })
            }
            SlotMut::Nested(inner) if !rest.is_empty() => self.store(inner, rest),
            SlotMut::Optional(optional) if !rest.is_empty() => {
                // An empty cell never allocates a missing sub-record.
                if self.cell.is_empty() && optional.present().is_none() {
                    return Ok(());
                }
                self.store(optional.instantiate(), rest)
            }
            _ => Err(self.shape_mismatch()),
        }
    }

    fn shape_mismatch(&self) -> Error {
        Error::ShapeMismatch {
            type_name: self.type_name,
            path: self.field.path_display(),
        }
    }
}
