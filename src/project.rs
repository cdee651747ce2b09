//! Record projection: the inverse of assembly, one cell per schema field.

use crate::{
    config::HeaderStyle,
    descriptor::{FieldDescriptor, PathStep},
    error::{Error, Result},
    introspect::Schema,
    record::{Fields, Slot},
};

/// Renders `record` as one cell per field, in schema order.
///
/// Fields behind an absent optional sub-record render as empty cells.
pub fn project(schema: &Schema, record: &dyn Fields) -> Result<Vec<String>> {
    schema
        .fields()
        .iter()
        .map(|field| render(record, field.path()).ok_or_else(|| shape_mismatch(schema, field)))
        .collect()
}

/// The header row matching [`project`]'s output for the given style.
pub fn project_headers(schema: &Schema, style: HeaderStyle) -> Vec<String> {
    match style {
        HeaderStyle::AllNames => schema.header_names(),
        HeaderStyle::Canonical => schema.canonical_headers(),
    }
}

fn render(record: &dyn Fields, path: &[PathStep]) -> Option<String> {
    let (step, rest) = path.split_first()?;
    match (record.slot(step.index)?, rest.is_empty()) {
        (Slot::Value(value), true) => Some(value.write_cell()),
        (Slot::Nested(inner), false) => render(inner, rest),
        (Slot::Optional(Some(inner)), false) => render(inner, rest),
        (Slot::Optional(None), false) => Some(String::new()),
        _ => None,
    }
}

fn shape_mismatch(schema: &Schema, field: &FieldDescriptor) -> Error {
    Error::ShapeMismatch {
        type_name: schema.type_name(),
        path: field.path_display(),
    }
}
