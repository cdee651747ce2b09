//! Header matching: aligns each header position with at most one field.

use std::collections::HashMap;

use crate::{descriptor::FieldDescriptor, introspect::Schema};

/// Header position to field index, `None` for columns no field claims.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MatchTable {
    entries: Vec<Option<usize>>,
}

impl MatchTable {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index into [`Schema::fields`] for the column at `position`.
    pub fn field_index(&self, position: usize) -> Option<usize> {
        self.entries.get(position).copied().flatten()
    }

    pub fn entries(&self) -> &[Option<usize>] {
        &self.entries
    }

    pub fn matched_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_some()).count()
    }
}

/// Builds the match table for `headers`.
///
/// With `align_duplicates`, the k-th occurrence of a header name goes to the
/// k-th field (in declaration order) answering to that name, and is left
/// unmatched once those fields run out. Without it every occurrence maps to
/// the first such field.
pub fn match_headers(schema: &Schema, headers: &[String], align_duplicates: bool) -> MatchTable {
    let mut consumed: HashMap<&str, usize> = HashMap::new();
    let entries = headers
        .iter()
        .map(|header| {
            let occurrence = consumed.get(header.as_str()).copied().unwrap_or(0);
            let matched = nth_matching_field(schema.fields(), header, occurrence);
            if align_duplicates && matched.is_some() {
                consumed.insert(header.as_str(), occurrence + 1);
            }
            matched
        })
        .collect();
    MatchTable { entries }
}

fn nth_matching_field(fields: &[FieldDescriptor], header: &str, occurrence: usize) -> Option<usize> {
    fields
        .iter()
        .enumerate()
        .filter(|(_, field)| field.matches(header))
        .nth(occurrence)
        .map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        introspect::introspect,
        shape::{FieldShape, TypeShape},
    };

    fn schema(tags: &[&'static str]) -> Schema {
        const IDENTS: &[&str] = &["f0", "f1", "f2", "f3"];
        let shape = tags
            .iter()
            .zip(IDENTS)
            .fold(TypeShape::record::<()>(), |shape, (tag, ident)| {
                shape.field(FieldShape::value(*ident).tag(*tag))
            });
        introspect(&shape).unwrap()
    }

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn duplicate_headers_fan_out_when_aligned() {
        let schema = schema(&["a", "b", "b"]);
        let table = match_headers(&schema, &headers(&["b", "b"]), true);
        assert_eq!(table.entries(), &[Some(1), Some(2)]);
    }

    #[test]
    fn duplicate_headers_collapse_when_not_aligned() {
        let schema = schema(&["a", "b", "b"]);
        let table = match_headers(&schema, &headers(&["b", "b"]), false);
        assert_eq!(table.entries(), &[Some(1), Some(1)]);
    }

    #[test]
    fn surplus_duplicates_stay_unmatched() {
        let schema = schema(&["a", "b"]);
        let table = match_headers(&schema, &headers(&["b", "a", "b"]), true);
        assert_eq!(table.entries(), &[Some(1), Some(0), None]);
        assert_eq!(table.matched_count(), 2);
    }

    #[test]
    fn aliases_and_padding_match() {
        let schema = schema(&["id,identifier", "name"]);
        let table = match_headers(&schema, &headers(&[" name ", "identifier", "other"]), true);
        assert_eq!(table.entries(), &[Some(1), Some(0), None]);
        assert_eq!(table.field_index(7), None);
    }
}
