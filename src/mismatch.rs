//! Vocabulary comparison between a schema and a header row.
//!
//! Runs independently of the header matcher so that duplicate alignment
//! never changes which fields count as unmatched.

use std::collections::HashSet;

use crate::descriptor::FieldDescriptor;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MismatchReport {
    /// Headers no field answers to, in header order, duplicates kept.
    pub unmatched_headers: Vec<String>,
    /// Every name of every field that no header refers to.
    pub unmatched_fields: Vec<String>,
}

impl MismatchReport {
    /// True when headers were supplied and none of them matched a field.
    pub fn no_overlap(&self, header_count: usize) -> bool {
        header_count > 0 && self.unmatched_headers.len() == header_count
    }
}

pub fn analyze(fields: &[FieldDescriptor], headers: &[String]) -> MismatchReport {
    let unmatched_headers = headers
        .iter()
        .filter(|header| !fields.iter().any(|field| field.matches(header)))
        .cloned()
        .collect();

    let unmatched_fields = fields
        .iter()
        .filter(|field| !headers.iter().any(|header| field.matches(header)))
        .flat_map(|field| field.names().iter().cloned())
        .collect();

    MismatchReport {
        unmatched_headers,
        unmatched_fields,
    }
}

/// The first header name that occurs more than once.
pub fn first_duplicate(headers: &[String]) -> Option<&str> {
    let mut seen = HashSet::with_capacity(headers.len());
    headers
        .iter()
        .map(String::as_str)
        .find(|header| !seen.insert(*header))
}
