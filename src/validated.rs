//! The immutable, session-scoped pairing of a schema with a header row.
//!
//! Construction runs introspection, then header reconciliation, then freezes
//! the result. Any failure along the way rejects the session outright; once
//! built, the same value serves every row.

use std::{fmt, marker::PhantomData, sync::Arc};

use log::debug;

use crate::{
    assemble,
    config::{Config, HeaderStyle},
    descriptor::FieldDescriptor,
    error::{Error, Result},
    introspect::{Schema, schema_of},
    matcher::{MatchTable, match_headers},
    mismatch::{self, MismatchReport},
    project,
    record::Record,
};

pub struct ValidatedSchema<T> {
    schema: Arc<Schema>,
    headers: Vec<String>,
    match_table: Option<MatchTable>,
    mismatch: MismatchReport,
    header_style: HeaderStyle,
    record: PhantomData<fn() -> T>,
}

impl<T: Record> ValidatedSchema<T> {
    /// Read path: reconcile `T` with the header row of the input.
    pub fn for_input(config: &Config, headers: &[String]) -> Result<Self> {
        let schema = schema_of::<T>()?;

        let mismatch = mismatch::analyze(schema.fields(), headers);
        if mismatch.no_overlap(headers.len()) {
            return Err(Error::NoHeaderOverlap {
                expected: schema.header_names(),
                found: mismatch.unmatched_headers,
            });
        }
        if config.fail_if_unmatched_struct_fields && !mismatch.unmatched_fields.is_empty() {
            return Err(Error::UnmatchedStructFields(mismatch.unmatched_fields));
        }
        if config.fail_if_duplicate_header_names {
            if let Some(duplicate) = mismatch::first_duplicate(headers) {
                return Err(Error::DuplicateHeaderName(duplicate.to_string()));
            }
        }

        let match_table = match_headers(
            &schema,
            headers,
            config.align_duplicate_headers_with_field_order,
        );
        debug!(
            "Matched {}/{} header(s) to '{}' ({} unmatched field name(s))",
            match_table.matched_count(),
            headers.len(),
            schema.type_name(),
            mismatch.unmatched_fields.len()
        );

        Ok(Self {
            schema,
            headers: headers.to_vec(),
            match_table: Some(match_table),
            mismatch,
            header_style: config.header_style,
            record: PhantomData,
        })
    }

    /// Write path: no header row to reconcile, so strictness options do not apply.
    pub fn for_output(config: &Config) -> Result<Self> {
        let schema = schema_of::<T>()?;
        let mismatch = mismatch::analyze(schema.fields(), &[]);
        debug!(
            "Prepared '{}' for output with {} column(s)",
            schema.type_name(),
            schema.len()
        );
        Ok(Self {
            schema,
            headers: Vec::new(),
            match_table: None,
            mismatch,
            header_style: config.header_style,
            record: PhantomData,
        })
    }

    pub fn assemble(&self, row: &[String]) -> Result<T> {
        match &self.match_table {
            Some(table) => assemble::assemble(&self.schema, table, row),
            None => assemble::assemble(&self.schema, &MatchTable::default(), row),
        }
    }

    pub fn project(&self, record: &T) -> Result<Vec<String>> {
        project::project(&self.schema, record)
    }

    pub fn output_headers(&self) -> Vec<String> {
        project::project_headers(&self.schema, self.header_style)
    }
}

impl<T> ValidatedSchema<T> {
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        self.schema.fields()
    }

    /// Input headers this schema was validated against; empty for output.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn match_table(&self) -> Option<&MatchTable> {
        self.match_table.as_ref()
    }

    pub fn mismatch(&self) -> &MismatchReport {
        &self.mismatch
    }

    pub fn record_type(&self) -> &'static str {
        self.schema.type_name()
    }

    /// The field the input column at `position` is bound to.
    pub fn field_for_column(&self, position: usize) -> Option<&FieldDescriptor> {
        let index = self.match_table.as_ref()?.field_index(position)?;
        self.schema.fields().get(index)
    }
}

impl<T> fmt::Debug for ValidatedSchema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedSchema")
            .field("record_type", &self.record_type())
            .field("headers", &self.headers)
            .field("match_table", &self.match_table)
            .field("mismatch", &self.mismatch)
            .finish()
    }
}
