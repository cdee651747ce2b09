use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    marshal::Marshaller,
    record::Record,
    rows::{RowSink, RowSource},
    unmarshal::Unmarshaller,
    validated::ValidatedSchema,
};

/// Which names make up the header row written by a [`Marshaller`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderStyle {
    /// One header cell per declared name, aliases included.
    #[default]
    AllNames,
    /// Only the first declared name of each field.
    Canonical,
}

/// Session options. All strictness checks are off by default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Reject inputs whose headers leave any mapped field without a column.
    pub fail_if_unmatched_struct_fields: bool,
    /// Reject inputs whose header row repeats a name.
    pub fail_if_duplicate_header_names: bool,
    /// Spread repeated headers across same-named fields in declaration order
    /// instead of sending them all to the first one.
    pub align_duplicate_headers_with_field_order: bool,
    pub header_style: HeaderStyle,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_if_unmatched_struct_fields(mut self, enabled: bool) -> Self {
        self.fail_if_unmatched_struct_fields = enabled;
        self
    }

    pub fn fail_if_duplicate_header_names(mut self, enabled: bool) -> Self {
        self.fail_if_duplicate_header_names = enabled;
        self
    }

    pub fn align_duplicate_headers_with_field_order(mut self, enabled: bool) -> Self {
        self.align_duplicate_headers_with_field_order = enabled;
        self
    }

    pub fn header_style(mut self, style: HeaderStyle) -> Self {
        self.header_style = style;
        self
    }

    /// Validates `T` against an input header row.
    pub fn validate<T: Record>(&self, headers: &[String]) -> Result<ValidatedSchema<T>> {
        ValidatedSchema::for_input(self, headers)
    }

    /// Reads the header row from `source` and opens a read session.
    pub fn unmarshaller<T: Record, S: RowSource>(&self, source: S) -> Result<Unmarshaller<T, S>> {
        Unmarshaller::with_config(self, source)
    }

    /// Opens a write session; the header row is written immediately.
    pub fn marshaller<T: Record, K: RowSink>(&self, sink: K) -> Result<Marshaller<T, K>> {
        Marshaller::with_config(self, sink)
    }
}
