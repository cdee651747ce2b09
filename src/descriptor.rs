use std::fmt;

pub(crate) const EXCLUDE_MARKER: &str = "-";
pub(crate) const OMIT_EMPTY_MODIFIER: &str = "omitempty";
const TAG_SEPARATOR: char = ',';

/// One mappable field: the column names it answers to and how to reach it
/// from the record root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    names: Vec<String>,
    omit_empty: bool,
    path: Vec<PathStep>,
}

/// One hop from a record to one of its declared fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathStep {
    pub index: usize,
    pub ident: &'static str,
    /// The slot holds an optional sub-record that may need allocating
    /// before the next step.
    pub optional: bool,
}

impl FieldDescriptor {
    pub(crate) fn new(names: Vec<String>, omit_empty: bool, path: Vec<PathStep>) -> Self {
        debug_assert!(!names.is_empty(), "descriptor without names");
        debug_assert!(!path.is_empty(), "descriptor without path");
        Self {
            names,
            omit_empty,
            path,
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn canonical_name(&self) -> &str {
        &self.names[0]
    }

    pub fn omit_empty(&self) -> bool {
        self.omit_empty
    }

    pub fn path(&self) -> &[PathStep] {
        &self.path
    }

    /// Matches a header either verbatim or with surrounding whitespace removed.
    pub fn matches(&self, header: &str) -> bool {
        let trimmed = header.trim();
        self.names
            .iter()
            .any(|name| name == header || name == trimmed)
    }

    pub fn path_display(&self) -> String {
        display_path(&self.path)
    }
}

impl fmt::Display for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.names.join("|"), self.path_display())
    }
}

pub(crate) fn display_path(path: &[PathStep]) -> String {
    path.iter()
        .map(|step| step.ident)
        .collect::<Vec<_>>()
        .join(".")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Annotation {
    Excluded,
    Mapped { names: Vec<String>, omit_empty: bool },
}

/// Parses a field annotation such as `"id,identifier,omitempty"`.
///
/// Only `omitempty` and a lone `-` are recognised; any other token is taken
/// as a literal column name. A missing or empty leading name falls back to
/// the field identifier.
pub(crate) fn parse_annotation(tag: Option<&str>, ident: &str) -> Annotation {
    let mut omit_empty = false;
    let mut tokens = Vec::new();
    for token in tag.unwrap_or_default().split(TAG_SEPARATOR) {
        if token == OMIT_EMPTY_MODIFIER {
            omit_empty = true;
        } else {
            tokens.push(token);
        }
    }

    if tokens.len() == 1 && tokens[0] == EXCLUDE_MARKER {
        return Annotation::Excluded;
    }
    let mut names: Vec<String> = Vec::with_capacity(tokens.len());
    if tokens.first().is_some_and(|first| !first.is_empty()) {
        for token in tokens.into_iter().filter(|token| !token.is_empty()) {
            if !names.iter().any(|existing| existing == token) {
                names.push(token.to_string());
            }
        }
    } else {
        names.push(ident.to_string());
    }
    Annotation::Mapped { names, omit_empty }
}
