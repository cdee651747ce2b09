//! Schema introspection: turns a [`TypeShape`] into the ordered list of
//! mappable fields, and caches the result per record type.
//!
//! Traversal is depth first in declaration order. Sub-records expand in place
//! of the field that holds them, embedded ones never get a column of their
//! own, and `-` annotated or private fields are dropped.

use std::{
    any::TypeId,
    sync::{Arc, LazyLock},
};

use dashmap::DashMap;
use log::debug;

use crate::{
    descriptor::{Annotation, FieldDescriptor, PathStep, display_path, parse_annotation},
    error::{Error, Result},
    record::Record,
    shape::{FieldKind, TypeShape},
};

/// Process-wide schema cache keyed by record type. Introspection is pure, so
/// a racing first population simply keeps whichever schema landed first.
static SCHEMA_CACHE: LazyLock<DashMap<TypeId, Arc<Schema>>> = LazyLock::new(DashMap::new);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    type_name: &'static str,
    fields: Vec<FieldDescriptor>,
}

impl Schema {
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Every declared name of every field, in field order.
    pub fn header_names(&self) -> Vec<String> {
        self.fields
            .iter()
            .flat_map(|field| field.names().iter().cloned())
            .collect()
    }

    /// The first declared name of every field, in field order.
    pub fn canonical_headers(&self) -> Vec<String> {
        self.fields
            .iter()
            .map(|field| field.canonical_name().to_string())
            .collect()
    }
}

/// Returns the cached schema for `T`, introspecting it on first use.
pub fn schema_of<T: Record>() -> Result<Arc<Schema>> {
    let key = TypeId::of::<T>();
    if let Some(cached) = SCHEMA_CACHE.get(&key) {
        return Ok(Arc::clone(cached.value()));
    }

    let schema = Arc::new(introspect(&T::shape())?);
    debug!(
        "Introspected {} mappable field(s) on '{}'",
        schema.len(),
        schema.type_name()
    );
    let entry = SCHEMA_CACHE.entry(key).or_insert(schema);
    Ok(Arc::clone(entry.value()))
}

/// Builds a schema from a shape without consulting the cache.
pub fn introspect(shape: &TypeShape) -> Result<Schema> {
    if !shape.is_record() {
        return Err(Error::UnsupportedRootType {
            type_name: shape.type_name,
        });
    }

    let mut fields = Vec::new();
    let mut ancestors = vec![shape.type_id];
    collect_fields(shape, &[], &mut ancestors, &mut fields)?;

    if fields.is_empty() {
        return Err(Error::NoMappableFields {
            type_name: shape.type_name,
        });
    }
    Ok(Schema {
        type_name: shape.type_name,
        fields,
    })
}

fn collect_fields(
    shape: &TypeShape,
    prefix: &[PathStep],
    ancestors: &mut Vec<TypeId>,
    out: &mut Vec<FieldDescriptor>,
) -> Result<()> {
    for (index, field) in shape.fields().iter().enumerate() {
        if !field.public {
            continue;
        }
        let Annotation::Mapped { names, omit_empty } = parse_annotation(field.tag, field.ident)
        else {
            continue;
        };

        let mut path = prefix.to_vec();
        match field.kind {
            FieldKind::Value => {
                path.push(PathStep {
                    index,
                    ident: field.ident,
                    optional: false,
                });
                out.push(FieldDescriptor::new(names, omit_empty, path));
            }
            FieldKind::Record {
                shape: nested_shape,
                optional,
                ..
            } => {
                path.push(PathStep {
                    index,
                    ident: field.ident,
                    optional,
                });
                let nested = nested_shape();
                if !nested.is_record() {
                    return Err(Error::ShapeMismatch {
                        type_name: shape.type_name,
                        path: display_path(&path),
                    });
                }
                if ancestors.contains(&nested.type_id) {
                    return Err(Error::RecursiveRecord {
                        type_name: nested.type_name,
                        path: display_path(&path),
                    });
                }
                ancestors.push(nested.type_id);
                collect_fields(&nested, &path, ancestors, out)?;
                ancestors.pop();
            }
        }
    }
    Ok(())
}
