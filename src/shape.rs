//! Static description of a record type's declared fields.
//!
//! A [`TypeShape`] is what the schema introspector walks. It is normally
//! produced by [`tabular_record!`](crate::tabular_record), but can be written
//! by hand for types that implement [`Record`](crate::Record) manually.

use std::any::{TypeId, type_name};

use crate::record::{OptionalRecord, Record};

#[derive(Debug, Clone)]
pub struct TypeShape {
    pub type_id: TypeId,
    pub type_name: &'static str,
    pub layout: Layout,
}

#[derive(Debug, Clone)]
pub enum Layout {
    /// Declared fields in declaration order. A field's position in this list
    /// is the index passed to [`Fields::slot`](crate::Fields::slot).
    Struct(Vec<FieldShape>),
    Scalar,
}

#[derive(Debug, Clone)]
pub struct FieldShape {
    pub ident: &'static str,
    pub tag: Option<&'static str>,
    pub public: bool,
    pub kind: FieldKind,
}

#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// A single cell converted by the value codec.
    Value,
    /// A sub-record whose fields are flattened into the parent schema.
    Record {
        shape: fn() -> TypeShape,
        optional: bool,
        embedded: bool,
    },
}

impl TypeShape {
    /// An empty record layout for `T`, extended with [`TypeShape::field`].
    pub fn record<T: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            layout: Layout::Struct(Vec::new()),
        }
    }

    pub fn scalar<T: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            layout: Layout::Scalar,
        }
    }

    pub fn field(mut self, field: FieldShape) -> Self {
        match &mut self.layout {
            Layout::Struct(fields) => fields.push(field),
            Layout::Scalar => self.layout = Layout::Struct(vec![field]),
        }
        self
    }

    pub fn fields(&self) -> &[FieldShape] {
        match &self.layout {
            Layout::Struct(fields) => fields,
            Layout::Scalar => &[],
        }
    }

    pub fn is_record(&self) -> bool {
        matches!(self.layout, Layout::Struct(_))
    }
}

impl FieldShape {
    fn new(ident: &'static str, kind: FieldKind) -> Self {
        Self {
            ident,
            tag: None,
            public: true,
            kind,
        }
    }

    pub fn value(ident: &'static str) -> Self {
        Self::new(ident, FieldKind::Value)
    }

    pub fn nested<T: Record>(ident: &'static str) -> Self {
        Self::new(
            ident,
            FieldKind::Record {
                shape: T::shape,
                optional: false,
                embedded: false,
            },
        )
    }

    /// A sub-record held in an `Option`, instantiated only when one of its
    /// columns carries data.
    pub fn optional<O: OptionalRecord>(ident: &'static str) -> Self {
        Self::new(
            ident,
            FieldKind::Record {
                shape: <O::Inner as Record>::shape,
                optional: true,
                embedded: false,
            },
        )
    }

    pub fn embedded<T: Record>(ident: &'static str) -> Self {
        Self::nested::<T>(ident).into_embedded()
    }

    pub fn embedded_optional<O: OptionalRecord>(ident: &'static str) -> Self {
        Self::optional::<O>(ident).into_embedded()
    }

    fn into_embedded(mut self) -> Self {
        if let FieldKind::Record { embedded, .. } = &mut self.kind {
            *embedded = true;
        }
        self
    }

    pub fn tag(mut self, tag: &'static str) -> Self {
        self.tag = Some(tag);
        self
    }

    pub fn visible(mut self, public: bool) -> Self {
        self.public = public;
        self
    }

    pub fn private(self) -> Self {
        self.visible(false)
    }
}
