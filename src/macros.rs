/// Declares a record struct together with its [`Record`](crate::Record) and
/// [`Fields`](crate::Fields) implementations.
///
/// Every field carries a `#[csv(kind)]` or `#[csv(kind = "annotation")]`
/// marker, where `kind` is one of:
///
/// - `value`: a single column converted by [`CellCodec`](crate::CellCodec)
/// - `nested`: a sub-record flattened into the parent's columns
/// - `optional`: an `Option<T>` / `Option<Box<T>>` sub-record, allocated on demand
/// - `embedded` / `embedded_optional`: composition; only the children are mapped
///
/// The annotation is a comma-separated alias list, optionally containing
/// `omitempty`, or `-` to exclude the field. Fields without `pub` visibility
/// keep their slot but are never mapped. Doc comments go above the marker,
/// any other field attribute below it.
///
/// ```
/// csv_bind::tabular_record! {
///     #[derive(Debug, Default, PartialEq)]
///     pub struct Order {
///         /// Upstream order number.
///         #[csv(value = "order_id")]
///         pub id: u64,
///         #[csv(value = "total,amount,omitempty")]
///         pub total: f64,
///         #[csv(value = "-")]
///         #[allow(dead_code)]
///         pub scratch: String,
///     }
/// }
///
/// let schema = csv_bind::schema_of::<Order>().unwrap();
/// assert_eq!(schema.header_names(), vec!["order_id", "total", "amount"]);
/// ```
#[macro_export]
macro_rules! tabular_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[doc = $doc:literal])*
                #[csv($kind:ident $(= $tag:literal)?)]
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $fty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[doc = $doc])*
                $(#[$fmeta])*
                $fvis $field: $fty,
            )*
        }

        impl $crate::Record for $name {
            fn shape() -> $crate::TypeShape {
                $crate::TypeShape::record::<Self>()
                    $(
                        .field(
                            $crate::__field_shape!($kind, $fty, stringify!($field) $(, $tag)?)
                                .visible(!stringify!($fvis).is_empty())
                        )
                    )*
            }
        }

        impl $crate::Fields for $name {
            #[allow(unused_assignments, unused_mut, unused_variables)]
            fn slot(&self, index: usize) -> ::std::option::Option<$crate::Slot<'_>> {
                let mut position = 0usize;
                $(
                    if index == position {
                        return ::std::option::Option::Some($crate::__field_slot!($kind, &self.$field));
                    }
                    position += 1;
                )*
                ::std::option::Option::None
            }

            #[allow(unused_assignments, unused_mut, unused_variables)]
            fn slot_mut(&mut self, index: usize) -> ::std::option::Option<$crate::SlotMut<'_>> {
                let mut position = 0usize;
                $(
                    if index == position {
                        return ::std::option::Option::Some(
                            $crate::__field_slot_mut!($kind, &mut self.$field),
                        );
                    }
                    position += 1;
                )*
                ::std::option::Option::None
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __field_shape {
    (value, $fty:ty, $ident:expr $(, $tag:literal)?) => {
        $crate::FieldShape::value($ident) $(.tag($tag))?
    };
    (nested, $fty:ty, $ident:expr $(, $tag:literal)?) => {
        $crate::FieldShape::nested::<$fty>($ident) $(.tag($tag))?
    };
    (optional, $fty:ty, $ident:expr $(, $tag:literal)?) => {
        $crate::FieldShape::optional::<$fty>($ident) $(.tag($tag))?
    };
    (embedded, $fty:ty, $ident:expr $(, $tag:literal)?) => {
        $crate::FieldShape::embedded::<$fty>($ident) $(.tag($tag))?
    };
    (embedded_optional, $fty:ty, $ident:expr $(, $tag:literal)?) => {
        $crate::FieldShape::embedded_optional::<$fty>($ident) $(.tag($tag))?
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __field_slot {
    (value, $place:expr) => {
        $crate::Slot::Value($place)
    };
    (nested, $place:expr) => {
        $crate::Slot::Nested($place)
    };
    (embedded, $place:expr) => {
        $crate::Slot::Nested($place)
    };
    (optional, $place:expr) => {
        $crate::Slot::Optional($crate::OptionalFields::present($place))
    };
    (embedded_optional, $place:expr) => {
        $crate::Slot::Optional($crate::OptionalFields::present($place))
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __field_slot_mut {
    (value, $place:expr) => {
        $crate::SlotMut::Value($place)
    };
    (nested, $place:expr) => {
        $crate::SlotMut::Nested($place)
    };
    (embedded, $place:expr) => {
        $crate::SlotMut::Nested($place)
    };
    (optional, $place:expr) => {
        $crate::SlotMut::Optional($place)
    };
    (embedded_optional, $place:expr) => {
        $crate::SlotMut::Optional($place)
    };
}
