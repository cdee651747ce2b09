//! Write sessions: header row first, then one row per record.

use std::{
    any::{Any, TypeId, type_name},
    fmt,
};

use log::trace;

use crate::{
    config::Config,
    error::{Error, Result},
    record::Record,
    rows::RowSink,
    validated::ValidatedSchema,
};

pub struct Marshaller<T, K> {
    validated: ValidatedSchema<T>,
    sink: K,
}

impl<T: Record, K: RowSink> Marshaller<T, K> {
    /// Opens a session with the default [`Config`].
    pub fn new(sink: K) -> Result<Self> {
        Self::with_config(&Config::default(), sink)
    }

    /// Validates `T` for output and writes the header row straight away.
    pub fn with_config(config: &Config, mut sink: K) -> Result<Self> {
        let validated = ValidatedSchema::for_output(config)?;
        sink.write_row(&validated.output_headers())?;
        Ok(Self { validated, sink })
    }

    pub fn write(&mut self, record: &T) -> Result<()> {
        let row = self.validated.project(record)?;
        trace!("Writing {} cell(s)", row.len());
        self.sink.write_row(&row)?;
        Ok(())
    }

    /// Writes every record; [`Marshaller::flush`] must still be called.
    pub fn write_all<'a, I>(&mut self, records: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a T>,
    {
        for record in records {
            self.write(record)?;
        }
        Ok(())
    }

    /// Writes a value whose type is only known at runtime.
    pub fn write_any<R: Any>(&mut self, record: &R) -> Result<()> {
        match (record as &dyn Any).downcast_ref::<T>() {
            Some(record) => self.write(record),
            None => Err(Error::TypeMismatch {
                expected: type_name::<T>(),
                found: type_name::<R>(),
            }),
        }
    }

    /// Writes a slice of values whose element type is only known at runtime.
    /// Nothing is written when the element type is not `T`.
    pub fn write_all_any<R: Any>(&mut self, records: &[R]) -> Result<()> {
        if TypeId::of::<R>() != TypeId::of::<T>() {
            return Err(Error::TypeMismatch {
                expected: type_name::<[T]>(),
                found: type_name::<[R]>(),
            });
        }
        records.iter().try_for_each(|record| self.write_any(record))
    }

    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush()?;
        Ok(())
    }

    pub fn validated(&self) -> &ValidatedSchema<T> {
        &self.validated
    }

    pub fn into_inner(self) -> K {
        self.sink
    }
}

impl<T, K> fmt::Debug for Marshaller<T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Marshaller")
            .field("validated", &self.validated)
            .finish_non_exhaustive()
    }
}
