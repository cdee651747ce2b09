//! Row-level collaborators: where string cells come from and go to.
//!
//! The engine never tokenizes text itself. [`io_utils`](crate::io_utils)
//! provides implementations backed by the `csv` crate.

use std::io;

/// Produces rows in input order, the header row first.
pub trait RowSource {
    /// `Ok(None)` signals the end of input.
    fn read_row(&mut self) -> io::Result<Option<Vec<String>>>;
}

/// Consumes rows in output order.
pub trait RowSink {
    fn write_row(&mut self, row: &[String]) -> io::Result<()>;

    /// Rows written before a successful flush are not guaranteed to be persisted.
    fn flush(&mut self) -> io::Result<()>;
}

impl<S: RowSource + ?Sized> RowSource for &mut S {
    fn read_row(&mut self) -> io::Result<Option<Vec<String>>> {
        (**self).read_row()
    }
}

impl<K: RowSink + ?Sized> RowSink for &mut K {
    fn write_row(&mut self, row: &[String]) -> io::Result<()> {
        (**self).write_row(row)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

impl<S: RowSource + ?Sized> RowSource for Box<S> {
    fn read_row(&mut self) -> io::Result<Option<Vec<String>>> {
        (**self).read_row()
    }
}

impl<K: RowSink + ?Sized> RowSink for Box<K> {
    fn write_row(&mut self, row: &[String]) -> io::Result<()> {
        (**self).write_row(row)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}
