//! Read sessions: header validation once, then one record per row.

use std::fmt;

use log::{trace, warn};

use crate::{
    config::Config,
    error::{Error, Result},
    record::Record,
    rows::RowSource,
    validated::ValidatedSchema,
};

/// Error callback that stops bulk reading at the first failing row.
pub fn stop_on_error(err: Error) -> Result<()> {
    Err(err)
}

/// Error callback that logs the failing row and keeps reading.
pub fn log_and_continue(err: Error) -> Result<()> {
    warn!("Skipping row: {err}");
    Ok(())
}

pub struct Unmarshaller<T, S> {
    validated: ValidatedSchema<T>,
    source: S,
    line: usize,
}

impl<T: Record, S: RowSource> Unmarshaller<T, S> {
    /// Opens a session with the default [`Config`].
    pub fn new(source: S) -> Result<Self> {
        Self::with_config(&Config::default(), source)
    }

    /// Consumes the header row from `source` and validates it against `T`.
    pub fn with_config(config: &Config, mut source: S) -> Result<Self> {
        let headers = source.read_row()?.ok_or(Error::MissingHeader)?;
        let validated = ValidatedSchema::for_input(config, &headers)?;
        Ok(Self {
            validated,
            source,
            line: 1,
        })
    }

    /// Reads the next record, `Ok(None)` at end of input.
    ///
    /// Errors carry the 1-based line of the offending row (the header is
    /// line 1) and do not end the session: the next call moves on to the
    /// following row.
    pub fn read(&mut self) -> Result<Option<T>> {
        let row = match self.source.read_row() {
            Ok(Some(row)) => row,
            Ok(None) => return Ok(None),
            Err(err) => {
                self.line += 1;
                return Err(Error::Io(err).on_line(self.line));
            }
        };
        self.line += 1;
        trace!("Assembling line {} ({} cell(s))", self.line, row.len());
        self.validated
            .assemble(&row)
            .map(Some)
            .map_err(|err| err.on_line(self.line))
    }

    /// Reads every remaining row, handing failures to `on_error`.
    ///
    /// `on_error` returning `Err` stops reading and that error is returned.
    pub fn read_all<E>(&mut self, on_error: E) -> Result<Vec<T>>
    where
        E: FnMut(Error) -> Result<()>,
    {
        let mut records = Vec::new();
        self.read_all_with(
            |record| {
                records.push(record);
                Ok(())
            },
            on_error,
        )?;
        Ok(records)
    }

    /// Drives the session to the end of input.
    ///
    /// Each record goes to `on_success` and each row failure to `on_error`.
    /// Either callback stops the loop by returning `Err`, which is then
    /// returned from here.
    pub fn read_all_with<F, E>(&mut self, mut on_success: F, mut on_error: E) -> Result<()>
    where
        F: FnMut(T) -> Result<()>,
        E: FnMut(Error) -> Result<()>,
    {
        loop {
            match self.read() {
                Ok(Some(record)) => on_success(record)?,
                Ok(None) => return Ok(()),
                Err(err) => on_error(err)?,
            }
        }
    }

    pub fn validated(&self) -> &ValidatedSchema<T> {
        &self.validated
    }

    pub fn headers(&self) -> &[String] {
        self.validated.headers()
    }

    /// Line number of the last row read; 1 right after the header.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<T: Record, S: RowSource> Iterator for Unmarshaller<T, S> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read().transpose()
    }
}

impl<T, S> fmt::Debug for Unmarshaller<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unmarshaller")
            .field("validated", &self.validated)
            .field("line", &self.line)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::VecDeque, io};

    use super::*;

    crate::tabular_record! {
        #[derive(Debug, Default, PartialEq)]
        pub struct Reading {
            #[csv(value = "sensor")]
            pub sensor: String,
            #[csv(value = "value")]
            pub value: f64,
        }
    }

    struct Scripted(VecDeque<io::Result<Option<Vec<String>>>>);

    impl RowSource for Scripted {
        fn read_row(&mut self) -> io::Result<Option<Vec<String>>> {
            self.0.pop_front().unwrap_or(Ok(None))
        }
    }

    fn row(cells: &[&str]) -> io::Result<Option<Vec<String>>> {
        Ok(Some(cells.iter().map(|cell| cell.to_string()).collect()))
    }

    #[test]
    fn io_failures_are_annotated_and_skippable() {
        let source = Scripted(VecDeque::from(vec![
            row(&["sensor", "value"]),
            Err(io::Error::other("disk hiccup")),
            row(&["t1", "1.5"]),
        ]));
        let mut um = Unmarshaller::<Reading, _>::new(source).unwrap();

        let err = um.read().unwrap_err();
        assert_eq!(err.line(), Some(2));
        assert!(matches!(err.root(), Error::Io(_)));

        let reading = um.read().unwrap().unwrap();
        assert_eq!(reading.value, 1.5);
        assert_eq!(um.line(), 3);
        assert!(um.read().unwrap().is_none());
    }

    #[test]
    fn empty_input_has_no_header() {
        let err = Unmarshaller::<Reading, _>::new(Scripted(VecDeque::new())).unwrap_err();
        assert!(matches!(err, Error::MissingHeader));
    }

    #[test]
    fn success_callback_can_stop_reading() {
        let source = Scripted(VecDeque::from(vec![
            row(&["sensor", "value"]),
            row(&["t1", "1"]),
            row(&["t2", "2"]),
        ]));
        let mut um = Unmarshaller::<Reading, _>::new(source).unwrap();
        let mut seen = Vec::new();
        let result = um.read_all_with(
            |reading| {
                seen.push(reading.sensor);
                Err(anyhow::anyhow!("enough").into())
            },
            stop_on_error,
        );
        assert_eq!(result.unwrap_err().to_string(), "enough");
        assert_eq!(seen, vec!["t1"]);
    }
}
