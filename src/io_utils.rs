//! CSV-backed row sources and sinks, encoding, and delimiter resolution.
//!
//! - **Sources**: [`CsvRowSource`] reads the header as an ordinary first row,
//!   decoding each byte record through an `encoding_rs` encoding.
//! - **Sinks**: [`CsvRowSink`] writes rows through `csv::Writer`, transcoding
//!   away from UTF-8 when asked to.
//! - **Paths**: `-` routes through stdin/stdout.
//! - **Delimiters**: `.tsv` selects tab, everything else comma, unless overridden.

use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Read, Write},
    path::Path,
};

use anyhow::{Context, anyhow};
use csv::{ByteRecord, QuoteStyle};
use encoding_rs::{Encoding, UTF_8};

use crate::{
    error::Result,
    rows::{RowSink, RowSource},
};

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    match label {
        Some(value) => Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'").into()),
        None => Ok(UTF_8),
    }
}

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

pub fn resolve_output_delimiter(path: Option<&Path>, provided: Option<u8>, fallback: u8) -> u8 {
    if let Some(delim) = provided {
        return delim;
    }
    match path.and_then(|p| p.extension()).and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        Some(ext) if ext.eq_ignore_ascii_case("csv") => DEFAULT_CSV_DELIMITER,
        _ => fallback,
    }
}

/// A `csv::Reader` that hands the header back as a regular row.
///
/// `flexible` allows rows of differing width; otherwise every row must be as
/// wide as the header.
pub fn open_csv_reader<R>(reader: R, delimiter: u8, flexible: bool) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(false)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(flexible);
    builder.from_reader(reader)
}

pub fn open_csv_source_from_path(
    path: &Path,
    delimiter: u8,
    flexible: bool,
    encoding: &'static Encoding,
) -> Result<CsvRowSource<Box<dyn Read>>> {
    let reader: Box<dyn Read> = if is_dash(path) {
        Box::new(io::stdin().lock())
    } else {
        Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Opening input file {path:?}"))?,
        ))
    };
    Ok(CsvRowSource::new(open_csv_reader(reader, delimiter, flexible)).with_encoding(encoding))
}

pub fn open_csv_writer<W>(writer: W, delimiter: u8) -> csv::Writer<W>
where
    W: Write,
{
    let mut builder = csv::WriterBuilder::new();
    builder
        .delimiter(delimiter)
        .quote_style(QuoteStyle::Necessary)
        .double_quote(true)
        .flexible(true);
    builder.from_writer(writer)
}

/// Opens `path` (or stdout for `None` / `-`) as a row sink.
pub fn open_csv_sink(
    path: Option<&Path>,
    delimiter: u8,
    encoding: &'static Encoding,
) -> Result<CsvRowSink<Box<dyn Write>>> {
    let base: Box<dyn Write> = match path {
        Some(p) if !is_dash(p) => Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("Creating output file {p:?}"))?,
        )),
        _ => Box::new(io::stdout()),
    };

    let writer: Box<dyn Write> = if encoding == UTF_8 {
        base
    } else {
        Box::new(TranscodingWriter::new(base, encoding))
    };
    Ok(CsvRowSink::new(open_csv_writer(writer, delimiter)))
}

/// Decodes one cell. BOM sniffing is skipped so a cell's leading bytes can
/// never switch its encoding.
pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> io::Result<String> {
    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    if had_errors {
        Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Failed to decode text with encoding {}", encoding.name()),
        ))
    } else {
        Ok(text.into_owned())
    }
}

pub fn decode_record(record: &ByteRecord, encoding: &'static Encoding) -> io::Result<Vec<String>> {
    record
        .iter()
        .map(|field| decode_bytes(field, encoding))
        .collect()
}

pub struct CsvRowSource<R> {
    reader: csv::Reader<R>,
    encoding: &'static Encoding,
    record: ByteRecord,
}

impl<R: Read> CsvRowSource<R> {
    /// Wraps a reader built by the caller. It must be configured with
    /// `has_headers(false)` so the header row reaches the engine.
    pub fn new(reader: csv::Reader<R>) -> Self {
        Self {
            reader,
            encoding: UTF_8,
            record: ByteRecord::new(),
        }
    }

    /// Comma-delimited, UTF-8, fixed row width.
    pub fn from_reader(reader: R) -> Self {
        Self::new(open_csv_reader(reader, DEFAULT_CSV_DELIMITER, false))
    }

    pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn into_inner(self) -> csv::Reader<R> {
        self.reader
    }
}

impl<R: Read> RowSource for CsvRowSource<R> {
    fn read_row(&mut self) -> io::Result<Option<Vec<String>>> {
        if !self.reader.read_byte_record(&mut self.record)? {
            return Ok(None);
        }
        decode_record(&self.record, self.encoding).map(Some)
    }
}

pub struct CsvRowSink<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvRowSink<W> {
    pub fn new(writer: csv::Writer<W>) -> Self {
        Self { writer }
    }

    /// Comma-delimited, quoting only where needed.
    pub fn from_writer(writer: W) -> Self {
        Self::new(open_csv_writer(writer, DEFAULT_CSV_DELIMITER))
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(self) -> io::Result<W> {
        self.writer.into_inner().map_err(|err| err.into_error())
    }
}

impl<W: Write> RowSink for CsvRowSink<W> {
    fn write_row(&mut self, row: &[String]) -> io::Result<()> {
        self.writer.write_record(row).map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Re-encodes the UTF-8 produced by `csv::Writer`, holding back any
/// incomplete trailing sequence until the next write.
struct TranscodingWriter<W: Write> {
    inner: W,
    encoding: &'static Encoding,
    pending: Vec<u8>,
}

impl<W: Write> TranscodingWriter<W> {
    fn new(inner: W, encoding: &'static Encoding) -> Self {
        Self {
            inner,
            encoding,
            pending: Vec::new(),
        }
    }

    fn drain_pending(&mut self, at_end: bool) -> io::Result<()> {
        let valid_up_to = match std::str::from_utf8(&self.pending) {
            Ok(_) => self.pending.len(),
            Err(err) if err.error_len().is_some() => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "Invalid UTF-8 sequence in output stream",
                ));
            }
            Err(err) => err.valid_up_to(),
        };
        if valid_up_to > 0 {
            let chunk: Vec<u8> = self.pending.drain(..valid_up_to).collect();
            let text = std::str::from_utf8(&chunk)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            self.encode_and_write(text)?;
        }
        if at_end && !self.pending.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "Incomplete UTF-8 sequence at end of output stream",
            ));
        }
        Ok(())
    }

    fn encode_and_write(&mut self, text: &str) -> io::Result<()> {
        let (encoded, _, had_errors) = self.encoding.encode(text);
        if had_errors {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Failed to encode text using {}", self.encoding.name()),
            ));
        }
        self.inner.write_all(encoded.as_ref())
    }
}

impl<W: Write> Write for TranscodingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        self.drain_pending(false)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.drain_pending(true)?;
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delimiter_follows_extension_unless_provided() {
        assert_eq!(resolve_input_delimiter(Path::new("a.tsv"), None), b'\t');
        assert_eq!(resolve_input_delimiter(Path::new("a.TSV"), None), b'\t');
        assert_eq!(resolve_input_delimiter(Path::new("a.txt"), None), b',');
        assert_eq!(resolve_input_delimiter(Path::new("a.tsv"), Some(b';')), b';');
        assert_eq!(
            resolve_output_delimiter(Some(Path::new("out.tsv")), None, b','),
            b'\t'
        );
        assert_eq!(resolve_output_delimiter(None, None, b'|'), b'|');
    }

    #[test]
    fn unknown_encoding_is_an_error() {
        assert_eq!(resolve_encoding(None).unwrap(), UTF_8);
        assert_eq!(
            resolve_encoding(Some(" windows-1252 ")).unwrap().name(),
            "windows-1252"
        );
        assert!(resolve_encoding(Some("klingon")).is_err());
    }

    #[test]
    fn source_yields_header_then_rows_then_end() {
        let mut source = CsvRowSource::from_reader("a,b\n1,2\n".as_bytes());
        assert_eq!(source.read_row().unwrap(), Some(vec!["a".into(), "b".into()]));
        assert_eq!(source.read_row().unwrap(), Some(vec!["1".into(), "2".into()]));
        assert_eq!(source.read_row().unwrap(), None);
    }

    #[test]
    fn fixed_width_source_reports_ragged_rows() {
        let mut source = CsvRowSource::from_reader("a,b\n1,2,3\n4,5\n".as_bytes());
        source.read_row().unwrap();
        assert!(source.read_row().is_err());
        assert_eq!(source.read_row().unwrap(), Some(vec!["4".into(), "5".into()]));
    }

    #[test]
    fn source_decodes_legacy_encodings() {
        let encoding = resolve_encoding(Some("windows-1252")).unwrap();
        let bytes: &[u8] = b"name\ncaf\xe9\n";
        let mut source = CsvRowSource::from_reader(bytes).with_encoding(encoding);
        source.read_row().unwrap();
        assert_eq!(source.read_row().unwrap(), Some(vec!["café".into()]));
    }

    #[test]
    fn cells_starting_with_bom_bytes_keep_their_encoding() {
        let encoding = resolve_encoding(Some("windows-1252")).unwrap();
        let bytes: &[u8] = b"name\n\xff\xfeab\n";
        let mut source = CsvRowSource::from_reader(bytes).with_encoding(encoding);
        source.read_row().unwrap();
        assert_eq!(source.read_row().unwrap(), Some(vec!["ÿþab".into()]));

        let bytes: &[u8] = b"name\n\xff\xfe\n\xef\xbb\xbfok\n";
        let mut source = CsvRowSource::from_reader(bytes);
        source.read_row().unwrap();
        assert_eq!(source.read_row().unwrap_err().kind(), io::ErrorKind::InvalidData);
        assert_eq!(source.read_row().unwrap(), Some(vec!["\u{feff}ok".into()]));
    }

    #[test]
    fn transcoding_writer_encodes_split_sequences() {
        let encoding = resolve_encoding(Some("windows-1252")).unwrap();
        let mut writer = TranscodingWriter::new(Vec::new(), encoding);
        let bytes = "café".as_bytes();
        writer.write_all(&bytes[..4]).unwrap();
        writer.write_all(&bytes[4..]).unwrap();
        writer.flush().unwrap();
        assert_eq!(writer.inner, b"caf\xe9");
    }

    #[test]
    fn sink_writes_rows() {
        let mut sink = CsvRowSink::from_writer(Vec::new());
        sink.write_row(&["a".to_string(), "b,c".to_string()]).unwrap();
        sink.flush().unwrap();
        let bytes = sink.into_inner().unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "a,\"b,c\"\n");
    }
}
