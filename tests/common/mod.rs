#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use csv_bind::{CellCodec, CsvRowSink, CsvRowSource, Marshaller, Record, tabular_record};
use tempfile::{TempDir, tempdir};

pub const CSV_CONTENTS: &str = "field_a,field_b\na,b\nc,d\n";

/// Lines 4, 5 and 7 are malformed when rows must match the header width.
pub const BROKEN_CSV: &str = "field_a,field_b\na,b\nc,d\ne,f,g\nh,i,j\nk,l\nm,n,o\n";

tabular_record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Sample {
        #[csv(value = "field_a")]
        pub field_a: String,
        #[csv(value = "field_b")]
        pub field_b: String,
    }
}

tabular_record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Measurement {
        #[csv(value = "a")]
        pub a: f64,
        #[csv(value = "b")]
        pub b: String,
    }
}

tabular_record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Audit {
        #[csv(value = "created_by")]
        pub created_by: String,
    }
}

tabular_record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Address {
        #[csv(value = "street")]
        pub street: String,
        #[csv(value = "zip,postcode")]
        pub zip: String,
    }
}

/// A value object occupying a single `lat;lng` column.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl CellCodec for GeoPoint {
    fn decode_cell(cell: &str) -> Result<Self> {
        let Some((lat, lng)) = cell.split_once(';') else {
            bail!("Failed to parse '{cell}' as lat;lng");
        };
        Ok(Self {
            lat: lat.trim().parse()?,
            lng: lng.trim().parse()?,
        })
    }

    fn encode_cell(&self) -> String {
        format!("{};{}", self.lat, self.lng)
    }
}

tabular_record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Customer {
        #[csv(value = "id")]
        pub id: u32,
        #[csv(embedded)]
        pub audit: Audit,
        #[csv(value = "name")]
        pub name: String,
        #[csv(nested)]
        pub home: Address,
        #[csv(optional)]
        pub billing: Option<Box<Address>>,
        #[csv(value = "location")]
        pub location: GeoPoint,
        #[csv(value = "score,omitempty")]
        pub score: Option<i32>,
        #[csv(value = "-")]
        pub cached: String,
        #[csv(value)]
        internal: u8,
    }
}

pub fn headers(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

pub fn source(text: &str) -> CsvRowSource<&[u8]> {
    CsvRowSource::from_reader(text.as_bytes())
}

pub fn flexible_source(text: &str) -> CsvRowSource<&[u8]> {
    CsvRowSource::new(csv_bind::io_utils::open_csv_reader(
        text.as_bytes(),
        b',',
        true,
    ))
}

pub fn sink() -> CsvRowSink<Vec<u8>> {
    CsvRowSink::from_writer(Vec::new())
}

/// Flushes the marshaller and returns everything written so far.
pub fn finish<T: Record>(mut marshaller: Marshaller<T, CsvRowSink<Vec<u8>>>) -> String {
    marshaller.flush().expect("flush");
    let bytes = marshaller.into_inner().into_inner().expect("into inner");
    String::from_utf8(bytes).expect("utf-8 output")
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents).expect("write temp file contents");
        path
    }
}
