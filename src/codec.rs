//! Value codec: conversion between a single cell and one typed field.
//!
//! [`CellCodec`] is the trait to implement for value-object types that should
//! occupy one column. [`CellValue`] is its object-safe counterpart used by the
//! assembler and projector while walking a record.

use std::str::FromStr;

use anyhow::{Context, Result, anyhow, bail};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use uuid::Uuid;

pub trait CellCodec: Sized {
    fn decode_cell(cell: &str) -> Result<Self>;
    fn encode_cell(&self) -> String;
}

pub trait CellValue {
    fn read_cell(&mut self, cell: &str) -> Result<()>;
    fn write_cell(&self) -> String;
}

impl<T: CellCodec> CellValue for T {
    fn read_cell(&mut self, cell: &str) -> Result<()> {
        *self = T::decode_cell(cell)?;
        Ok(())
    }

    fn write_cell(&self) -> String {
        self.encode_cell()
    }
}

/// An empty cell is `None`; anything else is decoded as `T`.
impl<T: CellCodec> CellCodec for Option<T> {
    fn decode_cell(cell: &str) -> Result<Self> {
        if cell.is_empty() {
            Ok(None)
        } else {
            T::decode_cell(cell).map(Some)
        }
    }

    fn encode_cell(&self) -> String {
        self.as_ref().map(T::encode_cell).unwrap_or_default()
    }
}

impl CellCodec for String {
    fn decode_cell(cell: &str) -> Result<Self> {
        Ok(cell.to_string())
    }

    fn encode_cell(&self) -> String {
        self.clone()
    }
}

impl CellCodec for char {
    fn decode_cell(cell: &str) -> Result<Self> {
        let mut chars = cell.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Ok(ch),
            _ => bail!("Failed to parse '{cell}' as a single character"),
        }
    }

    fn encode_cell(&self) -> String {
        self.to_string()
    }
}

impl CellCodec for bool {
    fn decode_cell(cell: &str) -> Result<Self> {
        let lowered = cell.trim().to_ascii_lowercase();
        match lowered.as_str() {
            "true" | "t" | "yes" | "y" | "1" => Ok(true),
            "false" | "f" | "no" | "n" | "0" | "" => Ok(false),
            _ => bail!("Failed to parse '{cell}' as boolean"),
        }
    }

    fn encode_cell(&self) -> String {
        self.to_string()
    }
}

// Blank numeric cells decode to zero.
macro_rules! numeric_codec {
    ($label:literal => $($ty:ty),+ $(,)?) => {
        $(
            impl CellCodec for $ty {
                fn decode_cell(cell: &str) -> Result<Self> {
                    let trimmed = cell.trim();
                    if trimmed.is_empty() {
                        return Ok(<$ty>::default());
                    }
                    trimmed
                        .parse::<$ty>()
                        .with_context(|| format!("Failed to parse '{cell}' as {}", $label))
                }

                fn encode_cell(&self) -> String {
                    self.to_string()
                }
            }
        )+
    };
}

numeric_codec!("integer" => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
numeric_codec!("float" => f32, f64);

impl CellCodec for Decimal {
    fn decode_cell(cell: &str) -> Result<Self> {
        let trimmed = cell.trim();
        if trimmed.is_empty() {
            return Ok(Decimal::ZERO);
        }
        Decimal::from_str(trimmed).with_context(|| format!("Failed to parse '{cell}' as decimal"))
    }

    fn encode_cell(&self) -> String {
        self.to_string()
    }
}

impl CellCodec for NaiveDate {
    fn decode_cell(cell: &str) -> Result<Self> {
        parse_naive_date(cell.trim())
    }

    fn encode_cell(&self) -> String {
        self.format("%Y-%m-%d").to_string()
    }
}

impl CellCodec for NaiveDateTime {
    fn decode_cell(cell: &str) -> Result<Self> {
        parse_naive_datetime(cell.trim())
    }

    fn encode_cell(&self) -> String {
        self.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

impl CellCodec for NaiveTime {
    fn decode_cell(cell: &str) -> Result<Self> {
        parse_naive_time(cell.trim())
    }

    fn encode_cell(&self) -> String {
        self.format("%H:%M:%S").to_string()
    }
}

impl CellCodec for Uuid {
    fn decode_cell(cell: &str) -> Result<Self> {
        let trimmed = cell.trim().trim_matches(|c| matches!(c, '{' | '}'));
        Uuid::parse_str(trimmed).with_context(|| format!("Failed to parse '{cell}' as GUID"))
    }

    fn encode_cell(&self) -> String {
        self.to_string()
    }
}

pub fn parse_naive_date(value: &str) -> Result<NaiveDate> {
    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%Y/%m/%d", "%d-%m-%Y"];
    for fmt in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(value, fmt) {
            return Ok(parsed);
        }
    }
    Err(anyhow!("Failed to parse '{value}' as date"))
}

pub fn parse_naive_datetime(value: &str) -> Result<NaiveDateTime> {
    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%d/%m/%Y %H:%M:%S",
        "%m/%d/%Y %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];
    for fmt in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, fmt) {
            return Ok(parsed);
        }
    }
    Err(anyhow!("Failed to parse '{value}' as datetime"))
}

pub fn parse_naive_time(value: &str) -> Result<NaiveTime> {
    const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M"];
    for fmt in TIME_FORMATS {
        if let Ok(parsed) = NaiveTime::parse_from_str(value, fmt) {
            return Ok(parsed);
        }
    }
    Err(anyhow!("Failed to parse '{value}' as time"))
}
