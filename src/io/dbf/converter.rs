//! Converters turning raw field bytes into [`FieldValue`]s.
//!
//! The reader looks a converter up by field name and falls back to the
//! configured default. Built-in converters trim ASCII spaces and map an
//! all-blank field to [`FieldValue::Absent`].

use chrono::NaiveDate;
use encoding_rs::Encoding;

use super::data_type::DataType;
use super::field_descriptor::FieldDescriptor;
use super::value::FieldValue;
use crate::error::ConversionError;

/// Converts the raw bytes of one field.
pub trait ValueConverter: Send + Sync {
    fn convert(&self, field: &FieldDescriptor, raw: &[u8]) -> Result<FieldValue, ConversionError>;
}

/// Plain functions and closures over the raw bytes are converters too.
impl<F> ValueConverter for F
where
    F: Fn(&[u8]) -> Result<FieldValue, ConversionError> + Send + Sync,
{
    fn convert(&self, _field: &FieldDescriptor, raw: &[u8]) -> Result<FieldValue, ConversionError> {
        self(raw)
    }
}

fn trim_spaces(raw: &[u8]) -> &[u8] {
    let start = raw.iter().position(|&b| b != b' ').unwrap_or(raw.len());
    let end = raw.iter().rposition(|&b| b != b' ').map_or(start, |i| i + 1);
    &raw[start..end]
}

/// Parses a base-10 `i64`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerConverter;

impl ValueConverter for IntegerConverter {
    fn convert(&self, _field: &FieldDescriptor, raw: &[u8]) -> Result<FieldValue, ConversionError> {
        let trimmed = trim_spaces(raw);
        if trimmed.is_empty() {
            return Ok(FieldValue::Absent);
        }
        let text = String::from_utf8_lossy(trimmed);
        text.parse::<i64>()
            .map(FieldValue::Integer)
            .map_err(|source| ConversionError::InvalidInteger {
                text: text.into_owned(),
                source,
            })
    }
}

/// Parses an `f64`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloatConverter;

impl ValueConverter for FloatConverter {
    fn convert(&self, _field: &FieldDescriptor, raw: &[u8]) -> Result<FieldValue, ConversionError> {
        let trimmed = trim_spaces(raw);
        if trimmed.is_empty() {
            return Ok(FieldValue::Absent);
        }
        let text = String::from_utf8_lossy(trimmed);
        text.parse::<f64>()
            .map(FieldValue::Float)
            .map_err(|source| ConversionError::InvalidFloat {
                text: text.into_owned(),
                source,
            })
    }
}

/// Decodes text in a given encoding (UTF-8 unless told otherwise).
#[derive(Debug, Clone, Copy)]
pub struct TextConverter {
    encoding: &'static Encoding,
    strict: bool,
}

impl TextConverter {
    pub fn new() -> Self {
        Self::with_encoding(encoding_rs::UTF_8)
    }

    pub fn with_encoding(encoding: &'static Encoding) -> Self {
        Self {
            encoding,
            strict: false,
        }
    }

    /// Fail on malformed bytes instead of substituting U+FFFD.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }
}

impl Default for TextConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueConverter for TextConverter {
    fn convert(&self, _field: &FieldDescriptor, raw: &[u8]) -> Result<FieldValue, ConversionError> {
        let trimmed = trim_spaces(raw);
        if trimmed.is_empty() {
            return Ok(FieldValue::Absent);
        }
        let (text, had_errors) = self.encoding.decode_without_bom_handling(trimmed);
        if had_errors && self.strict {
            return Err(ConversionError::InvalidText {
                encoding: self.encoding.name(),
            });
        }
        Ok(FieldValue::Text(text.into_owned()))
    }
}

/// Reads `T/t/Y/y` as true, `F/f/N/n` as false and `?` or blank as absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogicalConverter;

impl ValueConverter for LogicalConverter {
    fn convert(&self, _field: &FieldDescriptor, raw: &[u8]) -> Result<FieldValue, ConversionError> {
        match trim_spaces(raw) {
            [] | [b'?'] => Ok(FieldValue::Absent),
            [b'T' | b't' | b'Y' | b'y'] => Ok(FieldValue::Logical(true)),
            [b'F' | b'f' | b'N' | b'n'] => Ok(FieldValue::Logical(false)),
            [other, ..] => Err(ConversionError::InvalidLogical(*other as char)),
        }
    }
}

/// Reads `YYYYMMDD` dates.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateConverter;

impl ValueConverter for DateConverter {
    fn convert(&self, _field: &FieldDescriptor, raw: &[u8]) -> Result<FieldValue, ConversionError> {
        let trimmed = trim_spaces(raw);
        if trimmed.is_empty() || trimmed.iter().all(|&b| b == b'0') {
            return Ok(FieldValue::Absent);
        }
        let text = String::from_utf8_lossy(trimmed);
        NaiveDate::parse_from_str(&text, "%Y%m%d")
            .map(FieldValue::Date)
            .map_err(|_| ConversionError::InvalidDate(text.into_owned()))
    }
}

/// Picks a converter from the field's data type: numbers without decimals
/// become integers, other numbers floats, memo block references text.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypedConverter {
    text: TextConverter,
}

impl TypedConverter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode Character and Memo fields in `encoding`.
    pub fn with_encoding(encoding: &'static Encoding) -> Self {
        Self {
            text: TextConverter::with_encoding(encoding),
        }
    }
}

impl ValueConverter for TypedConverter {
    fn convert(&self, field: &FieldDescriptor, raw: &[u8]) -> Result<FieldValue, ConversionError> {
        match field.data_type {
            DataType::Character | DataType::Memo => self.text.convert(field, raw),
            DataType::Numerical if field.decimal_count == 0 => IntegerConverter.convert(field, raw),
            DataType::Numerical | DataType::FloatingPoint => FloatConverter.convert(field, raw),
            DataType::Logical => LogicalConverter.convert(field, raw),
            DataType::Date => DateConverter.convert(field, raw),
            DataType::Unknown(code) => Err(ConversionError::Rejected(format!(
                "no conversion for data type '{}'",
                code as char
            ))),
        }
    }
}
