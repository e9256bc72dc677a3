//! Field data types (byte 11 of a field descriptor, an ASCII letter).

use std::fmt;

/// dBase field type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// `C`: text
    Character,
    /// `D`: YYYYMMDD
    Date,
    /// `F`: float
    FloatingPoint,
    /// `N`: decimal
    Numerical,
    /// `L`: boolean
    Logical,
    /// `M`: memo block reference
    Memo,
    /// Any other type letter
    Unknown(u8),
}

impl DataType {
    /// The ASCII code stored on disk
    pub fn code(&self) -> u8 {
        match self {
            DataType::Character => b'C',
            DataType::Date => b'D',
            DataType::FloatingPoint => b'F',
            DataType::Numerical => b'N',
            DataType::Logical => b'L',
            DataType::Memo => b'M',
            DataType::Unknown(c) => *c,
        }
    }

    /// Whether record fields of this type can be decoded.
    pub fn is_supported(&self) -> bool {
        !matches!(self, DataType::Unknown(_))
    }
}

impl From<u8> for DataType {
    fn from(code: u8) -> Self {
        match code {
            b'C' => DataType::Character,
            b'D' => DataType::Date,
            b'F' => DataType::FloatingPoint,
            b'N' => DataType::Numerical,
            b'L' => DataType::Logical,
            b'M' => DataType::Memo,
            other => DataType::Unknown(other),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Character => write!(f, "Character"),
            DataType::Date => write!(f, "Date"),
            DataType::FloatingPoint => write!(f, "FloatingPoint"),
            DataType::Numerical => write!(f, "Numerical"),
            DataType::Logical => write!(f, "Logical"),
            DataType::Memo => write!(f, "Memo"),
            DataType::Unknown(c) => write!(f, "unknown: '{}' {}", *c as char, c),
        }
    }
}
