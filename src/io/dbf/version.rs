//! dBase / FoxPro file versions (byte 0 of the .dbf header).

use std::fmt;

/// Version byte of a .dbf file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DbfVersion {
    FoxBase1,
    DBase3,
    DBase3WithMemo,
    VisualFoxPro,
    VisualFoxProAutoIncrement,
    VisualFoxProVarchar,
    DBase4SqlTable,
    DBase4SqlSystem,
    DBase4WithMemo,
    DBase4SqlTableWithMemo,
    FoxPro2,
    FoxPro2WithMemo,
    /// Any other version byte
    Unknown(u8),
}

impl DbfVersion {
    /// Versions this crate decodes. Everything else is rejected at header time.
    pub const SUPPORTED: &'static [DbfVersion] = &[DbfVersion::DBase3];

    /// Raw version byte
    pub fn byte(&self) -> u8 {
        match self {
            DbfVersion::FoxBase1 => 0x02,
            DbfVersion::DBase3 => 0x03,
            DbfVersion::DBase3WithMemo => 0x83,
            DbfVersion::VisualFoxPro => 0x30,
            DbfVersion::VisualFoxProAutoIncrement => 0x31,
            DbfVersion::VisualFoxProVarchar => 0x32,
            DbfVersion::DBase4SqlTable => 0x43,
            DbfVersion::DBase4SqlSystem => 0x63,
            DbfVersion::DBase4WithMemo => 0x8b,
            DbfVersion::DBase4SqlTableWithMemo => 0xcb,
            DbfVersion::FoxPro2 => 0xfb,
            DbfVersion::FoxPro2WithMemo => 0xf5,
            DbfVersion::Unknown(b) => *b,
        }
    }

    /// Human readable product name
    pub fn name(&self) -> &'static str {
        match self {
            DbfVersion::FoxBase1 => "FoxBase 1.0",
            DbfVersion::DBase3 => "FoxBase 2.x / dBASE III",
            DbfVersion::DBase3WithMemo => "FoxBase 2.x / dBASE III with memo file",
            DbfVersion::VisualFoxPro => "Visual FoxPro",
            DbfVersion::VisualFoxProAutoIncrement => "Visual FoxPro with auto increment",
            DbfVersion::VisualFoxProVarchar => "Visual FoxPro with varchar/varbinary",
            DbfVersion::DBase4SqlTable => "dBASE IV SQL Table, no memo file",
            DbfVersion::DBase4SqlSystem => "dBASE IV SQL System, no memo file",
            DbfVersion::DBase4WithMemo => "dBASE IV with memo file",
            DbfVersion::DBase4SqlTableWithMemo => "dBASE IV SQL Table with memo file",
            DbfVersion::FoxPro2 => "FoxPro 2",
            DbfVersion::FoxPro2WithMemo => "FoxPro 2 with memo file",
            DbfVersion::Unknown(_) => "Unknown version",
        }
    }

    /// Whether records of this version can be read.
    pub fn is_supported(&self) -> bool {
        Self::SUPPORTED.contains(self)
    }
}

impl From<u8> for DbfVersion {
    fn from(value: u8) -> Self {
        match value {
            0x02 => DbfVersion::FoxBase1,
            0x03 => DbfVersion::DBase3,
            0x83 => DbfVersion::DBase3WithMemo,
            0x30 => DbfVersion::VisualFoxPro,
            0x31 => DbfVersion::VisualFoxProAutoIncrement,
            0x32 => DbfVersion::VisualFoxProVarchar,
            0x43 => DbfVersion::DBase4SqlTable,
            0x63 => DbfVersion::DBase4SqlSystem,
            0x8b => DbfVersion::DBase4WithMemo,
            0xcb => DbfVersion::DBase4SqlTableWithMemo,
            0xfb => DbfVersion::FoxPro2,
            0xf5 => DbfVersion::FoxPro2WithMemo,
            other => DbfVersion::Unknown(other),
        }
    }
}

impl fmt::Display for DbfVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DbfVersion::Unknown(b) => write!(f, "Unknown version: {}", b),
            known => write!(f, "{}", known.name()),
        }
    }
}
