//! Definition of the fields that make up a record layout.

/// A single named field: its width on the wire and how its bits are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Name used in error messages and in [crate::layout::parse_fields] output.
    pub name: &'static str,
    /// Width in bits. Byte runs and text slots are counted as `8 * len`.
    pub width_bits: usize,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn unsigned(name: &'static str, width_bits: usize) -> Self {
        Self {
            name,
            width_bits,
            kind: FieldKind::Unsigned,
        }
    }

    pub const fn flag(name: &'static str) -> Self {
        Self {
            name,
            width_bits: 1,
            kind: FieldKind::Flag,
        }
    }

    pub const fn bytes(name: &'static str, len: usize) -> Self {
        Self {
            name,
            width_bits: len * 8,
            kind: FieldKind::Bytes,
        }
    }

    pub const fn text(name: &'static str, len: usize) -> Self {
        Self {
            name,
            width_bits: len * 8,
            kind: FieldKind::Text,
        }
    }

    pub const fn checksum(name: &'static str) -> Self {
        Self {
            name,
            width_bits: 16,
            kind: FieldKind::Checksum,
        }
    }

    /// Length in bytes for byte-run and text fields.
    pub const fn byte_len(&self) -> usize {
        self.width_bits / 8
    }
}

/// How a field's bits are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FieldKind {
    /// Unsigned integer, MSB-first.
    Unsigned,
    /// Single-bit boolean.
    Flag,
    /// Opaque run of whole bytes.
    Bytes,
    /// Fixed-length text slot, see [crate::text].
    Text,
    /// 16-bit CRC trailer, computed on encode.
    Checksum,
}
