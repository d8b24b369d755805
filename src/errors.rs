//! Error types for bit access, text slots and the record codec.

use thiserror::Error;

use crate::field::FieldKind;

/// Errors produced by [crate::buffer::BitByteBuffer] and the helpers in [crate::bits].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    /// Requested bit span `start..end` reaches past the end of the buffer.
    #[error("bit span {start}..{end} is outside the buffer ({capacity} bits)")]
    OutOfRange {
        start: usize,
        end: usize,
        capacity: usize,
    },
    /// Bit width of a single read or write is 0 or greater than 64.
    #[error("invalid bit width {0}, expected 1..=64")]
    InvalidWidth(usize),
    /// Value has bits set above the requested width.
    #[error("value {value:#x} does not fit in {width} bits")]
    ValueTooWide { value: u64, width: usize },
}

/// Errors produced when packing a string into a fixed text slot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextError {
    #[error("text needs {units} code units but the slot holds {capacity}")]
    TooLong { units: usize, capacity: usize },
    /// U+0000 is slot padding and would be dropped on decode.
    #[error("text contains an embedded NUL")]
    EmbeddedNul,
}

/// Errors produced by [crate::mii::MiiCodec].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MiiError {
    #[error("record is {actual} bytes, expected {expected}")]
    InvalidLength { expected: usize, actual: usize },
    /// The field table ran past the buffer while reading or writing `field`.
    #[error("corrupt record at field `{field}`: {source}")]
    CorruptRecord {
        field: &'static str,
        source: BufferError,
    },
    /// The field table declares a width the codec cannot carry for this field.
    #[error("field `{field}` has invalid width {width}")]
    InvalidFieldWidth { field: &'static str, width: usize },
    /// The codec asked for a different kind than the table declares.
    #[error("field `{field}` is {actual:?}, codec expected {expected:?}")]
    FieldKindMismatch {
        field: &'static str,
        expected: FieldKind,
        actual: FieldKind,
    },
    #[error("value {value} of field `{field}` does not fit in {width} bits")]
    FieldOverflow {
        field: &'static str,
        value: u64,
        width: usize,
    },
    #[error("text field `{field}`: {source}")]
    Text {
        field: &'static str,
        source: TextError,
    },
    /// Walk finished without consuming the whole table or the whole buffer.
    #[error("layout walk stopped at field {fields_done}/{fields_total}, bit {cursor}/{capacity}")]
    LayoutIncomplete {
        fields_done: usize,
        fields_total: usize,
        cursor: usize,
        capacity: usize,
    },
    #[error("checksum mismatch: stored {stored:#06x}, computed {computed:#06x}")]
    ChecksumMismatch { stored: u16, computed: u16 },
}
