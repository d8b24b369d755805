//! Sequential traversal of a field table over a [BitByteBuffer].
//!
//! Each typed read or write consumes the next [FieldSpec] of the table and checks
//! that its kind matches what the caller asked for. Widths come only from the
//! table, so a codec cannot drift from its layout without failing loudly.

use crate::{
    buffer::BitByteBuffer,
    errors::{BufferError, MiiError},
    field::{FieldKind, FieldSpec},
    text,
    value::Value,
};

pub struct FieldWalker {
    buffer: BitByteBuffer,
    table: &'static [FieldSpec],
    index: usize,
}

impl FieldWalker {
    pub fn new(buffer: BitByteBuffer, table: &'static [FieldSpec]) -> Self {
        Self {
            buffer,
            table,
            index: 0,
        }
    }

    pub fn bit_cursor(&self) -> usize {
        self.buffer.bit_cursor()
    }

    /// The field the next read or write will consume.
    pub fn peek_field(&self) -> Option<&'static FieldSpec> {
        self.table.get(self.index)
    }

    pub fn read_u8(&mut self) -> Result<u8, MiiError> {
        Ok(self.read_unsigned(8)? as u8)
    }

    pub fn read_u16(&mut self) -> Result<u16, MiiError> {
        Ok(self.read_unsigned(16)? as u16)
    }

    pub fn read_flag(&mut self) -> Result<bool, MiiError> {
        let spec = self.next_field(FieldKind::Flag)?;
        check_width(&spec, spec.width_bits == 1)?;

        self.buffer
            .read_bit_next()
            .map_err(|e| buffer_error(&spec, e))
    }

    pub fn read_bytes<const N: usize>(&mut self) -> Result<[u8; N], MiiError> {
        let spec = self.next_field(FieldKind::Bytes)?;
        check_width(&spec, spec.width_bits == N * 8 && N > 0)?;

        let mut out = [0u8; N];
        let bytes = self
            .buffer
            .read_bytes_next(N)
            .map_err(|e| buffer_error(&spec, e))?;
        out.copy_from_slice(&bytes);

        Ok(out)
    }

    pub fn read_text(&mut self) -> Result<String, MiiError> {
        let spec = self.next_field(FieldKind::Text)?;
        check_width(&spec, is_text_width(spec.width_bits))?;

        let bytes = self
            .buffer
            .read_bytes_next(spec.byte_len())
            .map_err(|e| buffer_error(&spec, e))?;

        Ok(text::decode_slot(&bytes))
    }

    pub fn read_checksum(&mut self) -> Result<u16, MiiError> {
        let spec = self.next_field(FieldKind::Checksum)?;
        check_width(&spec, spec.width_bits == 16)?;

        let value = self
            .buffer
            .read_bits_next(16)
            .map_err(|e| buffer_error(&spec, e))?;

        Ok(value as u16)
    }

    /// Reads the next field whatever its kind.
    pub fn read_value(&mut self) -> Result<(&'static str, Value), MiiError> {
        let spec = *self.peek_field().ok_or_else(|| self.incomplete())?;

        let value = match spec.kind {
            FieldKind::Unsigned => Value::U64(self.read_unsigned(64)?),
            FieldKind::Flag => Value::Bool(self.read_flag()?),
            FieldKind::Bytes => {
                self.index += 1;
                check_width(&spec, spec.width_bits % 8 == 0 && spec.width_bits > 0)?;
                Value::Bytes(
                    self.buffer
                        .read_bytes_next(spec.byte_len())
                        .map_err(|e| buffer_error(&spec, e))?,
                )
            }
            FieldKind::Text => Value::Text(self.read_text()?),
            FieldKind::Checksum => Value::U64(self.read_checksum()? as u64),
        };

        Ok((spec.name, value))
    }

    pub fn write_u8(&mut self, value: u8) -> Result<(), MiiError> {
        self.write_unsigned(value as u64, 8)
    }

    pub fn write_u16(&mut self, value: u16) -> Result<(), MiiError> {
        self.write_unsigned(value as u64, 16)
    }

    pub fn write_flag(&mut self, value: bool) -> Result<(), MiiError> {
        let spec = self.next_field(FieldKind::Flag)?;
        check_width(&spec, spec.width_bits == 1)?;

        self.buffer
            .write_bit_next(value)
            .map_err(|e| buffer_error(&spec, e))
    }

    pub fn write_bytes(&mut self, value: &[u8]) -> Result<(), MiiError> {
        let spec = self.next_field(FieldKind::Bytes)?;
        check_width(&spec, spec.width_bits == value.len() * 8 && !value.is_empty())?;

        self.buffer
            .write_bytes_next(value)
            .map_err(|e| buffer_error(&spec, e))
    }

    pub fn write_text(&mut self, value: &str) -> Result<(), MiiError> {
        let spec = self.next_field(FieldKind::Text)?;
        check_width(&spec, is_text_width(spec.width_bits))?;

        let bytes = text::encode_slot(value, spec.byte_len()).map_err(|source| MiiError::Text {
            field: spec.name,
            source,
        })?;

        self.buffer
            .write_bytes_next(&bytes)
            .map_err(|e| buffer_error(&spec, e))
    }

    /// Zero-fills the checksum slot; the real value is patched in after the
    /// byte-order pass.
    pub fn write_checksum_placeholder(&mut self) -> Result<(), MiiError> {
        let spec = self.next_field(FieldKind::Checksum)?;
        check_width(&spec, spec.width_bits == 16)?;

        self.buffer
            .write_bits_next(0, 16)
            .map_err(|e| buffer_error(&spec, e))
    }

    /// Ends the walk. Every field must have been visited and the cursor must sit
    /// exactly at the end of the buffer.
    pub fn finish(self) -> Result<BitByteBuffer, MiiError> {
        if self.index != self.table.len() || self.buffer.remaining_bits() != 0 {
            return Err(self.incomplete());
        }

        Ok(self.buffer)
    }

    fn read_unsigned(&mut self, max_width: usize) -> Result<u64, MiiError> {
        let spec = self.next_field(FieldKind::Unsigned)?;
        check_width(&spec, spec.width_bits <= max_width)?;

        self.buffer
            .read_bits_next(spec.width_bits)
            .map_err(|e| buffer_error(&spec, e))
    }

    fn write_unsigned(&mut self, value: u64, max_width: usize) -> Result<(), MiiError> {
        let spec = self.next_field(FieldKind::Unsigned)?;
        check_width(&spec, spec.width_bits <= max_width)?;

        self.buffer
            .write_bits_next(value, spec.width_bits)
            .map_err(|e| buffer_error(&spec, e))
    }

    fn next_field(&mut self, expected: FieldKind) -> Result<FieldSpec, MiiError> {
        let spec = *self.peek_field().ok_or_else(|| self.incomplete())?;

        if spec.kind != expected {
            return Err(MiiError::FieldKindMismatch {
                field: spec.name,
                expected,
                actual: spec.kind,
            });
        }

        self.index += 1;
        Ok(spec)
    }

    fn incomplete(&self) -> MiiError {
        MiiError::LayoutIncomplete {
            fields_done: self.index,
            fields_total: self.table.len(),
            cursor: self.buffer.bit_cursor(),
            capacity: self.buffer.capacity_bits(),
        }
    }
}

fn is_text_width(width_bits: usize) -> bool {
    width_bits > 0 && width_bits % 16 == 0
}

fn check_width(spec: &FieldSpec, ok: bool) -> Result<(), MiiError> {
    if ok {
        Ok(())
    } else {
        Err(MiiError::InvalidFieldWidth {
            field: spec.name,
            width: spec.width_bits,
        })
    }
}

fn buffer_error(spec: &FieldSpec, err: BufferError) -> MiiError {
    match err {
        BufferError::OutOfRange { .. } => MiiError::CorruptRecord {
            field: spec.name,
            source: err,
        },
        BufferError::InvalidWidth(width) => MiiError::InvalidFieldWidth {
            field: spec.name,
            width,
        },
        BufferError::ValueTooWide { value, width } => MiiError::FieldOverflow {
            field: spec.name,
            value,
            width,
        },
    }
}
