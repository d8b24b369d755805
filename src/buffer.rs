use crate::{bits, errors::BufferError};

/// Owned byte store with a single bit-granular cursor.
///
/// Byte operations are bit operations over `8 * n` bits, so there is no second
/// cursor to keep in sync and no unaligned state to fall into. The byte cursor
/// is always derived as `bit_cursor / 8`.
#[derive(Debug, Clone)]
pub struct BitByteBuffer {
    storage: Vec<u8>,
    bit_cursor: usize,
}

impl BitByteBuffer {
    /// Wraps existing bytes with the cursor at bit 0.
    pub fn new(storage: Vec<u8>) -> Self {
        Self {
            storage,
            bit_cursor: 0,
        }
    }

    /// Creates a zero-filled buffer of `len` bytes.
    pub fn zeroed(len: usize) -> Self {
        Self::new(vec![0u8; len])
    }

    pub fn bit_cursor(&self) -> usize {
        self.bit_cursor
    }

    pub fn byte_cursor(&self) -> usize {
        self.bit_cursor / 8
    }

    pub fn capacity_bits(&self) -> usize {
        self.storage.len() * 8
    }

    pub fn remaining_bits(&self) -> usize {
        self.capacity_bits() - self.bit_cursor
    }

    pub fn is_aligned(&self) -> bool {
        self.bit_cursor % 8 == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.storage
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.storage
    }

    pub fn read_bit_next(&mut self) -> Result<bool, BufferError> {
        let bit = bits::read_bit_at(&self.storage, self.bit_cursor)?;
        self.bit_cursor += 1;

        Ok(bit == 1)
    }

    /// Reads `n` bits MSB-first and advances the cursor by `n`.
    pub fn read_bits_next(&mut self, n: usize) -> Result<u64, BufferError> {
        let value = bits::read_bits_at(&self.storage, self.bit_cursor, n)?;
        self.bit_cursor += n;

        Ok(value)
    }

    /// Reads `n` bits at `bit_pos` without moving the cursor.
    pub fn read_bits_at(&self, bit_pos: usize, n: usize) -> Result<u64, BufferError> {
        bits::read_bits_at(&self.storage, bit_pos, n)
    }

    pub fn write_bit_next(&mut self, bit: bool) -> Result<(), BufferError> {
        bits::write_bit_at(&mut self.storage, self.bit_cursor, bit)?;
        self.bit_cursor += 1;

        Ok(())
    }

    /// Writes the low `n` bits of `value` MSB-first and advances the cursor by `n`.
    pub fn write_bits_next(&mut self, value: u64, n: usize) -> Result<(), BufferError> {
        bits::write_bits_at(&mut self.storage, self.bit_cursor, value, n)?;
        self.bit_cursor += n;

        Ok(())
    }

    /// Reads the next `n` bytes. Works at any cursor position.
    pub fn read_bytes_next(&mut self, n: usize) -> Result<Vec<u8>, BufferError> {
        self.check_remaining(n.saturating_mul(8))?;

        if self.is_aligned() {
            let start = self.byte_cursor();
            let out = self.storage[start..start + n].to_vec();
            self.bit_cursor += n * 8;
            return Ok(out);
        }

        let mut out = Vec::with_capacity(n);
        for _ in 0..n {
            out.push(self.read_bits_next(8)? as u8);
        }

        Ok(out)
    }

    /// Writes `bytes` at the cursor. Works at any cursor position.
    pub fn write_bytes_next(&mut self, bytes: &[u8]) -> Result<(), BufferError> {
        self.check_remaining(bytes.len() * 8)?;

        if self.is_aligned() {
            let start = self.byte_cursor();
            self.storage[start..start + bytes.len()].copy_from_slice(bytes);
            self.bit_cursor += bytes.len() * 8;
            return Ok(());
        }

        for &byte in bytes {
            self.write_bits_next(byte as u64, 8)?;
        }

        Ok(())
    }

    /// Moves the cursor forward to the next byte boundary. Never moves backwards.
    pub fn align_to_byte(&mut self) -> Result<(), BufferError> {
        let rem = self.bit_cursor % 8;
        if rem != 0 {
            self.skip_bits(8 - rem)?;
        }

        Ok(())
    }

    pub fn skip_bits(&mut self, n: usize) -> Result<(), BufferError> {
        self.check_remaining(n)?;
        self.bit_cursor += n;

        Ok(())
    }

    fn check_remaining(&self, n: usize) -> Result<(), BufferError> {
        if n > self.remaining_bits() {
            return Err(BufferError::OutOfRange {
                start: self.bit_cursor,
                end: self.bit_cursor.saturating_add(n),
                capacity: self.capacity_bits(),
            });
        }

        Ok(())
    }
}
