//! Low-level bit read and write utilities for byte slices.
//!
//! Bits are addressed in MSB-first order: bit 0 is the high bit of the first byte.

use crate::errors::BufferError;

/// Checks that `n` is a legal width and `bit_pos..bit_pos + n` lies inside `data`.
fn check_span(data: &[u8], bit_pos: usize, n: usize) -> Result<(), BufferError> {
    if n == 0 || n > 64 {
        return Err(BufferError::InvalidWidth(n));
    }

    let capacity = data.len() * 8;
    match bit_pos.checked_add(n) {
        Some(end) if end <= capacity => Ok(()),
        _ => Err(BufferError::OutOfRange {
            start: bit_pos,
            end: bit_pos.saturating_add(n),
            capacity,
        }),
    }
}

/// Reads a single bit at `bit_pos`. Returns 0 or 1.
pub fn read_bit_at(data: &[u8], bit_pos: usize) -> Result<u8, BufferError> {
    check_span(data, bit_pos, 1)?;

    Ok((data[bit_pos / 8] >> (7 - bit_pos % 8)) & 1)
}

/// Reads `n` bits starting at `bit_pos` as an unsigned value. The first bit read
/// becomes the most significant bit of the result.
pub fn read_bits_at(data: &[u8], bit_pos: usize, n: usize) -> Result<u64, BufferError> {
    check_span(data, bit_pos, n)?;

    let mut value = 0u64;
    for pos in bit_pos..bit_pos + n {
        let bit = (data[pos / 8] >> (7 - pos % 8)) & 1;
        value = (value << 1) | bit as u64;
    }

    Ok(value)
}

/// Sets or clears the bit at `bit_pos`, leaving every other bit untouched.
pub fn write_bit_at(data: &mut [u8], bit_pos: usize, bit: bool) -> Result<(), BufferError> {
    check_span(data, bit_pos, 1)?;

    let mask = 1u8 << (7 - bit_pos % 8);
    if bit {
        data[bit_pos / 8] |= mask;
    } else {
        data[bit_pos / 8] &= !mask;
    }

    Ok(())
}

/// Writes the low `n` bits of `value` starting at `bit_pos`, MSB-first.
///
/// Bits outside the span keep their current contents, so the destination does
/// not need to be zeroed. Fails if `value` has bits set above `n`.
pub fn write_bits_at(
    data: &mut [u8],
    bit_pos: usize,
    value: u64,
    n: usize,
) -> Result<(), BufferError> {
    check_span(data, bit_pos, n)?;

    if n < 64 && value >> n != 0 {
        return Err(BufferError::ValueTooWide { value, width: n });
    }

    for i in 0..n {
        let bit = (value >> (n - 1 - i)) & 1 == 1;
        let pos = bit_pos + i;
        let mask = 1u8 << (7 - pos % 8);
        if bit {
            data[pos / 8] |= mask;
        } else {
            data[pos / 8] &= !mask;
        }
    }

    Ok(())
}
