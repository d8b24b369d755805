//! Byte-order pass over the record's 16- and 32-bit windows.
//!
//! On the wire these windows are little-endian words while the field table reads
//! bits MSB-first, so each window is reversed before decode and after encode.
//! Every step reverses a window in place, and the only overlap (0x5C) is applied
//! twice, so the pass is its own inverse.

use crate::{errors::MiiError, layout::RECORD_LEN};

/// A window of `width` bytes starting at `offset` that gets byte-reversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapWindow {
    pub offset: usize,
    pub width: usize,
}

impl SwapWindow {
    const fn u16(offset: usize) -> Self {
        Self { offset, width: 2 }
    }
}

/// Windows in the order they are applied.
pub fn swap_windows() -> impl Iterator<Item = SwapWindow> {
    let head = std::iter::once(SwapWindow {
        offset: 0x00,
        width: 4,
    });
    let profile = (0x18..=0x2E).step_by(2).map(SwapWindow::u16);
    let features = (0x30..=0x5C).step_by(2).map(SwapWindow::u16);
    // 0x5C is covered by the run above as well; the format swaps it again.
    let tail = std::iter::once(SwapWindow::u16(0x5C));

    head.chain(profile).chain(features).chain(tail)
}

/// Applies the byte-order pass to the first [RECORD_LEN] bytes of `data`.
pub fn swap_record(data: &mut [u8]) -> Result<(), MiiError> {
    if data.len() < RECORD_LEN {
        return Err(MiiError::InvalidLength {
            expected: RECORD_LEN,
            actual: data.len(),
        });
    }

    for window in swap_windows() {
        data[window.offset..window.offset + window.width].reverse();
    }

    Ok(())
}
