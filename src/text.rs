//! Fixed-length text slots.
//!
//! A slot holds UTF-16 code units, big-endian once the byte-order pass has run.
//! Zero units are padding and may show up anywhere in the slot, so decoding skips
//! them instead of stopping at the first one.

use crate::errors::TextError;

/// Decodes a slot into a string, dropping zero code points.
///
/// Unpaired surrogates and a dangling odd byte become U+FFFD; a bad slot never
/// fails the record.
pub fn decode_slot(bytes: &[u8]) -> String {
    let units = bytes
        .chunks(2)
        .map(|pair| match *pair {
            [hi, lo] => Some(u16::from_be_bytes([hi, lo])),
            _ => None,
        })
        .collect::<Vec<_>>();

    let mut out = String::with_capacity(units.len());
    let mut replaced = 0usize;

    let whole_units = units.iter().map_while(|unit| *unit);
    for decoded in char::decode_utf16(whole_units) {
        match decoded {
            Ok('\0') => {}
            Ok(c) => out.push(c),
            Err(_) => {
                replaced += 1;
                out.push(char::REPLACEMENT_CHARACTER);
            }
        }
    }

    if units.last().is_some_and(Option::is_none) && bytes.last() != Some(&0) {
        replaced += 1;
        out.push(char::REPLACEMENT_CHARACTER);
    }

    if replaced > 0 {
        log::debug!("substituted {replaced} undecodable code unit(s) in text slot");
    }

    out
}

/// Encodes `text` into a zero-padded slot of `slot_len` bytes.
pub fn encode_slot(text: &str, slot_len: usize) -> Result<Vec<u8>, TextError> {
    if text.contains('\0') {
        return Err(TextError::EmbeddedNul);
    }

    let capacity = slot_len / 2;
    let units = text.encode_utf16().count();
    if units > capacity {
        return Err(TextError::TooLong { units, capacity });
    }

    let mut out = Vec::with_capacity(slot_len);
    for unit in text.encode_utf16() {
        out.extend_from_slice(&unit.to_be_bytes());
    }
    out.resize(slot_len, 0);

    Ok(out)
}
