//! CRC-16/CCITT as used by the record trailer.

use crate::layout::CHECKSUM_OFFSET;

const POLY: u16 = 0x1021;

/// CRC-16 with polynomial 0x1021, initial value 0, MSB-first, no final XOR.
pub fn crc16(data: &[u8]) -> u16 {
    let mut crc = 0u16;

    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ POLY
            } else {
                crc << 1
            };
        }
    }

    crc
}

/// Checksum of a raw (wire-order) record: CRC over every byte before the trailer.
///
/// Shorter input is checksummed as-is.
pub fn record_checksum(raw: &[u8]) -> u16 {
    crc16(&raw[..raw.len().min(CHECKSUM_OFFSET)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc16_empty() {
        assert_eq!(crc16(&[]), 0);
    }

    #[test]
    fn test_crc16_check_value() {
        assert_eq!(crc16(b"123456789"), 0x31C3);
    }

    #[test]
    fn test_crc16_single_byte() {
        assert_eq!(crc16(&[0x01]), 0x1021);
    }

    #[test]
    fn test_crc16_deterministic() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x10];
        assert_eq!(crc16(&data), crc16(&data));
    }

    #[test]
    fn test_record_checksum_ignores_trailer() {
        let mut raw = [0x5Au8; 96];
        let before = record_checksum(&raw);
        raw[94] = 0;
        raw[95] = 0;
        assert_eq!(record_checksum(&raw), before);
    }
}
