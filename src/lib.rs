//! # miicraft
//!
//! Bit-level decoder and encoder for the 96-byte Mii avatar record found
//! (base64-encoded) in account service responses.
//!
//! The record is a fixed table of bit-packed fields read MSB-first through a
//! single bit cursor, after a byte-order pass over its 16- and 32-bit windows. It
//! ends in a CRC-16 of everything before it.
//!
//! ## Example
//!
//! ```
//! use miicraft::mii::{ChecksumPolicy, MiiCodec, MiiRecord};
//!
//! let mut mii = MiiRecord::default();
//! mii.nickname = "Scott".to_string();
//! mii.copyable = true;
//!
//! let codec = MiiCodec::new(ChecksumPolicy::Reject);
//! let raw = codec.encode(&mii).unwrap();
//! assert_eq!(raw.len(), 96);
//!
//! let decoded = codec.decode(&raw).unwrap();
//! assert_eq!(decoded.nickname, "Scott");
//! assert_eq!(decoded.checksum, miicraft::crc::record_checksum(&raw));
//! ```

pub mod bits;
pub mod buffer;
pub mod crc;
pub mod endian;
pub mod errors;
pub mod field;
pub mod layout;
pub mod mii;
#[cfg(feature = "serde")]
pub mod serde;
pub mod text;
pub mod value;
pub mod walker;
