//! The Mii record and its codec.
//!
//! Decoding runs the byte-order pass over a copy of the raw record, then walks
//! [MII_LAYOUT] with one [BitByteBuffer]. Encoding walks the same table over a
//! zeroed buffer, undoes the byte-order pass and appends the CRC-16 of the raw
//! image.

use crate::{
    buffer::BitByteBuffer,
    crc, endian,
    errors::MiiError,
    layout::{AUTHOR_ID_LEN, CHECKSUM_OFFSET, MII_ID_LEN, MII_LAYOUT, RECORD_LEN},
    walker::FieldWalker,
};

/// A decoded Mii. Integer fields hold the raw bit-width values from the record.
///
/// [Default] gives the all-zero record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MiiRecord {
    pub birth_platform: u8,
    pub unknown_1: u8,
    pub unknown_2: u8,
    pub unknown_3: u8,
    pub font_region: u8,
    pub region_move: u8,
    pub unknown_4: bool,
    pub copyable: bool,
    pub mii_version: u8,
    pub author_id: [u8; AUTHOR_ID_LEN],
    pub mii_id: [u8; MII_ID_LEN],
    pub reserved_1: [u8; 2],

    pub unknown_5: bool,
    pub favorite: bool,
    pub color: u8,
    pub birth_day: u8,
    pub birth_month: u8,
    pub gender: u8,
    pub nickname: String,
    pub fatness: u8,
    pub size: u8,

    pub blush_type: u8,
    pub face_style: u8,
    pub face_color: u8,
    pub face_type: u8,
    pub local_only: bool,

    pub unknown_6: u8,
    pub hair_mirrored: bool,
    pub hair_color: u8,
    pub hair_type: u8,

    pub eye_thickness: u8,
    pub eye_scale: u8,
    pub eye_color: u8,
    pub eye_type: u8,
    pub eye_height: u8,
    pub eye_distance: u8,
    pub eye_rotation: u8,

    pub eyebrow_thickness: u8,
    pub eyebrow_scale: u8,
    pub eyebrow_color: u8,
    pub eyebrow_type: u8,
    pub eyebrow_height: u8,
    pub eyebrow_distance: u8,
    pub eyebrow_rotation: u8,

    pub nose_height: u8,
    pub nose_scale: u8,
    pub nose_type: u8,

    pub mouth_thickness: u8,
    pub mouth_scale: u8,
    pub mouth_color: u8,
    pub mouth_type: u8,
    pub unknown_7: u8,
    pub mustache_type: u8,
    pub mouth_height: u8,

    pub mustache_height: u8,
    pub mustache_scale: u8,
    pub beard_color: u8,
    pub beard_type: u8,

    pub glasses_height: u8,
    pub glasses_scale: u8,
    pub glasses_color: u8,
    pub glasses_type: u8,

    pub unknown_8: bool,
    pub mole_y: u8,
    pub mole_x: u8,
    pub mole_scale: u8,
    pub mole_enabled: bool,

    pub author_name: String,
    pub reserved_2: [u8; 2],
    /// CRC-16 as stored in the record. Ignored by encode, which recomputes it.
    pub checksum: u16,
}

impl MiiRecord {
    pub fn decode(raw: &[u8], policy: ChecksumPolicy) -> Result<Self, MiiError> {
        MiiCodec::new(policy).decode(raw)
    }

    pub fn encode(&self) -> Result<[u8; RECORD_LEN], MiiError> {
        encode(self)
    }
}

/// What decode does when the stored checksum disagrees with the record bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumPolicy {
    /// Keep the record, do not compare.
    Ignore,
    /// Keep the record and log a warning.
    Warn,
    /// Fail with [MiiError::ChecksumMismatch].
    Reject,
}

/// Record codec. Holds no state besides its policy, so one instance can serve
/// any number of threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MiiCodec {
    checksum_policy: ChecksumPolicy,
}

impl MiiCodec {
    pub fn new(checksum_policy: ChecksumPolicy) -> Self {
        Self { checksum_policy }
    }

    pub fn checksum_policy(&self) -> ChecksumPolicy {
        self.checksum_policy
    }

    /// Decodes a raw 96-byte record.
    pub fn decode(&self, raw: &[u8]) -> Result<MiiRecord, MiiError> {
        if raw.len() != RECORD_LEN {
            return Err(MiiError::InvalidLength {
                expected: RECORD_LEN,
                actual: raw.len(),
            });
        }

        let mut image = raw.to_vec();
        endian::swap_record(&mut image)?;

        let mut w = FieldWalker::new(BitByteBuffer::new(image), MII_LAYOUT);

        // Struct expressions evaluate in source order, which is table order here.
        let record = MiiRecord {
            birth_platform: w.read_u8()?,
            unknown_1: w.read_u8()?,
            unknown_2: w.read_u8()?,
            unknown_3: w.read_u8()?,
            font_region: w.read_u8()?,
            region_move: w.read_u8()?,
            unknown_4: w.read_flag()?,
            copyable: w.read_flag()?,
            mii_version: w.read_u8()?,
            author_id: w.read_bytes()?,
            mii_id: w.read_bytes()?,
            reserved_1: w.read_bytes()?,

            unknown_5: w.read_flag()?,
            favorite: w.read_flag()?,
            color: w.read_u8()?,
            birth_day: w.read_u8()?,
            birth_month: w.read_u8()?,
            gender: w.read_u8()?,
            nickname: w.read_text()?,
            fatness: w.read_u8()?,
            size: w.read_u8()?,

            blush_type: w.read_u8()?,
            face_style: w.read_u8()?,
            face_color: w.read_u8()?,
            face_type: w.read_u8()?,
            local_only: w.read_flag()?,

            unknown_6: w.read_u8()?,
            hair_mirrored: w.read_flag()?,
            hair_color: w.read_u8()?,
            hair_type: w.read_u8()?,

            eye_thickness: w.read_u8()?,
            eye_scale: w.read_u8()?,
            eye_color: w.read_u8()?,
            eye_type: w.read_u8()?,
            eye_height: w.read_u8()?,
            eye_distance: w.read_u8()?,
            eye_rotation: w.read_u8()?,

            eyebrow_thickness: w.read_u8()?,
            eyebrow_scale: w.read_u8()?,
            eyebrow_color: w.read_u8()?,
            eyebrow_type: w.read_u8()?,
            eyebrow_height: w.read_u8()?,
            eyebrow_distance: w.read_u8()?,
            eyebrow_rotation: w.read_u8()?,

            nose_height: w.read_u8()?,
            nose_scale: w.read_u8()?,
            nose_type: w.read_u8()?,

            mouth_thickness: w.read_u8()?,
            mouth_scale: w.read_u8()?,
            mouth_color: w.read_u8()?,
            mouth_type: w.read_u8()?,
            unknown_7: w.read_u8()?,
            mustache_type: w.read_u8()?,
            mouth_height: w.read_u8()?,

            mustache_height: w.read_u8()?,
            mustache_scale: w.read_u8()?,
            beard_color: w.read_u8()?,
            beard_type: w.read_u8()?,

            glasses_height: w.read_u8()?,
            glasses_scale: w.read_u8()?,
            glasses_color: w.read_u8()?,
            glasses_type: w.read_u8()?,

            unknown_8: w.read_flag()?,
            mole_y: w.read_u8()?,
            mole_x: w.read_u8()?,
            mole_scale: w.read_u8()?,
            mole_enabled: w.read_flag()?,

            author_name: w.read_text()?,
            reserved_2: w.read_bytes()?,
            checksum: w.read_checksum()?,
        };
        w.finish()?;

        self.check_checksum(raw, record.checksum)?;

        log::debug!("decoded mii {:?}", record.nickname);

        Ok(record)
    }

    pub fn encode(&self, record: &MiiRecord) -> Result<[u8; RECORD_LEN], MiiError> {
        encode(record)
    }

    fn check_checksum(&self, raw: &[u8], stored: u16) -> Result<(), MiiError> {
        if self.checksum_policy == ChecksumPolicy::Ignore {
            return Ok(());
        }

        let computed = crc::record_checksum(raw);
        if computed == stored {
            return Ok(());
        }

        match self.checksum_policy {
            ChecksumPolicy::Reject => Err(MiiError::ChecksumMismatch { stored, computed }),
            _ => {
                log::warn!("mii checksum mismatch: stored {stored:#06x}, computed {computed:#06x}");
                Ok(())
            }
        }
    }
}

fn encode(r: &MiiRecord) -> Result<[u8; RECORD_LEN], MiiError> {
    let mut w = FieldWalker::new(BitByteBuffer::zeroed(RECORD_LEN), MII_LAYOUT);

    w.write_u8(r.birth_platform)?;
    w.write_u8(r.unknown_1)?;
    w.write_u8(r.unknown_2)?;
    w.write_u8(r.unknown_3)?;
    w.write_u8(r.font_region)?;
    w.write_u8(r.region_move)?;
    w.write_flag(r.unknown_4)?;
    w.write_flag(r.copyable)?;
    w.write_u8(r.mii_version)?;
    w.write_bytes(&r.author_id)?;
    w.write_bytes(&r.mii_id)?;
    w.write_bytes(&r.reserved_1)?;

    w.write_flag(r.unknown_5)?;
    w.write_flag(r.favorite)?;
    w.write_u8(r.color)?;
    w.write_u8(r.birth_day)?;
    w.write_u8(r.birth_month)?;
    w.write_u8(r.gender)?;
    w.write_text(&r.nickname)?;
    w.write_u8(r.fatness)?;
    w.write_u8(r.size)?;

    w.write_u8(r.blush_type)?;
    w.write_u8(r.face_style)?;
    w.write_u8(r.face_color)?;
    w.write_u8(r.face_type)?;
    w.write_flag(r.local_only)?;

    w.write_u8(r.unknown_6)?;
    w.write_flag(r.hair_mirrored)?;
    w.write_u8(r.hair_color)?;
    w.write_u8(r.hair_type)?;

    w.write_u8(r.eye_thickness)?;
    w.write_u8(r.eye_scale)?;
    w.write_u8(r.eye_color)?;
    w.write_u8(r.eye_type)?;
    w.write_u8(r.eye_height)?;
    w.write_u8(r.eye_distance)?;
    w.write_u8(r.eye_rotation)?;

    w.write_u8(r.eyebrow_thickness)?;
    w.write_u8(r.eyebrow_scale)?;
    w.write_u8(r.eyebrow_color)?;
    w.write_u8(r.eyebrow_type)?;
    w.write_u8(r.eyebrow_height)?;
    w.write_u8(r.eyebrow_distance)?;
    w.write_u8(r.eyebrow_rotation)?;

    w.write_u8(r.nose_height)?;
    w.write_u8(r.nose_scale)?;
    w.write_u8(r.nose_type)?;

    w.write_u8(r.mouth_thickness)?;
    w.write_u8(r.mouth_scale)?;
    w.write_u8(r.mouth_color)?;
    w.write_u8(r.mouth_type)?;
    w.write_u8(r.unknown_7)?;
    w.write_u8(r.mustache_type)?;
    w.write_u8(r.mouth_height)?;

    w.write_u8(r.mustache_height)?;
    w.write_u8(r.mustache_scale)?;
    w.write_u8(r.beard_color)?;
    w.write_u8(r.beard_type)?;

    w.write_u8(r.glasses_height)?;
    w.write_u8(r.glasses_scale)?;
    w.write_u8(r.glasses_color)?;
    w.write_u8(r.glasses_type)?;

    w.write_flag(r.unknown_8)?;
    w.write_u8(r.mole_y)?;
    w.write_u8(r.mole_x)?;
    w.write_u8(r.mole_scale)?;
    w.write_flag(r.mole_enabled)?;

    w.write_text(&r.author_name)?;
    w.write_bytes(&r.reserved_2)?;
    w.write_checksum_placeholder()?;

    let mut raw = [0u8; RECORD_LEN];
    raw.copy_from_slice(w.finish()?.as_bytes());

    endian::swap_record(&mut raw)?;
    let checksum = crc::record_checksum(&raw);
    raw[CHECKSUM_OFFSET..].copy_from_slice(&checksum.to_be_bytes());

    log::debug!("encoded mii {:?}, checksum {checksum:#06x}", r.nickname);

    Ok(raw)
}

#[cfg(test)]
pub(crate) mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::{errors::TextError, layout::NICKNAME_LEN};

    /// AwEAQNDqNZfMQP131K+wv1n8kW4jgAAApltTAEMATwBUAFQAMAA4ADUAMgAAAGc5AgA5B7RIRBL3IsQGrQwTagwAOCmxMUhQUwBjAG8AdAB0ACAATQAuAAAAAAAAAA50
    pub(crate) const FIXTURE: [u8; RECORD_LEN] = [
        3, 1, 0, 64, 208, 234, 53, 151, 204, 64, 253, 119, 212, 175, 176, 191, 89, 252, 145, 110,
        35, 128, 0, 0, 166, 91, 83, 0, 67, 0, 79, 0, 84, 0, 84, 0, 48, 0, 56, 0, 53, 0, 50, 0, 0,
        0, 103, 57, 2, 0, 57, 7, 180, 72, 68, 18, 247, 34, 196, 6, 173, 12, 19, 106, 12, 0, 56,
        41, 177, 49, 72, 80, 83, 0, 99, 0, 111, 0, 116, 0, 116, 0, 32, 0, 77, 0, 46, 0, 0, 0, 0,
        0, 0, 0, 14, 116,
    ];

    fn decode_fixture() -> MiiRecord {
        MiiRecord::decode(&FIXTURE, ChecksumPolicy::Reject).unwrap()
    }

    #[test]
    fn test_decode_fixture_header() {
        let mii = decode_fixture();
        assert_eq!(mii.birth_platform, 4);
        assert!(mii.copyable);
        assert_eq!(mii.mii_version, 3);
        assert_eq!(mii.author_id, [0xD0, 0xEA, 0x35, 0x97, 0xCC, 0x40, 0xFD, 0x77]);
        assert_eq!(
            mii.mii_id,
            [0xD4, 0xAF, 0xB0, 0xBF, 0x59, 0xFC, 0x91, 0x6E, 0x23, 0x80]
        );
        assert_eq!(mii.checksum, 0x0E74);
    }

    #[test]
    fn test_decode_fixture_profile() {
        let mii = decode_fixture();
        assert_eq!(mii.nickname, "SCOTT0852");
        assert_eq!(mii.author_name, "Scott M.");
        assert!(mii.favorite);
        assert_eq!(mii.color, 6);
        assert_eq!(mii.birth_day, 29);
        assert_eq!(mii.birth_month, 3);
        assert_eq!(mii.gender, 0);
        assert_eq!(mii.size, 103);
        assert_eq!(mii.fatness, 57);
    }

    #[test]
    fn test_decode_fixture_features() {
        let mii = decode_fixture();
        assert_eq!(mii.face_type, 1);
        assert_eq!((mii.hair_color, mii.hair_type), (7, 57));
        assert_eq!(
            (mii.eye_type, mii.eye_color, mii.eye_scale, mii.eye_thickness),
            (52, 2, 4, 2)
        );
        assert_eq!((mii.eye_height, mii.eye_distance, mii.eye_rotation), (9, 2, 4));
        assert_eq!((mii.eyebrow_type, mii.eyebrow_color), (23, 7));
        assert_eq!((mii.nose_type, mii.nose_scale, mii.nose_height), (13, 5, 6));
        assert_eq!((mii.mouth_type, mii.mouth_height), (19, 12));
        assert_eq!((mii.mustache_height, mii.beard_color), (10, 7));
        assert_eq!((mii.glasses_type, mii.glasses_height), (1, 6));
        assert_eq!((mii.mole_x, mii.mole_y, mii.mole_scale), (2, 20, 4));
        assert!(!mii.mole_enabled);
    }

    #[test]
    fn test_fixture_round_trip() {
        let mii = decode_fixture();
        assert_eq!(mii.encode().unwrap(), FIXTURE);
    }

    #[test]
    fn test_edit_nickname_round_trip() {
        let mut mii = decode_fixture();
        mii.nickname = "Ünïcødé".to_string();

        let raw = mii.encode().unwrap();
        let decoded = MiiRecord::decode(&raw, ChecksumPolicy::Reject).unwrap();
        assert_eq!(decoded.nickname, "Ünïcødé");
        assert_eq!(decoded.checksum, crc::record_checksum(&raw));

        mii.checksum = decoded.checksum;
        assert_eq!(decoded, mii);
        assert_eq!(&raw[..0x1A], &FIXTURE[..0x1A]);
        assert_eq!(&raw[0x2E..CHECKSUM_OFFSET], &FIXTURE[0x2E..CHECKSUM_OFFSET]);
    }

    #[test]
    fn test_default_record() {
        let raw = MiiRecord::default().encode().unwrap();
        assert!(raw[..CHECKSUM_OFFSET].iter().all(|b| *b == 0));
        assert_eq!(&raw[CHECKSUM_OFFSET..], &[0, 0]);
        assert_eq!(
            MiiRecord::decode(&raw, ChecksumPolicy::Reject).unwrap(),
            MiiRecord::default()
        );
    }

    #[test]
    fn test_field_overflow() {
        let mut mii = decode_fixture();
        mii.eye_color = 8;
        assert_eq!(
            mii.encode().unwrap_err(),
            MiiError::FieldOverflow {
                field: "eye_color",
                value: 8,
                width: 3
            }
        );
    }

    #[test]
    fn test_nickname_too_long() {
        let mut mii = decode_fixture();
        mii.nickname = "ABCDEFGHIJK".to_string();
        assert_eq!(
            mii.encode().unwrap_err(),
            MiiError::Text {
                field: "nickname",
                source: TextError::TooLong {
                    units: 11,
                    capacity: NICKNAME_LEN / 2
                }
            }
        );
    }

    #[test]
    fn test_wrong_length() {
        let codec = MiiCodec::new(ChecksumPolicy::Ignore);
        assert_eq!(
            codec.decode(&FIXTURE[..64]).unwrap_err(),
            MiiError::InvalidLength {
                expected: 96,
                actual: 64
            }
        );
        assert!(codec.decode(&[0u8; 97]).is_err());
    }

    #[test]
    fn test_checksum_policies() {
        let mut raw = FIXTURE;
        raw[CHECKSUM_OFFSET + 1] ^= 0xFF;

        let kept = MiiCodec::new(ChecksumPolicy::Ignore).decode(&raw).unwrap();
        assert_eq!(kept.checksum, 0x0E8B);

        let warned = MiiCodec::new(ChecksumPolicy::Warn).decode(&raw).unwrap();
        assert_eq!(warned, kept);

        assert_eq!(
            MiiCodec::new(ChecksumPolicy::Reject).decode(&raw).unwrap_err(),
            MiiError::ChecksumMismatch {
                stored: 0x0E8B,
                computed: 0x0E74
            }
        );
    }

    #[test]
    fn test_corrupt_text_does_not_fail() {
        let mut raw = FIXTURE;
        // lone high surrogate as the first nickname unit (little-endian on the wire)
        raw[0x1A] = 0x00;
        raw[0x1B] = 0xD8;

        let mii = MiiCodec::new(ChecksumPolicy::Ignore).decode(&raw).unwrap();
        assert_eq!(mii.nickname, "\u{FFFD}COTT0852");
    }

    fn device_image() -> impl Strategy<Value = [u8; RECORD_LEN]> {
        (
            prop::collection::vec(any::<u8>(), RECORD_LEN),
            "[ -~]{0,10}",
            "[a-zA-Z0-9 ]{0,10}",
        )
            .prop_map(|(bytes, nickname, author)| {
                let mut raw = [0u8; RECORD_LEN];
                raw.copy_from_slice(&bytes);
                for (offset, text) in [(0x1A, &nickname), (0x48, &author)] {
                    let mut slot = [0u8; NICKNAME_LEN];
                    for (i, unit) in text.encode_utf16().enumerate() {
                        slot[i * 2..i * 2 + 2].copy_from_slice(&unit.to_le_bytes());
                    }
                    raw[offset..offset + NICKNAME_LEN].copy_from_slice(&slot);
                }
                let checksum = crc::record_checksum(&raw);
                raw[CHECKSUM_OFFSET..].copy_from_slice(&checksum.to_be_bytes());
                raw
            })
    }

    proptest! {
        #[test]
        fn prop_device_image_round_trip(raw in device_image()) {
            let mii = MiiRecord::decode(&raw, ChecksumPolicy::Reject).unwrap();
            prop_assert_eq!(mii.encode().unwrap(), raw);
        }

        #[test]
        fn prop_record_round_trip(raw in device_image(), nickname in "\\PC{0,5}") {
            let mut mii = MiiRecord::decode(&raw, ChecksumPolicy::Reject).unwrap();
            mii.nickname = nickname.replace('\0', "");

            let encoded = mii.encode().unwrap();
            let decoded = MiiRecord::decode(&encoded, ChecksumPolicy::Reject).unwrap();
            mii.checksum = decoded.checksum;
            prop_assert_eq!(decoded, mii);
        }
    }
}
