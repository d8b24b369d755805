//! The Mii record layout.
//!
//! Field order follows the bit order seen after the byte-order pass in
//! [crate::endian]: a 32-bit header word, the author and record IDs, then a run
//! of little-endian half-words whose fields appear high bit first.

use std::collections::BTreeMap;

use crate::{
    buffer::BitByteBuffer, endian, errors::MiiError, field::FieldSpec, value::Value,
    walker::FieldWalker,
};

/// Size of a raw record in bytes.
pub const RECORD_LEN: usize = 0x60;
/// Byte offset of the CRC-16 trailer.
pub const CHECKSUM_OFFSET: usize = 0x5E;
pub const NICKNAME_LEN: usize = 20;
pub const AUTHOR_NAME_LEN: usize = 20;
pub const AUTHOR_ID_LEN: usize = 8;
pub const MII_ID_LEN: usize = 10;

pub const MII_LAYOUT: &[FieldSpec] = &[
    // 0x00, header word
    FieldSpec::unsigned("birth_platform", 4),
    FieldSpec::unsigned("unknown_1", 4),
    FieldSpec::unsigned("unknown_2", 4),
    FieldSpec::unsigned("unknown_3", 4),
    FieldSpec::unsigned("font_region", 4),
    FieldSpec::unsigned("region_move", 2),
    FieldSpec::flag("unknown_4"),
    FieldSpec::flag("copyable"),
    FieldSpec::unsigned("mii_version", 8),
    // 0x04
    FieldSpec::bytes("author_id", AUTHOR_ID_LEN),
    FieldSpec::bytes("mii_id", MII_ID_LEN),
    FieldSpec::bytes("reserved_1", 2),
    // 0x18
    FieldSpec::flag("unknown_5"),
    FieldSpec::flag("favorite"),
    FieldSpec::unsigned("color", 4),
    FieldSpec::unsigned("birth_day", 5),
    FieldSpec::unsigned("birth_month", 4),
    FieldSpec::unsigned("gender", 1),
    FieldSpec::text("nickname", NICKNAME_LEN),
    // 0x2E
    FieldSpec::unsigned("fatness", 8),
    FieldSpec::unsigned("size", 8),
    // 0x30, face
    FieldSpec::unsigned("blush_type", 4),
    FieldSpec::unsigned("face_style", 4),
    FieldSpec::unsigned("face_color", 3),
    FieldSpec::unsigned("face_type", 4),
    FieldSpec::flag("local_only"),
    // 0x32, hair
    FieldSpec::unsigned("unknown_6", 4),
    FieldSpec::flag("hair_mirrored"),
    FieldSpec::unsigned("hair_color", 3),
    FieldSpec::unsigned("hair_type", 8),
    // 0x34, eyes
    FieldSpec::unsigned("eye_thickness", 3),
    FieldSpec::unsigned("eye_scale", 4),
    FieldSpec::unsigned("eye_color", 3),
    FieldSpec::unsigned("eye_type", 6),
    FieldSpec::unsigned("eye_height", 7),
    FieldSpec::unsigned("eye_distance", 4),
    FieldSpec::unsigned("eye_rotation", 5),
    // 0x38, eyebrows
    FieldSpec::unsigned("eyebrow_thickness", 4),
    FieldSpec::unsigned("eyebrow_scale", 4),
    FieldSpec::unsigned("eyebrow_color", 3),
    FieldSpec::unsigned("eyebrow_type", 5),
    FieldSpec::unsigned("eyebrow_height", 7),
    FieldSpec::unsigned("eyebrow_distance", 4),
    FieldSpec::unsigned("eyebrow_rotation", 5),
    // 0x3C, nose
    FieldSpec::unsigned("nose_height", 7),
    FieldSpec::unsigned("nose_scale", 4),
    FieldSpec::unsigned("nose_type", 5),
    // 0x3E, mouth
    FieldSpec::unsigned("mouth_thickness", 3),
    FieldSpec::unsigned("mouth_scale", 4),
    FieldSpec::unsigned("mouth_color", 3),
    FieldSpec::unsigned("mouth_type", 6),
    // 0x40
    FieldSpec::unsigned("unknown_7", 8),
    FieldSpec::unsigned("mustache_type", 3),
    FieldSpec::unsigned("mouth_height", 5),
    // 0x42, mustache and beard
    FieldSpec::unsigned("mustache_height", 6),
    FieldSpec::unsigned("mustache_scale", 4),
    FieldSpec::unsigned("beard_color", 3),
    FieldSpec::unsigned("beard_type", 3),
    // 0x44, glasses
    FieldSpec::unsigned("glasses_height", 5),
    FieldSpec::unsigned("glasses_scale", 4),
    FieldSpec::unsigned("glasses_color", 3),
    FieldSpec::unsigned("glasses_type", 4),
    // 0x46, mole
    FieldSpec::flag("unknown_8"),
    FieldSpec::unsigned("mole_y", 5),
    FieldSpec::unsigned("mole_x", 5),
    FieldSpec::unsigned("mole_scale", 4),
    FieldSpec::flag("mole_enabled"),
    // 0x48
    FieldSpec::text("author_name", AUTHOR_NAME_LEN),
    FieldSpec::bytes("reserved_2", 2),
    FieldSpec::checksum("checksum"),
];

/// Sum of all field widths in bits.
pub const fn total_bits(table: &[FieldSpec]) -> usize {
    let mut total = 0;
    let mut i = 0;
    while i < table.len() {
        total += table[i].width_bits;
        i += 1;
    }

    total
}

const _: () = assert!(total_bits(MII_LAYOUT) == RECORD_LEN * 8);

/// Decodes every field of a raw record into a name-keyed map.
///
/// Unlike [crate::mii::MiiCodec::decode] this keeps no typing beyond [Value], which
/// makes it handy for looking at unknown and reserved fields.
pub fn parse_fields(raw: &[u8]) -> Result<BTreeMap<String, Value>, MiiError> {
    if raw.len() != RECORD_LEN {
        return Err(MiiError::InvalidLength {
            expected: RECORD_LEN,
            actual: raw.len(),
        });
    }

    let mut image = raw.to_vec();
    endian::swap_record(&mut image)?;

    let mut walker = FieldWalker::new(BitByteBuffer::new(image), MII_LAYOUT);
    let mut map = BTreeMap::new();

    while walker.peek_field().is_some() {
        let (name, value) = walker.read_value()?;
        map.insert(name.to_string(), value);
    }
    walker.finish()?;

    Ok(map)
}
