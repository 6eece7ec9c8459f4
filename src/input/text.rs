// Text decoding - text-input units to legacy codepage characters
//
// The game's fonts are indexed by CP866 (DOS Cyrillic). A text-input unit
// arrives as UTF-8 bytes; only 1- to 3-byte sequences are understood.

/// Upper half of CP866: the code point for bytes 0x80..=0xFF
#[rustfmt::skip]
const CP866_HIGH: [u16; 128] = [
    // 0x80: А..Я
    0x0410, 0x0411, 0x0412, 0x0413, 0x0414, 0x0415, 0x0416, 0x0417,
    0x0418, 0x0419, 0x041A, 0x041B, 0x041C, 0x041D, 0x041E, 0x041F,
    0x0420, 0x0421, 0x0422, 0x0423, 0x0424, 0x0425, 0x0426, 0x0427,
    0x0428, 0x0429, 0x042A, 0x042B, 0x042C, 0x042D, 0x042E, 0x042F,
    // 0xA0: а..п
    0x0430, 0x0431, 0x0432, 0x0433, 0x0434, 0x0435, 0x0436, 0x0437,
    0x0438, 0x0439, 0x043A, 0x043B, 0x043C, 0x043D, 0x043E, 0x043F,
    // 0xB0: shades and box drawing
    0x2591, 0x2592, 0x2593, 0x2502, 0x2524, 0x2561, 0x2562, 0x2556,
    0x2555, 0x2563, 0x2551, 0x2557, 0x255D, 0x255C, 0x255B, 0x2510,
    0x2514, 0x2534, 0x252C, 0x251C, 0x2500, 0x253C, 0x255E, 0x255F,
    0x255A, 0x2554, 0x2569, 0x2566, 0x2560, 0x2550, 0x256C, 0x2567,
    0x2568, 0x2564, 0x2565, 0x2559, 0x2558, 0x2552, 0x2553, 0x256B,
    0x256A, 0x2518, 0x250C, 0x2588, 0x2584, 0x258C, 0x2590, 0x2580,
    // 0xE0: р..я
    0x0440, 0x0441, 0x0442, 0x0443, 0x0444, 0x0445, 0x0446, 0x0447,
    0x0448, 0x0449, 0x044A, 0x044B, 0x044C, 0x044D, 0x044E, 0x044F,
    // 0xF0: Ё ё Є є Ї ї Ў ў ° ∙ · √ № ¤ ■ nbsp
    0x0401, 0x0451, 0x0404, 0x0454, 0x0407, 0x0457, 0x040E, 0x045E,
    0x00B0, 0x2219, 0x00B7, 0x221A, 0x2116, 0x00A4, 0x25A0, 0x00A0,
];

#[inline]
fn is_continuation(byte: u8) -> bool {
    (0x80..0xE0).contains(&byte)
}

/// Decode one text-input unit to a code point
///
/// The unit is read up to its first NUL byte (or the end of the slice).
/// Returns 0 for anything that is not a well-formed 1-, 2- or 3-byte
/// sequence, including every 4-byte sequence.
///
/// # Arguments
/// * `unit` - Raw bytes of the text-input event
///
/// # Returns
/// The decoded code point, or 0 if the unit is malformed or unsupported
pub fn decode_text_unit(unit: &[u8]) -> u32 {
    let byte = |i: usize| unit.get(i).copied().unwrap_or(0) as u32;
    let lead = byte(0);

    if lead < 0x80 {
        lead
    } else if lead < 0xE0 {
        let b1 = byte(1) as u8;
        if lead >= 0xC0 && is_continuation(b1) {
            (lead - 0xC0) * 64 + (b1 as u32 - 0x80)
        } else {
            0
        }
    } else if lead < 0xF0 {
        let (b1, b2) = (byte(1) as u8, byte(2) as u8);
        if is_continuation(b1) && is_continuation(b2) {
            ((lead - 0xE0) * 64 + (b1 as u32 - 0x80)) * 64 + (b2 as u32 - 0x80)
        } else {
            0
        }
    } else {
        0
    }
}

/// Map a Unicode code point to its CP866 byte
///
/// # Returns
/// `Some(byte)` if CP866 can represent the code point, `None` otherwise
pub fn unicode_to_cp866(code_point: u32) -> Option<u8> {
    if code_point < 0x80 {
        return Some(code_point as u8);
    }
    CP866_HIGH
        .iter()
        .position(|&cp| cp as u32 == code_point)
        .map(|i| 0x80 + i as u8)
}

/// Decode a text-input unit straight to the legacy character the game sees
///
/// Malformed units decode to code point 0, which is never forwarded.
pub fn decode_text_char(unit: &[u8]) -> Option<u8> {
    match decode_text_unit(unit) {
        0 => None,
        code_point => unicode_to_cp866(code_point),
    }
}
