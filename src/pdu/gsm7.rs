//! GSM 03.38 default alphabet and septet packing.

use super::error::{PduError, Result};

const ESCAPE: u8 = 0x1B;

#[rustfmt::skip]
const DEFAULT_ALPHABET: [char; 128] = [
    '@', '£', '$', '¥', 'è', 'é', 'ù', 'ì', 'ò', 'Ç', '\n', 'Ø', 'ø', '\r', 'Å', 'å',
    'Δ', '_', 'Φ', 'Γ', 'Λ', 'Ω', 'Π', 'Ψ', 'Σ', 'Θ', 'Ξ', '\u{1B}', 'Æ', 'æ', 'ß', 'É',
    ' ', '!', '"', '#', '¤', '%', '&', '\'', '(', ')', '*', '+', ',', '-', '.', '/',
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', ':', ';', '<', '=', '>', '?',
    '¡', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O',
    'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', 'Ä', 'Ö', 'Ñ', 'Ü', '§',
    '¿', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o',
    'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z', 'ä', 'ö', 'ñ', 'ü', 'à',
];

fn extension_char(code: u8) -> Option<char> {
    match code {
        0x0A => Some('\u{0C}'),
        0x14 => Some('^'),
        0x28 => Some('{'),
        0x29 => Some('}'),
        0x2F => Some('\\'),
        0x3C => Some('['),
        0x3D => Some('~'),
        0x3E => Some(']'),
        0x40 => Some('|'),
        0x65 => Some('€'),
        _ => None,
    }
}

/// Unpack `count` septets from `data`, skipping `fill_bits` leading bits.
pub fn unpack_septets(data: &[u8], fill_bits: usize, count: usize) -> Result<Vec<u8>> {
    let mut septets = Vec::with_capacity(count);

    for i in 0..count {
        let bit = fill_bits + i * 7;
        let index = bit / 8;
        let shift = bit % 8;

        let low = *data.get(index).ok_or(PduError::Truncated {
            field: "user data",
        })?;
        let mut value = u16::from(low) >> shift;

        // Septet straddles two octets
        if shift > 1 {
            let high = *data.get(index + 1).ok_or(PduError::Truncated {
                field: "user data",
            })?;
            value |= u16::from(high) << (8 - shift);
        }

        septets.push((value & 0x7F) as u8);
    }

    Ok(septets)
}

/// Map unpacked septets to text through the default alphabet and its
/// extension table. A trailing escape is dropped.
pub fn septets_to_string(septets: &[u8]) -> String {
    let mut text = String::with_capacity(septets.len());
    let mut iter = septets.iter().copied();

    while let Some(code) = iter.next() {
        if code == ESCAPE {
            if let Some(extended) = iter.next() {
                let ch = extension_char(extended)
                    .unwrap_or(DEFAULT_ALPHABET[usize::from(extended & 0x7F)]);
                text.push(ch);
            }
            continue;
        }
        text.push(DEFAULT_ALPHABET[usize::from(code & 0x7F)]);
    }

    text
}

/// Decode `count` packed septets starting after `fill_bits`.
pub fn decode(data: &[u8], fill_bits: usize, count: usize) -> Result<String> {
    let septets = unpack_septets(data, fill_bits, count)?;
    Ok(septets_to_string(&septets))
}
