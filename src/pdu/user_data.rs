use super::error::{PduError, Result};
use super::gsm7;
use super::PduReader;

const IEI_CONCAT_8BIT: u8 = 0x00;
const IEI_CONCAT_16BIT: u8 = 0x08;

/// Character set selected by the data coding scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Gsm7,
    EightBit,
    Ucs2,
}

/// Position of one part inside a concatenated message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConcatInfo {
    pub reference: u16,
    pub total: u8,
    pub sequence: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserData {
    pub body: Option<String>,
    pub concat: Option<ConcatInfo>,
}

/// Interpret TP-DCS. Reserved codings fall back to the default alphabet.
pub fn encoding_for_dcs(dcs: u8) -> Result<Encoding> {
    if dcs & 0x80 == 0 {
        // General data coding and automatic deletion groups
        if dcs & 0x20 != 0 {
            return Err(PduError::Compressed(dcs));
        }
        return Ok(match (dcs >> 2) & 0x03 {
            0b01 => Encoding::EightBit,
            0b10 => Encoding::Ucs2,
            _ => Encoding::Gsm7,
        });
    }

    Ok(match dcs & 0xF0 {
        0xC0 | 0xD0 => Encoding::Gsm7,
        0xE0 => Encoding::Ucs2,
        0xF0 if dcs & 0x04 != 0 => Encoding::EightBit,
        _ => Encoding::Gsm7,
    })
}

fn parse_concat(header: &[u8]) -> Option<ConcatInfo> {
    let mut pos = 0;
    while pos + 2 <= header.len() {
        let iei = header[pos];
        let len = usize::from(header[pos + 1]);
        let data = header.get(pos + 2..pos + 2 + len)?;

        match (iei, data) {
            (IEI_CONCAT_8BIT, [reference, total, sequence]) => {
                return Some(ConcatInfo {
                    reference: u16::from(*reference),
                    total: *total,
                    sequence: *sequence,
                });
            }
            (IEI_CONCAT_16BIT, [hi, lo, total, sequence]) => {
                return Some(ConcatInfo {
                    reference: u16::from_be_bytes([*hi, *lo]),
                    total: *total,
                    sequence: *sequence,
                });
            }
            _ => {}
        }
        pos += 2 + len;
    }
    None
}

fn decode_ucs2(octets: &[u8]) -> String {
    let units = octets
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]));
    char::decode_utf16(units)
        .map(|unit| unit.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

/// Read TP-UDL and TP-UD. `has_header` is the TP-UDHI bit of the first octet.
pub fn read_user_data(
    reader: &mut PduReader<'_>,
    encoding: Encoding,
    has_header: bool,
) -> Result<UserData> {
    let udl = usize::from(reader.read_u8("user data length")?);

    let octet_len = match encoding {
        Encoding::Gsm7 => (udl * 7).div_ceil(8),
        Encoding::EightBit | Encoding::Ucs2 => udl,
    };
    let data = reader.read_bytes(octet_len, "user data")?;

    let (header_len, concat) = if has_header {
        let udhl = usize::from(*data.first().ok_or(PduError::Truncated {
            field: "user data header",
        })?);
        let header = data.get(1..1 + udhl).ok_or(PduError::Truncated {
            field: "user data header",
        })?;
        (1 + udhl, parse_concat(header))
    } else {
        (0, None)
    };

    let body = match encoding {
        Encoding::Gsm7 => {
            let header_septets = (header_len * 8).div_ceil(7);
            let fill_bits = header_septets * 7 - header_len * 8;
            let count = udl.saturating_sub(header_septets);
            Some(gsm7::decode(&data[header_len..], fill_bits, count)?)
        }
        Encoding::Ucs2 => Some(decode_ucs2(&data[header_len..])),
        Encoding::EightBit => None,
    };

    Ok(UserData { body, concat })
}
