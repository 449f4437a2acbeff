use super::error::Result;
use super::gsm7;
use super::PduReader;

const TON_INTERNATIONAL: u8 = 0b001;
const TON_ALPHANUMERIC: u8 = 0b101;

fn type_of_number(toa: u8) -> u8 {
    (toa >> 4) & 0x07
}

fn semi_octet_char(nibble: u8) -> Option<char> {
    match nibble {
        0..=9 => Some(char::from(b'0' + nibble)),
        0x0A => Some('*'),
        0x0B => Some('#'),
        0x0C => Some('a'),
        0x0D => Some('b'),
        0x0E => Some('c'),
        // 0x0F is filler
        _ => None,
    }
}

/// Swapped-nibble BCD digits, low nibble first, stopping at `max_digits`.
fn bcd_digits(octets: &[u8], max_digits: usize) -> String {
    octets
        .iter()
        .flat_map(|b| [b & 0x0F, b >> 4])
        .take(max_digits)
        .filter_map(semi_octet_char)
        .collect()
}

fn format_number(toa: u8, digits: String) -> String {
    if type_of_number(toa) == TON_INTERNATIONAL && !digits.is_empty() {
        format!("+{}", digits)
    } else {
        digits
    }
}

/// Read the TP-OA field. The length octet counts useful semi-octets.
/// A zero-length address yields `None`.
pub fn read_originating(reader: &mut PduReader<'_>) -> Result<Option<String>> {
    let semi_octets = usize::from(reader.read_u8("originating address length")?);
    let toa = reader.read_u8("originating address type")?;
    let octets = reader.read_bytes(semi_octets.div_ceil(2), "originating address")?;

    if semi_octets == 0 {
        return Ok(None);
    }

    if type_of_number(toa) == TON_ALPHANUMERIC {
        let septets = semi_octets * 4 / 7;
        let text = gsm7::decode(octets, 0, septets)?;
        return Ok(Some(text));
    }

    Ok(Some(format_number(toa, bcd_digits(octets, semi_octets))))
}

/// Read the service centre prefix. Its length octet counts octets, TOA included.
pub fn read_service_center(reader: &mut PduReader<'_>) -> Result<Option<String>> {
    let length = usize::from(reader.read_u8("service centre length")?);
    if length == 0 {
        return Ok(None);
    }

    let toa = reader.read_u8("service centre type")?;
    let octets = reader.read_bytes(length - 1, "service centre address")?;
    let digits = bcd_digits(octets, octets.len() * 2);

    if digits.is_empty() {
        return Ok(None);
    }
    Ok(Some(format_number(toa, digits)))
}
