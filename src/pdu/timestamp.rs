use chrono::{FixedOffset, NaiveDate, TimeZone};

use super::error::{PduError, Result};
use super::PduReader;

const SCTS_LEN: usize = 7;

fn swapped_bcd(octet: u8) -> u32 {
    u32::from(octet & 0x0F) * 10 + u32::from(octet >> 4)
}

/// Zone offset in seconds. Quarter hours are swapped BCD; bit 3 is the sign.
fn zone_offset_seconds(octet: u8) -> i32 {
    let quarters = i32::from(octet & 0x07) * 10 + i32::from(octet >> 4);
    let seconds = quarters * 15 * 60;
    if octet & 0x08 != 0 {
        -seconds
    } else {
        seconds
    }
}

/// Read TP-SCTS and convert it to milliseconds since the Unix epoch.
pub fn read_scts(reader: &mut PduReader<'_>) -> Result<i64> {
    let octets = reader.read_bytes(SCTS_LEN, "service centre timestamp")?;

    let yy = swapped_bcd(octets[0]) as i32;
    let year = if yy >= 90 { 1900 + yy } else { 2000 + yy };

    let offset = FixedOffset::east_opt(zone_offset_seconds(octets[6]))
        .ok_or(PduError::InvalidTimestamp)?;

    let local = NaiveDate::from_ymd_opt(year, swapped_bcd(octets[1]), swapped_bcd(octets[2]))
        .and_then(|date| {
            date.and_hms_opt(
                swapped_bcd(octets[3]),
                swapped_bcd(octets[4]),
                swapped_bcd(octets[5]),
            )
        })
        .ok_or(PduError::InvalidTimestamp)?;

    let stamped = offset
        .from_local_datetime(&local)
        .single()
        .ok_or(PduError::InvalidTimestamp)?;

    Ok(stamped.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scts(bytes: &[u8]) -> Result<i64> {
        let mut reader = PduReader::new(bytes);
        read_scts(&mut reader)
    }

    #[test]
    fn test_utc_timestamp() {
        let millis = scts(&[0x32, 0x11, 0x41, 0x22, 0x31, 0x02, 0x00]).unwrap();
        assert_eq!(millis, 1_700_000_000_000);
    }

    #[test]
    fn test_positive_zone() {
        // 1999-03-29 15:16:59 +02:00
        let millis = scts(&[0x99, 0x30, 0x92, 0x51, 0x61, 0x95, 0x80]).unwrap();
        assert_eq!(millis, 922_713_419_000);
    }

    #[test]
    fn test_negative_zone() {
        // 2023-11-14 17:14:20 -05:00
        let millis = scts(&[0x32, 0x11, 0x41, 0x71, 0x41, 0x02, 0x0A]).unwrap();
        assert_eq!(millis, 1_700_000_060_000);
    }

    #[test]
    fn test_invalid_month() {
        assert_eq!(
            scts(&[0x32, 0x31, 0x41, 0x22, 0x31, 0x02, 0x00]),
            Err(PduError::InvalidTimestamp)
        );
    }

    #[test]
    fn test_truncated() {
        assert_eq!(
            scts(&[0x32, 0x11, 0x41]),
            Err(PduError::Truncated {
                field: "service centre timestamp"
            })
        );
    }
}
