//! SMS-DELIVER decoding (3GPP TS 23.040).
//!
//! PDUs arrive the way the telephony stack hands them to broadcast receivers:
//! a service centre prefix followed by the TPDU.

pub mod address;
pub mod error;
pub mod gsm7;
pub mod timestamp;
pub mod user_data;

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

pub use error::{PduError, Result};
pub use user_data::{ConcatInfo, Encoding};

const MTI_MASK: u8 = 0x03;
const MTI_SMS_DELIVER: u8 = 0x00;
const UDHI_BIT: u8 = 0x40;

/// Format tag carried next to the PDU list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum PduFormat {
    #[default]
    #[serde(rename = "3gpp")]
    Gsm,
    #[serde(rename = "3gpp2")]
    Cdma,
}

impl fmt::Display for PduFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PduFormat::Gsm => write!(f, "3gpp"),
            PduFormat::Cdma => write!(f, "3gpp2"),
        }
    }
}

impl FromStr for PduFormat {
    type Err = PduError;

    fn from_str(tag: &str) -> Result<Self> {
        match tag {
            "3gpp" => Ok(PduFormat::Gsm),
            "3gpp2" => Ok(PduFormat::Cdma),
            other => Err(PduError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// A decoded SMS-DELIVER.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsMessage {
    /// Message text; `None` for 8-bit data messages
    pub body: Option<String>,
    pub originating_address: Option<String>,
    /// Service centre timestamp, ms since the Unix epoch (UTC)
    pub timestamp_millis: i64,
    pub service_center: Option<String>,
    pub encoding: Encoding,
    pub concat: Option<ConcatInfo>,
}

/// Bounds-checked cursor over a PDU.
pub struct PduReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> PduReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn read_u8(&mut self, field: &'static str) -> Result<u8> {
        let byte = *self
            .data
            .get(self.pos)
            .ok_or(PduError::Truncated { field })?;
        self.pos += 1;
        Ok(byte)
    }

    pub fn read_bytes(&mut self, len: usize, field: &'static str) -> Result<&'a [u8]> {
        let bytes = self
            .data
            .get(self.pos..self.pos + len)
            .ok_or(PduError::Truncated { field })?;
        self.pos += len;
        Ok(bytes)
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }
}

/// Decode one PDU using the declared format.
pub fn decode(pdu: &[u8], format: PduFormat) -> Result<SmsMessage> {
    if format != PduFormat::Gsm {
        return Err(PduError::UnsupportedFormat(format.to_string()));
    }

    let mut reader = PduReader::new(pdu);
    let service_center = address::read_service_center(&mut reader)?;

    let first_octet = reader.read_u8("first octet")?;
    let mti = first_octet & MTI_MASK;
    if mti != MTI_SMS_DELIVER {
        return Err(PduError::UnsupportedMessageType(mti));
    }
    let has_header = first_octet & UDHI_BIT != 0;

    let originating_address = address::read_originating(&mut reader)?;
    let _protocol_id = reader.read_u8("protocol identifier")?;
    let dcs = reader.read_u8("data coding scheme")?;
    let encoding = user_data::encoding_for_dcs(dcs)?;
    let timestamp_millis = timestamp::read_scts(&mut reader)?;
    let user_data = user_data::read_user_data(&mut reader, encoding, has_header)?;

    Ok(SmsMessage {
        body: user_data.body,
        originating_address,
        timestamp_millis,
        service_center,
        encoding,
        concat: user_data.concat,
    })
}


#[cfg(test)]
mod tests {
    use super::test_vectors::*;
    use super::*;

    #[test]
    fn test_decode_simple_deliver() {
        let sms = decode(&hi(), PduFormat::Gsm).unwrap();
        assert_eq!(sms.body.as_deref(), Some("hi"));
        assert_eq!(sms.originating_address.as_deref(), Some("+15551234567"));
        assert_eq!(sms.timestamp_millis, 1_700_000_000_000);
        assert_eq!(sms.service_center, None);
        assert_eq!(sms.encoding, Encoding::Gsm7);
        assert_eq!(sms.concat, None);
    }

    #[test]
    fn test_decode_with_service_center() {
        let sms = decode(&hi_with_smsc(), PduFormat::Gsm).unwrap();
        assert_eq!(sms.service_center.as_deref(), Some("+27381000015"));
        assert_eq!(sms.body.as_deref(), Some("hi"));
    }

    #[test]
    fn test_decode_negative_zone() {
        let sms = decode(&bar_from_uk(), PduFormat::Gsm).unwrap();
        assert_eq!(sms.originating_address.as_deref(), Some("+447700900123"));
        assert_eq!(sms.timestamp_millis, 1_700_000_060_000);
    }

    #[test]
    fn test_decode_missing_address() {
        let sms = decode(&bar_without_address(), PduFormat::Gsm).unwrap();
        assert_eq!(sms.originating_address, None);
        assert_eq!(sms.body.as_deref(), Some("bar"));
    }

    #[test]
    fn test_decode_ucs2() {
        let sms = decode(&ucs2(), PduFormat::Gsm).unwrap();
        assert_eq!(sms.encoding, Encoding::Ucs2);
        assert_eq!(sms.body.as_deref(), Some("Ağ"));
        assert_eq!(sms.originating_address.as_deref(), Some("+905321112233"));
    }

    #[test]
    fn test_decode_concat_part() {
        let sms = decode(&concat_part(), PduFormat::Gsm).unwrap();
        assert_eq!(sms.body.as_deref(), Some("Hi"));
        assert_eq!(
            sms.concat,
            Some(ConcatInfo {
                reference: 0x2A,
                total: 2,
                sequence: 1
            })
        );
    }

    #[test]
    fn test_decode_alphanumeric_sender() {
        let sms = decode(&alphanumeric(), PduFormat::Gsm).unwrap();
        assert_eq!(sms.originating_address.as_deref(), Some("Bank"));
        assert_eq!(sms.body.as_deref(), Some("ok"));
    }

    #[test]
    fn test_decode_eight_bit() {
        let sms = decode(&eight_bit(), PduFormat::Gsm).unwrap();
        assert_eq!(sms.encoding, Encoding::EightBit);
        assert_eq!(sms.body, None);
    }

    #[test]
    fn test_decode_extension_table() {
        let sms = decode(&extended(), PduFormat::Gsm).unwrap();
        assert_eq!(sms.body.as_deref(), Some("@€x"));
    }

    #[test]
    fn test_cdma_unsupported() {
        let err = decode(&hi(), PduFormat::Cdma).unwrap_err();
        assert_eq!(err, PduError::UnsupportedFormat("3gpp2".to_string()));
    }

    #[test]
    fn test_submit_rejected() {
        let mut pdu = hi();
        pdu[1] = 0x01;
        let err = decode(&pdu, PduFormat::Gsm).unwrap_err();
        assert_eq!(err, PduError::UnsupportedMessageType(0x01));
    }

    #[test]
    fn test_empty_pdu_is_truncated() {
        let err = decode(&[], PduFormat::Gsm).unwrap_err();
        assert_eq!(
            err,
            PduError::Truncated {
                field: "service centre length"
            }
        );
    }

    #[test]
    fn test_format_tags() {
        assert_eq!("3gpp".parse::<PduFormat>().unwrap(), PduFormat::Gsm);
        assert_eq!("3gpp2".parse::<PduFormat>().unwrap(), PduFormat::Cdma);
        assert!("gsm".parse::<PduFormat>().is_err());
    }
}
