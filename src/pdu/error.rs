use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PduError {
    #[error("PDU truncated while reading {field}")]
    Truncated { field: &'static str },

    #[error("unsupported PDU format: {0}")]
    UnsupportedFormat(String),

    #[error("unsupported message type indicator: {0:#04b}")]
    UnsupportedMessageType(u8),

    #[error("compressed user data is not supported (DCS {0:#04x})")]
    Compressed(u8),

    #[error("invalid service centre timestamp")]
    InvalidTimestamp,
}

pub type Result<T> = std::result::Result<T, PduError>;
