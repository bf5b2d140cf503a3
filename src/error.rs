use thiserror::Error;

use crate::reedsolomon::Corrupt;

/// Reasons a text cannot be turned into a symbol.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("invalid text for an alphanumeric QR code: {0}")]
    InvalidInput(String),
}

/// Reasons a module grid cannot be read back into text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("symbol must be square, got {width}x{height}")]
    NotSquare { width: u32, height: u32 },
    #[error("unknown QR code version for a side length of {0}")]
    UnknownVersion(u32),
    #[error("QR code is damaged beyond error correction")]
    DamagedSymbol,
    #[error("malformed data segment: {0}")]
    InvalidSegment(String),
    #[error("no QR code found in image")]
    NoSymbol,
}

impl From<Corrupt> for DecodeError {
    fn from(_: Corrupt) -> Self {
        DecodeError::DamagedSymbol
    }
}
