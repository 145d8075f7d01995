//! # wM-Bus Error Handling
//!
//! This module defines `WMBusError`, the taxonomy of failures that can occur
//! while decoding a telegram. All errors bubble up to `interpret`, which
//! returns a tagged failure per telegram rather than aborting the caller's
//! loop.

use thiserror::Error;

/// Errors that can occur while decoding a wM-Bus telegram.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum WMBusError {
    /// The hex-encoded input could not be decoded into bytes.
    #[error("invalid hex input: {0}")]
    InvalidHex(String),

    /// The input buffer is too short to contain a length byte and link layer.
    #[error("frame too short: got {len} bytes, need at least {min}")]
    FrameTooShort { len: usize, min: usize },

    /// `buf[0] < 11`: the declared length is below the minimum valid frame.
    #[error("invalid length byte: {0} (must be >= 11)")]
    InvalidLength(u8),

    /// The transport-layer header claimed by the CI byte does not fit in
    /// the remaining data.
    #[error("truncated transport-layer header: need {need} bytes, have {have}")]
    TruncatedHeader { need: usize, have: usize },

    /// The CI byte does not fall into any known routing set or label table.
    #[error("unknown CI byte: 0x{0:02X}")]
    UnknownCi(u8),

    /// A DIF/DIFE chain exceeded the 10-byte cap, or ran off the end of the input.
    #[error("invalid DIF chain: {0}")]
    InvalidDifChain(String),

    /// A VIF/VIFE chain exceeded the 10-byte cap, or ran off the end of the input.
    #[error("invalid VIF chain: {0}")]
    InvalidVifChain(String),

    /// A variable-length record's declared length overruns the remaining data.
    #[error("variable-length record overflows remaining data: declared {declared}, remaining {remaining}")]
    VariableLengthOverflow { declared: usize, remaining: usize },

    /// A DIF nibble did not map to any known data-field shape.
    #[error("unsupported data field for DIF nibble 0x{0:X}")]
    UnsupportedDataField(u8),

    /// Mode-5 decryption was required but no key is registered for this device.
    #[error("no key registered for device {0:02X?}")]
    MissingKey([u8; 4]),

    /// The ciphertext length is not a multiple of the AES block size.
    #[error("ciphertext length {0} is not a multiple of 16")]
    CiphertextNotBlockAligned(usize),

    /// Decryption succeeded mechanically but the `0x2F2F` sentinel is absent,
    /// meaning the wrong key (or corrupted data) was used.
    #[error("decrypted plaintext does not start with the 0x2F2F filler sentinel")]
    FillerSentinelMismatch,
}
