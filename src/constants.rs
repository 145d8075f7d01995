//! wM-Bus protocol constants
//!
//! DIF/VIF bit masks and frame-layout values defined by prEN 13757-3/4.

/// DIF mask for the data-type nibble
pub const DIF_MASK_DATA: u8 = 0x0F;

/// DIF mask for the function-field nibble
pub const DIF_MASK_FUNCTION: u8 = 0x30;

/// DIF mask for the storage-number bit
pub const DIF_MASK_STORAGE_NO: u8 = 0x40;

/// DIF extension bit: more DIFE bytes follow
pub const DIF_EXTENSION_BIT: u8 = 0x80;

/// DIF idle filler byte (also the AES decrypt-success sentinel, doubled)
pub const DIF_IDLE_FILLER: u8 = 0x2F;

/// VIF extension bit: more VIFE bytes follow
pub const VIF_EXTENSION_BIT: u8 = 0x80;

/// VIF mask with the extension bit stripped
pub const VIF_MASK_VALUE: u8 = 0x7F;

/// Maximum number of bytes in a DIF or VIF chain (§4.2 cap)
pub const MAX_CHAIN_LEN: usize = 10;

/// Minimum value of the frame length byte (`buf[0]`)
pub const MIN_FRAME_LENGTH: u8 = 11;

/// Link-layer header size: length + control + manufacturer(2) + address(6) + ci
pub const LINK_LAYER_HEADER_LEN: usize = 11;

/// Short transport-layer header size in bytes
pub const SHORT_HEADER_LEN: usize = 4;

/// Long transport-layer header size in bytes
pub const LONG_HEADER_LEN: usize = 12;

/// AES block size used by mode-5 CBC decryption
pub const AES_BLOCK_SIZE: usize = 16;

/// First two plaintext bytes a successful mode-5 decryption must produce
pub const FILLER_SENTINEL: [u8; 2] = [0x2F, 0x2F];
