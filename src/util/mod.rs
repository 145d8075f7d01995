//! # Utility Modules
//!
//! Common helpers used throughout the crate — currently just hex
//! encoding/decoding for telegram input and debug output.

pub mod hex;

pub use hex::{decode_hex, encode_hex, format_hex_compact, hex_to_bytes, pretty_hex};
