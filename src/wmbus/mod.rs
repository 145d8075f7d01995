//! Wireless M-Bus (wM-Bus) protocol: transport-layer headers, mode-5
//! decryption, and the frame parser that ties them together.

pub mod crypto;
pub mod frame;
pub mod header;

pub use crypto::{build_mode5_iv, build_zero_iv, decrypt_mode5};
pub use frame::Frame;
pub use header::{ci_detail, classify_ci, Accessibility, CiShape, HeaderVariant, LongHeader, ShortHeader};
