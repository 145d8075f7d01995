//! # wmbus-rs - A Rust Crate for Wireless M-Bus (wM-Bus) Telegram Decoding
//!
//! This crate decodes wireless M-Bus telegrams as defined by the
//! prEN 13757-3 / prEN 13757-4 family of standards. Given a raw byte
//! buffer captured from a wireless-metering receiver, it produces a
//! structured interpretation: manufacturer, device identity, function
//! code, optional AES-decrypted payload, and a list of decoded data
//! records with semantic units and numeric values.
//!
//! The decoder is purely synchronous and stateless per call. The network
//! transport, receive-queue drain loop, and pretty-printing are external
//! collaborators and out of scope for this crate.
//!
//! ## Usage
//!
//! ```toml
//! [dependencies]
//! wmbus-rs = "0.1.0"
//! ```
//!
//! ```rust
//! use wmbus_rs::{interpret, Config};
//!
//! let config = Config::with_demo_keys();
//! match interpret(&[0u8; 0], &config) {
//!     Ok(output) => println!("{:?}", output),
//!     Err(err) => eprintln!("decode failed: {err}"),
//! }
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod interpret;
pub mod keys;
pub mod logging;
pub mod payload;
pub mod util;
pub mod vendors;
pub mod wmbus;

pub use crate::config::Config;
pub use crate::error::WMBusError;
pub use crate::interpret::{interpret, interpret_hex, DataRecordOutput, Output};
pub use crate::keys::KeyTable;
pub use crate::logging::{init_logger, log_debug, log_error, log_info, log_warn};
pub use crate::wmbus::Frame;
