//! # Config
//!
//! Replaces the global singletons (key table, topic prefix, queue reference)
//! that the original implementation kept as module-level state. `Config` is
//! built once and passed by reference into `interpret`; there is no
//! process-wide mutable state anywhere in this crate (Design Note 9).

use crate::keys::KeyTable;

/// Everything the decoder needs that isn't carried in the telegram itself.
#[derive(Debug, Clone)]
pub struct Config {
    /// Read-only device-id -> AES key mapping used for mode-5 decryption.
    pub keys: KeyTable,
    /// MQTT topic prefix the upstream receiver would use to publish decoded
    /// results. Carried here because it belongs to the same "no globals"
    /// config shape as `keys`, even though publishing itself is out of scope.
    pub topic_prefix: String,
}

impl Config {
    pub fn new(keys: KeyTable, topic_prefix: impl Into<String>) -> Self {
        Self {
            keys,
            topic_prefix: topic_prefix.into(),
        }
    }

    /// A config with the demo key table and an empty topic prefix, suitable
    /// for examples and tests.
    pub fn with_demo_keys() -> Self {
        Self::new(KeyTable::with_demo_keys(), "")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(KeyTable::new(), "")
    }
}
