//! # Key Table
//!
//! A read-only mapping from device identification to AES key, used during
//! mode-5 decryption. Populated once at startup and passed by reference into
//! `interpret` — there is no process-wide mutable key store (Design Note 9).

use std::collections::HashMap;

/// Maps a 4-byte device identification, in natural (reversed wire-order)
/// form — the same order `get_device_id()` produces and the serial is
/// printed in — to its 16-byte AES key.
#[derive(Debug, Clone, Default)]
pub struct KeyTable {
    keys: HashMap<[u8; 4], [u8; 16]>,
}

impl KeyTable {
    /// An empty key table. Mode-5 telegrams will fail with `MissingKey`.
    pub fn new() -> Self {
        Self {
            keys: HashMap::new(),
        }
    }

    /// The demo key table seeded in the original reference implementation:
    /// device `57 00 00 44` and the all-zero device, both with well-known
    /// test keys. Useful for examples and tests; production deployments
    /// should build their own table with `insert`.
    pub fn with_demo_keys() -> Self {
        let mut table = Self::new();
        table.insert(
            [0x57, 0x00, 0x00, 0x44],
            [
                0xCA, 0xFE, 0xBA, 0xBE, 0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0, 0xCA,
                0xFE, 0xBA, 0xBE,
            ],
        );
        table.insert([0x00, 0x00, 0x00, 0x00], [0xFF; 16]);
        table
    }

    /// Register a key for a device identification.
    pub fn insert(&mut self, device_id: [u8; 4], key: [u8; 16]) {
        self.keys.insert(device_id, key);
    }

    /// Look up the key for a device identification, if one is registered.
    pub fn lookup(&self, device_id: &[u8; 4]) -> Option<&[u8; 16]> {
        self.keys.get(device_id)
    }

    /// Number of registered keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_keys_are_registered() {
        let table = KeyTable::with_demo_keys();
        assert_eq!(table.len(), 2);
        assert!(table.lookup(&[0x57, 0x00, 0x00, 0x44]).is_some());
        assert!(table.lookup(&[0x00, 0x00, 0x00, 0x00]).is_some());
        assert!(table.lookup(&[0x11, 0x22, 0x33, 0x44]).is_none());
    }

    #[test]
    fn empty_table_has_no_keys() {
        let table = KeyTable::new();
        assert!(table.is_empty());
        assert!(table.lookup(&[0x00, 0x00, 0x00, 0x00]).is_none());
    }
}
