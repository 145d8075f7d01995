//! Mode-5 IV construction and AES-128-CBC decryption (§4.5).
//!
//! Grounded in `WMBusFrame.get_iv()` and the decryption block of
//! `WMBusFrame.parse()` in the reference implementation, and in the
//! teacher's manual per-block `aes_encrypt_block`/`aes_decrypt_block`
//! (`Aes128::new_from_slice` + `GenericArray` + `cipher.decrypt_block`)
//! generalized here to run unconditionally rather than behind a `crypto`
//! feature flag. CTR, GCM, and ECB modes and DES (modes 2/3) are out of
//! scope; mode 2/4 IVs are exposed by name only, never wired to decryption.

use aes::cipher::{generic_array::GenericArray, BlockDecrypt, BlockEncrypt, KeyInit};
use aes::Aes128;

use crate::constants::{AES_BLOCK_SIZE, FILLER_SENTINEL};
use crate::error::WMBusError;

/// Builds the 16-byte mode-5 IV: manufacturer (2 bytes, link-layer,
/// little-endian) followed by the 6-byte address (identification ∥ version
/// ∥ device_type), followed by the access number repeated 8 times.
pub fn build_mode5_iv(manufacturer: [u8; 2], address: [u8; 6], access_nr: u8) -> [u8; 16] {
    let mut iv = [0u8; 16];
    iv[0..2].copy_from_slice(&manufacturer);
    iv[2..8].copy_from_slice(&address);
    iv[8..16].fill(access_nr);
    iv
}

/// All-zero IV for mode 2 (DES, deprecated) or mode 4 (AES, zero IV).
/// Reported by name only; neither mode is wired to decryption.
pub fn build_zero_iv(len: usize) -> Vec<u8> {
    vec![0u8; len]
}

fn aes_decrypt_block(cipher: &Aes128, block: &[u8]) -> [u8; AES_BLOCK_SIZE] {
    let mut block_copy = GenericArray::clone_from_slice(block);
    cipher.decrypt_block(&mut block_copy);
    let mut out = [0u8; AES_BLOCK_SIZE];
    out.copy_from_slice(&block_copy);
    out
}

/// Decrypts `ciphertext` with AES-128-CBC under `key` and `iv`, chaining
/// each decrypted block against the previous ciphertext block (or `iv` for
/// the first block), then checks that the plaintext starts with the
/// `0x2F 0x2F` filler sentinel.
pub fn decrypt_mode5(
    key: &[u8; 16],
    iv: &[u8; 16],
    ciphertext: &[u8],
) -> Result<Vec<u8>, WMBusError> {
    if ciphertext.is_empty() {
        return Ok(Vec::new());
    }
    if ciphertext.len() % AES_BLOCK_SIZE != 0 {
        return Err(WMBusError::CiphertextNotBlockAligned(ciphertext.len()));
    }

    let cipher = Aes128::new(GenericArray::from_slice(key));
    let mut plaintext = Vec::with_capacity(ciphertext.len());
    let mut prev_block = *iv;

    for block in ciphertext.chunks_exact(AES_BLOCK_SIZE) {
        let decrypted = aes_decrypt_block(&cipher, block);
        for i in 0..AES_BLOCK_SIZE {
            plaintext.push(decrypted[i] ^ prev_block[i]);
        }
        prev_block.copy_from_slice(block);
    }

    if plaintext[0..2] != FILLER_SENTINEL {
        return Err(WMBusError::FillerSentinelMismatch);
    }
    Ok(plaintext)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aes_encrypt_block(cipher: &Aes128, block: &[u8; AES_BLOCK_SIZE]) -> [u8; AES_BLOCK_SIZE] {
        let mut block_copy = GenericArray::clone_from_slice(block);
        cipher.encrypt_block(&mut block_copy);
        let mut out = [0u8; AES_BLOCK_SIZE];
        out.copy_from_slice(&block_copy);
        out
    }

    fn encrypt_cbc(key: &[u8; 16], iv: &[u8; 16], plaintext: &[u8]) -> Vec<u8> {
        let cipher = Aes128::new(GenericArray::from_slice(key));
        let mut ciphertext = Vec::with_capacity(plaintext.len());
        let mut prev_block = *iv;
        for chunk in plaintext.chunks_exact(AES_BLOCK_SIZE) {
            let mut block = [0u8; AES_BLOCK_SIZE];
            for i in 0..AES_BLOCK_SIZE {
                block[i] = chunk[i] ^ prev_block[i];
            }
            let encrypted = aes_encrypt_block(&cipher, &block);
            ciphertext.extend_from_slice(&encrypted);
            prev_block = encrypted;
        }
        ciphertext
    }

    #[test]
    fn mode5_iv_layout() {
        let manufacturer = [0x93, 0x15];
        let address = [0x57, 0x00, 0x00, 0x44, 0x01, 0x07];
        let iv = build_mode5_iv(manufacturer, address, 0x2A);
        assert_eq!(&iv[0..2], &manufacturer);
        assert_eq!(&iv[2..8], &address);
        assert_eq!(&iv[8..16], &[0x2A; 8]);
    }

    #[test]
    fn zero_iv_lengths() {
        assert_eq!(build_zero_iv(8).len(), 8);
        assert_eq!(build_zero_iv(16).len(), 16);
        assert!(build_zero_iv(16).iter().all(|&b| b == 0));
    }

    #[test]
    fn roundtrip_with_correct_key() {
        let key = [0x11u8; 16];
        let iv = [0x22u8; 16];
        let mut plaintext = [0u8; 32];
        plaintext[0] = 0x2F;
        plaintext[1] = 0x2F;
        plaintext[2..6].copy_from_slice(b"abcd");

        let ciphertext = encrypt_cbc(&key, &iv, &plaintext);
        let decrypted = decrypt_mode5(&key, &iv, &ciphertext).unwrap();
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn wrong_key_trips_sentinel_mismatch() {
        let key = [0x11u8; 16];
        let wrong_key = [0x99u8; 16];
        let iv = [0x22u8; 16];
        let mut plaintext = [0u8; 16];
        plaintext[0] = 0x2F;
        plaintext[1] = 0x2F;

        let ciphertext = encrypt_cbc(&key, &iv, &plaintext);
        let err = decrypt_mode5(&wrong_key, &iv, &ciphertext).unwrap_err();
        assert_eq!(err, WMBusError::FillerSentinelMismatch);
    }

    #[test]
    fn unaligned_ciphertext_is_an_error() {
        let key = [0u8; 16];
        let iv = [0u8; 16];
        let err = decrypt_mode5(&key, &iv, &[0u8; 15]).unwrap_err();
        assert_eq!(err, WMBusError::CiphertextNotBlockAligned(15));
    }

    #[test]
    fn empty_ciphertext_decrypts_to_empty() {
        let key = [0u8; 16];
        let iv = [0u8; 16];
        assert_eq!(decrypt_mode5(&key, &iv, &[]).unwrap(), Vec::<u8>::new());
    }
}
