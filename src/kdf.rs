#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(unused_must_use)]
#![deny(unused_mut)]

//! kdf derives the 256-bit private key that a mnemonic seed protects. The derivation is
//! Argon2id over the 16-byte secret seed, salted with the format version and the quantized
//! creation date so that the same seed material yields distinct keys across versions and date
//! buckets.

use argon2::{Algorithm, Argon2, Params, Version};

use crate::error::{Result, SeedError};
use crate::{SecretKey, SecretSeed};

// Fixed Argon2id cost parameters: 3 passes over 256 MiB in a single lane. The memory is a
// transient allocation scoped to one derivation call.
const ARGON_T_COST: u32 = 3;
const ARGON_M_COST: u32 = 256 * 1024;
const ARGON_LANES: u32 = 1;

const SALT_LEN: usize = 25;
const SALT_PREFIX: &[u8] = b"Monero 14-word seed";

/// derive_key runs Argon2id over the secret seed with a salt bound to the given version and
/// quantized date, producing the 256-bit private key. The result depends on nothing but its
/// three arguments.
pub fn derive_key(seed: &SecretSeed, version: u8, quantized_date: u32) -> Result<SecretKey> {
    let params = Params::new(
        ARGON_M_COST,
        ARGON_T_COST,
        ARGON_LANES,
        Some(std::mem::size_of::<SecretKey>()),
    )
    .map_err(|e| SeedError::KdfFailure(e.to_string()))?;
    let argon = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let salt = build_salt(version, quantized_date);
    let mut key: SecretKey = [0u8; 32];
    argon
        .hash_password_into(seed, &salt, &mut key)
        .map_err(|e| SeedError::KdfFailure(e.to_string()))?;
    Ok(key)
}

// The salt layout is fixed at 25 bytes: the prefix text in bytes 0..19, byte 19 always zero,
// the version byte at offset 20, and the quantized date little-endian in bytes 21..25.
fn build_salt(version: u8, quantized_date: u32) -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    salt[..SALT_PREFIX.len()].copy_from_slice(SALT_PREFIX);
    salt[20] = version;
    salt[21..25].copy_from_slice(&quantized_date.to_le_bytes());
    salt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // the zero version and date leave six trailing zero bytes after the prefix.
    fn check_salt_layout_zero() {
        let expected = b"Monero 14-word seed\x00\x00\x00\x00\x00\x00";
        assert_eq!(build_salt(0, 0), *expected);
    }

    #[test]
    // the version byte sits at offset 20 and the date occupies the last four bytes
    // little-endian; offset 19 stays zero regardless.
    fn check_salt_layout_fields() {
        let salt = build_salt(5, 0x0102_0304);
        assert_eq!(&salt[..19], &b"Monero 14-word seed"[..]);
        assert_eq!(salt[19], 0);
        assert_eq!(salt[20], 5);
        assert_eq!(&salt[21..], &[0x04, 0x03, 0x02, 0x01][..]);
    }
}
