#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(unused_must_use)]
#![deny(unused_mut)]

//! seed14 is a crate for working with 14-word mnemonic seed phrases. A phrase stores a
//! 128-bit secret seed together with its creation date and a format version, protected by a
//! Reed-Solomon check word over GF(2^11) that detects any single transcription error and
//! recovers a single missing word written as `xxxx`. A 256-bit private key is derived from
//! the stored seed with Argon2id.

pub mod dictionary;
pub mod error;
pub mod field;
pub mod kdf;
pub mod poly;
pub mod reed_solomon;
pub mod seed;

use rand_core::{OsRng, RngCore};

pub use error::{Result, SeedError};
pub use seed::Seed;

/// SecretSeed is the 16 bytes of secret material stored inside a mnemonic phrase.
pub type SecretSeed = [u8; 16];

/// SecretKey is the 256-bit private key derived from a seed with Argon2id.
pub type SecretKey = [u8; 32];

/// random_seed will generate a new random seed from the platform CSPRNG. Failing to obtain
/// entropy is reported as an error rather than silently producing weak secret material.
pub fn random_seed() -> Result<SecretSeed> {
    let mut seed: SecretSeed = [0u8; 16];
    OsRng
        .try_fill_bytes(&mut seed)
        .map_err(|e| SeedError::EntropyUnavailable(e.to_string()))?;
    Ok(seed)
}
