#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(unused_must_use)]
#![deny(unused_mut)]

//! error defines the failure categories shared by every fallible operation in this crate.

use thiserror::Error;

/// Result is the crate-wide result alias.
pub type Result<T> = std::result::Result<T, SeedError>;

/// SeedError enumerates every way generating or parsing a mnemonic seed can fail. A failed
/// call never leaves a partially constructed seed behind.
#[derive(Debug, Error)]
pub enum SeedError {
    /// The requested creation date lies before the format epoch.
    #[error("date_created must not be before 1st June 2020")]
    DateBeforeEpoch,

    /// A phrase token is neither a wordlist entry nor the erasure marker.
    #[error("unrecognized word: '{0}'")]
    UnknownWord(String),

    /// A phrase contains two or more erasure markers; only a single missing word can be
    /// recovered.
    #[error("two or more erasures cannot be corrected")]
    TooManyErasures,

    /// A phrase does not consist of exactly fourteen space-separated tokens.
    #[error("the mnemonic phrase must consist of 14 words (got {0})")]
    WrongTokenCount(usize),

    /// A fully known phrase does not form a valid codeword.
    #[error("phrase is invalid (checksum mismatch)")]
    ChecksumMismatch,

    /// The platform CSPRNG failed to produce entropy.
    #[error("entropy source unavailable: {0}")]
    EntropyUnavailable(String),

    /// The Argon2id key derivation failed.
    #[error("key derivation failed: {0}")]
    KdfFailure(String),
}
