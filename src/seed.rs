#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(unused_must_use)]
#![deny(unused_mut)]

//! seed implements the mnemonic seed lifecycle: generating a seed with fresh entropy, parsing
//! a phrase back into one (recovering a single word written as `xxxx`), and exposing the
//! derived private key. A phrase carries a 154-bit payload spread over fourteen 11-bit
//! words: one check word, a 3-bit version, 2 reserved bits, a 10-bit quantized creation date
//! and the 128-bit secret seed.

use std::fmt;
use std::sync::LazyLock;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::dictionary;
use crate::error::{Result, SeedError};
use crate::field::{GfElem, GF_BITS};
use crate::kdf;
use crate::poly::{GfPoly, NUM_COEFFS};
use crate::reed_solomon::ReedSolomon;
use crate::{random_seed, SecretKey, SecretSeed};

/// PHRASE_WORDS describes the number of words in a mnemonic phrase.
pub const PHRASE_WORDS: usize = NUM_COEFFS;

/// ERASURE is the token written in place of a forgotten word. At most one may appear in a
/// phrase.
pub const ERASURE: &str = "xxxx";

/// EPOCH is the zero point of the creation date field: 2020-06-01 00:00:00 UTC, in unix
/// seconds.
pub const EPOCH: u64 = 1590969600;

/// TIME_STEP is the granularity of the creation date in seconds, one twelfth of the mean
/// Gregorian year.
pub const TIME_STEP: u64 = 2629746;

const CHECK_SYMBOLS: usize = 1;
const VERSION_BITS: u32 = 3;
const RESERVED_BITS: u32 = 2;
const DATE_BITS: u32 = 10;
const DATE_MASK: u64 = (1 << DATE_BITS) - 1;
const SEED_BYTE_BITS: u32 = 8;
const CHECKSUM_BITS: usize = GF_BITS * CHECK_SYMBOLS;
const TOTAL_BITS: usize = GF_BITS * PHRASE_WORDS;

static RS: LazyLock<ReedSolomon> = LazyLock::new(|| ReedSolomon::new(CHECK_SYMBOLS));

/// Seed owns one mnemonic seed: the message polynomial behind the phrase, the 16 bytes of
/// secret material, the 256-bit private key derived from them, and the decoded metadata. The
/// secret fields are wiped when the value is dropped. A Seed only exists if its constructing
/// call succeeded, and its polynomial is then a valid codeword.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Seed {
    message: GfPoly,
    seed: SecretSeed,
    key: SecretKey,
    #[zeroize(skip)]
    date: u64,
    #[zeroize(skip)]
    version: u8,
    #[zeroize(skip)]
    reserved: u8,
    #[zeroize(skip)]
    correction: Option<&'static str>,
}

impl Seed {
    /// generate creates a new seed with fresh entropy, stamped with the given creation time
    /// in unix seconds. The time is rounded down to the nearest TIME_STEP since EPOCH.
    pub fn generate(date_created: u64) -> Result<Seed> {
        if date_created < EPOCH {
            return Err(SeedError::DateBeforeEpoch);
        }
        let quantized_date = quantize(date_created);
        let date = EPOCH + quantized_date as u64 * TIME_STEP;
        let version = 0u8;
        let reserved = 0u8;

        let seed = random_seed()?;
        let mut message = pack_payload(version, reserved, quantized_date, &seed);
        RS.encode(&mut message);
        debug_assert!(RS.check(&message));

        let key = kdf::derive_key(&seed, version, quantized_date)?;
        Ok(Seed {
            message,
            seed,
            key,
            date,
            version,
            reserved,
            correction: None,
        })
    }

    /// from_phrase reconstructs a seed from its mnemonic phrase: exactly fourteen words
    /// separated by single spaces, of which at most one may be replaced by `xxxx`. An erased
    /// word is recovered from the check word and reported through correction(); any other
    /// single-word corruption is detected and rejected.
    pub fn from_phrase(phrase: &str) -> Result<Seed> {
        let tokens: Vec<&str> = phrase.split(' ').collect();
        if tokens.len() != PHRASE_WORDS {
            return Err(SeedError::WrongTokenCount(tokens.len()));
        }

        let mut message = GfPoly::new();
        let mut erasure: Option<usize> = None;
        for (i, token) in tokens.iter().enumerate() {
            match dictionary::word_index(token) {
                Some(index) => message.set_coeff(i, GfElem::new(index as u16)),
                None if *token == ERASURE => {
                    if erasure.is_some() {
                        return Err(SeedError::TooManyErasures);
                    }
                    erasure = Some(i);
                }
                None => return Err(SeedError::UnknownWord((*token).to_string())),
            }
        }
        message.recompute_degree();

        let correction = match erasure {
            Some(position) => {
                let recovered = RS
                    .correct_erasure(&mut message, position)
                    .ok_or(SeedError::ChecksumMismatch)?;
                Some(dictionary::word_at(recovered.value() as usize))
            }
            None => {
                if !RS.check(&message) {
                    return Err(SeedError::ChecksumMismatch);
                }
                None
            }
        };

        let (version, reserved, quantized_date, seed) = unpack_payload(&message);
        let date = EPOCH + quantized_date as u64 * TIME_STEP;
        let key = kdf::derive_key(&seed, version, quantized_date)?;
        Ok(Seed {
            message,
            seed,
            key,
            date,
            version,
            reserved,
            correction,
        })
    }

    /// phrase renders the seed as its fourteen-word mnemonic phrase, words separated by a
    /// single space.
    pub fn phrase(&self) -> String {
        let mut phrase = String::new();
        for i in 0..PHRASE_WORDS {
            if i > 0 {
                phrase += " ";
            }
            phrase += dictionary::word_at(self.message.coeff(i).value() as usize);
        }
        phrase
    }

    /// secret_seed returns the 16 bytes of secret material stored in the phrase.
    pub fn secret_seed(&self) -> &SecretSeed {
        &self.seed
    }

    /// key returns the 256-bit private key derived from the seed.
    pub fn key(&self) -> &SecretKey {
        &self.key
    }

    /// key_hex renders the derived key as 64 lowercase hex characters, most significant byte
    /// first.
    pub fn key_hex(&self) -> String {
        hex::encode(self.key)
    }

    /// date returns the creation time in unix seconds, quantized to TIME_STEP granularity.
    pub fn date(&self) -> u64 {
        self.date
    }

    /// version returns the format version stored in the phrase, currently always zero.
    pub fn version(&self) -> u8 {
        self.version
    }

    /// reserved returns the reserved bits stored in the phrase, currently always zero.
    pub fn reserved(&self) -> u8 {
        self.reserved
    }

    /// correction returns the recovered word when the parsed phrase contained an erasure.
    pub fn correction(&self) -> Option<&'static str> {
        self.correction
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.phrase())
    }
}

// Creation dates count in TIME_STEP units since EPOCH, floored, and wrap at 10 bits.
fn quantize(date_created: u64) -> u32 {
    (((date_created - EPOCH) / TIME_STEP) & DATE_MASK) as u32
}

// Write `bits` bits of `value` MSB-first into the polynomial at the absolute bit offset, 11
// bits per coefficient. No field spans more than two coefficients.
fn write_bits(poly: &mut GfPoly, offset: &mut usize, value: u32, bits: u32) {
    let mut remaining = bits;
    while remaining > 0 {
        let index = *offset / GF_BITS;
        let used = (*offset % GF_BITS) as u32;
        let room = GF_BITS as u32 - used;
        let take = room.min(remaining);
        let chunk = (value >> (remaining - take)) & ((1 << take) - 1);
        let placed = (chunk << (room - take)) as u16;
        poly.set_coeff(index, GfElem::new(poly.coeff(index).value() | placed));
        *offset += take as usize;
        remaining -= take;
    }
}

// Read `bits` bits MSB-first from the polynomial starting at the absolute bit offset.
fn read_bits(poly: &GfPoly, offset: &mut usize, bits: u32) -> u32 {
    let mut value = 0u32;
    let mut remaining = bits;
    while remaining > 0 {
        let index = *offset / GF_BITS;
        let used = (*offset % GF_BITS) as u32;
        let room = GF_BITS as u32 - used;
        let take = room.min(remaining);
        let chunk = (poly.coeff(index).value() as u32 >> (room - take)) & ((1 << take) - 1);
        value = (value << take) | chunk;
        *offset += take as usize;
        remaining -= take;
    }
    value
}

// Lay out version, reserved, quantized date and the seed bytes across coefficients 1..13,
// leaving coefficient 0 zeroed for the check symbol.
fn pack_payload(version: u8, reserved: u8, quantized_date: u32, seed: &SecretSeed) -> GfPoly {
    let mut message = GfPoly::new();
    let mut offset = CHECKSUM_BITS;
    write_bits(&mut message, &mut offset, version as u32, VERSION_BITS);
    write_bits(&mut message, &mut offset, reserved as u32, RESERVED_BITS);
    write_bits(&mut message, &mut offset, quantized_date, DATE_BITS);
    for byte in seed {
        write_bits(&mut message, &mut offset, *byte as u32, SEED_BYTE_BITS);
    }
    debug_assert_eq!(offset, TOTAL_BITS);
    message.recompute_degree();
    message
}

// The mirror of pack_payload, skipping the check symbol in coefficient 0.
fn unpack_payload(message: &GfPoly) -> (u8, u8, u32, SecretSeed) {
    let mut offset = CHECKSUM_BITS;
    let version = read_bits(message, &mut offset, VERSION_BITS) as u8;
    let reserved = read_bits(message, &mut offset, RESERVED_BITS) as u8;
    let quantized_date = read_bits(message, &mut offset, DATE_BITS);
    let mut seed: SecretSeed = [0u8; 16];
    for byte in seed.iter_mut() {
        *byte = read_bits(message, &mut offset, SEED_BYTE_BITS) as u8;
    }
    debug_assert_eq!(offset, TOTAL_BITS);
    (version, reserved, quantized_date, seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // packing then unpacking returns every payload field bit-identical, for degenerate and
    // saturated payloads alike.
    fn check_payload_round_trip() {
        let cases: [(u8, u8, u32, SecretSeed); 4] = [
            (0, 0, 0, [0u8; 16]),
            (7, 3, 1023, [0xff; 16]),
            (0, 0, 12, *b"\x01\x23\x45\x67\x89\xab\xcd\xef\xfe\xdc\xba\x98\x76\x54\x32\x10"),
            (5, 1, 600, [0x80; 16]),
        ];
        for (version, reserved, date, seed) in cases {
            let message = pack_payload(version, reserved, date, &seed);
            assert!(message.coeff(0).is_zero());
            assert_eq!(unpack_payload(&message), (version, reserved, date, seed));
        }
    }

    #[test]
    // the payload lands MSB-first: the version fills the top three bits of the second word,
    // and a full date straddles the second and third words.
    fn check_payload_layout() {
        let message = pack_payload(7, 0, 0, &[0u8; 16]);
        assert_eq!(message.coeff(1).value(), 7 << 8);

        let message = pack_payload(0, 0, 1023, &[0u8; 16]);
        // 3 version bits + 2 reserved bits leave 6 bits of date in the second word and push
        // the remaining 4 into the top of the third.
        assert_eq!(message.coeff(1).value(), 0b111111);
        assert_eq!(message.coeff(2).value(), 0b1111 << 7);
    }

    #[test]
    // dates floor to the step boundary below and wrap after 1024 steps.
    fn check_quantize() {
        assert_eq!(quantize(EPOCH), 0);
        assert_eq!(quantize(EPOCH + TIME_STEP - 1), 0);
        assert_eq!(quantize(EPOCH + TIME_STEP), 1);
        assert_eq!(quantize(EPOCH + 12 * TIME_STEP), 12);
        assert_eq!(quantize(EPOCH + 1023 * TIME_STEP), 1023);
        assert_eq!(quantize(EPOCH + 1024 * TIME_STEP), 0);
    }

    #[test]
    // a creation date before the epoch is rejected before any entropy is drawn.
    fn check_generate_before_epoch() {
        match Seed::generate(EPOCH - 1) {
            Err(SeedError::DateBeforeEpoch) => {}
            _ => panic!("expected DateBeforeEpoch"),
        }
    }

    #[test]
    // phrases with the wrong shape are rejected with the matching error, before any key
    // derivation work happens.
    fn check_parse_rejections() {
        let word = dictionary::word_at(0);

        let thirteen = vec![word; 13].join(" ");
        match Seed::from_phrase(&thirteen) {
            Err(SeedError::WrongTokenCount(13)) => {}
            _ => panic!("expected WrongTokenCount"),
        }

        let fifteen = vec![word; 15].join(" ");
        match Seed::from_phrase(&fifteen) {
            Err(SeedError::WrongTokenCount(15)) => {}
            _ => panic!("expected WrongTokenCount"),
        }

        let mut words = vec![word; 14];
        words[3] = "zzzzz";
        match Seed::from_phrase(&words.join(" ")) {
            Err(SeedError::UnknownWord(w)) => assert_eq!(w, "zzzzz"),
            _ => panic!("expected UnknownWord"),
        }

        let mut words = vec![word; 14];
        words[2] = ERASURE;
        words[9] = ERASURE;
        match Seed::from_phrase(&words.join(" ")) {
            Err(SeedError::TooManyErasures) => {}
            _ => panic!("expected TooManyErasures"),
        }

        // Thirteen copies of word 0 plus one of word 1 sum to a nonzero syndrome.
        let mut words = vec![word; 14];
        words[6] = dictionary::word_at(1);
        match Seed::from_phrase(&words.join(" ")) {
            Err(SeedError::ChecksumMismatch) => {}
            _ => panic!("expected ChecksumMismatch"),
        }
    }

    #[test]
    // the all-zero codeword is a valid phrase carrying the zero seed at the epoch.
    fn check_parse_zero_phrase() {
        let phrase = vec![dictionary::word_at(0); 14].join(" ");
        let seed = Seed::from_phrase(&phrase).unwrap();
        assert_eq!(seed.secret_seed(), &[0u8; 16]);
        assert_eq!(seed.date(), EPOCH);
        assert_eq!(seed.version(), 0);
        assert_eq!(seed.reserved(), 0);
        assert_eq!(seed.correction(), None);
        assert_eq!(seed.key_hex().len(), 64);
        assert_eq!(seed.phrase(), phrase);
    }

    #[test]
    // a generated seed renders as fourteen dictionary words and parses back to the same
    // seed, date and derived key.
    fn check_generate_round_trip() {
        let seed = Seed::generate(EPOCH).unwrap();
        assert_eq!(seed.date(), EPOCH);

        let phrase = seed.phrase();
        let words: Vec<&str> = phrase.split(' ').collect();
        assert_eq!(words.len(), PHRASE_WORDS);
        for word in &words {
            assert!(dictionary::word_index(word).is_some());
        }
        assert_eq!(phrase, seed.to_string());

        let parsed = Seed::from_phrase(&phrase).unwrap();
        assert_eq!(parsed.secret_seed(), seed.secret_seed());
        assert_eq!(parsed.date(), seed.date());
        assert_eq!(parsed.version(), seed.version());
        assert_eq!(parsed.reserved(), seed.reserved());
        assert_eq!(parsed.key(), seed.key());
        assert_eq!(parsed.key_hex(), seed.key_hex());
        assert_eq!(parsed.correction(), None);
    }

    #[test]
    // creation dates inside a later bucket floor to that bucket and survive the round trip.
    fn check_generate_later_date() {
        let seed = Seed::generate(EPOCH + 12 * TIME_STEP + 54321).unwrap();
        assert_eq!(seed.date(), EPOCH + 12 * TIME_STEP);

        let parsed = Seed::from_phrase(&seed.phrase()).unwrap();
        assert_eq!(parsed.date(), seed.date());
        assert_eq!(parsed.secret_seed(), seed.secret_seed());
    }

    #[test]
    // erasing one word from a generated phrase recovers exactly that word, and the recovered
    // seed matches the original, key included.
    fn check_erasure_recovery() {
        let seed = Seed::generate(EPOCH).unwrap();
        let phrase = seed.phrase();
        let mut words: Vec<&str> = phrase.split(' ').collect();
        let original = words[7];
        words[7] = ERASURE;

        let recovered = Seed::from_phrase(&words.join(" ")).unwrap();
        assert_eq!(recovered.correction(), Some(original));
        assert_eq!(recovered.secret_seed(), seed.secret_seed());
        assert_eq!(recovered.key(), seed.key());
        assert_eq!(recovered.phrase(), phrase);
    }

    #[test]
    // substituting one word of a generated phrase for a different dictionary word is always
    // caught by the checksum.
    fn check_substitution_detected() {
        let seed = Seed::generate(EPOCH).unwrap();
        let phrase = seed.phrase();
        let mut words: Vec<&str> = phrase.split(' ').collect();
        let index = dictionary::word_index(words[0]).unwrap();
        words[0] = dictionary::word_at((index + 1) % dictionary::WORDS);

        match Seed::from_phrase(&words.join(" ")) {
            Err(SeedError::ChecksumMismatch) => {}
            _ => panic!("expected ChecksumMismatch"),
        }
    }
}
