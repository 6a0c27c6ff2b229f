#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(unused_must_use)]
#![deny(unused_mut)]

//! reed_solomon implements the systematic Reed-Solomon code that protects a phrase: check
//! symbols in the low coefficients, data above them. With a single check symbol the code
//! detects any one corrupted word and recovers any one word marked as an erasure.

use crate::field::{GfElem, GF_SIZE};
use crate::poly::GfPoly;

/// ReedSolomon is a Reed-Solomon code over GF(2^11) with a configurable number of check
/// symbols. The code is immutable after construction and safe to share between threads.
#[derive(Clone, Debug)]
pub struct ReedSolomon {
    check_symbols: usize,
    generator: GfPoly,
}

impl ReedSolomon {
    /// new constructs the code with the given number of check symbols. The generator
    /// polynomial is derived from that count as g(x) = (x - a^0)(x - a^1)...(x - a^(k-1)) for
    /// the primitive element a, so a larger code needs no further changes here.
    pub fn new(check_symbols: usize) -> ReedSolomon {
        let mut generator = GfPoly::new();
        generator.set_coeff(0, GfElem::ONE);
        generator.set_degree(0);
        for i in 0..check_symbols {
            generator.mul_by_x_minus(GfElem::GENERATOR.pow(i as u32));
        }
        ReedSolomon {
            check_symbols,
            generator,
        }
    }

    /// check_symbols returns the number of check symbols the code appends.
    pub fn check_symbols(&self) -> usize {
        self.check_symbols
    }

    /// encode fills in the low coefficients of a message whose data occupies the coefficients
    /// above them; the low coefficients must be zero on entry. Afterwards the polynomial is a
    /// codeword: it evaluates to zero at every root of the generator, and the data
    /// coefficients are unchanged.
    pub fn encode(&self, message: &mut GfPoly) {
        let remainder = self.remainder(message);
        *message += &remainder;
    }

    /// check reports whether a candidate codeword evaluates to zero at every root of the
    /// generator polynomial.
    pub fn check(&self, message: &GfPoly) -> bool {
        (0..self.check_symbols)
            .all(|i| message.eval(GfElem::GENERATOR.pow(i as u32)).is_zero())
    }

    /// correct_erasure recovers the single unknown coefficient at the given position by trying
    /// every field value in order and keeping the first that makes the polynomial verify. The
    /// polynomial is left holding the accepted value. Returns None when no value verifies,
    /// which cannot happen for a codeword with exactly one erasure.
    pub fn correct_erasure(&self, message: &mut GfPoly, position: usize) -> Option<GfElem> {
        for value in 0..GF_SIZE as u16 {
            let candidate = GfElem::new(value);
            message.set_coeff(position, candidate);
            // The candidate may raise or lower the true degree when the erasure sits in the
            // leading position.
            message.recompute_degree();
            if self.check(message) {
                return Some(candidate);
            }
        }
        None
    }

    // Remainder of the message modulo the generator, by polynomial long division. The
    // generator is monic, so each step cancels the leading term without an inversion.
    fn remainder(&self, message: &GfPoly) -> GfPoly {
        let mut rem = message.clone();
        while rem.degree() >= self.generator.degree() && rem.degree() >= 0 {
            let shift = (rem.degree() - self.generator.degree()) as usize;
            let lead = rem.coeff(rem.degree() as usize);
            for i in 0..=self.generator.degree() as usize {
                let c = rem.coeff(i + shift) + lead * self.generator.coeff(i);
                rem.set_coeff(i + shift, c);
            }
            rem.recompute_degree();
        }
        rem
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poly::NUM_COEFFS;

    // Builds a message with the given data values in the coefficients above the check
    // symbols, ready for encoding.
    fn data_message(check_symbols: usize, data: &[u16]) -> GfPoly {
        let mut message = GfPoly::new();
        for (i, &value) in data.iter().enumerate() {
            message.set_coeff(check_symbols + i, GfElem::new(value));
        }
        message.recompute_degree();
        message
    }

    #[test]
    // with one check symbol the generator is x + 1, with two it is (x + 1)(x + 2).
    fn check_generator_derivation() {
        let rs1 = ReedSolomon::new(1);
        assert_eq!(rs1.generator.degree(), 1);
        assert_eq!(rs1.generator.coeff(0), GfElem::ONE);
        assert_eq!(rs1.generator.coeff(1), GfElem::ONE);

        let rs2 = ReedSolomon::new(2);
        assert_eq!(rs2.generator.degree(), 2);
        assert_eq!(rs2.generator.coeff(0), GfElem::new(2));
        assert_eq!(rs2.generator.coeff(1), GfElem::new(3));
        assert_eq!(rs2.generator.coeff(2), GfElem::ONE);
    }

    #[test]
    // encoding leaves the data untouched, fills the check symbol, and produces a polynomial
    // that verifies. With one check symbol the checksum is the sum of the data coefficients.
    fn check_encode() {
        let data = [1u16, 2047, 0, 52, 913, 7, 7, 1024, 600, 3, 88, 1999, 42];
        let mut message = data_message(1, &data);
        let rs = ReedSolomon::new(1);
        rs.encode(&mut message);

        assert!(rs.check(&message));
        for (i, &value) in data.iter().enumerate() {
            assert_eq!(message.coeff(1 + i), GfElem::new(value));
        }
        let sum = data.iter().fold(0u16, |acc, &v| acc ^ v);
        assert_eq!(message.coeff(0), GfElem::new(sum));
    }

    #[test]
    // the all-zero message encodes to the all-zero codeword, which verifies.
    fn check_encode_zero() {
        let mut message = GfPoly::new();
        let rs = ReedSolomon::new(1);
        rs.encode(&mut message);
        assert_eq!(message, GfPoly::new());
        assert!(rs.check(&message));
    }

    #[test]
    // substituting any single coefficient for any different value breaks verification.
    fn check_detects_single_substitution() {
        let rs = ReedSolomon::new(1);
        let mut message =
            data_message(1, &[900, 2, 0, 52, 913, 7, 1500, 1024, 600, 3, 88, 1999, 42]);
        rs.encode(&mut message);

        for position in 0..NUM_COEFFS {
            let original = message.coeff(position);
            for delta in [1u16, 2, 1023, 2047] {
                let corrupted = GfElem::new(original.value() ^ delta);
                message.set_coeff(position, corrupted);
                message.recompute_degree();
                assert!(
                    !rs.check(&message),
                    "substitution at {} undetected",
                    position
                );
            }
            message.set_coeff(position, original);
            message.recompute_degree();
        }
        assert!(rs.check(&message));
    }

    #[test]
    // an erasure at any position is recovered to exactly the original coefficient.
    fn check_corrects_single_erasure() {
        let rs = ReedSolomon::new(1);
        let mut message =
            data_message(1, &[5, 2000, 0, 52, 913, 7, 1500, 1024, 600, 3, 88, 1, 2047]);
        rs.encode(&mut message);
        let reference = message.clone();

        for position in 0..NUM_COEFFS {
            let mut erased = reference.clone();
            erased.set_coeff(position, GfElem::ZERO);
            erased.recompute_degree();
            let recovered = rs.correct_erasure(&mut erased, position);
            assert_eq!(recovered, Some(reference.coeff(position)));
            assert_eq!(erased, reference);
        }
    }

    #[test]
    // a two-symbol code built from the same derivation still encodes, verifies, detects
    // substitutions and recovers erasures.
    fn check_two_check_symbols() {
        let rs = ReedSolomon::new(2);
        let mut message = data_message(2, &[321, 0, 1744, 9, 9, 2047, 100, 55, 3, 1, 808, 77]);
        rs.encode(&mut message);
        assert!(rs.check(&message));
        let reference = message.clone();

        message.set_coeff(5, GfElem::new(message.coeff(5).value() ^ 1));
        message.recompute_degree();
        assert!(!rs.check(&message));

        let mut erased = reference.clone();
        erased.set_coeff(13, GfElem::ZERO);
        erased.recompute_degree();
        assert_eq!(
            rs.correct_erasure(&mut erased, 13),
            Some(reference.coeff(13))
        );
    }
}
