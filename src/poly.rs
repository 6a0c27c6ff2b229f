#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(unused_must_use)]
#![deny(unused_mut)]

//! poly implements the fixed-capacity polynomials over GF(2^11) that back a mnemonic phrase:
//! one coefficient per word, fourteen in total. The coefficient storage is always fully
//! present; the cached degree marks how much of it is logically in use.

use zeroize::Zeroize;

use crate::field::GfElem;

/// MAX_DEGREE describes the highest representable degree.
pub const MAX_DEGREE: usize = 13;

/// NUM_COEFFS describes the coefficient capacity, one per phrase word.
pub const NUM_COEFFS: usize = MAX_DEGREE + 1;

/// GfPoly is a polynomial of degree at most 13 over GF(2^11). Coefficients above the cached
/// degree are physically present but logically absent. The coefficient at the degree is
/// nonzero unless the polynomial is zero, in which case the degree is -1.
#[derive(Clone, Debug, PartialEq, Eq, Zeroize)]
pub struct GfPoly {
    coeffs: [GfElem; NUM_COEFFS],
    degree: i32,
}

impl GfPoly {
    /// new returns the zero polynomial.
    pub fn new() -> GfPoly {
        GfPoly {
            coeffs: [GfElem::ZERO; NUM_COEFFS],
            degree: -1,
        }
    }

    /// coeff returns the coefficient of x^index.
    pub fn coeff(&self, index: usize) -> GfElem {
        self.coeffs[index]
    }

    /// set_coeff overwrites the coefficient of x^index. The cached degree is not adjusted;
    /// callers that may have changed the leading coefficient follow up with recompute_degree.
    pub fn set_coeff(&mut self, index: usize, value: GfElem) {
        self.coeffs[index] = value;
    }

    /// degree returns the cached degree, or -1 for the zero polynomial.
    pub fn degree(&self) -> i32 {
        self.degree
    }

    /// set_degree overwrites the cached degree.
    pub fn set_degree(&mut self, degree: i32) {
        self.degree = degree;
    }

    /// recompute_degree scans the coefficients from high to low and fixes the cached degree at
    /// the highest nonzero index, or -1 if every coefficient is zero.
    pub fn recompute_degree(&mut self) {
        self.degree = -1;
        for i in (0..NUM_COEFFS).rev() {
            if !self.coeffs[i].is_zero() {
                self.degree = i as i32;
                break;
            }
        }
    }

    /// eval evaluates the polynomial at a point with Horner's scheme.
    pub fn eval(&self, x: GfElem) -> GfElem {
        let mut acc = GfElem::ZERO;
        for i in (0..=self.degree).rev() {
            acc = acc * x + self.coeffs[i as usize];
        }
        acc
    }

    /// mul_by_x_minus multiplies the polynomial in place by the monic linear factor (x - a).
    /// Subtraction equals addition in characteristic 2, so the factor is equally (x + a).
    ///
    /// # Panics
    ///
    /// Panics if the product would not fit in the fixed capacity.
    pub fn mul_by_x_minus(&mut self, a: GfElem) {
        if self.degree < 0 {
            return;
        }
        assert!(
            self.degree < MAX_DEGREE as i32,
            "product exceeds polynomial capacity"
        );
        let mut result = [GfElem::ZERO; NUM_COEFFS];
        for i in 0..=self.degree as usize {
            result[i + 1] += self.coeffs[i];
            result[i] += a * self.coeffs[i];
        }
        self.coeffs = result;
        self.degree += 1;
    }

}

impl std::ops::AddAssign<&GfPoly> for GfPoly {
    // Coefficient-wise addition; the cached degree is refreshed since leading terms may
    // cancel.
    fn add_assign(&mut self, rhs: &GfPoly) {
        for i in 0..NUM_COEFFS {
            self.coeffs[i] += rhs.coeffs[i];
        }
        self.recompute_degree();
    }
}

impl Default for GfPoly {
    fn default() -> GfPoly {
        GfPoly::new()
    }
}
