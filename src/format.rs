/*!
[`BinaryFormat`], the immutable descriptor of a binary floating-point
format: a precision and an exponent range, plus the derived constants that
fall out of them.

Grounded on `ieee754.py`'s `BinaryFormat` class and on the accessor naming
(`emax`/`emin`/`max_p`/`bias` etc.) used by the teacher's `ieee754/round.rs`.
*/

use rug::Integer;

use crate::error::ProgrammerError;

/// A binary floating-point format: `precision` significand bits (including
/// the explicit integer bit) and an exponent range `[e_min, e_max]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinaryFormat {
    precision: u32,
    e_max: i64,
    e_min: i64,
}

impl BinaryFormat {
    /// Build a format directly from its three essential parameters.
    pub fn from_triple(precision: u32, e_max: i64, e_min: i64) -> Result<Self, ProgrammerError> {
        if precision < 3 {
            return Err(ProgrammerError::bad_argument("precision must be at least 3 bits"));
        }
        if e_max < 2 {
            return Err(ProgrammerError::bad_argument("e_max must be at least 2"));
        }
        if e_min > -1 {
            return Err(ProgrammerError::bad_argument("e_min must be at most -1"));
        }
        Ok(BinaryFormat { precision, e_max, e_min })
    }

    /// Build an IEEE-interchange-shaped format from a precision and
    /// exponent field width, following the standard's `emax = 2^(w-1) - 1`.
    pub fn from_precision_e_width(precision: u32, e_width: u32) -> Result<Self, ProgrammerError> {
        if e_width < 2 {
            return Err(ProgrammerError::bad_argument("exponent width must be at least 2 bits"));
        }
        let e_max = (1i64 << (e_width - 1)) - 1;
        let e_min = 1 - e_max;
        BinaryFormat::from_triple(precision, e_max, e_min)
    }

    /// Build a format the way an "extended" format is usually specified:
    /// precision plus an independently-chosen exponent width (x87 double
    /// extended uses a 64-bit explicit-integer-bit significand with a
    /// 15-bit exponent field, wider than its nominal precision requires).
    pub fn from_precision_extended(precision: u32, e_width: u32) -> Result<Self, ProgrammerError> {
        BinaryFormat::from_precision_e_width(precision, e_width)
    }

    /// Build the IEEE 754 interchange format with `k` total bits, per the
    /// standard's `binaryK` recipe (`p = k - round(4*log2(k)) + 13`,
    /// `w = k - p`), valid for k in {16, 32, 64, 128, 256, ...}.
    pub fn from_ieee(k: u32) -> Result<Self, ProgrammerError> {
        if k < 16 || k % 32 != 0 && k != 16 {
            return Err(ProgrammerError::bad_argument(
                "IEEE interchange width must be 16 or a multiple of 32",
            ));
        }
        let round_log2 = (4.0 * (k as f64).log2()).round() as u32;
        let p = k - round_log2 + 13;
        let e_width = k - p;
        BinaryFormat::from_precision_e_width(p, e_width)
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn e_max(&self) -> i64 {
        self.e_max
    }

    pub fn e_min(&self) -> i64 {
        self.e_min
    }

    /// Bias applied to the true exponent to get the internal biased
    /// exponent `E` (note: one more than the IEEE bias, since `E=1` means
    /// zero/subnormal here rather than `E=0`).
    pub fn e_bias(&self) -> i64 {
        1 - self.e_min
    }

    /// The integer bit, `2^(p-1)`.
    pub fn int_bit(&self) -> Integer {
        Integer::from(1) << (self.precision - 1)
    }

    /// The quiet bit of a NaN payload, `2^(p-2)`.
    pub fn quiet_bit(&self) -> Integer {
        Integer::from(1) << (self.precision - 2)
    }

    /// Largest value a significand may take, `2^p - 1`.
    pub fn max_significand(&self) -> Integer {
        (Integer::from(1) << self.precision) - 1
    }

    /// The exponent field width, `bit_length(e_max) + 1`.
    pub fn e_width(&self) -> u32 {
        bit_length_i64(self.e_max) + 1
    }

    /// Decimal digits needed to round-trip this format's precision,
    /// `2 + floor(p / log2(10))`.
    pub fn decimal_precision(&self) -> u32 {
        2 + ((self.precision as f64) / (10f64).log2()).floor() as u32
    }

    /// The `logb` result for infinities; `-logb_inf` for zero, `-logb_inf-1`
    /// for NaN.
    pub fn logb_inf(&self) -> i64 {
        2 * (self.e_max.abs().max(self.e_min.abs()) + self.precision as i64 - 1) + 1
    }

    /// Whether this format's interchange layout lands on a byte boundary,
    /// per the standard's requirement that `e_min = 1 - e_max` and
    /// `e_max + 1` is a power of two.
    pub fn is_interchange(&self) -> bool {
        if self.e_min != 1 - self.e_max {
            return false;
        }
        let em1 = self.e_max + 1;
        if em1 <= 0 || (em1 & (em1 - 1)) != 0 {
            return false;
        }
        let total_implicit = 1 + self.e_width() + (self.precision - 1);
        let total_explicit = 1 + self.e_width() + self.precision;
        total_implicit % 16 == 0 || total_explicit % 16 == 0
    }

    /// Total width in bits of this format's interchange encoding, or
    /// `None` if it is not an interchange format.
    pub fn interchange_width(&self) -> Option<u32> {
        if !self.is_interchange() {
            return None;
        }
        let total_implicit = 1 + self.e_width() + (self.precision - 1);
        if total_implicit % 16 == 0 {
            Some(total_implicit)
        } else {
            Some(1 + self.e_width() + self.precision)
        }
    }

    /// Whether the interchange encoding stores the integer bit explicitly
    /// (true for x87-style 80-bit extended; false for the standard widths).
    pub fn has_explicit_int_bit(&self) -> bool {
        match self.interchange_width() {
            Some(w) => 1 + self.e_width() + self.precision == w,
            None => false,
        }
    }

    pub fn require_interchange(&self) -> Result<u32, ProgrammerError> {
        self.interchange_width()
            .ok_or_else(|| ProgrammerError::not_interchange(format!("{:?} is not an interchange format", self)))
    }
}

fn bit_length_i64(v: i64) -> u32 {
    if v == 0 {
        0
    } else {
        64 - (v.unsigned_abs()).leading_zeros()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary64_matches_known_constants() {
        let f = BinaryFormat::from_ieee(64).unwrap();
        assert_eq!(f.precision(), 53);
        assert_eq!(f.e_max(), 1023);
        assert_eq!(f.e_min(), -1022);
        assert!(f.is_interchange());
        assert_eq!(f.interchange_width(), Some(64));
        assert!(!f.has_explicit_int_bit());
    }

    #[test]
    fn binary32_matches_known_constants() {
        let f = BinaryFormat::from_ieee(32).unwrap();
        assert_eq!(f.precision(), 24);
        assert_eq!(f.e_max(), 127);
        assert_eq!(f.e_min(), -126);
    }

    #[test]
    fn binary16_matches_known_constants() {
        let f = BinaryFormat::from_ieee(16).unwrap();
        assert_eq!(f.precision(), 11);
        assert_eq!(f.e_max(), 15);
        assert_eq!(f.e_min(), -14);
    }

    #[test]
    fn non_interchange_format_rejects_pack() {
        let f = BinaryFormat::from_triple(13, 20, -19).unwrap();
        assert!(f.require_interchange().is_err());
    }

    #[test]
    fn bad_precision_rejected() {
        assert!(BinaryFormat::from_triple(2, 10, -9).is_err());
    }
}
