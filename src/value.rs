/*!
[`Binary`], the immutable floating-point value type.

Internally the biased exponent `E` is shifted by one relative to the IEEE
convention: zero/subnormal values carry `E = 1` (rather than IEEE's `E =
0`), and infinities/NaNs carry `E = 0` (rather than IEEE's `E = 2*e_max+1`).
This lets every finite value, normal or subnormal, share one representation
(`E` in `[1, e_max+e_bias]`, `significand` in `[0, max_significand]`)
without a separate subnormal variant. Grounded on `ieee754.py`'s `Binary`
class fields and properties.
*/

use rug::Integer;

use crate::format::BinaryFormat;

/// A binary floating-point value: a format, a sign, a biased exponent, and
/// a significand (see the module documentation for the biasing
/// convention).
#[derive(Clone, Debug)]
pub struct Binary {
    format: BinaryFormat,
    sign: bool,
    e_biased: i64,
    significand: Integer,
}

impl Binary {
    /// Construct a finite, non-zero value directly from its already-rounded
    /// components. Callers outside this crate should prefer the format
    /// factory methods and the arithmetic operations, which funnel through
    /// the normalization pipeline; this constructor trusts its caller.
    pub(crate) fn from_parts(format: BinaryFormat, sign: bool, e_biased: i64, significand: Integer) -> Binary {
        debug_assert!(e_biased >= 1 && e_biased <= format.e_max() + format.e_bias());
        debug_assert!(significand <= format.max_significand());
        Binary {
            format,
            sign,
            e_biased,
            significand,
        }
    }

    pub fn zero(format: BinaryFormat, sign: bool) -> Binary {
        Binary {
            format,
            sign,
            e_biased: 1,
            significand: Integer::from(0),
        }
    }

    pub fn infinity(format: BinaryFormat, sign: bool) -> Binary {
        Binary {
            format,
            sign,
            e_biased: 0,
            significand: Integer::from(0),
        }
    }

    /// Construct a NaN. `payload` of 0 on a signalling NaN is silently
    /// promoted to 1, matching `ieee754.py`'s `make_NaN`. Payloads wider
    /// than `p-2` bits are silently truncated.
    pub fn nan(format: BinaryFormat, sign: bool, quiet: bool, payload: Integer) -> Binary {
        let quiet_bit = format.quiet_bit();
        let mask = Integer::from(&quiet_bit - 1);
        let mut payload = Integer::from(&payload & &mask);
        if !quiet && payload.cmp0() == std::cmp::Ordering::Equal {
            payload = Integer::from(1);
        }
        let significand = if quiet { payload + &quiet_bit } else { payload };
        Binary {
            format,
            sign,
            e_biased: 0,
            significand,
        }
    }

    pub fn format(&self) -> &BinaryFormat {
        &self.format
    }

    pub fn sign(&self) -> bool {
        self.sign
    }

    pub(crate) fn e_biased(&self) -> i64 {
        self.e_biased
    }

    pub fn significand(&self) -> &Integer {
        &self.significand
    }

    pub fn is_zero(&self) -> bool {
        self.e_biased == 1 && self.significand.cmp0() == std::cmp::Ordering::Equal
    }

    pub fn is_finite(&self) -> bool {
        self.e_biased != 0
    }

    pub fn is_infinite(&self) -> bool {
        self.e_biased == 0 && self.significand.cmp0() == std::cmp::Ordering::Equal
    }

    pub fn is_nan(&self) -> bool {
        self.e_biased == 0 && self.significand.cmp0() != std::cmp::Ordering::Equal
    }

    pub fn is_quiet_nan(&self) -> bool {
        self.is_nan() && {
            let bit = self.format.quiet_bit();
            Integer::from(&self.significand & &bit).cmp0() != std::cmp::Ordering::Equal
        }
    }

    pub fn is_signalling_nan(&self) -> bool {
        self.is_nan() && !self.is_quiet_nan()
    }

    /// The NaN payload (significand with the quiet bit cleared).
    pub fn nan_payload(&self) -> Option<Integer> {
        if !self.is_nan() {
            return None;
        }
        let mask = Integer::from(&self.format.quiet_bit() - 1);
        Some(Integer::from(&self.significand & &mask))
    }

    pub fn is_subnormal(&self) -> bool {
        self.is_finite() && !self.is_zero() && self.significand < self.format.int_bit()
    }

    pub fn is_normal(&self) -> bool {
        self.is_finite() && !self.is_zero() && !self.is_subnormal()
    }

    /// The true (unbiased) exponent of a finite, non-zero value: the power
    /// of two of the leading significand bit.
    pub fn exponent(&self) -> Option<i64> {
        if !self.is_finite() || self.is_zero() {
            return None;
        }
        Some(self.e_biased - self.format.e_bias())
    }

    /// The integer exponent: the significand, read as an integer, is
    /// implicitly multiplied by `2^exponent_int()`.
    pub fn exponent_int(&self) -> Option<i64> {
        self.exponent().map(|e| e - (self.format.precision() as i64 - 1))
    }

    /// A canonical negation (sign flip); never rounds or signals.
    pub fn negate(&self) -> Binary {
        Binary {
            format: self.format.clone(),
            sign: !self.sign,
            e_biased: self.e_biased,
            significand: self.significand.clone(),
        }
    }

    pub fn abs(&self) -> Binary {
        Binary {
            format: self.format.clone(),
            sign: false,
            e_biased: self.e_biased,
            significand: self.significand.clone(),
        }
    }
}
