/*!
IEEE remainder and fmod.

Grounded on `ieee754.py`'s `_remainder`: align significands as division
does until `rhs <= lhs < 2*rhs`, then run a bit-at-a-time long division
bounded by `(lhs_int_exp - rhs_int_exp) + 1` steps, keeping only the
running remainder and the parity of the last quotient bit produced (a
binary integer's parity is its least significant bit, so nothing earlier
in the quotient needs to be retained). This is bounded by the exponent
gap between the operands rather than by their quotient's magnitude, unlike
a naive repeated-subtraction loop.
*/

use rug::Integer;

use crate::context::Context;
use crate::format::BinaryFormat;
use crate::ops::add::subtract;
use crate::ops::{normalize, propagate_nan};
use crate::signal::{SignalClass, SignalRaised};
use crate::value::Binary;

fn require_same_format(a: &Binary, b: &Binary) {
    assert_eq!(
        a.format(),
        b.format(),
        "remainder/fmod require operands in the same format"
    );
}

/// The outcome of aligning `a` and `b`'s significands and running the
/// bounded long division `ieee754.py`'s `_remainder` performs.
enum Division {
    /// `bits < 0`: the aligned dividend is already smaller than the
    /// divisor by more than a factor of two; no division step ran.
    TooSmall,
    /// `bits == 0`: exactly the ambiguous single-bit case; `fmod` returns
    /// the dividend unchanged, `remainder` returns the correctly-rounded
    /// `a - b`.
    OneBit,
    /// `bits > 0`: the ordinary bounded bit-by-bit division result.
    Quotient { remainder: Integer, divisor: Integer, exponent: i64, quotient_odd: bool },
}

/// Align `a` and `b`'s significands so `rhs <= lhs < 2*rhs`, then divide
/// bit by bit for `(lhs_int_exp - rhs_int_exp) + 1` steps, tracking only
/// the running remainder and the last quotient bit's parity.
fn divide_tracking_parity(a: &Binary, b: &Binary) -> Division {
    let mut lhs = a.significand().clone();
    let mut rhs = b.significand().clone();
    let mut lhs_exp = a.exponent_int().unwrap();
    let mut rhs_exp = b.exponent_int().unwrap();

    let lshift = rhs.significant_bits() as i64 - lhs.significant_bits() as i64;
    if lshift >= 0 {
        lhs <<= lshift as u32;
        lhs_exp -= lshift;
    } else {
        rhs <<= (-lshift) as u32;
        rhs_exp += lshift;
    }

    if lhs < rhs {
        lhs <<= 1u32;
        lhs_exp -= 1;
    }

    let mut bits = (lhs_exp - rhs_exp) + 1;
    if bits <= 0 {
        return if bits == 0 { Division::OneBit } else { Division::TooSmall };
    }

    let mut quotient_odd;
    loop {
        quotient_odd = lhs >= rhs;
        if quotient_odd {
            lhs -= &rhs;
        }
        bits -= 1;
        if bits == 0 || lhs.cmp0() == std::cmp::Ordering::Equal {
            break;
        }
        lhs <<= 1u32;
    }

    Division::Quotient {
        remainder: lhs,
        divisor: rhs,
        exponent: rhs_exp,
        quotient_odd,
    }
}

pub fn fmod(ctx: &mut Context, format: &BinaryFormat, a: &Binary, b: &Binary) -> Result<Binary, SignalRaised> {
    require_same_format(a, b);
    if let Some((nan, any_signalling)) = propagate_nan(format, &[a, b]) {
        return if any_signalling {
            ctx.signal(SignalClass::SignallingNaNOperand, "signalling NaN operand to fmod", nan, false)
        } else {
            Ok(nan)
        };
    }
    if a.is_infinite() || b.is_zero() {
        let default = Binary::nan(format.clone(), a.sign(), true, Integer::from(0));
        return ctx.signal(SignalClass::InvalidRemainder, "fmod(infinity, y) or fmod(x, 0)", default, false);
    }
    if a.is_zero() {
        return Ok(a.clone());
    }
    if b.is_infinite() {
        if a.is_subnormal() {
            let natural = a.clone();
            let abrupt = Binary::zero(format.clone(), a.sign());
            return ctx.signal_underflow(SignalClass::UnderflowExact, "subnormal fmod(x, infinity)", natural, abrupt);
        }
        return Ok(a.clone());
    }

    match divide_tracking_parity(a, b) {
        Division::TooSmall | Division::OneBit => Ok(a.clone()),
        Division::Quotient { remainder, exponent, .. } => {
            if remainder.cmp0() == std::cmp::Ordering::Equal {
                Ok(Binary::zero(format.clone(), a.sign()))
            } else {
                normalize(ctx, format, a.sign(), exponent, remainder)
            }
        }
    }
}

pub fn remainder(ctx: &mut Context, format: &BinaryFormat, a: &Binary, b: &Binary) -> Result<Binary, SignalRaised> {
    require_same_format(a, b);
    if let Some((nan, any_signalling)) = propagate_nan(format, &[a, b]) {
        return if any_signalling {
            ctx.signal(SignalClass::SignallingNaNOperand, "signalling NaN operand to remainder", nan, false)
        } else {
            Ok(nan)
        };
    }
    if a.is_infinite() || b.is_zero() {
        let default = Binary::nan(format.clone(), a.sign(), true, Integer::from(0));
        return ctx.signal(SignalClass::InvalidRemainder, "remainder(infinity, y) or remainder(x, 0)", default, false);
    }
    if a.is_zero() {
        return Ok(a.clone());
    }
    if b.is_infinite() {
        return Ok(a.clone());
    }

    match divide_tracking_parity(a, b) {
        Division::TooSmall => Ok(a.clone()),
        Division::OneBit => subtract(ctx, format, a, b),
        Division::Quotient {
            mut remainder,
            divisor,
            exponent,
            quotient_odd,
        } => {
            let twice_remainder = Integer::from(&remainder * 2u32);
            let mut sign = a.sign();

            let round_quotient_up = match twice_remainder.cmp(&divisor) {
                std::cmp::Ordering::Greater => true,
                std::cmp::Ordering::Equal => quotient_odd,
                std::cmp::Ordering::Less => false,
            };
            if round_quotient_up {
                remainder = divisor - remainder;
                sign = !sign;
            }

            if remainder.cmp0() == std::cmp::Ordering::Equal {
                Ok(Binary::zero(format.clone(), a.sign()))
            } else {
                normalize(ctx, format, sign, exponent, remainder)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt() -> BinaryFormat {
        BinaryFormat::from_ieee(64).unwrap()
    }

    fn from_u64(format: &BinaryFormat, ctx: &mut Context, v: u64) -> Binary {
        normalize(ctx, format, false, 0, Integer::from(v)).unwrap()
    }

    #[test]
    fn fmod_matches_c_semantics() {
        let mut ctx = Context::new();
        let f = fmt();
        let five = from_u64(&f, &mut ctx, 5);
        let three = from_u64(&f, &mut ctx, 3);
        let result = fmod(&mut ctx, &f, &five, &three).unwrap();
        let two = from_u64(&f, &mut ctx, 2);
        assert_eq!(*result.significand(), *two.significand());
        assert_eq!(result.exponent(), two.exponent());
    }

    #[test]
    fn remainder_rounds_quotient_to_nearest_even() {
        let mut ctx = Context::new();
        let f = fmt();
        let five = from_u64(&f, &mut ctx, 5);
        let three = from_u64(&f, &mut ctx, 3);
        // 5 = 1*3 + 2; nearest integer quotient to 5/3 (~1.67) is 2, so
        // remainder = 5 - 2*3 = -1.
        let result = remainder(&mut ctx, &f, &five, &three).unwrap();
        let neg_one = from_u64(&f, &mut ctx, 1).negate();
        assert_eq!(*result.significand(), *neg_one.significand());
        assert_eq!(result.sign(), neg_one.sign());
    }

    #[test]
    fn remainder_of_zero_dividend_is_zero() {
        let mut ctx = Context::new();
        let f = fmt();
        let z = Binary::zero(f.clone(), false);
        let three = from_u64(&f, &mut ctx, 3);
        let result = remainder(&mut ctx, &f, &z, &three).unwrap();
        assert!(result.is_zero());
    }

    // A wide exponent gap between the operands used to make the old
    // repeated-subtraction loop run ~floor(lhs/rhs) times; the bit-bounded
    // division runs in (lhs_int_exp - rhs_int_exp) + 1 steps instead.
    #[test]
    fn fmod_with_large_exponent_gap_terminates() {
        let mut ctx = Context::new();
        let f = fmt();
        let huge = normalize(&mut ctx, &f, false, 900, Integer::from(1)).unwrap();
        let three = from_u64(&f, &mut ctx, 3);
        let result = fmod(&mut ctx, &f, &huge, &three).unwrap();
        assert!(result.is_finite());
    }

    #[test]
    fn remainder_with_large_exponent_gap_terminates() {
        let mut ctx = Context::new();
        let f = fmt();
        let huge = normalize(&mut ctx, &f, false, 900, Integer::from(1)).unwrap();
        let three = from_u64(&f, &mut ctx, 3);
        let result = remainder(&mut ctx, &f, &huge, &three).unwrap();
        assert!(result.is_finite());
    }
}
