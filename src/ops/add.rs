/*!
Addition and subtraction.

Grounded on `ieee754.py`'s `_add`: subtraction is addition with the
right-hand operand's sign flipped; significands are aligned by left-shifting
the smaller-exponent operand (never right-shifting, since significands are
unbounded integers, so no precision is lost before rounding).
*/

use rug::Integer;

use crate::context::Context;
use crate::format::BinaryFormat;
use crate::ops::{normalize, propagate_nan};
use crate::round::RoundingMode;
use crate::signal::{SignalClass, SignalRaised};
use crate::value::Binary;

pub fn add(ctx: &mut Context, format: &BinaryFormat, a: &Binary, b: &Binary) -> Result<Binary, SignalRaised> {
    add_impl(ctx, format, a, b)
}

pub fn subtract(ctx: &mut Context, format: &BinaryFormat, a: &Binary, b: &Binary) -> Result<Binary, SignalRaised> {
    add_impl(ctx, format, a, &b.negate())
}

fn add_impl(ctx: &mut Context, format: &BinaryFormat, a: &Binary, b: &Binary) -> Result<Binary, SignalRaised> {
    if let Some((nan, any_signalling)) = propagate_nan(format, &[a, b]) {
        return if any_signalling {
            ctx.signal(SignalClass::SignallingNaNOperand, "signalling NaN operand to add", nan, false)
        } else {
            Ok(nan)
        };
    }

    if a.is_infinite() || b.is_infinite() {
        if a.is_infinite() && b.is_infinite() {
            if a.sign() == b.sign() {
                return Ok(Binary::infinity(format.clone(), a.sign()));
            }
            let default = Binary::nan(format.clone(), false, true, Integer::from(0));
            return ctx.signal(SignalClass::InvalidAdd, "added infinities of opposite sign", default, false);
        }
        let inf = if a.is_infinite() { a } else { b };
        return Ok(Binary::infinity(format.clone(), inf.sign()));
    }

    if a.is_zero() && b.is_zero() {
        let sign = if a.sign() == b.sign() {
            a.sign()
        } else {
            ctx.rounding() == RoundingMode::Floor
        };
        return Ok(Binary::zero(format.clone(), sign));
    }

    if a.is_zero() {
        return Ok(b.clone());
    }
    if b.is_zero() {
        return Ok(a.clone());
    }

    let a_exp = a.exponent_int().unwrap();
    let b_exp = b.exponent_int().unwrap();
    let (a_sig, b_sig, exp) = if a_exp >= b_exp {
        let shift = (a_exp - b_exp) as u32;
        (a.significand().clone() << shift, b.significand().clone(), b_exp)
    } else {
        let shift = (b_exp - a_exp) as u32;
        (a.significand().clone(), b.significand().clone() << shift, a_exp)
    };

    let val_a = if a.sign() { -a_sig } else { a_sig };
    let val_b = if b.sign() { -b_sig } else { b_sig };
    let sum = val_a + val_b;

    let sign = match sum.cmp0() {
        std::cmp::Ordering::Less => true,
        std::cmp::Ordering::Greater => false,
        std::cmp::Ordering::Equal => ctx.rounding() == RoundingMode::Floor,
    };
    let magnitude = if sign { -sum } else { sum };

    normalize(ctx, format, sign, exp, magnitude)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::BinaryFormat;

    fn fmt() -> BinaryFormat {
        BinaryFormat::from_ieee(64).unwrap()
    }

    fn from_u64(format: &BinaryFormat, ctx: &mut Context, v: u64) -> Binary {
        if v == 0 {
            return Binary::zero(format.clone(), false);
        }
        normalize(ctx, format, false, 0, Integer::from(v)).unwrap()
    }

    #[test]
    fn add_with_zero_is_identity() {
        let mut ctx = Context::new();
        let f = fmt();
        let x = from_u64(&f, &mut ctx, 7);
        let z = Binary::zero(f.clone(), false);
        let result = add(&mut ctx, &f, &x, &z).unwrap();
        assert_eq!(*result.significand(), *x.significand());
    }

    #[test]
    fn subtract_equal_values_is_zero() {
        let mut ctx = Context::new();
        let f = fmt();
        let x = from_u64(&f, &mut ctx, 7);
        let result = subtract(&mut ctx, &f, &x, &x).unwrap();
        assert!(result.is_zero());
        assert!(!result.sign());
    }

    #[test]
    fn subtract_equal_values_floor_rounding_is_negative_zero() {
        let mut ctx = Context::new().with_rounding(RoundingMode::Floor);
        let f = fmt();
        let x = from_u64(&f, &mut ctx, 7);
        let result = subtract(&mut ctx, &f, &x, &x).unwrap();
        assert!(result.is_zero());
        assert!(result.sign());
    }

    #[test]
    fn opposite_sign_infinities_add_to_invalid() {
        let mut ctx = Context::new();
        let f = fmt();
        let pos_inf = Binary::infinity(f.clone(), false);
        let neg_inf = Binary::infinity(f.clone(), true);
        let result = add(&mut ctx, &f, &pos_inf, &neg_inf).unwrap();
        assert!(result.is_nan());
        assert!(ctx.flags().invalid);
    }
}
