/*!
Multiplication.

Grounded on `ieee754.py`'s `_multiply`.
*/

use rug::Integer;

use crate::context::Context;
use crate::format::BinaryFormat;
use crate::ops::{normalize, propagate_nan};
use crate::signal::{SignalClass, SignalRaised};
use crate::value::Binary;

pub fn multiply(ctx: &mut Context, format: &BinaryFormat, a: &Binary, b: &Binary) -> Result<Binary, SignalRaised> {
    if let Some((nan, any_signalling)) = propagate_nan(format, &[a, b]) {
        return if any_signalling {
            ctx.signal(SignalClass::SignallingNaNOperand, "signalling NaN operand to multiply", nan, false)
        } else {
            Ok(nan)
        };
    }

    let sign = a.sign() != b.sign();

    if (a.is_zero() && b.is_infinite()) || (a.is_infinite() && b.is_zero()) {
        let default = Binary::nan(format.clone(), sign, true, Integer::from(0));
        return ctx.signal(SignalClass::InvalidMultiply, "0 * infinity", default, sign);
    }

    if a.is_infinite() || b.is_infinite() {
        return Ok(Binary::infinity(format.clone(), sign));
    }

    if a.is_zero() || b.is_zero() {
        return Ok(Binary::zero(format.clone(), sign));
    }

    let exp = a.exponent_int().unwrap() + b.exponent_int().unwrap();
    let product = Integer::from(a.significand() * b.significand());

    normalize(ctx, format, sign, exp, product)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::BinaryFormat;

    fn fmt() -> BinaryFormat {
        BinaryFormat::from_ieee(64).unwrap()
    }

    fn from_u64(format: &BinaryFormat, ctx: &mut Context, v: u64) -> Binary {
        normalize(ctx, format, false, 0, Integer::from(v)).unwrap()
    }

    #[test]
    fn multiply_exact_small_integers() {
        let mut ctx = Context::new();
        let f = fmt();
        let three = from_u64(&f, &mut ctx, 3);
        let four = from_u64(&f, &mut ctx, 4);
        let result = multiply(&mut ctx, &f, &three, &four).unwrap();
        let twelve = from_u64(&f, &mut ctx, 12);
        assert_eq!(result.exponent(), twelve.exponent());
        assert_eq!(*result.significand(), *twelve.significand());
        assert!(!ctx.flags().inexact);
    }

    #[test]
    fn zero_times_infinity_is_invalid() {
        let mut ctx = Context::new();
        let f = fmt();
        let z = Binary::zero(f.clone(), false);
        let inf = Binary::infinity(f.clone(), true);
        let result = multiply(&mut ctx, &f, &z, &inf).unwrap();
        assert!(result.is_nan());
        assert!(ctx.flags().invalid);
    }

    #[test]
    fn sign_is_xor_of_operands() {
        let mut ctx = Context::new();
        let f = fmt();
        let three = from_u64(&f, &mut ctx, 3);
        let neg_four = from_u64(&f, &mut ctx, 4).negate();
        let result = multiply(&mut ctx, &f, &three, &neg_four).unwrap();
        assert!(result.sign());
    }
}
