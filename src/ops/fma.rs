/*!
Fused multiply-add.

Grounded on `ieee754.py`'s `fma`: form the exact product in a format wide
enough that the multiplication cannot itself round or signal, then add `c`
into the destination format in one more rounding step.
*/

use rug::Integer;

use crate::context::Context;
use crate::format::BinaryFormat;
use crate::ops::add::add;
use crate::ops::{normalize, propagate_nan};
use crate::signal::{SignalClass, SignalRaised};
use crate::value::Binary;

pub fn fma(ctx: &mut Context, format: &BinaryFormat, a: &Binary, b: &Binary, c: &Binary) -> Result<Binary, SignalRaised> {
    if let Some((nan, any_signalling)) = propagate_nan(format, &[a, b, c]) {
        return if any_signalling {
            ctx.signal(SignalClass::SignallingNaNOperand, "signalling NaN operand to fma", nan, false)
        } else {
            Ok(nan)
        };
    }

    let product_sign = a.sign() != b.sign();

    if (a.is_zero() && b.is_infinite()) || (a.is_infinite() && b.is_zero()) {
        let default = Binary::nan(format.clone(), product_sign, true, Integer::from(0));
        return ctx.signal(SignalClass::InvalidFMA, "0 * infinity in fma", default, product_sign);
    }

    if a.is_infinite() || b.is_infinite() {
        let product = Binary::infinity(format.clone(), product_sign);
        return add(ctx, format, &product, c);
    }

    if a.is_zero() || b.is_zero() {
        let product = Binary::zero(format.clone(), product_sign);
        return add(ctx, format, &product, c);
    }

    // Product format: precision wide enough for the exact product of both
    // operands' significands and an exponent range wide enough that no
    // subnormal handling or overflow can occur before the final add.
    let product_precision = (a.format().precision() + b.format().precision()).max(format.precision() + 2);
    let headroom = format.precision() as i64 + a.format().precision() as i64 + b.format().precision() as i64 + 16;
    let product_format =
        BinaryFormat::from_triple(product_precision, format.e_max() + headroom, format.e_min() - headroom)
            .expect("derived FMA product format parameters are always valid");

    let product_exp = a.exponent_int().unwrap() + b.exponent_int().unwrap();
    let product_sig = Integer::from(a.significand() * b.significand());

    // `product_format` is wide enough that this normalization is exact and
    // cannot overflow or underflow: a throwaway context is enough to carry
    // it, since whatever it would have signalled is unreachable by
    // construction.
    let mut scratch_ctx = Context::new();
    let product = normalize(&mut scratch_ctx, &product_format, product_sign, product_exp, product_sig)
        .expect("product format is wide enough that multiplication cannot overflow or underflow");

    add(ctx, format, &product, c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::normalize;

    fn fmt() -> BinaryFormat {
        BinaryFormat::from_ieee(64).unwrap()
    }

    fn from_u64(format: &BinaryFormat, ctx: &mut Context, v: u64) -> Binary {
        normalize(ctx, format, false, 0, Integer::from(v)).unwrap()
    }

    #[test]
    fn fma_exact_integers() {
        let mut ctx = Context::new();
        let f = fmt();
        let a = from_u64(&f, &mut ctx, 3);
        let b = from_u64(&f, &mut ctx, 4);
        let c = from_u64(&f, &mut ctx, 5);
        let result = fma(&mut ctx, &f, &a, &b, &c).unwrap();
        let seventeen = from_u64(&f, &mut ctx, 17);
        assert_eq!(*result.significand(), *seventeen.significand());
        assert_eq!(result.exponent(), seventeen.exponent());
    }

    #[test]
    fn fma_avoids_double_rounding() {
        // 1e16 * (1 + 2^-52) - 1e16 == 2.0 exactly under fma, but rounds
        // away under naive (a*b) + c because the product alone is already
        // inexact in binary64.
        let mut ctx = Context::new();
        let f = fmt();
        let a = from_u64(&f, &mut ctx, 10_000_000_000_000_000);
        let one_ulp_over_one = {
            let one = from_u64(&f, &mut ctx, 1);
            let bumped = Integer::from(one.significand() << 52u32) + 1;
            normalize(&mut ctx, &f, false, -52, bumped).unwrap()
        };
        let neg_a = a.negate();
        let result = fma(&mut ctx, &f, &a, &one_ulp_over_one, &neg_a).unwrap();
        let two = from_u64(&f, &mut ctx, 2);
        assert_eq!(*result.significand(), *two.significand());
        assert_eq!(result.exponent(), two.exponent());
    }
}
