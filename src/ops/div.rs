/*!
Division.

Grounded on `ieee754.py`'s `_divide_finite`: align so the quotient comes out
with a few guard bits beyond the destination precision, then fold the
integer-division remainder into a sticky bit so [`normalize`] rounds
correctly.
*/

use rug::Integer;

use crate::context::Context;
use crate::format::BinaryFormat;
use crate::ops::{normalize, propagate_nan};
use crate::signal::{SignalClass, SignalRaised};
use crate::value::Binary;

pub fn divide(ctx: &mut Context, format: &BinaryFormat, a: &Binary, b: &Binary) -> Result<Binary, SignalRaised> {
    if let Some((nan, any_signalling)) = propagate_nan(format, &[a, b]) {
        return if any_signalling {
            ctx.signal(SignalClass::SignallingNaNOperand, "signalling NaN operand to divide", nan, false)
        } else {
            Ok(nan)
        };
    }

    let sign = a.sign() != b.sign();

    if a.is_zero() && b.is_zero() {
        let default = Binary::nan(format.clone(), sign, true, Integer::from(0));
        return ctx.signal(SignalClass::InvalidDivide, "0 / 0", default, sign);
    }
    if a.is_infinite() && b.is_infinite() {
        let default = Binary::nan(format.clone(), sign, true, Integer::from(0));
        return ctx.signal(SignalClass::InvalidDivide, "infinity / infinity", default, sign);
    }
    if b.is_zero() {
        let default = Binary::infinity(format.clone(), sign);
        return ctx.signal(SignalClass::DivideByZero, "division by zero", default, sign);
    }
    if b.is_infinite() {
        return Ok(Binary::zero(format.clone(), sign));
    }
    if a.is_infinite() {
        return Ok(Binary::infinity(format.clone(), sign));
    }
    if a.is_zero() {
        return Ok(Binary::zero(format.clone(), sign));
    }

    let guard_bits = format.precision() + 2;
    let numerator = Integer::from(a.significand() << guard_bits);
    let rhs = b.significand().clone();
    let mut quotient = Integer::from(&numerator / &rhs);
    let remainder = Integer::from(&numerator - &quotient * &rhs);
    if remainder.cmp0() != std::cmp::Ordering::Equal && quotient.is_even() {
        quotient += 1;
    }

    let exp = a.exponent_int().unwrap() - b.exponent_int().unwrap() - guard_bits as i64;
    normalize(ctx, format, sign, exp, quotient)
}
