/*!
Round-to-integral and convert-to-integer.

Grounded on `ieee754.py`'s `round_to_integral` and `convert_to_integer`: both
split the significand at the binary point, round the integer part by the
same [`crate::round::round_up`] predicate every other operation uses, and
differ only in what they do with the result -- one rebuilds a float in
`format`, the other clamps into a fixed-width [`IntegerFormat`].
*/

use rug::Integer;

use crate::context::Context;
use crate::format::BinaryFormat;
use crate::integer_format::IntegerFormat;
use crate::ops::{normalize, propagate_nan};
use crate::round::{round_up, shift_right, LostFraction};
use crate::signal::{SignalClass, SignalRaised};
use crate::value::Binary;

fn split_integer_part(a: &Binary) -> (Integer, LostFraction, i64) {
    let exp = a.exponent_int().unwrap();
    let shift = (-exp).max(0);
    let (int_part, lost) = shift_right(a.significand(), shift);
    (int_part, lost, exp.max(0))
}

fn round_to_integral_impl(
    ctx: &mut Context,
    format: &BinaryFormat,
    a: &Binary,
    signal_inexact: bool,
) -> Result<Binary, SignalRaised> {
    if let Some((nan, any_signalling)) = propagate_nan(format, &[a]) {
        return if any_signalling {
            ctx.signal(SignalClass::SignallingNaNOperand, "signalling NaN operand to round_to_integral", nan, false)
        } else {
            Ok(nan)
        };
    }
    if a.is_infinite() {
        return Ok(Binary::infinity(format.clone(), a.sign()));
    }
    if a.is_zero() {
        return Ok(Binary::zero(format.clone(), a.sign()));
    }

    let (mut int_part, lost, e_int) = split_integer_part(a);
    let lsb_is_odd = int_part.is_odd();
    if round_up(ctx.rounding(), lost, a.sign(), lsb_is_odd) {
        int_part += 1;
    }

    let result = normalize(ctx, format, a.sign(), e_int, int_part)?;

    if signal_inexact && lost.is_nonzero() {
        return ctx.signal(SignalClass::Inexact, "round_to_integral discarded a nonzero fraction", result, false);
    }
    Ok(result)
}

/// Round `a` to the nearest representable integer value, landing in
/// `format`, under `ctx`'s rounding mode. NaN propagates; infinity and zero
/// pass through unchanged.
pub fn round_to_integral(ctx: &mut Context, format: &BinaryFormat, a: &Binary) -> Result<Binary, SignalRaised> {
    round_to_integral_impl(ctx, format, a, false)
}

/// Like [`round_to_integral`], but also signals `Inexact` when rounding
/// discarded a nonzero fraction.
pub fn round_to_integral_exact(ctx: &mut Context, format: &BinaryFormat, a: &Binary) -> Result<Binary, SignalRaised> {
    round_to_integral_impl(ctx, format, a, true)
}

fn convert_to_integer_impl(
    ctx: &mut Context,
    target: &IntegerFormat,
    a: &Binary,
    signal_inexact: bool,
) -> Result<Integer, SignalRaised> {
    if a.is_nan() {
        ctx.note_signal(SignalClass::InvalidConvertToInteger, "NaN operand to convert_to_integer")?;
        return Ok(Integer::from(0));
    }
    if a.is_infinite() {
        let default = if a.sign() { target.min_int() } else { target.max_int() };
        ctx.note_signal(SignalClass::InvalidConvertToInteger, "infinite operand to convert_to_integer")?;
        return Ok(default);
    }
    if a.is_zero() {
        return Ok(Integer::from(0));
    }

    let (mut magnitude, lost, _) = split_integer_part(a);
    let lsb_is_odd = magnitude.is_odd();
    if round_up(ctx.rounding(), lost, a.sign(), lsb_is_odd) {
        magnitude += 1;
    }

    let signed = if a.sign() { -magnitude } else { magnitude };
    let (clamped, was_clamped) = target.clamp(&signed);
    if was_clamped {
        ctx.note_signal(SignalClass::InvalidConvertToInteger, "conversion to integer out of range")?;
        return Ok(clamped);
    }

    if signal_inexact && lost.is_nonzero() {
        ctx.note_signal(SignalClass::Inexact, "conversion to integer discarded a nonzero fraction")?;
    }
    Ok(clamped)
}

/// Convert `a` to a fixed-width two's-complement integer in `target`,
/// rounding under `ctx`. NaN, infinity, and out-of-range magnitudes signal
/// `InvalidConvertToInteger` and deliver a clamped default (`0` for NaN,
/// `target`'s min/max for infinity, the nearer bound for overflow).
pub fn convert_to_integer(ctx: &mut Context, target: &IntegerFormat, a: &Binary) -> Result<Integer, SignalRaised> {
    convert_to_integer_impl(ctx, target, a, false)
}

/// Like [`convert_to_integer`], but also signals `Inexact` when the
/// conversion rounded away a nonzero fraction.
pub fn convert_to_integer_exact(ctx: &mut Context, target: &IntegerFormat, a: &Binary) -> Result<Integer, SignalRaised> {
    convert_to_integer_impl(ctx, target, a, true)
}
