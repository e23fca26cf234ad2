/*!
The normalization pipeline: the single routine every constructive operation
funnels through to shift an unbounded (sign, integer-exponent, significand)
triple down to a format's precision, round it, and detect
overflow/underflow/inexactness.

Grounded on `ieee754.py`'s `Binary._normalize`.
*/

use rug::Integer;

use crate::context::{Context, TininessDetection};
use crate::format::BinaryFormat;
use crate::round::{round_up, shift_right, LostFraction};
use crate::signal::{SignalClass, SignalRaised};
use crate::value::Binary;

/// `make_overflow_value` (ieee754.py): the default result when a rounded
/// magnitude would exceed the format's largest finite value.
pub(crate) fn make_overflow_value(ctx: &Context, format: &BinaryFormat, sign: bool) -> Binary {
    if round_up(ctx.rounding(), LostFraction::MoreThanHalf, sign, false) {
        Binary::infinity(format.clone(), sign)
    } else {
        let e_biased = format.e_max() + format.e_bias();
        Binary::from_parts(format.clone(), sign, e_biased, format.max_significand())
    }
}

/// `make_underflow_value` (ieee754.py): the default result for an
/// `AbruptUnderflow` handler, or for the boundary case of a magnitude
/// rounding to exactly zero.
pub(crate) fn make_underflow_value(ctx: &Context, format: &BinaryFormat, sign: bool, force_normal: bool) -> Binary {
    if round_up(ctx.rounding(), LostFraction::LessThanHalf, sign, false) {
        if force_normal {
            Binary::from_parts(format.clone(), sign, 1, format.int_bit())
        } else {
            Binary::from_parts(format.clone(), sign, 1, Integer::from(1))
        }
    } else {
        Binary::zero(format.clone(), sign)
    }
}

/// Round `sign * significand * 2^e_int` into `format` under `ctx`,
/// signalling Overflow/Underflow/Inexact as appropriate.
pub(crate) fn normalize(
    ctx: &mut Context,
    format: &BinaryFormat,
    sign: bool,
    e_int: i64,
    significand: Integer,
) -> Result<Binary, SignalRaised> {
    if significand.cmp0() == std::cmp::Ordering::Equal {
        return Ok(Binary::zero(format.clone(), sign));
    }

    let precision = format.precision() as i64;
    let bit_len = significand.significant_bits() as i64;

    // shift > 0 means "shift right"; the max() enforces the subnormal
    // floor so subnormal results round at the correct bit position.
    let shift = (bit_len - precision).max(format.e_min() - (e_int + precision - 1));

    let (mut m, mut lost) = shift_right(&significand, shift);
    let mut e = e_int + shift;

    let int_bit = format.int_bit();
    let tiny_before = m < int_bit;

    let lsb_is_odd = m.is_odd();
    if round_up(ctx.rounding(), lost, sign, lsb_is_odd) {
        m += 1;
        let max_sig = format.max_significand();
        if m > max_sig {
            m >>= 1u32;
            e += 1;
            lost = LostFraction::ExactlyZero;
        }
    }

    let tiny = match ctx.tininess_detection() {
        TininessDetection::BeforeRounding => tiny_before,
        TininessDetection::AfterRounding => m < int_bit,
    };

    let e_biased = e + precision - 1 + format.e_bias();

    if e_biased > format.e_max() + format.e_bias() {
        let overflow_default = make_overflow_value(ctx, format, sign);
        let result = ctx.signal(SignalClass::Overflow, "magnitude too large to represent", overflow_default, false)?;
        return ctx.signal(SignalClass::Inexact, "overflow result is inexact", result, false);
    }

    let clamped_e_biased = e_biased.max(1);
    let natural = Binary::from_parts(format.clone(), sign, clamped_e_biased, m);

    if tiny {
        let class = if lost.is_nonzero() {
            SignalClass::UnderflowInexact
        } else {
            SignalClass::UnderflowExact
        };
        let abrupt = make_underflow_value(ctx, format, sign, false);
        let result = ctx.signal_underflow(class, "magnitude too small to represent normally", natural, abrupt)?;
        if lost.is_nonzero() {
            return ctx.signal(SignalClass::Inexact, "underflowed result is inexact", result, false);
        }
        return Ok(result);
    }

    if lost.is_nonzero() {
        return ctx.signal(SignalClass::Inexact, "result is not exactly representable", natural, false);
    }

    Ok(natural)
}
