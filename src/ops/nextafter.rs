/*!
`scaleb`, `logb`, `logb_integral`, `next_up`, `next_down`.

Grounded on `ieee754.py`'s same-named methods.
*/

use rug::Integer;

use crate::context::Context;
use crate::format::BinaryFormat;
use crate::ops::{normalize, propagate_nan};
use crate::signal::{SignalClass, SignalRaised};
use crate::value::Binary;

pub fn scaleb(ctx: &mut Context, format: &BinaryFormat, a: &Binary, n: i64) -> Result<Binary, SignalRaised> {
    if let Some((nan, any_signalling)) = propagate_nan(format, &[a]) {
        return if any_signalling {
            ctx.signal(SignalClass::SignallingNaNOperand, "signalling NaN operand to scaleb", nan, false)
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
    let exp = a.exponent_int().unwrap() + n;
    normalize(ctx, format, a.sign(), exp, a.significand().clone())
}

/// The unbounded-precision, unbounded-exponent-range integer exponent:
/// `floor(log2(|a|))` for finite nonzero `a`; the three special cases
/// described in the design (zero/infinity/NaN) all signal
/// `InvalidLogBIntegral`.
pub fn logb_integral(ctx: &mut Context, format: &BinaryFormat, a: &Binary) -> Result<i64, SignalRaised> {
    if a.is_finite() && !a.is_zero() {
        return Ok(a.exponent().unwrap());
    }
    let logb_inf = format.logb_inf();
    let default = if a.is_nan() {
        -logb_inf - 1
    } else if a.is_infinite() {
        logb_inf
    } else {
        -logb_inf
    };
    ctx.note_signal(SignalClass::InvalidLogBIntegral, "logb_integral of zero/infinity/NaN")?;
    Ok(default)
}

/// The floating-point `logb`: like `logb_integral` but zero is a
/// `DivisionByZero`-class signal (`LogBZero`) returning -infinity, and
/// infinity/NaN propagate instead of erroring.
pub fn logb(ctx: &mut Context, format: &BinaryFormat, a: &Binary) -> Result<Binary, SignalRaised> {
    if let Some((nan, any_signalling)) = propagate_nan(format, &[a]) {
        return if any_signalling {
            ctx.signal(SignalClass::SignallingNaNOperand, "signalling NaN operand to logb", nan, false)
        } else {
            Ok(nan)
        };
    }
    if a.is_infinite() {
        return Ok(Binary::infinity(format.clone(), false));
    }
    if a.is_zero() {
        let default = Binary::infinity(format.clone(), true);
        return ctx.signal(SignalClass::LogBZero, "logb(0)", default, false);
    }
    // logb's result is an exact integer; round it into the destination
    // format the same way any other exact value would be (this only loses
    // precision if the destination format's precision can't hold
    // log2(e_max), which would itself be a pathologically narrow format).
    let e = a.exponent().unwrap();
    let sign = e < 0;
    let magnitude = Integer::from(e.unsigned_abs());
    normalize(ctx, format, sign, 0, magnitude)
}

/// The smallest representable value strictly greater than `a`.
pub fn next_up(ctx: &mut Context, format: &BinaryFormat, a: &Binary) -> Result<Binary, SignalRaised> {
    if let Some((nan, any_signalling)) = propagate_nan(format, &[a]) {
        return if any_signalling {
            ctx.signal(SignalClass::SignallingNaNOperand, "signalling NaN operand to next_up", nan, false)
        } else {
            Ok(nan)
        };
    }
    if a.is_infinite() {
        return Ok(if a.sign() {
            let e_biased = format.e_max() + format.e_bias();
            Binary::from_parts(format.clone(), true, e_biased, format.max_significand())
        } else {
            a.clone()
        });
    }
    if a.is_zero() {
        return Ok(Binary::from_parts(format.clone(), false, 1, Integer::from(1)));
    }

    let int_bit = format.int_bit();
    let max_sig = format.max_significand();

    if !a.sign() {
        // positive: increasing magnitude moves towards +infinity.
        let mut sig = Integer::from(a.significand() + 1);
        let mut e = a.exponent_int().unwrap();
        if sig > max_sig {
            sig >>= 1u32;
            e += 1;
        }
        let e_biased = e + format.precision() as i64 - 1 + format.e_bias();
        if e_biased > format.e_max() + format.e_bias() {
            return Ok(Binary::infinity(format.clone(), false));
        }
        let subnormal_before = *a.significand() < int_bit;
        let result = Binary::from_parts(format.clone(), false, e_biased.max(1), sig);
        if subnormal_before && result.is_subnormal() {
            let abrupt = result.clone();
            return ctx.signal_underflow(SignalClass::UnderflowExact, "next_up stayed subnormal", result, abrupt);
        }
        Ok(result)
    } else {
        // negative: increasing the (signed) value means decreasing magnitude.
        // Crossing below `int_bit` only re-normalizes (borrows into the
        // exponent) when the original value was not already at the
        // subnormal/first-normal exponent floor (e_biased == 1), since
        // that floor lets the significand roam below `int_bit` in place.
        let was_at_floor = a.e_biased() == 1;
        let sig = Integer::from(a.significand() - 1);
        let e = a.exponent_int().unwrap();
        if sig.cmp0() == std::cmp::Ordering::Equal {
            return Ok(Binary::zero(format.clone(), true));
        }
        let (sig, e) = if sig < int_bit && !was_at_floor {
            (Integer::from(&sig << 1u32) + 1, e - 1)
        } else {
            (sig, e)
        };
        let e_biased = (e + format.precision() as i64 - 1 + format.e_bias()).max(1);
        let result = Binary::from_parts(format.clone(), true, e_biased, sig);
        if result.is_subnormal() {
            let abrupt = result.clone();
            return ctx.signal_underflow(SignalClass::UnderflowExact, "next_up result is subnormal", result, abrupt);
        }
        Ok(result)
    }
}

/// `next_down(a) == -next_up(-a)`.
pub fn next_down(ctx: &mut Context, format: &BinaryFormat, a: &Binary) -> Result<Binary, SignalRaised> {
    next_up(ctx, format, &a.negate()).map(|v| v.negate())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt() -> BinaryFormat {
        BinaryFormat::from_triple(4, 4, -3).unwrap()
    }

    fn from_u64(format: &BinaryFormat, ctx: &mut Context, v: u64) -> Binary {
        normalize(ctx, format, false, 0, Integer::from(v)).unwrap()
    }

    #[test]
    fn scaleb_zero_unchanged() {
        let mut ctx = Context::new();
        let f = fmt();
        let z = Binary::zero(f.clone(), false);
        let result = scaleb(&mut ctx, &f, &z, 5).unwrap();
        assert!(result.is_zero());
    }

    #[test]
    fn next_up_then_next_down_round_trips() {
        let mut ctx = Context::new();
        let f = fmt();
        let x = from_u64(&f, &mut ctx, 3);
        let up = next_up(&mut ctx, &f, &x).unwrap();
        let back = next_down(&mut ctx, &f, &up).unwrap();
        assert_eq!(*back.significand(), *x.significand());
        assert_eq!(back.exponent(), x.exponent());
    }

    #[test]
    fn logb_integral_of_zero_signals() {
        let mut ctx = Context::new();
        let f = fmt();
        let z = Binary::zero(f.clone(), false);
        let result = logb_integral(&mut ctx, &f, &z);
        assert!(result.is_ok());
        assert!(ctx.flags().invalid);
    }
}
