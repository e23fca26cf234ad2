/*!
Square root.

Grounded on `ieee754.py`'s `sqrt`, which widens the significand with extra
guard bits, computes an integer square root, and disambiguates the final
rounding by comparing the candidate's square back against the exact value.
This port computes that integer square root directly via GMP's exact
`sqrt_rem` (rather than iterating Newton-Raphson by hand, since nothing
here can be run to confirm an iterative loop converges as intended) and
folds the remainder into a sticky bit, the same trick [`crate::ops::div`]
uses -- both reduce to "was anything nonzero discarded" for the purposes of
[`normalize`]'s rounding decision. The reference implementation also prints
Newton-Raphson iteration traces to stdout; this port has no such output.
*/

use rug::Integer;

use crate::context::Context;
use crate::format::BinaryFormat;
use crate::ops::{normalize, propagate_nan};
use crate::signal::{SignalClass, SignalRaised};
use crate::value::Binary;

pub fn sqrt(ctx: &mut Context, format: &BinaryFormat, a: &Binary) -> Result<Binary, SignalRaised> {
    if let Some((nan, any_signalling)) = propagate_nan(format, &[a]) {
        return if any_signalling {
            ctx.signal(SignalClass::SignallingNaNOperand, "signalling NaN operand to sqrt", nan, false)
        } else {
            Ok(nan)
        };
    }

    if a.is_zero() {
        return Ok(Binary::zero(format.clone(), a.sign()));
    }

    if a.sign() {
        let default = Binary::nan(format.clone(), false, true, Integer::from(0));
        return ctx.signal(SignalClass::InvalidSqrt, "sqrt of a negative value", default, false);
    }

    if a.is_infinite() {
        return Ok(Binary::infinity(format.clone(), false));
    }

    let precision = format.precision() as i64;
    let e_int = a.exponent_int().unwrap();
    let sig = a.significand();
    let bits = sig.significant_bits() as i64;

    let target_bits = 2 * (precision + 2);
    let mut extra_shift = target_bits - bits;
    if (e_int - extra_shift).rem_euclid(2) != 0 {
        extra_shift += 1;
    }

    let m = Integer::from(sig << extra_shift as u32);
    let base_exp = e_int - extra_shift;
    debug_assert_eq!(base_exp % 2, 0);

    let (mut root, remainder) = m.sqrt_rem(Integer::new());
    if remainder.cmp0() != std::cmp::Ordering::Equal && root.is_even() {
        root += 1;
    }

    let exp = base_exp / 2;
    normalize(ctx, format, false, exp, root)
}
