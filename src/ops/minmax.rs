/*!
The min/max family: eight variants crossing {min, max} x {plain, `Num`
(quiet-NaN-transparent)} x {value, magnitude}.

Grounded on `ieee754.py`'s min/max dispatch.
*/

use crate::context::Context;
use crate::ops::compare::{compare, Ordering};
use crate::signal::SignalClass;
use crate::signal::SignalRaised;
use crate::value::Binary;

fn pick(ctx: &mut Context, a: &Binary, b: &Binary, want_min: bool, by_magnitude: bool) -> Result<Binary, SignalRaised> {
    if a.is_signalling_nan() || b.is_signalling_nan() {
        ctx.note_signal(SignalClass::SignallingNaNOperand, "signalling NaN operand to min/max")?;
    }

    // If comparing by magnitude and the magnitudes tie, fall back to a
    // signed comparison (so e.g. max_mag(-5, +5) still picks +5).
    let comp = if by_magnitude {
        match compare(&a.abs(), &b.abs()) {
            Ordering::Equal => compare(a, b),
            other => other,
        }
    } else {
        compare(a, b)
    };

    match comp {
        Ordering::Unordered => {
            let nan = if a.is_nan() { a } else { b };
            Ok(nan.clone())
        }
        // A genuine tie (or `a` the larger) picks `a` for max, `b` for min.
        Ordering::GreaterThan | Ordering::Equal => Ok(if want_min { b.clone() } else { a.clone() }),
        Ordering::LessThan => Ok(if want_min { a.clone() } else { b.clone() }),
    }
}

fn pick_num(ctx: &mut Context, a: &Binary, b: &Binary, want_min: bool, by_magnitude: bool) -> Result<Binary, SignalRaised> {
    if a.is_signalling_nan() || b.is_signalling_nan() {
        ctx.note_signal(SignalClass::SignallingNaNOperand, "signalling NaN operand to min/max")?;
    }
    if a.is_nan() && !b.is_nan() {
        return Ok(b.clone());
    }
    if b.is_nan() && !a.is_nan() {
        return Ok(a.clone());
    }
    pick(ctx, a, b, want_min, by_magnitude)
}

pub fn min_value(ctx: &mut Context, a: &Binary, b: &Binary) -> Result<Binary, SignalRaised> {
    pick(ctx, a, b, true, false)
}

pub fn max_value(ctx: &mut Context, a: &Binary, b: &Binary) -> Result<Binary, SignalRaised> {
    pick(ctx, a, b, false, false)
}

pub fn min_num(ctx: &mut Context, a: &Binary, b: &Binary) -> Result<Binary, SignalRaised> {
    pick_num(ctx, a, b, true, false)
}

pub fn max_num(ctx: &mut Context, a: &Binary, b: &Binary) -> Result<Binary, SignalRaised> {
    pick_num(ctx, a, b, false, false)
}

pub fn min_mag(ctx: &mut Context, a: &Binary, b: &Binary) -> Result<Binary, SignalRaised> {
    pick(ctx, a, b, true, true)
}

pub fn max_mag(ctx: &mut Context, a: &Binary, b: &Binary) -> Result<Binary, SignalRaised> {
    pick(ctx, a, b, false, true)
}

pub fn min_num_mag(ctx: &mut Context, a: &Binary, b: &Binary) -> Result<Binary, SignalRaised> {
    pick_num(ctx, a, b, true, true)
}

pub fn max_num_mag(ctx: &mut Context, a: &Binary, b: &Binary) -> Result<Binary, SignalRaised> {
    pick_num(ctx, a, b, false, true)
}
